//! Leave-balance arithmetic.

use chrono::{Datelike, NaiveDate};
use leavedesk_core::employee::EmployeeRecord;
use leavedesk_core::leave::SenioritySchedule;
use thiserror::Error;

const JOIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a seniority-based balance could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("employee '{employee}' has no join date")]
    MissingJoinDate { employee: String },

    #[error("employee '{employee}' has an invalid join date '{value}'")]
    InvalidJoinDate { employee: String, value: String },
}

impl BalanceError {
    /// The warning shown to the user in place of an answer.
    pub fn user_message(&self) -> String {
        match self {
            BalanceError::MissingJoinDate { .. } => {
                "⚠️ 員工資料缺少入職日，無法計算年資".to_string()
            }
            BalanceError::InvalidJoinDate { employee, value } => {
                format!("⚠️ {employee} 的入職日「{value}」格式錯誤，無法計算年資")
            }
        }
    }
}

/// The employee's join date, parsed.
pub fn parse_join_date(employee: &EmployeeRecord) -> Result<NaiveDate, BalanceError> {
    let raw = employee
        .join_date()
        .ok_or_else(|| BalanceError::MissingJoinDate {
            employee: employee.name.clone(),
        })?;

    NaiveDate::parse_from_str(raw, JOIN_DATE_FORMAT).map_err(|_| BalanceError::InvalidJoinDate {
        employee: employee.name.clone(),
        value: raw.to_string(),
    })
}

/// Full calendar months between `join` and `as_of`.
///
/// A month is complete once the day of month is reached again, so a
/// Feb 29 join has not completed its first year on Feb 28. Dates before
/// the join date give 0.
pub fn seniority_months(join: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= join {
        return 0;
    }
    let mut months = (as_of.year() - join.year()) * 12 + as_of.month() as i32 - join.month() as i32;
    if as_of.day() < join.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Whole years of service.
pub fn seniority_years(join: NaiveDate, as_of: NaiveDate) -> u32 {
    seniority_months(join, as_of) / 12
}

/// Remaining days of a fixed quota. Overdrawn quotas go negative.
pub fn remaining_fixed(limit: i64, used: i64) -> i64 {
    limit - used
}

/// Annual-leave entitlement for a length of service.
pub fn entitled_days(schedule: &SenioritySchedule, months_of_service: u32) -> i64 {
    if let Some(growth) = &schedule.growth {
        let years = months_of_service / 12;
        if years >= growth.from_years {
            let extra = i64::from(years - growth.from_years) * growth.per_year;
            return (growth.base_days + extra).min(growth.max_days);
        }
    }

    schedule
        .tiers
        .iter()
        .rev()
        .find(|tier| months_of_service >= tier.min_months)
        .map(|tier| tier.days)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, JOIN_DATE_FORMAT).unwrap()
    }

    fn employee(join_date: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            name: "王小明".into(),
            join_date: join_date.map(str::to_string),
            used: BTreeMap::new(),
        }
    }

    #[test]
    fn years_complete_on_the_anniversary() {
        let join = date("2020-03-15");
        assert_eq!(seniority_years(join, date("2024-03-14")), 3);
        assert_eq!(seniority_years(join, date("2024-03-15")), 4);
    }

    #[test]
    fn leap_day_join_not_complete_on_feb_28() {
        let join = date("2020-02-29");
        assert_eq!(seniority_years(join, date("2021-02-28")), 0);
        assert_eq!(seniority_years(join, date("2021-03-01")), 1);
    }

    #[test]
    fn as_of_before_join_is_zero() {
        assert_eq!(seniority_months(date("2024-01-10"), date("2023-12-31")), 0);
        assert_eq!(seniority_months(date("2024-01-10"), date("2024-01-10")), 0);
    }

    #[test]
    fn months_count_partial_months_down() {
        let join = date("2023-01-20");
        assert_eq!(seniority_months(join, date("2023-07-19")), 5);
        assert_eq!(seniority_months(join, date("2023-07-20")), 6);
    }

    #[test]
    fn fixed_quota_is_never_clamped() {
        assert_eq!(remaining_fixed(14, 20), -6);
        assert_eq!(remaining_fixed(14, 3), 11);
    }

    #[test]
    fn default_schedule_entitlements() {
        let schedule = SenioritySchedule::default();
        assert_eq!(entitled_days(&schedule, 5), 0);
        assert_eq!(entitled_days(&schedule, 6), 3);
        assert_eq!(entitled_days(&schedule, 12), 7);
        assert_eq!(entitled_days(&schedule, 30), 10);
        assert_eq!(entitled_days(&schedule, 48), 14);
        assert_eq!(entitled_days(&schedule, 9 * 12 + 11), 15);
        assert_eq!(entitled_days(&schedule, 10 * 12), 16);
        assert_eq!(entitled_days(&schedule, 15 * 12), 21);
        assert_eq!(entitled_days(&schedule, 40 * 12), 30);
    }

    #[test]
    fn missing_and_blank_join_dates() {
        let err = parse_join_date(&employee(None)).unwrap_err();
        assert_eq!(err.user_message(), "⚠️ 員工資料缺少入職日，無法計算年資");

        let err = parse_join_date(&employee(Some("  "))).unwrap_err();
        assert!(matches!(err, BalanceError::MissingJoinDate { .. }));
    }

    #[test]
    fn invalid_join_date_names_value() {
        let err = parse_join_date(&employee(Some("2020/03/15"))).unwrap_err();
        assert!(matches!(err, BalanceError::InvalidJoinDate { ref value, .. } if value == "2020/03/15"));
        assert!(err.user_message().contains("2020/03/15"));
        assert!(err.user_message().contains("王小明"));
    }

    #[test]
    fn valid_join_date_parses() {
        assert_eq!(parse_join_date(&employee(Some("2020-03-15"))).unwrap(), date("2020-03-15"));
    }
}
