//! `leavedesk employees`: list employees with seniority and used leave.

use std::path::Path;

use chrono::NaiveDate;
use leavedesk_assistant::{entitled_days, parse_join_date, seniority_months};
use leavedesk_config::AppConfig;
use leavedesk_core::employee::EmployeeStore;

pub async fn run(
    config_path: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let store = EmployeeStore::load_from(&config.data.employees_path())?;
    let today = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let schedule = &config.leave.seniority_schedule;

    println!("👥 Employees ({}) as of {today}", store.len());
    println!("========================================");

    for employee in store.records() {
        let seniority = match parse_join_date(employee) {
            Ok(join) => {
                let months = seniority_months(join, today);
                format!(
                    "joined {join}, {} yr {} mo, 特休 {} 天",
                    months / 12,
                    months % 12,
                    entitled_days(schedule, months)
                )
            }
            Err(e) => format!("⚠️  {e}"),
        };

        let used = if employee.used.is_empty() {
            "none".to_string()
        } else {
            employee
                .used
                .iter()
                .map(|(leave_type, days)| format!("{leave_type} {days}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!("  {}", employee.name);
        println!("    {seniority}");
        println!("    used: {used}");
    }

    Ok(())
}
