//! Leave types and how their balances are computed.
//!
//! The policy table is fixed at startup: five leave types, each with one
//! balance strategy. The seniority schedule maps length of service to
//! annual-leave entitlement for the seniority-based type.

use serde::{Deserialize, Serialize};

/// How the remaining balance of a leave type is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BalanceStrategy {
    /// Entitlement grows with years of service
    SeniorityBased,
    /// Constant annual day limit
    FixedQuota { limit: i64 },
    /// No numeric quota, only descriptive rules
    RuleOnly,
}

/// A named category of absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub name: String,
    pub strategy: BalanceStrategy,
}

impl LeaveType {
    pub fn new(name: impl Into<String>, strategy: BalanceStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

/// Leave-type name → strategy, in lookup order.
#[derive(Debug, Clone)]
pub struct LeavePolicyTable {
    types: Vec<LeaveType>,
}

impl LeavePolicyTable {
    /// The company's five leave types.
    pub fn standard() -> Self {
        Self {
            types: vec![
                LeaveType::new("特休", BalanceStrategy::SeniorityBased),
                LeaveType::new("事假", BalanceStrategy::FixedQuota { limit: 14 }),
                LeaveType::new("病假", BalanceStrategy::RuleOnly),
                LeaveType::new("婚假", BalanceStrategy::RuleOnly),
                LeaveType::new("喪假", BalanceStrategy::RuleOnly),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&LeaveType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaveType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for LeavePolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// One step of the seniority schedule: from `min_months` of service the
/// employee is entitled to `days` per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityTier {
    pub min_months: u32,
    pub days: i64,
}

/// Linear growth applied once the tiers run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityGrowth {
    /// Whole years of service at which growth starts
    pub from_years: u32,
    /// Entitlement at exactly `from_years`
    pub base_days: i64,
    /// Days added per further full year
    #[serde(default = "default_per_year")]
    pub per_year: i64,
    /// Upper bound on the entitlement
    pub max_days: i64,
}

fn default_per_year() -> i64 {
    1
}

/// Service length → annual-leave entitlement.
///
/// Defaults follow Taiwan Labor Standards Act article 38.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenioritySchedule {
    /// Ascending by `min_months`
    pub tiers: Vec<SeniorityTier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<SeniorityGrowth>,
}

impl SenioritySchedule {
    /// Check tiers are strictly ascending and growth is consistent.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.tiers.windows(2) {
            if pair[1].min_months <= pair[0].min_months {
                return Err(format!(
                    "seniority tiers must be strictly ascending by min_months ({} then {})",
                    pair[0].min_months, pair[1].min_months
                ));
            }
        }
        if self.tiers.iter().any(|t| t.days < 0) {
            return Err("seniority tier days must not be negative".into());
        }
        if let Some(growth) = &self.growth {
            if growth.max_days < growth.base_days {
                return Err("seniority growth max_days must be >= base_days".into());
            }
        }
        Ok(())
    }
}

impl Default for SenioritySchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                SeniorityTier { min_months: 6, days: 3 },
                SeniorityTier { min_months: 12, days: 7 },
                SeniorityTier { min_months: 24, days: 10 },
                SeniorityTier { min_months: 36, days: 14 },
                SeniorityTier { min_months: 60, days: 15 },
            ],
            growth: Some(SeniorityGrowth {
                from_years: 10,
                base_days: 16,
                per_year: 1,
                max_days: 30,
            }),
        }
    }
}
