//! Employee records and the read-only store they are loaded into.
//!
//! The store is loaded once at startup from a JSON array and never written
//! back: leave consumption recorded in `used` is reported, not updated.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// One employee as recorded in the employee data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Display name, unique within the store
    pub name: String,

    /// Join date as written in the data file (`YYYY-MM-DD`)
    #[serde(default)]
    pub join_date: Option<String>,

    /// Days consumed per leave-type name
    #[serde(default)]
    pub used: BTreeMap<String, i64>,
}

impl EmployeeRecord {
    /// The join date, treating a blank string the same as an absent one.
    pub fn join_date(&self) -> Option<&str> {
        self.join_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Days consumed for a leave type; unrecorded types count as zero.
    pub fn used_days(&self, leave_type: &str) -> i64 {
        self.used.get(leave_type).copied().unwrap_or(0)
    }
}

/// All employee records, in file order.
///
/// File order matters: name resolution picks the first record whose name
/// appears in a question.
#[derive(Debug, Clone, Default)]
pub struct EmployeeStore {
    records: Vec<EmployeeRecord>,
}

impl EmployeeStore {
    /// Build a store, rejecting empty or duplicate names.
    pub fn from_records(records: Vec<EmployeeRecord>) -> Result<Self, StoreError> {
        let mut seen = std::collections::HashSet::new();
        for (i, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(StoreError::EmptyName(i));
            }
            if !seen.insert(record.name.as_str()) {
                return Err(StoreError::DuplicateName(record.name.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Load the store from a JSON array of employee records.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let records: Vec<EmployeeRecord> =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let store = Self::from_records(records)?;
        debug!(path = %path.display(), count = store.len(), "Employee store loaded");
        Ok(store)
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Look up a record by exact name.
    pub fn get(&self, name: &str) -> Option<&EmployeeRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
