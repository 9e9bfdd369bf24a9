//! Shared test helpers for composer and session tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use leavedesk_core::employee::{EmployeeRecord, EmployeeStore};
use leavedesk_core::error::{ProviderError, RetrievalError};
use leavedesk_core::retrieval::QueryEngine;

/// A query engine that replays scripted answers and records every prompt.
///
/// Answers are returned in order; the last one repeats once the script
/// runs out.
pub struct ScriptedEngine {
    name: String,
    answers: Vec<String>,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new(name: &str, answer: &str) -> Self {
        Self::with_answers(name, &[answer])
    }

    pub fn with_answers(name: &str, answers: &[&str]) -> Self {
        Self {
            name: name.into(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// An engine whose every query times out.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::with_answers(name, &[])
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, prompt: &str) -> Result<String, RetrievalError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());

        if self.fail {
            return Err(RetrievalError::Provider {
                engine: self.name.clone(),
                source: ProviderError::Timeout("300s".into()),
            });
        }

        let i = (prompts.len() - 1).min(self.answers.len().saturating_sub(1));
        Ok(self.answers.get(i).cloned().unwrap_or_default())
    }
}

/// A store of employees with no recorded leave usage.
pub fn store_of(people: &[(&str, Option<&str>)]) -> EmployeeStore {
    store_with(
        people
            .iter()
            .map(|(name, join)| (*name, *join, BTreeMap::new()))
            .collect(),
    )
}

pub fn store_with(people: Vec<(&str, Option<&str>, BTreeMap<String, i64>)>) -> EmployeeStore {
    let records = people
        .into_iter()
        .map(|(name, join_date, used)| EmployeeRecord {
            name: name.to_string(),
            join_date: join_date.map(str::to_string),
            used,
        })
        .collect();
    EmployeeStore::from_records(records).unwrap()
}
