//! Startup: config, employee data, document indexes, composer.
//!
//! Every failure here is fatal and names the file or setting at fault.

use std::path::Path;
use std::sync::Arc;

use leavedesk_assistant::AnswerComposer;
use leavedesk_config::{AppConfig, ConfigError};
use leavedesk_core::employee::EmployeeStore;
use leavedesk_core::error::StoreError;
use leavedesk_core::provider::Provider;
use leavedesk_knowledge::VectorQueryEngine;
use thiserror::Error;
use tracing::info;

pub const LEAVE_POLICY_ENGINE: &str = "leave_policy";
pub const APPROVAL_FLOW_ENGINE: &str = "approval_flow";

pub struct Application {
    pub config: AppConfig,
    pub composer: AnswerComposer,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no provider registered under '{0}'")]
    NoProvider(String),
    #[error("employee data could not be loaded: {0}")]
    Employees(#[from] StoreError),
    #[error("document index '{engine}' could not be built: {source}")]
    Index {
        engine: &'static str,
        #[source]
        source: leavedesk_core::Error,
    },
}

pub async fn bootstrap(config_path: Option<&Path>) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(config_path)?;
    let router = leavedesk_providers::router::build_from_config(&config);
    let provider = router
        .default()
        .ok_or_else(|| BootstrapError::NoProvider(config.default_provider.clone()))?;
    info!(
        provider = %config.default_provider,
        model = %config.default_model,
        "Provider selected"
    );

    assemble(config, provider).await
}

/// Build the application around an already constructed provider.
pub async fn assemble(
    config: AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<Application, BootstrapError> {
    let employees = EmployeeStore::load_from(&config.data.employees_path())?;
    info!(count = employees.len(), "Employee data loaded");

    let leave_engine = VectorQueryEngine::from_document(
        LEAVE_POLICY_ENGINE,
        &config.data.leave_policy_path(),
        provider.clone(),
        &config,
    )
    .await
    .map_err(|source| BootstrapError::Index {
        engine: LEAVE_POLICY_ENGINE,
        source,
    })?;

    let approval_engine = VectorQueryEngine::from_document(
        APPROVAL_FLOW_ENGINE,
        &config.data.approval_flow_path(),
        provider,
        &config,
    )
    .await
    .map_err(|source| BootstrapError::Index {
        engine: APPROVAL_FLOW_ENGINE,
        source,
    })?;

    let composer = AnswerComposer::new(
        Arc::new(leave_engine),
        Arc::new(approval_engine),
        Arc::new(employees),
    )
    .with_leave_config(&config.leave);

    info!(
        arithmetic = ?config.leave.seniority_arithmetic,
        "Assistant ready"
    );

    Ok(Application { config, composer })
}
