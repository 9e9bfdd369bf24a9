//! `leavedesk doctor`: diagnose configuration, data and provider health.

use std::path::Path;

use leavedesk_config::AppConfig;
use leavedesk_core::employee::EmployeeStore;
use leavedesk_core::leave::LeavePolicyTable;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 LeaveDesk Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Check config
    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(default_path.as_path());
    if !path.exists() {
        println!("  ⚠️  No config file at {}, using defaults — run `leavedesk onboard`", path.display());
        issues += 1;
    }
    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    // Check data files
    for (label, file) in [
        ("Leave policy", config.data.leave_policy_path()),
        ("Approval flow", config.data.approval_flow_path()),
    ] {
        if file.is_file() {
            println!("  ✅ {label} document: {}", file.display());
        } else {
            println!("  ❌ {label} document missing: {}", file.display());
            issues += 1;
        }
    }

    match EmployeeStore::load_from(&config.data.employees_path()) {
        Ok(store) => {
            println!("  ✅ Employee data: {} record(s)", store.len());

            let table = LeavePolicyTable::standard();
            for employee in store.records() {
                if employee.join_date().is_none() {
                    println!("  ⚠️  {} has no join date; 特休 cannot be computed", employee.name);
                    issues += 1;
                }
                for leave_type in employee.used.keys() {
                    if !table.contains(leave_type) {
                        println!(
                            "  ⚠️  {} records unknown leave type '{leave_type}'",
                            employee.name
                        );
                        issues += 1;
                    }
                }
            }
        }
        Err(e) => {
            println!("  ❌ Employee data: {e}");
            issues += 1;
        }
    }

    // Check provider
    if config.default_provider != "ollama" && !config.has_api_key() {
        println!(
            "  ⚠️  No API key for '{}' — set LEAVEDESK_API_KEY or api_key in config.toml",
            config.default_provider
        );
        issues += 1;
    }

    let router = leavedesk_providers::router::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  ⚠️  Provider '{}' responded but reported unhealthy", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        None => {
            println!("  ❌ No provider registered for '{}'", config.default_provider);
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
