//! `leavedesk onboard`: first-time setup.

use std::path::Path;

use leavedesk_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let default_path = AppConfig::config_dir().join("config.toml");
    let config_path = config_path.unwrap_or(default_path.as_path());

    println!("🗂️  LeaveDesk — First-Time Setup");
    println!("================================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(config_path, AppConfig::default_toml())?;
    println!("✅ Created config at: {}", config_path.display());

    let defaults = AppConfig::default();
    println!("\n📝 Next steps:");
    println!("   1. Put these files in {}:", defaults.data.dir.display());
    println!("        {}", defaults.data.leave_policy.display());
    println!("        {}", defaults.data.approval_flow.display());
    println!("        {}", defaults.data.employees.display());
    println!("   2. Start Ollama, or set default_provider and api_key in the config");
    println!("   3. Run: leavedesk doctor");
    println!("   4. Run: leavedesk chat\n");

    Ok(())
}
