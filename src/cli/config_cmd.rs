use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{to_json, OutputFormat, OutputOptions};
use crate::core::config::AppConfig;

pub fn init(config_path: Option<&Path>, _opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path(config_path);
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    AppConfig::default()
        .save_new(&path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    println!("Generated config at {}", path.display());
    println!("  Set email.sender to an SES-verified identity before the first run.");
    Ok(())
}

pub fn check(config_path: Option<&Path>, opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path(config_path);
    if !path.exists() {
        eprintln!("No config file found at {}, using defaults", path.display());
    }

    let config = match AppConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if opts.format == OutputFormat::Json {
        println!(
            "{}",
            to_json(
                &serde_json::json!({ "config": config, "issues": issues }),
                opts
            )?
        );
        if !issues.is_empty() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!(
            "  {} -> {} ({})",
            config.email.sender,
            config.email.recipients.join(", "),
            config.email.region
        );
        println!("  Window: last {} days", config.report.lookback_days);
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}
