//! Config command - Show the effective configuration

use std::path::Path;

use colored::Colorize;

use crate::config::loader::{read_config_with_env, ENV_TOKEN, OVERRIDE_VARS};
use crate::config::paths::resolve_config_path;
use crate::config::{validate_config, ConfigError};
use crate::fetcher::Endpoints;
use crate::types::ConfigSource;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let location = resolve_config_path(config_path);

    println!("{}", "\nWork Orders Configuration\n".bold());

    // Show config location
    println!("{}", "Config location:".dimmed());
    let exists = Path::new(&location.config_path).exists();
    if exists {
        println!(
            "  {} {} ({:?})",
            "●".green(),
            location.config_path,
            location.source
        );
    } else {
        println!(
            "  {} {} (not found, using defaults)",
            "○".red(),
            location.config_path
        );
    }

    let loaded = if location.source == ConfigSource::Explicit && !exists {
        Err(ConfigError::NotFound(location.config_path.clone()))
    } else {
        read_config_with_env(&location.config_path)
    };

    match loaded {
        Ok(config) => {
            println!("{}", "\nCurrent settings:".dimmed());
            println!("  host:            {}", config.host.cyan());
            println!("  api_prefix:      {}", config.api_prefix.cyan());
            println!("  org:             {}", config.org.cyan());
            println!("  site:            {}", config.site.cyan());
            println!(
                "  timeout_seconds: {}",
                format!("{}", config.timeout_seconds).cyan()
            );
            match Endpoints::from_config(&config) {
                Ok(endpoints) => {
                    println!("  base url:        {}", endpoints.base_url().cyan())
                }
                Err(e) => println!("  base url:        {}", format!("{}", e).red()),
            }

            if let Err(e) = validate_config(&config) {
                eprintln!("\n{}", "Configuration is incomplete:".red());
                eprintln!("{}", format!("{}", e).dimmed());
            }
        }
        Err(e) => {
            eprintln!("\n{}", "Error reading config:".red());
            eprintln!("  {}", format!("{}", e).dimmed());
        }
    }

    println!("{}", "\nEnvironment overrides:".dimmed());
    let mut has_overrides = false;
    for var in &OVERRIDE_VARS {
        if let Ok(val) = std::env::var(var) {
            println!("  {}={}", var, val.yellow());
            has_overrides = true;
        }
    }
    if !has_overrides {
        println!("  {}", "(none)".dimmed());
    }

    println!("{}", "\nCredentials:".dimmed());
    match std::env::var(ENV_TOKEN) {
        Ok(token) if !token.trim().is_empty() => {
            println!("  {} {} is set", "●".green(), ENV_TOKEN)
        }
        _ => println!("  {} {} is not set", "○".red(), ENV_TOKEN),
    }

    println!();
    Ok(())
}
