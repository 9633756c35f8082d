use anyhow::Result;
use colored::Colorize;
use flight_report::config::{self, Config, GroupMode, SourceKind};
use flight_report::logging::mask_secret;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %path.display(), "Loading configuration for display");

    let cfg = config::load_config_unvalidated(path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %path.display(), "Validating configuration file");

    let cfg = config::load_config(path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {}: {}",
        "Source".cyan(),
        match cfg.report.source {
            SourceKind::Amadeus => "amadeus",
            SourceKind::Simulated => "simulated",
        }
    );
    match cfg.report.mode {
        GroupMode::Countries => {
            println!(
                "  {}: {} (→ {})",
                "Countries".cyan(),
                cfg.report.countries.len(),
                cfg.report.destination
            );
            for country in &cfg.report.countries {
                println!("    {} ({})", country.name, country.airport);
            }
        }
        GroupMode::Routes => {
            println!("  {}: {}", "Routes".cyan(), cfg.report.routes.len());
            for route in &cfg.report.routes {
                println!("    {} → {}", route.origin, route.destination);
            }
        }
    }
    println!("  {}: {} days", "Max Range".cyan(), cfg.report.max_range_days);
    println!("  {}: {}", "Output".cyan(), cfg.report.output.display());

    info!("Configuration validation successful");
    Ok(())
}

/// Mask client credentials for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.api.client_id = mask_secret(&sanitized.api.client_id);
    sanitized.api.client_secret = mask_secret(&sanitized.api.client_secret);
    sanitized
}
