use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use flight_report::config::{is_airport_code, CountryConfig, GroupMode, RouteConfig, SourceKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flights", version, about = "Daily minimum flight price report")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "flights.toml", global = true)]
    pub config: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Search flights and print the best-price report (default)
    Report(ReportArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Offer source (overrides report.source)
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Group by countries or explicit routes (overrides report.mode)
    #[arg(long, value_enum)]
    pub mode: Option<GroupMode>,

    /// First departure date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last departure date, YYYY-MM-DD (default: start + report.max_range_days)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Route as ORIGIN-DEST, repeatable; implies --mode routes
    #[arg(long = "route", value_parser = parse_route)]
    pub routes: Vec<RouteConfig>,

    /// Country as Name=AIRPORT, repeatable; implies --mode countries
    #[arg(long = "country", value_parser = parse_country)]
    pub countries: Vec<CountryConfig>,

    /// Destination airport for country groups
    #[arg(long)]
    pub destination: Option<String>,

    /// CSV output path (overrides report.output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the CSV file
    #[arg(long)]
    pub no_export: bool,

    /// Seed for the simulated source
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Report if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Report(ReportArgs::default()))
    }
}

/// "lis-gru" -> LIS→GRU
fn parse_route(value: &str) -> Result<RouteConfig, String> {
    let (origin, destination) = value
        .split_once('-')
        .ok_or_else(|| format!("expected ORIGIN-DEST, got '{}'", value))?;
    let origin = origin.trim().to_uppercase();
    let destination = destination.trim().to_uppercase();

    if !is_airport_code(&origin) || !is_airport_code(&destination) {
        return Err(format!("'{}' is not a pair of 3-letter airport codes", value));
    }

    Ok(RouteConfig {
        origin,
        destination,
    })
}

/// "Argentina=EZE"
fn parse_country(value: &str) -> Result<CountryConfig, String> {
    let (name, airport) = value
        .split_once('=')
        .ok_or_else(|| format!("expected Name=AIRPORT, got '{}'", value))?;
    let name = name.trim();
    let airport = airport.trim().to_uppercase();

    if name.is_empty() {
        return Err("country name cannot be empty".to_string());
    }
    if !is_airport_code(&airport) {
        return Err(format!("'{}' is not a 3-letter airport code", airport));
    }

    Ok(CountryConfig {
        name: name.to_string(),
        airport,
    })
}
