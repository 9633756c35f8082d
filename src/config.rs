use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TOKEN_URL: &str = "https://test.api.amadeus.com/v1/security/oauth2/token";
pub const DEFAULT_SEARCH_URL: &str = "https://test.api.amadeus.com/v2/shopping/flight-offers";

/// Environment variable prefix, e.g. `FLIGHT_REPORT__API__CLIENT_SECRET`
pub const ENV_PREFIX: &str = "FLIGHT_REPORT";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub search_url: String,
    pub timeout_seconds: u64,
    pub adults: u32,
    pub max_results: u32,
    pub currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            timeout_seconds: 30,
            adults: 1,
            max_results: 5,
            currency: "USD".to_string(),
        }
    }
}

/// Where offers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live Amadeus flight-offers search
    Amadeus,
    /// Randomly generated offers, no network
    Simulated,
}

/// How queries are grouped for "best price"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// One origin airport per country, all flying to a shared destination
    Countries,
    /// Explicit origin/destination pairs
    Routes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountryConfig {
    pub name: String,
    pub airport: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub source: SourceKind,
    pub mode: GroupMode,
    /// Destination shared by every country group
    pub destination: String,
    /// How many days after the start date a range may reach
    pub max_range_days: u32,
    /// CSV export path
    pub output: PathBuf,
    pub countries: Vec<CountryConfig>,
    pub routes: Vec<RouteConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Amadeus,
            mode: GroupMode::Countries,
            destination: "BKK".to_string(),
            max_range_days: 5,
            output: PathBuf::from("flight_report.csv"),
            countries: default_countries(),
            routes: default_routes(),
        }
    }
}

fn default_countries() -> Vec<CountryConfig> {
    [("Argentina", "EZE"), ("Paraguay", "ASU"), ("Uruguay", "MVD")]
        .into_iter()
        .map(|(name, airport)| CountryConfig {
            name: name.to_string(),
            airport: airport.to_string(),
        })
        .collect()
}

fn default_routes() -> Vec<RouteConfig> {
    [("CMN", "EZE"), ("CMN", "GRU"), ("LIS", "GRU"), ("LIS", "EZE")]
        .into_iter()
        .map(|(origin, destination)| RouteConfig {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
        .collect()
}

/// Load and validate configuration
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let cfg = load_config_unvalidated(path)?;
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Read an optional TOML file plus environment overrides, without validation
///
/// Used when command-line overrides still have to be applied.
pub fn load_config_unvalidated(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.report.source == SourceKind::Amadeus {
        validate_api(&cfg.api)?;
    }

    match cfg.report.mode {
        GroupMode::Countries => {
            if cfg.report.countries.is_empty() {
                anyhow::bail!("At least one country must be configured");
            }
            if !is_airport_code(&cfg.report.destination) {
                anyhow::bail!("Invalid destination airport code: '{}'", cfg.report.destination);
            }
            for country in &cfg.report.countries {
                if country.name.trim().is_empty() {
                    anyhow::bail!("Country name cannot be empty");
                }
                if !is_airport_code(&country.airport) {
                    anyhow::bail!(
                        "Country '{}' has invalid airport code: '{}'",
                        country.name,
                        country.airport
                    );
                }
            }
        }
        GroupMode::Routes => {
            if cfg.report.routes.is_empty() {
                anyhow::bail!("At least one route must be configured");
            }
            for route in &cfg.report.routes {
                if !is_airport_code(&route.origin) || !is_airport_code(&route.destination) {
                    anyhow::bail!(
                        "Route '{}-{}' has an invalid airport code",
                        route.origin,
                        route.destination
                    );
                }
                if route.origin == route.destination {
                    anyhow::bail!("Route '{}-{}' starts and ends at the same airport", route.origin, route.destination);
                }
            }
        }
    }

    Ok(())
}

fn validate_api(api: &ApiConfig) -> anyhow::Result<()> {
    if api.client_id.is_empty() || api.client_secret.is_empty() {
        anyhow::bail!(
            "Amadeus client credentials are required (set api.client_id / api.client_secret or {}__API__CLIENT_ID / {}__API__CLIENT_SECRET)",
            ENV_PREFIX,
            ENV_PREFIX
        );
    }

    for (name, value) in [("token_url", &api.token_url), ("search_url", &api.search_url)] {
        url::Url::parse(value)
            .map_err(|e| anyhow::anyhow!("Invalid api.{} '{}': {}", name, value, e))?;
    }

    if api.adults == 0 {
        anyhow::bail!("api.adults must be at least 1");
    }
    if !(1..=250).contains(&api.max_results) {
        anyhow::bail!("api.max_results must be between 1 and 250");
    }
    if api.currency.len() != 3 {
        anyhow::bail!("api.currency must be a 3-letter ISO code");
    }

    Ok(())
}

/// Three uppercase ASCII letters, e.g. `EZE`
pub fn is_airport_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
