//! Flight offer sources
//!
//! Every source answers one query at a time. The report generator calls
//! [`FlightSource::authenticate`] once before the first query and aborts the
//! whole report if it fails.

pub mod amadeus;
pub mod simulated;

use crate::config::{Config, SourceKind};
use crate::error::AppError;
use crate::report::offer::{FlightOffer, QueryKey};
use async_trait::async_trait;

pub use amadeus::AmadeusSource;
pub use simulated::SimulatedSource;

#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Source name for logs ("amadeus", "simulated")
    fn name(&self) -> &str;

    /// Acquire whatever credentials the source needs.
    async fn authenticate(&self) -> Result<(), AppError>;

    /// Search offers for a single origin/destination/date.
    ///
    /// `Ok(vec![])` means the search succeeded and found nothing; any `Err`
    /// means the query itself failed.
    async fn search(&self, query: &QueryKey) -> Result<Vec<FlightOffer>, AppError>;
}

/// Build the source selected in the configuration
pub fn build_source(config: &Config, seed: Option<u64>) -> Result<Box<dyn FlightSource>, AppError> {
    match config.report.source {
        SourceKind::Amadeus => Ok(Box::new(AmadeusSource::new(&config.api)?)),
        SourceKind::Simulated => Ok(Box::new(SimulatedSource::new(seed))),
    }
}
