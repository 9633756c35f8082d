//! Flight price report: query planning, aggregation, presentation and export

pub mod aggregate;
pub mod export;
pub mod generator;
pub mod offer;
pub mod render;

pub use generator::{generate_report, QueryAttempt, QueryOutcome, Report, ReportRequest};
pub use offer::{FlightOffer, Group, Price, QueryKey, SourceLinks};
