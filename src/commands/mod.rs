//! Command implementations for the CLI
//!
//! - report: Search flights and print/export the best-price report
//! - config: Configuration display and validation

pub mod config;
pub mod report;
