pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod oauth;
pub mod providers;
pub mod report;

pub use logging::init_tracing;
