//! Logging setup and secret masking
//!
//! Client secrets and bearer tokens must never reach the logs in clear text.

use std::fmt;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Logs go to stderr so that tables printed on stdout stay clean.
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Masked representation of a credential
///
/// Shows only the first 4 characters followed by `***`
#[derive(Clone, Debug)]
pub struct SensitiveValue<'a> {
    inner: &'a str,
}

impl<'a> SensitiveValue<'a> {
    /// # Example
    /// ```
    /// use flight_report::logging::SensitiveValue;
    ///
    /// let secret = "5htTldQeWUr48sr4";
    /// assert_eq!(SensitiveValue::new(secret).to_string(), "5htT***");
    /// ```
    pub fn new(value: &'a str) -> Self {
        Self { inner: value }
    }
}

impl<'a> fmt::Display for SensitiveValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 4;
        if self.inner.len() <= visible_len * 2 || !self.inner.is_char_boundary(visible_len) {
            write!(f, "***")
        } else {
            write!(f, "{}***", &self.inner[..visible_len])
        }
    }
}

/// Mask a credential for display, keeping an empty value empty
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        SensitiveValue::new(value).to_string()
    }
}
