//! Build errors for query managers.

use crate::error::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a query manager.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transport not specified. Call .transport(transport) before .build()")]
    MissingTransport,

    #[error("Initial options are invalid: {0}")]
    InvalidOptions(#[from] ConfigError),

    #[error("No Tokio runtime to run the initial request on. Build inside a runtime or call .pause(true)")]
    NoRuntime,
}
