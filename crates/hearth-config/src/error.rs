//! Configuration error types.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors produced while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `PORT` override is present but is not a valid port number.
    #[error("invalid PORT override {value:?}")]
    InvalidPort {
        /// The raw override value as found in the environment.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}
