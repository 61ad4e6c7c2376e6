//! Key/value settings with environment-variable precedence.
//!
//! A [`Settings`] is an immutable snapshot of the process configuration
//! sources taken at construction time. Lookups consult environment
//! variables first and fall back to properties, so a deployment can
//! override any property without touching the application.

use std::collections::HashMap;

/// Environment switch selecting production behavior.
pub const PROD_MODE: &str = "PROD_MODE";

/// Disables serving content bundled with the application.
pub const DISABLE_BUNDLED_CONTENT: &str = "http.disable.classpath";

/// Disables serving content from the working directory.
pub const DISABLE_FILESYSTEM_CONTENT: &str = "http.disable.filesystem";

/// Disables response compression.
pub const DISABLE_GZIP: &str = "http.disable.gzip";

/// Enables the live-reload change notification endpoint.
pub const LIVE_RELOAD_SERVER: &str = "http.livereload.server";

/// Enables injection of the live-reload client script into pages.
pub const LIVE_RELOAD_SCRIPT: &str = "http.livereload.script";

/// Overrides the listen port.
pub const PORT: &str = "PORT";

/// An immutable snapshot of environment variables and properties.
///
/// # Example
///
/// ```rust
/// use hearth_config::{settings, Settings};
///
/// let snapshot = Settings::new()
///     .with_property(settings::PROD_MODE, "true")
///     .with_env_var(settings::PORT, "9090");
///
/// assert!(snapshot.boolean(settings::PROD_MODE, false));
/// assert_eq!(snapshot.raw(settings::PORT), Some("9090"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Settings {
    env: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl Settings {
    /// An empty snapshot, for building configuration by hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            env: std::env::vars().collect(),
            properties: HashMap::new(),
        }
    }

    /// Returns a copy with one property set.
    ///
    /// Properties rank below environment variables of the same key.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with one environment entry set.
    ///
    /// The entry shadows the snapshotted process environment for that key.
    #[must_use]
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Looks up a raw value: environment first, then properties.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .or_else(|| self.properties.get(key))
            .map(String::as_str)
    }

    /// Looks up a boolean value.
    ///
    /// Any value other than a case-insensitive `"true"` reads as false; a
    /// missing key yields `default`.
    #[must_use]
    pub fn boolean(&self, key: &str, default: bool) -> bool {
        self.raw(key)
            .map_or(default, |value| value.eq_ignore_ascii_case("true"))
    }
}
