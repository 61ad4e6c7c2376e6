//! Environment configuration and folder watching for the Hearth server.
//!
//! This crate provides the server's configuration layer:
//! - [`Settings`] - a snapshot of environment variables and properties,
//!   with environment-first precedence
//! - [`Env`] - the immutable server environment with copy-on-write
//!   mutators and `prod`/`dev` presets
//! - [`FolderWatch`] - a recursive content-folder watcher backing live
//!   reload
//!
//! # Overview
//!
//! Configuration is resolved once, at construction time. An [`Env`] never
//! re-reads the process environment, so every component sees one coherent
//! configuration for the server's lifetime. Tests build their own
//! [`Settings`] instead of mutating the real process environment.
//!
//! # Example
//!
//! ```rust
//! use hearth_config::{settings, Env, Settings};
//!
//! # fn main() -> Result<(), hearth_config::ConfigError> {
//! let snapshot = Settings::new().with_property(settings::PORT, "9090");
//! let env = Env::from_settings(&snapshot).with_prod_mode(true);
//!
//! assert!(env.prod_mode());
//! assert_eq!(env.overridden_port(8080)?, 9090);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod env;
mod error;
pub mod settings;
mod watcher;

pub use env::Env;
pub use error::ConfigError;
pub use settings::Settings;
pub use watcher::{ChangeKind, FolderChange, FolderWatch};
