//! Static content serving and the Hearth server facade.
//!
//! This crate assembles the routing core and the configuration layer into
//! a servable whole:
//! - [`StaticFiles`] - one content root with cache headers, conditional
//!   requests, and traversal protection
//! - [`ContentSources`] - the ordered chain of content roots an
//!   environment enables
//! - [`Server`] - environment plus route configuration, with live reload
//!   of the route table outside production mode
//!
//! # Example
//!
//! ```rust
//! use hearth_config::{Env, Settings};
//! use hearth_core::{responses, Exchange};
//! use hearth_server::Server;
//!
//! let env = Env::from_settings(&Settings::new()).with_live_reload_server(false);
//! let server = Server::new(env).configure(|routes| {
//!     let _ = routes.get1("/hello/:name", |name, _exchange| {
//!         Ok(responses::text(format!("Hello {name}")))
//!     });
//! });
//! server.start();
//!
//! let mut exchange = Exchange::get("/hello/Bob").unwrap();
//! assert!(server.handle(&mut exchange));
//! ```

#![forbid(unsafe_code)]

mod content;
mod server;
mod static_files;

pub use content::ContentSources;
pub use server::Server;
pub use static_files::{StaticFileError, StaticFiles};
