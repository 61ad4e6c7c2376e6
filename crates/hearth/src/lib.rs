//! # Hearth
//!
//! **An embedded HTTP routing and static content server**
//!
//! Hearth is a small server core for applications that embed their HTTP
//! surface instead of deploying behind a framework:
//!
//! - **Ordered routing** - first-match-wins dispatch over URI patterns
//!   with `:name` placeholders and trailing `*name` wildcards
//! - **Declarative resources** - application objects enumerate their
//!   routes as descriptors
//! - **Static content chain** - bundled and filesystem roots with cache
//!   headers and conditional requests
//! - **Immutable environment** - configuration resolved once, with
//!   copy-on-write overrides and `prod`/`dev` presets
//! - **Live reload** - content folders are watched and the route table is
//!   rebuilt and swapped atomically on change
//!
//! ## Quick Start
//!
//! ```rust
//! use hearth::prelude::*;
//!
//! let env = Env::from_settings(&Settings::new()).with_live_reload_server(false);
//! let server = Server::new(env).configure(|routes| {
//!     let _ = routes.get("/", |_exchange| Ok(responses::html("<h1>Hello</h1>")));
//!     let _ = routes.get1("/greet/:name", |name, _exchange| {
//!         Ok(responses::text(format!("Hello {name}")))
//!     });
//! });
//! server.start();
//!
//! let mut exchange = Exchange::get("/greet/Bob").unwrap();
//! assert!(server.handle(&mut exchange));
//! ```

#![forbid(unsafe_code)]

// Re-export routing primitives
pub use hearth_router as router;

// Re-export the routing core
pub use hearth_core as core;

// Re-export configuration
pub use hearth_config as config;

// Re-export the server facade
pub use hearth_server as server;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hearth::prelude::*;
/// ```
pub mod prelude {
    pub use hearth_config::{settings, ChangeKind, Env, FolderChange, FolderWatch, Settings};

    pub use hearth_core::{
        responses, Exchange, Handler, HandlerError, HandlerResult, HttpResponse, Resource,
        RouteCollection, RouteDescriptor, RouteError,
    };

    pub use hearth_router::{Captures, UriPattern};

    pub use hearth_server::{ContentSources, Server, StaticFiles};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_facade_wires_the_stack_together() {
        let env = Env::from_settings(&Settings::new())
            .with_live_reload_server(false)
            .with_filesystem(false)
            .with_class_path(false);
        let server = Server::new(env).configure(|routes| {
            let _ = routes.get("/ping", |_ex| Ok(responses::text("pong")));
        });
        server.start();

        let mut exchange = Exchange::get("/ping").unwrap();
        assert!(server.handle(&mut exchange));
    }
}
