//! The ordered chain of content sources.
//!
//! A server can serve content from several roots: bundled roots registered
//! by the embedding application, then the `app` folder under the working
//! directory. [`ContentSources`] is that ordered chain: the first root
//! containing a resource serves it, and a resource no root contains is a
//! 404.

use bytes::Bytes;
use http::{HeaderMap, Method, Response, StatusCode};
use http_body_util::Full;

use hearth_config::Env;
use hearth_core::{ContentResolver, HttpResponse};

use crate::static_files::StaticFiles;

/// Default cache policy for served content.
const CACHE_CONTROL: &str = "max-age=3600";

/// The ordered content roots of a server environment.
#[derive(Debug)]
pub struct ContentSources {
    sources: Vec<StaticFiles>,
}

impl ContentSources {
    /// Builds the chain the environment's flags call for: bundled roots
    /// first, then the filesystem app folder.
    #[must_use]
    pub fn from_env(env: &Env) -> Self {
        let mut sources = Vec::new();
        if env.class_path() {
            for root in env.bundled_roots() {
                sources.push(Self::source_for(root));
            }
        }
        if env.filesystem() {
            sources.push(Self::source_for(
                &env.working_dir().join(env.app_folder()),
            ));
        }
        Self { sources }
    }

    /// A chain over explicit roots, in the given order.
    #[must_use]
    pub fn from_roots<P: AsRef<std::path::Path>>(roots: &[P]) -> Self {
        Self {
            sources: roots.iter().map(Self::source_for).collect(),
        }
    }

    fn source_for<P: AsRef<std::path::Path>>(root: P) -> StaticFiles {
        StaticFiles::new(root)
            .index("index.html")
            .cache_control(CACHE_CONTROL)
    }

    /// Returns the number of configured roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no roots are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn not_found() -> HttpResponse {
        let mut response = Response::new(Full::new(Bytes::from_static(b"Not Found")));
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    }

    fn error_response(status: StatusCode) -> HttpResponse {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response
    }
}

impl ContentResolver for ContentSources {
    fn resolve(&self, path: &str, headers: &HeaderMap, method: &Method) -> HttpResponse {
        for source in &self.sources {
            if !source.contains(path) {
                continue;
            }
            return match source.handle(path, headers, method) {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(
                        root = %source.root().display(),
                        path,
                        %error,
                        "static file request failed"
                    );
                    Self::error_response(error.status_code())
                }
            };
        }
        Self::not_found()
    }
}
