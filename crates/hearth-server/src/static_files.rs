//! Serving files from a single content root.
//!
//! [`StaticFiles`] serves files under one directory, with:
//!
//! - Index file fallback (`index.html`) for directory requests
//! - Cache headers (`Cache-Control`, `ETag`, `Last-Modified`)
//! - Conditional requests (`If-None-Match`, `If-Modified-Since`)
//! - Directory traversal prevention and hidden file filtering
//! - MIME type detection by extension
//!
//! # Example
//!
//! ```rust
//! use hearth_server::StaticFiles;
//!
//! let files = StaticFiles::new("./app")
//!     .index("index.html")
//!     .cache_control("max-age=3600");
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use http::{header, HeaderMap, Method, Response, StatusCode};
use http_body_util::Full;
use thiserror::Error;

use hearth_core::HttpResponse;

/// Errors produced while serving a static file.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The requested file does not exist under the root.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path is not allowed (traversal attempt or hidden file).
    #[error("forbidden path: {0}")]
    Forbidden(String),

    /// The method is neither GET nor HEAD.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A static file server over one content root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_file: Option<String>,
    cache_control: Option<String>,
    etag_enabled: bool,
    last_modified_enabled: bool,
    serve_hidden: bool,
}

impl StaticFiles {
    /// A server for the given root directory, with caching headers on and
    /// hidden files off.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            index_file: None,
            cache_control: None,
            etag_enabled: true,
            last_modified_enabled: true,
            serve_hidden: false,
        }
    }

    /// Sets the index file served for directory requests.
    #[must_use]
    pub fn index<S: Into<String>>(mut self, index: S) -> Self {
        self.index_file = Some(index.into());
        self
    }

    /// Sets the `Cache-Control` header value for responses.
    #[must_use]
    pub fn cache_control<S: Into<String>>(mut self, value: S) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Enables or disables `ETag` headers.
    #[must_use]
    pub fn etag(mut self, enabled: bool) -> Self {
        self.etag_enabled = enabled;
        self
    }

    /// Enables or disables `Last-Modified` headers.
    #[must_use]
    pub fn last_modified(mut self, enabled: bool) -> Self {
        self.last_modified_enabled = enabled;
        self
    }

    /// Enables or disables serving files whose name starts with a dot.
    #[must_use]
    pub fn serve_hidden(mut self, enabled: bool) -> Self {
        self.serve_hidden = enabled;
        self
    }

    /// The content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if this root contains a servable file for the request
    /// path. Forbidden paths count as not contained.
    #[must_use]
    pub fn contains(&self, request_path: &str) -> bool {
        let Ok(file_path) = self.resolve_path(request_path) else {
            return false;
        };
        if file_path.is_file() {
            return true;
        }
        if file_path.is_dir() {
            if let Some(index) = &self.index_file {
                return file_path.join(index).is_file();
            }
        }
        false
    }

    /// Serves the file for a request path.
    ///
    /// # Errors
    ///
    /// Fails when the method is not GET or HEAD, the path is forbidden, the
    /// file does not exist, or reading it fails.
    pub fn handle(
        &self,
        request_path: &str,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<HttpResponse, StaticFileError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let file_path = self.resolve_path(request_path)?;

        if file_path.is_dir() {
            if let Some(index) = &self.index_file {
                let index_path = file_path.join(index);
                if index_path.is_file() {
                    return self.serve_file(&index_path, headers, method);
                }
            }
            return Err(StaticFileError::NotFound(request_path.to_string()));
        }

        self.serve_file(&file_path, headers, method)
    }

    /// Resolves a request path against the root, rejecting traversal and
    /// hidden components.
    fn resolve_path(&self, request_path: &str) -> Result<PathBuf, StaticFileError> {
        let relative = request_path.trim_start_matches('/');

        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    return Err(StaticFileError::Forbidden(
                        "directory traversal not allowed".to_string(),
                    ));
                }
                Component::Normal(name) => {
                    if !self.serve_hidden
                        && name.to_str().is_some_and(|name| name.starts_with('.'))
                    {
                        return Err(StaticFileError::Forbidden(
                            "hidden files not served".to_string(),
                        ));
                    }
                }
                _ => {}
            }
        }

        let full_path = self.root.join(relative);
        let canonical = full_path
            .canonicalize()
            .map_err(|_| StaticFileError::NotFound(request_path.to_string()))?;

        // A symlink inside the root must not lead outside it.
        let canonical_root = self.root.canonicalize()?;
        if !canonical.starts_with(&canonical_root) {
            return Err(StaticFileError::Forbidden(
                "path escapes the content root".to_string(),
            ));
        }

        Ok(canonical)
    }

    fn serve_file(
        &self,
        path: &Path,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<HttpResponse, StaticFileError> {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata.modified().ok();

        let etag = if self.etag_enabled {
            Self::file_etag(&metadata, path)
        } else {
            None
        };

        if let Some(response) = self.check_conditional(headers, etag.as_deref(), modified) {
            return Ok(response);
        }

        let mime_type = mime_type_for(path);
        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(std::fs::read(path)?)
        };
        let content_length = if method == Method::HEAD {
            metadata.len()
        } else {
            body.len() as u64
        };

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_LENGTH, content_length.to_string());

        if let Some(cache_control) = &self.cache_control {
            builder = builder.header(header::CACHE_CONTROL, cache_control.as_str());
        }
        if let Some(etag) = &etag {
            builder = builder.header(header::ETAG, etag.as_str());
        }
        if self.last_modified_enabled {
            if let Some(modified) = modified {
                builder = builder.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
            }
        }

        builder
            .body(Full::new(body))
            .map_err(|e| StaticFileError::Io(std::io::Error::other(e.to_string())))
    }

    /// Answers 304 when the client's validators still hold.
    fn check_conditional(
        &self,
        headers: &HeaderMap,
        etag: Option<&str>,
        modified: Option<SystemTime>,
    ) -> Option<HttpResponse> {
        if let Some(etag) = etag {
            if let Some(value) = headers
                .get(header::IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
            {
                if value == etag || value == "*" {
                    return Some(self.not_modified_response(etag));
                }
            }
        }

        if self.last_modified_enabled {
            if let (Some(modified), Some(value)) = (
                modified,
                headers
                    .get(header::IF_MODIFIED_SINCE)
                    .and_then(|v| v.to_str().ok()),
            ) {
                if let Ok(since) = httpdate::parse_http_date(value) {
                    // HTTP dates carry second precision.
                    let unchanged = as_unix_secs(modified)
                        .zip(as_unix_secs(since))
                        .is_some_and(|(file, header)| file <= header);
                    if unchanged {
                        return Some(self.not_modified_response(etag.unwrap_or_default()));
                    }
                }
            }
        }

        None
    }

    fn not_modified_response(&self, etag: &str) -> HttpResponse {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        if !etag.is_empty() {
            if let Ok(value) = header::HeaderValue::from_str(etag) {
                response.headers_mut().insert(header::ETAG, value);
            }
        }
        if let Some(cache_control) = &self.cache_control {
            if let Ok(value) = header::HeaderValue::from_str(cache_control) {
                response.headers_mut().insert(header::CACHE_CONTROL, value);
            }
        }
        response
    }

    fn file_etag(metadata: &std::fs::Metadata, path: &Path) -> Option<String> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let modified = metadata.modified().ok()?;
        let secs = as_unix_secs(modified)?;

        // Distinguishes different files sharing a size and mtime.
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);

        Some(format!(
            "\"{secs}-{}-{}\"",
            metadata.len(),
            hasher.finish() % 10000
        ))
    }
}

fn as_unix_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

/// MIME type for a file, by extension.
fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "wasm" => "application/wasm",
        "webmanifest" | "manifest" => "application/manifest+json",
        _ => "application/octet-stream",
    }
}
