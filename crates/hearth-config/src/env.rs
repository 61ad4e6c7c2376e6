//! The immutable server environment.
//!
//! An [`Env`] captures every configuration decision at construction time:
//! working directory, mode flags, content roots, and the port override.
//! It never re-reads the process environment afterwards, so two requests
//! served by the same Env always see the same configuration. The `with_*`
//! mutators are copy-on-write and return a new Env; the original is
//! untouched and remains valid.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::error::ConfigError;
use crate::settings::{self, Settings};
use crate::watcher::FolderWatch;

/// Folder under the working directory that holds application content.
const APP_FOLDER: &str = "app";

/// An immutable snapshot of the server configuration.
///
/// # Example
///
/// ```rust
/// use hearth_config::Env;
///
/// let env = Env::dev().with_gzip(true);
/// assert!(!env.prod_mode());
/// assert!(env.gzip());
/// assert_eq!(env.app_folder(), "app");
/// ```
#[derive(Debug, Clone)]
pub struct Env {
    working_dir: PathBuf,
    prod_mode: bool,
    class_path: bool,
    filesystem: bool,
    gzip: bool,
    live_reload_server: bool,
    inject_live_reload_script: bool,
    bundled_roots: Vec<PathBuf>,
    port_override: Option<String>,
    watcher: Arc<OnceLock<Arc<FolderWatch>>>,
}

impl Env {
    /// Builds an Env by resolving every flag against the given settings.
    #[must_use]
    pub fn from_settings(snapshot: &Settings) -> Self {
        Self {
            working_dir: PathBuf::from("."),
            prod_mode: snapshot.boolean(settings::PROD_MODE, false),
            class_path: !snapshot.boolean(settings::DISABLE_BUNDLED_CONTENT, false),
            filesystem: !snapshot.boolean(settings::DISABLE_FILESYSTEM_CONTENT, false),
            gzip: !snapshot.boolean(settings::DISABLE_GZIP, false),
            live_reload_server: snapshot.boolean(settings::LIVE_RELOAD_SERVER, true),
            inject_live_reload_script: snapshot.boolean(settings::LIVE_RELOAD_SCRIPT, true),
            bundled_roots: Vec::new(),
            port_override: snapshot.raw(settings::PORT).map(str::to_string),
            watcher: Arc::new(OnceLock::new()),
        }
    }

    /// A production preset: all content sources and gzip on, live reload
    /// off. Only the `PORT` override is still taken from the process
    /// environment.
    #[must_use]
    pub fn prod() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            prod_mode: true,
            class_path: true,
            filesystem: true,
            gzip: true,
            live_reload_server: false,
            inject_live_reload_script: false,
            bundled_roots: Vec::new(),
            port_override: Settings::from_process()
                .raw(settings::PORT)
                .map(str::to_string),
            watcher: Arc::new(OnceLock::new()),
        }
    }

    /// A development preset: live reload on, gzip off.
    #[must_use]
    pub fn dev() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            prod_mode: false,
            class_path: true,
            filesystem: true,
            gzip: false,
            live_reload_server: true,
            inject_live_reload_script: true,
            bundled_roots: Vec::new(),
            port_override: Settings::from_process()
                .raw(settings::PORT)
                .map(str::to_string),
            watcher: Arc::new(OnceLock::new()),
        }
    }

    /// A copy of this Env with its own fresh watcher slot.
    fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.watcher = Arc::new(OnceLock::new());
        copy
    }

    /// Returns a copy with a different working directory.
    #[must_use]
    pub fn with_working_dir(&self, dir: impl Into<PathBuf>) -> Self {
        let mut copy = self.fresh();
        copy.working_dir = dir.into();
        copy
    }

    /// Returns a copy with production mode toggled.
    #[must_use]
    pub fn with_prod_mode(&self, prod_mode: bool) -> Self {
        let mut copy = self.fresh();
        copy.prod_mode = prod_mode;
        copy
    }

    /// Returns a copy with the bundled content source toggled.
    #[must_use]
    pub fn with_class_path(&self, class_path: bool) -> Self {
        let mut copy = self.fresh();
        copy.class_path = class_path;
        copy
    }

    /// Returns a copy with the filesystem content source toggled.
    #[must_use]
    pub fn with_filesystem(&self, filesystem: bool) -> Self {
        let mut copy = self.fresh();
        copy.filesystem = filesystem;
        copy
    }

    /// Returns a copy with gzip toggled.
    #[must_use]
    pub fn with_gzip(&self, gzip: bool) -> Self {
        let mut copy = self.fresh();
        copy.gzip = gzip;
        copy
    }

    /// Returns a copy with the live-reload watcher toggled.
    #[must_use]
    pub fn with_live_reload_server(&self, enabled: bool) -> Self {
        let mut copy = self.fresh();
        copy.live_reload_server = enabled;
        copy
    }

    /// Returns a copy with live-reload script injection toggled.
    #[must_use]
    pub fn with_inject_live_reload_script(&self, enabled: bool) -> Self {
        let mut copy = self.fresh();
        copy.inject_live_reload_script = enabled;
        copy
    }

    /// Returns a copy with one more bundled content root appended.
    #[must_use]
    pub fn with_bundled_root(&self, root: impl Into<PathBuf>) -> Self {
        let mut copy = self.fresh();
        copy.bundled_roots.push(root.into());
        copy
    }

    /// The working directory content is served relative to.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// True in production mode.
    #[must_use]
    pub fn prod_mode(&self) -> bool {
        self.prod_mode
    }

    /// True when bundled content roots are served.
    #[must_use]
    pub fn class_path(&self) -> bool {
        self.class_path
    }

    /// True when filesystem content is served.
    #[must_use]
    pub fn filesystem(&self) -> bool {
        self.filesystem
    }

    /// True when responses may be gzip compressed.
    #[must_use]
    pub fn gzip(&self) -> bool {
        self.gzip
    }

    /// True when the live-reload watcher should run.
    #[must_use]
    pub fn live_reload_server(&self) -> bool {
        self.live_reload_server
    }

    /// True when the live-reload client script is injected into pages.
    #[must_use]
    pub fn inject_live_reload_script(&self) -> bool {
        self.inject_live_reload_script
    }

    /// Extra content roots registered by the embedding application.
    #[must_use]
    pub fn bundled_roots(&self) -> &[PathBuf] {
        &self.bundled_roots
    }

    /// Name of the application content folder under the working directory.
    #[must_use]
    pub fn app_folder(&self) -> &str {
        APP_FOLDER
    }

    /// The content folders live reload should watch, given the enabled
    /// sources.
    #[must_use]
    pub fn folders_to_watch(&self) -> Vec<PathBuf> {
        let mut folders = Vec::new();
        if self.class_path {
            folders.extend(self.bundled_roots.iter().cloned());
        }
        if self.filesystem {
            folders.push(self.working_dir.join(APP_FOLDER));
        }
        folders
    }

    /// The listen port: the captured `PORT` override if present, otherwise
    /// the given default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when the override is present
    /// but not a valid port number. Configuration this broken should stop
    /// startup, not fall back silently.
    pub fn overridden_port(&self, default: u16) -> Result<u16, ConfigError> {
        match &self.port_override {
            None => Ok(default),
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidPort {
                value: value.clone(),
                source,
            }),
        }
    }

    /// The folder watcher for this Env, created on first use.
    ///
    /// Exactly one watcher exists per Env instance, watching the
    /// [`folders_to_watch`](Env::folders_to_watch) snapshot taken at first
    /// call. Clones share the watcher; `with_*` copies get their own.
    #[must_use]
    pub fn folder_watcher(&self) -> Arc<FolderWatch> {
        Arc::clone(
            self.watcher
                .get_or_init(|| Arc::new(FolderWatch::start(&self.folders_to_watch()))),
        )
    }

    /// The folder watcher, if one has been created already. Lets shutdown
    /// paths stop an existing watcher without creating one.
    #[must_use]
    pub fn started_folder_watcher(&self) -> Option<Arc<FolderWatch>> {
        self.watcher.get().map(Arc::clone)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::from_settings(&Settings::from_process())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_settings() -> Settings {
        // Process-independent baseline for deterministic tests.
        Settings::new()
    }

    #[test]
    fn test_default_flags() {
        let env = Env::from_settings(&quiet_settings());
        assert!(!env.prod_mode());
        assert!(env.class_path());
        assert!(env.filesystem());
        assert!(env.gzip());
        assert!(env.live_reload_server());
        assert!(env.inject_live_reload_script());
        assert_eq!(env.working_dir(), Path::new("."));
    }

    #[test]
    fn test_disable_keys_invert() {
        let snapshot = quiet_settings()
            .with_property(settings::DISABLE_GZIP, "true")
            .with_property(settings::DISABLE_FILESYSTEM_CONTENT, "true");
        let env = Env::from_settings(&snapshot);
        assert!(!env.gzip());
        assert!(!env.filesystem());
        assert!(env.class_path());
    }

    #[test]
    fn test_mutators_do_not_touch_the_original() {
        let original = Env::from_settings(&quiet_settings());
        let changed = original.with_prod_mode(true).with_gzip(false);

        assert!(!original.prod_mode());
        assert!(original.gzip());
        assert!(changed.prod_mode());
        assert!(!changed.gzip());
    }

    #[test]
    fn test_presets() {
        let prod = Env::prod();
        assert!(prod.prod_mode());
        assert!(prod.gzip());
        assert!(!prod.live_reload_server());
        assert!(!prod.inject_live_reload_script());

        let dev = Env::dev();
        assert!(!dev.prod_mode());
        assert!(!dev.gzip());
        assert!(dev.live_reload_server());
        assert!(dev.inject_live_reload_script());

        // Both presets enable the filesystem source, so both watch the
        // app folder under the working directory.
        assert!(prod.folders_to_watch().contains(&PathBuf::from("./app")));
        assert!(dev.folders_to_watch().contains(&PathBuf::from("./app")));
    }

    #[test]
    fn test_folders_to_watch_composition() {
        let env = Env::from_settings(&quiet_settings())
            .with_working_dir("/srv/site")
            .with_bundled_root("/opt/bundled");

        let folders = env.folders_to_watch();
        assert_eq!(
            folders,
            vec![PathBuf::from("/opt/bundled"), PathBuf::from("/srv/site/app")]
        );
    }

    #[test]
    fn test_folders_to_watch_respects_disabled_sources() {
        let env = Env::from_settings(&quiet_settings())
            .with_bundled_root("/opt/bundled")
            .with_class_path(false);
        assert_eq!(env.folders_to_watch(), vec![PathBuf::from("./app")]);

        let nothing = env.with_filesystem(false);
        assert!(nothing.folders_to_watch().is_empty());
    }

    #[test]
    fn test_overridden_port() {
        let env = Env::from_settings(&quiet_settings().with_property(settings::PORT, "9090"));
        assert_eq!(env.overridden_port(8080).unwrap(), 9090);

        let no_override = Env::from_settings(&quiet_settings());
        assert_eq!(no_override.overridden_port(8080).unwrap(), 8080);
    }

    #[test]
    fn test_malformed_port_is_fatal() {
        let env = Env::from_settings(&quiet_settings().with_property(settings::PORT, "eighty"));
        let err = env.overridden_port(8080).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == "eighty"));
    }

    #[test]
    fn test_env_var_beats_property_for_port() {
        let snapshot = quiet_settings()
            .with_property(settings::PORT, "1111")
            .with_env_var(settings::PORT, "2222");
        let env = Env::from_settings(&snapshot);
        assert_eq!(env.overridden_port(8080).unwrap(), 2222);
    }

    #[test]
    fn test_folder_watcher_is_memoized() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("app")).unwrap();
        let env = Env::from_settings(&quiet_settings()).with_working_dir(temp_dir.path());

        let first = env.folder_watcher();
        let second = env.folder_watcher();
        assert!(Arc::ptr_eq(&first, &second));

        // Clones share the slot.
        let cloned = env.clone();
        assert!(Arc::ptr_eq(&first, &cloned.folder_watcher()));

        // Mutated copies get their own.
        let fresh = env.with_gzip(false);
        assert!(!Arc::ptr_eq(&first, &fresh.folder_watcher()));
    }
}
