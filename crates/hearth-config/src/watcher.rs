//! Folder watching for live reload.
//!
//! A [`FolderWatch`] monitors a set of content folders recursively and
//! broadcasts a [`FolderChange`] whenever files under them are created,
//! modified, or deleted. Subscribers (typically the live-reload endpoint)
//! receive change notifications over a broadcast channel; rapid bursts of
//! file system events are coalesced into a single notification.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::broadcast;

/// Window within which file system events collapse into one notification.
const COALESCE_WINDOW: Duration = Duration::from_millis(200);

/// Capacity of the change broadcast channel.
const CHANNEL_CAPACITY: usize = 64;

/// Kind of folder content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A file or folder was created.
    Created,
    /// A file or folder was modified.
    Modified,
    /// A file or folder was deleted.
    Deleted,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Deleted,
            EventKind::Modify(_) | EventKind::Access(_) | EventKind::Other | EventKind::Any => {
                ChangeKind::Modified
            }
        }
    }
}

/// A change notification for a watched folder.
#[derive(Debug, Clone)]
pub struct FolderChange {
    /// Path that changed, as reported by the file system.
    pub path: PathBuf,
    /// Kind of change.
    pub kind: ChangeKind,
}

/// A recursive watch over a set of content folders.
///
/// Construction never fails: folders that do not exist or cannot be
/// watched are logged and skipped, and a watch with no live folders is
/// simply inert. This keeps development servers usable when some content
/// roots are absent.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use hearth_config::FolderWatch;
///
/// # async fn example() {
/// let watch = FolderWatch::start(&[PathBuf::from("app")]);
/// let mut changes = watch.subscribe();
///
/// while let Ok(change) = changes.recv().await {
///     println!("changed: {}", change.path.display());
/// }
/// # }
/// ```
pub struct FolderWatch {
    watcher: Mutex<Option<RecommendedWatcher>>,
    tx: broadcast::Sender<FolderChange>,
    watched: Vec<PathBuf>,
    stopped: Arc<AtomicBool>,
}

impl FolderWatch {
    /// Starts watching the given folders recursively.
    #[must_use]
    pub fn start(folders: &[PathBuf]) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        let stopped = Arc::new(AtomicBool::new(false));

        let mut watcher = match Self::spawn_watcher(tx.clone(), Arc::clone(&stopped)) {
            Ok(watcher) => Some(watcher),
            Err(error) => {
                tracing::error!(%error, "could not create folder watcher; live reload disabled");
                None
            }
        };

        let mut watched = Vec::new();
        if let Some(active) = watcher.as_mut() {
            for folder in folders {
                match active.watch(folder, RecursiveMode::Recursive) {
                    Ok(()) => watched.push(folder.clone()),
                    Err(error) => {
                        tracing::warn!(
                            folder = %folder.display(),
                            %error,
                            "skipping unwatchable folder"
                        );
                    }
                }
            }
        }
        if watcher.is_some() && watched.is_empty() {
            tracing::error!("no watchable folders; live reload disabled");
            watcher = None;
        }

        Self {
            watcher: Mutex::new(watcher),
            tx,
            watched,
            stopped,
        }
    }

    fn spawn_watcher(
        tx: broadcast::Sender<FolderChange>,
        stopped: Arc<AtomicBool>,
    ) -> notify::Result<RecommendedWatcher> {
        let last_emit: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

        notify::recommended_watcher(move |result: notify::Result<Event>| {
            if stopped.load(Ordering::SeqCst) {
                return;
            }
            let event = match result {
                Ok(event) => event,
                Err(error) => {
                    tracing::warn!(%error, "folder watch event error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            let Some(path) = event.paths.first() else {
                return;
            };

            // Editors fire bursts of events per save; collapse a burst into
            // one notification.
            let now = Instant::now();
            if let Ok(mut last) = last_emit.lock() {
                if last.is_some_and(|at| now.duration_since(at) < COALESCE_WINDOW) {
                    return;
                }
                *last = Some(now);
            }

            // Nobody listening is fine.
            let _ = tx.send(FolderChange {
                path: path.clone(),
                kind: ChangeKind::from(&event.kind),
            });
        })
    }

    /// Subscribes to change notifications.
    ///
    /// Each receiver sees every notification sent after it subscribed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FolderChange> {
        self.tx.subscribe()
    }

    /// Returns true if the watch has live folders and has not been stopped.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
            && self.watcher.lock().is_ok_and(|guard| guard.is_some())
    }

    /// The folders actually under watch (unwatchable ones were skipped).
    #[must_use]
    pub fn watched_folders(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Returns true if the given folder is under watch.
    #[must_use]
    pub fn watches(&self, folder: &Path) -> bool {
        self.watched.iter().any(|watched| watched == folder)
    }

    /// Stops the watch. Safe to call more than once.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut guard) = self.watcher.lock() {
            guard.take();
        }
    }
}

impl std::fmt::Debug for FolderWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderWatch")
            .field("watched", &self.watched)
            .field("stopped", &self.stopped.load(Ordering::SeqCst))
            .finish()
    }
}

impl Drop for FolderWatch {
    fn drop(&mut self) {
        self.stop();
    }
}
