use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Writes closer together than this are reported as a single change.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the config file and sends one notification per burst of writes.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by renaming a temp file over the original are still seen.
/// Dropping the watcher stops the background task.
pub struct ConfigWatcher {
    path: PathBuf,
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let task = tokio::spawn(watch_loop(path.clone(), tx));

        (Self { path, task }, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

    let Some(file_name) = path.file_name().map(|n| n.to_os_string()) else {
        error!("Config path '{}' has no file name; not watching", path.display());
        return;
    };
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        warn!("Cannot watch '{}': {e}; live reload disabled", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        let touches_config = match event {
            Ok(e) => {
                matches!(e.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && e.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str()))
            }
            Err(e) => {
                warn!("Watcher error: {e}");
                false
            }
        };
        if !touches_config {
            continue;
        }

        // Swallow the rest of the burst before reporting.
        while let Ok(Some(_)) = tokio::time::timeout(DEBOUNCE, sync_rx.recv()).await {}

        debug!("Config change detected");
        if tx.send(()).await.is_err() {
            break; // receiver dropped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("routerdash-watch-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn burst_of_writes_is_one_change() {
        let dir = temp_dir("burst");
        let path = dir.join("routerdash.toml");
        std::fs::write(&path, "[global]\n").unwrap();

        let (watcher, mut changes) = ConfigWatcher::spawn(&path);
        assert_eq!(watcher.path(), path.as_path());
        // Let the watch loop register the directory.
        tokio::time::sleep(Duration::from_millis(300)).await;

        for i in 0..3 {
            std::fs::write(&path, format!("[history]\ncpu_points = {}\n", 10 + i)).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let first = tokio::time::timeout(Duration::from_secs(5), changes.recv()).await;
        assert_eq!(first.unwrap(), Some(()));
        let second = tokio::time::timeout(DEBOUNCE * 3, changes.recv()).await;
        assert!(second.is_err(), "writes within the debounce window must coalesce");

        drop(watcher);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn other_files_in_the_directory_are_ignored() {
        let dir = temp_dir("other");
        let path = dir.join("routerdash.toml");
        std::fs::write(&path, "").unwrap();

        let (_watcher, mut changes) = ConfigWatcher::spawn(&path);
        tokio::time::sleep(Duration::from_millis(300)).await;

        std::fs::write(dir.join("notes.txt"), "unrelated").unwrap();
        let quiet = tokio::time::timeout(Duration::from_millis(600), changes.recv()).await;
        assert!(quiet.is_err());

        std::fs::write(&path, "[global]\n").unwrap();
        let change = tokio::time::timeout(Duration::from_secs(5), changes.recv()).await;
        assert_eq!(change.unwrap(), Some(()));

        let _ = std::fs::remove_dir_all(dir);
    }
}
