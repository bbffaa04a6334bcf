//! Hot reload of the edge configuration file.
//!
//! The parent directory is watched rather than the file itself: editors and
//! deploy tools usually save by writing a sibling and renaming it over the
//! original, which replaces the inode a file-level watch is attached to.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::EdgeConfig;

/// Publishes a freshly validated [`EdgeConfig`] whenever the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<EdgeConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end the server listens on.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<EdgeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(&self.path);
        let file_name: OsString = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| {
                notify::Error::generic(&format!("{} is not a file path", self.path.display()))
            })?;

        let path = self.path.clone();
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_config(&event, &file_name) => match load_config(&path) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Edge config changed, reloading");
                        let _ = tx.send(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unusable edge config");
                    }
                },
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch failed"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = %dir.display(), file = %self.path.display(), "Watching edge config");
        Ok(watcher)
    }
}

/// Directory holding `path`; a bare file name lives in the working directory.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes, creations and renames that land on the config file itself.
fn touches_config(event: &Event, file_name: &OsStr) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};
    use std::fs;

    async fn next_session_cookie(
        updates: &mut mpsc::UnboundedReceiver<EdgeConfig>,
        expected: &str,
    ) -> EdgeConfig {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let config = updates.recv().await.expect("watcher channel closed");
                if config.auth.session_cookie == expected {
                    return config;
                }
            }
        })
        .await
        .expect("no reload observed")
    }

    fn replace_by_rename(dir: &Path, target: &Path, content: &str) {
        let staged = dir.join("edge.toml.partial");
        fs::write(&staged, content).unwrap();
        fs::rename(&staged, target).unwrap();
    }

    #[tokio::test]
    async fn test_reloads_across_rename_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        fs::write(&path, "[auth]\nsession_cookie = \"sid\"\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        replace_by_rename(dir.path(), &path, "[auth]\nsession_cookie = \"session\"\n");
        let config = next_session_cookie(&mut updates, "session").await;
        assert_eq!(config.locales.default, "en");

        // The inode changed above; a second save must still be seen.
        replace_by_rename(dir.path(), &path, "[auth]\nsession_cookie = \"token\"\n");
        next_session_cookie(&mut updates, "token").await;
    }

    #[test]
    fn test_events_filtered_by_file_name() {
        let name = OsStr::new("edge.toml");
        let event = |kind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

        assert!(touches_config(
            &event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), "/etc/edge/edge.toml"),
            name
        ));
        assert!(touches_config(
            &event(EventKind::Create(CreateKind::File), "/etc/edge/edge.toml"),
            name
        ));
        assert!(!touches_config(
            &event(EventKind::Modify(ModifyKind::Any), "/etc/edge/edge.toml.partial"),
            name
        ));
        assert!(!touches_config(
            &event(EventKind::Remove(RemoveKind::File), "/etc/edge/edge.toml"),
            name
        ));
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("edge.toml")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("/etc/edge/edge.toml")), PathBuf::from("/etc/edge"));
    }
}
