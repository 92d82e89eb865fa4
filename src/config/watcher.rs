//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::loader::load_config;
use crate::config::shared::SharedConfiguration;

/// A watcher that reloads the configuration file into a shared handle.
pub struct ConfigWatcher {
    path: PathBuf,
    target: SharedConfiguration,
}

impl ConfigWatcher {
    /// Create a watcher publishing into `target`.
    pub fn new(path: &Path, target: SharedConfiguration) -> Self {
        Self {
            path: path.to_path_buf(),
            target,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for reloads to continue.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let target = self.target.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        match load_config(&path) {
                            Ok(loaded) => target.replace(loaded.values),
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use std::io::Write;

    #[test]
    fn test_missing_file_cannot_be_watched() {
        let watcher = ConfigWatcher::new(Path::new("/definitely/not/here.toml"), SharedConfiguration::default());
        assert!(watcher.run().is_err());
    }

    #[tokio::test]
    async fn test_reload_replaces_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Orders]\nBaseUrl = \"http://v1\"").unwrap();

        let shared = SharedConfiguration::new(Configuration::from_pairs([("Orders:BaseUrl", "http://v1")]));
        let _watcher = ConfigWatcher::new(file.path(), shared.clone()).run().unwrap();

        std::fs::write(file.path(), "[Orders]\nBaseUrl = \"http://v2\"\n").unwrap();

        let mut reloaded = false;
        for _ in 0..50 {
            if shared.get("Orders:BaseUrl").as_deref() == Some("http://v2") {
                reloaded = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(reloaded, "configuration was not reloaded");
    }
}
