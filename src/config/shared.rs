//! Hot-swappable configuration handle.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::Configuration;

/// Configuration shared by every client, replaced atomically on reload.
///
/// Readers never block; a reload is visible to the next lookup.
#[derive(Debug, Clone)]
pub struct SharedConfiguration {
    inner: Arc<ArcSwap<Configuration>>,
}

impl SharedConfiguration {
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Configuration> {
        self.inner.load_full()
    }

    /// Look up a value in the current snapshot.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.load().get(key).map(str::to_owned)
    }

    /// Replace the configuration for all holders of this handle.
    pub fn replace(&self, config: Configuration) {
        self.inner.store(Arc::new(config));
    }
}

impl Default for SharedConfiguration {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl From<Configuration> for SharedConfiguration {
    fn from(config: Configuration) -> Self {
        Self::new(config)
    }
}
