//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, flatten, apply SVC_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (typed sections) + Configuration (flat "Service:Key" view)
//!     → SharedConfiguration handed to every service client
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → atomic swap inside SharedConfiguration
//!     → clients resolve base URLs from the new snapshot on their next call
//! ```
//!
//! # Design Decisions
//! - A missing base URL is a call-time error, not a startup error
//! - All typed fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError, LoadedConfig};
pub use schema::{AppConfig, Configuration, DocsConfig, HelperSettings, RelayConfig};
pub use shared::SharedConfiguration;
