pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, ProviderBackend, ProviderConfig, StoreConfig, SyncConfig};
pub use paths::{PathManager, container_base_path};
