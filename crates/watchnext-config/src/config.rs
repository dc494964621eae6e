use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use crate::paths::PathManager;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Which provider implementation backs the channel and watch next tables
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderBackend {
    /// Tables persisted as JSON in the data directory
    File,
    /// Tables live only for the lifetime of the process
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_backend")]
    pub backend: ProviderBackend,
    /// Scheme of the app-link and intent URIs written on channels and programs
    #[serde(default = "default_app_link_scheme")]
    pub app_link_scheme: String,
    #[serde(default = "default_app_link_host")]
    pub app_link_host: String,
    /// Input id written on every channel this app publishes
    #[serde(default = "default_input_id")]
    pub input_id: String,
    /// Override for the provider file location
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// Override for the directory holding categories, id mappings and playback positions
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Seed the sample catalog when the store holds no categories
    #[serde(default = "default_true")]
    pub seed_default_catalog: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_backend() -> ProviderBackend {
    ProviderBackend::File
}

fn default_app_link_scheme() -> String {
    "watchnextcodelab".to_string()
}

fn default_app_link_host() -> String {
    "com.example.android.watchnextcodelab".to_string()
}

fn default_input_id() -> String {
    "com.example.android.watchnextcodelab/.MainActivity".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            app_link_scheme: default_app_link_scheme(),
            app_link_host: default_app_link_host(),
            input_id: default_input_id(),
            file: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            seed_default_catalog: default_true(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, falling back to defaults
    pub fn load_or_default(path_manager: &PathManager) -> anyhow::Result<Self> {
        let path = path_manager.config_file();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load_from_file(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let scheme = &self.provider.app_link_scheme;
        if scheme.is_empty() {
            return Err(anyhow::anyhow!("provider.app_link_scheme cannot be empty"));
        }
        let valid_scheme = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return Err(anyhow::anyhow!("Invalid provider.app_link_scheme: {}", scheme));
        }
        if self.provider.app_link_host.is_empty() {
            return Err(anyhow::anyhow!("provider.app_link_host cannot be empty"));
        }
        if self.provider.input_id.is_empty() {
            return Err(anyhow::anyhow!("provider.input_id cannot be empty"));
        }

        if let Some(logging) = &self.logging {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&logging.level.as_str()) {
                return Err(anyhow::anyhow!("Invalid logging.level: {}", logging.level));
            }
        }

        Ok(())
    }

    /// Directory for the local store, honouring the override
    pub fn store_dir(&self, path_manager: &PathManager) -> PathBuf {
        self.store.dir.clone().unwrap_or_else(|| path_manager.store_dir())
    }

    /// File for the file-based provider, honouring the override
    pub fn provider_file(&self, path_manager: &PathManager) -> PathBuf {
        self.provider.file.clone().unwrap_or_else(|| path_manager.provider_file())
    }
}
