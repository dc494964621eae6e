pub mod clear;
pub mod config;
pub mod events;
pub mod show;
pub mod sync;
pub mod watch_next;
pub mod watchlist;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;
use watchnext_config::{Config, PathManager, ProviderBackend};
use watchnext_core::{CatalogDatabase, ChannelSynchronizer, LocalStore, WatchNextActions};
use watchnext_provider::{AppLinks, ChannelFacade, ChannelProvider, FileProvider, MemoryProvider, WatchNextFacade, WatchNextProvider};

/// Both provider capabilities, backed by the same tables
pub struct Providers {
    pub channels: Arc<dyn ChannelProvider>,
    pub watch_next: Arc<dyn WatchNextProvider>,
}

pub fn open_providers(config: &Config, path_manager: &PathManager) -> Result<Providers> {
    match config.provider.backend {
        ProviderBackend::File => {
            let path = config.provider_file(path_manager);
            debug!("Opening provider file {}", path.display());
            let provider = Arc::new(
                FileProvider::open(&path)
                    .map_err(|e| eyre!("Failed to open provider file {}: {}", path.display(), e))?,
            );
            Ok(Providers {
                channels: provider.clone(),
                watch_next: provider,
            })
        }
        ProviderBackend::Memory => {
            let provider = Arc::new(MemoryProvider::new());
            Ok(Providers {
                channels: provider.clone(),
                watch_next: provider,
            })
        }
    }
}

/// Everything a command needs, wired from the configuration
pub struct AppContext {
    pub database: Arc<CatalogDatabase>,
    pub providers: Providers,
    pub links: AppLinks,
    pub input_id: String,
}

impl AppContext {
    pub fn open(config: &Config, path_manager: &PathManager) -> Result<Self> {
        let links = AppLinks::new(&config.provider.app_link_scheme, &config.provider.app_link_host)
            .map_err(|e| eyre!("Invalid app link scheme or host: {}", e))?;

        let store = LocalStore::from_config(config, path_manager);
        let database = CatalogDatabase::open(store, config.sync.seed_default_catalog)
            .map_err(|e| eyre!("Failed to open local store: {}", e))?;

        Ok(Self {
            database: Arc::new(database),
            providers: open_providers(config, path_manager)?,
            links,
            input_id: config.provider.input_id.clone(),
        })
    }

    pub fn channels(&self) -> ChannelFacade {
        ChannelFacade::new(self.providers.channels.clone(), self.links.clone(), self.input_id.clone())
    }

    pub fn watch_next(&self) -> WatchNextFacade {
        WatchNextFacade::new(self.providers.watch_next.clone(), self.links.clone())
    }

    pub fn synchronizer(&self) -> ChannelSynchronizer {
        ChannelSynchronizer::new(self.database.clone(), self.channels())
    }

    pub fn actions(&self) -> WatchNextActions {
        WatchNextActions::new(self.database.clone(), self.watch_next())
    }
}
