use crate::commands::open_providers;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use watchnext_config::{Config, PathManager};
use watchnext_core::LocalStore;
use watchnext_provider::{AppLinks, ChannelFacade};

pub async fn run_clear(all: bool, provider: bool, store: bool, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    if !(all || provider || store) {
        output.warn("No clear option specified. Use --provider, --store, or --all");
        output.info("\nExample: watchnext clear --provider");
        return Ok(());
    }

    if all || provider {
        clear_provider(config, path_manager, output).await?;
    }
    if all || store {
        clear_store(config, path_manager, output)?;
    }
    Ok(())
}

async fn clear_provider(config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let providers = open_providers(config, path_manager)?;
    let links = AppLinks::new(&config.provider.app_link_scheme, &config.provider.app_link_host)
        .map_err(|e| eyre!("Invalid app link scheme or host: {}", e))?;
    let facade = ChannelFacade::new(providers.channels.clone(), links, config.provider.input_id.clone());

    let channels = facade
        .delete_channels()
        .await
        .map_err(|e| eyre!("Failed to delete channels: {}", e))?;
    let watch_next = providers
        .watch_next
        .delete_all_watch_next_programs()
        .await
        .map_err(|e| eyre!("Failed to delete watch next programs: {}", e))?;

    output.success(format!(
        "Deleted {} channel(s) and {} watch next program(s) from the {} provider",
        channels,
        watch_next,
        providers.channels.provider_name()
    ));
    Ok(())
}

fn clear_store(config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let store = LocalStore::from_config(config, path_manager);
    store
        .clear()
        .map_err(|e| eyre!("Failed to clear local store at {}: {}", store.dir().display(), e))?;
    output.success(format!("Cleared local store: {}", store.dir().display()));
    Ok(())
}
