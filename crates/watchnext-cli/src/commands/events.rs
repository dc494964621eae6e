use crate::commands::AppContext;
use crate::output::Output;
use crate::EventCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{debug, warn};
use watchnext_config::{Config, PathManager};
use watchnext_core::ProviderEvent;
use watchnext_models::WatchNextType;
use watchnext_provider::WatchNextProgramRow;

pub async fn run_event(cmd: EventCommands, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;

    let event = match cmd {
        EventCommands::BrowsableDisabled { watch_next_program } => {
            // The home screen hides the program before it notifies the app
            match context.providers.watch_next.set_watch_next_browsable(watch_next_program, false).await {
                Ok(0) => warn!("Watch next program {} does not exist", watch_next_program),
                Ok(_) => {}
                Err(e) => warn!("Failed to hide watch next program {}: {}", watch_next_program, e),
            }
            ProviderEvent::WatchNextProgramBrowsableDisabled {
                watch_next_program_id: watch_next_program,
            }
        }
        EventCommands::AddedToWatchNext { program } => {
            // The home screen copies the program into the row before it notifies the app
            let preview = context
                .providers
                .channels
                .get_preview_program(program)
                .await
                .map_err(|e| eyre!("Failed to read program {}: {}", program, e))?
                .ok_or_else(|| eyre!("Program {} does not exist", program))?;
            let watch_next_program = context
                .providers
                .watch_next
                .insert_watch_next_program(WatchNextProgramRow::from_preview(&preview.data, WatchNextType::Watchlist))
                .await
                .map_err(|e| eyre!("Failed to add program {} to watch next: {}", program, e))?;
            debug!("Home screen added program {} as watch next program {}", program, watch_next_program);
            ProviderEvent::PreviewProgramAddedToWatchNext {
                preview_program_id: program,
                watch_next_program_id: watch_next_program,
            }
        }
    };

    let movie = context
        .actions()
        .handle_event(event)
        .await
        .map_err(|e| eyre!("Failed to handle {:?}: {}", event, e))?;

    match (event, movie) {
        (ProviderEvent::WatchNextProgramBrowsableDisabled { .. }, Some(movie)) => {
            output.success(format!("Movie {} left the watchlist", movie))
        }
        (ProviderEvent::PreviewProgramAddedToWatchNext { .. }, Some(movie)) => {
            output.success(format!("Movie {} joined the watchlist", movie))
        }
        (_, None) => output.warn("No movie in the catalog matches the event"),
    }
    Ok(())
}
