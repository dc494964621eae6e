use crate::commands::AppContext;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use tracing::info;
use watchnext_config::{Config, PathManager};

pub async fn run_sync(config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;

    info!(
        operation = "sync_requested",
        provider = context.providers.channels.provider_name(),
        "Synchronizing channels"
    );
    let result = context.synchronizer().synchronize().await;

    if !output.is_human() {
        output.json(&json!({
            "type": "sync",
            "channels_added": result.channels_added,
            "channels_removed": result.channels_removed,
            "programs_added": result.programs_added,
            "programs_removed": result.programs_removed,
            "programs_updated": result.programs_updated,
            "duration_ms": result.duration.as_millis() as u64,
            "errors": result.errors,
        }));
        return Ok(());
    }

    if result.is_unchanged() && result.errors.is_empty() {
        output.success(format!("Channels already up to date ({:.2?})", result.duration));
        return Ok(());
    }

    output.success(format!(
        "Synchronized in {:.2?}: {} channel(s) added, {} removed; {} program(s) added, {} removed, {} updated",
        result.duration,
        result.channels_added,
        result.channels_removed,
        result.programs_added,
        result.programs_removed,
        result.programs_updated
    ));
    for error in &result.errors {
        output.warn(error);
    }
    Ok(())
}
