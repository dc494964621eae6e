use crate::commands::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchnext_config::{Config, PathManager};

pub async fn run_watch_next(movie: u64, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let program_id = context
        .actions()
        .watch_next(movie)
        .await
        .map_err(|e| eyre!("Failed to suggest movie {}: {}", movie, e))?;

    match program_id {
        Some(id) => output.success(format!("Movie {} is up next (watch next program {})", movie, id)),
        None => output.warn(format!("Movie {} was not added to the watch next row", movie)),
    }
    Ok(())
}

pub async fn run_continue(movie: u64, position: u64, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let program_id = context
        .actions()
        .playback_paused(movie, position)
        .await
        .map_err(|e| eyre!("Failed to record playback of movie {}: {}", movie, e))?;

    match program_id {
        Some(id) => output.success(format!(
            "Movie {} can be resumed at {} ms (watch next program {})",
            movie, position, id
        )),
        None => output.warn(format!("Movie {} was not added to the watch next row", movie)),
    }
    Ok(())
}

pub async fn run_finish(movie: u64, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let next = context
        .actions()
        .playback_completed(movie)
        .await
        .map_err(|e| eyre!("Failed to record the end of movie {}: {}", movie, e))?;

    output.success(format!("Movie {} finished", movie));
    if let Some(id) = next {
        output.info(format!("Next movie of the series added to watch next (program {})", id));
    }
    Ok(())
}

pub async fn run_open(uri: &str, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let actions = context.actions();

    let Some(movie_id) = actions.parse_video_id(uri) else {
        output.error(format!("Not a play-video link: {}", uri));
        return Ok(());
    };
    let Some(movie) = actions.open_link(uri).await else {
        output.warn(format!("Movie {} is not in the catalog", movie_id));
        return Ok(());
    };
    let resume = actions.resume_position(movie_id).await;

    if !output.is_human() {
        output.json(&json!({
            "type": "movie",
            "movie_id": movie.movie_id,
            "title": movie.title,
            "video_url": movie.video_url,
            "resume_position_ms": resume,
        }));
        return Ok(());
    }

    output.info(format!("{}  {}", movie.movie_id, movie.title));
    output.info(format!("Video: {}", movie.video_url));
    if let Some(position) = resume {
        output.info(format!("Resume at {} ms", position));
    }
    Ok(())
}
