use crate::commands::AppContext;
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchnext_config::{Config, PathManager};
use watchnext_models::WATCHLIST_CATEGORY_ID;

pub async fn run_watchlist(cmd: WatchlistCommands, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let context = AppContext::open(config, path_manager)?;
    let actions = context.actions();

    match cmd {
        WatchlistCommands::Add { movie } => {
            let added = actions
                .add_to_watchlist(movie)
                .await
                .map_err(|e| eyre!("Failed to add movie {} to the watchlist: {}", movie, e))?;
            if added {
                output.success(format!("Movie {} is in the watchlist", movie));
            } else {
                output.warn(format!("Movie {} is not in the catalog", movie));
            }
        }
        WatchlistCommands::Remove { movie } => {
            let removed = actions
                .remove_from_watchlist(movie)
                .await
                .map_err(|e| eyre!("Failed to remove movie {} from the watchlist: {}", movie, e))?;
            if removed {
                output.success(format!("Removed movie {} from the watchlist", movie));
            } else {
                output.info(format!("Movie {} was not in the watchlist", movie));
            }
        }
        WatchlistCommands::Show => {
            let watchlist = context.database.find_category_by_id(WATCHLIST_CATEGORY_ID).await;
            let movies = watchlist.map(|c| c.movies).unwrap_or_default();

            if !output.is_human() {
                output.json(&json!({
                    "type": "watchlist",
                    "movies": movies.iter().map(|m| json!({"movie_id": m.movie_id, "title": m.title})).collect::<Vec<_>>(),
                }));
                return Ok(());
            }

            if movies.is_empty() {
                output.info("The watchlist is empty");
            }
            for movie in &movies {
                output.info(format!("{:>4}  {}", movie.movie_id, movie.title));
            }
        }
    }
    Ok(())
}
