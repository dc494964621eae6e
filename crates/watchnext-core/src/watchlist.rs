use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};
use watchnext_models::{Category, MovieId, WatchNextUpdate, WATCHLIST_CATEGORY_ID};
use watchnext_provider::WatchNextFacade;
use crate::database::CatalogDatabase;

/// Maintains the watchlist category and its entries in the watch next row
#[derive(Clone)]
pub struct WatchlistManager {
    database: Arc<CatalogDatabase>,
    watch_next: WatchNextFacade,
}

impl WatchlistManager {
    pub fn new(database: Arc<CatalogDatabase>, watch_next: WatchNextFacade) -> Self {
        Self { database, watch_next }
    }

    /// Add a movie to the watchlist and to the watch next row
    ///
    /// The watchlist category is created in front of the catalog when missing.
    /// Returns `false` when the movie is unknown.
    pub async fn add_to_watchlist(&self, movie_id: MovieId) -> Result<bool> {
        let Some(movie) = self.database.find_movie_by_id(movie_id).await else {
            debug!("Movie {} not found, not added to watchlist", movie_id);
            return Ok(false);
        };

        let mut categories = self.database.find_all_categories().await;
        let index = match categories.iter().position(Category::is_watchlist) {
            Some(index) => index,
            None => {
                categories.insert(0, Category::watchlist());
                0
            }
        };
        let watchlist = &mut categories[index];
        if !watchlist.contains_movie(movie_id) {
            watchlist.movies.push(movie.clone());
            self.database.save_categories(categories).await?;
            info!(
                operation = "watchlist_added",
                movie_id = movie_id,
                "Added '{}' to the watchlist",
                movie.title
            );
        }

        if let Some(program_id) = self.watch_next.add_to_watch_next_watchlist(&movie).await {
            self.database
                .update_movie_program_id(movie_id, None, WatchNextUpdate::Set(program_id))
                .await?;
        }
        Ok(true)
    }

    pub async fn is_in_watchlist(&self, movie_id: MovieId) -> bool {
        self.database
            .find_category_by_id(WATCHLIST_CATEGORY_ID)
            .await
            .map(|watchlist| watchlist.contains_movie(movie_id))
            .unwrap_or(false)
    }

    /// Remove a movie from the watchlist and from the watch next row
    ///
    /// The watchlist category is dropped once it holds no movies. Returns
    /// whether the movie was in the watchlist.
    pub async fn remove_movie_from_watchlist(&self, movie_id: MovieId) -> Result<bool> {
        let removed = self.database.remove_from_category(WATCHLIST_CATEGORY_ID, movie_id).await?;
        if removed {
            info!(operation = "watchlist_removed", movie_id = movie_id, "Removed movie {} from the watchlist", movie_id);
        }

        let empty = self
            .database
            .find_category_by_id(WATCHLIST_CATEGORY_ID)
            .await
            .map(|watchlist| watchlist.movies.is_empty())
            .unwrap_or(false);
        if empty {
            self.database.remove_category(WATCHLIST_CATEGORY_ID).await?;
            debug!("Watchlist is empty, category removed");
        }

        self.watch_next.delete_from_watch_next(movie_id).await;
        self.database
            .update_movie_program_id(movie_id, None, WatchNextUpdate::Clear)
            .await?;
        Ok(removed)
    }

    /// Follow the watchlist category as the catalog changes
    pub fn subscribe_watchlist(&self) -> WatchlistSubscription {
        WatchlistSubscription {
            categories: self.database.subscribe_categories(),
        }
    }
}

/// Live view of the watchlist category
pub struct WatchlistSubscription {
    categories: watch::Receiver<Vec<Category>>,
}

impl WatchlistSubscription {
    /// The watchlist as of the latest catalog change, `None` when empty
    pub fn current(&mut self) -> Option<Category> {
        self.categories
            .borrow_and_update()
            .iter()
            .find(|c| c.is_watchlist())
            .cloned()
    }

    /// Wait for the next catalog change and return the watchlist
    pub async fn changed(&mut self) -> Result<Option<Category>, watch::error::RecvError> {
        self.categories.changed().await?;
        Ok(self.current())
    }
}
