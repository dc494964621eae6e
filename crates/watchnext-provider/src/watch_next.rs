use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use watchnext_models::{Movie, MovieId, ProgramId, WatchNextType};
use crate::error::ProviderError;
use crate::links::AppLinks;
use crate::rows::{ProgramContent, Row, WatchNextProgramRow};
use crate::traits::WatchNextProvider;

/// Keeps at most one watch next program per movie
#[derive(Clone)]
pub struct WatchNextFacade {
    provider: Arc<dyn WatchNextProvider>,
    links: AppLinks,
}

impl WatchNextFacade {
    pub fn new(provider: Arc<dyn WatchNextProvider>, links: AppLinks) -> Self {
        Self { provider, links }
    }

    pub fn links(&self) -> &AppLinks {
        &self.links
    }

    pub async fn add_to_watch_next_watchlist(&self, movie: &Movie) -> Option<ProgramId> {
        self.upsert(movie, WatchNextType::Watchlist, None).await
    }

    pub async fn add_to_watch_next_next(&self, movie: &Movie) -> Option<ProgramId> {
        self.upsert(movie, WatchNextType::Next, None).await
    }

    pub async fn add_to_watch_next_continue(&self, movie: &Movie, position_millis: u64) -> Option<ProgramId> {
        self.upsert(movie, WatchNextType::Continue, Some(position_millis)).await
    }

    /// Remove the movie's program from the watch next row
    ///
    /// Returns the id of the deleted program, `None` when the movie had none.
    pub async fn delete_from_watch_next(&self, movie_id: MovieId) -> Option<ProgramId> {
        let existing = match self.find_program_by_movie_id(movie_id).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                debug!("Movie {} is not in the watch next row", movie_id);
                return None;
            }
            Err(e) => {
                error!("Failed to query watch next row: {}", e);
                return None;
            }
        };

        match self.provider.delete_watch_next_program(existing.id).await {
            Ok(0) => {
                warn!("Watch next program {} was already gone", existing.id);
                None
            }
            Ok(_) => {
                info!(
                    operation = "watch_next_removed",
                    movie_id = movie_id,
                    program_id = existing.id,
                    "Removed movie {} from watch next",
                    movie_id
                );
                Some(existing.id)
            }
            Err(e) => {
                error!("Failed to delete watch next program {}: {}", existing.id, e);
                None
            }
        }
    }

    /// The watch next program published for a movie, if any
    pub async fn find_program_by_movie_id(&self, movie_id: MovieId) -> Result<Option<Row<WatchNextProgramRow>>, ProviderError> {
        let internal_id = movie_id.to_string();
        let programs = self.provider.query_watch_next_programs().await?;
        Ok(programs
            .into_iter()
            .find(|row| row.data.content.internal_provider_id.as_deref() == Some(internal_id.as_str())))
    }

    pub async fn get_programs(&self) -> Result<Vec<Row<WatchNextProgramRow>>, ProviderError> {
        self.provider.query_watch_next_programs().await
    }

    /// Insert or refresh the movie's program
    ///
    /// An entry the user dismissed is no longer browsable and cannot be brought
    /// back by an update, so it is deleted and inserted again under a new id.
    async fn upsert(&self, movie: &Movie, watch_next_type: WatchNextType, position_millis: Option<u64>) -> Option<ProgramId> {
        let existing = match self.find_program_by_movie_id(movie.movie_id).await {
            Ok(existing) => existing,
            Err(e) => {
                error!("Failed to query watch next row: {}", e);
                return None;
            }
        };

        let existing = match existing {
            Some(row) if !row.data.browsable => {
                debug!("Watch next program {} was dismissed, replacing it", row.id);
                if let Err(e) = self.provider.delete_watch_next_program(row.id).await {
                    error!("Failed to delete dismissed watch next program {}: {}", row.id, e);
                    return None;
                }
                None
            }
            other => other,
        };

        let engagement = Utc::now().timestamp_millis();

        match existing {
            Some(Row { id, data }) => {
                let updated = WatchNextProgramRow {
                    watch_next_type,
                    last_engagement_time_utc_millis: engagement,
                    last_playback_position_millis: position_millis.or(data.last_playback_position_millis),
                    ..data
                };
                match self.provider.update_watch_next_program(id, updated).await {
                    Ok(0) => {
                        warn!("Update of watch next program {} affected no rows", id);
                        None
                    }
                    Ok(_) => {
                        info!(
                            operation = "watch_next_updated",
                            movie_id = movie.movie_id,
                            program_id = id,
                            watch_next_type = %watch_next_type,
                            "Updated '{}' in watch next",
                            movie.title
                        );
                        Some(id)
                    }
                    Err(e) => {
                        error!("Failed to update watch next program {}: {}", id, e);
                        None
                    }
                }
            }
            None => {
                let program = WatchNextProgramRow {
                    content: ProgramContent::from_movie(movie, &self.links),
                    watch_next_type,
                    last_engagement_time_utc_millis: engagement,
                    last_playback_position_millis: position_millis,
                    browsable: true,
                };
                match self.provider.insert_watch_next_program(program).await {
                    Ok(id) => {
                        info!(
                            operation = "watch_next_added",
                            movie_id = movie.movie_id,
                            program_id = id,
                            watch_next_type = %watch_next_type,
                            "Added '{}' to watch next",
                            movie.title
                        );
                        Some(id)
                    }
                    Err(e) => {
                        error!("Failed to add movie {} to watch next: {}", movie.movie_id, e);
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;

    fn facade() -> (Arc<MemoryProvider>, WatchNextFacade) {
        let provider = Arc::new(MemoryProvider::new());
        let facade = WatchNextFacade::new(provider.clone(), AppLinks::default());
        (provider, facade)
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_entry() {
        let (provider, facade) = facade();
        let movie = Movie::new(1, "one");

        let first = facade.add_to_watch_next_watchlist(&movie).await.unwrap();
        let second = facade.add_to_watch_next_continue(&movie, 1_500).await.unwrap();
        assert_eq!(first, second);

        let programs = provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].data.watch_next_type, WatchNextType::Continue);
        assert_eq!(programs[0].data.last_playback_position_millis, Some(1_500));

        // A position-less upsert keeps the last known position
        facade.add_to_watch_next_next(&movie).await.unwrap();
        let programs = provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs[0].data.watch_next_type, WatchNextType::Next);
        assert_eq!(programs[0].data.last_playback_position_millis, Some(1_500));
    }

    #[tokio::test]
    async fn test_dismissed_entry_is_reinserted() {
        let (provider, facade) = facade();
        let movie = Movie::new(1, "one");

        let first = facade.add_to_watch_next_next(&movie).await.unwrap();
        provider.set_watch_next_browsable(first, false).await.unwrap();

        let second = facade.add_to_watch_next_next(&movie).await.unwrap();
        assert_ne!(first, second);

        let programs = provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, second);
        assert!(programs[0].data.browsable);
    }

    #[tokio::test]
    async fn test_delete_from_watch_next() {
        let (provider, facade) = facade();
        let one = Movie::new(1, "one");
        let two = Movie::new(2, "two");
        let id = facade.add_to_watch_next_next(&one).await.unwrap();
        facade.add_to_watch_next_next(&two).await.unwrap();

        assert_eq!(facade.delete_from_watch_next(1).await, Some(id));
        assert_eq!(facade.delete_from_watch_next(1).await, None);
        assert!(facade.find_program_by_movie_id(1).await.unwrap().is_none());
        assert_eq!(provider.query_watch_next_programs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_insert_returns_none() {
        let (provider, facade) = facade();
        provider.set_read_only(true);
        assert_eq!(facade.add_to_watch_next_next(&Movie::new(1, "one")).await, None);
    }
}
