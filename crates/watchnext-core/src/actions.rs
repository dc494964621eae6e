use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};
use watchnext_models::{Movie, MovieId, ProgramId, WatchNextUpdate};
use watchnext_provider::WatchNextFacade;
use crate::database::CatalogDatabase;
use crate::watchlist::WatchlistManager;

/// Notifications the home screen sends about programs it shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The user removed a program from the watch next row
    WatchNextProgramBrowsableDisabled { watch_next_program_id: ProgramId },
    /// The user added a channel program to the watch next row
    PreviewProgramAddedToWatchNext {
        preview_program_id: ProgramId,
        watch_next_program_id: ProgramId,
    },
}

/// What users and the player do to the watch next row
pub struct WatchNextActions {
    database: Arc<CatalogDatabase>,
    watch_next: WatchNextFacade,
    watchlist: WatchlistManager,
}

impl WatchNextActions {
    pub fn new(database: Arc<CatalogDatabase>, watch_next: WatchNextFacade) -> Self {
        let watchlist = WatchlistManager::new(database.clone(), watch_next.clone());
        Self {
            database,
            watch_next,
            watchlist,
        }
    }

    pub fn watchlist(&self) -> &WatchlistManager {
        &self.watchlist
    }

    /// Suggest a movie as the next thing to watch
    pub async fn watch_next(&self, movie_id: MovieId) -> Result<Option<ProgramId>> {
        let Some(movie) = self.find_movie(movie_id).await else {
            return Ok(None);
        };
        let program_id = self.watch_next.add_to_watch_next_next(&movie).await;
        self.record_watch_next(movie_id, program_id).await?;
        Ok(program_id)
    }

    /// Put a partly watched movie in the watch next row and remember where it stopped
    pub async fn add_to_continue_watching(&self, movie_id: MovieId, position_millis: u64) -> Result<Option<ProgramId>> {
        let Some(movie) = self.find_movie(movie_id).await else {
            return Ok(None);
        };
        let program_id = self.watch_next.add_to_watch_next_continue(&movie, position_millis).await;
        self.record_watch_next(movie_id, program_id).await?;
        self.database.save_playback_position(movie_id, position_millis).await?;
        Ok(program_id)
    }

    /// Take a movie out of the watch next row, forget its position and drop it
    /// from the watchlist
    pub async fn remove_from_continue_watching(&self, movie_id: MovieId) -> Result<()> {
        self.watch_next.delete_from_watch_next(movie_id).await;
        self.database
            .update_movie_program_id(movie_id, None, WatchNextUpdate::Clear)
            .await?;
        self.database.delete_playback_position(movie_id).await?;
        self.watchlist.remove_movie_from_watchlist(movie_id).await?;
        Ok(())
    }

    pub async fn add_to_watchlist(&self, movie_id: MovieId) -> Result<bool> {
        self.watchlist.add_to_watchlist(movie_id).await
    }

    pub async fn remove_from_watchlist(&self, movie_id: MovieId) -> Result<bool> {
        self.watchlist.remove_movie_from_watchlist(movie_id).await
    }

    pub async fn playback_paused(&self, movie_id: MovieId, position_millis: u64) -> Result<Option<ProgramId>> {
        self.add_to_continue_watching(movie_id, position_millis).await
    }

    /// The movie played to its end
    ///
    /// Its entry leaves the watch next row and the next movie of the series,
    /// if there is one, takes its place. Returns the program id of that entry.
    pub async fn playback_completed(&self, movie_id: MovieId) -> Result<Option<ProgramId>> {
        self.remove_from_continue_watching(movie_id).await?;

        let next = self
            .database
            .find_movie_by_id(movie_id)
            .await
            .and_then(|movie| movie.next_movie_id_in_series);
        match next {
            Some(next_movie_id) => {
                info!(
                    operation = "series_advanced",
                    movie_id = movie_id,
                    next_movie_id = next_movie_id,
                    "Suggesting the next movie of the series"
                );
                self.watch_next(next_movie_id).await
            }
            None => Ok(None),
        }
    }

    /// Where playback of a movie should resume
    pub async fn resume_position(&self, movie_id: MovieId) -> Option<u64> {
        self.database.find_playback_position(movie_id).await
    }

    /// The movie a play-video link points to
    pub async fn open_link(&self, uri: &str) -> Option<Movie> {
        let movie_id = self.parse_video_id(uri)?;
        self.database.find_movie_by_id(movie_id).await
    }

    pub fn parse_video_id(&self, uri: &str) -> Option<MovieId> {
        self.watch_next.links().parse_video_id(uri)
    }

    /// React to a home screen notification, returning the movie it concerned
    pub async fn handle_event(&self, event: ProviderEvent) -> Result<Option<MovieId>> {
        match event {
            ProviderEvent::WatchNextProgramBrowsableDisabled { watch_next_program_id } => {
                let Some(movie_id) = self.database.find_movie_id_by_watch_next_id(watch_next_program_id).await else {
                    debug!("No movie owns watch next program {}", watch_next_program_id);
                    return Ok(None);
                };
                self.watchlist.remove_movie_from_watchlist(movie_id).await?;
                Ok(Some(movie_id))
            }
            ProviderEvent::PreviewProgramAddedToWatchNext {
                preview_program_id,
                watch_next_program_id,
            } => {
                let Some(movie_id) = self.database.find_movie_id_by_program_id(preview_program_id).await else {
                    debug!(
                        "No movie owns program {} added to watch next as {}",
                        preview_program_id,
                        watch_next_program_id
                    );
                    return Ok(None);
                };
                self.watchlist.add_to_watchlist(movie_id).await?;
                Ok(Some(movie_id))
            }
        }
    }

    async fn find_movie(&self, movie_id: MovieId) -> Option<Movie> {
        let movie = self.database.find_movie_by_id(movie_id).await;
        if movie.is_none() {
            debug!("Movie {} not found", movie_id);
        }
        movie
    }

    async fn record_watch_next(&self, movie_id: MovieId, program_id: Option<ProgramId>) -> Result<()> {
        if let Some(program_id) = program_id {
            self.database
                .update_movie_program_id(movie_id, None, WatchNextUpdate::Set(program_id))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use crate::sync::ChannelSynchronizer;
    use tempfile::TempDir;
    use watchnext_models::{WatchNextType, WATCHLIST_CATEGORY_ID};
    use watchnext_provider::{
        AppLinks, ChannelFacade, ChannelProvider, MemoryProvider, WatchNextProgramRow, WatchNextProvider,
    };

    struct Fixture {
        _dir: TempDir,
        provider: Arc<MemoryProvider>,
        database: Arc<CatalogDatabase>,
        actions: WatchNextActions,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(MemoryProvider::new());
        let database = Arc::new(CatalogDatabase::open(LocalStore::new(dir.path()), true).unwrap());
        let actions = WatchNextActions::new(
            database.clone(),
            WatchNextFacade::new(provider.clone(), AppLinks::default()),
        );
        Fixture {
            _dir: dir,
            provider,
            database,
            actions,
        }
    }

    #[tokio::test]
    async fn test_continue_watching_records_position() {
        let f = fixture();

        let first = f.actions.playback_paused(1, 30_000).await.unwrap().unwrap();
        let second = f.actions.playback_paused(1, 45_000).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(f.actions.resume_position(1).await, Some(45_000));

        let programs = f.provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].data.watch_next_type, WatchNextType::Continue);
        assert_eq!(programs[0].data.last_playback_position_millis, Some(45_000));
        assert_eq!(
            f.database.find_movie_program_id(1).await.unwrap().watch_next_program_id,
            Some(first)
        );
    }

    #[tokio::test]
    async fn test_completing_a_series_movie_suggests_the_next() {
        let f = fixture();
        f.actions.add_to_watchlist(3).await.unwrap();
        f.actions.playback_paused(3, 10_000).await.unwrap();

        let next = f.actions.playback_completed(3).await.unwrap().unwrap();

        assert_eq!(f.actions.resume_position(3).await, None);
        assert!(!f.actions.watchlist().is_in_watchlist(3).await);

        let programs = f.provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, next);
        assert_eq!(programs[0].data.content.internal_provider_id.as_deref(), Some("4"));
        assert_eq!(programs[0].data.watch_next_type, WatchNextType::Next);
    }

    #[tokio::test]
    async fn test_completing_a_standalone_movie_empties_the_row() {
        let f = fixture();
        f.actions.playback_paused(2, 1_000).await.unwrap();

        assert_eq!(f.actions.playback_completed(2).await.unwrap(), None);
        assert!(f.provider.query_watch_next_programs().await.unwrap().is_empty());
        assert!(f.database.find_movie_program_id(2).await.is_none());
    }

    #[tokio::test]
    async fn test_dismissed_entry_leaves_the_watchlist() {
        let f = fixture();
        f.actions.add_to_watchlist(1).await.unwrap();
        let watch_next_id = f.database.find_movie_program_id(1).await.unwrap().watch_next_program_id.unwrap();

        f.provider.set_watch_next_browsable(watch_next_id, false).await.unwrap();
        let movie_id = f
            .actions
            .handle_event(ProviderEvent::WatchNextProgramBrowsableDisabled { watch_next_program_id: watch_next_id })
            .await
            .unwrap();

        assert_eq!(movie_id, Some(1));
        assert!(f.database.find_category_by_id(WATCHLIST_CATEGORY_ID).await.is_none());
        assert!(f.provider.query_watch_next_programs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_program_added_from_home_screen_joins_the_watchlist() {
        let f = fixture();
        let channels = ChannelFacade::new(f.provider.clone(), AppLinks::default(), "test/.Input");
        ChannelSynchronizer::new(f.database.clone(), channels).synchronize().await;
        let program_id = f.database.find_movie_program_id(2).await.unwrap().program_ids[0];

        let movie_id = f
            .actions
            .handle_event(ProviderEvent::PreviewProgramAddedToWatchNext {
                preview_program_id: program_id,
                watch_next_program_id: 77,
            })
            .await
            .unwrap();

        assert_eq!(movie_id, Some(2));
        assert!(f.actions.watchlist().is_in_watchlist(2).await);
        // Published program ids survive the watchlist's watch next entry
        let ids = f.database.find_movie_program_id(2).await.unwrap();
        assert!(ids.contains_program_id(program_id));
        assert!(ids.watch_next_program_id.is_some());
    }

    #[tokio::test]
    async fn test_home_screen_watch_next_row_is_reused() {
        let f = fixture();
        let channels = ChannelFacade::new(f.provider.clone(), AppLinks::default(), "test/.Input");
        ChannelSynchronizer::new(f.database.clone(), channels).synchronize().await;
        let program_id = f.database.find_movie_program_id(2).await.unwrap().program_ids[0];

        // The home screen copies the channel program into the row itself
        let preview = f.provider.get_preview_program(program_id).await.unwrap().unwrap();
        let watch_next_id = f
            .provider
            .insert_watch_next_program(WatchNextProgramRow::from_preview(&preview.data, WatchNextType::Watchlist))
            .await
            .unwrap();

        let movie_id = f
            .actions
            .handle_event(ProviderEvent::PreviewProgramAddedToWatchNext {
                preview_program_id: program_id,
                watch_next_program_id: watch_next_id,
            })
            .await
            .unwrap();
        assert_eq!(movie_id, Some(2));

        let programs = f.provider.query_watch_next_programs().await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, watch_next_id);
        assert_eq!(programs[0].data.watch_next_type, WatchNextType::Watchlist);
        let ids = f.database.find_movie_program_id(2).await.unwrap();
        assert_eq!(ids.watch_next_program_id, Some(watch_next_id));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_ignored() {
        let f = fixture();
        let event = ProviderEvent::WatchNextProgramBrowsableDisabled { watch_next_program_id: 5 };
        assert_eq!(f.actions.handle_event(event).await.unwrap(), None);
        assert_eq!(f.actions.watch_next(99).await.unwrap(), None);
        assert_eq!(f.provider.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_open_link() {
        let f = fixture();
        let uri = AppLinks::default().play_video_uri(4);

        let movie = f.actions.open_link(&uri).await.unwrap();
        assert_eq!(movie.movie_id, 4);
        assert!(f.actions.open_link("watchnextcodelab://com.example.android.watchnextcodelab/startapp").await.is_none());
    }
}
