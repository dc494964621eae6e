use anyhow::Result;
use std::collections::BTreeMap;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};
use watchnext_models::{Category, ChannelId, Movie, MovieId, MovieProgramId, ProgramId, WatchNextUpdate};
use crate::catalog::default_categories;
use crate::store::LocalStore;

struct CatalogState {
    categories: Vec<Category>,
    movie_program_ids: BTreeMap<MovieId, MovieProgramId>,
    playback_positions: BTreeMap<MovieId, u64>,
}

/// The local catalog and the provider ids recorded for its movies
///
/// Every write goes straight through to the [`LocalStore`]. Category changes
/// are also broadcast to [`subscribe_categories`](Self::subscribe_categories)
/// receivers.
pub struct CatalogDatabase {
    store: LocalStore,
    state: Mutex<CatalogState>,
    categories_tx: watch::Sender<Vec<Category>>,
}

impl CatalogDatabase {
    /// Load the store, writing the default catalog when it holds no categories
    pub fn open(store: LocalStore, seed_default_catalog: bool) -> Result<Self> {
        let mut categories = store.load_categories()?;
        if categories.is_empty() && seed_default_catalog {
            categories = default_categories();
            store.save_categories(&categories)?;
            info!(
                operation = "catalog_seeded",
                categories = categories.len(),
                "Seeded default catalog"
            );
        }

        let movie_program_ids = store
            .load_movie_program_ids()?
            .into_iter()
            .map(|ids| (ids.movie_id, ids))
            .collect();
        let playback_positions = store.load_playback_positions()?;

        let (categories_tx, _) = watch::channel(categories.clone());
        Ok(Self {
            store,
            state: Mutex::new(CatalogState {
                categories,
                movie_program_ids,
                playback_positions,
            }),
            categories_tx,
        })
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub async fn find_all_categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.clone()
    }

    pub async fn find_category_by_id(&self, category_id: &str) -> Option<Category> {
        let state = self.state.lock().await;
        state.categories.iter().find(|c| c.id == category_id).cloned()
    }

    /// Find a movie in any category
    pub async fn find_movie_by_id(&self, movie_id: MovieId) -> Option<Movie> {
        let state = self.state.lock().await;
        state
            .categories
            .iter()
            .find_map(|c| c.find_movie(movie_id))
            .cloned()
    }

    /// Replace the whole catalog
    pub async fn save_categories(&self, categories: Vec<Category>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.commit_categories(&mut state, categories)
    }

    /// Record the channel a category was published as
    pub async fn set_channel_id(&self, category_id: &str, channel_id: Option<ChannelId>) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut categories = state.categories.clone();
        let Some(category) = categories.iter_mut().find(|c| c.id == category_id) else {
            debug!("Category {} not found, channel id not recorded", category_id);
            return Ok(false);
        };
        if category.channel_id == channel_id {
            return Ok(true);
        }
        category.channel_id = channel_id;
        self.commit_categories(&mut state, categories)?;
        Ok(true)
    }

    /// Remove a movie from one category, returning whether it was there
    pub async fn remove_from_category(&self, category_id: &str, movie_id: MovieId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut categories = state.categories.clone();
        let removed = categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .map(|c| c.remove_movie(movie_id))
            .unwrap_or(false);
        if removed {
            self.commit_categories(&mut state, categories)?;
        }
        Ok(removed)
    }

    pub async fn remove_category(&self, category_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut categories = state.categories.clone();
        categories.retain(|c| c.id != category_id);
        if categories.len() == state.categories.len() {
            return Ok(false);
        }
        self.commit_categories(&mut state, categories)?;
        Ok(true)
    }

    /// Receiver always holding the current catalog
    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<Category>> {
        self.categories_tx.subscribe()
    }

    /// Persist, then publish. A failed save leaves state and receivers untouched.
    fn commit_categories(&self, state: &mut CatalogState, categories: Vec<Category>) -> Result<()> {
        self.store.save_categories(&categories)?;
        state.categories = categories;
        self.categories_tx.send_replace(state.categories.clone());
        Ok(())
    }

    /// Record freshly published program ids
    ///
    /// Program ids are added to the ones already stored. A watch next id in the
    /// batch replaces the stored one, a missing one leaves it untouched.
    pub async fn save_movie_program_ids(&self, batch: Vec<MovieProgramId>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let mut ids = state.movie_program_ids.clone();
        for incoming in batch {
            ids.entry(incoming.movie_id)
                .and_modify(|existing| existing.merge(&incoming))
                .or_insert(incoming);
        }
        self.commit_movie_program_ids(&mut state, ids)
    }

    /// Read-modify-write of one movie's ids
    ///
    /// `program_ids` replaces the stored list when given.
    pub async fn update_movie_program_id(
        &self,
        movie_id: MovieId,
        program_ids: Option<Vec<ProgramId>>,
        watch_next: WatchNextUpdate,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut ids = state.movie_program_ids.clone();
        let entry = ids
            .entry(movie_id)
            .or_insert_with(|| MovieProgramId::new(movie_id, Vec::new()));
        if let Some(program_ids) = program_ids {
            entry.program_ids.clear();
            entry.add_program_ids(&program_ids);
        }
        entry.apply_watch_next(watch_next);
        self.commit_movie_program_ids(&mut state, ids)
    }

    /// Forget one program id of a movie, returning whether it was recorded
    pub async fn remove_program_id(&self, movie_id: MovieId, program_id: ProgramId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut ids = state.movie_program_ids.clone();
        let removed = ids
            .get_mut(&movie_id)
            .map(|entry| entry.remove_program_id(program_id))
            .unwrap_or(false);
        if removed {
            self.commit_movie_program_ids(&mut state, ids)?;
        }
        Ok(removed)
    }

    /// Forget preview program ids whatever movie they were recorded for
    ///
    /// Returns how many ids were dropped.
    pub async fn remove_program_ids(&self, program_ids: &[ProgramId]) -> Result<usize> {
        let mut state = self.state.lock().await;
        let mut ids = state.movie_program_ids.clone();
        let mut removed = 0;
        for movie_ids in ids.values_mut() {
            for program_id in program_ids {
                if movie_ids.remove_program_id(*program_id) {
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            self.commit_movie_program_ids(&mut state, ids)?;
        }
        Ok(removed)
    }

    pub async fn find_all_movie_program_ids(&self) -> Vec<MovieProgramId> {
        self.state.lock().await.movie_program_ids.values().cloned().collect()
    }

    pub async fn find_movie_program_id(&self, movie_id: MovieId) -> Option<MovieProgramId> {
        self.state.lock().await.movie_program_ids.get(&movie_id).cloned()
    }

    /// The movie a preview program was published for
    pub async fn find_movie_id_by_program_id(&self, program_id: ProgramId) -> Option<MovieId> {
        let state = self.state.lock().await;
        state
            .movie_program_ids
            .values()
            .find(|ids| ids.contains_program_id(program_id))
            .map(|ids| ids.movie_id)
    }

    /// The movie a watch next program was published for
    pub async fn find_movie_id_by_watch_next_id(&self, watch_next_program_id: ProgramId) -> Option<MovieId> {
        let state = self.state.lock().await;
        state
            .movie_program_ids
            .values()
            .find(|ids| ids.watch_next_program_id == Some(watch_next_program_id))
            .map(|ids| ids.movie_id)
    }

    pub async fn delete_movie_program_ids(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.store.delete_movie_program_ids()?;
        state.movie_program_ids.clear();
        Ok(())
    }

    fn commit_movie_program_ids(
        &self,
        state: &mut CatalogState,
        mut ids: BTreeMap<MovieId, MovieProgramId>,
    ) -> Result<()> {
        ids.retain(|_, entry| !entry.is_empty());
        let stored: Vec<MovieProgramId> = ids.values().cloned().collect();
        self.store.save_movie_program_ids(&stored)?;
        state.movie_program_ids = ids;
        Ok(())
    }

    pub async fn save_playback_position(&self, movie_id: MovieId, position_millis: u64) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut positions = state.playback_positions.clone();
        positions.insert(movie_id, position_millis);
        self.store.save_playback_positions(&positions)?;
        state.playback_positions = positions;
        Ok(())
    }

    pub async fn find_playback_position(&self, movie_id: MovieId) -> Option<u64> {
        self.state.lock().await.playback_positions.get(&movie_id).copied()
    }

    pub async fn delete_playback_position(&self, movie_id: MovieId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut positions = state.playback_positions.clone();
        if positions.remove(&movie_id).is_none() {
            return Ok(false);
        }
        self.store.save_playback_positions(&positions)?;
        state.playback_positions = positions;
        Ok(true)
    }
}
