use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use watchnext_models::{Category, ChannelId, MovieProgramId, ProgramId};
use watchnext_provider::{ChannelFacade, ProgramMetadata};
use crate::database::CatalogDatabase;
use crate::diff::{channels_to_unpublish, movies_to_publish, programs_to_remove, programs_to_update};

/// Weight of programs added to an already published channel
const INCREMENTAL_PROGRAM_WEIGHT: i32 = 0;

/// Publishes the catalog as channels and keeps the channels in line with it
pub struct ChannelSynchronizer {
    database: Arc<CatalogDatabase>,
    channels: ChannelFacade,
}

#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub channels_added: usize,
    pub channels_removed: usize,
    pub programs_added: usize,
    pub programs_removed: usize,
    pub programs_updated: usize,
    pub duration: Duration,
    pub errors: Vec<String>,
}

impl SyncResult {
    /// True when the run did not have to change anything
    pub fn is_unchanged(&self) -> bool {
        self.channels_added == 0
            && self.channels_removed == 0
            && self.programs_added == 0
            && self.programs_removed == 0
            && self.programs_updated == 0
    }
}

impl ChannelSynchronizer {
    pub fn new(database: Arc<CatalogDatabase>, channels: ChannelFacade) -> Self {
        Self { database, channels }
    }

    /// Reconcile the provider's channels with the catalog
    ///
    /// Runs three passes: stale channels are deleted, then every category is
    /// either published as a new channel or its channel is brought up to date.
    /// Failures are logged and collected in the result, never returned.
    pub async fn synchronize(&self) -> SyncResult {
        let start = Instant::now();
        let mut result = SyncResult::default();

        let categories = self.database.find_all_categories().await;
        let mut channel_ids = match self.channels.find_channel_category_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to query published channels, nothing synchronized: {}", e);
                result.errors.push(format!("query channels: {}", e));
                result.duration = start.elapsed();
                return result;
            }
        };

        info!(
            operation = "sync_start",
            categories = categories.len(),
            published_channels = channel_ids.len(),
            "Starting channel synchronization"
        );

        for channel_id in channels_to_unpublish(&channel_ids, &categories) {
            self.unpublish_channel(channel_id, &mut result).await;
            channel_ids.remove_channel(channel_id);
        }

        info!(
            operation = "unpublish_complete",
            channels_removed = result.channels_removed,
            "Unpublished stale channels"
        );

        // Program lists of the channels that survived, loaded concurrently
        let loaded = join_all(channel_ids.channel_ids().into_iter().map(|channel_id| async move {
            (channel_id, self.channels.load_programs_for_channel(channel_id).await)
        }))
        .await;

        let mut programs_by_channel: HashMap<ChannelId, Vec<ProgramMetadata>> = HashMap::new();
        let mut unreadable: HashSet<ChannelId> = HashSet::new();
        for (channel_id, programs) in loaded {
            match programs {
                Ok(programs) => {
                    programs_by_channel.insert(channel_id, programs);
                }
                Err(e) => {
                    warn!("Failed to load programs of channel {}, skipping it: {}", channel_id, e);
                    result.errors.push(format!("load programs of channel {}: {}", channel_id, e));
                    unreadable.insert(channel_id);
                }
            }
        }

        for category in &categories {
            match channel_ids.channel_for_category(&category.id) {
                None => self.publish_category(category, &mut result).await,
                Some(channel_id) if unreadable.contains(&channel_id) => {
                    debug!("Skipping category {} with unreadable channel {}", category.id, channel_id);
                }
                Some(channel_id) => {
                    let programs = programs_by_channel.remove(&channel_id).unwrap_or_default();
                    self.update_channel(channel_id, category, &programs, &mut result).await;
                }
            }
        }

        result.duration = start.elapsed();
        info!(
            operation = "sync_complete",
            channels_added = result.channels_added,
            channels_removed = result.channels_removed,
            programs_added = result.programs_added,
            programs_removed = result.programs_removed,
            programs_updated = result.programs_updated,
            errors = result.errors.len(),
            duration_ms = result.duration.as_millis() as u64,
            "Channel synchronization complete"
        );
        result
    }

    /// Delete a stale channel and forget the ids of the programs it takes along
    async fn unpublish_channel(&self, channel_id: ChannelId, result: &mut SyncResult) {
        let program_ids: Vec<ProgramId> = match self.channels.load_programs_for_channel(channel_id).await {
            Ok(programs) => programs.iter().map(|p| p.program_id).collect(),
            Err(e) => {
                warn!("Failed to load programs of stale channel {}: {}", channel_id, e);
                result.errors.push(format!("load programs of channel {}: {}", channel_id, e));
                Vec::new()
            }
        };

        if !self.channels.delete_channel(channel_id).await {
            result.errors.push(format!("delete channel {}", channel_id));
            return;
        }
        result.channels_removed += 1;

        match self.database.remove_program_ids(&program_ids).await {
            Ok(forgotten) => debug!("Forgot {} program ids of channel {}", forgotten, channel_id),
            Err(e) => {
                warn!("Failed to forget programs of channel {}: {}", channel_id, e);
                result.errors.push(format!("forget programs of channel {}: {}", channel_id, e));
            }
        }
    }

    async fn publish_category(&self, category: &Category, result: &mut SyncResult) {
        let Some(channel_id) = self.channels.add_channel(category).await else {
            result.errors.push(format!("add channel for category {}", category.id));
            return;
        };
        result.channels_added += 1;
        if !self.channels.request_channel_browsable(channel_id).await {
            result.errors.push(format!("make channel {} browsable", channel_id));
        }

        let published = self.channels.add_programs(channel_id, category).await;
        result.programs_added += published.len();
        if published.len() < category.movies.len() {
            result.errors.push(format!(
                "published {}/{} programs of category {}",
                published.len(),
                category.movies.len(),
                category.id
            ));
        }

        self.record_program_ids(published, result).await;
        if let Err(e) = self.database.set_channel_id(&category.id, Some(channel_id)).await {
            warn!("Failed to record channel {} for category {}: {}", channel_id, category.id, e);
            result.errors.push(format!("record channel of category {}: {}", category.id, e));
        }
    }

    async fn update_channel(
        &self,
        channel_id: ChannelId,
        category: &Category,
        programs: &[ProgramMetadata],
        result: &mut SyncResult,
    ) {
        if category.channel_id != Some(channel_id) {
            if let Err(e) = self.database.set_channel_id(&category.id, Some(channel_id)).await {
                warn!("Failed to record channel {} for category {}: {}", channel_id, category.id, e);
            }
        }

        for program in programs_to_remove(programs, category) {
            if self.channels.delete_program(program.program_id).await {
                result.programs_removed += 1;
            }
            if let Some(movie_id) = program.movie_id() {
                if let Err(e) = self.database.remove_program_id(movie_id, program.program_id).await {
                    warn!("Failed to forget program {} of movie {}: {}", program.program_id, movie_id, e);
                }
            }
        }

        for (program_id, movie) in programs_to_update(programs, category) {
            if self.channels.update_program(program_id, &movie).await {
                result.programs_updated += 1;
            } else {
                result.errors.push(format!("update program {}", program_id));
            }
        }

        let mut added = Vec::new();
        for movie in movies_to_publish(programs, category) {
            match self.channels.add_program(channel_id, &movie, INCREMENTAL_PROGRAM_WEIGHT).await {
                Some(program_id) => added.push(MovieProgramId::new(movie.movie_id, vec![program_id])),
                None => result.errors.push(format!("add movie {} to channel {}", movie.movie_id, channel_id)),
            }
        }
        result.programs_added += added.len();
        self.record_program_ids(added, result).await;
    }

    async fn record_program_ids(&self, ids: Vec<MovieProgramId>, result: &mut SyncResult) {
        if let Err(e) = self.database.save_movie_program_ids(ids).await {
            error!("Failed to record published program ids: {}", e);
            result.errors.push(format!("record program ids: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use tempfile::TempDir;
    use watchnext_models::Movie;
    use watchnext_provider::{
        AppLinks, ChannelProvider, ChannelRow, MemoryProvider, PreviewProgramRow, ProviderError, Row,
    };

    struct Fixture {
        _dir: TempDir,
        provider: Arc<MemoryProvider>,
        database: Arc<CatalogDatabase>,
        synchronizer: ChannelSynchronizer,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(MemoryProvider::new());
        let database = Arc::new(CatalogDatabase::open(LocalStore::new(dir.path()), false).unwrap());
        let channels = ChannelFacade::new(provider.clone(), AppLinks::default(), "test/.Input");
        let synchronizer = ChannelSynchronizer::new(database.clone(), channels);
        Fixture {
            _dir: dir,
            provider,
            database,
            synchronizer,
        }
    }

    fn movies() -> Vec<Movie> {
        vec![Movie::new(1, "one"), Movie::new(2, "two"), Movie::new(3, "three")]
    }

    fn two_categories() -> Vec<Category> {
        vec![
            Category::new("A", "A", "first").with_movies(movies()),
            Category::new("B", "B", "second").with_movies(movies()),
        ]
    }

    async fn programs_of(provider: &MemoryProvider, category_id: &str) -> Vec<(u64, String)> {
        let channels = provider.query_channels().await.unwrap();
        let channel = channels
            .iter()
            .find(|c| c.data.internal_provider_id.as_deref() == Some(category_id))
            .unwrap();
        provider
            .query_preview_programs(channel.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.id, p.data.content.internal_provider_id.unwrap()))
            .collect()
    }

    #[tokio::test]
    async fn test_publishes_every_category() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();

        let result = f.synchronizer.synchronize().await;
        assert_eq!(result.channels_added, 2);
        assert_eq!(result.programs_added, 6);
        assert!(result.errors.is_empty());

        let channels = f.provider.query_channels().await.unwrap();
        let mut category_ids: Vec<String> = channels
            .iter()
            .map(|c| c.data.internal_provider_id.clone().unwrap())
            .collect();
        category_ids.sort();
        assert_eq!(category_ids, vec!["A".to_string(), "B".to_string()]);
        assert!(channels.iter().all(|c| c.data.browsable));

        for category_id in ["A", "B"] {
            let mut movie_ids: Vec<String> =
                programs_of(&f.provider, category_id).await.into_iter().map(|(_, id)| id).collect();
            movie_ids.sort();
            assert_eq!(movie_ids, vec!["1".to_string(), "2".to_string(), "3".to_string()]);
        }

        // Each movie is published once per channel
        for movie_id in 1..=3 {
            let ids = f.database.find_movie_program_id(movie_id).await.unwrap();
            assert_eq!(ids.program_ids.len(), 2);
        }

        let stored = f.database.find_all_categories().await;
        assert!(stored.iter().all(|c| c.channel_id.is_some()));
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();
        f.synchronizer.synchronize().await;
        let mutations = f.provider.mutation_count();

        let result = f.synchronizer.synchronize().await;
        assert!(result.is_unchanged());
        assert!(result.errors.is_empty());
        assert_eq!(f.provider.mutation_count(), mutations);
    }

    #[tokio::test]
    async fn test_removed_movie_is_unpublished() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();
        f.synchronizer.synchronize().await;

        let removed_program = programs_of(&f.provider, "A")
            .await
            .into_iter()
            .find(|(_, movie_id)| movie_id == "1")
            .map(|(program_id, _)| program_id)
            .unwrap();

        f.database.remove_from_category("A", 1).await.unwrap();
        let result = f.synchronizer.synchronize().await;
        assert_eq!(result.programs_removed, 1);
        assert_eq!(result.programs_added, 0);

        let remaining: Vec<String> = programs_of(&f.provider, "A").await.into_iter().map(|(_, id)| id).collect();
        assert_eq!(remaining.len(), 2);
        assert!(!remaining.contains(&"1".to_string()));
        assert_eq!(programs_of(&f.provider, "B").await.len(), 3);

        let ids = f.database.find_movie_program_id(1).await.unwrap();
        assert!(!ids.contains_program_id(removed_program));
        assert_eq!(ids.program_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_renamed_movie_is_updated_in_place() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();
        f.synchronizer.synchronize().await;
        let before = programs_of(&f.provider, "A").await;

        let mut categories = f.database.find_all_categories().await;
        categories[0].movies[1].title = "deux".to_string();
        f.database.save_categories(categories).await.unwrap();

        let result = f.synchronizer.synchronize().await;
        assert_eq!(result.programs_updated, 1);
        assert_eq!(result.programs_added, 0);
        assert_eq!(result.programs_removed, 0);

        assert_eq!(programs_of(&f.provider, "A").await, before);
        let channel_id = f.database.find_category_by_id("A").await.unwrap().channel_id.unwrap();
        let titles: Vec<String> = f
            .provider
            .query_preview_programs(channel_id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.data.content.title)
            .collect();
        assert!(titles.contains(&"deux".to_string()));
    }

    #[tokio::test]
    async fn test_removed_category_is_unpublished_and_new_movie_added() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();
        f.synchronizer.synchronize().await;
        let unpublished: Vec<u64> = programs_of(&f.provider, "B").await.into_iter().map(|(id, _)| id).collect();

        let mut categories = f.database.find_all_categories().await;
        categories.retain(|c| c.id == "A");
        categories[0].movies.push(Movie::new(4, "four"));
        f.database.save_categories(categories).await.unwrap();

        let result = f.synchronizer.synchronize().await;
        assert_eq!(result.channels_removed, 1);
        assert_eq!(result.programs_added, 1);

        let channels = f.provider.query_channels().await.unwrap();
        assert_eq!(channels.len(), 1);
        let programs = f.provider.query_preview_programs(channels[0].id).await.unwrap();
        assert_eq!(programs.len(), 4);
        let added = programs
            .iter()
            .find(|p| p.data.content.internal_provider_id.as_deref() == Some("4"))
            .unwrap();
        assert_eq!(added.data.weight, INCREMENTAL_PROGRAM_WEIGHT);

        // Programs deleted along with the channel are forgotten too
        for movie_id in 1..=4 {
            let ids = f.database.find_movie_program_id(movie_id).await.unwrap();
            assert_eq!(ids.program_ids.len(), 1);
            assert!(programs.iter().any(|p| ids.contains_program_id(p.id)));
        }
        for program_id in unpublished {
            assert_eq!(f.database.find_movie_id_by_program_id(program_id).await, None);
        }
    }

    #[tokio::test]
    async fn test_rejected_writes_are_collected_not_raised() {
        let f = fixture();
        f.database.save_categories(two_categories()).await.unwrap();
        f.provider.set_read_only(true);

        let result = f.synchronizer.synchronize().await;
        assert_eq!(result.channels_added, 0);
        assert_eq!(result.errors.len(), 2);
        assert!(f.database.find_all_movie_program_ids().await.is_empty());
    }

    /// Accepts every write except making a channel browsable
    struct HiddenChannels(MemoryProvider);

    #[async_trait::async_trait]
    impl ChannelProvider for HiddenChannels {
        fn provider_name(&self) -> &str {
            "hidden"
        }

        async fn insert_channel(&self, channel: ChannelRow) -> Result<ChannelId, ProviderError> {
            self.0.insert_channel(channel).await
        }

        async fn query_channels(&self) -> Result<Vec<Row<ChannelRow>>, ProviderError> {
            self.0.query_channels().await
        }

        async fn delete_channel(&self, channel_id: ChannelId) -> Result<usize, ProviderError> {
            self.0.delete_channel(channel_id).await
        }

        async fn delete_all_channels(&self) -> Result<usize, ProviderError> {
            self.0.delete_all_channels().await
        }

        async fn request_channel_browsable(&self, _channel_id: ChannelId) -> Result<(), ProviderError> {
            Err(ProviderError::Rejected("user declined".to_string()))
        }

        async fn insert_preview_program(&self, program: PreviewProgramRow) -> Result<ProgramId, ProviderError> {
            self.0.insert_preview_program(program).await
        }

        async fn query_preview_programs(&self, channel_id: ChannelId) -> Result<Vec<Row<PreviewProgramRow>>, ProviderError> {
            self.0.query_preview_programs(channel_id).await
        }

        async fn get_preview_program(&self, program_id: ProgramId) -> Result<Option<Row<PreviewProgramRow>>, ProviderError> {
            self.0.get_preview_program(program_id).await
        }

        async fn update_preview_program(&self, program_id: ProgramId, program: PreviewProgramRow) -> Result<usize, ProviderError> {
            self.0.update_preview_program(program_id, program).await
        }

        async fn delete_preview_program(&self, program_id: ProgramId) -> Result<usize, ProviderError> {
            self.0.delete_preview_program(program_id).await
        }
    }

    #[tokio::test]
    async fn test_declined_browsable_request_is_collected() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(HiddenChannels(MemoryProvider::new()));
        let database = Arc::new(CatalogDatabase::open(LocalStore::new(dir.path()), false).unwrap());
        let channels = ChannelFacade::new(provider.clone(), AppLinks::default(), "test/.Input");
        let synchronizer = ChannelSynchronizer::new(database.clone(), channels);
        database.save_categories(two_categories()).await.unwrap();

        let result = synchronizer.synchronize().await;
        assert_eq!(result.channels_added, 2);
        assert_eq!(result.programs_added, 6);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|e| e.contains("browsable")));

        let channels = provider.query_channels().await.unwrap();
        assert!(channels.iter().all(|c| !c.data.browsable));
    }
}
