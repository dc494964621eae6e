use std::sync::Arc;
use tracing::{debug, error, info, warn};
use watchnext_models::{Category, ChannelId, Movie, MovieProgramId, ProgramId};
use crate::error::ProviderError;
use crate::links::AppLinks;
use crate::rows::{ChannelCategoryIds, ChannelRow, ChannelType, PreviewProgramRow, ProgramContent, ProgramMetadata, Row};
use crate::traits::ChannelProvider;

/// Channel and preview program operations expressed in catalog terms
///
/// Failures of individual writes are logged and reported as `None` or `false`
/// so a reconciliation pass can carry on with the remaining items.
#[derive(Clone)]
pub struct ChannelFacade {
    provider: Arc<dyn ChannelProvider>,
    links: AppLinks,
    input_id: String,
}

impl ChannelFacade {
    pub fn new(provider: Arc<dyn ChannelProvider>, links: AppLinks, input_id: impl Into<String>) -> Self {
        Self {
            provider,
            links,
            input_id: input_id.into(),
        }
    }

    /// Map every published channel to the category it was published for
    ///
    /// Channels without an internal provider id were not created by this app
    /// and are left out.
    pub async fn find_channel_category_ids(&self) -> Result<ChannelCategoryIds, ProviderError> {
        let channels = self.provider.query_channels().await?;
        let mut ids = ChannelCategoryIds::new();
        for channel in channels {
            match channel.data.internal_provider_id {
                Some(category_id) => ids.insert(channel.id, category_id),
                None => debug!("Skipping channel {} without internal provider id", channel.id),
            }
        }
        Ok(ids)
    }

    pub async fn get_channels(&self) -> Result<Vec<Row<ChannelRow>>, ProviderError> {
        self.provider.query_channels().await
    }

    /// Publish a category as a new, not yet browsable, channel
    pub async fn add_channel(&self, category: &Category) -> Option<ChannelId> {
        let channel = ChannelRow {
            display_name: category.name.clone(),
            description: category.description.clone(),
            channel_type: ChannelType::Preview,
            input_id: self.input_id.clone(),
            app_link_intent_uri: self.links.start_app_uri(),
            internal_provider_id: Some(category.id.clone()),
            browsable: false,
        };

        match self.provider.insert_channel(channel).await {
            Ok(channel_id) => {
                info!(
                    operation = "channel_added",
                    channel_id = channel_id,
                    category_id = %category.id,
                    "Added channel '{}'",
                    category.name
                );
                Some(channel_id)
            }
            Err(e) => {
                error!("Failed to add channel for category {}: {}", category.id, e);
                None
            }
        }
    }

    pub async fn request_channel_browsable(&self, channel_id: ChannelId) -> bool {
        match self.provider.request_channel_browsable(channel_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not make channel {} browsable: {}", channel_id, e);
                false
            }
        }
    }

    pub async fn delete_channel(&self, channel_id: ChannelId) -> bool {
        match self.provider.delete_channel(channel_id).await {
            Ok(0) => {
                warn!("Channel {} was already gone", channel_id);
                false
            }
            Ok(_) => {
                info!(operation = "channel_deleted", channel_id = channel_id, "Deleted channel {}", channel_id);
                true
            }
            Err(e) => {
                error!("Failed to delete channel {}: {}", channel_id, e);
                false
            }
        }
    }

    /// Delete every channel, returning how many were removed
    pub async fn delete_channels(&self) -> Result<usize, ProviderError> {
        let deleted = self.provider.delete_all_channels().await?;
        info!(operation = "channels_cleared", count = deleted, "Deleted {} channels", deleted);
        Ok(deleted)
    }

    /// Publish every movie of a category in a freshly created channel
    ///
    /// Movies are weighted so the first one of the category is shown first.
    /// Movies that could not be published are missing from the result.
    pub async fn add_programs(&self, channel_id: ChannelId, category: &Category) -> Vec<MovieProgramId> {
        let count = category.movies.len();
        let mut published = Vec::with_capacity(count);
        for (index, movie) in category.movies.iter().enumerate() {
            let weight = i32::try_from(count - index).unwrap_or(i32::MAX);
            if let Some(program_id) = self.add_program(channel_id, movie, weight).await {
                published.push(MovieProgramId::new(movie.movie_id, vec![program_id]));
            }
        }
        debug!("Published {}/{} programs in channel {}", published.len(), count, channel_id);
        published
    }

    pub async fn add_program(&self, channel_id: ChannelId, movie: &Movie, weight: i32) -> Option<ProgramId> {
        let program = PreviewProgramRow {
            channel_id,
            weight,
            content: ProgramContent::from_movie(movie, &self.links),
            browsable: true,
        };

        match self.provider.insert_preview_program(program).await {
            Ok(program_id) => {
                debug!("Added program {} for movie {} to channel {}", program_id, movie.movie_id, channel_id);
                Some(program_id)
            }
            Err(e) => {
                error!("Failed to add movie {} to channel {}: {}", movie.movie_id, channel_id, e);
                None
            }
        }
    }

    /// Internal id, program id and title of every program in a channel
    pub async fn load_programs_for_channel(&self, channel_id: ChannelId) -> Result<Vec<ProgramMetadata>, ProviderError> {
        let programs = self.provider.query_preview_programs(channel_id).await?;
        Ok(programs
            .into_iter()
            .filter_map(|row| {
                let Row { id, data } = row;
                data.content.internal_provider_id.map(|internal_id| ProgramMetadata {
                    id: internal_id,
                    program_id: id,
                    title: data.content.title,
                })
            })
            .collect())
    }

    pub async fn get_programs(&self, channel_id: ChannelId) -> Result<Vec<Row<PreviewProgramRow>>, ProviderError> {
        self.provider.query_preview_programs(channel_id).await
    }

    /// Overwrite the metadata of a published program with the movie's
    ///
    /// The program keeps its id, channel, weight and browsable flag.
    pub async fn update_program(&self, program_id: ProgramId, movie: &Movie) -> bool {
        let existing = match self.provider.get_preview_program(program_id).await {
            Ok(Some(row)) => row.data,
            Ok(None) => {
                warn!("Program {} not found, cannot update movie {}", program_id, movie.movie_id);
                return false;
            }
            Err(e) => {
                error!("Failed to read program {}: {}", program_id, e);
                return false;
            }
        };

        let updated = PreviewProgramRow {
            content: ProgramContent::from_movie(movie, &self.links),
            ..existing
        };

        match self.provider.update_preview_program(program_id, updated).await {
            Ok(0) => {
                warn!("Update of program {} affected no rows", program_id);
                false
            }
            Ok(_) => {
                debug!("Updated program {} from movie {}", program_id, movie.movie_id);
                true
            }
            Err(e) => {
                error!("Failed to update program {}: {}", program_id, e);
                false
            }
        }
    }

    pub async fn delete_program(&self, program_id: ProgramId) -> bool {
        match self.provider.delete_preview_program(program_id).await {
            Ok(0) => {
                warn!("Program {} was already gone", program_id);
                false
            }
            Ok(_) => {
                debug!("Deleted program {}", program_id);
                true
            }
            Err(e) => {
                error!("Failed to delete program {}: {}", program_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;

    fn facade() -> (Arc<MemoryProvider>, ChannelFacade) {
        let provider = Arc::new(MemoryProvider::new());
        let facade = ChannelFacade::new(provider.clone(), AppLinks::default(), "test/.Input");
        (provider, facade)
    }

    fn category() -> Category {
        Category::new("1", "Recommendations", "Recommended videos for you.").with_movies(vec![
            Movie::new(1, "one"),
            Movie::new(2, "two"),
            Movie::new(3, "three"),
        ])
    }

    #[tokio::test]
    async fn test_add_channel_uses_category_id() {
        let (provider, facade) = facade();
        let channel_id = facade.add_channel(&category()).await.unwrap();
        assert!(facade.request_channel_browsable(channel_id).await);

        let channels = provider.query_channels().await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].data.internal_provider_id.as_deref(), Some("1"));
        assert_eq!(channels[0].data.input_id, "test/.Input");
        assert!(channels[0].data.browsable);

        let ids = facade.find_channel_category_ids().await.unwrap();
        assert_eq!(ids.channel_for_category("1"), Some(channel_id));
    }

    #[tokio::test]
    async fn test_add_programs_weights_in_category_order() {
        let (_, facade) = facade();
        let category = category();
        let channel_id = facade.add_channel(&category).await.unwrap();

        let published = facade.add_programs(channel_id, &category).await;
        assert_eq!(
            published.iter().map(|p| p.movie_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let programs = facade.get_programs(channel_id).await.unwrap();
        let weights: Vec<(String, i32)> = programs
            .iter()
            .map(|p| (p.data.content.title.clone(), p.data.weight))
            .collect();
        assert_eq!(
            weights,
            vec![("one".to_string(), 3), ("two".to_string(), 2), ("three".to_string(), 1)]
        );

        let metadata = facade.load_programs_for_channel(channel_id).await.unwrap();
        assert_eq!(metadata.len(), 3);
        assert!(metadata.iter().all(|m| m.movie_id().is_some()));
    }

    #[tokio::test]
    async fn test_update_program_keeps_placement() {
        let (_, facade) = facade();
        let category = category();
        let channel_id = facade.add_channel(&category).await.unwrap();
        let program_id = facade.add_program(channel_id, &category.movies[0], 5).await.unwrap();

        let mut renamed = category.movies[0].clone();
        renamed.title = "uno".to_string();
        assert!(facade.update_program(program_id, &renamed).await);

        let programs = facade.get_programs(channel_id).await.unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, program_id);
        assert_eq!(programs[0].data.weight, 5);
        assert_eq!(programs[0].data.content.title, "uno");
    }

    #[tokio::test]
    async fn test_missing_rows_are_reported_not_raised() {
        let (_, facade) = facade();
        assert!(!facade.update_program(42, &Movie::new(1, "one")).await);
        assert!(!facade.delete_program(42).await);
        assert!(!facade.delete_channel(42).await);
        assert_eq!(facade.add_program(42, &Movie::new(1, "one"), 1).await, None);
    }

    #[tokio::test]
    async fn test_rejected_writes_return_none() {
        let (provider, facade) = facade();
        provider.set_read_only(true);
        assert_eq!(facade.add_channel(&category()).await, None);
        assert!(facade.find_channel_category_ids().await.unwrap().is_empty());
    }
}
