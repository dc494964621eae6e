use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use watchnext_models::{ChannelId, ProgramId};
use crate::error::ProviderError;
use crate::rows::{ChannelRow, PreviewProgramRow, Row, WatchNextProgramRow};
use crate::tables::ProviderTables;
use crate::traits::{ChannelProvider, WatchNextProvider};

/// Provider whose tables live in memory
///
/// Counts every mutating call so callers can assert that an operation left the
/// provider untouched, and can be switched to reject all writes.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    tables: Mutex<ProviderTables>,
    mutations: AtomicUsize,
    read_only: AtomicBool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of insert, update and delete calls received so far
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Reject every subsequent write with [`ProviderError::Rejected`]
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    async fn mutate<T>(&self, op: impl FnOnce(&mut ProviderTables) -> T) -> Result<T, ProviderError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        if self.read_only.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected("provider is read-only".to_string()));
        }
        let mut tables = self.tables.lock().await;
        Ok(op(&mut tables))
    }
}

#[async_trait]
impl ChannelProvider for MemoryProvider {
    fn provider_name(&self) -> &str {
        "memory"
    }

    async fn insert_channel(&self, channel: ChannelRow) -> Result<ChannelId, ProviderError> {
        self.mutate(|tables| tables.insert_channel(channel)).await
    }

    async fn query_channels(&self) -> Result<Vec<Row<ChannelRow>>, ProviderError> {
        Ok(self.tables.lock().await.channels())
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.delete_channel(channel_id)).await
    }

    async fn delete_all_channels(&self) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.delete_all_channels()).await
    }

    async fn request_channel_browsable(&self, channel_id: ChannelId) -> Result<(), ProviderError> {
        match self.mutate(|tables| tables.set_channel_browsable(channel_id, true)).await? {
            0 => Err(ProviderError::NotFound { table: "channels", id: channel_id }),
            _ => Ok(()),
        }
    }

    async fn insert_preview_program(&self, program: PreviewProgramRow) -> Result<ProgramId, ProviderError> {
        let channel_id = program.channel_id;
        self.mutate(|tables| tables.insert_preview_program(program))
            .await?
            .ok_or(ProviderError::NotFound { table: "channels", id: channel_id })
    }

    async fn query_preview_programs(&self, channel_id: ChannelId) -> Result<Vec<Row<PreviewProgramRow>>, ProviderError> {
        Ok(self.tables.lock().await.preview_programs(channel_id))
    }

    async fn get_preview_program(&self, program_id: ProgramId) -> Result<Option<Row<PreviewProgramRow>>, ProviderError> {
        Ok(self.tables.lock().await.preview_program(program_id))
    }

    async fn update_preview_program(&self, program_id: ProgramId, program: PreviewProgramRow) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.update_preview_program(program_id, program)).await
    }

    async fn delete_preview_program(&self, program_id: ProgramId) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.delete_preview_program(program_id)).await
    }
}

#[async_trait]
impl WatchNextProvider for MemoryProvider {
    fn provider_name(&self) -> &str {
        "memory"
    }

    async fn insert_watch_next_program(&self, program: WatchNextProgramRow) -> Result<ProgramId, ProviderError> {
        self.mutate(|tables| tables.insert_watch_next_program(program)).await
    }

    async fn query_watch_next_programs(&self) -> Result<Vec<Row<WatchNextProgramRow>>, ProviderError> {
        Ok(self.tables.lock().await.watch_next_programs())
    }

    async fn update_watch_next_program(&self, program_id: ProgramId, program: WatchNextProgramRow) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.update_watch_next_program(program_id, program)).await
    }

    async fn delete_watch_next_program(&self, program_id: ProgramId) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.delete_watch_next_program(program_id)).await
    }

    async fn delete_all_watch_next_programs(&self) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.delete_all_watch_next_programs()).await
    }

    async fn set_watch_next_browsable(&self, program_id: ProgramId, browsable: bool) -> Result<usize, ProviderError> {
        self.mutate(|tables| tables.set_watch_next_browsable(program_id, browsable)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{ChannelType, ProgramContent};
    use crate::links::AppLinks;
    use watchnext_models::Movie;

    fn channel() -> ChannelRow {
        ChannelRow {
            display_name: "Dramas".to_string(),
            description: String::new(),
            channel_type: ChannelType::Preview,
            input_id: "input".to_string(),
            app_link_intent_uri: String::new(),
            internal_provider_id: Some("2".to_string()),
            browsable: false,
        }
    }

    #[tokio::test]
    async fn test_reads_are_not_counted() {
        let provider = MemoryProvider::new();
        let channel_id = provider.insert_channel(channel()).await.unwrap();
        provider.query_channels().await.unwrap();
        provider.query_preview_programs(channel_id).await.unwrap();
        provider.query_watch_next_programs().await.unwrap();

        assert_eq!(provider.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let provider = MemoryProvider::new();
        provider.set_read_only(true);

        let result = provider.insert_channel(channel()).await;
        assert!(matches!(result, Err(ProviderError::Rejected(_))));
        assert!(provider.query_channels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_program_in_missing_channel_is_not_found() {
        let provider = MemoryProvider::new();
        let program = PreviewProgramRow {
            channel_id: 9,
            weight: 1,
            content: ProgramContent::from_movie(&Movie::new(1, "one"), &AppLinks::default()),
            browsable: true,
        };

        let result = provider.insert_preview_program(program).await;
        assert!(matches!(result, Err(ProviderError::NotFound { table: "channels", id: 9 })));
    }
}
