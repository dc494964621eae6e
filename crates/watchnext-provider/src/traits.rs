use async_trait::async_trait;
use watchnext_models::{ChannelId, ProgramId};
use crate::error::ProviderError;
use crate::rows::{ChannelRow, PreviewProgramRow, Row, WatchNextProgramRow};

/// Channel and preview program tables of a TV provider
///
/// Inserts return the id assigned by the provider. Updates and deletes return
/// the number of rows affected, which is zero when the id is unknown.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    // Channels
    async fn insert_channel(&self, channel: ChannelRow) -> Result<ChannelId, ProviderError>;
    async fn query_channels(&self) -> Result<Vec<Row<ChannelRow>>, ProviderError>;
    /// Deleting a channel also deletes every preview program it holds
    async fn delete_channel(&self, channel_id: ChannelId) -> Result<usize, ProviderError>;
    async fn delete_all_channels(&self) -> Result<usize, ProviderError>;
    async fn request_channel_browsable(&self, channel_id: ChannelId) -> Result<(), ProviderError>;

    // Preview programs
    async fn insert_preview_program(&self, program: PreviewProgramRow) -> Result<ProgramId, ProviderError>;
    async fn query_preview_programs(&self, channel_id: ChannelId) -> Result<Vec<Row<PreviewProgramRow>>, ProviderError>;
    async fn get_preview_program(&self, program_id: ProgramId) -> Result<Option<Row<PreviewProgramRow>>, ProviderError>;
    async fn update_preview_program(&self, program_id: ProgramId, program: PreviewProgramRow) -> Result<usize, ProviderError>;
    async fn delete_preview_program(&self, program_id: ProgramId) -> Result<usize, ProviderError>;
}

/// The watch next table of a TV provider
#[async_trait]
pub trait WatchNextProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn insert_watch_next_program(&self, program: WatchNextProgramRow) -> Result<ProgramId, ProviderError>;
    async fn query_watch_next_programs(&self) -> Result<Vec<Row<WatchNextProgramRow>>, ProviderError>;
    async fn update_watch_next_program(&self, program_id: ProgramId, program: WatchNextProgramRow) -> Result<usize, ProviderError>;
    async fn delete_watch_next_program(&self, program_id: ProgramId) -> Result<usize, ProviderError>;
    async fn delete_all_watch_next_programs(&self) -> Result<usize, ProviderError>;

    /// Set the browsable flag of a watch next program
    ///
    /// The home screen clears this flag when the user dismisses an entry.
    async fn set_watch_next_browsable(&self, program_id: ProgramId, browsable: bool) -> Result<usize, ProviderError>;
}
