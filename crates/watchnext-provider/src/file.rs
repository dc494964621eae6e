use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use watchnext_models::{ChannelId, ProgramId};
use crate::error::ProviderError;
use crate::rows::{ChannelRow, PreviewProgramRow, Row, WatchNextProgramRow};
use crate::tables::ProviderTables;
use crate::traits::{ChannelProvider, WatchNextProvider};

/// Provider persisting its tables as a single JSON document
///
/// The document is rewritten after every write (temp file, then rename) so a
/// crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    tables: Mutex<ProviderTables>,
}

impl FileProvider {
    /// Open the provider file, starting with empty tables if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProviderError> {
        let path = path.into();
        let tables = Self::load(&path)?;
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    fn load(path: &Path) -> Result<ProviderTables, ProviderError> {
        if !path.exists() {
            debug!("Provider file {} does not exist, starting empty", path.display());
            return Ok(ProviderTables::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(tables) => Ok(tables),
            Err(e) => {
                let backup_path = path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(path, &backup_path) {
                    warn!(
                        "Failed to backup unreadable provider file: {}. Starting with empty tables.",
                        backup_err
                    );
                } else {
                    info!(
                        "Provider file unreadable (error: {}). Backed up to {:?} and starting with empty tables.",
                        e,
                        backup_path
                    );
                }
                Ok(ProviderTables::default())
            }
        }
    }

    fn persist(&self, tables: &ProviderTables) -> Result<(), ProviderError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tables)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    async fn mutate<T>(&self, op: impl FnOnce(&mut ProviderTables) -> T) -> Result<T, ProviderError> {
        let mut tables = self.tables.lock().await;
        // Changes only become visible once they are on disk
        let mut next = tables.clone();
        let result = op(&mut next);
        self.persist(&next)?;
        *tables = next;
        Ok(result)
    }
}

#[async_trait]
impl ChannelProvider for FileProvider {
    fn provider_name(&self) -> &str {
        "file"
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
impl WatchNextProvider for FileProvider {
    fn provider_name(&self) -> &str {
        "file"
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
