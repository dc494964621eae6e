use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use watchnext_models::{ChannelId, ProgramId};
use crate::rows::{ChannelRow, PreviewProgramRow, Row, WatchNextProgramRow};

/// Channel, preview program and watch next tables shared by the provider
/// implementations. Ids start at 1 and are never reused within a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTables {
    next_channel_id: ChannelId,
    next_program_id: ProgramId,
    next_watch_next_id: ProgramId,
    channels: BTreeMap<ChannelId, ChannelRow>,
    preview_programs: BTreeMap<ProgramId, PreviewProgramRow>,
    watch_next_programs: BTreeMap<ProgramId, WatchNextProgramRow>,
}

impl Default for ProviderTables {
    fn default() -> Self {
        Self {
            next_channel_id: 1,
            next_program_id: 1,
            next_watch_next_id: 1,
            channels: BTreeMap::new(),
            preview_programs: BTreeMap::new(),
            watch_next_programs: BTreeMap::new(),
        }
    }
}

impl ProviderTables {
    pub fn insert_channel(&mut self, channel: ChannelRow) -> ChannelId {
        let id = self.next_channel_id;
        self.next_channel_id += 1;
        self.channels.insert(id, channel);
        id
    }

    pub fn channels(&self) -> Vec<Row<ChannelRow>> {
        self.channels
            .iter()
            .map(|(id, data)| Row { id: *id, data: data.clone() })
            .collect()
    }

    pub fn delete_channel(&mut self, channel_id: ChannelId) -> usize {
        if self.channels.remove(&channel_id).is_none() {
            return 0;
        }
        self.preview_programs.retain(|_, program| program.channel_id != channel_id);
        1
    }

    pub fn delete_all_channels(&mut self) -> usize {
        let deleted = self.channels.len();
        self.channels.clear();
        self.preview_programs.clear();
        deleted
    }

    pub fn set_channel_browsable(&mut self, channel_id: ChannelId, browsable: bool) -> usize {
        match self.channels.get_mut(&channel_id) {
            Some(channel) => {
                channel.browsable = browsable;
                1
            }
            None => 0,
        }
    }

    /// Insert a program, or `None` when its channel does not exist
    pub fn insert_preview_program(&mut self, program: PreviewProgramRow) -> Option<ProgramId> {
        if !self.channels.contains_key(&program.channel_id) {
            return None;
        }
        let id = self.next_program_id;
        self.next_program_id += 1;
        self.preview_programs.insert(id, program);
        Some(id)
    }

    /// Programs of a channel, highest weight first
    pub fn preview_programs(&self, channel_id: ChannelId) -> Vec<Row<PreviewProgramRow>> {
        let mut programs: Vec<Row<PreviewProgramRow>> = self
            .preview_programs
            .iter()
            .filter(|(_, program)| program.channel_id == channel_id)
            .map(|(id, data)| Row { id: *id, data: data.clone() })
            .collect();
        // Stable sort keeps insertion order among equal weights
        programs.sort_by(|a, b| b.data.weight.cmp(&a.data.weight));
        programs
    }

    pub fn preview_program(&self, program_id: ProgramId) -> Option<Row<PreviewProgramRow>> {
        self.preview_programs
            .get(&program_id)
            .map(|data| Row { id: program_id, data: data.clone() })
    }

    pub fn update_preview_program(&mut self, program_id: ProgramId, program: PreviewProgramRow) -> usize {
        match self.preview_programs.get_mut(&program_id) {
            Some(existing) => {
                *existing = program;
                1
            }
            None => 0,
        }
    }

    pub fn delete_preview_program(&mut self, program_id: ProgramId) -> usize {
        usize::from(self.preview_programs.remove(&program_id).is_some())
    }

    pub fn insert_watch_next_program(&mut self, program: WatchNextProgramRow) -> ProgramId {
        let id = self.next_watch_next_id;
        self.next_watch_next_id += 1;
        self.watch_next_programs.insert(id, program);
        id
    }

    pub fn watch_next_programs(&self) -> Vec<Row<WatchNextProgramRow>> {
        self.watch_next_programs
            .iter()
            .map(|(id, data)| Row { id: *id, data: data.clone() })
            .collect()
    }

    pub fn update_watch_next_program(&mut self, program_id: ProgramId, program: WatchNextProgramRow) -> usize {
        match self.watch_next_programs.get_mut(&program_id) {
            Some(existing) => {
                *existing = program;
                1
            }
            None => 0,
        }
    }

    pub fn delete_watch_next_program(&mut self, program_id: ProgramId) -> usize {
        usize::from(self.watch_next_programs.remove(&program_id).is_some())
    }

    pub fn delete_all_watch_next_programs(&mut self) -> usize {
        let deleted = self.watch_next_programs.len();
        self.watch_next_programs.clear();
        deleted
    }

    pub fn set_watch_next_browsable(&mut self, program_id: ProgramId, browsable: bool) -> usize {
        match self.watch_next_programs.get_mut(&program_id) {
            Some(program) => {
                program.browsable = browsable;
                1
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::AppLinks;
    use crate::rows::{ChannelType, ProgramContent};
    use watchnext_models::Movie;

    fn channel(category_id: &str) -> ChannelRow {
        ChannelRow {
            display_name: category_id.to_string(),
            description: String::new(),
            channel_type: ChannelType::Preview,
            input_id: "input".to_string(),
            app_link_intent_uri: String::new(),
            internal_provider_id: Some(category_id.to_string()),
            browsable: false,
        }
    }

    fn program(channel_id: ChannelId, movie_id: u64, weight: i32) -> PreviewProgramRow {
        PreviewProgramRow {
            channel_id,
            weight,
            content: ProgramContent::from_movie(&Movie::new(movie_id, "movie"), &AppLinks::default()),
            browsable: true,
        }
    }

    #[test]
    fn test_deleting_a_channel_deletes_its_programs() {
        let mut tables = ProviderTables::default();
        let a = tables.insert_channel(channel("1"));
        let b = tables.insert_channel(channel("2"));
        tables.insert_preview_program(program(a, 1, 1)).unwrap();
        tables.insert_preview_program(program(b, 1, 1)).unwrap();

        assert_eq!(tables.delete_channel(a), 1);
        assert_eq!(tables.delete_channel(a), 0);
        assert!(tables.preview_programs(a).is_empty());
        assert_eq!(tables.preview_programs(b).len(), 1);
    }

    #[test]
    fn test_programs_need_an_existing_channel() {
        let mut tables = ProviderTables::default();
        assert_eq!(tables.insert_preview_program(program(99, 1, 1)), None);
    }

    #[test]
    fn test_programs_are_ordered_by_weight() {
        let mut tables = ProviderTables::default();
        let channel_id = tables.insert_channel(channel("1"));
        tables.insert_preview_program(program(channel_id, 1, 3)).unwrap();
        tables.insert_preview_program(program(channel_id, 2, 0)).unwrap();
        tables.insert_preview_program(program(channel_id, 3, 5)).unwrap();
        tables.insert_preview_program(program(channel_id, 4, 0)).unwrap();

        let order: Vec<Option<String>> = tables
            .preview_programs(channel_id)
            .into_iter()
            .map(|row| row.data.content.internal_provider_id)
            .collect();
        assert_eq!(
            order,
            vec![Some("3".to_string()), Some("1".to_string()), Some("2".to_string()), Some("4".to_string())]
        );
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut tables = ProviderTables::default();
        let first = tables.insert_channel(channel("1"));
        tables.delete_channel(first);
        let second = tables.insert_channel(channel("1"));
        assert_ne!(first, second);
    }
}
