use serde::{Deserialize, Serialize};
use crate::{MovieId, ProgramId};

/// Maps a local movie to the ids the provider assigned to it
///
/// A movie can be published in several channels, so it may own several preview
/// program ids, but it appears at most once in the watch next row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieProgramId {
    pub movie_id: MovieId,
    #[serde(default)]
    pub program_ids: Vec<ProgramId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_next_program_id: Option<ProgramId>,
}

/// How a write should treat the stored watch next id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchNextUpdate {
    #[default]
    Keep,
    Set(ProgramId),
    Clear,
}

impl From<Option<ProgramId>> for WatchNextUpdate {
    /// A missing id keeps whatever is stored
    fn from(id: Option<ProgramId>) -> Self {
        match id {
            Some(id) => WatchNextUpdate::Set(id),
            None => WatchNextUpdate::Keep,
        }
    }
}

impl MovieProgramId {
    pub fn new(movie_id: MovieId, program_ids: Vec<ProgramId>) -> Self {
        let mut ids = Self {
            movie_id,
            program_ids: Vec::with_capacity(program_ids.len()),
            watch_next_program_id: None,
        };
        ids.add_program_ids(&program_ids);
        ids
    }

    pub fn with_watch_next(mut self, watch_next_program_id: ProgramId) -> Self {
        self.watch_next_program_id = Some(watch_next_program_id);
        self
    }

    /// Add program ids not already present, keeping first-insertion order
    pub fn add_program_ids(&mut self, program_ids: &[ProgramId]) {
        for id in program_ids {
            if !self.program_ids.contains(id) {
                self.program_ids.push(*id);
            }
        }
    }

    /// Merge another mapping for the same movie into this one
    ///
    /// Program ids are unioned. The watch next id is only overwritten when the
    /// incoming mapping carries one.
    pub fn merge(&mut self, other: &MovieProgramId) {
        self.add_program_ids(&other.program_ids);
        if other.watch_next_program_id.is_some() {
            self.watch_next_program_id = other.watch_next_program_id;
        }
    }

    pub fn apply_watch_next(&mut self, update: WatchNextUpdate) {
        match update {
            WatchNextUpdate::Keep => {}
            WatchNextUpdate::Set(id) => self.watch_next_program_id = Some(id),
            WatchNextUpdate::Clear => self.watch_next_program_id = None,
        }
    }

    /// Remove a single program id, returning whether it was present
    pub fn remove_program_id(&mut self, program_id: ProgramId) -> bool {
        let before = self.program_ids.len();
        self.program_ids.retain(|id| *id != program_id);
        self.program_ids.len() != before
    }

    pub fn contains_program_id(&self, program_id: ProgramId) -> bool {
        self.program_ids.contains(&program_id)
    }

    /// True when the mapping no longer references anything in the provider
    pub fn is_empty(&self) -> bool {
        self.program_ids.is_empty() && self.watch_next_program_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deduplicates_program_ids() {
        let ids = MovieProgramId::new(1, vec![3, 1, 3, 2]);
        assert_eq!(ids.program_ids, vec![3, 1, 2]);
        assert_eq!(ids.watch_next_program_id, None);
    }

    #[test]
    fn test_merge_unions_program_ids() {
        let mut existing = MovieProgramId::new(1, vec![1, 2]).with_watch_next(1);
        existing.merge(&MovieProgramId::new(1, vec![2, 10, 20]));

        assert_eq!(existing.program_ids, vec![1, 2, 10, 20]);
        // No incoming watch next id leaves the stored one alone
        assert_eq!(existing.watch_next_program_id, Some(1));

        existing.merge(&MovieProgramId::new(1, vec![]).with_watch_next(7));
        assert_eq!(existing.watch_next_program_id, Some(7));
    }

    #[test]
    fn test_apply_watch_next() {
        let mut ids = MovieProgramId::new(1, vec![]).with_watch_next(5);
        ids.apply_watch_next(WatchNextUpdate::Keep);
        assert_eq!(ids.watch_next_program_id, Some(5));
        ids.apply_watch_next(WatchNextUpdate::Set(6));
        assert_eq!(ids.watch_next_program_id, Some(6));
        ids.apply_watch_next(WatchNextUpdate::Clear);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_remove_program_id() {
        let mut ids = MovieProgramId::new(1, vec![1, 2]);
        assert!(ids.remove_program_id(2));
        assert!(!ids.remove_program_id(2));
        assert_eq!(ids.program_ids, vec![1]);
        assert!(!ids.is_empty());
        assert!(ids.remove_program_id(1));
        assert!(ids.is_empty());
    }
}
