use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use watchnext_config::{Config, PathManager};
use watchnext_models::{Category, MovieId, MovieProgramId};

const CATEGORIES_FILE: &str = "categories.json";
const MOVIE_PROGRAM_IDS_FILE: &str = "movie_program_ids.json";
const PLAYBACK_POSITIONS_FILE: &str = "playback_positions.json";

/// JSON files holding the catalog and the ids the provider handed out
///
/// Each document is written to a temp file and renamed into place. A document
/// that cannot be parsed is backed up next to itself and read as empty.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the configured directory, or below the data directory
    pub fn from_config(config: &Config, path_manager: &PathManager) -> Self {
        Self::new(config.store_dir(path_manager))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_categories(&self) -> Result<Vec<Category>> {
        self.load(CATEGORIES_FILE)
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save(CATEGORIES_FILE, &categories)
    }

    pub fn load_movie_program_ids(&self) -> Result<Vec<MovieProgramId>> {
        self.load(MOVIE_PROGRAM_IDS_FILE)
    }

    pub fn save_movie_program_ids(&self, ids: &[MovieProgramId]) -> Result<()> {
        self.save(MOVIE_PROGRAM_IDS_FILE, &ids)
    }

    pub fn delete_movie_program_ids(&self) -> Result<()> {
        self.remove(MOVIE_PROGRAM_IDS_FILE)
    }

    /// Last playback position in milliseconds, keyed by movie id
    pub fn load_playback_positions(&self) -> Result<BTreeMap<MovieId, u64>> {
        self.load(PLAYBACK_POSITIONS_FILE)
    }

    pub fn save_playback_positions(&self, positions: &BTreeMap<MovieId, u64>) -> Result<()> {
        self.save(PLAYBACK_POSITIONS_FILE, positions)
    }

    /// Delete every document in the store
    pub fn clear(&self) -> Result<()> {
        for name in [CATEGORIES_FILE, MOVIE_PROGRAM_IDS_FILE, PLAYBACK_POSITIONS_FILE] {
            self.remove(name)?;
        }
        info!("Cleared local store: {:?}", self.dir);
        Ok(())
    }

    fn load<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.dir.join(name);
        if !path.exists() {
            debug!("Store file {:?} does not exist", path);
            return Ok(T::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file {:?}", path))?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                let backup_path = path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(&path, &backup_path) {
                    warn!(
                        "Failed to backup unreadable store file {:?}: {}. Treating it as empty.",
                        path,
                        backup_err
                    );
                } else {
                    warn!(
                        "Store file {:?} unreadable (error: {}). Backed up to {:?} and treating it as empty.",
                        path,
                        e,
                        backup_path
                    );
                }
                Ok(T::default())
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory {:?}", self.dir))?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &path)?;
        debug!("Saved store file {:?}", path);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to delete store file {:?}", path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use watchnext_models::Movie;

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));

        assert!(store.load_categories().unwrap().is_empty());
        assert!(store.load_movie_program_ids().unwrap().is_empty());
        assert!(store.load_playback_positions().unwrap().is_empty());
    }

    #[test]
    fn test_documents_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());

        let categories = vec![Category::new("1", "a", "b").with_movies(vec![Movie::new(1, "one")])];
        store.save_categories(&categories).unwrap();
        store.save_movie_program_ids(&[MovieProgramId::new(1, vec![4]).with_watch_next(9)]).unwrap();
        store.save_playback_positions(&BTreeMap::from([(1, 2_000)])).unwrap();

        assert_eq!(store.load_categories().unwrap(), categories);
        assert_eq!(store.load_movie_program_ids().unwrap()[0].watch_next_program_id, Some(9));
        assert_eq!(store.load_playback_positions().unwrap().get(&1), Some(&2_000));
        assert!(!dir.path().join("categories.tmp").exists());

        store.clear().unwrap();
        assert!(store.load_categories().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_defaults_below_data_dir() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());

        let store = LocalStore::from_config(&Config::default(), &paths);
        assert_eq!(store.dir(), paths.data_dir().join("store"));

        let mut config = Config::default();
        config.store.dir = Some(dir.path().join("elsewhere"));
        assert_eq!(LocalStore::from_config(&config, &paths).dir(), dir.path().join("elsewhere"));
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        std::fs::write(dir.path().join("movie_program_ids.json"), "[{").unwrap();

        assert!(store.load_movie_program_ids().unwrap().is_empty());
        assert!(dir.path().join("movie_program_ids.json.bak").exists());
    }
}
