//! File-backed cache mirror.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RecipeCache, CACHE_KEY};
use crate::error::CacheError;
use crate::types::Recipe;

/// Stores the whole collection as one JSON document at `<dir>/recipes.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    /// Create a new FileCache rooted at the given directory.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Get the default cache directory: ~/.cuisine/cache
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".cuisine").join("cache"))
            .unwrap_or_else(|| PathBuf::from("data/cache"))
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", CACHE_KEY))
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }
}

impl RecipeCache for FileCache {
    fn read(&self) -> Result<Option<Vec<Recipe>>, CacheError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let recipes: Vec<Recipe> = serde_json::from_str(&contents)?;
        Ok(Some(recipes))
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        // Write to a sibling temp file and rename so readers never see a
        // half-written snapshot.
        let path = self.path();
        let tmp = self.cache_dir.join(format!(".{}.json.tmp", CACHE_KEY));
        fs::write(&tmp, serde_json::to_string_pretty(recipes)?)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!(path = %path.display(), count = recipes.len(), "cache: snapshot written");
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
