//! Local cache mirror of the recipe collection.
//!
//! The mirror is a full-collection snapshot read and written as a whole.
//! Business logic only sees the [`RecipeCache`] trait so alternate backings
//! can be swapped in without touching the store.

mod file;

pub use file::FileCache;

use std::sync::RwLock;

use crate::error::CacheError;
use crate::types::Recipe;

/// Well-known key the collection is stored under.
pub const CACHE_KEY: &str = "recipes";

/// Storage port for the local mirror.
pub trait RecipeCache: Send + Sync {
    /// Read the whole snapshot. `None` means nothing has been cached yet.
    fn read(&self) -> Result<Option<Vec<Recipe>>, CacheError>;

    /// Replace the whole snapshot.
    fn write(&self, recipes: &[Recipe]) -> Result<(), CacheError>;

    /// Forget the snapshot entirely.
    fn clear(&self) -> Result<(), CacheError>;
}

/// Process-local cache, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    snapshot: RwLock<Option<Vec<Recipe>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with a snapshot.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            snapshot: RwLock::new(Some(recipes)),
        }
    }
}

impl RecipeCache for MemoryCache {
    fn read(&self) -> Result<Option<Vec<Recipe>>, CacheError> {
        let guard = self.snapshot.read().map_err(|_| CacheError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        let mut guard = self.snapshot.write().map_err(|_| CacheError::Poisoned)?;
        *guard = Some(recipes.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut guard = self.snapshot.write().map_err(|_| CacheError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_recipe(id: &str) -> Recipe {
    use crate::types::RecipeDraft;

    Recipe::from_draft(
        RecipeDraft {
            title: format!("Recipe {}", id),
            description: "desc".to_string(),
            ingredients: vec!["pomme".to_string()],
            category: "Dessert".to_string(),
            author: "bob".to_string(),
            ..Default::default()
        },
        id.to_string(),
        "2024-01-01T00:00:00.000Z".to_string(),
    )
}
