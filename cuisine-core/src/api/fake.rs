//! In-memory recipe service for testing.
//!
//! Behaves like a well-formed backend: ids are unique, missing ids are
//! reported as NotFound, and the whole thing can be switched offline to
//! simulate an unreachable server.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::RecipeApi;
use crate::error::ApiError;
use crate::types::Recipe;

/// A fake remote recipe store.
#[derive(Debug)]
pub struct FakeRecipeApi {
    recipes: RwLock<Vec<Recipe>>,
    online: AtomicBool,
    requests: AtomicUsize,
}

impl Default for FakeRecipeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRecipeApi {
    /// Create an empty, reachable fake.
    pub fn new() -> Self {
        Self {
            recipes: RwLock::new(Vec::new()),
            online: AtomicBool::new(true),
            requests: AtomicUsize::new(0),
        }
    }

    /// Create a fake that already holds some recipes.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        let api = Self::new();
        if let Ok(mut guard) = api.recipes.write() {
            *guard = recipes;
        }
        api
    }

    /// When false, every call fails with [`ApiError::Unavailable`].
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of calls made so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Copy of what the fake currently stores, bypassing the outage switch.
    pub fn snapshot(&self) -> Vec<Recipe> {
        self.recipes.read().map(|r| r.clone()).unwrap_or_default()
    }

    fn begin(&self) -> Result<(), ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Unavailable("fake recipe service is offline".to_string()))
        }
    }

    fn poisoned() -> ApiError {
        ApiError::Unavailable("fake recipe service lock poisoned".to_string())
    }
}

#[async_trait]
impl RecipeApi for FakeRecipeApi {
    async fn list(&self) -> Result<Vec<Recipe>, ApiError> {
        self.begin()?;
        let recipes = self.recipes.read().map_err(|_| Self::poisoned())?;
        Ok(recipes.clone())
    }

    async fn get(&self, id: &str) -> Result<Recipe, ApiError> {
        self.begin()?;
        let recipes = self.recipes.read().map_err(|_| Self::poisoned())?;
        recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        self.begin()?;
        let mut recipes = self.recipes.write().map_err(|_| Self::poisoned())?;
        if recipes.iter().any(|r| r.id == recipe.id) {
            return Err(ApiError::Status {
                status: 409,
                body: format!("Recipe {} already exists", recipe.id),
            });
        }
        recipes.push(recipe.clone());
        Ok(recipe.clone())
    }

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<Recipe, ApiError> {
        self.begin()?;
        let mut recipes = self.recipes.write().map_err(|_| Self::poisoned())?;
        let slot = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        // The path id is authoritative
        let mut stored = recipe.clone();
        stored.id = id.to_string();
        *slot = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.begin()?;
        let mut recipes = self.recipes.write().map_err(|_| Self::poisoned())?;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        if recipes.len() == before {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
