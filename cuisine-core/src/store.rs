//! Recipe store client: CRUD over the remote service with a local mirror.
//!
//! Reads go to the remote service first. A successful listing replaces the
//! mirror wholesale; successful mutations patch it in place. When the
//! remote is unreachable a listing may be served from the mirror, and the
//! result says so.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::api::RecipeApi;
use crate::cache::RecipeCache;
use crate::comments::CommentManager;
use crate::error::{ApiError, StoreError};
use crate::filter::RecipeFilter;
use crate::types::{Recipe, RecipeDraft, RecipePatch};
use crate::validation::{default_categories, normalize_ingredients, validate_draft, validate_patch};

/// Where a listing came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// Fresh from the remote service.
    Remote,
    /// Served from the local mirror because the remote call failed.
    StaleCache { reason: String },
}

/// Result of [`RecipeStore::list_recipes`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeListing {
    pub recipes: Vec<Recipe>,
    pub source: ListSource,
}

impl RecipeListing {
    pub fn is_stale(&self) -> bool {
        matches!(self.source, ListSource::StaleCache { .. })
    }

    /// Apply a filter, keeping the source annotation.
    pub fn filtered(self, filter: &RecipeFilter) -> Self {
        Self {
            recipes: filter.apply(self.recipes),
            source: self.source,
        }
    }
}

/// Monotonic id source: unix millis, bumped when two ids would collide.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub(crate) fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(prev) | Err(prev) => now.max(prev + 1),
        }
    }
}

/// ISO-8601 timestamp with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Configuration for RecipeStore.
pub struct RecipeStoreBuilder {
    api: Arc<dyn RecipeApi>,
    cache: Option<Arc<dyn RecipeCache>>,
    categories: Vec<String>,
    stale_fallback: bool,
}

impl RecipeStoreBuilder {
    /// Set the local mirror. None disables mirroring.
    pub fn cache(mut self, cache: Option<Arc<dyn RecipeCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the allowed categories. An empty list accepts any category.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Whether a failed listing may be answered from the mirror.
    pub fn stale_fallback(mut self, enabled: bool) -> Self {
        self.stale_fallback = enabled;
        self
    }

    pub fn build(self) -> RecipeStore {
        RecipeStore {
            api: self.api,
            cache: self.cache,
            categories: self.categories,
            stale_fallback: self.stale_fallback,
            ids: IdGenerator::default(),
        }
    }
}

/// Single point of access for recipe CRUD.
pub struct RecipeStore {
    api: Arc<dyn RecipeApi>,
    cache: Option<Arc<dyn RecipeCache>>,
    categories: Vec<String>,
    stale_fallback: bool,
    ids: IdGenerator,
}

impl RecipeStore {
    /// Store with no mirror and the default categories.
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self::builder(api).build()
    }

    pub fn builder(api: Arc<dyn RecipeApi>) -> RecipeStoreBuilder {
        RecipeStoreBuilder {
            api,
            cache: None,
            categories: default_categories(),
            stale_fallback: true,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Comment operations on recipes held by this store.
    pub fn comments(&self) -> CommentManager<'_> {
        CommentManager::new(self)
    }

    /// Fetch every recipe and replace the mirror with the result.
    ///
    /// On failure the error is returned, unless stale fallback is enabled
    /// and a non-empty mirror snapshot exists, in which case the snapshot is
    /// returned marked [`ListSource::StaleCache`].
    pub async fn list_recipes(&self) -> Result<RecipeListing, StoreError> {
        match self.api.list().await {
            Ok(recipes) => {
                tracing::debug!(count = recipes.len(), "store: listed recipes");
                self.write_cache(&recipes);
                Ok(RecipeListing {
                    recipes,
                    source: ListSource::Remote,
                })
            }
            Err(err) => {
                if self.stale_fallback {
                    // An empty snapshot would pass a failure off as an empty collection
                    if let Some(recipes) = self.read_cache().filter(|r| !r.is_empty()) {
                        tracing::warn!(
                            error = %err,
                            count = recipes.len(),
                            "store: listing failed, serving stale cache"
                        );
                        return Ok(RecipeListing {
                            recipes,
                            source: ListSource::StaleCache {
                                reason: err.to_string(),
                            },
                        });
                    }
                }
                tracing::warn!(error = %err, "store: listing failed");
                Err(StoreError::Transport(err))
            }
        }
    }

    /// The mirror snapshot without contacting the remote service.
    pub fn cached_recipes(&self) -> Option<RecipeListing> {
        self.read_cache().map(|recipes| RecipeListing {
            recipes,
            source: ListSource::StaleCache {
                reason: "read from local cache".to_string(),
            },
        })
    }

    /// Fetch one recipe. A hit refreshes the mirror entry, a miss drops it.
    pub async fn get_recipe(&self, id: &str) -> Result<Recipe, StoreError> {
        match self.api.get(id).await {
            Ok(recipe) => {
                self.patch_cache(|recipes| replace_entry(recipes, &recipe));
                Ok(recipe)
            }
            Err(ApiError::NotFound(_)) => {
                self.patch_cache(|recipes| remove_entry(recipes, id));
                Err(StoreError::recipe_not_found(id))
            }
            Err(err) => Err(StoreError::Transport(err)),
        }
    }

    /// Validate, stamp and submit a new recipe.
    ///
    /// The client assigns `id`, `createdAt`, `likes = 0` and empty
    /// `comments`; whatever the service returns is what gets stored.
    pub async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe, StoreError> {
        validate_draft(&draft, &self.categories)?;

        let draft = RecipeDraft {
            ingredients: normalize_ingredients(&draft.ingredients),
            ..draft
        };
        let id = format!("recipe_{}", self.ids.next());
        let recipe = Recipe::from_draft(draft, id, now_timestamp());

        let stored = self.api.create(&recipe).await.map_err(StoreError::Transport)?;
        tracing::info!(id = %stored.id, title = %stored.title, "store: recipe created");

        self.patch_cache(|recipes| {
            if !replace_entry(recipes, &stored) {
                recipes.push(stored.clone());
            }
            true
        });
        Ok(stored)
    }

    /// Change only the fields the patch carries.
    pub async fn update_recipe(&self, id: &str, patch: RecipePatch) -> Result<Recipe, StoreError> {
        validate_patch(&patch, &self.categories)?;

        let mut recipe = self.fetch_for_mutation(id).await?;
        if patch.is_empty() {
            tracing::debug!(id, "store: empty patch, nothing to update");
            return Ok(recipe);
        }

        let patch = RecipePatch {
            ingredients: patch.ingredients.as_deref().map(normalize_ingredients),
            ..patch
        };
        patch.apply(&mut recipe);

        let updated = self.put_recipe(recipe).await?;
        tracing::info!(id, "store: recipe updated");
        Ok(updated)
    }

    /// Delete a recipe. Deleting an id that does not exist succeeds.
    pub async fn delete_recipe(&self, id: &str) -> Result<(), StoreError> {
        match self.api.delete(id).await {
            Ok(()) => tracing::info!(id, "store: recipe deleted"),
            Err(ApiError::NotFound(_)) => tracing::debug!(id, "store: delete of missing recipe"),
            Err(err) => return Err(StoreError::Transport(err)),
        }
        self.patch_cache(|recipes| remove_entry(recipes, id));
        Ok(())
    }

    /// Add one like.
    pub async fn like_recipe(&self, id: &str) -> Result<Recipe, StoreError> {
        let mut recipe = self.fetch_for_mutation(id).await?;
        recipe.likes = recipe.likes.saturating_add(1);
        self.put_recipe(recipe).await
    }

    /// Read the current remote record ahead of a read-modify-write.
    pub(crate) async fn fetch_for_mutation(&self, id: &str) -> Result<Recipe, StoreError> {
        self.api.get(id).await.map_err(|err| match err {
            ApiError::NotFound(_) => StoreError::recipe_not_found(id),
            other => StoreError::Transport(other),
        })
    }

    /// Write a full record back and mirror the service's answer.
    pub(crate) async fn put_recipe(&self, recipe: Recipe) -> Result<Recipe, StoreError> {
        let id = recipe.id.clone();
        let updated = self.api.update(&id, &recipe).await.map_err(|err| match err {
            ApiError::NotFound(_) => StoreError::recipe_not_found(&id),
            other => StoreError::Transport(other),
        })?;
        self.patch_cache(|recipes| replace_entry(recipes, &updated));
        Ok(updated)
    }

    pub(crate) fn next_id(&self) -> i64 {
        self.ids.next()
    }

    fn read_cache(&self) -> Option<Vec<Recipe>> {
        let cache = self.cache.as_ref()?;
        match cache.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "cache: read failed");
                None
            }
        }
    }

    fn write_cache(&self, recipes: &[Recipe]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.write(recipes) {
                tracing::warn!(error = %e, "cache: write failed");
            }
        }
    }

    /// Edit the mirror in place. Only an existing snapshot is patched;
    /// the closure returns whether it changed anything.
    fn patch_cache<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<Recipe>) -> bool,
    {
        let Some(mut recipes) = self.read_cache() else {
            return;
        };
        if edit(&mut recipes) {
            self.write_cache(&recipes);
        }
    }
}

fn replace_entry(recipes: &mut [Recipe], recipe: &Recipe) -> bool {
    match recipes.iter_mut().find(|r| r.id == recipe.id) {
        Some(slot) => {
            *slot = recipe.clone();
            true
        }
        None => false,
    }
}

fn remove_entry(recipes: &mut Vec<Recipe>, id: &str) -> bool {
    let before = recipes.len();
    recipes.retain(|r| r.id != id);
    recipes.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FakeRecipeApi;
    use crate::cache::{sample_recipe, MemoryCache};

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let ids = IdGenerator::default();
        let mut prev = ids.next();
        for _ in 0..1000 {
            let next = ids.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[tokio::test]
    async fn test_create_without_snapshot_does_not_seed_partial_cache() {
        let cache = Arc::new(MemoryCache::new());
        let store = RecipeStore::builder(Arc::new(FakeRecipeApi::new()))
            .cache(Some(cache.clone()))
            .build();

        store
            .create_recipe(RecipeDraft {
                title: "Tarte".to_string(),
                description: "desc".to_string(),
                ingredients: vec!["pomme".to_string()],
                category: "Dessert".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(cache.read().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_miss_drops_stale_mirror_entry() {
        let cache = Arc::new(MemoryCache::with_recipes(vec![sample_recipe("ghost")]));
        let store = RecipeStore::builder(Arc::new(FakeRecipeApi::new()))
            .cache(Some(cache.clone()))
            .build();

        let err = store.get_recipe("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.read().unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_empty_patch_makes_no_remote_write() {
        let api = Arc::new(FakeRecipeApi::with_recipes(vec![sample_recipe("recipe_1")]));
        let store = RecipeStore::new(api.clone());

        let recipe = store
            .update_recipe("recipe_1", RecipePatch::default())
            .await
            .unwrap();
        assert_eq!(recipe, sample_recipe("recipe_1"));
        // Only the read
        assert_eq!(api.request_count(), 1);
    }

    #[tokio::test]
    async fn test_like_increments_once() {
        let api = Arc::new(FakeRecipeApi::with_recipes(vec![sample_recipe("recipe_1")]));
        let store = RecipeStore::new(api);

        store.like_recipe("recipe_1").await.unwrap();
        let recipe = store.like_recipe("recipe_1").await.unwrap();
        assert_eq!(recipe.likes, 2);
        assert!(store.like_recipe("missing").await.unwrap_err().is_not_found());
    }
}
