//! Remote recipe service port and its implementations.
//!
//! All traffic to the authoritative recipe store goes through
//! [`RecipeApi`], so tests can swap the HTTP client for an in-memory fake.

mod fake;
mod http;

pub use fake::FakeRecipeApi;
pub use http::{HttpRecipeApi, HttpRecipeApiBuilder, DEFAULT_BASE_URL};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::Recipe;

/// Trait for the remote recipe store, enabling mockability in tests.
///
/// Implementations report a missing id as [`ApiError::NotFound`] and every
/// other non-success outcome as one of the transport variants.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// `GET /recipes`
    async fn list(&self) -> Result<Vec<Recipe>, ApiError>;

    /// `GET /recipes/{id}`
    async fn get(&self, id: &str) -> Result<Recipe, ApiError>;

    /// `POST /recipes`. Returns the record as stored by the service.
    async fn create(&self, recipe: &Recipe) -> Result<Recipe, ApiError>;

    /// `PUT /recipes/{id}` with the full record.
    async fn update(&self, id: &str, recipe: &Recipe) -> Result<Recipe, ApiError>;

    /// `DELETE /recipes/{id}`
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}
