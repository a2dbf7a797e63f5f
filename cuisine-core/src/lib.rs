pub mod api;
pub mod auth;
pub mod cache;
pub mod comments;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;
pub mod types;
pub mod validation;

pub use api::{FakeRecipeApi, HttpRecipeApi, HttpRecipeApiBuilder, RecipeApi};
pub use auth::{can_create, can_edit, WritePolicy};
pub use cache::{FileCache, MemoryCache, RecipeCache};
pub use comments::CommentManager;
pub use config::{CacheMode, ClientConfig, ConfigError};
pub use error::{
    ApiError, CacheError, FieldError, ParseVariantError, StoreError, ValidationErrors,
};
pub use filter::RecipeFilter;
pub use store::{ListSource, RecipeListing, RecipeStore, RecipeStoreBuilder};
pub use types::{
    Comment, CommentId, NewComment, Recipe, RecipeDraft, RecipePatch, Role, User,
};
