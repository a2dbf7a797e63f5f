//! Comment sub-resource manager.
//!
//! Comments live inside their recipe and are never addressed on their own.
//! Each operation reads the parent, changes only its `comments` list, and
//! writes the whole parent back through the store. Whether the caller is
//! allowed to touch a given comment is decided by the caller (see
//! [`crate::auth::can_edit`]).

use crate::error::StoreError;
use crate::store::{now_timestamp, RecipeStore};
use crate::types::{Comment, CommentId, NewComment, Recipe};
use crate::validation::validate_comment_text;

pub struct CommentManager<'a> {
    store: &'a RecipeStore,
}

impl<'a> CommentManager<'a> {
    pub(crate) fn new(store: &'a RecipeStore) -> Self {
        Self { store }
    }

    /// Append a comment at the end of the recipe's comment list.
    pub async fn add_comment(
        &self,
        recipe_id: &str,
        comment: NewComment,
    ) -> Result<Recipe, StoreError> {
        validate_comment_text(&comment.text)?;

        let mut recipe = self.store.fetch_for_mutation(recipe_id).await?;
        let id = CommentId::Text(format!("comment_{}", self.store.next_id()));
        recipe.comments.push(Comment {
            id: id.clone(),
            text: comment.text.trim().to_string(),
            author: comment.author,
            recipe_id: recipe.id.clone(),
            date: now_timestamp(),
        });

        let updated = self.store.put_recipe(recipe).await?;
        tracing::info!(recipe_id, comment_id = %id, "comments: added");
        Ok(updated)
    }

    /// Replace a comment's text. Author, date and id are kept.
    pub async fn update_comment(
        &self,
        recipe_id: &str,
        comment_id: &CommentId,
        new_text: &str,
    ) -> Result<Recipe, StoreError> {
        validate_comment_text(new_text)?;

        let mut recipe = self.store.fetch_for_mutation(recipe_id).await?;
        let comment = recipe
            .comments
            .iter_mut()
            .find(|c| &c.id == comment_id)
            .ok_or_else(|| StoreError::comment_not_found(comment_id))?;
        comment.text = new_text.trim().to_string();

        let updated = self.store.put_recipe(recipe).await?;
        tracing::info!(recipe_id, %comment_id, "comments: updated");
        Ok(updated)
    }

    /// Remove exactly one comment, keeping the order of the rest.
    pub async fn delete_comment(
        &self,
        recipe_id: &str,
        comment_id: &CommentId,
    ) -> Result<Recipe, StoreError> {
        let mut recipe = self.store.fetch_for_mutation(recipe_id).await?;
        let index = recipe
            .comments
            .iter()
            .position(|c| &c.id == comment_id)
            .ok_or_else(|| StoreError::comment_not_found(comment_id))?;
        recipe.comments.remove(index);

        let updated = self.store.put_recipe(recipe).await?;
        tracing::info!(recipe_id, %comment_id, "comments: deleted");
        Ok(updated)
    }
}
