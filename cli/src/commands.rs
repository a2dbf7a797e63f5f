use anyhow::{bail, Result};
use clap::Args;
use cuisine_core::{
    can_create, can_edit, CommentId, NewComment, RecipeDraft, RecipeFilter, RecipePatch,
    RecipeStore, User, WritePolicy,
};
use serde::Serialize;

/// Recipe fields shared by `add` and `edit`. Anything left out is either
/// missing (add) or unchanged (edit).
#[derive(Args, Debug, Default)]
pub struct RecipeFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Repeat once per ingredient, in order
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
    #[arg(long)]
    pub instructions: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Minutes
    #[arg(long)]
    pub cooking_time: Option<u32>,
    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

impl RecipeFields {
    pub fn into_draft(self, author: &str) -> RecipeDraft {
        RecipeDraft {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            instructions: self.instructions.unwrap_or_default(),
            ingredients: self.ingredients,
            category: self.category.unwrap_or_default(),
            cooking_time: self.cooking_time,
            image: self.image,
            author: author.to_string(),
        }
    }

    pub fn into_patch(self) -> RecipePatch {
        RecipePatch {
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            ingredients: if self.ingredients.is_empty() {
                None
            } else {
                Some(self.ingredients)
            },
            category: self.category,
            cooking_time: self.cooking_time,
            image: self.image,
        }
    }
}

/// The store plus who is using it. Every mutating command checks
/// authorization here before calling the store.
pub struct Session {
    pub store: RecipeStore,
    pub user: User,
    pub write_policy: WritePolicy,
}

impl Session {
    pub async fn list(
        &self,
        category: Option<String>,
        author: Option<String>,
        cached: bool,
    ) -> Result<()> {
        let listing = if cached {
            match self.store.cached_recipes() {
                Some(listing) => listing,
                None => bail!("No local cache yet; run `cuisine list` while online first"),
            }
        } else {
            self.store.list_recipes().await?
        };

        if listing.is_stale() {
            eprintln!("warning: showing cached recipes, they may be out of date");
        }

        let filter = RecipeFilter { category, author };
        print_json(&listing.filtered(&filter).recipes)
    }

    pub async fn show(&self, id: &str) -> Result<()> {
        let recipe = self.store.get_recipe(id).await?;
        print_json(&recipe)
    }

    pub async fn add(&self, fields: RecipeFields) -> Result<()> {
        if !can_create(&self.user, self.write_policy) {
            bail!("User '{}' may not create recipes", self.user.username);
        }
        let recipe = self
            .store
            .create_recipe(fields.into_draft(&self.user.username))
            .await?;
        print_json(&recipe)
    }

    pub async fn edit(&self, id: &str, fields: RecipeFields) -> Result<()> {
        let recipe = self.store.get_recipe(id).await?;
        ensure_can_edit(&self.user, &recipe.author, "recipe")?;
        let recipe = self.store.update_recipe(id, fields.into_patch()).await?;
        print_json(&recipe)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.store.get_recipe(id).await {
            Ok(recipe) => ensure_can_edit(&self.user, &recipe.author, "recipe")?,
            // Already gone: deleting again is a no-op
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
        self.store.delete_recipe(id).await?;
        println!("Deleted {}", id);
        Ok(())
    }

    pub async fn like(&self, id: &str) -> Result<()> {
        ensure_signed_in(&self.user)?;
        let recipe = self.store.like_recipe(id).await?;
        print_json(&recipe)
    }

    pub async fn add_comment(&self, recipe_id: &str, text: String) -> Result<()> {
        ensure_signed_in(&self.user)?;
        let recipe = self
            .store
            .comments()
            .add_comment(recipe_id, NewComment::new(text, self.user.username.clone()))
            .await?;
        print_json(&recipe)
    }

    pub async fn edit_comment(&self, recipe_id: &str, comment_id: &str, text: &str) -> Result<()> {
        let comment_id = self.authorize_comment(recipe_id, comment_id).await?;
        let recipe = self
            .store
            .comments()
            .update_comment(recipe_id, &comment_id, text)
            .await?;
        print_json(&recipe)
    }

    pub async fn delete_comment(&self, recipe_id: &str, comment_id: &str) -> Result<()> {
        let comment_id = self.authorize_comment(recipe_id, comment_id).await?;
        let recipe = self
            .store
            .comments()
            .delete_comment(recipe_id, &comment_id)
            .await?;
        print_json(&recipe)
    }

    /// Only the comment's author (or an admin) may change it.
    async fn authorize_comment(&self, recipe_id: &str, comment_id: &str) -> Result<CommentId> {
        let comment_id = CommentId::parse(comment_id);
        let recipe = self.store.get_recipe(recipe_id).await?;
        // A missing comment is reported by the manager itself
        if let Some(comment) = recipe.find_comment(&comment_id) {
            ensure_can_edit(&self.user, &comment.author, "comment")?;
        }
        Ok(comment_id)
    }
}

fn ensure_signed_in(user: &User) -> Result<()> {
    if user.username.is_empty() {
        bail!("Sign in first (--user or CUISINE_USER)");
    }
    Ok(())
}

fn ensure_can_edit(user: &User, owner: &str, what: &str) -> Result<()> {
    if !can_edit(user, owner) {
        bail!(
            "User '{}' may not modify this {} (owned by '{}')",
            user.username,
            what,
            owner
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
