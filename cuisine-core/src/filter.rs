//! Listing filters used by the home and profile views.

use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

use crate::types::Recipe;

/// Narrow a listing by category and/or author. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub category: Option<String>,
    pub author: Option<String>,
}

impl RecipeFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map(|c| recipe.category == c)
            .unwrap_or(true);
        let author_ok = self
            .author
            .as_deref()
            .map(|a| recipe.author == a)
            .unwrap_or(true);
        category_ok && author_ok
    }

    /// Keep matching recipes, newest first.
    pub fn apply(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        let mut result: Vec<Recipe> = recipes.into_iter().filter(|r| self.matches(r)).collect();
        sort_newest_first(&mut result);
        result
    }
}

/// Sort by `createdAt` descending. Unparseable timestamps sort last.
pub fn sort_newest_first(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| compare_created(b, a));
}

fn compare_created(a: &Recipe, b: &Recipe) -> Ordering {
    match (parse_timestamp(&a.created_at), parse_timestamp(&b.created_at)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.created_at.cmp(&b.created_at),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
