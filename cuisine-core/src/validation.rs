//! Field checks for recipes and comments.
//!
//! Every check runs; failures are collected so a form can show all of them
//! at once.

use crate::error::ValidationErrors;
use crate::types::{RecipeDraft, RecipePatch};

/// Categories offered by the recipe form.
pub const DEFAULT_CATEGORIES: &[&str] = &["Entrée", "Plat principal", "Dessert", "Boisson"];

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Validate creation input against the allowed category list.
///
/// An empty `categories` list accepts any non-blank category.
pub fn validate_draft(draft: &RecipeDraft, categories: &[String]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_title(&mut errors, &draft.title);
    check_description(&mut errors, &draft.description);
    check_ingredients(&mut errors, &draft.ingredients);
    check_category(&mut errors, &draft.category, categories);
    check_cooking_time(&mut errors, draft.cooking_time);
    check_image(&mut errors, draft.image.as_deref());
    errors.into_result()
}

/// Validate only the fields a patch provides. A provided field may not be
/// blanked out; absent fields keep whatever the stored record has.
pub fn validate_patch(patch: &RecipePatch, categories: &[String]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(title) = &patch.title {
        check_title(&mut errors, title);
    }
    if let Some(description) = &patch.description {
        check_description(&mut errors, description);
    }
    if let Some(instructions) = &patch.instructions {
        if instructions.trim().is_empty() {
            errors.push("instructions", "Instructions cannot be empty");
        }
    }
    if let Some(ingredients) = &patch.ingredients {
        check_ingredients(&mut errors, ingredients);
    }
    if let Some(category) = &patch.category {
        check_category(&mut errors, category, categories);
    }
    check_cooking_time(&mut errors, patch.cooking_time);
    check_image(&mut errors, patch.image.as_deref());
    errors.into_result()
}

/// Comment bodies must contain something other than whitespace.
pub fn validate_comment_text(text: &str) -> Result<(), ValidationErrors> {
    if text.trim().is_empty() {
        return Err(ValidationErrors::single("text", "Comment cannot be empty"));
    }
    Ok(())
}

/// Trim entries and drop blank ones, keeping order.
pub fn normalize_ingredients(ingredients: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    if title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
}

fn check_description(errors: &mut ValidationErrors, description: &str) {
    if description.trim().is_empty() {
        errors.push("description", "Description is required");
    }
}

fn check_ingredients(errors: &mut ValidationErrors, ingredients: &[String]) {
    if !ingredients.iter().any(|i| !i.trim().is_empty()) {
        errors.push("ingredients", "Add at least one ingredient");
    }
}

fn check_category(errors: &mut ValidationErrors, category: &str, categories: &[String]) {
    let category = category.trim();
    if category.is_empty() {
        errors.push("category", "Category is required");
    } else if !categories.is_empty() && !categories.iter().any(|c| c == category) {
        errors.push(
            "category",
            format!(
                "Unknown category '{}' (expected one of: {})",
                category,
                categories.join(", ")
            ),
        );
    }
}

fn check_cooking_time(errors: &mut ValidationErrors, cooking_time: Option<u32>) {
    if cooking_time == Some(0) {
        errors.push("cookingTime", "Cooking time must be positive");
    }
}

fn check_image(errors: &mut ValidationErrors, image: Option<&str>) {
    if let Some(image) = image.filter(|i| !i.is_empty()) {
        if url::Url::parse(image).is_err() {
            errors.push("image", format!("Invalid image URL: {}", image));
        }
    }
}
