use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseVariantError;

/// A shared recipe as stored by the remote service and mirrored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    /// Insertion order is preserved. Records saved by older edit forms
    /// may lack the key entirely.
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub category: String,
    /// Minutes.
    #[serde(
        default,
        deserialize_with = "lenient_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub cooking_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub author: String,
    /// ISO-8601 timestamp, kept verbatim so it round-trips unchanged.
    pub created_at: String,
    #[serde(default)]
    pub likes: u64,
    /// Chronological. Only `CommentManager` mutates this list.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Minutes as written by any client: a number, a numeric string, `""` or
/// `null`. Strings that are not a whole number of minutes read as absent.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Minutes {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Minutes>::deserialize(deserializer)? {
        Some(Minutes::Number(n)) => Some(n),
        Some(Minutes::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl Recipe {
    /// Build a fresh record from validated creation input.
    pub fn from_draft(draft: RecipeDraft, id: String, created_at: String) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            instructions: draft.instructions,
            ingredients: draft.ingredients,
            category: draft.category,
            cooking_time: draft.cooking_time,
            image: draft.image,
            author: draft.author,
            created_at,
            likes: 0,
            comments: Vec::new(),
        }
    }

    pub fn find_comment(&self, comment_id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == comment_id)
    }
}

/// Identifier of a comment. Older payloads carry numbers, newer ones strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    Number(i64),
    Text(String),
}

impl CommentId {
    /// Interpret user input. Only canonical integers (`"7"`, not `"007"`
    /// or `"+7"`) become numeric ids, so text ids made of digits still match.
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => CommentId::Number(n),
            _ => CommentId::Text(s.to_string()),
        }
    }
}

impl PartialEq for CommentId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CommentId::Number(a), CommentId::Number(b)) => a == b,
            (CommentId::Text(a), CommentId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for CommentId {}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentId::Number(n) => write!(f, "{}", n),
            CommentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId::parse(s)
    }
}

/// A comment nested inside a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    #[serde(default)]
    pub author: String,
    /// Back-reference to the owning recipe.
    #[serde(default)]
    pub recipe_id: String,
    pub date: String,
}

/// Input for creating a recipe. Server-assigned fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub category: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub cooking_time: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: String,
}

/// Partial update of a recipe. `None` leaves a field unchanged.
///
/// There is no field for `id`, `author`, `createdAt`, `likes` or
/// `comments`; payloads that carry them have those keys dropped on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Can be changed but not removed.
    #[serde(
        default,
        deserialize_with = "lenient_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub cooking_time: Option<u32>,
    /// An empty string removes the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self == &RecipePatch::default()
    }

    /// Overwrite only the fields this patch carries.
    pub fn apply(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(description) = &self.description {
            recipe.description = description.clone();
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions = instructions.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.clone();
        }
        if let Some(category) = &self.category {
            recipe.category = category.clone();
        }
        if let Some(cooking_time) = self.cooking_time {
            recipe.cooking_time = Some(cooking_time);
        }
        if let Some(image) = &self.image {
            recipe.image = if image.trim().is_empty() {
                None
            } else {
                Some(image.clone())
            };
        }
    }
}

/// Input for adding a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub author: String,
}

impl NewComment {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseVariantError::new("role", s, "user or admin")),
        }
    }
}

/// A user of the application. Owned by the session layer; consumed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        let username = username.into();
        Self {
            id: username.clone(),
            username,
            role,
            ..Default::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
