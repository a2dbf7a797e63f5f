use std::fmt;
use thiserror::Error;

/// One failed field check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field check that failed for one input, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A string that names none of an enum's variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}' (expected {expected})")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseVariantError {
    pub fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Failures talking to the remote recipe service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

/// Failures reading or writing the local cache mirror.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the store and the comment manager.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Transport error: {0}")]
    Transport(ApiError),
}

impl StoreError {
    pub fn recipe_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "Recipe",
            id: id.to_string(),
        }
    }

    pub fn comment_not_found(id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            kind: "Comment",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(id) => StoreError::NotFound { kind: "Recipe", id },
            other => StoreError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_lists_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("title", "Title is required");
        errors.push("category", "Category is required");
        assert_eq!(errors.fields(), vec!["title", "category"]);
        assert_eq!(
            errors.to_string(),
            "title: Title is required; category: Category is required"
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn test_api_not_found_maps_to_store_not_found() {
        let err: StoreError = ApiError::NotFound("recipe_1".to_string()).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Recipe not found: recipe_1");

        let err: StoreError = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert!(err.is_transport());
    }
}
