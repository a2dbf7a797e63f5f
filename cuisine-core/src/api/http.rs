//! REST/JSON implementation of [`RecipeApi`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::RecipeApi;
use crate::error::ApiError;
use crate::types::Recipe;

/// Default base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for HttpRecipeApi.
#[derive(Debug, Clone)]
pub struct HttpRecipeApiBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for HttpRecipeApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRecipeApiBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: format!("cuisine/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the service base URL, e.g. `https://api.example.com/v1`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a request timeout. None keeps the transport default.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build the HttpRecipeApi.
    pub fn build(self) -> Result<HttpRecipeApi, ApiError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url));
        }

        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpRecipeApi {
            inner: builder.build()?,
            base_url,
        })
    }
}

/// Production client for the recipe REST service.
#[derive(Debug, Clone)]
pub struct HttpRecipeApi {
    /// Shared reqwest client for connection pooling.
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpRecipeApi {
    /// Create a client for the given base URL with default settings.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        HttpRecipeApiBuilder::new().base_url(base_url).build()
    }

    /// Get a builder for custom configuration.
    pub fn builder() -> HttpRecipeApiBuilder {
        HttpRecipeApiBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/recipes`, or `{base}/recipes/{id}` with the id percent-encoded.
    pub fn recipes_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("recipes");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Turn a non-success status into an error. 404 on an addressed
    /// resource is reported as NotFound.
    async fn check(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                tracing::debug!(id, "network: recipe not found");
                return Err(ApiError::NotFound(id.to_string()));
            }
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, "network: request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list(&self) -> Result<Vec<Recipe>, ApiError> {
        let url = self.recipes_url(None)?;
        tracing::debug!(%url, "network: GET");
        let response = self.inner.get(url).send().await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn get(&self, id: &str) -> Result<Recipe, ApiError> {
        let url = self.recipes_url(Some(id))?;
        tracing::debug!(%url, "network: GET");
        let response = self.inner.get(url).send().await?;
        let response = Self::check(response, Some(id)).await?;
        Self::decode(response).await
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let url = self.recipes_url(None)?;
        tracing::debug!(%url, "network: POST");
        let response = self.inner.post(url).json(recipe).send().await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let url = self.recipes_url(Some(id))?;
        tracing::debug!(%url, "network: PUT");
        let response = self.inner.put(url).json(recipe).send().await?;
        let response = Self::check(response, Some(id)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.recipes_url(Some(id))?;
        tracing::debug!(%url, "network: DELETE");
        let response = self.inner.delete(url).send().await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}
