//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::api::{HttpRecipeApi, DEFAULT_BASE_URL};
use crate::auth::WritePolicy;
use crate::cache::{FileCache, MemoryCache, RecipeCache};
use crate::error::ApiError;
use crate::store::RecipeStore;
use crate::validation::default_categories;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Failed to build API client: {0}")]
    Api(#[from] ApiError),
}

/// Where the local mirror lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMode {
    None,
    Memory,
    Disk(PathBuf),
}

/// Everything needed to assemble a [`RecipeStore`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the recipe service.
    pub api_url: String,
    pub cache: CacheMode,
    /// Allowed categories. Empty accepts anything.
    pub categories: Vec<String>,
    /// Serve stale listings from the mirror when the remote fails.
    pub stale_fallback: bool,
    pub write_policy: WritePolicy,
    /// None keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            cache: CacheMode::Disk(FileCache::default_dir()),
            categories: default_categories(),
            stale_fallback: true,
            write_policy: WritePolicy::AnyUser,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `CUISINE_API_URL`: service base URL (default: "http://localhost:3000")
    /// - `CUISINE_CACHE`: "none", "memory", "disk" (default), or a directory
    /// - `CUISINE_CATEGORIES`: comma-separated allowed categories
    /// - `CUISINE_STALE_FALLBACK`: serve stale listings (default: true)
    /// - `CUISINE_WRITE_POLICY`: "any" (default) or "admin"
    /// - `CUISINE_HTTP_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CUISINE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let cache = match lookup("CUISINE_CACHE").as_deref() {
            Some("none") => CacheMode::None,
            Some("memory") => CacheMode::Memory,
            Some("disk") | Some("") | None => defaults.cache,
            Some(path) => CacheMode::Disk(PathBuf::from(path)),
        };

        let categories = match lookup("CUISINE_CATEGORIES") {
            Some(list) => list
                .split(',')
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.categories,
        };

        let stale_fallback = match lookup("CUISINE_STALE_FALLBACK") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue {
                var: "CUISINE_STALE_FALLBACK",
                value: v,
            })?,
            None => defaults.stale_fallback,
        };

        let write_policy = match lookup("CUISINE_WRITE_POLICY") {
            Some(v) => v.parse::<WritePolicy>().map_err(|_| ConfigError::InvalidValue {
                var: "CUISINE_WRITE_POLICY",
                value: v.clone(),
            })?,
            None => defaults.write_policy,
        };

        let timeout = match lookup("CUISINE_HTTP_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "CUISINE_HTTP_TIMEOUT_SECS",
                        value: v,
                    })
                }
            },
            None => defaults.timeout,
        };

        Ok(Self {
            api_url,
            cache,
            categories,
            stale_fallback,
            write_policy,
            timeout,
        })
    }

    /// Build the cache backing this configuration asks for.
    pub fn build_cache(&self) -> Option<Arc<dyn RecipeCache>> {
        match &self.cache {
            CacheMode::None => None,
            CacheMode::Memory => Some(Arc::new(MemoryCache::new())),
            CacheMode::Disk(dir) => Some(Arc::new(FileCache::new(dir.clone()))),
        }
    }

    /// Assemble an HTTP-backed store.
    pub fn build_store(&self) -> Result<RecipeStore, ConfigError> {
        let api = HttpRecipeApi::builder()
            .base_url(self.api_url.clone())
            .timeout(self.timeout)
            .build()?;

        tracing::debug!(api_url = %self.api_url, cache = ?self.cache, "config: building store");
        Ok(RecipeStore::builder(Arc::new(api))
            .cache(self.build_cache())
            .categories(self.categories.clone())
            .stale_fallback(self.stale_fallback)
            .build())
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
