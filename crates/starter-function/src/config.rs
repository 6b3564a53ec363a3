//! Function configuration
//!
//! Read once at startup from the environment injected by the platform.

use std::env;

use thiserror::Error;

pub const ENDPOINT_VAR: &str = "APPWRITE_ENDPOINT";
pub const PROJECT_ID_VAR: &str = "APPWRITE_FUNCTION_PROJECT_ID";
pub const API_KEY_VAR: &str = "APPWRITE_API_KEY";
pub const DATABASE_ID_VAR: &str = "APPWRITE_DATABASE_ID";
pub const COLLECTION_ID_VAR: &str = "APPWRITE_COLLECTION_ID";
pub const ENVIRONMENT_VAR: &str = "NODE_ENV";
/// Consulted when `NODE_ENV` is unset.
pub const ENVIRONMENT_ALIAS_VAR: &str = "APP_ENV";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("APPWRITE_API_KEY is required in development mode")]
    ApiKeyRequired,
}

/// Deployment mode, selected by `NODE_ENV` (or `APP_ENV` when that is unset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("development") => Environment::Development,
            _ => Environment::Production,
        }
    }
}

/// Identifiers for the document database this function reads from.
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
    pub environment: Environment,
}

impl FunctionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let endpoint = require(ENDPOINT_VAR);
        let project_id = require(PROJECT_ID_VAR);
        let database_id = require(DATABASE_ID_VAR);
        let collection_id = require(COLLECTION_ID_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            endpoint,
            project_id,
            api_key: get(API_KEY_VAR),
            database_id,
            collection_id,
            environment: Environment::parse(
                get(ENVIRONMENT_VAR)
                    .or_else(|| get(ENVIRONMENT_ALIAS_VAR))
                    .as_deref(),
            ),
        })
    }

    /// The API key to authenticate with, if any.
    ///
    /// Deployed functions are authorized by the platform, so the key is only
    /// used, and required, in development. In production it is ignored even
    /// when set.
    pub fn api_key_for_mode(&self) -> Result<Option<&str>, ConfigError> {
        match (self.environment, self.api_key.as_deref()) {
            (Environment::Development, None) => Err(ConfigError::ApiKeyRequired),
            (Environment::Development, key) => Ok(key),
            (Environment::Production, _) => Ok(None),
        }
    }
}
