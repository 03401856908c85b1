//! Environment-driven catalog configuration.

use geo_common::{GeoError, GeoResult};

const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
const ENV_TOKEN: &str = "CATALOG_TOKEN";

/// Connection settings for the remote catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the storage gateway, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub token: String,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Read `CATALOG_BASE_URL` and `CATALOG_TOKEN` from the environment.
    /// A `.env` file is honored when present.
    pub fn from_env() -> GeoResult<Self> {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var(ENV_BASE_URL)
            .map_err(|_| GeoError::Catalog(format!("{} is not set", ENV_BASE_URL)))?;
        let token = std::env::var(ENV_TOKEN)
            .map_err(|_| GeoError::Catalog(format!("{} is not set", ENV_TOKEN)))?;

        Ok(Self::new(base_url, token))
    }
}
