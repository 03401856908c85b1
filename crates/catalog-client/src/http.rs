//! HTTP catalog implementation against the storage gateway.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use geo_common::{GeoError, GeoResult, RemoteFileDescriptor};

use crate::{CatalogConfig, FileCatalog};

/// The gateway wraps every JSON payload in this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    data: Option<T>,
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

pub struct HttpCatalog {
    client: Client,
    config: CatalogConfig,
}

impl HttpCatalog {
    pub fn new(config: CatalogConfig) -> GeoResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| GeoError::Catalog(format!("http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl FileCatalog for HttpCatalog {
    async fn list(&self) -> GeoResult<Vec<RemoteFileDescriptor>> {
        let url = self.url("/graph/files/uploaded");
        debug!(%url, "listing catalog");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| GeoError::Catalog(format!("list request: {}", e)))?
            .error_for_status()
            .map_err(|e| GeoError::Catalog(format!("list status: {}", e)))?;

        let envelope: ApiResponse<Vec<RemoteFileDescriptor>> = response
            .json()
            .await
            .map_err(|e| GeoError::Catalog(format!("list payload: {}", e)))?;

        if !envelope.success {
            let message = envelope.message.unwrap_or_else(|| "no detail".to_string());
            warn!(message, "catalog list reported failure");
            return Err(GeoError::Catalog(format!("list failed: {}", message)));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    async fn fetch(&self, filename: &str) -> GeoResult<Bytes> {
        let url = self.url(&format!(
            "/storage/objects/download/temporary/{}",
            filename
        ));
        debug!(%url, "fetching catalog file");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| GeoError::Catalog(format!("fetch request: {}", e)))?
            .error_for_status()
            .map_err(|e| GeoError::Catalog(format!("fetch status: {}", e)))?;

        response
            .bytes()
            .await
            .map_err(|e| GeoError::Catalog(format!("fetch body: {}", e)))
    }
}
