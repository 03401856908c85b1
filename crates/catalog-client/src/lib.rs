//! Remote file catalog access: list previously uploaded files and fetch
//! their bytes for local decoding.
//!
//! The HTTP implementation talks to the storage gateway's JSON API with
//! bearer-token auth; [`StaticCatalog`] serves canned entries for tests
//! and offline work.

pub mod config;
pub mod http;

pub use config::CatalogConfig;
pub use http::HttpCatalog;

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use geo_common::{GeoError, GeoResult, RemoteFileDescriptor};

/// A source of previously uploaded geodata files.
#[async_trait]
pub trait FileCatalog: Send + Sync {
    /// List the files available for loading.
    async fn list(&self) -> GeoResult<Vec<RemoteFileDescriptor>>;

    /// Fetch one file's raw bytes by its stored filename.
    async fn fetch(&self, filename: &str) -> GeoResult<Bytes>;
}

/// In-memory catalog holding fixed entries.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<RemoteFileDescriptor>,
    blobs: HashMap<String, Bytes>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, descriptor: RemoteFileDescriptor, bytes: Bytes) -> Self {
        self.blobs.insert(descriptor.filename.clone(), bytes);
        self.entries.push(descriptor);
        self
    }
}

#[async_trait]
impl FileCatalog for StaticCatalog {
    async fn list(&self) -> GeoResult<Vec<RemoteFileDescriptor>> {
        Ok(self.entries.clone())
    }

    async fn fetch(&self, filename: &str) -> GeoResult<Bytes> {
        self.blobs
            .get(filename)
            .cloned()
            .ok_or_else(|| GeoError::Catalog(format!("no such file: {}", filename)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(filename: &str) -> RemoteFileDescriptor {
        serde_json::from_value(serde_json::json!({
            "filename": filename,
            "user_filename": "My Upload.geojson",
            "size": 42,
        }))
        .unwrap()
    }

    #[test]
    fn test_static_catalog_lists_and_fetches() {
        let catalog = StaticCatalog::new()
            .with_file(descriptor("abc123.geojson"), Bytes::from_static(b"{}"));

        tokio_test::block_on(async {
            let entries = catalog.list().await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].filename, "abc123.geojson");

            let bytes = catalog.fetch("abc123.geojson").await.unwrap();
            assert_eq!(&bytes[..], b"{}");
        });
    }

    #[test]
    fn test_static_catalog_unknown_file_is_catalog_error() {
        let catalog = StaticCatalog::new();
        tokio_test::block_on(async {
            assert!(matches!(
                catalog.fetch("nope.zip").await,
                Err(GeoError::Catalog(_))
            ));
        });
    }
}
