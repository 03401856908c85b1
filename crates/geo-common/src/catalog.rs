//! Remote catalog descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the remote file catalog.
///
/// Received from the catalog collaborator and never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFileDescriptor {
    /// Stored object name, used for downloads.
    pub filename: String,

    /// User-facing name shown in listings.
    #[serde(alias = "user_filename", default)]
    pub display_name: Option<String>,

    /// Stored size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Upload timestamp.
    #[serde(alias = "lastModified", default)]
    pub uploaded_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl RemoteFileDescriptor {
    /// The name to show users: the display name when set, else the
    /// stored filename.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.filename)
    }
}
