use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named chat persona with an attached knowledge base.
///
/// Held in memory only; avatars do not survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Names of documents uploaded to the avatar's knowledge base
    pub documents: Vec<String>,
    /// Names of images uploaded to the avatar's knowledge base
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Avatar {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            documents: Vec::new(),
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A file attached to an avatar's knowledge base.
///
/// Only the name and content type matter here; file bytes never enter the
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    #[serde(default)]
    pub content_type: String,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
