use serde::{Deserialize, Serialize};

/// Listing entry for one knowledge-base document. Content is fetched separately by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "Key")]
    pub key: String,
    #[serde(default, alias = "Size")]
    pub size: u64,
    #[serde(default, alias = "LastModified")]
    pub last_modified: String,
}

impl Document {
    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}
