//! Factory configuration.
//!
//! Every field has a default, so an empty document (`{}`) is a valid
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options shared by [`MessageFactory`](crate::MessageFactory) and
/// [`FoundationFactory`](crate::FoundationFactory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Protocol version used when `SERVER_PROTOCOL` is absent or malformed.
    pub default_protocol_version: String,
    /// Directory that receives uploaded files when converting back to the
    /// foundation model. `None` uses the OS temporary directory.
    pub upload_dir: Option<PathBuf>,
    /// Produce streamed instead of buffered foundation response bodies.
    pub streamed_responses: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_protocol_version: "1.1".to_string(),
            upload_dir: None,
            streamed_responses: false,
        }
    }
}

impl FactoryConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
