//! Translation project manifest (`manifest.json`).
//!
//! Only `project` and `finished_chunks` are read during assembly; the rest is
//! carried for callers that want to report on the project.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::util::decode_text;

/// A translation-studio project manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub package_version: i64,
    pub format: String,
    pub generator: Generator,
    pub target_language: TargetLanguage,
    /// Unix timestamp of the last save.
    pub timestamp: i64,
    pub project: IdName,
    #[serde(rename = "type")]
    pub project_type: IdName,
    pub resource: IdName,
    pub source_translations: Vec<SourceTranslation>,
    pub target_translations: Vec<TargetTranslation>,
    pub translators: Vec<String>,
    /// Fragment names the translator marked as finished.
    pub finished_chunks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdName {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Generator {
    pub name: String,
    pub build: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetLanguage {
    pub id: String,
    pub name: String,
    pub direction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceTranslation {
    pub language_id: String,
    pub resource_id: String,
    pub checking_level: serde_json::Value,
    pub date_modified: serde_json::Value,
    pub version: serde_json::Value,
}

/// A project packed inside a translation-studio export archive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TargetTranslation {
    /// Directory of the project inside the archive.
    pub path: String,
    pub id: String,
    pub commit_hash: serde_json::Value,
    pub direction: String,
}

impl Manifest {
    /// Create a manifest for a project, as used by in-memory containers.
    pub fn new(project_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            project: IdName {
                id: project_id.into(),
                name: project_name.into(),
            },
            ..Default::default()
        }
    }

    pub fn with_finished_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finished_chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a manifest from raw bytes. `origin` names the source in error messages.
    pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Self> {
        let text = decode_text(bytes);
        serde_json::from_str(&text)
            .map_err(|e| Error::Manifest(format!("malformed manifest {origin}: {e}")))
    }
}
