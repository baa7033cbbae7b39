//! Dataset metadata: the upload form, the edit form, and what the catalog
//! returns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// License submitted when the form leaves it blank.
pub const DEFAULT_LICENSE: &str = "cc-by";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility '{}' (expected public or private)", other)),
        }
    }
}

/// Upload form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    /// Comma-separated labels, sent as typed.
    pub tags: String,
    pub source: String,
    pub description: String,
    pub license: String,
    pub visibility: Visibility,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            tags: String::new(),
            source: String::new(),
            description: String::new(),
            license: DEFAULT_LICENSE.to_string(),
            visibility: Visibility::Public,
        }
    }
}

impl Metadata {
    /// License to submit: the form value, or the default when blank.
    pub fn effective_license(&self) -> &str {
        let license = self.license.trim();
        if license.is_empty() {
            DEFAULT_LICENSE
        } else {
            license
        }
    }
}

/// Fields of the edit-metadata form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub description: String,
    pub tags: String,
    pub visibility: Visibility,
}

impl MetadataUpdate {
    /// Pre-fill the edit form from stored metadata: tags joined with ", ",
    /// unknown or missing visibility read as public.
    pub fn from_metadata(meta: &DatasetMetadata) -> Self {
        Self {
            description: meta.description.clone().unwrap_or_default(),
            tags: meta.tags().join(", "),
            visibility: meta
                .visibility
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

/// One entry of a dataset listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSummary {
    pub id: Option<serde_json::Value>,
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<String>,
}

impl DatasetSummary {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Stored metadata of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub license: Option<String>,
    pub visibility: Option<String>,
    pub size_mb: Option<f64>,
    pub format: Option<String>,
}

impl DatasetMetadata {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}
