//! Extracted package contents.

use serde::{Deserialize, Serialize};

use crate::config::ADDRESS_PLACEHOLDER;
use crate::error::ManifestError;

/// One non-manifest file of the package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Raw text of `Move.toml`; empty when the selection had none.
///
/// A selected manifest may itself be empty, so presence is tracked apart
/// from the content. Only `content` goes over the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub content: String,
    #[serde(skip)]
    selected: bool,
}

impl ManifestFile {
    /// A manifest read from the selection.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            selected: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// True when the selection contained a `Move.toml`, even an empty one.
    pub fn is_selected(&self) -> bool {
        self.selected || !self.is_empty()
    }
}

/// A complete extracted package, as sent to the compiler.
///
/// `files` never contains the manifest. The manifest travels under the
/// `toml` key, which is what the compiler service expects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBundle {
    pub files: Vec<SourceFile>,
    #[serde(rename = "toml")]
    pub manifest: ManifestFile,
}

impl ProjectBundle {
    /// True when neither sources nor a manifest were collected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && !self.has_manifest()
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest.is_selected()
    }

    /// Number of collected files, manifest included.
    pub fn file_count(&self) -> usize {
        self.files.len() + usize::from(self.has_manifest())
    }

    /// What the UI shows about the current selection.
    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            file_count: self.file_count(),
            has_manifest: self.has_manifest(),
            manifest: ManifestSummary::parse(&self.manifest.content).ok(),
        }
    }
}

/// Display data for a collected bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleSummary {
    pub file_count: usize,
    pub has_manifest: bool,
    /// `None` when the manifest is missing or does not parse.
    pub manifest: Option<ManifestSummary>,
}

/// Package name and address declarations read from `Move.toml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestSummary {
    pub package_name: String,
    /// `[addresses]` entries as `(name, value)`, sorted by name.
    pub addresses: Vec<(String, String)>,
}

impl ManifestSummary {
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        if content.trim().is_empty() {
            return Err(ManifestError::Empty);
        }
        let doc: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ManifestError::Parse(e.message().to_string()))?;

        let package_name = doc
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .ok_or(ManifestError::MissingPackageName)?
            .to_string();

        let addresses = doc
            .get("addresses")
            .and_then(|a| a.as_table())
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|v| (name.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            package_name,
            addresses,
        })
    }

    /// Named addresses declared as `"_"` that must be supplied at compile time.
    pub fn unresolved_addresses(&self) -> Vec<&str> {
        self.addresses
            .iter()
            .filter(|(_, value)| value == ADDRESS_PLACEHOLDER)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
