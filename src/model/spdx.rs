//! Package-oriented (SPDX) document model.
//!
//! Element ids are stored without the `SPDXRef-` prefix. The tag-value codec
//! strips it on decode and adds it back on encode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for values the producer cannot or will not state.
pub const NOASSERTION: &str = "NOASSERTION";

/// Element id of the document itself.
pub const DOCUMENT_ID: &str = "DOCUMENT";

/// Prefix carried by element ids in the serialized form.
pub const SPDX_REF_PREFIX: &str = "SPDXRef-";

/// Default SPDX version for generated documents.
pub const DEFAULT_SPDX_VERSION: &str = "SPDX-2.2";

/// Default data license for generated documents.
pub const DEFAULT_DATA_LICENSE: &str = "CC0-1.0";

/// A package-oriented document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpdxDocument {
    pub spdx_version: String,
    pub data_license: String,
    pub spdx_id: String,
    pub name: String,
    pub namespace: String,
    pub creation_info: CreationInfo,
    /// Packages keyed by element id, iterated in id order
    pub packages: BTreeMap<String, SpdxPackage>,
    pub relationships: Vec<Relationship>,
}

impl Default for SpdxDocument {
    fn default() -> Self {
        Self {
            spdx_version: DEFAULT_SPDX_VERSION.to_string(),
            data_license: DEFAULT_DATA_LICENSE.to_string(),
            spdx_id: DOCUMENT_ID.to_string(),
            name: String::new(),
            namespace: String::new(),
            creation_info: CreationInfo::default(),
            packages: BTreeMap::new(),
            relationships: Vec::new(),
        }
    }
}

impl SpdxDocument {
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Insert a package, returning the one it replaced (same element id).
    pub fn add_package(&mut self, package: SpdxPackage) -> Option<SpdxPackage> {
        self.packages.insert(package.spdx_id.clone(), package)
    }

    #[must_use]
    pub fn package(&self, spdx_id: &str) -> Option<&SpdxPackage> {
        self.packages.get(spdx_id)
    }

    pub fn add_relationship(
        &mut self,
        element: impl Into<String>,
        relationship_type: RelationshipType,
        related_element: impl Into<String>,
    ) {
        self.relationships.push(Relationship {
            element: element.into(),
            relationship_type,
            related_element: related_element.into(),
        });
    }
}

/// Document creation information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationInfo {
    /// RFC 3339 timestamp, kept verbatim
    pub created: Option<String>,
    pub tools: Vec<String>,
    pub organizations: Vec<String>,
    pub persons: Vec<String>,
    pub comment: Option<String>,
}

/// A package in a package-oriented document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpdxPackage {
    pub spdx_id: String,
    pub name: String,
    pub version: Option<String>,
    pub file_name: Option<String>,
    pub download_location: String,
    pub files_analyzed: bool,
    pub license_concluded: String,
    pub license_declared: String,
    pub copyright_text: String,
    pub supplier: Option<String>,
    pub checksums: Vec<Checksum>,
    pub external_refs: Vec<ExternalRef>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

impl SpdxPackage {
    /// A package with placeholder values in every mandatory field.
    #[must_use]
    pub fn new(spdx_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spdx_id: spdx_id.into(),
            name: name.into(),
            version: None,
            file_name: None,
            download_location: NOASSERTION.to_string(),
            files_analyzed: false,
            license_concluded: NOASSERTION.to_string(),
            license_declared: NOASSERTION.to_string(),
            copyright_text: NOASSERTION.to_string(),
            supplier: None,
            checksums: Vec::new(),
            external_refs: Vec::new(),
            description: None,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_external_ref(mut self, external_ref: ExternalRef) -> Self {
        self.external_refs.push(external_ref);
        self
    }
}

/// Package checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    /// Algorithm token as written (e.g. `SHA256`)
    pub algorithm: String,
    pub value: String,
}

/// External reference attached to a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    /// `SECURITY`, `PACKAGE-MANAGER`, `PERSISTENT-ID`, `OTHER`
    pub category: String,
    /// `cpe23Type`, `cpe22Type`, `purl`, ...
    pub ref_type: String,
    pub locator: String,
}

impl ExternalRef {
    #[must_use]
    pub fn purl(locator: impl Into<String>) -> Self {
        Self {
            category: "PACKAGE-MANAGER".to_string(),
            ref_type: "purl".to_string(),
            locator: locator.into(),
        }
    }

    #[must_use]
    pub fn cpe23(locator: impl Into<String>) -> Self {
        Self {
            category: "SECURITY".to_string(),
            ref_type: "cpe23Type".to_string(),
            locator: locator.into(),
        }
    }

    /// `cpe23Type` or `cpe22Type`
    #[must_use]
    pub fn is_cpe(&self) -> bool {
        matches!(self.ref_type.as_str(), "cpe23Type" | "cpe22Type")
    }

    #[must_use]
    pub fn is_purl(&self) -> bool {
        self.ref_type == "purl"
    }
}

/// A relationship between two elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub element: String,
    pub relationship_type: RelationshipType,
    pub related_element: String,
}

/// Relationship types this tool interprets. Everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    Describes,
    DependsOn,
    Contains,
    Other(String),
}

impl RelationshipType {
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "DESCRIBES" => Self::Describes,
            "DEPENDS_ON" => Self::DependsOn,
            "CONTAINS" => Self::Contains,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Describes => "DESCRIBES",
            Self::DependsOn => "DEPENDS_ON",
            Self::Contains => "CONTAINS",
            Self::Other(s) => s,
        }
    }

    /// Whether this relationship becomes a dependency edge.
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        matches!(self, Self::Describes | Self::DependsOn | Self::Contains)
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
