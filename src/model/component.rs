//! The canonical component type.

use super::{ComponentType, Hash};
use serde::{Deserialize, Serialize};

/// A component in a component/graph document.
///
/// `bom_ref` is unique within the owning [`Document`](super::Document).
/// Identity across documents is decided by purl and CPE only, see
/// [`crate::compose::same_identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Document-unique reference
    pub bom_ref: String,
    /// Component type
    pub component_type: ComponentType,
    /// Component name
    pub name: String,
    /// Component version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Group / namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Package URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    /// CPE 2.2 or 2.3 string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// License expressions or ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<String>,
    /// Hashes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<Hash>,
}

impl Component {
    /// Create a component with a ref and a name.
    #[must_use]
    pub fn new(bom_ref: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bom_ref: bom_ref.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = component_type;
        self
    }

    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    #[must_use]
    pub fn with_cpe(mut self, cpe: impl Into<String>) -> Self {
        self.cpe = Some(cpe.into());
        self
    }

    /// Package URL, treating an empty string as absent.
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        self.purl.as_deref().filter(|p| !p.is_empty())
    }

    /// CPE, treating an empty string as absent.
    #[must_use]
    pub fn cpe(&self) -> Option<&str> {
        self.cpe.as_deref().filter(|c| !c.is_empty())
    }

    /// `name@version` or just `name`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.version {
            Some(v) => format!("{}@{}", self.name, v),
            None => self.name.clone(),
        }
    }
}
