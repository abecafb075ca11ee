//! Metadata structures for BOM documents and components.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// On-disk document format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BomFormat {
    /// Package-oriented SPDX tag-value
    Spdx,
    /// Component/graph-oriented `CycloneDX` XML
    #[value(name = "cyclonedx")]
    CycloneDx,
}

impl std::fmt::Display for BomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Spdx => write!(f, "SPDX"),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Document name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creators/authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
    /// Specification version (e.g., "1.4" for `CycloneDX`)
    pub spec_version: String,
    /// Serial number (`urn:uuid:...`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Document revision
    pub bom_version: u32,
}

impl DocumentMetadata {
    /// Tool creators only
    pub fn tools(&self) -> impl Iterator<Item = &Creator> {
        self.creators
            .iter()
            .filter(|c| c.creator_type == CreatorType::Tool)
    }
}

/// Creator information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator type
    pub creator_type: CreatorType,
    /// Creator name or identifier
    pub name: String,
}

impl Creator {
    #[must_use]
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Tool,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Organization,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn person(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Person,
            name: name.into(),
        }
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatorType {
    Person,
    Organization,
    Tool,
}

/// Component type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    File,
    Other,
}

impl ComponentType {
    /// Schema token for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Framework => "framework",
            Self::Library => "library",
            Self::Container => "container",
            Self::OperatingSystem => "operating-system",
            Self::Device => "device",
            Self::Firmware => "firmware",
            Self::File => "file",
            Self::Other => "other",
        }
    }

    /// Parse a schema token. Unknown tokens map to [`ComponentType::Other`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "application" => Self::Application,
            "framework" => Self::Framework,
            "library" => Self::Library,
            "container" => Self::Container,
            "operating-system" => Self::OperatingSystem,
            "device" => Self::Device,
            "firmware" => Self::Firmware,
            "file" => Self::File,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cryptographic hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash {
    /// Hash algorithm
    pub algorithm: HashAlgorithm,
    /// Hash value (hex encoded)
    pub value: String,
}

impl Hash {
    /// Create a new hash
    #[must_use]
    pub const fn new(algorithm: HashAlgorithm, value: String) -> Self {
        Self { algorithm, value }
    }
}

/// Hash algorithm types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
    Other(String),
}

impl HashAlgorithm {
    /// Parse either spelling (`SHA256` from SPDX or `SHA-256` from `CycloneDX`).
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA3256" => Self::Sha3_256,
            "SHA3512" => Self::Sha3_512,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    /// SPDX checksum algorithm token (`SHA256`).
    #[must_use]
    pub fn spdx_name(&self) -> String {
        match self {
            Self::Md5 => "MD5".to_string(),
            Self::Sha1 => "SHA1".to_string(),
            Self::Sha256 => "SHA256".to_string(),
            Self::Sha384 => "SHA384".to_string(),
            Self::Sha512 => "SHA512".to_string(),
            Self::Sha3_256 => "SHA3-256".to_string(),
            Self::Sha3_512 => "SHA3-512".to_string(),
            Self::Other(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA-1"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
            Self::Sha3_256 => write!(f, "SHA3-256"),
            Self::Sha3_512 => write!(f, "SHA3-512"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}
