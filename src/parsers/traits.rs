//! Codec trait definitions and error types.
//!
//! Each on-disk format has one codec type implementing [`SbomParser`] for
//! decoding and [`SbomWriter`] for encoding its native document shape.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while decoding a document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("Unknown document format: {0}")]
    UnknownFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Errors that can occur while encoding a document
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("XML serialization error: {0}")]
    XmlError(String),

    #[error("JSON serialization error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for WriteError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for WriteError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// No confidence - definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Low confidence - might be this format
    pub const LOW: Self = Self(0.25);
    /// Medium confidence - likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// Certain - definitely this format
    pub const CERTAIN: Self = Self(1.0);

    /// Get the confidence value
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Check if this confidence indicates the format can be parsed
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= Self::LOW.0
    }
}

/// Detection result from a codec
#[derive(Debug, Clone)]
pub struct FormatDetection {
    /// Confidence that this codec can handle the content
    pub confidence: FormatConfidence,
    /// Detected version if applicable
    pub version: Option<String>,
}

impl FormatDetection {
    /// Create a detection result indicating no match
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            confidence: FormatConfidence::NONE,
            version: None,
        }
    }

    /// Create a detection result with confidence
    #[must_use]
    pub const fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            version: None,
        }
    }

    /// Set the detected version
    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

/// Decoder for one on-disk format into its native document shape `D`.
pub trait SbomParser<D> {
    /// Decode from a file path
    fn parse(&self, path: &Path) -> Result<D, ParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Decode from string content
    fn parse_str(&self, content: &str) -> Result<D, ParseError>;

    /// Get format name
    fn format_name(&self) -> &str;

    /// Detect if this codec can handle the given content.
    ///
    /// Lightweight marker checks only, no full decode.
    fn detect(&self, content: &str) -> FormatDetection;

    /// Quick check if this codec can likely handle the content
    fn can_parse(&self, content: &str) -> bool {
        self.detect(content).confidence.can_parse()
    }
}

/// Encoder for a native document shape `D`.
pub trait SbomWriter<D> {
    /// Encode to a string
    fn write_string(&self, document: &D) -> Result<String, WriteError>;

    /// Encode and write to a file
    fn write(&self, document: &D, path: &Path) -> Result<(), WriteError> {
        let content = self.write_string(document)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
