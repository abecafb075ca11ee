//! Validation, encoding and output routing for composed documents.

use crate::error::{ComposeError, IntegrityIssue};
use crate::model::{BomFormat, Document, SpdxDocument};
use crate::parsers::{CycloneDxXmlCodec, SbomWriter, SpdxTagValueCodec};
use crate::translate::{to_package_document, to_target_document};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Pretty-printed structural dump to stdout
    Stdout,
    /// Encoded document written to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// A composed document in either shape.
#[derive(Debug, Clone)]
pub enum ComposedBom {
    Graph(Document),
    Packages(SpdxDocument),
}

impl ComposedBom {
    /// Referential integrity findings, checked on the component/graph shape.
    #[must_use]
    pub fn validate(&self) -> Vec<IntegrityIssue> {
        match self {
            Self::Graph(doc) => doc.validate(),
            Self::Packages(doc) => to_target_document(doc).validate(),
        }
    }

    /// Encode in `format`, translating between shapes when needed.
    pub fn encode(&self, format: BomFormat, namespace_base: &str) -> Result<String> {
        let encoded = match (self, format) {
            (Self::Graph(doc), BomFormat::CycloneDx) => CycloneDxXmlCodec::new().write_string(doc),
            (Self::Graph(doc), BomFormat::Spdx) => {
                SpdxTagValueCodec::new().write_string(&to_package_document(doc, namespace_base))
            }
            (Self::Packages(doc), BomFormat::Spdx) => SpdxTagValueCodec::new().write_string(doc),
            (Self::Packages(doc), BomFormat::CycloneDx) => {
                CycloneDxXmlCodec::new().write_string(&to_target_document(doc))
            }
        };
        encoded.with_context(|| format!("Failed to encode {format} document"))
    }

    /// Pretty JSON dump of the in-memory document.
    pub fn dump(&self) -> Result<String> {
        let json = match self {
            Self::Graph(doc) => serde_json::to_string_pretty(doc),
            Self::Packages(doc) => serde_json::to_string_pretty(doc),
        };
        json.context("Failed to serialize document")
    }
}

/// How a composed document leaves the process.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub target: OutputTarget,
    pub format: BomFormat,
    /// Turn integrity findings into an error
    pub strict: bool,
    /// Namespace prefix used when translating to SPDX
    pub namespace_base: String,
}

/// Validate, encode and write `bom`.
///
/// Nothing is written unless validation and encoding both succeed. Integrity
/// findings are logged as warnings, or returned as
/// [`ComposeError::Integrity`] under `strict`.
pub fn emit(bom: &ComposedBom, settings: &OutputSettings, quiet: bool) -> Result<()> {
    let issues = bom.validate();
    if !issues.is_empty() {
        for issue in &issues {
            tracing::warn!("{}", issue);
        }
        if settings.strict {
            return Err(ComposeError::Integrity { issues }.into());
        }
    }

    let content = match &settings.target {
        OutputTarget::Stdout => bom.dump()?,
        OutputTarget::File(_) => bom.encode(settings.format, &settings.namespace_base)?,
    };
    write_output(&content, &settings.target, quiet)
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}
