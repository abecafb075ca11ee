//! Document loading with context.

use crate::model::{BomFormat, Document};
use crate::parsers::{parse_bom, ParsedBom};
use crate::translate::to_target_document;
use anyhow::{Context, Result};
use std::path::Path;

/// A loaded input in the component/graph shape.
#[derive(Debug, Clone)]
pub struct LoadedBom {
    /// The document, translated if it was package-oriented on disk
    pub document: Document,
    /// Format the file was decoded from
    pub source_format: BomFormat,
}

impl LoadedBom {
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Load a document in any supported format as a component/graph [`Document`].
///
/// `format == None` detects the format from the content.
pub fn load_document(path: &Path, format: Option<BomFormat>, quiet: bool) -> Result<LoadedBom> {
    if !quiet {
        tracing::info!("Input File: {}", path.display());
    }

    let parsed = parse_bom(path, format)
        .with_context(|| format!("Failed to parse SBOM: {}", path.display()))?;
    let source_format = parsed.format();
    let document = match parsed {
        ParsedBom::CycloneDx(doc) => doc,
        ParsedBom::Spdx(doc) => {
            tracing::debug!("Translating {} packages from {}", doc.packages.len(), path.display());
            to_target_document(&doc)
        }
    };

    if !quiet {
        tracing::info!(
            "Parsed {} components ({})",
            document.components.len(),
            source_format
        );
    }

    Ok(LoadedBom {
        document,
        source_format,
    })
}

/// Load several documents, failing on the first that cannot be read.
pub fn load_documents(
    paths: &[impl AsRef<Path>],
    format: Option<BomFormat>,
    quiet: bool,
) -> Result<Vec<Document>> {
    paths
        .iter()
        .map(|p| load_document(p.as_ref(), format, quiet).map(LoadedBom::into_document))
        .collect()
}
