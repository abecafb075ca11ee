//! Document codecs.
//!
//! Two on-disk formats are supported:
//!
//! - SPDX tag-value ([`SpdxTagValueCodec`]) decoding to [`SpdxDocument`]
//! - `CycloneDX` XML ([`CycloneDxXmlCodec`]) decoding to [`Document`]
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_compose::parsers::{parse_bom, ParsedBom};
//! use std::path::Path;
//!
//! // Auto-detect and decode
//! match parse_bom(Path::new("scan.spdx"), None).unwrap() {
//!     ParsedBom::Spdx(doc) => println!("{} packages", doc.packages.len()),
//!     ParsedBom::CycloneDx(doc) => println!("{} components", doc.component_count()),
//! }
//! ```

mod cyclonedx;
mod detection;
mod spdx;
mod traits;

pub use cyclonedx::{CycloneDxXmlCodec, CYCLONEDX_NAMESPACE_PREFIX, DEFAULT_SPEC_VERSION};
pub use detection::{detect_format, DetectionResult, FormatDetector};
pub use spdx::SpdxTagValueCodec;
pub use traits::{FormatConfidence, FormatDetection, ParseError, SbomParser, SbomWriter, WriteError};

use crate::model::{BomFormat, Document, SpdxDocument};
use std::path::Path;

/// Maximum document size (512 MB).
const MAX_BOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// A decoded document in its native shape.
#[derive(Debug, Clone)]
pub enum ParsedBom {
    Spdx(SpdxDocument),
    CycloneDx(Document),
}

impl ParsedBom {
    #[must_use]
    pub const fn format(&self) -> BomFormat {
        match self {
            Self::Spdx(_) => BomFormat::Spdx,
            Self::CycloneDx(_) => BomFormat::CycloneDx,
        }
    }
}

/// Read a document from disk and decode it.
///
/// With `format == None` the format is detected from the content.
/// Returns an error if the file exceeds [`MAX_BOM_FILE_SIZE`] to prevent OOM.
pub fn parse_bom(path: &Path, format: Option<BomFormat>) -> Result<ParsedBom, ParseError> {
    let metadata = std::fs::metadata(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    if metadata.len() > MAX_BOM_FILE_SIZE {
        return Err(ParseError::IoError(format!(
            "document is {} MB, exceeding the {} MB limit",
            metadata.len() / (1024 * 1024),
            MAX_BOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    parse_bom_str(&content, format)
}

/// Decode string content in the given (or detected) format.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn parse_bom_str(content: &str, format: Option<BomFormat>) -> Result<ParsedBom, ParseError> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let format = match format {
        Some(f) => f,
        None => detect_format(content).ok_or_else(|| {
            ParseError::UnknownFormat(
                "content is neither SPDX tag-value nor CycloneDX XML".to_string(),
            )
        })?,
    };

    match format {
        BomFormat::Spdx => SpdxTagValueCodec::new().parse_str(content).map(ParsedBom::Spdx),
        BomFormat::CycloneDx => CycloneDxXmlCodec::new()
            .parse_str(content)
            .map(ParsedBom::CycloneDx),
    }
}
