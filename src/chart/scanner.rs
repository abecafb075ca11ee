//! Per-image package sets.
//!
//! Scanning is pluggable through [`ImageScanner`]. The shipped
//! [`ScanResultStore`] never touches the network: it reads scan results that
//! an external scanner already wrote as SPDX tag-value files.

use crate::error::{ChartErrorKind, ComposeError, ErrorContext, Result};
use crate::model::SpdxDocument;
use crate::parsers::{SbomParser, SpdxTagValueCodec};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// File extension of scan results in a scan directory.
pub const SCAN_FILE_EXTENSION: &str = "spdx";

/// Produces the package set of a container image.
pub trait ImageScanner {
    /// Scan `image` and return its package document.
    ///
    /// # Errors
    ///
    /// Fails when no package set can be produced for `image`.
    fn scan(&self, image: &str) -> Result<SpdxDocument>;
}

/// File name a scan result for `image` is expected under.
///
/// `/` and `:` are replaced with `_`, so `registry/nginx:1.21` maps to
/// `registry_nginx_1.21.spdx`.
#[must_use]
pub fn scan_file_name(image: &str) -> String {
    let stem: String = image
        .chars()
        .map(|c| if c == '/' || c == ':' { '_' } else { c })
        .collect();
    format!("{stem}.{SCAN_FILE_EXTENSION}")
}

/// Pre-computed scan results on disk.
///
/// Explicit mappings take precedence over the scan directory.
#[derive(Debug, Clone, Default)]
pub struct ScanResultStore {
    mappings: IndexMap<String, PathBuf>,
    scan_dir: Option<PathBuf>,
}

impl ScanResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up scan results in `dir` by [`scan_file_name`].
    #[must_use]
    pub fn with_scan_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scan_dir = Some(dir.into());
        self
    }

    /// Map `image` to a specific scan result file.
    #[must_use]
    pub fn with_mapping(mut self, image: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.mappings.insert(image.into(), path.into());
        self
    }

    /// Parse `IMAGE=PATH` mappings.
    ///
    /// Each entry is split at its last `=`.
    ///
    /// # Errors
    ///
    /// [`ChartErrorKind::InvalidScanMapping`] on an entry without `=` or with
    /// an empty side.
    pub fn with_mappings<S: AsRef<str>>(mut self, entries: &[S]) -> Result<Self> {
        for entry in entries {
            let entry = entry.as_ref();
            match entry.rsplit_once('=') {
                Some((image, path)) if !image.trim().is_empty() && !path.trim().is_empty() => {
                    self.mappings
                        .insert(image.trim().to_string(), PathBuf::from(path.trim()));
                }
                _ => {
                    return Err(ComposeError::chart(
                        "parsing scan mappings",
                        ChartErrorKind::InvalidScanMapping(entry.to_string()),
                    ));
                }
            }
        }
        Ok(self)
    }

    /// Path the scan result for `image` would be read from.
    #[must_use]
    pub fn locate(&self, image: &str) -> Option<PathBuf> {
        if let Some(path) = self.mappings.get(image) {
            return Some(path.clone());
        }
        self.scan_dir
            .as_deref()
            .map(|dir| dir.join(scan_file_name(image)))
            .filter(|p| p.exists())
    }
}

impl ImageScanner for ScanResultStore {
    fn scan(&self, image: &str) -> Result<SpdxDocument> {
        let path = self.locate(image).ok_or_else(|| {
            ComposeError::chart(
                format!("scanning {image}"),
                ChartErrorKind::MissingScan {
                    image: image.to_string(),
                },
            )
        })?;
        let doc = read_scan(&path).with_context(|| format!("scanning {image}"))?;
        tracing::info!(
            "The image {} has {} packages inside of it",
            image,
            doc.packages.len()
        );
        Ok(doc)
    }
}

fn read_scan(path: &Path) -> Result<SpdxDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| ComposeError::io(path, e))?;
    SpdxTagValueCodec
        .parse_str(&content)
        .with_context(|| format!("reading scan result {}", path.display()))
}
