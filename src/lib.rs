//! **Compose and translate Software Bills of Materials (SBOMs).**
//!
//! `sbom-compose` builds new BOM documents out of existing ones:
//!
//! - **Merge**: an N-way union of components, deduplicated strictly by purl or
//!   CPE identity. Dependency graphs are dropped unless asked for.
//! - **Attach**: graft one BOM beneath the root subject of another, keeping the
//!   leaf's dependency graph intact.
//! - **Create**: compose a BOM for a Helm chart from the images and CPEs listed
//!   in its annotations and pre-computed per-image scan results.
//! - **Translate**: map between package-oriented SPDX tag-value and
//!   component/graph-oriented `CycloneDX` XML, synthesizing pseudo-packages for
//!   container images and bare CPEs.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Document`] (root component, components, nested dependency
//!   graph) and [`SpdxDocument`] (packages keyed by element id, relationships).
//! - **[`compose`]**: identity resolution, the component registry, [`merge`],
//!   [`attach`] and the chart composer.
//! - **[`translate`]**: field mapping between the two shapes.
//! - **[`parsers`]**: codecs for both on-disk formats and format detection.
//! - **[`chart`]**: chart metadata, annotation lists and scan result lookup.
//! - **[`pipeline`]**: load, validate, encode and write, shared by the CLI.
//!
//! ## Getting Started: Merging Two BOMs
//!
//! ```no_run
//! use sbom_compose::compose::{merge, MergeOptions};
//! use sbom_compose::parsers::{CycloneDxXmlCodec, SbomParser, SbomWriter};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codec = CycloneDxXmlCodec::new();
//!     let a = codec.parse(Path::new("a.xml"))?;
//!     let b = codec.parse(Path::new("b.xml"))?;
//!
//!     let merged = merge(vec![a, b], "platform", &MergeOptions::default());
//!     println!("{} components", merged.components.len());
//!
//!     codec.write(&merged, Path::new("platform.xml"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Attaching a BOM
//!
//! ```no_run
//! use sbom_compose::compose::{attach, AttachOptions, MissingEdgePolicy};
//! use sbom_compose::parsers::{CycloneDxXmlCodec, SbomParser};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codec = CycloneDxXmlCodec::new();
//!     let chart = codec.parse(Path::new("chart.xml"))?;
//!     let image = codec.parse(Path::new("image.xml"))?;
//!
//!     let options = AttachOptions { on_missing_edge: MissingEdgePolicy::Create };
//!     let combined = attach(chart, image, &options)?;
//!     for issue in combined.validate() {
//!         eprintln!("warning: {issue}");
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors sections are not written for every handler
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod chart;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod translate;

// Re-export main types for convenience
pub use compose::{attach, merge, same_identity, AttachOptions, MergeOptions, MissingEdgePolicy};
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ComposeError, ErrorContext, IntegrityIssue, Result, StructuralError};
pub use model::{
    BomFormat, Component, Dependency, DependencyGraph, Document, SpdxDocument, SpdxPackage,
};
pub use parsers::{parse_bom, parse_bom_str, ParsedBom, SbomParser, SbomWriter};
pub use translate::{to_package_document, to_target_document};
