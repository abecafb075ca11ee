//! Attach command handler.
//!
//! Implements the `attach` subcommand: add a BOM beneath the root subject of
//! another, e.g. image BOMs under a chart BOM or chart BOMs under a platform.

use crate::compose::{attach, AttachOptions, MissingEdgePolicy};
use crate::error::ComposeError;
use crate::model::BomFormat;
use crate::pipeline::{emit, load_document, ComposedBom, OutputSettings};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything `attach` needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct AttachCommand {
    /// Document whose root receives the new dependency
    pub root: PathBuf,
    /// Document to add as a dependency
    pub leaf: PathBuf,
    pub input_format: Option<BomFormat>,
    pub on_missing_edge: MissingEdgePolicy,
    /// Output format; `None` uses the root document's format
    pub output_format: Option<BomFormat>,
    pub output: OutputSettings,
}

/// Run the attach command
#[allow(clippy::needless_pass_by_value)]
pub fn run_attach(command: AttachCommand, quiet: bool) -> Result<()> {
    let root = load_document(&command.root, command.input_format, quiet)?;
    let leaf = load_document(&command.leaf, command.input_format, quiet)?;
    let root_format = root.source_format;

    let options = AttachOptions {
        on_missing_edge: command.on_missing_edge,
    };
    let result = attach(root.document, leaf.document, &options)
        .map_err(ComposeError::from)
        .with_context(|| {
            format!(
                "Failed to attach {} to {}",
                command.leaf.display(),
                command.root.display()
            )
        })?;

    let mut output = command.output.clone();
    output.format = command.output_format.unwrap_or(root_format);
    emit(&ComposedBom::Graph(result), &output, quiet)
}
