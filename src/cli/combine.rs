//! Combine command handler.
//!
//! Implements the `combine` subcommand: N-way merge of documents into one.

use crate::compose::{merge, MergeOptions};
use crate::model::{BomFormat, Creator};
use crate::pipeline::{emit, load_document, ComposedBom, OutputSettings};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Everything `combine` needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct CombineCommand {
    pub inputs: Vec<PathBuf>,
    /// Input format; `None` detects per file
    pub input_format: Option<BomFormat>,
    /// Name of the new root component
    pub root_name: String,
    pub union_dependencies: bool,
    pub creators: Vec<Creator>,
    pub created: Option<DateTime<Utc>>,
    /// Output format; `None` uses the first input's format
    pub output_format: Option<BomFormat>,
    pub output: OutputSettings,
}

/// Run the combine command
#[allow(clippy::needless_pass_by_value)]
pub fn run_combine(command: CombineCommand, quiet: bool) -> Result<()> {
    if command.inputs.is_empty() {
        bail!("combine needs at least one --input file");
    }

    let mut documents = Vec::with_capacity(command.inputs.len());
    let mut first_format = None;
    for path in &command.inputs {
        let loaded = load_document(path, command.input_format, quiet)?;
        first_format.get_or_insert(loaded.source_format);
        documents.push(loaded.document);
    }

    let options = MergeOptions {
        union_dependencies: command.union_dependencies,
        timestamp: Some(command.created.unwrap_or_else(Utc::now)),
        creators: command.creators.clone(),
    };
    let merged = merge(documents, &command.root_name, &options);

    let mut output = command.output.clone();
    if let Some(format) = command.output_format.or(first_format) {
        output.format = format;
    }
    emit(&ComposedBom::Graph(merged), &output, quiet)
}
