//! Create command handler.
//!
//! Implements the `create` subcommand: a BOM for a chart composed from its
//! image list, per-image scan results and CPE list.

use crate::chart::{load_chart, AnnotationKeys, ScanResultStore};
use crate::compose::{ChartComposer, ChartOptions};
use crate::config::{ChartConfig, OutputConfig};
use crate::model::BomFormat;
use crate::pipeline::{emit, ComposedBom, OutputSettings};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Everything `create` needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct CreateCommand {
    /// Chart directory or `Chart.yaml`
    pub chart: PathBuf,
    /// `IMAGE=PATH` scan result mappings
    pub scans: Vec<String>,
    /// Directory holding `<sanitized image>.spdx` scan results
    pub scan_dir: Option<PathBuf>,
    pub chart_config: ChartConfig,
    pub output_config: OutputConfig,
    /// Fixed creation time for reproducible output
    pub created: Option<DateTime<Utc>>,
    pub output: OutputSettings,
}

/// Run the create command
#[allow(clippy::needless_pass_by_value)]
pub fn run_create(command: CreateCommand, quiet: bool) -> Result<()> {
    if !quiet {
        tracing::info!("Helm chart at path {}", command.chart.display());
    }

    let keys = AnnotationKeys {
        images: command.chart_config.images_annotation.clone(),
        cpes: command.chart_config.cpe_annotation.clone(),
    };
    let chart = load_chart(&command.chart, &keys)
        .with_context(|| format!("Failed to load chart: {}", command.chart.display()))?;

    let mut store = ScanResultStore::new().with_mappings(command.scans.as_slice())?;
    if let Some(dir) = &command.scan_dir {
        store = store.with_scan_dir(dir);
    }

    let options = ChartOptions {
        namespace_base: command.chart_config.namespace_base.clone(),
        tool_name: command.output_config.tool_name.clone(),
        organization: command.output_config.organization.clone(),
        created: command.created,
    };
    let bom = ChartComposer::new(&store, options)
        .compose(&chart)
        .with_context(|| format!("Failed to compose chart {}", chart.name()))?;

    let composed = match command.output.format {
        BomFormat::Spdx => ComposedBom::Packages(bom.into_spdx()),
        BomFormat::CycloneDx => ComposedBom::Graph(bom.to_cyclonedx()),
    };
    emit(&composed, &command.output, quiet)
}
