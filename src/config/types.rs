//! Configuration types for sbom-compose operations.

use crate::compose::MissingEdgePolicy;
use crate::model::BomFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI flags override values loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Chart input settings used by `create`
    pub chart: ChartConfig,
    /// Output settings shared by every command
    pub output: OutputConfig,
    /// Settings for `combine`
    pub merge: MergeConfig,
    /// Settings for `attach`
    pub attach: AttachConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Chart annotation keys and namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChartConfig {
    /// Annotation holding the image list
    pub images_annotation: String,
    /// Annotation holding the CPE list
    pub cpe_annotation: String,
    /// Prefix of generated document namespaces
    pub namespace_base: String,
}

/// Creator and format defaults for generated documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Tool name recorded as document creator
    pub tool_name: String,
    /// Organization recorded as document creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Output format when `--output-format` is not given
    pub default_format: BomFormat,
}

/// Defaults for `combine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MergeConfig {
    /// Name of the merged document's root component
    pub root_name: String,
    /// Union input dependency graphs instead of dropping them
    pub union_dependencies: bool,
}

/// Defaults for `attach`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AttachConfig {
    /// Behavior when the root document lacks an edge for its root component
    pub on_missing_edge: MissingEdgePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("merge:\n  union_dependencies: true\n").unwrap();
        assert!(config.merge.union_dependencies);
        assert_eq!(config.merge.root_name, MergeConfig::default().root_name);
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn test_enum_fields_from_yaml() {
        let config: AppConfig = serde_yaml::from_str(
            "output:\n  default_format: cyclonedx\nattach:\n  on_missing_edge: create\n",
        )
        .unwrap();
        assert_eq!(config.output.default_format, BomFormat::CycloneDx);
        assert_eq!(config.attach.on_missing_edge, MissingEdgePolicy::Create);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, back);
    }
}
