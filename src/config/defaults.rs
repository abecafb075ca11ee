//! Default values for sbom-compose configuration.

use super::types::{ChartConfig, MergeConfig, OutputConfig};
use crate::chart::{DEFAULT_CPE_ANNOTATION, DEFAULT_IMAGES_ANNOTATION};
use crate::compose::{DEFAULT_NAMESPACE_BASE, DEFAULT_TOOL_NAME};
use crate::model::BomFormat;

/// Default root component name for `combine`.
pub const DEFAULT_ROOT_NAME: &str = "combined";

/// Default output format.
pub const DEFAULT_OUTPUT_FORMAT: BomFormat = BomFormat::Spdx;

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            images_annotation: DEFAULT_IMAGES_ANNOTATION.to_string(),
            cpe_annotation: DEFAULT_CPE_ANNOTATION.to_string(),
            namespace_base: DEFAULT_NAMESPACE_BASE.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            organization: None,
            default_format: DEFAULT_OUTPUT_FORMAT,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            union_dependencies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::MissingEdgePolicy;
    use crate::config::AppConfig;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chart.images_annotation, "bigbang.dev/images");
        assert_eq!(config.chart.cpe_annotation, "bigbang.dev/cpe");
        assert_eq!(config.chart.namespace_base, "https://bigbang.dev/chart");
        assert_eq!(config.output.tool_name, "sbom-compose");
        assert_eq!(config.output.default_format, BomFormat::Spdx);
        assert_eq!(config.merge.root_name, DEFAULT_ROOT_NAME);
        assert!(!config.merge.union_dependencies);
        assert_eq!(config.attach.on_missing_edge, MissingEdgePolicy::Fail);
    }
}
