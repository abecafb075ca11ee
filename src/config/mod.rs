//! Configuration module for sbom-compose.
//!
//! Provides:
//! - Typed configuration sections with defaults
//! - Validation of loaded values
//! - YAML config file loading and discovery
//! - A JSON schema for editor support
//!
//! # Configuration File
//!
//! Place a `.sbom-compose.yaml` file in your project root or `~/.config/sbom-compose/`:
//!
//! ```yaml
//! chart:
//!   images_annotation: bigbang.dev/images
//!   cpe_annotation: bigbang.dev/cpe
//!   namespace_base: https://bigbang.dev/chart
//! output:
//!   organization: Example Org
//!   default_format: cyclonedx
//! merge:
//!   root_name: platform
//!   union_dependencies: false
//! attach:
//!   on_missing_edge: fail
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_OUTPUT_FORMAT, DEFAULT_ROOT_NAME};
pub use types::{AppConfig, AttachConfig, ChartConfig, MergeConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Documents every option of `.sbom-compose.yaml` for editor validation
/// and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema();
        for section in ["chart", "output", "merge", "attach", "on_missing_edge"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
