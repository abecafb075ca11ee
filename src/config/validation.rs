//! Configuration validation for sbom-compose.

use super::types::{AppConfig, AttachConfig, ChartConfig, MergeConfig, OutputConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.chart.validate());
        errors.extend(self.output.validate());
        errors.extend(self.merge.validate());
        errors.extend(self.attach.validate());
        errors
    }
}

impl Validatable for ChartConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.images_annotation.trim().is_empty() {
            errors.push(ConfigError::new(
                "chart.images_annotation",
                "Annotation key must not be empty",
            ));
        }
        if self.cpe_annotation.trim().is_empty() {
            errors.push(ConfigError::new(
                "chart.cpe_annotation",
                "Annotation key must not be empty",
            ));
        }
        if !self.namespace_base.contains("://") {
            errors.push(ConfigError::new(
                "chart.namespace_base",
                format!(
                    "Namespace base '{}' must be an absolute URI with a scheme",
                    self.namespace_base
                ),
            ));
        }
        if self.namespace_base.contains('#') {
            errors.push(ConfigError::new(
                "chart.namespace_base",
                "Namespace base must not contain '#'",
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.tool_name.trim().is_empty() {
            errors.push(ConfigError::new("output.tool_name", "Tool name must not be empty"));
        }
        if let Some(org) = &self.organization {
            if org.trim().is_empty() {
                errors.push(ConfigError::new(
                    "output.organization",
                    "Organization must not be blank; omit it instead",
                ));
            }
        }
        errors
    }
}

impl Validatable for MergeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.root_name.trim().is_empty() {
            vec![ConfigError::new("merge.root_name", "Root name must not be empty")]
        } else {
            Vec::new()
        }
    }
}

impl Validatable for AttachConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_invalid_namespace_base() {
        let config = ChartConfig {
            namespace_base: "bigbang.dev#chart".to_string(),
            ..ChartConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field == "chart.namespace_base"));
    }

    #[test]
    fn test_empty_fields() {
        let mut config = AppConfig::default();
        config.merge.root_name = " ".to_string();
        config.output.tool_name = String::new();
        config.output.organization = Some(String::new());
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["output.tool_name", "output.organization", "merge.root_name"]
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("merge.root_name", "bad");
        assert_eq!(err.to_string(), "merge.root_name: bad");
    }
}
