//! Chart metadata loading.

use super::annotations::{parse_cpes, parse_images};
use crate::error::{ChartErrorKind, ComposeError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Metadata file name inside a chart directory.
pub const CHART_FILE_NAME: &str = "Chart.yaml";

/// Default annotation carrying the image list.
pub const DEFAULT_IMAGES_ANNOTATION: &str = "bigbang.dev/images";

/// Default annotation carrying the CPE list.
pub const DEFAULT_CPE_ANNOTATION: &str = "bigbang.dev/cpe";

/// The subset of `Chart.yaml` this tool reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChartMetadata {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Annotation keys holding the image and CPE lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationKeys {
    pub images: String,
    pub cpes: String,
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self {
            images: DEFAULT_IMAGES_ANNOTATION.to_string(),
            cpes: DEFAULT_CPE_ANNOTATION.to_string(),
        }
    }
}

/// A loaded chart: metadata plus the parsed annotation lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub metadata: ChartMetadata,
    /// Image references in annotation order
    pub images: Vec<String>,
    /// CPE strings in annotation order
    pub cpes: Vec<String>,
}

impl Chart {
    /// Build a chart from already parsed metadata.
    #[must_use]
    pub fn from_metadata(metadata: ChartMetadata, keys: &AnnotationKeys) -> Self {
        let annotation = |key: &str| metadata.annotations.get(key).map_or("", String::as_str);
        let images = parse_images(annotation(&keys.images));
        let cpes = parse_cpes(annotation(&keys.cpes));
        Self {
            metadata,
            images,
            cpes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.metadata.version
    }
}

/// Parse `Chart.yaml` content.
///
/// # Errors
///
/// [`ChartErrorKind::InvalidMetadata`] on malformed YAML or an empty name.
pub fn parse_chart_metadata(content: &str) -> Result<ChartMetadata> {
    let metadata: ChartMetadata = serde_yaml::from_str(content).map_err(|e| {
        ComposeError::chart("parsing chart metadata", ChartErrorKind::InvalidMetadata(e.to_string()))
    })?;
    if metadata.name.trim().is_empty() {
        return Err(ComposeError::chart(
            "parsing chart metadata",
            ChartErrorKind::InvalidMetadata("chart name is empty".to_string()),
        ));
    }
    Ok(metadata)
}

/// Load a chart from a directory containing `Chart.yaml`, or from the file itself.
///
/// # Errors
///
/// I/O errors reading the file and [`ChartErrorKind::InvalidMetadata`].
pub fn load_chart(path: &Path, keys: &AnnotationKeys) -> Result<Chart> {
    let file: PathBuf = if path.is_dir() {
        path.join(CHART_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&file).map_err(|e| ComposeError::io(&file, e))?;
    let metadata = parse_chart_metadata(&content)?;
    let chart = Chart::from_metadata(metadata, keys);

    tracing::info!(
        "Loaded chart {} {} ({} images, {} CPEs)",
        chart.name(),
        chart.version(),
        chart.images.len(),
        chart.cpes.len()
    );
    for (key, value) in &chart.metadata.annotations {
        tracing::debug!("Annotation {} -> {}", key, value);
    }
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CHART_YAML: &str = r#"apiVersion: v2
name: redis
version: 14.1.0
description: In-memory data store
annotations:
  bigbang.dev/images: |
    - name: redis
      image: registry1.dso.mil/ironbank/redis:6.2.6
    - name: exporter
      image: registry1.dso.mil/ironbank/redis-exporter:v1.31.4
  bigbang.dev/cpe: |
    - cpe:2.3:a:redislabs:redis:6.2.6
"#;

    #[test]
    fn test_parse_chart_metadata() {
        let metadata = parse_chart_metadata(CHART_YAML).unwrap();
        assert_eq!(metadata.name, "redis");
        assert_eq!(metadata.version, "14.1.0");
        assert_eq!(metadata.annotations.len(), 2);
    }

    #[test]
    fn test_chart_annotation_lists() {
        let chart =
            Chart::from_metadata(parse_chart_metadata(CHART_YAML).unwrap(), &AnnotationKeys::default());
        assert_eq!(
            chart.images,
            vec![
                "registry1.dso.mil/ironbank/redis:6.2.6",
                "registry1.dso.mil/ironbank/redis-exporter:v1.31.4",
            ]
        );
        assert_eq!(chart.cpes, vec!["2.3:a:redislabs:redis:6.2.6"]);
    }

    #[test]
    fn test_custom_annotation_keys() {
        let keys = AnnotationKeys {
            images: "example.com/imgs".to_string(),
            cpes: "example.com/cpes".to_string(),
        };
        let chart = Chart::from_metadata(parse_chart_metadata(CHART_YAML).unwrap(), &keys);
        assert!(chart.images.is_empty());
        assert!(chart.cpes.is_empty());
    }

    #[test]
    fn test_invalid_metadata() {
        assert!(parse_chart_metadata("name: [unclosed").is_err());
        assert!(parse_chart_metadata("version: 1.0.0\n").is_err());
        assert!(parse_chart_metadata("name: \"\"\n").is_err());
    }

    #[test]
    fn test_load_chart_from_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CHART_FILE_NAME), CHART_YAML).unwrap();
        let chart = load_chart(tmp.path(), &AnnotationKeys::default()).unwrap();
        assert_eq!(chart.name(), "redis");
        assert_eq!(chart.images.len(), 2);
    }

    #[test]
    fn test_load_chart_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_chart(tmp.path(), &AnnotationKeys::default()).unwrap_err();
        assert!(matches!(err, ComposeError::Io { .. }));
    }
}
