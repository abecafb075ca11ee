//! Content-based format detection.

use super::traits::{FormatConfidence, SbomParser};
use super::{CycloneDxXmlCodec, SpdxTagValueCodec};
use crate::model::BomFormat;

/// Result of format detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// The detected format, if any.
    pub format: Option<BomFormat>,
    /// Confidence level of the detection.
    pub confidence: FormatConfidence,
    /// Detected spec version if available.
    pub version: Option<String>,
}

impl DetectionResult {
    fn unknown() -> Self {
        Self {
            format: None,
            confidence: FormatConfidence::NONE,
            version: None,
        }
    }

    /// Check if the detection is confident enough to parse.
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.format.is_some() && self.confidence.can_parse()
    }
}

/// Asks every codec for a confidence score and keeps the best.
#[derive(Debug, Default)]
pub struct FormatDetector {
    cyclonedx: CycloneDxXmlCodec,
    spdx: SpdxTagValueCodec,
}

impl FormatDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect format from full content string.
    #[must_use]
    pub fn detect_from_content(&self, content: &str) -> DetectionResult {
        let cdx = self.cyclonedx.detect(content);
        let spdx = self.spdx.detect(content);

        let (format, detection) = if cdx.confidence >= spdx.confidence {
            (BomFormat::CycloneDx, cdx)
        } else {
            (BomFormat::Spdx, spdx)
        };

        if detection.confidence.can_parse() {
            DetectionResult {
                format: Some(format),
                confidence: detection.confidence,
                version: detection.version,
            }
        } else {
            DetectionResult::unknown()
        }
    }
}

/// Detect the on-disk format of `content`, or `None` when nothing matches.
#[must_use]
pub fn detect_format(content: &str) -> Option<BomFormat> {
    let result = FormatDetector::new().detect_from_content(content);
    if result.can_parse() {
        tracing::debug!(
            "Detected {:?} (confidence {:.2}, version {:?})",
            result.format,
            result.confidence.value(),
            result.version
        );
        result.format
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_spdx_tag_value() {
        let content = "SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT";
        assert_eq!(detect_format(content), Some(BomFormat::Spdx));
        let result = FormatDetector::new().detect_from_content(content);
        assert_eq!(result.version.as_deref(), Some("2.3"));
    }

    #[test]
    fn test_detect_cyclonedx_xml() {
        let content = r#"<?xml version="1.0"?><bom xmlns="http://cyclonedx.org/schema/bom/1.4"></bom>"#;
        assert_eq!(detect_format(content), Some(BomFormat::CycloneDx));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format(r#"{"some": "json"}"#), None);
        assert_eq!(detect_format(""), None);
        assert_eq!(detect_format("<html></html>"), None);
    }
}
