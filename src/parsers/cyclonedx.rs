//! `CycloneDX` XML codec.
//!
//! Decodes and encodes the component/graph form via serde structs and
//! `quick-xml`. XML wraps collections in container elements
//! (`<components><component>...`), which the `*Xml` structs mirror.

use crate::model::{
    Component, ComponentType, Creator, CreatorType, Dependency, DependencyGraph, Document,
    DocumentMetadata, Hash, HashAlgorithm,
};
use crate::parsers::traits::{
    FormatConfidence, FormatDetection, ParseError, SbomParser, SbomWriter, WriteError,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Namespace prefix; the schema version is appended.
pub const CYCLONEDX_NAMESPACE_PREFIX: &str = "http://cyclonedx.org/schema/bom/";

/// Spec version written when the document does not name one.
pub const DEFAULT_SPEC_VERSION: &str = "1.4";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Codec for `CycloneDX` XML documents
#[derive(Debug, Clone)]
pub struct CycloneDxXmlCodec {
    spec_version: String,
}

impl Default for CycloneDxXmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CycloneDxXmlCodec {
    /// Create a new codec writing spec 1.4 by default
    #[must_use]
    pub fn new() -> Self {
        Self {
            spec_version: DEFAULT_SPEC_VERSION.to_string(),
        }
    }

    /// Spec version used when a document does not carry one.
    #[must_use]
    pub fn with_spec_version(mut self, spec_version: impl Into<String>) -> Self {
        self.spec_version = spec_version.into();
        self
    }

    fn parse_xml(&self, content: &str) -> Result<Document, ParseError> {
        let cdx: CycloneDxBomXml =
            quick_xml::de::from_str(content).map_err(|e| ParseError::XmlError(e.to_string()))?;

        let spec_version = cdx
            .xmlns
            .as_deref()
            .and_then(|ns| ns.strip_prefix(CYCLONEDX_NAMESPACE_PREFIX))
            .map_or_else(|| self.spec_version.clone(), str::to_string);

        let mut metadata = DocumentMetadata {
            spec_version,
            serial_number: cdx.serial_number,
            bom_version: cdx.version.unwrap_or(1),
            ..DocumentMetadata::default()
        };

        let mut root_component = None;
        let mut components = Vec::new();
        if let Some(meta) = cdx.metadata {
            metadata.timestamp = meta.timestamp.as_deref().and_then(parse_timestamp);
            if let Some(tools) = meta.tools {
                metadata
                    .creators
                    .extend(tools.tool.into_iter().map(|t| Creator::tool(t.display())));
            }
            if let Some(authors) = meta.authors {
                metadata.creators.extend(
                    authors
                        .author
                        .into_iter()
                        .filter_map(|a| a.name)
                        .map(Creator::person),
                );
            }
            if let Some(name) = meta.supplier.and_then(|s| s.name) {
                metadata.creators.push(Creator::organization(name));
            }
            if let Some(mut component) = meta.component {
                metadata.name = Some(component.name.clone());
                for child in component.take_children() {
                    child.flatten_into(&mut components);
                }
                root_component = Some(component.into_component());
            }
        }

        for component in cdx.components.map(|c| c.component).unwrap_or_default() {
            component.flatten_into(&mut components);
        }

        let dependencies = cdx
            .dependencies
            .map(|d| d.dependency)
            .unwrap_or_default()
            .into_iter()
            .map(CdxDependencyXml::into_dependency)
            .collect::<DependencyGraph>();

        Ok(Document {
            metadata,
            root_component,
            components,
            dependencies,
        })
    }

    fn to_xml_bom(&self, doc: &Document) -> CycloneDxBomXml {
        let meta = &doc.metadata;
        let spec_version = if meta.spec_version.is_empty() {
            self.spec_version.as_str()
        } else {
            meta.spec_version.as_str()
        };

        let tools: Vec<CdxToolXml> = meta
            .tools()
            .map(|t| CdxToolXml {
                vendor: None,
                name: Some(t.name.clone()),
                version: None,
            })
            .collect();
        let authors: Vec<CdxAuthorXml> = meta
            .creators
            .iter()
            .filter(|c| c.creator_type == CreatorType::Person)
            .map(|c| CdxAuthorXml {
                name: Some(c.name.clone()),
            })
            .collect();
        let supplier = meta
            .creators
            .iter()
            .find(|c| c.creator_type == CreatorType::Organization)
            .map(|c| CdxSupplierXml {
                name: Some(c.name.clone()),
            });

        let metadata = CdxMetadataXml {
            timestamp: meta
                .timestamp
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            tools: (!tools.is_empty()).then_some(CdxToolsXml { tool: tools }),
            authors: (!authors.is_empty()).then_some(CdxAuthorsXml { author: authors }),
            component: doc.root_component.as_ref().map(CdxComponentXml::from_component),
            supplier,
        };

        CycloneDxBomXml {
            xmlns: Some(format!("{CYCLONEDX_NAMESPACE_PREFIX}{spec_version}")),
            serial_number: meta.serial_number.clone(),
            version: Some(meta.bom_version.max(1)),
            metadata: Some(metadata),
            components: Some(CdxComponentsXml {
                component: doc
                    .components
                    .iter()
                    .map(CdxComponentXml::from_component)
                    .collect(),
            }),
            dependencies: (!doc.dependencies.is_empty()).then(|| CdxDependenciesXml {
                dependency: doc
                    .dependencies
                    .iter()
                    .map(CdxDependencyXml::from_dependency)
                    .collect(),
            }),
        }
    }

    /// Extract spec version from the namespace (quick heuristic, not full parse)
    fn extract_xml_version(content: &str) -> Option<String> {
        let idx = content.find(CYCLONEDX_NAMESPACE_PREFIX)?;
        let after = &content[idx + CYCLONEDX_NAMESPACE_PREFIX.len()..];
        let end = after.find(['"', '\''])?;
        Some(after[..end].to_string())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Ignoring unparseable timestamp '{raw}': {e}");
            None
        }
    }
}

impl SbomParser<Document> for CycloneDxXmlCodec {
    fn parse_str(&self, content: &str) -> Result<Document, ParseError> {
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
        if !content.trim_start().starts_with('<') {
            return Err(ParseError::UnknownFormat(
                "Expected CycloneDX XML content".to_string(),
            ));
        }
        self.parse_xml(content)
    }

    fn format_name(&self) -> &str {
        "CycloneDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim();

        if trimmed.starts_with('<') {
            let has_bom_element = content.contains("<bom");
            let has_cyclonedx_ns = content.contains("cyclonedx.org");
            let xml_version = Self::extract_xml_version(content);

            let confidence = if has_bom_element && has_cyclonedx_ns {
                FormatConfidence::CERTAIN
            } else if has_bom_element {
                FormatConfidence::MEDIUM
            } else {
                return FormatDetection::no_match();
            };
            let mut detection = FormatDetection::with_confidence(confidence);
            if let Some(v) = xml_version {
                detection = detection.version(&v);
            }
            return detection;
        }

        FormatDetection::no_match()
    }
}

impl SbomWriter<Document> for CycloneDxXmlCodec {
    fn write_string(&self, doc: &Document) -> Result<String, WriteError> {
        let bom = self.to_xml_bom(doc);
        let mut body = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut body);
        ser.indent(' ', 2);
        bom.serialize(ser)
            .map_err(|e| WriteError::XmlError(e.to_string()))?;

        let mut out = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
        out.push_str(XML_DECLARATION);
        out.push_str(&body);
        out.push('\n');
        Ok(out)
    }
}

// =============================================================================
// CycloneDX XML structures
// =============================================================================

/// Root BOM element
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename = "bom")]
struct CycloneDxBomXml {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    xmlns: Option<String>,
    #[serde(
        rename = "@serialNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    serial_number: Option<String>,
    /// BOM revision
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<CdxMetadataXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<CdxComponentsXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dependencies: Option<CdxDependenciesXml>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxMetadataXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tools: Option<CdxToolsXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authors: Option<CdxAuthorsXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<CdxComponentXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<CdxSupplierXml>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxToolsXml {
    #[serde(rename = "tool", default)]
    tool: Vec<CdxToolXml>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxToolXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl CdxToolXml {
    fn display(self) -> String {
        let name = self.name.unwrap_or_default();
        match self.version {
            Some(v) if !v.is_empty() => format!("{name}-{v}"),
            _ => name,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxAuthorsXml {
    #[serde(rename = "author", default)]
    author: Vec<CdxAuthorXml>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxAuthorXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxSupplierXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxComponentsXml {
    #[serde(rename = "component", default)]
    component: Vec<CdxComponentXml>,
}

/// Component element; field order follows the schema sequence.
#[derive(Debug, Deserialize, Serialize)]
struct CdxComponentXml {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    component_type: Option<String>,
    #[serde(rename = "@bom-ref", default, skip_serializing_if = "Option::is_none")]
    bom_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hashes: Option<CdxHashesXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    licenses: Option<CdxLicensesXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<CdxComponentsXml>,
}

impl CdxComponentXml {
    fn take_children(&mut self) -> Vec<CdxComponentXml> {
        self.components
            .take()
            .map(|c| c.component)
            .unwrap_or_default()
    }

    /// Push this component, then its nested components depth first.
    ///
    /// The model keeps one flat component list, so nesting is not preserved
    /// on write; every nested ref stays addressable by the dependency graph.
    fn flatten_into(mut self, out: &mut Vec<Component>) {
        let children = self.take_children();
        out.push(self.into_component());
        for child in children {
            child.flatten_into(out);
        }
    }

    fn into_component(self) -> Component {
        let bom_ref = self.bom_ref.unwrap_or_else(|| self.name.clone());
        let mut licenses = Vec::new();
        if let Some(l) = self.licenses {
            licenses.extend(l.license.into_iter().filter_map(|lic| lic.id.or(lic.name)));
            licenses.extend(l.expression);
        }
        Component {
            bom_ref,
            component_type: self
                .component_type
                .as_deref()
                .map(ComponentType::from_token)
                .unwrap_or_default(),
            name: self.name,
            version: self.version,
            group: self.group,
            purl: self.purl,
            cpe: self.cpe,
            description: self.description,
            licenses,
            hashes: self
                .hashes
                .map(|h| h.hash)
                .unwrap_or_default()
                .into_iter()
                .map(|h| Hash::new(HashAlgorithm::parse(&h.alg), h.content))
                .collect(),
        }
    }

    fn from_component(c: &Component) -> Self {
        Self {
            component_type: Some(c.component_type.as_str().to_string()),
            bom_ref: Some(c.bom_ref.clone()),
            group: c.group.clone(),
            name: c.name.clone(),
            version: c.version.clone(),
            description: c.description.clone(),
            hashes: (!c.hashes.is_empty()).then(|| CdxHashesXml {
                hash: c
                    .hashes
                    .iter()
                    .map(|h| CdxHashXml {
                        alg: h.algorithm.to_string(),
                        content: h.value.clone(),
                    })
                    .collect(),
            }),
            licenses: CdxLicensesXml::from_licenses(&c.licenses),
            cpe: c.cpe().map(str::to_string),
            purl: c.purl().map(str::to_string),
            components: None,
        }
    }
}

/// Licenses wrapper: either `<license>` entries or one `<expression>`.
#[derive(Debug, Deserialize, Serialize)]
struct CdxLicensesXml {
    #[serde(rename = "license", default, skip_serializing_if = "Vec::is_empty")]
    license: Vec<CdxLicenseXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
}

impl CdxLicensesXml {
    fn from_licenses(licenses: &[String]) -> Option<Self> {
        match licenses {
            [] => None,
            [single] if single.contains(' ') => Some(Self {
                license: Vec::new(),
                expression: Some(single.clone()),
            }),
            many => Some(Self {
                license: many
                    .iter()
                    .map(|l| {
                        if l.contains(' ') {
                            CdxLicenseXml {
                                id: None,
                                name: Some(l.clone()),
                            }
                        } else {
                            CdxLicenseXml {
                                id: Some(l.clone()),
                                name: None,
                            }
                        }
                    })
                    .collect(),
                expression: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxLicenseXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxHashesXml {
    #[serde(rename = "hash", default)]
    hash: Vec<CdxHashXml>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxHashXml {
    #[serde(rename = "@alg")]
    alg: String,
    #[serde(rename = "$text", default)]
    content: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct CdxDependenciesXml {
    #[serde(rename = "dependency", default)]
    dependency: Vec<CdxDependencyXml>,
}

/// Dependency element; children nest recursively.
#[derive(Debug, Deserialize, Serialize)]
struct CdxDependencyXml {
    #[serde(rename = "@ref")]
    bom_ref: String,
    #[serde(rename = "dependency", default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<CdxDependencyXml>,
}

impl CdxDependencyXml {
    fn into_dependency(self) -> Dependency {
        Dependency::with_children(
            self.bom_ref,
            self.depends_on
                .into_iter()
                .map(Self::into_dependency)
                .collect(),
        )
    }

    fn from_dependency(d: &Dependency) -> Self {
        Self {
            bom_ref: d.bom_ref.clone(),
            depends_on: d.depends_on.iter().map(Self::from_dependency).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <metadata>
    <timestamp>2024-05-01T10:00:00Z</timestamp>
    <tools>
      <tool>
        <vendor>Example</vendor>
        <name>scanner</name>
        <version>1.0</version>
      </tool>
    </tools>
    <component type="application" bom-ref="webapp">
      <name>webapp</name>
      <version>2.0.0</version>
    </component>
  </metadata>
  <components>
    <component type="library" bom-ref="pkg:npm/lodash@4.17.21">
      <name>lodash</name>
      <version>4.17.21</version>
      <hashes>
        <hash alg="SHA-256">abc123</hash>
      </hashes>
      <licenses>
        <license>
          <id>MIT</id>
        </license>
      </licenses>
      <purl>pkg:npm/lodash@4.17.21</purl>
    </component>
    <component type="library" bom-ref="openssl">
      <name>openssl</name>
      <version>3.0.8</version>
      <cpe>cpe:2.3:a:openssl:openssl:3.0.8:*:*:*:*:*:*:*</cpe>
    </component>
  </components>
  <dependencies>
    <dependency ref="webapp">
      <dependency ref="pkg:npm/lodash@4.17.21"/>
      <dependency ref="openssl"/>
    </dependency>
    <dependency ref="openssl"/>
  </dependencies>
</bom>
"#;

    #[test]
    fn test_parse_xml_components_and_metadata() {
        let doc = CycloneDxXmlCodec::new().parse_str(BOM).unwrap();
        assert_eq!(doc.metadata.spec_version, "1.4");
        assert_eq!(doc.metadata.bom_version, 1);
        assert!(doc.metadata.timestamp.is_some());
        assert_eq!(doc.metadata.creators[0].name, "scanner-1.0");
        assert_eq!(doc.root_ref(), Some("webapp"));
        assert_eq!(doc.components.len(), 2);

        let lodash = &doc.components[0];
        assert_eq!(lodash.purl(), Some("pkg:npm/lodash@4.17.21"));
        assert_eq!(lodash.licenses, vec!["MIT"]);
        assert_eq!(lodash.hashes[0].algorithm, HashAlgorithm::Sha256);
        assert_eq!(lodash.hashes[0].value, "abc123");

        assert_eq!(
            doc.components[1].cpe(),
            Some("cpe:2.3:a:openssl:openssl:3.0.8:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_parse_nested_dependencies() {
        let doc = CycloneDxXmlCodec::new().parse_str(BOM).unwrap();
        assert_eq!(doc.dependencies.len(), 2);
        let root = doc.dependencies.find("webapp").unwrap();
        assert_eq!(
            root.child_refs().collect::<Vec<_>>(),
            vec!["pkg:npm/lodash@4.17.21", "openssl"]
        );
        assert!(doc.dependencies.find("openssl").unwrap().depends_on.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_components_and_edges() {
        let codec = CycloneDxXmlCodec::new();
        let doc = codec.parse_str(BOM).unwrap();
        let xml = codec.write_string(&doc).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("http://cyclonedx.org/schema/bom/1.4"));

        let again = codec.parse_str(&xml).unwrap();
        assert_eq!(again.components, doc.components);
        assert_eq!(again.dependencies, doc.dependencies);
        assert_eq!(again.root_component, doc.root_component);
    }

    const NESTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" version="1">
  <metadata>
    <component type="application" bom-ref="app">
      <name>app</name>
      <components>
        <component type="library" bom-ref="app-plugin">
          <name>app-plugin</name>
        </component>
      </components>
    </component>
  </metadata>
  <components>
    <component type="library" bom-ref="outer">
      <name>outer</name>
      <components>
        <component type="library" bom-ref="inner">
          <name>inner</name>
          <purl>pkg:npm/inner@1</purl>
          <components>
            <component type="library" bom-ref="innermost">
              <name>innermost</name>
            </component>
          </components>
        </component>
      </components>
    </component>
    <component type="library" bom-ref="sibling">
      <name>sibling</name>
    </component>
  </components>
  <dependencies>
    <dependency ref="app">
      <dependency ref="outer"/>
      <dependency ref="app-plugin"/>
    </dependency>
    <dependency ref="outer">
      <dependency ref="inner"/>
    </dependency>
    <dependency ref="inner">
      <dependency ref="innermost"/>
    </dependency>
  </dependencies>
</bom>
"#;

    #[test]
    fn test_nested_components_are_flattened() {
        let codec = CycloneDxXmlCodec::new();
        let doc = codec.parse_str(NESTED).unwrap();
        assert_eq!(doc.root_ref(), Some("app"));
        let refs: Vec<_> = doc.components.iter().map(|c| c.bom_ref.as_str()).collect();
        assert_eq!(refs, vec!["app-plugin", "outer", "inner", "innermost", "sibling"]);
        assert_eq!(doc.components[2].purl(), Some("pkg:npm/inner@1"));
        assert!(doc.validate().is_empty(), "{:?}", doc.validate());

        let xml = codec.write_string(&doc).unwrap();
        assert!(xml.contains("pkg:npm/inner@1"));
        let again = codec.parse_str(&xml).unwrap();
        assert_eq!(again.components, doc.components);
        assert!(again.validate().is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let doc = CycloneDxXmlCodec::new()
            .parse_str(&format!("\u{FEFF}{BOM}"))
            .unwrap();
        assert_eq!(doc.components.len(), 2);
    }

    #[test]
    fn test_write_uses_default_spec_when_unset() {
        let mut doc = Document::default();
        doc.components.push(Component::new("a", "a"));
        let xml = CycloneDxXmlCodec::new()
            .with_spec_version("1.5")
            .write_string(&doc)
            .unwrap();
        assert!(xml.contains("http://cyclonedx.org/schema/bom/1.5"));
        assert!(!xml.contains("<dependencies"));
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let err = CycloneDxXmlCodec::new()
            .parse_str("<bom xmlns=\"http://cyclonedx.org/schema/bom/1.4\"><components>")
            .unwrap_err();
        assert!(matches!(err, ParseError::XmlError(_)));
    }

    #[test]
    fn test_detect() {
        let codec = CycloneDxXmlCodec::new();
        let detection = codec.detect(BOM);
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("1.4"));
        assert!(!codec.can_parse("SPDXVersion: SPDX-2.2"));
    }
}
