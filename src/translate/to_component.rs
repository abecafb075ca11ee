//! Package-oriented to component/graph translation.

use crate::model::{
    Component, ComponentType, Creator, Dependency, DependencyGraph, Document, DocumentMetadata,
    Hash, HashAlgorithm, SpdxDocument, SpdxPackage, DOCUMENT_ID, NOASSERTION,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Map one package to a component.
///
/// The type defaults to container. An id containing `-image-` selects
/// container and then an id containing `cpe-` selects application, so the
/// CPE rule wins when both match. For external references the last CPE and
/// the last purl seen survive.
#[must_use]
pub fn package_to_component(pkg: &SpdxPackage) -> Component {
    let mut component_type = ComponentType::Container;
    if pkg.spdx_id.contains("-image-") {
        component_type = ComponentType::Container;
    }
    if pkg.spdx_id.contains("cpe-") {
        component_type = ComponentType::Application;
    }

    let mut cpe = None;
    let mut purl = None;
    for ext in &pkg.external_refs {
        if ext.is_cpe() {
            cpe = Some(ext.locator.clone());
        }
        if ext.is_purl() {
            purl = Some(ext.locator.clone());
        }
    }

    let mut licenses = Vec::new();
    for license in [&pkg.license_declared, &pkg.license_concluded] {
        if is_asserted(license) && !licenses.contains(license) {
            licenses.push(license.clone());
        }
    }

    Component {
        bom_ref: pkg.spdx_id.clone(),
        component_type,
        name: pkg.name.clone(),
        version: pkg.version.clone(),
        group: None,
        purl,
        cpe,
        description: pkg.description.clone(),
        licenses,
        hashes: pkg
            .checksums
            .iter()
            .map(|c| Hash::new(HashAlgorithm::parse(&c.algorithm), c.value.clone()))
            .collect(),
    }
}

fn is_asserted(value: &str) -> bool {
    !value.is_empty() && value != NOASSERTION && value != "NONE"
}

/// Translate a package-oriented document into the component/graph shape.
///
/// Components are emitted in element-id order. `DESCRIBES`, `DEPENDS_ON` and
/// `CONTAINS` relationships become edges, with the document element mapped to
/// the root component; edges are ordered by source ref. Relationships whose
/// endpoint is not a package (a file or snippet) are skipped.
#[must_use]
pub fn to_target_document(src: &SpdxDocument) -> Document {
    let root_ref = src.name.clone();

    let metadata = DocumentMetadata {
        timestamp: src
            .creation_info
            .created
            .as_deref()
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
            .map(|ts| ts.with_timezone(&Utc)),
        name: Some(src.name.clone()),
        creators: creators_of(src),
        spec_version: String::new(),
        serial_number: None,
        bom_version: 1,
    };

    let root_component = Component::new(root_ref.clone(), src.name.clone())
        .with_type(ComponentType::Application);

    let components = src.packages.values().map(package_to_component).collect();

    let map_id = |id: &str| -> String {
        if id == DOCUMENT_ID || id == src.spdx_id {
            root_ref.clone()
        } else {
            id.to_string()
        }
    };

    // Files and snippets are not translated, so edges may only name packages
    let is_translated =
        |id: &str| id == DOCUMENT_ID || id == src.spdx_id || src.packages.contains_key(id);

    let mut edges: BTreeMap<String, Vec<Dependency>> = BTreeMap::new();
    for rel in src
        .relationships
        .iter()
        .filter(|r| r.relationship_type.is_dependency())
    {
        if !is_translated(&rel.element) || !is_translated(&rel.related_element) {
            tracing::debug!(
                "Skipping relationship {} -> {}: endpoint is not a package",
                rel.element,
                rel.related_element
            );
            continue;
        }
        let children = edges.entry(map_id(&rel.element)).or_default();
        let child = map_id(&rel.related_element);
        if !children.iter().any(|d| d.bom_ref == child) {
            children.push(Dependency::new(child));
        }
    }

    tracing::debug!(
        "Translated {} packages and {} relationships into {} edges",
        src.packages.len(),
        src.relationships.len(),
        edges.len()
    );

    Document {
        metadata,
        root_component: Some(root_component),
        components,
        dependencies: edges
            .into_iter()
            .map(|(source, children)| Dependency::with_children(source, children))
            .collect::<DependencyGraph>(),
    }
}

fn creators_of(src: &SpdxDocument) -> Vec<Creator> {
    let info = &src.creation_info;
    info.tools
        .iter()
        .map(Creator::tool)
        .chain(info.organizations.iter().map(Creator::organization))
        .chain(info.persons.iter().map(Creator::person))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Checksum, ExternalRef, RelationshipType};

    #[test]
    fn test_default_type_is_container() {
        let c = package_to_component(&SpdxPackage::new("musl", "musl"));
        assert_eq!(c.component_type, ComponentType::Container);
        assert_eq!(c.bom_ref, "musl");
    }

    #[test]
    fn test_cpe_rule_runs_last() {
        let c = package_to_component(&SpdxPackage::new("x-image-cpe-y", "x"));
        assert_eq!(c.component_type, ComponentType::Application);

        let c = package_to_component(&SpdxPackage::new("cpe-2.3:a:v:p:1", "p"));
        assert_eq!(c.component_type, ComponentType::Application);
    }

    #[test]
    fn test_external_refs_last_write_wins() {
        let pkg = SpdxPackage::new("p", "p")
            .with_external_ref(ExternalRef::cpe23("cpe:2.3:a:first"))
            .with_external_ref(ExternalRef::purl("pkg:generic/first"))
            .with_external_ref(ExternalRef {
                category: "SECURITY".into(),
                ref_type: "cpe22Type".into(),
                locator: "cpe:/a:second".into(),
            })
            .with_external_ref(ExternalRef::purl("pkg:generic/second"));
        let c = package_to_component(&pkg);
        assert_eq!(c.cpe(), Some("cpe:/a:second"));
        assert_eq!(c.purl(), Some("pkg:generic/second"));
    }

    #[test]
    fn test_licenses_and_checksums_carried() {
        let mut pkg = SpdxPackage::new("p", "p");
        pkg.license_declared = "MIT".into();
        pkg.license_concluded = "MIT".into();
        pkg.checksums.push(Checksum {
            algorithm: "SHA1".into(),
            value: "deadbeef".into(),
        });
        let c = package_to_component(&pkg);
        assert_eq!(c.licenses, vec!["MIT"]);
        assert_eq!(c.hashes[0].algorithm, HashAlgorithm::Sha1);
    }

    #[test]
    fn test_to_target_document_is_sorted_and_rooted() {
        let mut src = SpdxDocument::new("chart", "https://example.com/chart");
        src.creation_info.created = Some("2024-05-01T10:00:00Z".into());
        src.creation_info.tools.push("sbom-compose".into());
        src.add_package(SpdxPackage::new("zlib", "zlib"));
        src.add_package(SpdxPackage::new("image-nginx:1.21", "nginx"));
        src.add_package(SpdxPackage::new("attr", "attr"));
        src.add_relationship(DOCUMENT_ID, RelationshipType::Describes, "image-nginx:1.21");
        src.add_relationship("image-nginx:1.21", RelationshipType::Contains, "zlib");
        src.add_relationship("image-nginx:1.21", RelationshipType::Contains, "attr");
        src.add_relationship("zlib", RelationshipType::Other("GENERATED_FROM".into()), "attr");

        let doc = to_target_document(&src);
        let refs: Vec<_> = doc.components.iter().map(|c| c.bom_ref.as_str()).collect();
        assert_eq!(refs, vec!["attr", "image-nginx:1.21", "zlib"]);
        assert_eq!(doc.root_ref(), Some("chart"));
        assert!(doc.metadata.timestamp.is_some());

        let sources: Vec<_> = doc.dependencies.iter().map(|e| e.bom_ref.as_str()).collect();
        assert_eq!(sources, vec!["chart", "image-nginx:1.21"]);
        assert_eq!(
            doc.dependencies
                .find("image-nginx:1.21")
                .unwrap()
                .child_refs()
                .collect::<Vec<_>>(),
            vec!["zlib", "attr"]
        );
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_relationships_to_files_are_not_edges() {
        let mut src = SpdxDocument::new("zlib-scan", "https://example.com/zlib");
        src.add_package(SpdxPackage::new("Package-zlib", "zlib"));
        src.add_relationship(DOCUMENT_ID, RelationshipType::Describes, "Package-zlib");
        src.add_relationship("Package-zlib", RelationshipType::Contains, "File-libz");
        src.add_relationship("File-libz", RelationshipType::Contains, "Package-zlib");

        let doc = to_target_document(&src);
        assert!(doc.validate().is_empty(), "{:?}", doc.validate());
        assert!(doc.dependencies.find("Package-zlib").is_none());
        assert_eq!(
            doc.dependencies
                .find("zlib-scan")
                .unwrap()
                .child_refs()
                .collect::<Vec<_>>(),
            vec!["Package-zlib"]
        );
    }
}
