//! Component/graph to package-oriented translation.

use crate::model::{
    Checksum, Component, Creator, CreatorType, Document, ExternalRef, RelationshipType,
    SpdxDocument, SpdxPackage, DOCUMENT_ID,
};
use chrono::SecondsFormat;
use std::collections::{HashMap, HashSet};

/// Translate a component/graph document into the package-oriented shape.
///
/// Every component becomes a package whose element id is derived from its
/// ref. Children of the root component's edge become `DOCUMENT DESCRIBES`
/// relationships; every other parent/child pair becomes `DEPENDS_ON`.
#[must_use]
pub fn to_package_document(doc: &Document, namespace_base: &str) -> SpdxDocument {
    let name = doc
        .metadata
        .name
        .clone()
        .or_else(|| doc.root_component.as_ref().map(|c| c.name.clone()))
        .unwrap_or_else(|| "bom".to_string());
    let namespace = format!("{}/{}", namespace_base.trim_end_matches('/'), name);

    let mut out = SpdxDocument::new(name, namespace);
    out.creation_info.created = doc
        .metadata
        .timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true));
    for creator in &doc.metadata.creators {
        push_creator(&mut out, creator);
    }

    let root_ref = doc.root_ref();
    let mut ids = ElementIds::default();
    if let Some(root) = root_ref {
        ids.map.insert(root.to_string(), DOCUMENT_ID.to_string());
        ids.used.insert(DOCUMENT_ID.to_string());
    }

    for component in &doc.components {
        let id = ids.assign(&component.bom_ref);
        if out.add_package(component_to_package(component, id)).is_some() {
            tracing::warn!(
                "Component ref '{}' appears more than once, keeping the last one",
                component.bom_ref
            );
        }
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    doc.dependencies.for_each_child(|parent, child| {
        let from = ids.assign(parent);
        let to = ids.assign(&child.bom_ref);
        if !seen.insert((from.clone(), to.clone())) {
            return;
        }
        let kind = if Some(parent) == root_ref {
            RelationshipType::Describes
        } else {
            RelationshipType::DependsOn
        };
        out.add_relationship(from, kind, to);
    });

    out
}

fn push_creator(out: &mut SpdxDocument, creator: &Creator) {
    let info = &mut out.creation_info;
    match creator.creator_type {
        CreatorType::Tool => info.tools.push(creator.name.clone()),
        CreatorType::Organization => info.organizations.push(creator.name.clone()),
        CreatorType::Person => info.persons.push(creator.name.clone()),
    }
}

fn component_to_package(c: &Component, spdx_id: String) -> SpdxPackage {
    let mut pkg = SpdxPackage::new(spdx_id, c.name.clone());
    pkg.version.clone_from(&c.version);
    pkg.description.clone_from(&c.description);
    // First license is the declared one, a second is the concluded one
    match c.licenses.as_slice() {
        [] => {}
        [declared] => pkg.license_declared.clone_from(declared),
        [declared, concluded, rest @ ..] => {
            pkg.license_declared.clone_from(declared);
            pkg.license_concluded.clone_from(concluded);
            if !rest.is_empty() {
                tracing::debug!(
                    "Package '{}' keeps 2 of {} licenses",
                    pkg.name,
                    c.licenses.len()
                );
            }
        }
    }
    pkg.checksums = c
        .hashes
        .iter()
        .map(|h| Checksum {
            algorithm: h.algorithm.spdx_name(),
            value: h.value.clone(),
        })
        .collect();
    if let Some(purl) = c.purl() {
        pkg.external_refs.push(ExternalRef::purl(purl));
    }
    if let Some(cpe) = c.cpe() {
        pkg.external_refs.push(ExternalRef::cpe23(cpe));
    }
    pkg
}

/// Ref to element-id assignment.
///
/// Element ids only allow letters, digits, `.` and `-`; anything else is
/// replaced by `-`, and collisions get a numeric suffix.
#[derive(Default)]
struct ElementIds {
    map: HashMap<String, String>,
    used: HashSet<String>,
}

impl ElementIds {
    fn assign(&mut self, bom_ref: &str) -> String {
        if let Some(id) = self.map.get(bom_ref) {
            return id.clone();
        }
        let base = sanitize_element_id(bom_ref);
        let mut id = base.clone();
        let mut n = 1;
        while self.used.contains(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.used.insert(id.clone());
        self.map.insert(bom_ref.to_string(), id.clone());
        id
    }
}

fn sanitize_element_id(bom_ref: &str) -> String {
    let id: String = bom_ref
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if id.is_empty() {
        "unnamed".to_string()
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, DependencyGraph, DocumentMetadata, NOASSERTION};

    fn sample() -> Document {
        let mut doc = Document::new(DocumentMetadata {
            name: Some("webapp".into()),
            creators: vec![Creator::tool("scanner"), Creator::organization("Example")],
            ..DocumentMetadata::default()
        });
        doc.root_component = Some(Component::new("webapp", "webapp"));
        doc.components = vec![
            Component::new("pkg:npm/lodash@4.17.21", "lodash")
                .with_version("4.17.21")
                .with_purl("pkg:npm/lodash@4.17.21"),
            Component::new("openssl", "openssl").with_cpe("cpe:2.3:a:openssl:openssl:3.0.8"),
        ];
        doc.dependencies = DependencyGraph::from_edges(vec![
            Dependency::with_children(
                "webapp",
                vec![Dependency::new("pkg:npm/lodash@4.17.21")],
            ),
            Dependency::with_children("pkg:npm/lodash@4.17.21", vec![Dependency::new("openssl")]),
        ]);
        doc
    }

    #[test]
    fn test_packages_and_external_refs() {
        let out = to_package_document(&sample(), "https://example.com/bom/");
        assert_eq!(out.namespace, "https://example.com/bom/webapp");
        assert_eq!(out.creation_info.tools, vec!["scanner"]);
        assert_eq!(out.creation_info.organizations, vec!["Example"]);

        let lodash = out.package("pkg-npm-lodash-4.17.21").unwrap();
        assert_eq!(lodash.external_refs, vec![ExternalRef::purl("pkg:npm/lodash@4.17.21")]);
        assert_eq!(lodash.license_declared, NOASSERTION);

        let openssl = out.package("openssl").unwrap();
        assert_eq!(openssl.external_refs[0].category, "SECURITY");
        assert_eq!(openssl.external_refs[0].ref_type, "cpe23Type");
    }

    #[test]
    fn test_root_edge_becomes_describes() {
        let out = to_package_document(&sample(), "https://example.com");
        let rels: Vec<_> = out
            .relationships
            .iter()
            .map(|r| {
                (
                    r.element.as_str(),
                    r.relationship_type.as_str(),
                    r.related_element.as_str(),
                )
            })
            .collect();
        assert_eq!(
            rels,
            vec![
                ("DOCUMENT", "DESCRIBES", "pkg-npm-lodash-4.17.21"),
                ("pkg-npm-lodash-4.17.21", "DEPENDS_ON", "openssl"),
            ]
        );
    }

    #[test]
    fn test_colliding_ids_get_suffix() {
        let mut ids = ElementIds::default();
        assert_eq!(ids.assign("a/b"), "a-b");
        assert_eq!(ids.assign("a:b"), "a-b-1");
        assert_eq!(ids.assign("a/b"), "a-b");
        assert_eq!(sanitize_element_id(""), "unnamed");
    }

    #[test]
    fn test_licenses_are_not_combined() {
        let mut mit = Component::new("a", "a");
        mit.licenses = vec!["MIT".into()];
        let pkg = component_to_package(&mit, "a".into());
        assert_eq!(pkg.license_declared, "MIT");
        assert_eq!(pkg.license_concluded, NOASSERTION);

        let mut two = Component::new("b", "b");
        two.licenses = vec!["MIT".into(), "Apache-2.0".into()];
        let pkg = component_to_package(&two, "b".into());
        assert_eq!(pkg.license_declared, "MIT");
        assert_eq!(pkg.license_concluded, "Apache-2.0");
        assert!(!pkg.license_declared.contains(" AND "));

        let back = crate::translate::package_to_component(&pkg);
        assert_eq!(back.licenses, two.licenses);
    }
}
