//! Component/graph-oriented document.

use super::{Component, DependencyGraph, DocumentMetadata};
use crate::error::IntegrityIssue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A BOM in the component/dependency-graph shape.
///
/// This is the shape every composition operation works on. Package-oriented
/// documents are translated into it first, see [`crate::translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document-level metadata
    pub metadata: DocumentMetadata,
    /// The document's own subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_component: Option<Component>,
    /// Components in document order
    pub components: Vec<Component>,
    /// Dependency edges
    pub dependencies: DependencyGraph,
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Look up a component (or the root component) by ref.
    #[must_use]
    pub fn component(&self, bom_ref: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.bom_ref == bom_ref)
            .or_else(|| self.root_component.as_ref().filter(|c| c.bom_ref == bom_ref))
    }

    /// Ref of the root component, if there is one.
    #[must_use]
    pub fn root_ref(&self) -> Option<&str> {
        self.root_component.as_ref().map(|c| c.bom_ref.as_str())
    }

    /// Number of components, not counting the root component.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Check referential integrity.
    ///
    /// Reports refs used by more than one component (the root component
    /// included) and edge sources or targets that name no component.
    #[must_use]
    pub fn validate(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for c in self.root_component.iter().chain(self.components.iter()) {
            *counts.entry(c.bom_ref.as_str()).or_default() += 1;
        }
        for (bom_ref, count) in &counts {
            if *count > 1 {
                issues.push(IntegrityIssue::DuplicateRef {
                    bom_ref: (*bom_ref).to_string(),
                });
            }
        }

        let known: HashSet<&str> = counts.keys().copied().collect();
        for edge in &self.dependencies {
            if !known.contains(edge.bom_ref.as_str()) {
                issues.push(IntegrityIssue::DanglingRef {
                    from: None,
                    bom_ref: edge.bom_ref.clone(),
                });
            }
        }
        self.dependencies.for_each_child(|parent, child| {
            if !known.contains(child.bom_ref.as_str()) {
                issues.push(IntegrityIssue::DanglingRef {
                    from: Some(parent.to_string()),
                    bom_ref: child.bom_ref.clone(),
                });
            }
        });

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dependency;

    fn doc() -> Document {
        let mut doc = Document::new(DocumentMetadata::default());
        doc.root_component = Some(Component::new("app", "app"));
        doc.components = vec![Component::new("a", "a"), Component::new("b", "b")];
        doc.dependencies = DependencyGraph::from_edges(vec![
            Dependency::with_children("app", vec![Dependency::new("a")]),
            Dependency::with_children("a", vec![Dependency::new("b")]),
        ]);
        doc
    }

    #[test]
    fn test_valid_document_has_no_issues() {
        assert!(doc().validate().is_empty());
    }

    #[test]
    fn test_component_lookup_includes_root() {
        let d = doc();
        assert_eq!(d.component("b").map(|c| c.name.as_str()), Some("b"));
        assert_eq!(d.component("app").map(|c| c.name.as_str()), Some("app"));
        assert!(d.component("zzz").is_none());
        assert_eq!(d.root_ref(), Some("app"));
        assert_eq!(d.component_count(), 2);
    }

    #[test]
    fn test_duplicate_refs_reported_once() {
        let mut d = doc();
        d.components.push(Component::new("a", "a-again"));
        d.components.push(Component::new("a", "a-third"));
        let issues = d.validate();
        assert_eq!(
            issues,
            vec![IntegrityIssue::DuplicateRef {
                bom_ref: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_dangling_source_and_target() {
        let mut d = doc();
        d.dependencies
            .graft("ghost", vec![Dependency::new("b"), Dependency::new("phantom")]);
        let issues = d.validate();
        assert_eq!(
            issues,
            vec![
                IntegrityIssue::DanglingRef {
                    from: None,
                    bom_ref: "ghost".to_string()
                },
                IntegrityIssue::DanglingRef {
                    from: Some("ghost".to_string()),
                    bom_ref: "phantom".to_string()
                },
            ]
        );
    }
}
