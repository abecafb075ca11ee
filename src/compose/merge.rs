//! N-way merge of component/graph documents.

use super::identity::{IdentityResolver, StrictIdentity};
use super::registry::{Admission, ComponentRegistry};
use crate::model::{
    Component, ComponentType, Creator, Dependency, DependencyGraph, Document, DocumentMetadata,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Options for [`merge`].
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Union the input dependency graphs instead of dropping them.
    pub union_dependencies: bool,
    /// Creation time recorded in the merged document.
    pub timestamp: Option<DateTime<Utc>>,
    /// Creators recorded in the merged document.
    pub creators: Vec<Creator>,
}

/// Merge `documents` into one document rooted at `root_name`.
///
/// Components are deduplicated with [`StrictIdentity`] and kept in
/// first-seen order. Dependency graphs are dropped unless
/// [`MergeOptions::union_dependencies`] is set.
#[must_use]
pub fn merge(documents: Vec<Document>, root_name: &str, options: &MergeOptions) -> Document {
    merge_with(documents, root_name, options, StrictIdentity)
}

/// [`merge`] with a custom identity rule.
///
/// With `union_dependencies`, each input's root component is offered to the
/// registry as well, edges naming a skipped duplicate are redirected to the
/// kept component, and the new root gains an edge to every input root.
pub fn merge_with<R: IdentityResolver>(
    documents: Vec<Document>,
    root_name: &str,
    options: &MergeOptions,
    resolver: R,
) -> Document {
    let input_count = documents.len();
    let offered: usize = documents.iter().map(Document::component_count).sum();

    let mut registry = ComponentRegistry::with_resolver(resolver);
    let mut graph = DependencyGraph::new();
    let mut input_roots: Vec<String> = Vec::new();

    for doc in documents {
        if doc.components.is_empty() {
            tracing::debug!("Input document contributes no components");
        }
        if !options.union_dependencies {
            registry.extend(doc.components);
            continue;
        }

        let mut aliases: HashMap<String, String> = HashMap::new();
        let root_ref = doc.root_ref().map(str::to_string);
        for component in doc.root_component.into_iter().chain(doc.components) {
            let bom_ref = component.bom_ref.clone();
            if let Admission::Duplicate { kept } = registry.offer(component) {
                if kept != bom_ref {
                    aliases.insert(bom_ref, kept);
                }
            }
        }

        if let Some(root_ref) = root_ref {
            let resolved = aliases.get(&root_ref).cloned().unwrap_or(root_ref);
            if resolved != root_name && !input_roots.contains(&resolved) {
                input_roots.push(resolved);
            }
        }

        let mut dependencies = doc.dependencies;
        dependencies.rename_refs(&aliases);
        graph.union(dependencies);
    }

    let root_component =
        Component::new(root_name, root_name).with_type(ComponentType::Application);

    if options.union_dependencies {
        let mut root_graph = DependencyGraph::from_edges(vec![Dependency::with_children(
            root_name,
            input_roots.iter().map(Dependency::new).collect(),
        )]);
        root_graph.union(graph);
        graph = root_graph;
    }

    tracing::info!(
        "Merged {} documents: {} of {} components kept, {} dependency edges",
        input_count,
        registry.len(),
        offered,
        graph.len()
    );

    Document {
        metadata: DocumentMetadata {
            timestamp: options.timestamp,
            name: Some(root_name.to_string()),
            creators: options.creators.clone(),
            bom_version: 1,
            ..DocumentMetadata::default()
        },
        root_component: Some(root_component),
        components: registry.into_components(),
        dependencies: graph,
    }
}
