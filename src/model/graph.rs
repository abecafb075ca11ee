//! Dependency graph as a forest of nested edges.
//!
//! Mirrors the `<dependencies>` element of a component/graph document: a list
//! of top-level edges, each naming a source ref and an ordered list of child
//! edges that may carry children of their own.

use crate::error::StructuralError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A single edge: `bom_ref` depends on every entry of `depends_on`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub bom_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Dependency>,
}

impl Dependency {
    /// An edge with no children.
    #[must_use]
    pub fn new(bom_ref: impl Into<String>) -> Self {
        Self {
            bom_ref: bom_ref.into(),
            depends_on: Vec::new(),
        }
    }

    /// An edge with the given children.
    #[must_use]
    pub fn with_children(bom_ref: impl Into<String>, depends_on: Vec<Self>) -> Self {
        Self {
            bom_ref: bom_ref.into(),
            depends_on,
        }
    }

    /// Refs of the direct children.
    pub fn child_refs(&self) -> impl Iterator<Item = &str> {
        self.depends_on.iter().map(|d| d.bom_ref.as_str())
    }
}

/// Ordered collection of top-level dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: Vec<Dependency>,
}

impl DependencyGraph {
    #[must_use]
    pub const fn new() -> Self {
        Self { edges: Vec::new() }
    }

    #[must_use]
    pub const fn from_edges(edges: Vec<Dependency>) -> Self {
        Self { edges }
    }

    /// Top-level edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Dependency] {
        &self.edges
    }

    #[must_use]
    pub fn into_edges(self) -> Vec<Dependency> {
        self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.edges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// First top-level edge whose source is `bom_ref`.
    #[must_use]
    pub fn find(&self, bom_ref: &str) -> Option<&Dependency> {
        self.edges.iter().find(|e| e.bom_ref == bom_ref)
    }

    pub fn find_mut(&mut self, bom_ref: &str) -> Option<&mut Dependency> {
        self.edges.iter_mut().find(|e| e.bom_ref == bom_ref)
    }

    /// Append `child` to the top-level edge for `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::MissingEdge`] when no top-level edge has
    /// `parent` as its source. The graph is left unchanged in that case.
    pub fn add_child(&mut self, parent: &str, child: Dependency) -> Result<(), StructuralError> {
        match self.find_mut(parent) {
            Some(edge) => {
                edge.depends_on.push(child);
                Ok(())
            }
            None => Err(StructuralError::MissingEdge {
                bom_ref: parent.to_string(),
            }),
        }
    }

    /// Top-level edge for `bom_ref`, appending an empty one if absent.
    pub fn ensure_edge(&mut self, bom_ref: &str) -> &mut Dependency {
        let idx = match self.edges.iter().position(|e| e.bom_ref == bom_ref) {
            Some(idx) => idx,
            None => {
                self.edges.push(Dependency::new(bom_ref));
                self.edges.len() - 1
            }
        };
        &mut self.edges[idx]
    }

    /// Append a new top-level edge, keeping `children` exactly as given.
    pub fn graft(&mut self, bom_ref: impl Into<String>, children: Vec<Dependency>) {
        self.edges.push(Dependency::with_children(bom_ref, children));
    }

    /// Push a prepared top-level edge.
    pub fn push(&mut self, edge: Dependency) {
        self.edges.push(edge);
    }

    /// Rewrite every source and child ref found in `aliases`.
    pub fn rename_refs(&mut self, aliases: &HashMap<String, String>) {
        fn rename(dep: &mut Dependency, aliases: &HashMap<String, String>) {
            if let Some(target) = aliases.get(&dep.bom_ref) {
                dep.bom_ref.clone_from(target);
            }
            for child in &mut dep.depends_on {
                rename(child, aliases);
            }
        }
        if aliases.is_empty() {
            return;
        }
        for edge in &mut self.edges {
            rename(edge, aliases);
        }
    }

    /// Merge `other` into `self`.
    ///
    /// Edges are keyed by source ref. Children of edges sharing a source are
    /// concatenated with duplicate child refs dropped. Sources and children
    /// both keep first-seen order.
    pub fn union(&mut self, other: Self) {
        let mut merged: IndexMap<String, IndexMap<String, Dependency>> = IndexMap::new();

        for edge in std::mem::take(&mut self.edges).into_iter().chain(other.edges) {
            let children = merged.entry(edge.bom_ref).or_default();
            for child in edge.depends_on {
                children.entry(child.bom_ref.clone()).or_insert(child);
            }
        }

        self.edges = merged
            .into_iter()
            .map(|(bom_ref, children)| {
                Dependency::with_children(bom_ref, children.into_values().collect())
            })
            .collect();
    }

    /// Sources that never appear as a child anywhere in the graph.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        let mut children: IndexSet<&str> = IndexSet::new();
        for edge in &self.edges {
            walk(&edge.depends_on, &mut |d| {
                children.insert(d.bom_ref.as_str());
            });
        }

        let mut roots: IndexSet<&str> = IndexSet::new();
        for edge in &self.edges {
            if !children.contains(edge.bom_ref.as_str()) {
                roots.insert(edge.bom_ref.as_str());
            }
        }
        roots.into_iter().collect()
    }

    /// Every ref mentioned as a source or a (nested) child.
    #[must_use]
    pub fn refs(&self) -> Vec<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for edge in &self.edges {
            seen.insert(edge.bom_ref.as_str());
            walk(&edge.depends_on, &mut |d| {
                seen.insert(d.bom_ref.as_str());
            });
        }
        seen.into_iter().collect()
    }

    /// Every ref reachable from `start`.
    ///
    /// Follows nested children as well as other top-level edges whose source
    /// is a reached ref. `start` itself is only included when a cycle leads
    /// back to it.
    #[must_use]
    pub fn reachable_from(&self, start: &str) -> Vec<String> {
        let mut reached: IndexSet<String> = IndexSet::new();
        let mut expanded: IndexSet<&str> = IndexSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if !expanded.insert(current) {
                continue;
            }
            for edge in self.edges.iter().filter(|e| e.bom_ref == current) {
                walk(&edge.depends_on, &mut |d| {
                    reached.insert(d.bom_ref.clone());
                    queue.push_back(d.bom_ref.as_str());
                });
            }
        }
        reached.into_iter().collect()
    }

    /// Visit every nested child with its parent ref.
    pub(crate) fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a str, &'a Dependency)) {
        for edge in &self.edges {
            visit_children(edge, &mut f);
        }
    }
}

fn visit_children<'a>(parent: &'a Dependency, f: &mut impl FnMut(&'a str, &'a Dependency)) {
    for child in &parent.depends_on {
        f(parent.bom_ref.as_str(), child);
        visit_children(child, f);
    }
}

/// Depth-first walk over a nested child list.
fn walk<'a>(deps: &'a [Dependency], f: &mut impl FnMut(&'a Dependency)) {
    for d in deps {
        f(d);
        walk(&d.depends_on, f);
    }
}

impl<'a> IntoIterator for &'a DependencyGraph {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

impl FromIterator<Dependency> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = Dependency>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(r: &str) -> Dependency {
        Dependency::new(r)
    }

    fn sample() -> DependencyGraph {
        DependencyGraph::from_edges(vec![
            Dependency::with_children("app", vec![leaf("lib-a"), leaf("lib-b")]),
            Dependency::with_children("lib-a", vec![leaf("lib-c")]),
            Dependency::new("lib-b"),
        ])
    }

    #[test]
    fn test_add_child_to_existing_edge() {
        let mut graph = sample();
        graph.add_child("lib-b", leaf("lib-d")).unwrap();
        let edge = graph.find("lib-b").unwrap();
        assert_eq!(edge.child_refs().collect::<Vec<_>>(), vec!["lib-d"]);
    }

    #[test]
    fn test_add_child_without_edge_is_typed_error() {
        let mut graph = sample();
        let before = graph.clone();
        let err = graph.add_child("missing", leaf("x")).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingEdge {
                bom_ref: "missing".to_string()
            }
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn test_ensure_edge_creates_once() {
        let mut graph = DependencyGraph::new();
        graph.ensure_edge("root").depends_on.push(leaf("a"));
        graph.ensure_edge("root").depends_on.push(leaf("b"));
        assert_eq!(graph.len(), 1);
        assert_eq!(
            graph.find("root").unwrap().child_refs().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_roots() {
        assert_eq!(sample().roots(), vec!["app"]);

        let forest = DependencyGraph::from_edges(vec![
            Dependency::with_children("x", vec![leaf("y")]),
            Dependency::new("z"),
        ]);
        assert_eq!(forest.roots(), vec!["x", "z"]);
    }

    #[test]
    fn test_refs_first_seen_order() {
        assert_eq!(sample().refs(), vec!["app", "lib-a", "lib-b", "lib-c"]);
    }

    #[test]
    fn test_reachable_follows_top_level_edges() {
        let graph = sample();
        let reached = graph.reachable_from("app");
        assert_eq!(reached, vec!["lib-a", "lib-b", "lib-c"]);
        assert!(graph.reachable_from("lib-c").is_empty());
    }

    #[test]
    fn test_reachable_handles_cycles() {
        let graph = DependencyGraph::from_edges(vec![
            Dependency::with_children("a", vec![leaf("b")]),
            Dependency::with_children("b", vec![leaf("a")]),
        ]);
        let reached = graph.reachable_from("a");
        assert_eq!(reached, vec!["b", "a"]);
    }

    #[test]
    fn test_reachable_through_nested_children() {
        let graph = DependencyGraph::from_edges(vec![Dependency::with_children(
            "root",
            vec![Dependency::with_children("mid", vec![leaf("deep")])],
        )]);
        assert_eq!(graph.reachable_from("root"), vec!["mid", "deep"]);
    }

    #[test]
    fn test_union_merges_by_source() {
        let mut left = DependencyGraph::from_edges(vec![Dependency::with_children(
            "app",
            vec![leaf("a"), leaf("b")],
        )]);
        let right = DependencyGraph::from_edges(vec![
            Dependency::with_children("app", vec![leaf("b"), leaf("c")]),
            Dependency::with_children("c", vec![leaf("d")]),
        ]);
        left.union(right);

        assert_eq!(left.len(), 2);
        assert_eq!(
            left.find("app").unwrap().child_refs().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            left.find("c").unwrap().child_refs().collect::<Vec<_>>(),
            vec!["d"]
        );
    }

    #[test]
    fn test_rename_refs_rewrites_sources_and_children() {
        let mut graph = sample();
        let aliases = HashMap::from([("lib-a".to_string(), "lib-x".to_string())]);
        graph.rename_refs(&aliases);
        assert!(graph.find("lib-a").is_none());
        assert_eq!(
            graph.find("app").unwrap().child_refs().collect::<Vec<_>>(),
            vec!["lib-x", "lib-b"]
        );
        assert!(graph.find("lib-x").is_some());
    }

    #[test]
    fn test_graft_keeps_children_verbatim() {
        let mut graph = DependencyGraph::new();
        let children = vec![Dependency::with_children("x", vec![leaf("y")])];
        graph.graft("leaf-root", children.clone());
        assert_eq!(graph.find("leaf-root").unwrap().depends_on, children);
    }

    #[test]
    fn test_for_each_child_reports_parent() {
        let graph = sample();
        let mut pairs = Vec::new();
        graph.for_each_child(|parent, child| pairs.push((parent, child.bom_ref.as_str())));
        assert_eq!(
            pairs,
            vec![("app", "lib-a"), ("app", "lib-b"), ("lib-a", "lib-c")]
        );
    }
}
