//! Deduplicating component accumulator.

use super::identity::{IdentityResolver, StrictIdentity};
use crate::model::Component;

/// Outcome of offering a component to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The component was new and has been appended.
    Accepted,
    /// The component shares identity with an already accepted one.
    Duplicate {
        /// Ref of the component that was kept
        kept: String,
    },
}

/// Accumulates a deduplicated component list across documents.
///
/// Components are kept in first-seen order. A component is skipped when
/// the resolver finds an already accepted component with the same identity.
#[derive(Debug, Default)]
pub struct ComponentRegistry<R = StrictIdentity> {
    resolver: R,
    accepted: Vec<Component>,
    offered: usize,
}

impl ComponentRegistry<StrictIdentity> {
    /// Registry using purl/CPE identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: IdentityResolver> ComponentRegistry<R> {
    /// Registry using a custom identity rule.
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            accepted: Vec::new(),
            offered: 0,
        }
    }

    /// Offer one component.
    pub fn offer(&mut self, component: Component) -> Admission {
        self.offered += 1;
        if let Some(kept) = self.resolver.find_match(&component, &self.accepted) {
            tracing::debug!(
                "Skipping '{}': same {} as '{}'",
                component.display_name(),
                self.resolver.name(),
                kept.bom_ref
            );
            return Admission::Duplicate {
                kept: kept.bom_ref.clone(),
            };
        }
        self.accepted.push(component);
        Admission::Accepted
    }

    /// Offer every component, returning how many were accepted.
    pub fn extend(&mut self, components: impl IntoIterator<Item = Component>) -> usize {
        components
            .into_iter()
            .map(|c| self.offer(c))
            .filter(|a| *a == Admission::Accepted)
            .count()
    }

    /// Accepted components so far.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.accepted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Number of components skipped as duplicates.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.offered - self.accepted.len()
    }

    #[must_use]
    pub fn into_components(self) -> Vec<Component> {
        self.accepted
    }
}
