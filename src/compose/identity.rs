//! Identity resolution: do two components denote the same artifact?

use crate::model::Component;

/// Which identifier two components agreed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMatch {
    Purl,
    Cpe,
}

/// Strategy for deciding whether two components denote the same artifact.
///
/// The registry calls [`IdentityResolver::matched_on`] for every candidate
/// pair, so implementations must be cheap and side-effect free.
pub trait IdentityResolver: Send + Sync {
    /// The identifier on which `a` and `b` agree, if any.
    fn matched_on(&self, a: &Component, b: &Component) -> Option<IdentityMatch>;

    /// True when `a` and `b` denote the same artifact.
    fn same_identity(&self, a: &Component, b: &Component) -> bool {
        self.matched_on(a, b).is_some()
    }

    /// First candidate sharing identity with `target`.
    fn find_match<'a>(&self, target: &Component, candidates: &'a [Component]) -> Option<&'a Component> {
        candidates.iter().find(|c| self.same_identity(target, c))
    }

    /// Get the name of this resolver for logging/debugging.
    fn name(&self) -> &'static str {
        "IdentityResolver"
    }
}

/// Purl or CPE equality, nothing else.
///
/// Two components are the same when both carry the same non-empty purl, or
/// both carry the same non-empty CPE. Name and version never count, so
/// components without either identifier are never merged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictIdentity;

impl IdentityResolver for StrictIdentity {
    fn matched_on(&self, a: &Component, b: &Component) -> Option<IdentityMatch> {
        match (a.purl(), b.purl()) {
            (Some(pa), Some(pb)) if pa == pb => return Some(IdentityMatch::Purl),
            _ => {}
        }
        match (a.cpe(), b.cpe()) {
            (Some(ca), Some(cb)) if ca == cb => Some(IdentityMatch::Cpe),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// [`StrictIdentity`] as a free function.
#[must_use]
pub fn same_identity(a: &Component, b: &Component) -> bool {
    StrictIdentity.same_identity(a, b)
}
