//! Composition engine.
//!
//! Three operations build a new document out of existing ones:
//!
//! - [`merge`]: N-way union of components, deduplicated by identity
//! - [`attach`]: graft one document beneath another's root subject
//! - [`ChartComposer::compose`]: a chart's images, their scans and its CPEs
//!
//! Identity is decided by an [`IdentityResolver`]; the default
//! [`StrictIdentity`] only ever compares purls and CPEs.

mod attach;
mod chart;
mod identity;
mod merge;
mod registry;

pub use attach::{attach, AttachOptions, MissingEdgePolicy};
pub use chart::{ChartBom, ChartComposer, ChartOptions, DEFAULT_NAMESPACE_BASE, DEFAULT_TOOL_NAME};
pub use identity::{same_identity, IdentityMatch, IdentityResolver, StrictIdentity};
pub use merge::{merge, merge_with, MergeOptions};
pub use registry::{Admission, ComponentRegistry};
