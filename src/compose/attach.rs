//! Attach one document beneath another's root subject.

use crate::error::StructuralError;
use crate::model::{Dependency, Document};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do when the root document has no edge for its own root component.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingEdgePolicy {
    /// Fail with [`StructuralError::MissingRootEdge`]
    #[default]
    Fail,
    /// Append an empty edge for the root ref, then link the leaf
    Create,
    /// Leave the root unlinked; the leaf subgraph is still grafted
    Skip,
}

/// Options for [`attach`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachOptions {
    pub on_missing_edge: MissingEdgePolicy,
}

/// Graft `leaf` beneath the root component of `root`.
///
/// The leaf's root component and components are appended verbatim, without
/// deduplication. The root's own edge gains the leaf root ref as a child and
/// a new top-level edge carries the leaf's dependency graph unmodified.
///
/// # Errors
///
/// - [`StructuralError::MissingRootComponent`] if either document has no root
///   component
/// - [`StructuralError::MissingRootEdge`] if the root has no edge for its
///   root component and the policy is [`MissingEdgePolicy::Fail`]
///
/// `root` is consumed either way; on error nothing is returned.
pub fn attach(
    mut root: Document,
    leaf: Document,
    options: &AttachOptions,
) -> Result<Document, StructuralError> {
    let root_ref = root
        .root_ref()
        .map(str::to_string)
        .ok_or_else(|| StructuralError::MissingRootComponent {
            role: "root".to_string(),
        })?;
    let Some(leaf_root) = leaf.root_component else {
        return Err(StructuralError::MissingRootComponent {
            role: "leaf".to_string(),
        });
    };
    let leaf_ref = leaf_root.bom_ref.clone();

    let link_root = if root.dependencies.find(&root_ref).is_some() {
        true
    } else {
        match options.on_missing_edge {
            MissingEdgePolicy::Fail => {
                return Err(StructuralError::MissingRootEdge { bom_ref: root_ref });
            }
            MissingEdgePolicy::Create => {
                tracing::debug!("Creating missing dependency edge for '{}'", root_ref);
                root.dependencies.ensure_edge(&root_ref);
                true
            }
            MissingEdgePolicy::Skip => {
                tracing::warn!(
                    "No dependency edge for root '{}'; '{}' will not be linked from it",
                    root_ref,
                    leaf_ref
                );
                false
            }
        }
    };

    let appended = 1 + leaf.components.len();
    root.components.push(leaf_root);
    root.components.extend(leaf.components);

    if link_root {
        root.dependencies
            .add_child(&root_ref, Dependency::new(leaf_ref.clone()))?;
    }
    root.dependencies
        .graft(leaf_ref.clone(), leaf.dependencies.into_edges());

    tracing::info!(
        "Attached '{}' beneath '{}' ({} components appended)",
        leaf_ref,
        root_ref,
        appended
    );
    Ok(root)
}
