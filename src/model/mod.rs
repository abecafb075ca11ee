//! In-memory BOM representations.
//!
//! Two shapes are modelled:
//!
//! - [`Document`]: components plus a nested dependency graph. Every
//!   composition operation works on this shape.
//! - [`SpdxDocument`]: packages plus flat relationships, as produced by image
//!   scanners and the tag-value codec.
//!
//! [`crate::translate`] maps between the two.

mod component;
mod document;
mod graph;
mod metadata;
mod spdx;

pub use component::*;
pub use document::*;
pub use graph::*;
pub use metadata::*;
pub use spdx::*;
