//! Format translator.
//!
//! Bidirectional field mapping between the package-oriented shape
//! ([`SpdxDocument`](crate::model::SpdxDocument)) and the component/graph
//! shape ([`Document`](crate::model::Document)), plus synthesis of
//! pseudo-packages for container images and bare CPEs.
//!
//! The mapping is lossy in places:
//!
//! - a package keeps only its last CPE and last purl reference
//! - `CONTAINS` relationships come back as `DEPENDS_ON`
//! - element ids are sanitized on the way to the package shape

mod pseudo;
mod to_component;
mod to_package;

pub use pseudo::{
    cpe_package_id, cpe_to_package, image_package_id, image_to_package, CPE_ID_PREFIX,
    IMAGE_ID_PREFIX,
};
pub use to_component::{package_to_component, to_target_document};
pub use to_package::to_package_document;
