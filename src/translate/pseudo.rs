//! Pseudo-packages for artifacts that are not packages themselves.
//!
//! Container images and bare CPEs get synthesized packages so they can take
//! part in the same graph as scanned packages. Their ids encode provenance:
//! `image-<ref>` and `cpe-<cpe>`.

use crate::error::TranslateErrorKind;
use crate::model::{ExternalRef, SpdxPackage};

/// Id prefix of image pseudo-packages.
pub const IMAGE_ID_PREFIX: &str = "image-";

/// Id prefix of CPE pseudo-packages.
pub const CPE_ID_PREFIX: &str = "cpe-";

/// Element id of the pseudo-package for `image_ref`.
#[must_use]
pub fn image_package_id(image_ref: &str) -> String {
    format!("{IMAGE_ID_PREFIX}{image_ref}")
}

/// Element id of the pseudo-package for `cpe`.
#[must_use]
pub fn cpe_package_id(cpe: &str) -> String {
    format!("{CPE_ID_PREFIX}{cpe}")
}

/// Synthesize the package for a `name:tag` image reference.
///
/// The name is the text before the first `:` and the version everything
/// after it. Descriptive fields carry `NOASSERTION`.
///
/// # Errors
///
/// [`TranslateErrorKind::MalformedImageRef`] when the reference has no `:`.
pub fn image_to_package(image_ref: &str) -> Result<SpdxPackage, TranslateErrorKind> {
    let (name, version) =
        image_ref
            .split_once(':')
            .ok_or_else(|| TranslateErrorKind::MalformedImageRef {
                image: image_ref.to_string(),
            })?;
    Ok(SpdxPackage::new(image_package_id(image_ref), name).with_version(version))
}

/// Synthesize the package for a bare CPE string.
///
/// The package is named after the fourth `:`-separated field and carries the
/// CPE verbatim as its only external reference.
///
/// # Errors
///
/// [`TranslateErrorKind::MalformedCpe`] when the CPE has fewer than four fields.
pub fn cpe_to_package(cpe: &str) -> Result<SpdxPackage, TranslateErrorKind> {
    let product = cpe
        .split(':')
        .nth(3)
        .ok_or_else(|| TranslateErrorKind::MalformedCpe {
            cpe: cpe.to_string(),
        })?;
    Ok(SpdxPackage::new(cpe_package_id(cpe), product).with_external_ref(ExternalRef::cpe23(cpe)))
}
