#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compose::chart::{parse_cpes, parse_images};
use sbom_compose::translate::{cpe_to_package, image_to_package};

/// Fuzz the annotation list parsers and pseudo-package synthesis.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for image in parse_images(s) {
            let _ = image_to_package(&image);
        }
        for cpe in parse_cpes(s) {
            let _ = cpe_to_package(&cpe);
        }
    }
});
