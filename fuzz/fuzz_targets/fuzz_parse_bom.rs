#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compose::parsers::{parse_bom_str, ParsedBom};
use sbom_compose::translate::{to_package_document, to_target_document};

/// Fuzz detection, decoding and translation together.
///
/// Anything that decodes is pushed through translation to the other shape.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        match parse_bom_str(s, None) {
            Ok(ParsedBom::Spdx(doc)) => {
                let graph = to_target_document(&doc);
                let _ = graph.validate();
            }
            Ok(ParsedBom::CycloneDx(doc)) => {
                let _ = to_package_document(&doc, "https://example.com/fuzz");
                let _ = doc.validate();
            }
            Err(_) => {}
        }
    }
});
