#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compose::parsers::{SbomParser, SbomWriter, SpdxTagValueCodec};

/// Fuzz the SPDX tag-value codec.
///
/// Prefixes input with the document header to exercise package and
/// relationship parsing, and re-encodes whatever decodes.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let codec = SpdxTagValueCodec::new();

        let _ = codec.parse_str(s);

        if s.len() < 10_000 {
            let wrapped = format!(
                "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\nDocumentName: fuzz\nDocumentNamespace: https://example.com/fuzz\n{s}",
            );
            if let Ok(doc) = codec.parse_str(&wrapped) {
                let _ = codec.write_string(&doc);
            }
        }
    }
});
