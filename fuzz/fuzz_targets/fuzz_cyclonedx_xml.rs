#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_compose::parsers::{CycloneDxXmlCodec, SbomParser, SbomWriter};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX XML codec.
///
/// Wraps input in a bom envelope to reach component deserialization, and
/// re-encodes whatever decodes.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let codec = CycloneDxXmlCodec::new();

        if let Ok(doc) = codec.parse_str(s) {
            let _ = codec.write_string(&doc);
        }

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" version="1">
  <components>{s}</components>
</bom>"#,
            );
            let _ = codec.parse_str(&wrapped);
        }
    }
});
