//! SPDX tag-value codec.
//!
//! Decodes and encodes the package-oriented tag-value form (SPDX 2.2/2.3).
//! Only document, creation, package and relationship tags are interpreted;
//! file and snippet sections are skipped.

use crate::model::{
    Checksum, CreationInfo, ExternalRef, Relationship, RelationshipType, SpdxDocument,
    SpdxPackage, SPDX_REF_PREFIX,
};
use crate::parsers::traits::{
    FormatConfidence, FormatDetection, ParseError, SbomParser, SbomWriter, WriteError,
};
use std::fmt::Write as _;

const TEXT_OPEN: &str = "<text>";
const TEXT_CLOSE: &str = "</text>";

/// Which part of the document the current tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Document,
    Package,
    /// File, snippet or license sections
    Other,
}

/// Codec for SPDX tag-value documents
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxTagValueCodec;

impl SpdxTagValueCodec {
    /// Create a new codec
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_tag_value_format(&self, content: &str) -> Result<SpdxDocument, ParseError> {
        let mut doc = SpdxDocument {
            spdx_version: String::new(),
            data_license: String::new(),
            spdx_id: String::new(),
            ..SpdxDocument::default()
        };
        let mut creation_info = CreationInfo::default();
        let mut current_package: Option<SpdxPackage> = None;
        let mut section = Section::Document;

        let mut lines = content.lines().enumerate();
        while let Some((idx, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let mut value = value.trim().to_string();

            if let Some(rest) = value.strip_prefix(TEXT_OPEN) {
                value = read_text_block(rest, &mut lines).ok_or_else(|| {
                    ParseError::InvalidStructure(format!(
                        "unterminated {TEXT_OPEN} value for {key} starting at line {}",
                        idx + 1
                    ))
                })?;
            }

            match key {
                "SPDXVersion" => doc.spdx_version = value,
                "DataLicense" => doc.data_license = value,
                "DocumentName" => doc.name = value,
                "DocumentNamespace" => doc.namespace = value,
                "Creator" => match value.split_once(':') {
                    Some(("Tool", name)) => creation_info.tools.push(name.trim().to_string()),
                    Some(("Organization", name)) => {
                        creation_info.organizations.push(name.trim().to_string());
                    }
                    Some(("Person", name)) => creation_info.persons.push(name.trim().to_string()),
                    _ => tracing::debug!("Ignoring unrecognised creator '{value}'"),
                },
                "Created" => creation_info.created = Some(value),
                "CreatorComment" => creation_info.comment = Some(value),
                "PackageName" => {
                    if let Some(pkg) = current_package.take() {
                        finish_package(&mut doc, pkg)?;
                    }
                    current_package = Some(SpdxPackage::new(String::new(), value));
                    section = Section::Package;
                }
                "FileName" | "SnippetSPDXID" | "LicenseID" => {
                    if let Some(pkg) = current_package.take() {
                        finish_package(&mut doc, pkg)?;
                    }
                    section = Section::Other;
                }
                "SPDXID" => match section {
                    Section::Document => doc.spdx_id = strip_ref_prefix(&value).to_string(),
                    Section::Package => {
                        if let Some(pkg) = current_package.as_mut() {
                            pkg.spdx_id = strip_ref_prefix(&value).to_string();
                        }
                    }
                    Section::Other => {}
                },
                "Relationship" => match parse_relationship_line(&value) {
                    Some(rel) => doc.relationships.push(rel),
                    None => tracing::debug!("Skipping malformed relationship '{value}'"),
                },
                key if is_package_tag(key) => {
                    if section == Section::Other {
                        continue;
                    }
                    let pkg = current_package.as_mut().ok_or_else(|| {
                        ParseError::InvalidStructure(format!(
                            "{key} at line {} appears before any PackageName",
                            idx + 1
                        ))
                    })?;
                    apply_package_tag(pkg, key, value);
                }
                _ => {}
            }
        }

        if let Some(pkg) = current_package {
            finish_package(&mut doc, pkg)?;
        }

        if doc.spdx_version.is_empty() {
            return Err(ParseError::MissingField("SPDXVersion".to_string()));
        }
        doc.creation_info = creation_info;
        Ok(doc)
    }

    /// Extract SPDX version from tag-value content
    fn extract_tag_value_version(content: &str) -> Option<String> {
        for line in content.lines() {
            if let Some(rest) = line.trim_start().strip_prefix("SPDXVersion:") {
                let version_str = rest.trim();
                return Some(
                    version_str
                        .strip_prefix("SPDX-")
                        .unwrap_or(version_str)
                        .to_string(),
                );
            }
        }
        None
    }
}

/// Collect a `<text>` value. `first` is what followed the opening tag.
fn read_text_block<'a>(
    first: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Option<String> {
    if let Some(end) = first.find(TEXT_CLOSE) {
        return Some(first[..end].to_string());
    }
    let mut text = first.to_string();
    for (_, raw) in lines {
        text.push('\n');
        if let Some(end) = raw.find(TEXT_CLOSE) {
            text.push_str(&raw[..end]);
            return Some(text.trim().to_string());
        }
        text.push_str(raw);
    }
    None
}

fn is_package_tag(key: &str) -> bool {
    (key.starts_with("Package") && key != "PackageName")
        || matches!(key, "FilesAnalyzed" | "ExternalRef" | "ExternalRefComment")
}

fn apply_package_tag(pkg: &mut SpdxPackage, key: &str, value: String) {
    match key {
        "PackageVersion" => pkg.version = Some(value),
        "PackageFileName" => pkg.file_name = Some(value),
        "PackageDownloadLocation" => pkg.download_location = value,
        "FilesAnalyzed" => pkg.files_analyzed = value.eq_ignore_ascii_case("true"),
        "PackageLicenseConcluded" => pkg.license_concluded = value,
        "PackageLicenseDeclared" => pkg.license_declared = value,
        "PackageCopyrightText" => pkg.copyright_text = value,
        "PackageSupplier" => pkg.supplier = Some(value),
        "PackageDescription" => pkg.description = Some(value),
        "PackageComment" => pkg.comment = Some(value),
        "PackageChecksum" => {
            if let Some(checksum) = parse_checksum_line(&value) {
                pkg.checksums.push(checksum);
            }
        }
        "ExternalRef" => {
            if let Some(ext_ref) = parse_external_ref_line(&value) {
                pkg.external_refs.push(ext_ref);
            }
        }
        _ => {}
    }
}

fn finish_package(doc: &mut SpdxDocument, pkg: SpdxPackage) -> Result<(), ParseError> {
    if pkg.spdx_id.is_empty() {
        return Err(ParseError::MissingField(format!(
            "SPDXID for package '{}'",
            pkg.name
        )));
    }
    if let Some(previous) = doc.add_package(pkg) {
        tracing::warn!(
            "Package id '{}' appears more than once, keeping the last one",
            previous.spdx_id
        );
    }
    Ok(())
}

fn strip_ref_prefix(id: &str) -> &str {
    id.strip_prefix(SPDX_REF_PREFIX).unwrap_or(id)
}

fn with_ref_prefix(id: &str) -> String {
    if id.starts_with("DocumentRef-") || matches!(id, "NOASSERTION" | "NONE") {
        id.to_string()
    } else {
        format!("{SPDX_REF_PREFIX}{id}")
    }
}

/// Parse a relationship line from tag-value format
fn parse_relationship_line(value: &str) -> Option<Relationship> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() >= 3 {
        Some(Relationship {
            element: strip_ref_prefix(parts[0]).to_string(),
            relationship_type: RelationshipType::parse(parts[1]),
            related_element: strip_ref_prefix(parts[2]).to_string(),
        })
    } else {
        None
    }
}

/// Parse an external ref line from tag-value format
fn parse_external_ref_line(value: &str) -> Option<ExternalRef> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() >= 3 {
        Some(ExternalRef {
            category: parts[0].to_string(),
            ref_type: parts[1].to_string(),
            locator: parts[2].to_string(),
        })
    } else {
        None
    }
}

/// Parse a checksum line from tag-value format
fn parse_checksum_line(value: &str) -> Option<Checksum> {
    let (algorithm, checksum) = value.split_once(':')?;
    Some(Checksum {
        algorithm: algorithm.trim().to_string(),
        value: checksum.trim().to_string(),
    })
}

fn text_value(value: &str) -> String {
    if value.contains('\n') {
        format!("{TEXT_OPEN}{value}{TEXT_CLOSE}")
    } else {
        value.to_string()
    }
}

impl SbomParser<SpdxDocument> for SpdxTagValueCodec {
    fn parse_str(&self, content: &str) -> Result<SpdxDocument, ParseError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('<') {
            return Err(ParseError::UnknownFormat(
                "Expected SPDX tag-value content".to_string(),
            ));
        }
        self.parse_tag_value_format(content)
    }

    fn format_name(&self) -> &str {
        "SPDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim();

        if trimmed.starts_with("SPDXVersion:") || trimmed.contains("\nSPDXVersion:") {
            let version = Self::extract_tag_value_version(content);
            let has_spdx_id = content.contains("SPDXID:");
            let has_data_license = content.contains("DataLicense:");

            let confidence = if has_spdx_id && has_data_license {
                FormatConfidence::CERTAIN
            } else {
                FormatConfidence::MEDIUM
            };
            let mut detection = FormatDetection::with_confidence(confidence);
            if let Some(v) = version {
                detection = detection.version(&v);
            }
            return detection;
        }

        FormatDetection::no_match()
    }
}

impl SbomWriter<SpdxDocument> for SpdxTagValueCodec {
    fn write_string(&self, doc: &SpdxDocument) -> Result<String, WriteError> {
        let mut out = String::new();
        write_document(&mut out, doc).map_err(|e| WriteError::IoError(e.to_string()))?;
        Ok(out)
    }
}

fn write_document(out: &mut String, doc: &SpdxDocument) -> std::fmt::Result {
    writeln!(out, "SPDXVersion: {}", doc.spdx_version)?;
    writeln!(out, "DataLicense: {}", doc.data_license)?;
    writeln!(out, "SPDXID: {}", with_ref_prefix(&doc.spdx_id))?;
    writeln!(out, "DocumentName: {}", doc.name)?;
    writeln!(out, "DocumentNamespace: {}", doc.namespace)?;

    let info = &doc.creation_info;
    for tool in &info.tools {
        writeln!(out, "Creator: Tool: {tool}")?;
    }
    for org in &info.organizations {
        writeln!(out, "Creator: Organization: {org}")?;
    }
    for person in &info.persons {
        writeln!(out, "Creator: Person: {person}")?;
    }
    if let Some(created) = &info.created {
        writeln!(out, "Created: {created}")?;
    }
    if let Some(comment) = &info.comment {
        writeln!(out, "CreatorComment: {TEXT_OPEN}{comment}{TEXT_CLOSE}")?;
    }

    for pkg in doc.packages.values() {
        writeln!(out)?;
        writeln!(out, "##### Package: {}", pkg.name)?;
        writeln!(out)?;
        write_package(out, pkg)?;
    }

    if !doc.relationships.is_empty() {
        writeln!(out)?;
        writeln!(out, "##### Relationships")?;
        writeln!(out)?;
        for rel in &doc.relationships {
            writeln!(
                out,
                "Relationship: {} {} {}",
                with_ref_prefix(&rel.element),
                rel.relationship_type,
                with_ref_prefix(&rel.related_element)
            )?;
        }
    }
    Ok(())
}

fn write_package(out: &mut String, pkg: &SpdxPackage) -> std::fmt::Result {
    writeln!(out, "PackageName: {}", pkg.name)?;
    writeln!(out, "SPDXID: {}", with_ref_prefix(&pkg.spdx_id))?;
    if let Some(version) = &pkg.version {
        writeln!(out, "PackageVersion: {version}")?;
    }
    if let Some(file_name) = &pkg.file_name {
        writeln!(out, "PackageFileName: {file_name}")?;
    }
    if let Some(supplier) = &pkg.supplier {
        writeln!(out, "PackageSupplier: {supplier}")?;
    }
    writeln!(out, "PackageDownloadLocation: {}", pkg.download_location)?;
    writeln!(out, "FilesAnalyzed: {}", pkg.files_analyzed)?;
    for checksum in &pkg.checksums {
        writeln!(out, "PackageChecksum: {}: {}", checksum.algorithm, checksum.value)?;
    }
    writeln!(out, "PackageLicenseConcluded: {}", pkg.license_concluded)?;
    writeln!(out, "PackageLicenseDeclared: {}", pkg.license_declared)?;
    writeln!(out, "PackageCopyrightText: {}", text_value(&pkg.copyright_text))?;
    if let Some(description) = &pkg.description {
        writeln!(out, "PackageDescription: {}", text_value(description))?;
    }
    if let Some(comment) = &pkg.comment {
        writeln!(out, "PackageComment: {}", text_value(comment))?;
    }
    for ext in &pkg.external_refs {
        writeln!(
            out,
            "ExternalRef: {} {} {}",
            ext.category, ext.ref_type, ext.locator
        )?;
    }
    Ok(())
}
