//! Line-oriented image and CPE lists carried in chart annotations.
//!
//! Each line is split on `:`. Lines with fewer than three fields, or whose
//! first field lacks the marker, are skipped without comment.

/// Marker the first field of a CPE line must contain.
pub const CPE_MARKER: &str = "cpe";

/// Marker the first field of an image line must contain.
pub const IMAGE_MARKER: &str = "image";

fn marked_lines<'a>(text: &'a str, marker: &'a str) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    text.lines()
        .map(|line| line.split(':').collect::<Vec<_>>())
        .filter(move |parts| parts.len() >= 3 && parts[0].contains(marker))
}

/// CPE strings listed in `text`.
///
/// The marker field is dropped and the rest rejoined, so
/// `cpe:2.3:a:vendor:product:1.0` yields `2.3:a:vendor:product:1.0`.
#[must_use]
pub fn parse_cpes(text: &str) -> Vec<String> {
    marked_lines(text, CPE_MARKER)
        .map(|parts| parts[1..].join(":"))
        .collect()
}

/// Image references listed in `text`.
///
/// Only the two fields after the marker are kept: `image: nginx:1.21` yields
/// `nginx:1.21`. A registry port or any further `:` segment is truncated,
/// so `image: registry:5000/nginx:1.21` yields `registry:5000/nginx`.
#[must_use]
pub fn parse_images(text: &str) -> Vec<String> {
    marked_lines(text, IMAGE_MARKER)
        .map(|parts| format!("{}:{}", parts[1].trim_matches(' '), parts[2]))
        .collect()
}
