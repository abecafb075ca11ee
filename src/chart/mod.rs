//! Chart input: metadata, annotation lists and per-image scan results.

mod annotations;
mod loader;
mod scanner;

pub use annotations::{parse_cpes, parse_images, CPE_MARKER, IMAGE_MARKER};
pub use loader::{
    load_chart, parse_chart_metadata, AnnotationKeys, Chart, ChartMetadata, CHART_FILE_NAME,
    DEFAULT_CPE_ANNOTATION, DEFAULT_IMAGES_ANNOTATION,
};
pub use scanner::{scan_file_name, ImageScanner, ScanResultStore, SCAN_FILE_EXTENSION};
