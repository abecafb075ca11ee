//! Compose a BOM for a chart from its images, their scans and its CPEs.

use crate::chart::{Chart, ImageScanner};
use crate::error::{ComposeError, ErrorContext, Result};
use crate::model::{
    Component, ComponentType, Dependency, DependencyGraph, Document, RelationshipType,
    SpdxDocument, DOCUMENT_ID,
};
use crate::translate::{cpe_to_package, image_package_id, image_to_package, to_target_document};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexSet;

/// Default namespace prefix for chart documents.
pub const DEFAULT_NAMESPACE_BASE: &str = "https://bigbang.dev/chart";

/// Default tool name recorded as creator.
pub const DEFAULT_TOOL_NAME: &str = "sbom-compose";

/// Settings for [`ChartComposer`].
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub namespace_base: String,
    pub tool_name: String,
    pub organization: Option<String>,
    /// Fixed creation time; `None` means now
    pub created: Option<DateTime<Utc>>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            namespace_base: DEFAULT_NAMESPACE_BASE.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            organization: None,
            created: None,
        }
    }
}

/// Result of composing a chart.
///
/// Holds the package-oriented document together with the per-image package
/// refs needed to synthesize the component/graph form.
#[derive(Debug, Clone)]
pub struct ChartBom {
    pub chart_name: String,
    pub chart_version: String,
    /// Distinct images in annotation order
    pub images: Vec<String>,
    /// Package ids of each image's scan, in scanner order
    pub image_packages: Vec<Vec<String>>,
    pub document: SpdxDocument,
}

impl ChartBom {
    /// The package-oriented document.
    #[must_use]
    pub fn into_spdx(self) -> SpdxDocument {
        self.document
    }

    /// Component/graph form of the chart.
    ///
    /// The root component is the chart itself. The dependency graph is one
    /// edge from the chart to every image, then one edge per image listing
    /// the package refs its scan produced. Relationships of the package
    /// document are not carried over.
    #[must_use]
    pub fn to_cyclonedx(&self) -> Document {
        let mut doc = to_target_document(&self.document);

        let mut root = Component::new(self.chart_name.clone(), self.chart_name.clone())
            .with_type(ComponentType::Application);
        if !self.chart_version.is_empty() {
            root = root.with_version(self.chart_version.clone());
        }
        doc.root_component = Some(root);

        let mut edges = vec![Dependency::with_children(
            self.chart_name.clone(),
            self.images
                .iter()
                .map(|image| Dependency::new(image_package_id(image)))
                .collect(),
        )];
        for (image, packages) in self.images.iter().zip(&self.image_packages) {
            edges.push(Dependency::with_children(
                image_package_id(image),
                packages.iter().map(Dependency::new).collect(),
            ));
        }
        doc.dependencies = DependencyGraph::from_edges(edges);
        doc
    }
}

/// Builds chart BOMs with a given scanner.
pub struct ChartComposer<'a, S: ImageScanner + ?Sized> {
    scanner: &'a S,
    options: ChartOptions,
}

impl<'a, S: ImageScanner + ?Sized> ChartComposer<'a, S> {
    pub fn new(scanner: &'a S, options: ChartOptions) -> Self {
        Self { scanner, options }
    }

    /// Scan every image of `chart` and assemble the package document.
    ///
    /// Packages from later images replace same-id packages from earlier ones.
    ///
    /// # Errors
    ///
    /// Fails fast on the first scan that cannot be read and on malformed
    /// image references or CPEs.
    pub fn compose(&self, chart: &Chart) -> Result<ChartBom> {
        let name = chart.name().to_string();
        let namespace = format!(
            "{}/{}",
            self.options.namespace_base.trim_end_matches('/'),
            name
        );
        let mut document = SpdxDocument::new(name.clone(), namespace);
        let created = self.options.created.unwrap_or_else(Utc::now);
        document.creation_info.created = Some(created.to_rfc3339_opts(SecondsFormat::Secs, true));
        document.creation_info.tools.push(self.options.tool_name.clone());
        if let Some(org) = &self.options.organization {
            document.creation_info.organizations.push(org.clone());
        }

        let mut images: IndexSet<String> = IndexSet::new();
        for image in &chart.images {
            if !images.insert(image.clone()) {
                tracing::warn!("Image {} is listed more than once; scanning it once", image);
            }
        }

        let mut image_packages = Vec::with_capacity(images.len());
        for image in &images {
            tracing::info!("Found an image: {}", image);
            let scan = self.scanner.scan(image)?;

            let pseudo = image_to_package(image)
                .map_err(|e| ComposeError::translate(format!("image {image}"), e))?;
            let image_id = pseudo.spdx_id.clone();
            document.add_package(pseudo);
            document.add_relationship(DOCUMENT_ID, RelationshipType::Describes, image_id.as_str());

            let ids: Vec<String> = scan.packages.keys().cloned().collect();
            for (id, package) in scan.packages {
                if let Some(previous) = document.add_package(package) {
                    tracing::debug!("Package {} from {} replaces an earlier one", previous.spdx_id, image);
                }
                document.add_relationship(image_id.as_str(), RelationshipType::Contains, id);
            }
            image_packages.push(ids);
        }

        for cpe in &chart.cpes {
            let package = cpe_to_package(cpe)
                .map_err(|e| ComposeError::translate(String::new(), e))
                .with_context(|| format!("cpe {cpe}"))?;
            document.add_package(package);
        }

        tracing::info!(
            "Composed chart {} with {} packages from {} images and {} CPEs",
            name,
            document.packages.len(),
            images.len(),
            chart.cpes.len()
        );

        Ok(ChartBom {
            chart_name: name,
            chart_version: chart.version().to_string(),
            images: images.into_iter().collect(),
            image_packages,
            document,
        })
    }
}
