// src/pipeline.rs

use crate::config::{CatalogConfig, ImagePrecedence};
use crate::error::SchemaError;
use crate::fetch::images::ImageResolver;
use crate::fetch::probe::ExistenceProbe;
use crate::process::csv::parse_table;
use crate::process::project::{attach_images, project_rows, publish, PublishedRecord};
use crate::schema::validate::ensure_required_columns;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// The published, image-annotated record list.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub generated_at: DateTime<Utc>,
    pub header: Vec<String>,
    /// Data rows retained by the parser.
    pub total_rows: usize,
    /// Rows left out by the publication gate.
    pub skipped: usize,
    pub records: Vec<PublishedRecord>,
}

/// parse → validate → project → resolve images → publish.
pub struct Pipeline<P> {
    resolver: ImageResolver<P>,
    precedence: ImagePrecedence,
    require_image: bool,
}

impl<P: ExistenceProbe> Pipeline<P> {
    pub fn new(config: &CatalogConfig, probe: P) -> Self {
        Self {
            resolver: ImageResolver::new(
                probe,
                config.image_base.clone(),
                config.image_extensions.clone(),
                config.probe_timeout,
            ),
            precedence: config.image_precedence,
            require_image: config.require_image,
        }
    }

    pub fn resolver(&self) -> &ImageResolver<P> {
        &self.resolver
    }

    /// Build the catalog from raw CSV text. Only a header problem fails;
    /// everything else degrades to empty fields, dropped rows or missing images.
    #[instrument(level = "info", skip_all)]
    pub async fn build(&self, text: &str) -> Result<Catalog, SchemaError> {
        let table = parse_table(text);
        info!(header = ?table.header, "parsed header");
        info!(rows = table.rows.len(), "parsed data rows");

        ensure_required_columns(&table.header)?;

        let records = project_rows(&table);
        let keys: Vec<String> = records.iter().map(|r| r.key.clone()).collect();
        let resolved = self.resolver.resolve_all(&keys).await;
        let records = attach_images(records, resolved, self.precedence);

        let total_rows = records.len();
        let published = publish(records, self.require_image);
        let skipped = total_rows - published.len();
        if skipped > 0 {
            warn!(skipped, "records without an image were not published");
        }
        info!(published = published.len(), "catalog ready");

        Ok(Catalog {
            generated_at: Utc::now(),
            header: table.header,
            total_rows,
            skipped,
            records: published,
        })
    }
}
