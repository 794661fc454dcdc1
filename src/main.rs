use anyhow::{Context, Result};
use pedigree_catalog::{
    fetch::{self, ImageProbe},
    render::{write_document, GalleryRenderer},
    CatalogConfig, Pipeline,
};
use reqwest::Client;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries the JSON) ──────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let mut config = CatalogConfig::from_env().context("loading CATALOG_* configuration")?;
    config.image_base = fetch::resolve_image_base(&config.source, &config.image_base);
    info!(
        source = %config.source,
        images = %config.image_base,
        extensions = ?config.image_extensions,
        precedence = config.image_precedence.as_str(),
        require_image = config.require_image,
        "startup"
    );

    let client = Client::builder()
        .connect_timeout(config.probe_timeout)
        .build()
        .context("building HTTP client")?;

    // ─── 3) load the CSV text ────────────────────────────────────────
    let text = fetch::load_text(&client, &config.source, config.fetch_retries)
        .await
        .with_context(|| format!("loading catalog from {}", config.source))?;

    // ─── 4) parse, validate, resolve images ─────────────────────────
    let probe = ImageProbe::for_base(&config.image_base, &client);
    let pipeline = Pipeline::new(&config, probe);
    let catalog = match pipeline.build(&text).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("header check failed");
            return Err(e.into());
        }
    };

    // ─── 5) hand off to the gallery ──────────────────────────────────
    let renderer = GalleryRenderer::new(config.placeholder_image.clone());
    let doc = renderer.render(&catalog);
    write_document(&doc, config.output.as_deref())?;

    info!(
        published = catalog.records.len(),
        skipped = catalog.skipped,
        "all done"
    );
    Ok(())
}
