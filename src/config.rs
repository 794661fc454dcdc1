// src/config.rs

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SOURCE: &str = "animals.csv";
pub const DEFAULT_IMAGE_BASE: &str = "images";
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
pub const DEFAULT_PLACEHOLDER: &str = "images/no-photo.png";
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_FETCH_RETRIES: u32 = 3;

/// Which image wins when the CSV carries an explicit 画像URL and a file was
/// also found by key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImagePrecedence {
    /// Only the key-resolved file counts; 画像URL is ignored.
    #[default]
    ResolvedOnly,
    ResolvedFirst,
    ExplicitFirst,
}

impl ImagePrecedence {
    pub fn as_str(&self) -> &str {
        match self {
            ImagePrecedence::ResolvedOnly => "resolved-only",
            ImagePrecedence::ResolvedFirst => "resolved-first",
            ImagePrecedence::ExplicitFirst => "explicit-first",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "resolved-only" => Some(ImagePrecedence::ResolvedOnly),
            "resolved-first" => Some(ImagePrecedence::ResolvedFirst),
            "explicit-first" => Some(ImagePrecedence::ExplicitFirst),
            _ => None,
        }
    }

    /// Pick the image reference for one record.
    pub fn choose(&self, resolved: Option<String>, explicit: &str) -> Option<String> {
        let explicit = (!explicit.is_empty()).then(|| explicit.to_string());
        match self {
            ImagePrecedence::ResolvedOnly => resolved,
            ImagePrecedence::ResolvedFirst => resolved.or(explicit),
            ImagePrecedence::ExplicitFirst => explicit.or(resolved),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// CSV file path or http(s) URL.
    pub source: String,
    /// Directory or URL prefix holding `<key>.<ext>` images.
    pub image_base: String,
    /// Candidate extensions, highest priority first.
    pub image_extensions: Vec<String>,
    pub probe_timeout: Duration,
    /// Drop records that end up without an image.
    pub require_image: bool,
    pub image_precedence: ImagePrecedence,
    pub placeholder_image: String,
    pub fetch_retries: u32,
    /// JSON destination; stdout when unset.
    pub output: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            image_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            require_image: true,
            image_precedence: ImagePrecedence::default(),
            placeholder_image: DEFAULT_PLACEHOLDER.to_string(),
            fetch_retries: DEFAULT_FETCH_RETRIES,
            output: None,
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be a boolean, got {:?}", key, other),
    }
}

impl CatalogConfig {
    /// Read `CATALOG_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("CATALOG_SOURCE") {
            cfg.source = v.trim().to_string();
        }
        if let Some(v) = get("CATALOG_IMAGE_BASE") {
            cfg.image_base = v.trim().to_string();
        }
        if let Some(v) = get("CATALOG_IMAGE_EXTENSIONS") {
            cfg.image_extensions = v
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect();
            if cfg.image_extensions.is_empty() {
                bail!("CATALOG_IMAGE_EXTENSIONS lists no extensions");
            }
        }
        if let Some(v) = get("CATALOG_PROBE_TIMEOUT_MS") {
            let ms: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("CATALOG_PROBE_TIMEOUT_MS={:?}", v))?;
            cfg.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(v) = get("CATALOG_REQUIRE_IMAGE") {
            cfg.require_image = parse_bool("CATALOG_REQUIRE_IMAGE", &v)?;
        }
        if let Some(v) = get("CATALOG_IMAGE_PRECEDENCE") {
            cfg.image_precedence = ImagePrecedence::parse(&v)
                .ok_or_else(|| anyhow!("unknown CATALOG_IMAGE_PRECEDENCE {:?}", v))?;
        }
        if let Some(v) = get("CATALOG_PLACEHOLDER_IMAGE") {
            cfg.placeholder_image = v.trim().to_string();
        }
        if let Some(v) = get("CATALOG_FETCH_RETRIES") {
            cfg.fetch_retries = v
                .trim()
                .parse()
                .with_context(|| format!("CATALOG_FETCH_RETRIES={:?}", v))?;
        }
        if let Some(v) = get("CATALOG_OUTPUT") {
            cfg.output = Some(PathBuf::from(v.trim()));
        }

        Ok(cfg)
    }
}
