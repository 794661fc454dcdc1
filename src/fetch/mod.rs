// src/fetch/mod.rs

pub mod images;
pub mod probe;
pub mod text;

pub use images::ImageResolver;
pub use probe::{ExistenceProbe, FsProbe, HttpProbe, ImageProbe};
pub use text::load_text;

use std::path::Path;
use tracing::warn;
use url::Url;

/// True when `location` is an http(s) URL rather than a local path.
pub fn is_remote(location: &str) -> bool {
    Url::parse(location)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Image base to check for a catalog loaded from `source`.
///
/// A relative base next to a remote source is resolved against the source
/// URL, the same way a page resolves `images/` against its own address.
/// Remote bases, absolute paths and local sources are returned unchanged.
pub fn resolve_image_base(source: &str, base: &str) -> String {
    if !is_remote(source) || is_remote(base) {
        return base.to_string();
    }
    if Path::new(base).is_absolute() {
        warn!(source, base, "remote catalog with a local image directory");
        return base.to_string();
    }
    let dir = match base.trim_end_matches('/') {
        "" => "./".to_string(),
        trimmed => format!("{}/", trimmed),
    };
    match Url::parse(source).and_then(|u| u.join(&dir)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(source, base, error = %e, "could not resolve image base against source");
            base.to_string()
        }
    }
}
