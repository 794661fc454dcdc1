// src/fetch/images.rs

use crate::error::ProbeError;
use crate::fetch::probe::ExistenceProbe;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument};
use url::Url;

/// Matches normalized keys to image files by probing `<base>/<key>.<ext>`.
pub struct ImageResolver<P> {
    probe: P,
    base: String,
    /// Parsed `base` when it is an http(s) URL.
    remote_base: Option<Url>,
    extensions: Vec<String>,
    probe_timeout: Duration,
}

impl<P: ExistenceProbe> ImageResolver<P> {
    pub fn new(
        probe: P,
        base: impl Into<String>,
        extensions: Vec<String>,
        probe_timeout: Duration,
    ) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        let remote_base = if super::is_remote(&base) {
            Url::parse(&base).ok()
        } else {
            None
        };
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            probe,
            base,
            remote_base,
            extensions,
            probe_timeout,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Candidate locations for `key`, in extension priority order.
    ///
    /// Over http(s) the file name is one percent-encoded path segment, so
    /// `#`, `?` and `%` in a key stay part of the name.
    pub fn candidates(&self, key: &str) -> Vec<String> {
        if key.is_empty() {
            return Vec::new();
        }
        self.extensions
            .iter()
            .map(|ext| {
                let file = format!("{}.{}", key, ext);
                if let Some(url) = self.remote_base.as_ref().and_then(|b| join_segment(b, &file)) {
                    url
                } else if self.base.is_empty() {
                    file
                } else {
                    format!("{}/{}", self.base, file)
                }
            })
            .collect()
    }

    /// A failed or stalled probe means "not there".
    async fn probe_one(&self, location: &str) -> bool {
        let outcome = match timeout(self.probe_timeout, self.probe.exists(location)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeError::Timeout(self.probe_timeout)),
        };
        match outcome {
            Ok(found) => found,
            Err(e) => {
                debug!(location, error = %e, "probe failed, treating as missing");
                false
            }
        }
    }

    /// First existing candidate for `key`. Later candidates are not probed
    /// once one matches.
    pub async fn resolve(&self, key: &str) -> Option<String> {
        for candidate in self.candidates(key) {
            if self.probe_one(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    /// Resolve every key concurrently and wait for the whole batch.
    /// `result[i]` always belongs to `keys[i]`.
    #[instrument(level = "info", skip_all, fields(records = keys.len()))]
    pub async fn resolve_all(&self, keys: &[String]) -> Vec<Option<String>> {
        let resolved = join_all(keys.iter().map(|k| self.resolve(k))).await;
        let matched = resolved.iter().filter(|r| r.is_some()).count();
        info!(matched, missing = keys.len() - matched, "image resolution done");
        resolved
    }
}

fn join_segment(base: &Url, file: &str) -> Option<String> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().push(file);
    Some(url.to_string())
}
