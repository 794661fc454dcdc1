// src/fetch/probe.rs

use crate::error::ProbeError;
use async_trait::async_trait;
use reqwest::{header::CACHE_CONTROL, Client};
use std::io::ErrorKind;
use tracing::trace;

/// "Does a resource exist at this location", without transferring it.
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    async fn exists(&self, location: &str) -> Result<bool, ProbeError>;
}

/// HEAD request; any 2xx counts as present.
#[derive(Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExistenceProbe for HttpProbe {
    async fn exists(&self, location: &str) -> Result<bool, ProbeError> {
        let resp = self
            .client
            .head(location)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        trace!(url = %location, status = %resp.status(), "probed");
        Ok(resp.status().is_success())
    }
}

/// Local file check for image directories on disk.
#[derive(Clone, Copy, Default)]
pub struct FsProbe;

#[async_trait]
impl ExistenceProbe for FsProbe {
    async fn exists(&self, location: &str) -> Result<bool, ProbeError> {
        match tokio::fs::metadata(location).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Probe picked from the shape of the image base.
#[derive(Clone)]
pub enum ImageProbe {
    Http(HttpProbe),
    Fs(FsProbe),
}

impl ImageProbe {
    pub fn for_base(base: &str, client: &Client) -> Self {
        if super::is_remote(base) {
            ImageProbe::Http(HttpProbe::new(client.clone()))
        } else {
            ImageProbe::Fs(FsProbe)
        }
    }
}

#[async_trait]
impl ExistenceProbe for ImageProbe {
    async fn exists(&self, location: &str) -> Result<bool, ProbeError> {
        match self {
            ImageProbe::Http(p) => p.exists(location).await,
            ImageProbe::Fs(p) => p.exists(location).await,
        }
    }
}
