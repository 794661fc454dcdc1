// src/error.rs

use std::time::Duration;
use thiserror::Error;

/// Required header columns are missing.
///
/// The message is shown to the end user as-is, so it lists every missing
/// column in one report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("必須ヘッダーが不足しています:\n{}", bullet_list(.missing))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

fn bullet_list(names: &[String]) -> String {
    names
        .iter()
        .map(|m| format!("- {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single existence probe failed. Never escapes the image resolver.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}
