// src/fetch/text.rs

use anyhow::{Context, Result};
use reqwest::{header::CACHE_CONTROL, Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    let bytes = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .bytes()
        .await
        .with_context(|| format!("Reading body from {}", url))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Server errors and failures without any response may clear up; any other
/// status (a 404 for a missing file) will not.
fn is_transient(status: Option<StatusCode>) -> bool {
    status.map_or(true, |s| s.is_server_error())
}

fn should_retry(err: &anyhow::Error) -> bool {
    is_transient(err.downcast_ref::<reqwest::Error>().and_then(|e| e.status()))
}

/// GET with doubling backoff, repeated at most `max_retries` times and only
/// for transient failures.
async fn fetch_remote_text(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff: Duration,
) -> Result<String> {
    let mut backoff = initial_backoff;
    let mut attempt = 0;
    loop {
        let err = match get_text_core(client, url).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };
        if !should_retry(&err) {
            error!(%url, error = %err, "request rejected, not retrying");
            return Err(err);
        }
        if attempt == max_retries {
            error!(%url, attempts = attempt + 1, error = %err, "giving up");
            return Err(err);
        }
        attempt += 1;
        warn!(
            %url,
            attempt,
            delay_ms = backoff.as_millis() as u64,
            error = %err,
            "transient failure, retrying"
        );
        sleep(backoff).await;
        backoff *= 2;
    }
}

/// Load the catalog text from an http(s) URL or a local file.
///
/// Invalid UTF-8 is replaced rather than rejected; a leading BOM is kept and
/// left to the parser.
#[instrument(level = "info", skip(client))]
pub async fn load_text(client: &Client, source: &str, max_retries: u32) -> Result<String> {
    if super::is_remote(source) {
        let url = Url::parse(source).with_context(|| format!("parsing source URL {}", source))?;
        return fetch_remote_text(client, &url, max_retries, INITIAL_BACKOFF).await;
    }
    let bytes = tokio::fs::read(source)
        .await
        .with_context(|| format!("reading {}", source))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local server answering every request with `status`; returns its URL
    /// and the number of requests served.
    async fn serve_status(status: &'static str) -> Result<(Url, Arc<AtomicUsize>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}/animals.csv", listener.local_addr()?))?;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Ok((url, hits))
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(None));
        assert!(is_transient(Some(StatusCode::INTERNAL_SERVER_ERROR)));
        assert!(is_transient(Some(StatusCode::SERVICE_UNAVAILABLE)));
        assert!(!is_transient(Some(StatusCode::NOT_FOUND)));
        assert!(!is_transient(Some(StatusCode::FORBIDDEN)));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() -> Result<()> {
        let (url, hits) = serve_status("404 Not Found").await?;
        let err = fetch_remote_text(&Client::new(), &url, 3, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(!should_retry(&err));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_retried() -> Result<()> {
        let (url, hits) = serve_status("503 Service Unavailable").await?;
        let err = fetch_remote_text(&Client::new(), &url, 2, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(should_retry(&err));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_local_file_keeps_bom() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all("\u{feff}種類,毛色\r\nトイプードル,レッド\r\n".as_bytes())?;

        let text = load_text(&Client::new(), &tmp.path().to_string_lossy(), 0).await?;
        assert!(text.starts_with('\u{feff}'));
        assert!(text.contains("トイプードル"));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_local_file_lossy() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"a,b\n\xff,2\n")?;

        let text = load_text(&Client::new(), &tmp.path().to_string_lossy(), 0).await?;
        assert_eq!(text, "a,b\n\u{fffd},2\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = load_text(&Client::new(), "/definitely/not/here/animals.csv", 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("animals.csv"));
    }

    /// Manual check against a live server: set CATALOG_TEST_URL and run with `--ignored`.
    #[tokio::test]
    #[ignore]
    async fn manual_remote_fetch() -> Result<()> {
        let url = std::env::var("CATALOG_TEST_URL")?;
        let text = load_text(&Client::new(), &url, 2).await?;
        println!("fetched {} bytes", text.len());
        Ok(())
    }
}
