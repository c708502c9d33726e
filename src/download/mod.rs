//! Artifact retrieval: cascade of strategies, extension resolution, local save
//!
//! Three ordered strategies, each attempted only if the previous failed:
//! 1. proxied fetch through the API's download proxy
//! 2. direct fetch of the result URL with a cache-busting parameter
//! 3. manual fallback: no network call, the collaborator is told to save
//!    the displayed media by hand
//!
//! Strategies 1 and 2 write the fetched bytes to the configured directory
//! under a generated filename; strategy 3 never saves anything.

use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::DownloadConfig;
use crate::ident;

const DEFAULT_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to write artifact to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which retrieval strategy produced the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Proxy,
    Direct,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    /// Bytes were fetched and written to `path`.
    Saved {
        path: PathBuf,
        strategy: Strategy,
        size: usize,
    },
    /// Both network strategies failed; the collaborator should instruct
    /// the user to save the displayed media manually.
    ManualSave { url: String },
}

/// Fetch a result URL and save it locally.
///
/// Per-strategy failures are swallowed and the next strategy attempted;
/// the manual fallback always "succeeds", so the only hard error left is
/// an I/O failure while writing already-fetched bytes.
pub async fn download(
    client: &ApiClient,
    config: &DownloadConfig,
    result_url: &str,
) -> Result<DownloadOutcome, DownloadError> {
    let (bytes, content_type, strategy) = match fetch_via_proxy(client, result_url).await {
        Ok((bytes, content_type)) => (bytes, content_type, Strategy::Proxy),
        Err(proxy_error) => {
            warn!(url = result_url, error = %proxy_error, "Proxy download failed, trying direct");
            match fetch_direct(client, result_url).await {
                Ok((bytes, content_type)) => (bytes, content_type, Strategy::Direct),
                Err(direct_error) => {
                    warn!(
                        url = result_url,
                        error = %direct_error,
                        "Direct download failed, falling back to manual save"
                    );
                    return Ok(DownloadOutcome::ManualSave {
                        url: result_url.to_string(),
                    });
                }
            }
        }
    };

    let extension = resolve_extension(result_url, content_type.as_deref());
    let file_name = format!(
        "{}{}.{}",
        config.filename_prefix,
        ident::generate(ident::FILENAME_SUFFIX_LENGTH),
        extension
    );
    let path = config.target_dir.join(file_name);

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| DownloadError::Save {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), size = bytes.len(), strategy = ?strategy, "Artifact saved");

    Ok(DownloadOutcome::Saved {
        path,
        strategy,
        size: bytes.len(),
    })
}

async fn fetch_via_proxy(
    client: &ApiClient,
    result_url: &str,
) -> Result<(Bytes, Option<String>), String> {
    let response = client
        .http()
        .get(client.proxy_download_url())
        .query(&[("url", result_url)])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    read_media_response(response).await
}

async fn fetch_direct(
    client: &ApiClient,
    result_url: &str,
) -> Result<(Bytes, Option<String>), String> {
    // Cache-busting timestamp so a stale cached copy is never returned.
    let separator = if result_url.contains('?') { '&' } else { '?' };
    let busted = format!(
        "{}{}t={}",
        result_url,
        separator,
        chrono::Utc::now().timestamp_millis()
    );

    let response = client
        .http()
        .get(busted)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    read_media_response(response).await
}

async fn read_media_response(
    response: reqwest::Response,
) -> Result<(Bytes, Option<String>), String> {
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status().as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;

    Ok((bytes, content_type))
}

/// Map a Content-Type header (when one matches a known image type) or the
/// URL's path suffix to a filename extension; `png` when neither matches.
pub(crate) fn resolve_extension(url: &str, content_type: Option<&str>) -> &'static str {
    if let Some(value) = content_type {
        let subtype = value
            .parse::<mime::Mime>()
            .map(|m| m.subtype().as_str().to_ascii_lowercase())
            .unwrap_or_else(|_| value.to_ascii_lowercase());

        if subtype.contains("jpeg") || subtype.contains("jpg") {
            return "jpg";
        }
        if subtype.contains("png") {
            return "png";
        }
        if subtype.contains("svg") {
            return "svg";
        }
        if subtype.contains("webp") {
            return "webp";
        }
    }

    extension_from_path(url).unwrap_or(DEFAULT_EXTENSION)
}

fn extension_from_path(raw: &str) -> Option<&'static str> {
    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or(raw)
            .to_ascii_lowercase(),
    };

    [
        (".jpeg", "jpg"),
        (".jpg", "jpg"),
        (".png", "png"),
        (".webp", "webp"),
        (".svg", "svg"),
    ]
    .into_iter()
    .find_map(|(suffix, extension)| path.ends_with(suffix).then_some(extension))
}
