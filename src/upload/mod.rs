//! Asset upload: obtain a signed write destination, transfer the bytes,
//! return the stable public read URL

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::ident;

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload signing failed: {0}")]
    Sign(String),

    #[error("upload transfer failed: {0}")]
    Transfer(String),
}

/// A file handed over by the collaborator: raw bytes plus the original
/// name and MIME type.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileSource {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// An asset durably stored and reachable by public URL. Immutable once
/// created; selecting a new file produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub object_name: String,
    pub public_url: String,
}

/// Extension taken verbatim from the file name; `jpg` when absent.
pub(crate) fn derived_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => DEFAULT_EXTENSION,
    }
}

/// Upload a file and return its public URL.
///
/// Two sequential network calls: a GET for the signed write URL, then a
/// content-typed PUT of the raw bytes. No retry on either; a failed
/// attempt is terminal and retrying is the caller's decision.
pub async fn upload(client: &ApiClient, file: &FileSource) -> Result<UploadedAsset, UploadError> {
    let extension = derived_extension(&file.name);
    let object_name = format!(
        "{}.{}",
        ident::generate(ident::OBJECT_NAME_LENGTH),
        extension
    );

    let response = client
        .http()
        .get(client.sign_upload_url())
        .query(&[("fileName", object_name.as_str())])
        .send()
        .await
        .map_err(|e| UploadError::Sign(e.to_string()))?;

    if !response.status().is_success() {
        return Err(UploadError::Sign(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    let signed_url = response
        .text()
        .await
        .map_err(|e| UploadError::Sign(e.to_string()))?;

    debug!(object_name, "Signed upload destination obtained");

    let response = client
        .http()
        .put(signed_url.trim())
        .header(reqwest::header::CONTENT_TYPE, &file.content_type)
        .body(file.bytes.clone())
        .send()
        .await
        .map_err(|e| UploadError::Transfer(e.to_string()))?;

    if !response.status().is_success() {
        return Err(UploadError::Transfer(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    let public_url = client.public_content_url(&object_name);

    info!(object_name, public_url, size = file.bytes.len(), "Asset uploaded");

    Ok(UploadedAsset {
        object_name,
        public_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_taken_verbatim() {
        assert_eq!(derived_extension("photo.PNG"), "PNG");
        assert_eq!(derived_extension("photo.jpeg"), "jpeg");
        assert_eq!(derived_extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_extension_defaults_to_jpg() {
        assert_eq!(derived_extension("snapshot"), "jpg");
        assert_eq!(derived_extension(""), "jpg");
        assert_eq!(derived_extension("trailing."), "jpg");
    }

    #[test]
    fn test_image_detection() {
        let file = FileSource {
            name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::new(),
        };
        assert!(file.is_image());

        let file = FileSource {
            name: "a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::new(),
        };
        assert!(!file.is_image());
    }
}
