//! Shared HTTP transport for the Chroma Studio API

pub mod models;

use reqwest::Client;
use thiserror::Error;

use crate::config::{ApiConfig, HttpConfig};

/// Accept header sent on JSON endpoints, matching what the service expects.
pub const ACCEPT_JSON: &str = "application/json, text/plain, */*";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// One reqwest client shared by every component; holds the endpoint layout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    api: ApiConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(api: ApiConfig, http_config: &HttpConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(http_config.connect_timeout())
            .timeout(http_config.request_timeout())
            .user_agent(&http_config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http, api })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// Signing endpoint; the object name goes in the `fileName` query parameter.
    pub fn sign_upload_url(&self) -> String {
        format!("{}/get-emd-upload-url", self.base())
    }

    pub fn submit_url(&self) -> String {
        format!("{}/image-gen", self.base())
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/image-gen/{}/{}/status", self.base(), self.api.user_id, job_id)
    }

    /// Proxy endpoint; the target goes in the `url` query parameter.
    pub fn proxy_download_url(&self) -> String {
        format!("{}/download-proxy", self.base())
    }

    /// Deterministic public read URL for an uploaded object. The signed
    /// write URL may expire; this one is stable.
    pub fn public_content_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}",
            self.api.content_base_url.trim_end_matches('/'),
            object_name
        )
    }

    fn base(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;

    fn client_for(base_url: &str) -> ApiClient {
        let api = ApiConfig {
            base_url: base_url.to_string(),
            content_base_url: "https://contents.maxstudio.ai/".to_string(),
            user_id: "user-1".to_string(),
        };
        ApiClient::new(api, &HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client = client_for("https://api.chromastudio.ai");
        assert_eq!(
            client.status_url("J1"),
            "https://api.chromastudio.ai/image-gen/user-1/J1/status"
        );
        assert_eq!(
            client.sign_upload_url(),
            "https://api.chromastudio.ai/get-emd-upload-url"
        );
        assert_eq!(
            client.public_content_url("abc.png"),
            "https://contents.maxstudio.ai/abc.png"
        );
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let client = client_for("https://api.chromastudio.ai/");
        assert_eq!(
            client.submit_url(),
            "https://api.chromastudio.ai/image-gen"
        );
    }
}
