use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Remote API endpoints and the session user identifier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base of the public read URL for uploaded objects. The signed write
    /// URL expires; this one does not.
    #[serde(default = "default_content_base_url")]
    pub content_base_url: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            content_base_url: default_content_base_url(),
            user_id: default_user_id(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.chromastudio.ai".to_string()
}

fn default_content_base_url() -> String {
    "https://contents.maxstudio.ai".to_string()
}

fn default_user_id() -> String {
    "DObRu1vyStbUynoQmTcHBlhs55z2".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    "chromaflow/0.1.0".to_string()
}

/// Fixed processing profile sent with every generation request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_tool_type")]
    pub tool_type: String,
    #[serde(default = "default_effect_id")]
    pub effect_id: String,
    #[serde(default = "default_true")]
    pub remove_watermark: bool,
    #[serde(default = "default_true")]
    pub is_private: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            tool_type: default_tool_type(),
            effect_id: default_effect_id(),
            remove_watermark: true,
            is_private: true,
        }
    }
}

fn default_model() -> String {
    "image-effects".to_string()
}

fn default_tool_type() -> String {
    "image-effects".to_string()
}

fn default_effect_id() -> String {
    "photoToVectorArt".to_string()
}

fn default_true() -> bool {
    true
}

/// Status polling cadence and ceiling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    60
}

/// Artifact download naming and destination
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            target_dir: default_target_dir(),
        }
    }
}

fn default_filename_prefix() -> String {
    "vector_art_".to_string()
}

fn default_target_dir() -> PathBuf {
    PathBuf::from(".")
}
