use crate::utils::status::ClosingTerms;
use crate::utils::validation::UploadPolicy;
use std::env;

/// Runtime configuration for the order backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// S3-compatible endpoint (default: "https://storage.yandexcloud.net")
    pub s3_endpoint: String,

    /// Bucket for order attachments (default: "rlngroup")
    pub s3_bucket: String,

    /// Signing region (default: "ru-central1")
    pub s3_region: String,

    /// Static access key; falls back to the AWS credential chain when unset
    pub s3_access_key: Option<String>,

    /// Static secret key; falls back to the AWS credential chain when unset
    pub s3_secret_key: Option<String>,

    /// Path-style addressing, needed by MinIO (default: false)
    pub s3_force_path_style: bool,

    /// Status values that close an order, compared case-insensitively
    pub closing_statuses: Vec<String>,

    /// Size ceiling for "act" attachments in bytes (default: 10 MB)
    pub act_max_file_size: usize,

    /// Size ceiling for "video" attachments in bytes (default: 100 MB)
    pub video_max_file_size: usize,

    /// Size ceiling for every other attachment in bytes (default: 20 MB)
    pub other_max_file_size: usize,

    /// Allowed CORS origins (comma separated, "*" allows any)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            s3_endpoint: "https://storage.yandexcloud.net".to_string(),
            s3_bucket: "rlngroup".to_string(),
            s3_region: "ru-central1".to_string(),
            s3_access_key: None,
            s3_secret_key: None,
            s3_force_path_style: false,
            closing_statuses: ClosingTerms::default().terms().to_vec(),
            act_max_file_size: 10 * 1024 * 1024,    // 10 MB
            video_max_file_size: 100 * 1024 * 1024, // 100 MB
            other_max_file_size: 20 * 1024 * 1024,  // 20 MB
            allowed_origins: vec!["*".to_string()],
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `S3_*` names win over
    /// the older `YANDEX_S3_*` ones
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let either = |name: &str, legacy: &str| var(name).or_else(|| var(legacy));

        Self {
            s3_endpoint: either("S3_ENDPOINT", "YANDEX_S3_ENDPOINT").unwrap_or(default.s3_endpoint),

            s3_bucket: either("S3_BUCKET", "YANDEX_S3_BUCKET").unwrap_or(default.s3_bucket),

            s3_region: var("S3_REGION").unwrap_or(default.s3_region),

            s3_access_key: either("S3_ACCESS_KEY_ID", "YANDEX_S3_ACCESS_KEY_ID"),

            s3_secret_key: either("S3_SECRET_ACCESS_KEY", "YANDEX_S3_SECRET_ACCESS_KEY"),

            s3_force_path_style: var("S3_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.s3_force_path_style),

            closing_statuses: var("CLOSING_STATUSES")
                .map(|v| parse_list(&v))
                .filter(|terms| !terms.is_empty())
                .unwrap_or(default.closing_statuses),

            act_max_file_size: var("ACT_MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.act_max_file_size),

            video_max_file_size: var("VIDEO_MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.video_max_file_size),

            other_max_file_size: var("OTHER_MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.other_max_file_size),

            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for local development against MinIO
    pub fn development() -> Self {
        Self {
            s3_endpoint: "http://127.0.0.1:9000".to_string(),
            s3_bucket: "uploads".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_access_key: Some("minioadmin".to_string()),
            s3_secret_key: Some("minioadmin".to_string()),
            s3_force_path_style: true,
            ..Self::default()
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            act_max_size: self.act_max_file_size,
            video_max_size: self.video_max_file_size,
            other_max_size: self.other_max_file_size,
        }
    }

    pub fn closing_terms(&self) -> ClosingTerms {
        ClosingTerms::new(self.closing_statuses.iter().cloned())
    }

    /// Request body ceiling: the largest attachment plus room for multipart framing
    pub fn max_request_size(&self) -> usize {
        self.upload_policy().largest_limit() + 10 * 1024 * 1024
    }
}
