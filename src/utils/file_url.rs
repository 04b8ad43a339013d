//! Interpretation of the opaque `files.file_url` column.
//!
//! Older rows hold local filesystem paths, newer ones full object-storage
//! URLs. Nothing guarantees a row is fetchable over HTTP.

/// Where an attachment's bytes live, as far as its `file_url` tells
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation {
    /// Object in the configured bucket
    Bucket { key: String },
    /// HTTP(S) URL outside the configured endpoint/bucket
    Foreign { url: String },
    /// Anything else, usually a path on the server that wrote it
    Local { path: String },
}

/// URL of an object, as returned by a successful upload
pub fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}

pub fn classify(file_url: &str, endpoint: &str, bucket: &str) -> FileLocation {
    let prefix = object_url(endpoint, bucket, "");
    if let Some(key) = file_url.strip_prefix(&prefix) {
        if !key.is_empty() {
            return FileLocation::Bucket {
                key: key.to_string(),
            };
        }
    }

    let lower = file_url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        FileLocation::Foreign {
            url: file_url.to_string(),
        }
    } else {
        FileLocation::Local {
            path: file_url.to_string(),
        }
    }
}
