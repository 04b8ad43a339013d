use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;

/// Content types accepted for "act" attachments
pub const ACT_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// Content types accepted for "video" attachments
pub const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/quicktime"];

/// Tag recorded for uploads that arrive without a file type
pub const DEFAULT_FILE_TYPE: &str = "other";

/// Policy bucket an attachment falls into, derived from its file type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Act,
    Video,
    Other,
}

impl FileCategory {
    pub fn from_file_type(file_type: &str) -> Self {
        match file_type {
            "act" => FileCategory::Act,
            "video" => FileCategory::Video,
            _ => FileCategory::Other,
        }
    }

    /// `None` means any content type is accepted
    pub fn allowed_mime_types(self) -> Option<&'static [&'static str]> {
        match self {
            FileCategory::Act => Some(ACT_MIME_TYPES),
            FileCategory::Video => Some(VIDEO_MIME_TYPES),
            FileCategory::Other => None,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileCategory::Act => "act",
            FileCategory::Video => "video",
            FileCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// Size ceilings per attachment category, in bytes (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub act_max_size: usize,
    pub video_max_size: usize,
    pub other_max_size: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            act_max_size: 10 * 1024 * 1024,
            video_max_size: 100 * 1024 * 1024,
            other_max_size: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    InvalidContentType {
        category: FileCategory,
        content_type: String,
    },
    FileTooLarge {
        category: FileCategory,
        size: usize,
        max_size: usize,
    },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::InvalidContentType {
                category,
                content_type,
            } => write!(
                f,
                "Content type '{}' is not allowed for {} files",
                content_type, category
            ),
            PolicyViolation::FileTooLarge {
                category,
                size,
                max_size,
            } => write!(
                f,
                "File size {} bytes exceeds maximum allowed {} bytes ({} MB) for {} files",
                size,
                max_size,
                max_size / 1024 / 1024,
                category
            ),
        }
    }
}

impl UploadPolicy {
    pub fn max_size(&self, category: FileCategory) -> usize {
        match category {
            FileCategory::Act => self.act_max_size,
            FileCategory::Video => self.video_max_size,
            FileCategory::Other => self.other_max_size,
        }
    }

    pub fn largest_limit(&self) -> usize {
        self.act_max_size
            .max(self.video_max_size)
            .max(self.other_max_size)
    }

    /// Checks content type first, then size. Returns the applicable ceiling.
    pub fn check(
        &self,
        category: FileCategory,
        content_type: &str,
        size: usize,
    ) -> Result<usize, PolicyViolation> {
        if let Some(allowed) = category.allowed_mime_types() {
            let essence = normalize_mime_type(content_type);
            if !allowed.iter().any(|&a| a == essence) {
                return Err(PolicyViolation::InvalidContentType {
                    category,
                    content_type: content_type.to_string(),
                });
            }
        }

        let max_size = self.max_size(category);
        if size > max_size {
            return Err(PolicyViolation::FileTooLarge {
                category,
                size,
                max_size,
            });
        }

        Ok(max_size)
    }
}

/// Reduces a content type to its lowercase essence ("Image/PNG; q=1" -> "image/png")
pub fn normalize_mime_type(content_type: &str) -> String {
    match content_type.trim().parse::<mime::Mime>() {
        Ok(m) => m.essence_str().to_lowercase(),
        Err(_) => content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase(),
    }
}

/// Keeps only the last path component and replaces spaces with underscores
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or("");
    let name = Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Object key for an attachment: `orders/{order_id}/{file_type}/{timestamp}_{filename}`
pub fn build_object_key(
    order_id: i32,
    file_type: &str,
    original_filename: &str,
    at: DateTime<Utc>,
) -> String {
    format!(
        "orders/{}/{}/{}_{}",
        order_id,
        file_type.replace(['/', '\\', ' '], "_"),
        at.format("%Y%m%d%H%M%S%6f"),
        sanitize_filename(original_filename)
    )
}
