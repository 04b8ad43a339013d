use crate::entities::{files, prelude::*};
use crate::services::error::ServiceError;
use crate::services::storage::StorageService;
use crate::utils::validation::{DEFAULT_FILE_TYPE, FileCategory, UploadPolicy, build_object_key};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Outcome of a successful policy check; nothing has been written yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    pub order_id: i32,
    pub category: FileCategory,
    pub max_size: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub id: i32,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FileAttachment {
    pub id: i32,
    pub url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<files::Model> for FileAttachment {
    fn from(m: files::Model) -> Self {
        Self {
            id: m.id,
            url: m.file_url,
            file_type: m.file_type,
            uploaded_at: m.uploaded_at,
        }
    }
}

/// Blank or missing tags are recorded as "other"
pub fn resolve_file_type(file_type: Option<&str>) -> String {
    match file_type.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_FILE_TYPE.to_string(),
    }
}

pub struct AttachmentService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    policy: UploadPolicy,
}

impl AttachmentService {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            db,
            storage,
            policy,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Order existence first, then content type, then size. No side effects.
    pub async fn validate_and_stage(
        &self,
        order_id: i32,
        file_type: Option<&str>,
        content_type: &str,
        size: usize,
    ) -> Result<PolicyDecision, ServiceError> {
        let exists = Orders::find_by_id(order_id).count(&self.db).await? > 0;
        if !exists {
            return Err(ServiceError::order_not_found(order_id));
        }

        let category = FileCategory::from_file_type(&resolve_file_type(file_type));
        let max_size = self.policy.check(category, content_type, size)?;

        Ok(PolicyDecision {
            order_id,
            category,
            max_size,
        })
    }

    /// Uploads to object storage, then records the attachment row.
    ///
    /// The two steps are not transactional. If the insert fails the object
    /// stays in the bucket; its key is logged and nothing cleans it up.
    pub async fn store_file(
        &self,
        order_id: i32,
        file_type: Option<&str>,
        data: Bytes,
        content_type: &str,
        original_filename: &str,
    ) -> Result<StoredFile, ServiceError> {
        let file_type = resolve_file_type(file_type);
        let decision = self
            .validate_and_stage(order_id, Some(&file_type), content_type, data.len())
            .await?;

        let key = build_object_key(order_id, &file_type, original_filename, Utc::now());
        tracing::info!(
            "☁️  Uploading {} bytes for order {} ({}) to {}",
            data.len(),
            order_id,
            decision.category,
            key
        );

        let url = self
            .storage
            .upload_file(&key, data, content_type)
            .await
            .map_err(|e| ServiceError::UploadFailed(e.to_string()))?;

        let record = files::ActiveModel {
            id: NotSet,
            order_id: Set(order_id),
            file_url: Set(url.clone()),
            file_type: Set(file_type),
            uploaded_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            tracing::error!(
                "❌ Attachment row for order {} not recorded, object '{}' is orphaned: {}",
                order_id,
                key,
                e
            );
            ServiceError::PersistenceFailed(e.to_string())
        })?;

        tracing::info!("📎 File {} attached to order {}", record.id, order_id);

        Ok(StoredFile {
            id: record.id,
            url,
            uploaded_at: record.uploaded_at,
        })
    }

    /// Newest first. Unknown orders simply have no files.
    pub async fn list_files(&self, order_id: i32) -> Result<Vec<FileAttachment>, ServiceError> {
        let rows = Files::find()
            .filter(files::Column::OrderId.eq(order_id))
            .order_by_desc(files::Column::UploadedAt)
            .order_by_desc(files::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(FileAttachment::from).collect())
    }

    /// Every attachment row, oldest first; used by the reconciliation tool
    pub async fn all_files(&self) -> Result<Vec<files::Model>, ServiceError> {
        Ok(Files::find()
            .order_by_asc(files::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub fn storage(&self) -> &Arc<dyn StorageService> {
        &self.storage
    }
}
