use crate::utils::file_url::object_url;
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Single put of `data` under `key`; returns the object's URL
    async fn upload_file(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;
    async fn file_exists(&self, key: &str) -> Result<bool>;
    fn endpoint(&self) -> &str;
    fn bucket(&self) -> &str;
}

pub struct S3StorageService {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, endpoint: String, bucket: String) -> Self {
        Self {
            client,
            endpoint,
            bucket,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload_file(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        let content_type = if content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            content_type
        };

        let res = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: bucket={}, key={}, error={:?}",
                self.bucket,
                key,
                e
            );
            return Err(e.into());
        }

        Ok(object_url(&self.endpoint, &self.bucket, key))
    }

    async fn file_exists(&self, key: &str) -> Result<bool> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow::anyhow!(service_error))
                }
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
