#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use utilization_backend::AppState;
use utilization_backend::config::AppConfig;
use utilization_backend::infrastructure::database;
use utilization_backend::services::storage::StorageService;
use utilization_backend::utils::file_url::object_url;

pub const ENDPOINT: &str = "https://storage.test";
pub const BUCKET: &str = "orders-test";
pub const MB: usize = 1024 * 1024;

pub async fn setup_test_db() -> DatabaseConnection {
    // One connection: every pooled connection would otherwise get its own in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MockStorageService {
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub upload_calls: AtomicUsize,
    pub fail_uploads: AtomicBool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let storage = Self::default();
        storage.fail_uploads.store(true, Ordering::SeqCst);
        storage
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn upload_file(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("AccessDenied: mock storage rejects uploads"));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(object_url(ENDPOINT, BUCKET, key))
    }

    async fn file_exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    fn bucket(&self) -> &str {
        BUCKET
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        s3_endpoint: ENDPOINT.to_string(),
        s3_bucket: BUCKET.to_string(),
        ..AppConfig::development()
    }
}

pub async fn setup_state(storage: Arc<MockStorageService>) -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, storage, test_config())
}
