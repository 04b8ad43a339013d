use crate::config::AppConfig;
use crate::services::storage::S3StorageService;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> Arc<S3StorageService> {
    info!(
        "☁️  S3 Storage: {} (Bucket: {}, Region: {})",
        config.s3_endpoint, config.s3_bucket, config.s3_region
    );

    let mut loader = aws_config::from_env()
        .endpoint_url(&config.s3_endpoint)
        .region(Region::new(config.s3_region.clone()));

    match (&config.s3_access_key, &config.s3_secret_key) {
        (Some(access_key), Some(secret_key)) => {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "static",
            ));
        }
        _ => info!("🔑 S3 static credentials not set, using the default credential chain"),
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.s3_force_path_style)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    Arc::new(S3StorageService::new(
        s3_client,
        config.s3_endpoint.clone(),
        config.s3_bucket.clone(),
    ))
}
