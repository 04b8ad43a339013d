use dotenvy::dotenv;
use utilization_backend::config::AppConfig;
use utilization_backend::infrastructure::{database, storage};
use utilization_backend::services::attachment_service::AttachmentService;
use utilization_backend::services::storage::StorageService;
use utilization_backend::utils::file_url::{FileLocation, classify};

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Default)]
struct Report {
    present: usize,
    missing: usize,
    unchecked: usize,
    local: usize,
    foreign: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reconcile_files=info,utilization_backend=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🔍 Starting attachment reconciliation (read-only)...");

    let config = AppConfig::from_env();

    info!("🔌 Connecting to database...");
    let db = database::connect(&database::database_url()?).await?;
    info!("☁️  Connecting to storage...");
    let storage = storage::setup_storage(&config).await;

    let attachments = AttachmentService::new(db, storage.clone(), config.upload_policy());
    let rows = attachments.all_files().await?;
    info!("📋 {} attachment rows to check", rows.len());

    let mut report = Report::default();
    for row in rows {
        match classify(&row.file_url, storage.endpoint(), storage.bucket()) {
            FileLocation::Bucket { key } => match storage.file_exists(&key).await {
                Ok(true) => report.present += 1,
                Ok(false) => {
                    report.missing += 1;
                    warn!(
                        "❓ File {} (order {}) points at missing object '{}'",
                        row.id, row.order_id, key
                    );
                }
                Err(e) => {
                    report.unchecked += 1;
                    error!("❌ Could not check object '{}' for file {}: {}", key, row.id, e);
                }
            },
            FileLocation::Local { path } => {
                report.local += 1;
                warn!(
                    "📁 File {} (order {}) stores a local path: {}",
                    row.id, row.order_id, path
                );
            }
            FileLocation::Foreign { url } => {
                report.foreign += 1;
                warn!(
                    "🌐 File {} (order {}) points outside the configured bucket: {}",
                    row.id, row.order_id, url
                );
            }
        }
    }

    info!(
        "✅ Done: {} present, {} missing, {} unchecked, {} local paths, {} foreign URLs",
        report.present, report.missing, report.unchecked, report.local, report.foreign
    );

    if report.missing > 0 || report.unchecked > 0 {
        std::process::exit(2);
    }

    Ok(())
}
