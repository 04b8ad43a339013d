use crate::entities::{files, orders, users};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Schema,
};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db = connect(&database_url()?).await?;

    run_migrations(&db).await?;

    Ok(db)
}

pub fn database_url() -> anyhow::Result<String> {
    env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))
}

/// Opens the pool without touching the schema
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", redact_url(db_url));

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();

    if builder == DatabaseBackend::Postgres {
        info!("🔄 Running SQLx migrations for PostgreSQL...");
        sqlx::migrate!("./migrations")
            .run(db.get_postgres_connection_pool())
            .await?;
    } else {
        info!("🔄 Running SeaORM auto-migrations for SQLite/Other...");
        let schema = Schema::new(builder);

        // Order matters for foreign keys: users -> orders -> files
        let stmts = vec![
            (
                "users",
                schema
                    .create_table_from_entity(users::Entity)
                    .if_not_exists()
                    .to_owned(),
            ),
            (
                "orders",
                schema
                    .create_table_from_entity(orders::Entity)
                    .if_not_exists()
                    .to_owned(),
            ),
            (
                "files",
                schema
                    .create_table_from_entity(files::Entity)
                    .if_not_exists()
                    .to_owned(),
            ),
        ];

        for (name, stmt) in stmts {
            db.execute(builder.build(&stmt)).await?;
            info!("   - Table '{}' checked/created", name);
        }

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_files_order_id ON files(order_id)",
            "CREATE INDEX IF NOT EXISTS idx_files_uploaded_at ON files(uploaded_at)",
        ];
        for query in indexes {
            db.execute(sea_orm::Statement::from_string(builder, query.to_owned()))
                .await?;
        }
    }

    Ok(())
}

/// Hides the password part of a connection URL for logging
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or("");
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_leaves_schema_alone() {
        let db = connect("sqlite::memory:").await.unwrap();

        let table = db
            .query_one(sea_orm::Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'orders'",
            ))
            .await
            .unwrap();
        assert!(table.is_none());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://app:s3cret@db:5432/orders"),
            "postgres://app:***@db:5432/orders"
        );
        assert_eq!(redact_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            redact_url("postgres://db:5432/orders"),
            "postgres://db:5432/orders"
        );
    }
}
