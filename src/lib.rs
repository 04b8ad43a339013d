pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::attachment_service::AttachmentService;
use crate::services::order_service::OrderService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::root,
        api::handlers::health::health_check,
        api::handlers::orders::create_order,
        api::handlers::orders::list_orders,
        api::handlers::orders::get_order,
        api::handlers::orders::update_status,
        api::handlers::files::upload_file,
        api::handlers::files::list_files,
    ),
    components(
        schemas(
            api::handlers::health::RootResponse,
            api::handlers::health::HealthResponse,
            api::handlers::orders::CreateOrderForm,
            api::handlers::orders::CreateOrderResponse,
            api::handlers::orders::UpdateStatusForm,
            api::handlers::orders::UpdateStatusResponse,
            api::handlers::files::UploadFileForm,
            api::handlers::files::UploadResponse,
            services::order_service::OrderSummary,
            services::order_service::OrderDetail,
            services::attachment_service::FileAttachment,
        )
    ),
    tags(
        (name = "orders", description = "Order lifecycle endpoints"),
        (name = "files", description = "Order attachment endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub order_service: Arc<OrderService>,
    pub attachment_service: Arc<AttachmentService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let order_service = Arc::new(OrderService::new(db.clone(), config.closing_terms()));
        let attachment_service = Arc::new(AttachmentService::new(
            db.clone(),
            storage.clone(),
            config.upload_policy(),
        ));

        Self {
            db,
            storage,
            order_service,
            attachment_service,
            config,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::health::root))
        .route("/health", get(api::handlers::health::health_check))
        .route("/order/create", post(api::handlers::orders::create_order))
        .route("/order/list", get(api::handlers::orders::list_orders))
        .route("/order/:id", get(api::handlers::orders::get_order))
        .route(
            "/order/:id/status",
            post(api::handlers::orders::update_status),
        )
        .route(
            "/order/:id/files",
            get(api::handlers::files::list_files).post(api::handlers::files::upload_file),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_request_size(),
        ))
        .with_state(state)
}
