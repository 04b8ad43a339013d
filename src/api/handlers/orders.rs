use crate::AppState;
use crate::api::error::AppError;
use crate::services::order_service::{OrderDetail, OrderSummary, Page};
use axum::{
    Form, Json,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct CreateOrderForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "client_name is required"))]
    pub client_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "client_phone is required"))]
    pub client_phone: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub status: String,
    pub order_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema, Validate)]
pub struct UpdateStatusForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "status must be between 1 and 50 characters"))]
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub status: String,
    pub order_id: i32,
    pub new_status: String,
}

#[derive(Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Page size; all orders when omitted
    pub limit: Option<u64>,
    /// Rows to skip from the newest order
    pub offset: Option<u64>,
}

/// Comment stored for a client-submitted order
pub fn compose_comment(client_name: &str, client_phone: &str, comment: &str) -> String {
    format!(
        "Имя: {}; Телефон: {}; Комментарий: {}",
        client_name.trim(),
        client_phone.trim(),
        comment.trim()
    )
}

#[utoipa::path(
    post,
    path = "/order/create",
    request_body(content = CreateOrderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Missing client name or phone"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    form: Result<Form<CreateOrderForm>, FormRejection>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let Form(form) = form?;
    form.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = compose_comment(&form.client_name, &form.client_phone, &form.comment);
    let created = state.order_service.create_order(&comment).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            status: "ok".to_string(),
            order_id: created.id,
            created_at: created.created_at,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/order/list",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders, newest first", body = [OrderSummary]),
        (status = 400, description = "Invalid page size")
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let Query(query) = query?;
    if query.limit == Some(0) {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }

    let orders = state
        .order_service
        .list_orders(Page {
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/order/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order details", body = OrderDetail),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<OrderDetail>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.order_service.get_order(id).await?))
}

#[utoipa::path(
    post,
    path = "/order/{id}/status",
    params(("id" = i32, Path, description = "Order id")),
    request_body(content = UpdateStatusForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusResponse),
        (status = 400, description = "Empty status"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    form: Result<Form<UpdateStatusForm>, FormRejection>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let Path(id) = id?;
    let Form(form) = form?;
    form.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if form.status.trim().is_empty() {
        return Err(AppError::BadRequest("status must not be blank".to_string()));
    }

    let change = state.order_service.update_status(id, &form.status).await?;

    Ok(Json(UpdateStatusResponse {
        status: "ok".to_string(),
        order_id: change.id,
        new_status: change.new_status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_comment() {
        assert_eq!(
            compose_comment(" A ", "1", "test"),
            "Имя: A; Телефон: 1; Комментарий: test"
        );
        assert_eq!(
            compose_comment("Иван", "+7 900", ""),
            "Имя: Иван; Телефон: +7 900; Комментарий: "
        );
    }

    #[test]
    fn test_create_form_requires_name_and_phone() {
        let form = CreateOrderForm {
            client_name: String::new(),
            client_phone: "1".to_string(),
            comment: String::new(),
        };
        assert!(form.validate().is_err());

        let form = CreateOrderForm {
            client_name: "A".to_string(),
            client_phone: "1".to_string(),
            comment: String::new(),
        };
        assert!(form.validate().is_ok());
    }
}
