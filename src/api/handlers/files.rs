use crate::AppState;
use crate::api::error::AppError;
use crate::services::attachment_service::FileAttachment;
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
    },
    http::StatusCode,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Multipart body accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFileForm {
    /// "act", "video", or any other tag (defaults to "other")
    pub file_type: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    pub file_id: i32,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

struct IncomingFile {
    filename: String,
    content_type: String,
    data: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    let err_msg = e.to_string();
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE || err_msg.contains("length limit exceeded") {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(err_msg)
    }
}

#[utoipa::path(
    post,
    path = "/order/{id}/files",
    params(("id" = i32, Path, description = "Order id")),
    request_body(content = UploadFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored and attached", body = UploadResponse),
        (status = 400, description = "No file provided"),
        (status = 404, description = "Order not found"),
        (status = 413, description = "File exceeds the limit for its type"),
        (status = 415, description = "Content type not allowed for the file type"),
        (status = 502, description = "Object storage upload failed")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let Path(order_id) = order_id?;
    let mut multipart = multipart?;
    let mut file_type: Option<String> = None;
    let mut incoming: Option<IncomingFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("unnamed").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            incoming = Some(IncomingFile {
                filename,
                content_type,
                data,
            });
        } else if name == "file_type" {
            let text = field.text().await.map_err(multipart_error)?;
            if !text.trim().is_empty() {
                file_type = Some(text);
            }
        }
    }

    let file = incoming.ok_or(AppError::BadRequest("No file provided".to_string()))?;

    let stored = state
        .attachment_service
        .store_file(
            order_id,
            file_type.as_deref(),
            file.data,
            &file.content_type,
            &file.filename,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            status: "ok".to_string(),
            file_id: stored.id,
            url: stored.url,
            uploaded_at: stored.uploaded_at,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/order/{id}/files",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Attachments, newest first", body = [FileAttachment])
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<FileAttachment>>, AppError> {
    let Path(order_id) = order_id?;
    Ok(Json(state.attachment_service.list_files(order_id).await?))
}
