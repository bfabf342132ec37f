use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{delete, post},
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    dto::uploads::{DeleteFileRequest, ImageUploadResponse, ReceiptUploadResponse, UploadForm},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::upload_service::{self, MAX_UPLOAD_BYTES},
    state::AppState,
};

// Hard ceiling on the raw request; the per-file 5MB check happens while streaming.
const UPLOAD_BODY_LIMIT: usize = 4 * MAX_UPLOAD_BYTES;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .route("/receipt", post(upload_receipt))
        .route("/file", delete(delete_file))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT))
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<ImageUploadResponse>),
        (status = 400, description = "Not an image or larger than 5MB"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ImageUploadResponse>>> {
    let resp = upload_service::upload_image(&state, &user, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/upload/receipt",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Receipt stored", body = ApiResponse<ReceiptUploadResponse>),
        (status = 400, description = "Not an image or PDF, or larger than 5MB"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ReceiptUploadResponse>>> {
    let resp = upload_service::upload_receipt(&state, &user, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/upload/file",
    request_body = DeleteFileRequest,
    responses(
        (status = 200, description = "File deleted"),
        (status = 400, description = "Missing or unsafe file name"),
        (status = 404, description = "File not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteFileRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = upload_service::delete_file(&state, &user, payload).await?;
    Ok(Json(resp))
}
