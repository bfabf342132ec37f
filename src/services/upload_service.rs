use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart};
use tokio::fs;
use uuid::Uuid;

use crate::{
    dto::uploads::{DeleteFileRequest, ImageUploadResponse, ReceiptUploadResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const URL_PREFIX: &str = "/uploads/";
const FILE_FIELD: &str = "file";
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Receipt,
}

impl UploadKind {
    fn prefix(self) -> &'static str {
        match self {
            UploadKind::Image => "",
            UploadKind::Receipt => "receipt_",
        }
    }

    pub fn accepts(self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        let is_image = content_type.starts_with("image/");
        match self {
            UploadKind::Image => is_image,
            UploadKind::Receipt => is_image || content_type == "application/pdf",
        }
    }

    fn rejection(self) -> &'static str {
        match self {
            UploadKind::Image => "Only image files are allowed",
            UploadKind::Receipt => "Only image files (JPG, PNG, ...) or PDF are allowed",
        }
    }
}

pub fn validate_content_type(kind: UploadKind, content_type: Option<&str>) -> AppResult<String> {
    match content_type {
        Some(ct) if kind.accepts(ct) => Ok(ct.trim().to_string()),
        _ => Err(AppError::BadRequest(kind.rejection().into())),
    }
}

pub fn validate_size(size: usize) -> AppResult<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest("File must not be larger than 5MB".into()));
    }
    Ok(())
}

/// Rejects anything that could name a path outside the upload directory.
pub fn validate_file_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::BadRequest("File name is required".into()));
    }
    if name == "." || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AppError::BadRequest("Invalid file name".into()));
    }
    Ok(())
}

/// `.ext` of the client supplied name, kept only when short and alphanumeric.
pub fn safe_extension(original: Option<&str>) -> String {
    let Some(original) = original else {
        return String::new();
    };
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

pub fn generate_file_name(kind: UploadKind, original: Option<&str>) -> String {
    format!("{}{}{}", kind.prefix(), Uuid::new_v4(), safe_extension(original))
}

/// Uploaded files on local disk, all directly under one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        validate_file_name(name)?;
        let root = std::path::absolute(&self.root)?;
        let path = root.join(name);
        if path.parent() != Some(root.as_path()) {
            return Err(AppError::BadRequest("File path not allowed".into()));
        }
        Ok(path)
    }

    pub async fn save(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.resolve(name)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(&path, bytes).await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("file", name))
            }
            Err(err) => Err(err.into()),
        }
    }
}

struct StoredUpload {
    file_name: String,
    content_type: String,
    size: usize,
}

/// Reads the `file` field with the size cap enforced while streaming.
async fn read_capped(field: &mut Field<'_>) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        validate_size(data.len() + chunk.len())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn store_upload(
    state: &AppState,
    kind: UploadKind,
    mut multipart: Multipart,
) -> AppResult<StoredUpload> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = validate_content_type(kind, field.content_type())?;
        let file_name = generate_file_name(kind, field.file_name());
        let data = read_capped(&mut field).await?;
        if data.is_empty() {
            return Err(AppError::BadRequest("File is empty".into()));
        }

        state.files.save(&file_name, &data).await?;
        tracing::info!(file = %file_name, size = data.len(), content_type = %content_type, "file stored");

        return Ok(StoredUpload {
            file_name,
            content_type,
            size: data.len(),
        });
    }

    Err(AppError::BadRequest(format!(
        "multipart field `{FILE_FIELD}` is required"
    )))
}

pub async fn upload_image(
    state: &AppState,
    _user: &AuthUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<ImageUploadResponse>> {
    let stored = store_upload(state, UploadKind::Image, multipart).await?;
    Ok(ApiResponse::success(
        "Image uploaded",
        ImageUploadResponse {
            url: format!("{URL_PREFIX}{}", stored.file_name),
        },
        Some(Meta::empty()),
    ))
}

pub async fn upload_receipt(
    state: &AppState,
    _user: &AuthUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<ReceiptUploadResponse>> {
    let stored = store_upload(state, UploadKind::Receipt, multipart).await?;
    Ok(ApiResponse::success(
        "Receipt uploaded",
        ReceiptUploadResponse {
            url: format!("{URL_PREFIX}{}", stored.file_name),
            file_name: stored.file_name,
            file_type: stored.content_type,
            size: stored.size as u64,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_file(
    state: &AppState,
    user: &AuthUser,
    payload: DeleteFileRequest,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(user)?;
    let name = payload.file_name.unwrap_or_default();
    let name = name.trim();
    state.files.delete(name).await?;
    tracing::info!(file = %name, "file deleted");
    Ok(ApiResponse::message("File deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_uploads_accept_only_images() {
        assert!(validate_content_type(UploadKind::Image, Some("image/png")).is_ok());
        assert!(validate_content_type(UploadKind::Image, Some("application/pdf")).is_err());
        assert!(validate_content_type(UploadKind::Image, None).is_err());
    }

    #[test]
    fn receipts_accept_images_and_pdf() {
        assert!(validate_content_type(UploadKind::Receipt, Some("image/jpeg")).is_ok());
        assert!(validate_content_type(UploadKind::Receipt, Some("application/pdf")).is_ok());
        assert!(validate_content_type(UploadKind::Receipt, Some("text/plain")).is_err());
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_size(MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn traversal_names_are_rejected() {
        for name in ["", ".", "..", "../etc/passwd", "a/b.png", "a\\b.png", "x..png"] {
            assert!(validate_file_name(name).is_err(), "{name:?} should be rejected");
        }
        assert!(validate_file_name("receipt_1234.pdf").is_ok());
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(safe_extension(Some("photo.JPG")), ".jpg");
        assert_eq!(safe_extension(Some("dir/archive.tar.gz")), ".gz");
        assert_eq!(safe_extension(Some("weird.p/ng")), "");
        assert_eq!(safe_extension(Some(".hidden")), "");
        assert_eq!(safe_extension(Some("noext")), "");
        assert_eq!(safe_extension(None), "");
    }

    #[test]
    fn generated_names_carry_kind_prefix() {
        let name = generate_file_name(UploadKind::Receipt, Some("scan.pdf"));
        assert!(name.starts_with("receipt_"));
        assert!(name.ends_with(".pdf"));
        assert!(validate_file_name(&name).is_ok());
    }

    #[tokio::test]
    async fn file_store_saves_and_deletes_inside_root() {
        let root = std::env::temp_dir().join(format!("perfume-store-{}", Uuid::new_v4()));
        let store = FileStore::new(&root);

        store.save("a.png", b"png").await.unwrap();
        assert!(root.join("a.png").exists());

        store.delete("a.png").await.unwrap();
        assert!(!root.join("a.png").exists());
        assert!(matches!(store.delete("a.png").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.delete("../a.png").await,
            Err(AppError::BadRequest(_))
        ));

        let _ = std::fs::remove_dir_all(root);
    }
}
