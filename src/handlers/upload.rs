use crate::auth::Identity;
use crate::state::AppState;
use crate::utils::{ApiError, ApiResult};
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".avi"];
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Stored object description returned to the client
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
    pub filename: String,
    pub size: u64,
    pub checksum: String,
}

/// Upload one file from the multipart field `file`
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let max_size = state.config.upload.max_file_size;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation_error("Invalid multipart data"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_default();
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::validation_error("Failed to read file"))?;
        upload = Some((filename, data));
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::validation_error("Missing file field"))?;

    let extension = allowed_extension(&filename)?;
    if data.len() as u64 > max_size {
        return Err(ApiError::validation_error(format!(
            "File too large. Maximum size is {} MB.",
            max_size / (1024 * 1024)
        )));
    }

    let mut hasher = Sha256::new();
    hasher.update(&data);
    let checksum = format!("{:x}", hasher.finalize());

    let path = object_name(&filename);
    let size = data.len() as u64;
    state
        .storage
        .upload(&path, data, content_type(&extension))
        .await?;

    info!(user_id = %identity.id, path = %path, size, "File uploaded");

    Ok(Json(UploadResponse {
        url: state.storage.public_url(&path),
        path,
        filename,
        size,
        checksum,
    }))
}

/// Remove a previously uploaded object
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(path): Path<String>,
) -> ApiResult<Json<Value>> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return Err(ApiError::validation_error("Invalid file path"));
    }

    state.storage.delete(path).await?;
    info!(user_id = %identity.id, path, "File deleted");

    Ok(Json(json!({
        "success": true,
        "message": "File deleted successfully"
    })))
}

/// Lower-cased extension, if it is one we accept
fn allowed_extension(filename: &str) -> ApiResult<String> {
    let extension = filename
        .rfind('.')
        .filter(|&dot| dot > 0)
        .map(|dot| filename[dot..].to_ascii_lowercase())
        .unwrap_or_default();

    let allowed = IMAGE_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS)
        .chain(DOCUMENT_EXTENSIONS);
    if allowed.clone().any(|ext| *ext == extension) {
        return Ok(extension);
    }

    let mut sorted: Vec<&str> = allowed.copied().collect();
    sorted.sort_unstable();
    Err(ApiError::validation_error(format!(
        "File type '{}' not allowed. Allowed: {}",
        extension,
        sorted.join(", ")
    )))
}

/// Keep only the final path component of a client supplied name
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}

fn object_name(filename: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}_{}", &id[..12], filename)
}

fn content_type(extension: &str) -> &'static str {
    match extension {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".svg" => "image/svg+xml",
        ".mp4" => "video/mp4",
        ".webm" => "video/webm",
        ".mov" => "video/quicktime",
        ".avi" => "video/x-msvideo",
        ".pdf" => "application/pdf",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
