use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{ConnectInfo, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::api::response::{Acknowledgement, ApiError, Envelope};
use crate::registry::FileRecord;
use crate::AppState;

pub async fn list_files(State(state): State<Arc<AppState>>) -> Json<Envelope<Vec<FileRecord>>> {
    Envelope::success(state.files.list().await)
}

/// Accept a multipart upload: a required `file` field plus an optional
/// `uploader` text field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<FileRecord>>, ApiError> {
    let mut file_data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut file_content_type: Option<String> = None;
    let mut uploader: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_content_type = field.content_type().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "file data"))?;
                file_data = Some(data);
            }
            "uploader" => {
                uploader = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, "uploader field"))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::bad_request("file field is required"))?;
    let display_name = file_name.unwrap_or_else(|| "file".to_string());

    // MIME type: from multipart Content-Type, or guess from filename, or fallback
    let mime_type = file_content_type
        .filter(|ct| ct != "application/octet-stream")
        .or_else(|| {
            mime_guess::from_path(&display_name)
                .first()
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let record = state
        .files
        .append(
            &display_name,
            &mime_type,
            uploader.as_deref(),
            Some(addr.ip().to_string()),
            file_data,
        )
        .await?;

    tracing::debug!(file_id = record.id, storage_key = %record.storage_key, "Uploaded file");
    Ok(Envelope::success(record))
}

/// Stream file content back with download headers. The attachment filename
/// is the client's display name; the storage key never leaves the server.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let (record, data) = state.files.resolve(id).await?;

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        record
            .mime_type
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(
        header::CONTENT_LENGTH,
        header::HeaderValue::from(record.size_bytes),
    );

    if let Ok(value) = format!("attachment; filename=\"{}\"", record.display_name).parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Acknowledgement>, ApiError> {
    state.files.delete(id).await?;

    tracing::debug!(file_id = id, "Deleted file");
    Ok(Acknowledgement::success("File deleted"))
}

pub async fn clear_files(State(state): State<Arc<AppState>>) -> Json<Acknowledgement> {
    state.files.clear().await;

    tracing::warn!("Cleared all files");
    Acknowledgement::success("All files cleared")
}

/// A body that blows past the router's length limit surfaces here as a
/// multipart read failure; report it as too-large, not as a bad request.
fn multipart_error(e: MultipartError, what: &str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the maximum allowed size")
    } else {
        ApiError::bad_request(format!("Invalid {what}: {e}"))
    }
}
