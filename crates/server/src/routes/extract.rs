use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{post, web, HttpRequest, HttpResponse};
use futures::StreamExt;
use lectern_common::LecternError;
use lectern_source::Source;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::ExtractRequest;

/// Largest accepted document upload
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Largest accepted JSON body
const MAX_JSON_BYTES: usize = 64 * 1024;

/// POST /extract - `{"youtube": url}` or a multipart `file` field
#[post("/extract")]
pub async fn extract(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let source = if is_multipart {
        read_upload(Multipart::new(req.headers(), payload)).await?
    } else {
        let body = read_body(payload).await?;
        let request: ExtractRequest = serde_json::from_slice(&body)
            .map_err(|e| LecternError::invalid_input(format!("Invalid JSON body: {}", e)))?;
        Source::YouTube(request.youtube)
    };

    let extracted = state.extractor.extract_text(&source).await?;
    info!(
        "Extracted {} chars from {}",
        extracted.char_count(),
        extracted.source_label
    );

    Ok(HttpResponse::Ok().json(extracted))
}

async fn read_upload(mut payload: Multipart) -> Result<Source, ApiError> {
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| LecternError::invalid_input(format!("Invalid multipart body: {}", e)))?;

        let content_disposition = field.content_disposition();
        if content_disposition.get_name() != Some("file") {
            continue;
        }
        let filename = content_disposition
            .get_filename()
            .unwrap_or("unknown")
            .to_string();

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| LecternError::invalid_input(format!("Upload interrupted: {}", e)))?;
            if content.len() + data.len() > MAX_UPLOAD_BYTES {
                return Err(LecternError::invalid_input("Uploaded file is too large").into());
            }
            content.extend_from_slice(&data);
        }

        return Ok(Source::Upload { filename, content });
    }

    Err(LecternError::invalid_input("No file uploaded").into())
}

async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| LecternError::invalid_input(format!("Cannot read body: {}", e)))?;
        if body.len() + chunk.len() > MAX_JSON_BYTES {
            return Err(LecternError::invalid_input("Request body is too large").into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
