use actix_web::{post, web, HttpResponse};
use lectern_common::LecternError;
use lectern_llm::Summarizer;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::SummarizeRequest;

/// POST /summarize - Summarize lecture text
///
/// A client disconnect drops this future and abandons pending model calls.
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if req.text.trim().is_empty() {
        return Err(LecternError::invalid_input("Text cannot be empty").into());
    }

    let model = state.resolve_model(req.model.as_deref())?;
    let client = state.client_for(&model)?;
    let summarizer = Summarizer::new(client, state.summarizer_options());

    let result = summarizer.summarize(&req.text, &model).await?;
    info!(
        "Summary ready - {} chunks, {} unavailable",
        result.chunks_processed,
        result.unavailable_chunks.len()
    );

    Ok(HttpResponse::Ok().json(result))
}
