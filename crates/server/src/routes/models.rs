use actix_web::{get, web, HttpResponse};
use lectern_common::available_models;

use crate::state::AppState;
use crate::types::ModelsResponse;

/// GET /models - Model presets and the configured default
#[get("/models")]
pub async fn get_models(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ModelsResponse {
        models: available_models(),
        default: state.config.default_model.clone(),
    })
}
