use actix_web::web;

use crate::error::ApiError;
use lectern_common::LecternError;

mod extract;
mod models;
mod quiz;
mod summarize;
mod system;

/// JSON body limit (lecture transcripts can be long)
const JSON_LIMIT: usize = 4 * 1024 * 1024;

/// Register all `/api` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| ApiError(LecternError::invalid_input(err.to_string())).into());

    cfg.service(
        web::scope("/api")
            .app_data(json)
            .service(models::get_models)
            .service(system::health)
            .service(extract::extract)
            .service(summarize::summarize)
            .service(quiz::generate_quiz)
            .service(quiz::record_answer)
            .service(quiz::score_quiz)
            .service(quiz::reset_attempt),
    );
}
