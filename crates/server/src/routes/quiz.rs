use actix_web::{post, web, HttpResponse};
use lectern_common::LecternError;
use lectern_quiz::{score, QuizAttempt, QuizGenerator};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{AnswerRequest, AttemptRequest, QuizRequest, ScoreResponse};

/// POST /quiz - Generate a quiz from a summary
#[post("/quiz")]
pub async fn generate_quiz(
    req: web::Json<QuizRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let max = state.config.max_questions;
    let count = req.question_count.unwrap_or(state.config.default_num_questions);
    if count == 0 || count > max {
        return Err(LecternError::invalid_input(format!(
            "question_count must be between 1 and {}",
            max
        ))
        .into());
    }
    if req.summary.trim().is_empty() {
        return Err(LecternError::invalid_input("Summary cannot be empty").into());
    }

    let model = state.resolve_model(req.model.as_deref())?;
    let client = state.client_for(&model)?;

    let quiz = QuizGenerator::new(client)
        .generate_quiz(&req.summary, count, &model)
        .await?;

    Ok(HttpResponse::Ok().json(quiz))
}

/// POST /quiz/answer - Record one answer, returning the updated attempt
#[post("/quiz/answer")]
pub async fn record_answer(req: web::Json<AnswerRequest>) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let attempt = match req.attempt {
        Some(attempt) if !attempt.matches(&req.quiz) => {
            return Err(LecternError::invalid_input("Attempt does not belong to this quiz").into());
        }
        Some(attempt) => attempt,
        None => QuizAttempt::new(&req.quiz),
    };

    let attempt = attempt.record_answer(req.question_index, req.option_index)?;
    Ok(HttpResponse::Ok().json(attempt))
}

/// POST /quiz/score - Score an attempt
#[post("/quiz/score")]
pub async fn score_quiz(req: web::Json<AttemptRequest>) -> Result<HttpResponse, ApiError> {
    check_attempt(&req)?;

    let result = score(&req.attempt, &req.quiz);
    Ok(HttpResponse::Ok().json(ScoreResponse::from(result)))
}

/// POST /quiz/reset - Clear all answers to try the same quiz again
#[post("/quiz/reset")]
pub async fn reset_attempt(req: web::Json<AttemptRequest>) -> Result<HttpResponse, ApiError> {
    check_attempt(&req)?;
    Ok(HttpResponse::Ok().json(req.attempt.reset()))
}

fn check_attempt(req: &AttemptRequest) -> Result<(), ApiError> {
    if !req.attempt.matches(&req.quiz) {
        return Err(LecternError::invalid_input("Attempt does not belong to this quiz").into());
    }
    Ok(())
}
