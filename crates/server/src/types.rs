use lectern_common::ModelPreset;
use lectern_quiz::{Grade, QuizAttempt, QuizSet, Score};
use serde::{Deserialize, Serialize};

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// GET /models
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelPreset>,
    pub default: String,
}

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<String>,
}

/// POST /extract (JSON form)
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// YouTube URL or video id
    pub youtube: String,
}

/// POST /summarize
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Lecture text
    pub text: String,

    /// Preset name; the configured default when omitted
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /quiz
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    /// Summary to generate questions from
    pub summary: String,

    /// Number of questions
    #[serde(default)]
    pub question_count: Option<usize>,

    #[serde(default)]
    pub model: Option<String>,
}

/// POST /quiz/answer
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub quiz: QuizSet,

    /// Attempt so far; a fresh one when omitted
    #[serde(default)]
    pub attempt: Option<QuizAttempt>,

    pub question_index: usize,
    pub option_index: usize,
}

/// POST /quiz/score and /quiz/reset
#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    pub quiz: QuizSet,
    pub attempt: QuizAttempt,
}

/// Score with its display values
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub score: Score,
    pub percentage: f64,
    pub grade: Grade,
    pub grade_label: String,
}

impl From<Score> for ScoreResponse {
    fn from(score: Score) -> Self {
        let grade = score.grade();
        Self {
            percentage: score.percentage(),
            grade,
            grade_label: grade.to_string(),
            score,
        }
    }
}
