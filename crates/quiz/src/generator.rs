use lectern_common::{LecternError, ModelConfig, Result};
use lectern_llm::{build_prompt, LlmClient, TaskKind};
use std::sync::Arc;
use tracing::{info, warn};

use crate::parser::parse_quiz;
use crate::types::QuizSet;

/// Quiz generator backed by an LLM client
pub struct QuizGenerator {
    client: Arc<dyn LlmClient>,
}

impl QuizGenerator {
    /// Create new quiz generator
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generate exactly `question_count` questions from a summary
    ///
    /// A malformed response or transient provider error is retried once with
    /// the same prompt.
    pub async fn generate_quiz(
        &self,
        summary: &str,
        question_count: usize,
        config: &ModelConfig,
    ) -> Result<QuizSet> {
        if question_count == 0 {
            return Err(LecternError::invalid_input("Question count must be greater than 0"));
        }
        if summary.trim().is_empty() {
            return Err(LecternError::invalid_input("Cannot generate a quiz from an empty summary"));
        }

        let prompt = build_prompt(TaskKind::GenerateQuiz { question_count }, summary, None)?;
        info!(
            "Generating quiz - Questions: {}, Model: {}",
            question_count, config.model_name
        );

        let quiz = match self.attempt(&prompt, question_count, config).await {
            Ok(quiz) => quiz,
            Err(e) if is_retryable(&e) => {
                warn!("Quiz generation failed: {}. Retrying once...", e);
                self.attempt(&prompt, question_count, config).await?
            }
            Err(e) => return Err(e),
        };

        info!("Quiz generated with {} questions", quiz.len());
        Ok(quiz)
    }

    async fn attempt(&self, prompt: &str, question_count: usize, config: &ModelConfig) -> Result<QuizSet> {
        let response = self.client.generate(prompt, config).await?;
        parse_quiz(&response, question_count)
    }
}

fn is_retryable(error: &LecternError) -> bool {
    error.is_transient() || matches!(error, LecternError::MalformedQuizResponse(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lectern_common::Provider;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Client replaying queued responses in order
    struct QueuedClient {
        responses: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl QueuedClient {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for QueuedClient {
        async fn generate(&self, prompt: &str, _config: &ModelConfig) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LecternError::model_unavailable("no scripted response")))
        }

        fn name(&self) -> &'static str {
            "queued"
        }
    }

    fn model() -> ModelConfig {
        ModelConfig::new(Provider::Gemini, "gemini-2.5-pro")
    }

    fn quiz_text(count: usize) -> String {
        (1..=count)
            .map(|n| {
                format!(
                    "QUESTION: What is fact {n}?\nA) Fact {n}\nB) Not {n}\nC) Never {n}\nD) None {n}\nANSWER: A"
                )
            })
            .collect::<Vec<_>>()
            .join("\n---\n")
    }

    #[tokio::test]
    async fn test_generates_exact_count() {
        let client = QueuedClient::new(vec![Ok(quiz_text(5))]);
        let generator = QuizGenerator::new(client.clone());

        let quiz = generator.generate_quiz("Some summary", 5, &model()).await.unwrap();
        assert_eq!(quiz.len(), 5);
        assert!(quiz.questions().iter().all(|q| q.correct_index() == 0));
        assert_eq!(client.calls(), 1);

        let prompt = client.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("create exactly 5 multiple-choice"));
        assert!(prompt.contains("Some summary"));
    }

    #[tokio::test]
    async fn test_short_response_twice_fails() {
        let client = QueuedClient::new(vec![Ok(quiz_text(3)), Ok(quiz_text(3))]);
        let generator = QuizGenerator::new(client.clone());

        let err = generator.generate_quiz("Summary", 5, &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::MalformedQuizResponse(_)));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_malformed() {
        let client = QueuedClient::new(vec![Ok("Sorry, I cannot help".to_string()), Ok(quiz_text(2))]);
        let generator = QuizGenerator::new(client.clone());

        let quiz = generator.generate_quiz("Summary", 2, &model()).await.unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_timeout() {
        let client = QueuedClient::new(vec![Err(LecternError::ModelTimeout(60)), Ok(quiz_text(1))]);
        let generator = QuizGenerator::new(client.clone());

        assert!(generator.generate_quiz("Summary", 1, &model()).await.is_ok());
    }

    #[tokio::test]
    async fn test_config_error_not_retried() {
        let client = QueuedClient::new(vec![Err(LecternError::config("GEMINI_API_KEY not found"))]);
        let generator = QuizGenerator::new(client.clone());

        let err = generator.generate_quiz("Summary", 1, &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::Config(_)));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let client = QueuedClient::new(vec![]);
        let generator = QuizGenerator::new(client.clone());

        assert!(matches!(
            generator.generate_quiz("Summary", 0, &model()).await,
            Err(LecternError::InvalidInput(_))
        ));
        assert!(matches!(
            generator.generate_quiz("  ", 3, &model()).await,
            Err(LecternError::InvalidInput(_))
        ));
        assert_eq!(client.calls(), 0);
    }
}
