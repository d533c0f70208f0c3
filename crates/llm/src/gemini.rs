use async_trait::async_trait;
use lectern_common::{LecternError, ModelConfig, Provider, Result};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::client::HttpTransport;
use crate::llm_trait::LlmClient;
use crate::types::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse};

/// Google Gemini API client (Generative Language REST API)
#[derive(Clone)]
pub struct GeminiClient {
    transport: HttpTransport,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let transport = HttpTransport::new(timeout)?;

        info!("Gemini client initialized: {} (timeout {:?})", base_url, transport.timeout());
        Ok(Self {
            transport,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    #[instrument(skip(self, prompt, config), fields(model = %config.model_name, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, config: &ModelConfig) -> Result<String> {
        if config.provider != Provider::Gemini {
            return Err(LecternError::invalid_input(format!(
                "Gemini client cannot serve {} models",
                config.provider
            )));
        }

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        };

        debug!("Sending generateContent request to Gemini");
        let builder = self
            .transport
            .post(&self.endpoint(&config.model_name))
            .header("x-goog-api-key", &self.api_key)
            .json(&request);

        let response: GeminiResponse = self.transport.send_json(self.name(), builder).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LecternError::model_unavailable("Empty response from gemini"));
        }

        debug!(response_len = text.len(), "Received Gemini response");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model() -> ModelConfig {
        ModelConfig::new(Provider::Gemini, "gemini-2.5-flash")
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "Summarize this"}]}],
                "generationConfig": {"maxOutputTokens": 8192}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Short "}, {"text": "summary"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", server.uri(), Duration::from_secs(5)).unwrap();
        let text = client.generate("Summarize this", &model()).await.unwrap();
        assert_eq!(text, "Short summary");
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "status": "RESOURCE_EXHAUSTED", "message": "quota for key test-key"}
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::QuotaExceeded(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("k", server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = GeminiClient::new("k", server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"candidates": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new("k", server.uri(), Duration::from_secs(1)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::ModelTimeout(1)));
    }

    #[tokio::test]
    async fn test_rejects_other_provider_config() {
        let client = GeminiClient::new("k", "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let config = ModelConfig::new(Provider::DeepSeek, "deepseek-chat");
        let err = client.generate("prompt", &config).await.unwrap_err();
        assert!(matches!(err, LecternError::InvalidInput(_)));
    }
}
