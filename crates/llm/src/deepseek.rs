use async_trait::async_trait;
use lectern_common::{LecternError, ModelConfig, Provider, Result};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::client::HttpTransport;
use crate::llm_trait::LlmClient;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// DeepSeek API client (OpenAI-compatible chat completions)
#[derive(Clone)]
pub struct DeepSeekClient {
    transport: HttpTransport,
    base_url: String,
    api_key: String,
}

impl DeepSeekClient {
    /// Create new DeepSeek client
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let transport = HttpTransport::new(timeout)?;

        info!("DeepSeek client initialized: {}", base_url);
        Ok(Self {
            transport,
            base_url,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl LlmClient for DeepSeekClient {
    #[instrument(skip(self, prompt, config), fields(model = %config.model_name, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, config: &ModelConfig) -> Result<String> {
        if config.provider != Provider::DeepSeek {
            return Err(LecternError::invalid_input(format!(
                "DeepSeek client cannot serve {} models",
                config.provider
            )));
        }

        let request = ChatRequest {
            model: config.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
            stream: false,
        };

        debug!("Sending chat completion request to DeepSeek");
        let builder = self
            .transport
            .post(&format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request);

        let response: ChatResponse = self.transport.send_json(self.name(), builder).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LecternError::model_unavailable("Empty response from deepseek"));
        }

        debug!(response_len = text.len(), "Received DeepSeek response");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model() -> ModelConfig {
        ModelConfig::new(Provider::DeepSeek, "deepseek-chat")
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer ds-key"))
            .and(body_partial_json(json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "Explain entropy"}],
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Entropy measures disorder."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DeepSeekClient::new("ds-key", format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        let text = client.generate("Explain entropy", &model()).await.unwrap();
        assert_eq!(text, "Entropy measures disorder.");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let client = DeepSeekClient::new("ds-key", server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn test_no_choices_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = DeepSeekClient::new("ds-key", server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(matches!(err, LecternError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        // Nothing listens on the discard port
        let client = DeepSeekClient::new("ds-key", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.generate("prompt", &model()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
