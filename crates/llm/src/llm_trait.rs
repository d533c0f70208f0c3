use async_trait::async_trait;
use lectern_common::{ModelConfig, Result};

/// Common trait for LLM clients
///
/// One outbound request per call. Implementations never retry; the caller
/// owns the retry policy.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text from a prompt
    async fn generate(&self, prompt: &str, config: &ModelConfig) -> Result<String>;

    /// Provider name used in logs
    fn name(&self) -> &'static str;
}
