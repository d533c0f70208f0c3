use lectern_common::{AppConfig, LecternError, Provider, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::deepseek::DeepSeekClient;
use crate::gemini::GeminiClient;
use crate::llm_trait::LlmClient;

/// Build the client for a provider from application configuration
pub fn create_client(provider: Provider, config: &AppConfig) -> Result<Arc<dyn LlmClient>> {
    let api_key = config.api_key(provider).ok_or_else(|| {
        LecternError::config(format!(
            "{} not found. Please set it in your .env file.",
            provider.api_key_env()
        ))
    })?;

    let base_url = config.base_url(provider);
    let timeout = config.model_timeout();

    let client: Arc<dyn LlmClient> = match provider {
        Provider::Gemini => Arc::new(GeminiClient::new(api_key, base_url, timeout)?),
        Provider::DeepSeek => Arc::new(DeepSeekClient::new(api_key, base_url, timeout)?),
    };

    Ok(client)
}

/// Clients for every provider with credentials, built once at startup
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<Provider, Arc<dyn LlmClient>>,
}

impl ClientRegistry {
    /// Build clients for all configured providers
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut registry = Self::default();

        for provider in [Provider::Gemini, Provider::DeepSeek] {
            if config.api_key(provider).is_none() {
                warn!("{} is not set; {} models are disabled", provider.api_key_env(), provider);
                continue;
            }
            registry.insert(provider, create_client(provider, config)?);
        }

        info!("LLM providers available: {:?}", registry.providers());
        Ok(registry)
    }

    /// Register a client for a provider
    pub fn insert(&mut self, provider: Provider, client: Arc<dyn LlmClient>) {
        self.clients.insert(provider, client);
    }

    /// Client for a provider
    pub fn get(&self, provider: Provider) -> Result<Arc<dyn LlmClient>> {
        self.clients.get(&provider).cloned().ok_or_else(|| {
            LecternError::config(format!(
                "{} not found. Please set it in your .env file.",
                provider.api_key_env()
            ))
        })
    }

    /// Providers with a registered client
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.clients.keys().copied().collect();
        providers.sort_by_key(|p| p.to_string());
        providers
    }
}
