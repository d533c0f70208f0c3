use lectern_common::{find_preset, AppConfig, LecternError, ModelConfig, Result};
use lectern_llm::{ClientRegistry, LlmClient, SummarizerOptions};
use lectern_source::{DefaultExtractor, SourceExtractor};
use std::sync::Arc;

/// Shared application state
///
/// Read-only after startup; quiz sessions travel in request bodies.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Clients for configured providers
    pub clients: ClientRegistry,

    /// Transcript and document extraction
    pub extractor: Arc<dyn SourceExtractor>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let clients = ClientRegistry::from_config(&config)?;
        let extractor = Arc::new(DefaultExtractor::from_config(&config));
        Ok(Self::with_parts(config, clients, extractor))
    }

    /// Assemble state from prepared parts
    pub fn with_parts(config: AppConfig, clients: ClientRegistry, extractor: Arc<dyn SourceExtractor>) -> Self {
        Self {
            config,
            clients,
            extractor,
        }
    }

    /// Model config for a requested preset name, or the default
    pub fn resolve_model(&self, preset: Option<&str>) -> Result<ModelConfig> {
        if let Some(name) = preset {
            if find_preset(name).is_none() {
                return Err(LecternError::invalid_input(format!("Unknown model: {}", name)));
            }
        }
        self.config.model_config(preset)
    }

    /// Client able to serve a model config
    pub fn client_for(&self, model: &ModelConfig) -> Result<Arc<dyn LlmClient>> {
        self.clients.get(model.provider)
    }

    pub fn summarizer_options(&self) -> SummarizerOptions {
        SummarizerOptions::from_config(&self.config)
    }
}
