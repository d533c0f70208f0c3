//! Model catalog
//!
//! Providers, per-call model parameters and the named presets offered to users

use crate::error::LecternError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preset used when nothing else is configured
pub const DEFAULT_MODEL: &str = "Gemini 2.5 Pro";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default maximum output length in tokens
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Backing LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    DeepSeek,
}

impl Provider {
    /// Environment variable holding the API key for this provider
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::DeepSeek => write!(f, "deepseek"),
        }
    }
}

impl FromStr for Provider {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "deepseek" => Ok(Self::DeepSeek),
            other => Err(LecternError::config(format!("Unknown provider: {}", other))),
        }
    }
}

/// Parameters governing a single model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider serving the model
    pub provider: Provider,

    /// Provider-side model name (e.g., "gemini-2.5-pro")
    pub model_name: String,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,

    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl ModelConfig {
    /// Create config with default sampling parameters
    pub fn new(provider: Provider, model_name: impl Into<String>) -> Self {
        Self {
            provider,
            model_name: model_name.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Build config from a preset display name (e.g., "DeepSeek Chat")
    pub fn from_preset(name: &str) -> Result<Self, LecternError> {
        find_preset(name)
            .map(|preset| preset.model_config())
            .ok_or_else(|| LecternError::config(format!("Unknown model: {}", name)))
    }

    /// Override maximum output length
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Named model offered in the model menu
#[derive(Debug, Clone, Serialize)]
pub struct ModelPreset {
    /// Display name (e.g., "Gemini 2.5 Pro")
    pub name: &'static str,

    /// Backing provider
    pub provider: Provider,

    /// Provider-side model name
    pub model_name: &'static str,
}

impl ModelPreset {
    /// Model config with default sampling parameters
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(self.provider, self.model_name)
    }
}

/// Available model presets
pub fn available_models() -> Vec<ModelPreset> {
    vec![
        ModelPreset {
            name: "Gemini 2.5 Pro",
            provider: Provider::Gemini,
            model_name: "gemini-2.5-pro",
        },
        ModelPreset {
            name: "Gemini 2.5 Flash",
            provider: Provider::Gemini,
            model_name: "gemini-2.5-flash",
        },
        ModelPreset {
            name: "Gemini 1.5 Flash",
            provider: Provider::Gemini,
            model_name: "gemini-1.5-flash",
        },
        ModelPreset {
            name: "DeepSeek Chat",
            provider: Provider::DeepSeek,
            model_name: "deepseek-chat",
        },
        ModelPreset {
            name: "DeepSeek Reasoner",
            provider: Provider::DeepSeek,
            model_name: "deepseek-reasoner",
        },
    ]
}

/// Look up a preset by display name (case-insensitive)
pub fn find_preset(name: &str) -> Option<ModelPreset> {
    let name = name.trim();
    available_models()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_models() {
        let models = available_models();
        assert_eq!(models.len(), 5);
        assert!(models.iter().any(|m| m.name == DEFAULT_MODEL));
        assert!(models.iter().any(|m| m.provider == Provider::DeepSeek));
    }

    #[test]
    fn test_from_preset() {
        let config = ModelConfig::from_preset("deepseek chat").unwrap();
        assert_eq!(config.provider, Provider::DeepSeek);
        assert_eq!(config.model_name, "deepseek-chat");
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);

        assert!(ModelConfig::from_preset("GPT-9").is_err());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("deepseek".parse::<Provider>().unwrap(), Provider::DeepSeek);
        assert!("openai".parse::<Provider>().is_err());
        assert_eq!(Provider::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_provider_serde() {
        let json = serde_json::to_string(&Provider::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
    }
}
