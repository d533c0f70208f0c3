use crate::error::LecternError;
use crate::model::{find_preset, ModelConfig, Provider, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Lectern application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// DeepSeek API key
    pub deepseek_api_key: Option<String>,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// DeepSeek API base URL
    pub deepseek_base_url: String,

    /// Default model preset name
    pub default_model: String,

    /// Deadline for a single model call in seconds
    pub model_timeout_secs: u64,

    /// Maximum tokens generated per call
    pub max_output_tokens: u32,

    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Number of chunk summaries requested concurrently
    pub chunk_concurrency: usize,

    /// Default quiz length
    pub default_num_questions: usize,

    /// Upper bound on quiz length accepted from users
    pub max_questions: usize,

    /// yt-dlp executable
    pub ytdlp_path: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Directory with the browser UI, served at "/"
    pub static_dir: Option<PathBuf>,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            deepseek_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            deepseek_base_url: "https://api.deepseek.com".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            model_timeout_secs: 60,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            chunk_size: 8000,
            chunk_overlap: 500,
            chunk_concurrency: 1,
            default_num_questions: 5,
            max_questions: 10,
            ytdlp_path: "yt-dlp".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            static_dir: None,
            log_dir: PathBuf::from("./logs"),
            log_level: "info".to_string(),
        }
    }
}

// API keys never reach logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("AppConfig")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("deepseek_api_key", &redact(&self.deepseek_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("deepseek_base_url", &self.deepseek_base_url)
            .field("default_model", &self.default_model)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("chunk_concurrency", &self.chunk_concurrency)
            .field("default_num_questions", &self.default_num_questions)
            .field("max_questions", &self.max_questions)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("static_dir", &self.static_dir)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, LecternError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            deepseek_api_key: non_empty("DEEPSEEK_API_KEY"),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            deepseek_base_url: non_empty("DEEPSEEK_BASE_URL")
                .unwrap_or(defaults.deepseek_base_url),
            default_model: non_empty("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            model_timeout_secs: parse_var(non_empty("MODEL_TIMEOUT_SECS")).unwrap_or(defaults.model_timeout_secs),
            max_output_tokens: parse_var(non_empty("MAX_OUTPUT_TOKENS")).unwrap_or(defaults.max_output_tokens),
            chunk_size: parse_var(non_empty("CHUNK_SIZE")).unwrap_or(defaults.chunk_size),
            chunk_overlap: parse_var(non_empty("CHUNK_OVERLAP")).unwrap_or(defaults.chunk_overlap),
            chunk_concurrency: parse_var(non_empty("CHUNK_CONCURRENCY")).unwrap_or(defaults.chunk_concurrency),
            default_num_questions: parse_var(non_empty("DEFAULT_NUM_QUESTIONS"))
                .unwrap_or(defaults.default_num_questions),
            max_questions: parse_var(non_empty("MAX_QUESTIONS")).unwrap_or(defaults.max_questions),
            ytdlp_path: non_empty("YTDLP_PATH").unwrap_or(defaults.ytdlp_path),
            server_host: non_empty("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(non_empty("SERVER_PORT")).unwrap_or(defaults.server_port),
            static_dir: non_empty("STATIC_DIR").map(PathBuf::from),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// API key for the given provider
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini_api_key.as_deref(),
            Provider::DeepSeek => self.deepseek_api_key.as_deref(),
        }
    }

    /// Base URL for the given provider
    pub fn base_url(&self, provider: Provider) -> &str {
        match provider {
            Provider::Gemini => &self.gemini_base_url,
            Provider::DeepSeek => &self.deepseek_base_url,
        }
    }

    /// Deadline for a single model call
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Resolve a preset name (or the default model) into a model config
    pub fn model_config(&self, preset: Option<&str>) -> Result<ModelConfig, LecternError> {
        let name = preset.unwrap_or(&self.default_model);
        Ok(ModelConfig::from_preset(name)?.with_max_output_tokens(self.max_output_tokens))
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), LecternError> {
        if find_preset(&self.default_model).is_none() {
            return Err(LecternError::config(format!(
                "Unknown default model: {}",
                self.default_model
            )));
        }

        for url in [&self.gemini_base_url, &self.deepseek_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LecternError::config(format!(
                    "Provider base URL must start with http:// or https://: {}",
                    url
                )));
            }
        }

        if self.chunk_size == 0 {
            return Err(LecternError::config("Chunk size cannot be 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(LecternError::config("Chunk overlap must be smaller than chunk size"));
        }

        if self.chunk_concurrency == 0 {
            return Err(LecternError::config("Chunk concurrency cannot be 0"));
        }

        if self.model_timeout_secs == 0 {
            return Err(LecternError::config("Model timeout cannot be 0"));
        }

        if self.default_num_questions == 0 || self.default_num_questions > self.max_questions {
            return Err(LecternError::config(
                "Default question count must be between 1 and the maximum",
            ));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(LecternError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

/// Parse an optional raw value, ignoring malformed input
fn parse_var<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}
