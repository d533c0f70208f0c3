pub mod config;
pub mod error;
pub mod logger;
pub mod model;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::LecternError;
pub use model::{available_models, find_preset, ModelConfig, ModelPreset, Provider, DEFAULT_MODEL};
pub type Result<T> = std::result::Result<T, LecternError>;
