//! Lectern LLM Integration
//!
//! Gemini and DeepSeek clients, prompt templates, chunking and
//! map-reduce summarization

mod chunking;
mod client;
mod deepseek;
mod factory;
mod gemini;
mod llm_trait;
mod prompts;
mod summarize;
mod types;

pub use chunking::{chunk_text, estimate_tokens, reassemble, TextChunk};
pub use deepseek::DeepSeekClient;
pub use factory::{create_client, ClientRegistry};
pub use gemini::GeminiClient;
pub use llm_trait::LlmClient;
pub use prompts::{build_prompt, TaskKind, CONTENT_UNAVAILABLE, QUIZ_DELIMITER};
pub use summarize::{Summarizer, SummarizerOptions};
pub use types::{ChunkOutcome, SummaryResult};
