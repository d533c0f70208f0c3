use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gemini generateContent request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns (a single user turn here)
    pub contents: Vec<GeminiContent>,

    /// Generation options
    pub generation_config: GeminiGenerationConfig,
}

/// One turn of Gemini content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Text part of a Gemini turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Gemini generation options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

/// Gemini generateContent response
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// Gemini response candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

/// DeepSeek chat completion request (OpenAI compatible)
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name (e.g., "deepseek-chat")
    pub model: String,

    /// Chat messages
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature
    pub temperature: f32,

    /// Disable streaming
    pub stream: bool,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// DeepSeek chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Result of summarizing one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Model produced a partial summary
    Summarized { index: usize, summary: String },

    /// Both attempts failed; the placeholder stands in for this chunk
    Unavailable { index: usize, reason: String },
}

impl ChunkOutcome {
    /// Chunk index this outcome belongs to
    pub fn index(&self) -> usize {
        match self {
            Self::Summarized { index, .. } | Self::Unavailable { index, .. } => *index,
        }
    }

    /// Text handed to the merge step
    pub fn merge_text(&self) -> &str {
        match self {
            Self::Summarized { summary, .. } => summary,
            Self::Unavailable { .. } => crate::prompts::CONTENT_UNAVAILABLE,
        }
    }

    pub fn is_summarized(&self) -> bool {
        matches!(self, Self::Summarized { .. })
    }
}

/// Summarization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Final summary text
    pub text: String,

    /// Indices of the chunks the summary was derived from
    pub chunk_indices: Vec<usize>,

    /// Indices replaced by the placeholder
    #[serde(default)]
    pub unavailable_chunks: Vec<usize>,

    /// Total number of chunks processed
    pub chunks_processed: usize,

    /// Model used
    pub model: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl SummaryResult {
    /// Create new summary result
    pub fn new(text: String, outcomes: &[ChunkOutcome], model: String) -> Self {
        let (summarized, unavailable): (Vec<&ChunkOutcome>, Vec<&ChunkOutcome>) =
            outcomes.iter().partition(|o| o.is_summarized());

        Self {
            text,
            chunk_indices: summarized.iter().map(|o| o.index()).collect(),
            unavailable_chunks: unavailable.iter().map(|o| o.index()).collect(),
            chunks_processed: outcomes.len(),
            model,
            created_at: Utc::now(),
        }
    }
}
