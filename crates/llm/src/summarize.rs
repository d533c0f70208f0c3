use futures::stream::{self, StreamExt};
use lectern_common::{AppConfig, LecternError, ModelConfig, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chunking::{chunk_text, TextChunk};
use crate::llm_trait::LlmClient;
use crate::prompts::{build_prompt, TaskKind};
use crate::types::{ChunkOutcome, SummaryResult};

/// Separator between partial summaries in the merge prompt
const SUMMARY_SEPARATOR: &str = "\n\n---\n\n";

/// Chunking and scheduling options
#[derive(Debug, Clone)]
pub struct SummarizerOptions {
    /// Maximum chunk size in characters; shorter texts are summarized in one call
    pub max_chunk_size: usize,

    /// Characters repeated between consecutive chunks
    pub chunk_overlap: usize,

    /// Chunk summaries requested at once
    pub concurrency: usize,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: 8000,
            chunk_overlap: 500,
            concurrency: 1,
        }
    }
}

impl SummarizerOptions {
    /// Options from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            concurrency: config.chunk_concurrency,
        }
    }
}

/// Summarizer for long text using map-reduce strategy
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    options: SummarizerOptions,
}

impl Summarizer {
    /// Create new summarizer
    pub fn new(client: Arc<dyn LlmClient>, options: SummarizerOptions) -> Self {
        Self { client, options }
    }

    /// Summarize text of any length
    pub async fn summarize(&self, text: &str, config: &ModelConfig) -> Result<SummaryResult> {
        self.summarize_cancellable(text, config, &CancellationToken::new())
            .await
    }

    /// Summarize text, abandoning all pending model calls once `cancel` fires
    pub async fn summarize_cancellable(
        &self,
        text: &str,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<SummaryResult> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Summarization cancelled");
                Err(LecternError::Cancelled)
            }
            result = self.run(text, config) => result,
        }
    }

    async fn run(&self, text: &str, config: &ModelConfig) -> Result<SummaryResult> {
        if text.trim().is_empty() {
            return Err(LecternError::invalid_input("Cannot summarize empty text"));
        }

        let char_count = text.chars().count();
        info!(
            "Starting summarization - Text length: {} chars, Model: {}",
            char_count, config.model_name
        );

        // Step 1: Check if text is short enough for direct summarization
        if char_count <= self.options.max_chunk_size {
            debug!("Text fits in one chunk, using direct summarization");
            return self.summarize_direct(text, config).await;
        }

        // Step 2: Split into chunks (map phase)
        let chunks = chunk_text(text, self.options.max_chunk_size, self.options.chunk_overlap)?;
        let total = chunks.len();
        info!("Split text into {} chunks", total);

        // Step 3: Summarize each chunk; results arrive in chunk order
        let outcomes: Vec<ChunkOutcome> = stream::iter(
            chunks
                .iter()
                .map(|chunk| self.summarize_chunk(chunk, total, config)),
        )
        .buffered(self.options.concurrency.max(1))
        .collect()
        .await;

        let failed = outcomes.iter().filter(|o| !o.is_summarized()).count();
        if failed == total {
            return Err(LecternError::summarization_failed(
                "No section of the text could be summarized",
            ));
        }
        if failed > 0 {
            warn!("{} of {} chunks replaced by placeholder", failed, total);
        }

        // Step 4: Combine chunk summaries (reduce phase)
        let combined = outcomes
            .iter()
            .map(ChunkOutcome::merge_text)
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR);
        info!("Combined chunk summaries - Length: {} chars", combined.len());

        // Step 5: Final summarization
        let prompt = build_prompt(TaskKind::MergeSummaries, &combined, None)?;
        let final_summary = self
            .generate_with_retry(&prompt, config, "merge")
            .await
            .map_err(|e| LecternError::summarization_failed(format!("Merge step failed: {}", e)))?;

        Ok(SummaryResult::new(
            final_summary,
            &outcomes,
            config.model_name.clone(),
        ))
    }

    /// Direct summarization (for shorter texts)
    async fn summarize_direct(&self, text: &str, config: &ModelConfig) -> Result<SummaryResult> {
        let prompt = build_prompt(TaskKind::Summarize, text, None)?;
        let summary = self
            .generate_with_retry(&prompt, config, "summary")
            .await
            .map_err(|e| LecternError::summarization_failed(format!("Summary call failed: {}", e)))?;

        let outcome = ChunkOutcome::Summarized {
            index: 0,
            summary: summary.clone(),
        };

        Ok(SummaryResult::new(summary, &[outcome], config.model_name.clone()))
    }

    /// Summarize a single chunk, substituting the placeholder on failure
    async fn summarize_chunk(&self, chunk: &TextChunk, total: usize, config: &ModelConfig) -> ChunkOutcome {
        debug!("Summarizing chunk {}/{}", chunk.index + 1, total);

        if chunk.text.trim().is_empty() {
            return ChunkOutcome::Summarized {
                index: chunk.index,
                summary: String::new(),
            };
        }

        let section = format!("Section {} of {}", chunk.index + 1, total);
        let outcome = match build_prompt(TaskKind::Summarize, &chunk.text, Some(&section)) {
            Ok(prompt) => self.generate_with_retry(&prompt, config, "chunk").await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(summary) => ChunkOutcome::Summarized {
                index: chunk.index,
                summary,
            },
            Err(e) => {
                warn!("Chunk {}/{} unavailable: {}", chunk.index + 1, total, e);
                ChunkOutcome::Unavailable {
                    index: chunk.index,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// One call, repeated once with identical inputs on a transient failure
    async fn generate_with_retry(&self, prompt: &str, config: &ModelConfig, step: &str) -> Result<String> {
        match self.client.generate(prompt, config).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_transient() => {
                warn!("{} call to {} failed: {}. Retrying once...", step, self.client.name(), e);
                self.client.generate(prompt, config).await
            }
            Err(e) => Err(e),
        }
    }
}
