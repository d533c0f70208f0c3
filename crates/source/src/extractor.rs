use async_trait::async_trait;
use lectern_common::{AppConfig, Result};
use tracing::info;

use crate::document::{decode_document, read_document};
use crate::types::{ExtractedText, Source};
use crate::youtube::YoutubeTranscriber;

/// Turns a source into plain lecture text
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    async fn extract_text(&self, source: &Source) -> Result<ExtractedText>;
}

/// yt-dlp for YouTube, format-aware reads for documents
#[derive(Debug, Clone)]
pub struct DefaultExtractor {
    youtube: YoutubeTranscriber,
}

impl DefaultExtractor {
    pub fn new(youtube: YoutubeTranscriber) -> Self {
        Self { youtube }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(YoutubeTranscriber::new(&config.ytdlp_path))
    }
}

#[async_trait]
impl SourceExtractor for DefaultExtractor {
    async fn extract_text(&self, source: &Source) -> Result<ExtractedText> {
        info!("Extracting text from {}", source.label());

        match source {
            Source::YouTube(url) => self.youtube.fetch_transcript(url).await,
            Source::Document(path) => read_document(path).await,
            Source::Upload { filename, content } => decode_document(filename, content).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_common::LecternError;
    use std::path::PathBuf;

    fn extractor() -> DefaultExtractor {
        DefaultExtractor::new(YoutubeTranscriber::new("/nonexistent/yt-dlp"))
    }

    #[tokio::test]
    async fn test_upload_dispatch() {
        let source = Source::Upload {
            filename: "lecture.txt".to_string(),
            content: b"Photosynthesis converts light.".to_vec(),
        };
        let extracted = extractor().extract_text(&source).await.unwrap();
        assert_eq!(extracted.text, "Photosynthesis converts light.");
        assert_eq!(extracted.source_label, "lecture.txt");
    }

    #[tokio::test]
    async fn test_document_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Cells divide by mitosis.").unwrap();

        let extracted = extractor().extract_text(&Source::Document(path)).await.unwrap();
        assert_eq!(extracted.text, "Cells divide by mitosis.");
    }

    #[tokio::test]
    async fn test_errors_are_source_extraction() {
        let err = extractor()
            .extract_text(&Source::Document(PathBuf::from("deck.pptx")))
            .await
            .unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));

        let err = extractor()
            .extract_text(&Source::YouTube("dQw4w9WgXcQ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));
    }
}
