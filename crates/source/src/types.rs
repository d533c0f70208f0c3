use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where lecture text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// YouTube URL or bare video id
    YouTube(String),

    /// Text document on disk
    Document(PathBuf),

    /// Uploaded document contents
    Upload { filename: String, content: Vec<u8> },
}

impl Source {
    /// Human-readable label for logs and responses
    pub fn label(&self) -> String {
        match self {
            Source::YouTube(url) => format!("YouTube: {}", url.trim()),
            Source::Document(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Upload { filename, .. } => filename.clone(),
        }
    }
}

/// Extracted plain text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Cleaned text content
    pub text: String,

    /// Video id or file name
    pub source_label: String,

    /// Transcript language code, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ExtractedText {
    pub fn new(text: String, source_label: String, language: Option<String>) -> Self {
        Self {
            text,
            source_label,
            language,
        }
    }

    /// Character count of the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Single caption cue with timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Start time in seconds
    pub start: f32,

    /// End time in seconds
    pub end: f32,

    /// Caption lines, markup removed
    pub lines: Vec<String>,
}
