//! Lectern Source Extraction
//!
//! Plain text from YouTube transcripts (via yt-dlp) and documents (text, PDF, PPTX)

pub mod document;
pub mod extractor;
pub mod formats;
pub mod postprocess;
pub mod types;
pub mod vtt;
pub mod youtube;

// Re-export main types
pub use extractor::{DefaultExtractor, SourceExtractor};
pub use postprocess::clean_text;
pub use types::{ExtractedText, Source};
pub use youtube::{extract_video_id, YoutubeTranscriber};
