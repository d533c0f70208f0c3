//! Document extraction: text, Markdown, PDF and PowerPoint

use lectern_common::{LecternError, Result};
use std::path::Path;
use tracing::info;

use crate::formats::{extract_pdf, extract_pptx, DocumentFormat};
use crate::postprocess::clean_text;
use crate::types::ExtractedText;

/// Supported document extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "pdf", "pptx"];

/// Check if file extension is supported
pub fn is_supported_document(filename: &str) -> bool {
    detect_format(filename).is_some()
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn detect_format(filename: &str) -> Option<DocumentFormat> {
    extension(filename).and_then(|ext| DocumentFormat::from_extension(&ext))
}

/// Read a document from disk
pub async fn read_document(path: &Path) -> Result<ExtractedText> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    detect(&filename)?;

    let content = tokio::fs::read(path)
        .await
        .map_err(|e| LecternError::source_extraction(format!("Cannot read {}: {}", filename, e)))?;

    decode_document(&filename, &content).await
}

/// Decode uploaded document bytes
///
/// PDF and PowerPoint parsing runs on the blocking pool.
pub async fn decode_document(filename: &str, content: &[u8]) -> Result<ExtractedText> {
    let text = match detect(filename)? {
        DocumentFormat::Text => std::str::from_utf8(content)
            .map_err(|_| {
                LecternError::source_extraction(format!("{} is not valid UTF-8 text", filename))
            })?
            .to_string(),
        DocumentFormat::Pdf => parse_blocking(content, extract_pdf).await?,
        DocumentFormat::Pptx => parse_blocking(content, extract_pptx).await?,
    };

    let text = clean_text(&text);
    if text.is_empty() {
        return Err(LecternError::source_extraction(format!(
            "{} contains no text",
            filename
        )));
    }

    info!("Document extracted - {}: {} chars", filename, text.chars().count());
    Ok(ExtractedText::new(text, filename.to_string(), None))
}

async fn parse_blocking(content: &[u8], parse: fn(&[u8]) -> Result<String>) -> Result<String> {
    let bytes = content.to_vec();
    tokio::task::spawn_blocking(move || parse(&bytes))
        .await
        .map_err(|e| LecternError::source_extraction(format!("Document parser failed: {}", e)))?
}

fn detect(filename: &str) -> Result<DocumentFormat> {
    detect_format(filename).ok_or_else(|| {
        let format = extension(filename).unwrap_or_else(|| "none".to_string());
        LecternError::source_extraction(format!(
            "unsupported format: .{} (supported: {})",
            format,
            SUPPORTED_EXTENSIONS.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tests::{minimal_pdf, minimal_pptx};
    use std::io::Write;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_document("notes.txt"));
        assert!(is_supported_document("README.MD"));
        assert!(is_supported_document("week1.markdown"));
        assert!(is_supported_document("slides.pptx"));
        assert!(is_supported_document("paper.PDF"));
        assert!(!is_supported_document("slides.ppt"));
        assert!(!is_supported_document("essay.docx"));
        assert!(!is_supported_document("noext"));
    }

    #[tokio::test]
    async fn test_read_document() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# Week 1\n\n\n\nEntropy   always increases.\n").unwrap();

        let extracted = read_document(file.path()).await.unwrap();
        assert_eq!(extracted.text, "# Week 1\n\nEntropy always increases.");
        assert!(extracted.source_label.ends_with(".md"));
        assert_eq!(extracted.language, None);
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let err = read_document(file.path()).await.unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));
        assert!(err.to_string().contains("unsupported format: .docx"));
    }

    #[tokio::test]
    async fn test_read_pdf_document() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&minimal_pdf(&["Photosynthesis basics", "Light reactions"]))
            .unwrap();

        let extracted = read_document(file.path()).await.unwrap();
        assert!(extracted.text.starts_with("[Page 1]\n"));
        assert!(extracted.text.contains("Photosynthesis"));
        assert!(extracted.text.contains("[Page 2]\n"));
        assert!(extracted.source_label.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_read_pptx_document() {
        let mut file = tempfile::Builder::new().suffix(".pptx").tempfile().unwrap();
        file.write_all(&minimal_pptx(&[
            ("ppt/slides/slide1.xml", "Week 3\nCell   division"),
            ("ppt/slides/slide2.xml", "Mitosis has four phases"),
        ]))
        .unwrap();

        let extracted = read_document(file.path()).await.unwrap();
        assert_eq!(
            extracted.text,
            "[Slide 1]\nWeek 3\nCell division\n\n[Slide 2]\nMitosis has four phases"
        );
    }

    #[tokio::test]
    async fn test_corrupt_pdf_upload() {
        let err = decode_document("paper.pdf", b"%PDF-1.4 truncated").await.unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = read_document(Path::new("/nonexistent/notes.txt")).await.unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));
    }

    #[tokio::test]
    async fn test_decode_rejects_binary_and_empty() {
        assert!(decode_document("a.txt", &[0xff, 0xfe, 0x00]).await.is_err());
        assert!(decode_document("a.txt", b"  \n\n ").await.is_err());
        assert_eq!(decode_document("a.txt", b"hello").await.unwrap().text, "hello");
    }
}
