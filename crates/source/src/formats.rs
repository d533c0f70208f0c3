//! PDF and PowerPoint text extraction
//!
//! Pages and slides are emitted as `[Page N]` / `[Slide N]` sections joined by
//! blank lines. Pages or slides without text are skipped but keep their number.

use lectern_common::{LecternError, Result};
use pdf_extract::extract_text_from_mem_by_pages;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Document formats that need more than a UTF-8 decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain text and Markdown
    Text,
    /// PDF files (.pdf)
    Pdf,
    /// PowerPoint presentations (.pptx)
    Pptx,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "txt" | "md" | "markdown" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }
}

/// Text of every non-empty PDF page
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let pages = extract_text_from_mem_by_pages(bytes)
        .map_err(|e| LecternError::source_extraction(format!("Error parsing PDF: {}", e)))?;

    let sections: Vec<String> = pages
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| format!("[Page {}]\n{}", i + 1, text.trim()))
        .collect();

    Ok(sections.join("\n\n"))
}

/// Text of every non-empty slide, in slide order
pub fn extract_pptx(bytes: &[u8]) -> Result<String> {
    let parse_error = |e: zip::result::ZipError| {
        LecternError::source_extraction(format!("Error parsing PowerPoint: {}", e))
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(parse_error)?;

    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    if slides.is_empty() {
        return Err(LecternError::source_extraction(
            "Error parsing PowerPoint: no slides found",
        ));
    }
    slides.sort();

    let mut sections = Vec::new();
    for (position, (_, name)) in slides.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(name)
            .map_err(parse_error)?
            .read_to_string(&mut xml)
            .map_err(|e| LecternError::source_extraction(format!("Error parsing PowerPoint: {}", e)))?;

        let text = slide_text(&xml)?;
        if !text.is_empty() {
            sections.push(format!("[Slide {}]\n{}", position + 1, text));
        }
    }

    Ok(sections.join("\n\n"))
}

/// `ppt/slides/slide12.xml` -> 12
fn slide_number(name: &str) -> Option<usize> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Paragraph text from a slide's DrawingML, one paragraph per line
fn slide_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_run = true,
            Ok(Event::Empty(e)) if e.name().as_ref() == b"a:br" => current.push(' '),
            Ok(Event::Text(e)) if in_run => {
                let text = e.unescape().map_err(|e| {
                    LecternError::source_extraction(format!("Error parsing PowerPoint: {}", e))
                })?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_run = false,
                b"a:p" => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LecternError::source_extraction(format!(
                    "Error parsing PowerPoint: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
