//! YouTube transcripts via yt-dlp
//!
//! Subtitles only; nothing but the `.vtt` files is downloaded.

use lectern_common::{LecternError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::postprocess::cues_to_text;
use crate::types::ExtractedText;
use crate::vtt::parse_vtt;

/// Transcript languages tried first, in order
pub const PREFERRED_LANGUAGES: &[&str] = &["en", "id", "en-US", "en-GB"];

const VIDEO_ID_PATTERN: &str = r"(?x)
    (?:
        # Full YouTube URLs
        (?:https?://)?
        (?:www\.|m\.)?
        (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
        ([a-zA-Z0-9_-]{11})
    )
    |
    # Bare video ID (11 characters)
    ^([a-zA-Z0-9_-]{11})$
";

fn video_id_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(VIDEO_ID_PATTERN).ok()).as_ref()
}

/// Extract the 11-character video id from a YouTube URL or bare id
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex()?.captures(input.trim())?;

    // Group 1 is the URL form, group 2 the bare id
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Fetches YouTube subtitles with the external yt-dlp tool
#[derive(Debug, Clone)]
pub struct YoutubeTranscriber {
    ytdlp_path: PathBuf,
}

impl YoutubeTranscriber {
    pub fn new(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    /// Fetch the transcript for a URL or video id
    ///
    /// Preferred languages are tried first, then any available language.
    #[instrument(skip(self))]
    pub async fn fetch_transcript(&self, url_or_id: &str) -> Result<ExtractedText> {
        let video_id = extract_video_id(url_or_id).ok_or_else(|| {
            LecternError::source_extraction(
                "Invalid YouTube URL. Please provide a valid YouTube video link.",
            )
        })?;

        info!("Fetching transcript for video {}", video_id);

        let workdir = tempfile::tempdir()
            .map_err(|e| LecternError::source_extraction(format!("Cannot create temp directory: {}", e)))?;

        let preferred = PREFERRED_LANGUAGES.join(",");
        for languages in [preferred.as_str(), "all"] {
            self.download_subtitles(&video_id, languages, workdir.path()).await?;

            if let Some((path, language)) = pick_subtitle(workdir.path(), &video_id).await? {
                let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    LecternError::source_extraction(format!("Cannot read subtitles: {}", e))
                })?;

                let text = cues_to_text(&parse_vtt(&content));
                if text.is_empty() {
                    warn!("Subtitle file for language {} contains no text", language);
                    continue;
                }

                info!(
                    "Transcript extracted - Language: {}, Length: {} chars",
                    language,
                    text.chars().count()
                );
                return Ok(ExtractedText::new(text, video_id, Some(language)));
            }

            debug!("No subtitles for languages: {}", languages);
        }

        Err(LecternError::source_extraction(
            "Video is unavailable or no transcript found.",
        ))
    }

    async fn download_subtitles(&self, video_id: &str, languages: &str, dir: &Path) -> Result<()> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let result = Command::new(&self.ytdlp_path)
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs").arg(languages)
            .arg("--sub-format").arg("vtt")
            .arg("--paths").arg(dir)
            .arg("--output").arg("%(id)s.%(ext)s")
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(&url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LecternError::source_extraction(format!(
                    "yt-dlp not found at '{}'. Install it or set YTDLP_PATH.",
                    self.ytdlp_path.display()
                )));
            }
            Err(e) => {
                return Err(LecternError::source_extraction(format!("yt-dlp execution failed: {e}")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(describe_failure(&stderr));
        }

        Ok(())
    }
}

/// Subtitle file for the best available language
async fn pick_subtitle(dir: &Path, video_id: &str) -> Result<Option<(PathBuf, String)>> {
    let read_error = |e: std::io::Error| LecternError::source_extraction(format!("Cannot read directory: {e}"));
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;

    let prefix = format!("{}.", video_id);
    let mut found: Vec<(PathBuf, String)> = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(language) = name.strip_prefix(&prefix).and_then(|rest| rest.strip_suffix(".vtt")) {
            found.push((entry.path(), language.to_string()));
        }
    }

    found.sort_by(|a, b| a.1.cmp(&b.1));

    let preferred = PREFERRED_LANGUAGES
        .iter()
        .find_map(|lang| found.iter().position(|(_, l)| l == lang));

    Ok(match preferred {
        Some(i) => Some(found.swap_remove(i)),
        None => found.into_iter().next(),
    })
}

fn describe_failure(stderr: &str) -> LecternError {
    let lower = stderr.to_lowercase();
    if lower.contains("subtitles are disabled")
        || lower.contains("transcripts are disabled")
        || lower.contains("no subtitles")
    {
        return LecternError::source_extraction("Transcripts are disabled for this video.");
    }
    if lower.contains("unavailable") || lower.contains("private video") || lower.contains("not found") {
        return LecternError::source_extraction("Video is unavailable or no transcript found.");
    }

    let first_line = stderr.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("unknown error");
    LecternError::source_extraction(format!("yt-dlp failed: {}", first_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        // Test various URL formats
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=30"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));

        // Test invalid inputs
        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id("https://example.com/watch"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[tokio::test]
    async fn test_pick_subtitle_prefers_language_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["abc.de.vtt", "abc.en-GB.vtt", "abc.id.vtt", "other.en.vtt", "abc.info.json"] {
            std::fs::write(dir.path().join(name), "WEBVTT").unwrap();
        }

        let (_, language) = pick_subtitle(dir.path(), "abc").await.unwrap().unwrap();
        assert_eq!(language, "id");
    }

    #[tokio::test]
    async fn test_pick_subtitle_falls_back_to_any() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc.fr.vtt"), "WEBVTT").unwrap();
        std::fs::write(dir.path().join("abc.de.vtt"), "WEBVTT").unwrap();

        let (_, language) = pick_subtitle(dir.path(), "abc").await.unwrap().unwrap();
        assert_eq!(language, "de");

        let empty = tempfile::tempdir().unwrap();
        assert!(pick_subtitle(empty.path(), "abc").await.unwrap().is_none());
    }

    #[test]
    fn test_describe_failure() {
        let err = describe_failure("ERROR: [youtube] abc: Video unavailable\n");
        assert!(err.to_string().contains("unavailable or no transcript"));

        let err = describe_failure("\nERROR: unable to connect\nmore detail");
        assert!(err.to_string().contains("yt-dlp failed: ERROR: unable to connect"));

        let err = describe_failure("ERROR: [youtube] abc: Subtitles are disabled for this video\n");
        assert_eq!(
            err.to_string(),
            LecternError::source_extraction("Transcripts are disabled for this video.").to_string()
        );

        let err = describe_failure("ERROR: abc has no subtitles");
        assert!(err.to_string().contains("Transcripts are disabled"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_disabled_transcripts_reported() {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = tempfile::tempdir().unwrap();
        let script = bin_dir.path().join("fake-yt-dlp");
        std::fs::write(
            &script,
            "#!/bin/sh\necho 'ERROR: [youtube] dQw4w9WgXcQ: Subtitles are disabled for this video' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = YoutubeTranscriber::new(&script)
            .fetch_transcript("dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Transcripts are disabled for this video."));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let transcriber = YoutubeTranscriber::new("yt-dlp");
        let err = transcriber.fetch_transcript("https://example.com").await.unwrap_err();
        assert!(matches!(err, LecternError::SourceExtraction(_)));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let transcriber = YoutubeTranscriber::new("/nonexistent/yt-dlp");
        let err = transcriber.fetch_transcript("dQw4w9WgXcQ").await.unwrap_err();
        assert!(err.to_string().contains("yt-dlp not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_with_fake_tool() {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = tempfile::tempdir().unwrap();
        let script = bin_dir.path().join("fake-yt-dlp");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             while [ $# -gt 0 ]; do\n\
               if [ \"$1\" = \"--paths\" ]; then dir=\"$2\"; fi\n\
               shift\n\
             done\n\
             printf 'WEBVTT\\n\\n00:00:00.000 --> 00:00:02.000\\nhello class\\n\\n00:00:02.000 --> 00:00:04.000\\nhello class\\ntoday is entropy\\n' > \"$dir/dQw4w9WgXcQ.en.vtt\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let transcriber = YoutubeTranscriber::new(&script);
        let extracted = transcriber
            .fetch_transcript("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(extracted.text, "hello class today is entropy");
        assert_eq!(extracted.source_label, "dQw4w9WgXcQ");
        assert_eq!(extracted.language.as_deref(), Some("en"));
    }
}
