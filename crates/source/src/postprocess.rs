use tracing::debug;

use crate::types::Cue;

/// Normalize whitespace in extracted text
///
/// Runs of spaces and tabs become one space, lines are trimmed and runs of
/// blank lines collapse to a single paragraph break.
pub fn clean_text(text: &str) -> String {
    let text = text.trim_start_matches('\u{feff}');
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}

/// Flatten caption cues into running text
///
/// Rolling captions repeat the previous line at the top of each cue, so a
/// line equal to the last emitted one is dropped.
pub fn cues_to_text(cues: &[Cue]) -> String {
    let mut emitted: Vec<&str> = Vec::new();
    let mut repeated = 0;

    for line in cues.iter().flat_map(|cue| cue.lines.iter()) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if emitted.last() == Some(&line) {
            repeated += 1;
            continue;
        }
        emitted.push(line);
    }

    debug!("Flattened {} cues ({} repeated lines dropped)", cues.len(), repeated);
    clean_text(&emitted.join(" "))
}

/// Remove inline caption markup (`<c>`, `<v Speaker>`, `<00:00:01.000>`) and
/// decode common entities
pub fn strip_markup(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut in_tag = false;

    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f32, lines: &[&str]) -> Cue {
        Cue {
            start,
            end: start + 2.0,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_clean_text() {
        let raw = "\u{feff}  Title\t\tline  \n\n\n\n  second   paragraph\nnext line  \n\n";
        assert_eq!(clean_text(raw), "Title line\n\nsecond paragraph\nnext line");
        assert_eq!(clean_text(" \n\t\n "), "");
    }

    #[test]
    fn test_rolling_captions_deduplicated() {
        let cues = vec![
            cue(0.0, &["welcome to the lecture"]),
            cue(2.0, &["welcome to the lecture"]),
            cue(2.1, &["welcome to the lecture", "today we cover entropy"]),
            cue(4.0, &["today we cover entropy", "and the second law"]),
        ];
        assert_eq!(
            cues_to_text(&cues),
            "welcome to the lecture today we cover entropy and the second law"
        );
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<00:00:01.520><c> entropy</c><c> rises</c>"),
            " entropy rises"
        );
        assert_eq!(strip_markup("<v Lecturer>Q&amp;A time"), "Q&A time");
        assert_eq!(strip_markup("a &lt;b&gt; c"), "a <b> c");
    }
}
