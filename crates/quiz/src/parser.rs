//! Strict parser for the quiz line format
//!
//! ```text
//! QUESTION: <text>
//! A) <option>
//! B) <option>
//! C) <option>
//! D) <option>
//! ANSWER: <A|B|C|D>
//! EXPLANATION: <optional>
//! ---
//! ```
//!
//! Accepted noise: surrounding whitespace, blank lines, code fences,
//! `**bold**` markers around labels, leading `-`/`*` bullets, lowercase labels, option
//! separators `)`, `.` or `:` and answers written as `B`, `B)` or `B) text`.
//! Any other deviation rejects the whole response.

use lectern_common::{LecternError, Result};
use tracing::debug;

use crate::types::{option_letter, QuizQuestion, QuizSet, OPTION_COUNT};

const SEPARATORS: &[char] = &[')', '.', ':'];
const LABELS: &[&str] = &["QUESTION", "ANSWER", "EXPLANATION"];

/// Parse a model response into exactly `expected` questions
///
/// Fails when any block is malformed or fewer than `expected` questions are
/// present. Extra well-formed questions are dropped.
pub fn parse_quiz(response: &str, expected: usize) -> Result<QuizSet> {
    let blocks = split_blocks(response);
    if blocks.is_empty() {
        return Err(LecternError::malformed_quiz("Response contains no questions"));
    }

    let mut questions = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let question = parse_block(block)
            .map_err(|reason| LecternError::malformed_quiz(format!("Question {}: {}", i + 1, reason)))?;
        questions.push(question);
    }

    if questions.len() < expected {
        return Err(LecternError::malformed_quiz(format!(
            "Expected {} questions, found {}",
            expected,
            questions.len()
        )));
    }

    if questions.len() > expected {
        debug!("Dropping {} extra questions", questions.len() - expected);
        questions.truncate(expected);
    }

    Ok(QuizSet::new(questions))
}

/// Normalized non-empty lines grouped by delimiter
fn split_blocks(response: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for raw in response.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }

        if is_delimiter(line) {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(normalize(line));
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn is_delimiter(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Strip list bullets and bold markers around the label
///
/// `**QUESTION:** text`, `**Answer**: B` and `**A)** text` lose their
/// markers; a fully bold line loses the outer pair. Text after the label is
/// left as written.
fn normalize(line: &str) -> String {
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line)
        .trim();

    let Some(rest) = line.strip_prefix("**") else {
        return line.to_string();
    };

    if let Some(pos) = rest.find("**") {
        let head = &rest[..pos];
        if is_label_head(head) {
            return format!("{}{}", head, &rest[pos + 2..]).trim().to_string();
        }
    }

    match rest.strip_suffix("**") {
        Some(inner) if !inner.is_empty() => inner.trim().to_string(),
        _ => line.to_string(),
    }
}

/// `QUESTION`, `ANSWER:`, `A)` and similar label prefixes
fn is_label_head(head: &str) -> bool {
    let name = head.trim().trim_end_matches(SEPARATORS).trim_end();
    if name.chars().count() == 1 {
        return name
            .chars()
            .next()
            .map(|c| (0..OPTION_COUNT).any(|i| option_letter(i) == c.to_ascii_uppercase()))
            .unwrap_or(false);
    }
    LABELS.iter().any(|label| name.eq_ignore_ascii_case(label))
}

/// Value after `label:` (case-insensitive)
fn labeled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    line[label.len()..].trim_start().strip_prefix(':').map(str::trim)
}

/// Option letter index and the text after the separator
fn option_line(line: &str) -> Option<(usize, &str)> {
    let mut chars = line.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let index = (0..OPTION_COUNT).find(|&i| option_letter(i) == letter)?;
    let text = chars.as_str().strip_prefix(SEPARATORS)?;
    Some((index, text.trim()))
}

/// Answer marker: `B`, `B)` or `B) text`
fn answer_index(value: &str) -> Option<usize> {
    let value = value.trim_matches('*').trim();
    if value.chars().count() == 1 {
        let letter = value.chars().next()?.to_ascii_uppercase();
        return (0..OPTION_COUNT).find(|&i| option_letter(i) == letter);
    }
    option_line(value).map(|(index, _)| index)
}

fn parse_block(lines: &[String]) -> std::result::Result<QuizQuestion, String> {
    let mut lines = lines.iter().map(String::as_str);

    let first = lines.next().ok_or("empty block")?;
    let question = labeled(first, "QUESTION").ok_or_else(|| format!("expected QUESTION, found '{}'", truncate(first)))?;

    let mut options: [String; OPTION_COUNT] = Default::default();
    for (expected, slot) in options.iter_mut().enumerate() {
        let line = lines
            .next()
            .ok_or_else(|| format!("missing option {}", option_letter(expected)))?;
        match option_line(line) {
            Some((index, text)) if index == expected => *slot = text.to_string(),
            _ => {
                return Err(format!(
                    "expected option {}, found '{}'",
                    option_letter(expected),
                    truncate(line)
                ))
            }
        }
    }

    let line = lines.next().ok_or("missing ANSWER")?;
    let answer = labeled(line, "ANSWER").ok_or_else(|| format!("expected ANSWER, found '{}'", truncate(line)))?;
    let correct_index = answer_index(answer).ok_or_else(|| format!("invalid answer marker '{}'", truncate(answer)))?;

    let explanation = match lines.next() {
        Some(line) => Some(
            labeled(line, "EXPLANATION")
                .ok_or_else(|| format!("unexpected line '{}'", truncate(line)))?
                .to_string(),
        ),
        None => None,
    };

    if let Some(extra) = lines.next() {
        return Err(format!("unexpected line '{}'", truncate(extra)));
    }

    QuizQuestion::new(question, options, correct_index, explanation).map_err(|e| match e {
        LecternError::InvalidInput(reason) => reason,
        other => other.to_string(),
    })
}

/// Short excerpt for error messages
fn truncate(line: &str) -> String {
    const MAX: usize = 40;
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        format!("{}...", line.chars().take(MAX).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: usize) -> String {
        format!(
            "QUESTION: Question number {n}?\nA) Alpha {n}\nB) Beta {n}\nC) Gamma {n}\nD) Delta {n}\nANSWER: B\nEXPLANATION: Beta is right for {n}"
        )
    }

    fn response(count: usize) -> String {
        (1..=count).map(block).collect::<Vec<_>>().join("\n---\n")
    }

    #[test]
    fn test_parse_canonical_format() {
        let quiz = parse_quiz(&response(5), 5).unwrap();
        assert_eq!(quiz.len(), 5);

        let q = quiz.get(2).unwrap();
        assert_eq!(q.question(), "Question number 3?");
        assert_eq!(q.options()[0], "Alpha 3");
        assert_eq!(q.correct_index(), 1);
        assert_eq!(q.explanation(), Some("Beta is right for 3"));
    }

    #[test]
    fn test_too_few_questions() {
        let err = parse_quiz(&response(3), 5).unwrap_err();
        assert!(matches!(err, LecternError::MalformedQuizResponse(_)));
        assert!(err.to_string().contains("Expected 5 questions, found 3"));
    }

    #[test]
    fn test_extra_questions_dropped() {
        let quiz = parse_quiz(&response(7), 5).unwrap();
        assert_eq!(quiz.len(), 5);
        assert_eq!(quiz.get(4).unwrap().question(), "Question number 5?");
    }

    #[test]
    fn test_tolerated_noise() {
        let text = "```\n\
            **QUESTION:** What does a compiler do?\n\
            - a. Translates source code\n\
            - b. Runs tests\n\
            - c. Formats code\n\
            - d. Deletes files\n\
            **Answer**: A) Translates source code\n\
            \n\
            ----\n\
            \n\
            question: Which is a systems language?\n\
            A: Rust\n\
            B: HTML\n\
            C: CSS\n\
            D: YAML\n\
            answer: a\n\
            ```";

        let quiz = parse_quiz(text, 2).unwrap();
        assert_eq!(quiz.get(0).unwrap().options()[0], "Translates source code");
        assert_eq!(quiz.get(0).unwrap().correct_index(), 0);
        assert_eq!(quiz.get(0).unwrap().explanation(), None);
        assert_eq!(quiz.get(1).unwrap().correct_option(), "Rust");
    }

    #[test]
    fn test_bold_inside_content_kept() {
        let text = "**QUESTION:** In Python, what does 2**3 evaluate to?\n\
            **A)** 2**3 is 8\n\
            B) 23\n\
            C) 2*3\n\
            D) **bold** text\n\
            **ANSWER:** **A**";

        let quiz = parse_quiz(text, 1).unwrap();
        let q = quiz.get(0).unwrap();
        assert_eq!(q.question(), "In Python, what does 2**3 evaluate to?");
        assert_eq!(q.options()[0], "2**3 is 8");
        assert_eq!(q.options()[1], "23");
        assert_eq!(q.options()[3], "**bold** text");
        assert_eq!(q.correct_index(), 0);
    }

    #[test]
    fn test_options_differing_only_by_bold_markers() {
        let text = "QUESTION: Which glob matches nested directories?\nA) src/**/*.rs\nB) src/*.rs\nC) src/*/*.rs\nD) src/**.rs\nANSWER: A";
        let quiz = parse_quiz(text, 1).unwrap();
        assert_eq!(quiz.get(0).unwrap().correct_option(), "src/**/*.rs");
        assert_eq!(quiz.get(0).unwrap().options()[3], "src/**.rs");
    }

    #[test]
    fn test_fully_bold_line() {
        let text = "**QUESTION: What is 2**3?**\nA) 6\nB) 8\nC) 9\nD) 5\n**ANSWER: B**";
        let quiz = parse_quiz(text, 1).unwrap();
        assert_eq!(quiz.get(0).unwrap().question(), "What is 2**3?");
        assert_eq!(quiz.get(0).unwrap().correct_index(), 1);
    }

    #[test]
    fn test_missing_option_rejected() {
        let text = "QUESTION: Q?\nA) one\nB) two\nC) three\nANSWER: A";
        let err = parse_quiz(text, 1).unwrap_err();
        assert!(err.to_string().contains("expected option D"));
    }

    #[test]
    fn test_out_of_order_options_rejected() {
        let text = "QUESTION: Q?\nA) one\nC) three\nB) two\nD) four\nANSWER: A";
        assert!(parse_quiz(text, 1).is_err());
    }

    #[test]
    fn test_invalid_answer_rejected() {
        let text = "QUESTION: Q?\nA) one\nB) two\nC) three\nD) four\nANSWER: E";
        assert!(matches!(
            parse_quiz(text, 1),
            Err(LecternError::MalformedQuizResponse(_))
        ));

        let text = "QUESTION: Q?\nA) one\nB) two\nC) three\nD) four\nANSWER: the second one";
        assert!(parse_quiz(text, 1).is_err());
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let text = "QUESTION: Q?\nA) same\nB) same\nC) three\nD) four\nANSWER: A";
        let err = parse_quiz(text, 1).unwrap_err();
        assert!(err.to_string().contains("duplicates"));
    }

    #[test]
    fn test_preamble_rejected() {
        let text = format!("Here is your quiz:\n{}", block(1));
        assert!(parse_quiz(&text, 1).is_err());
    }

    #[test]
    fn test_trailing_text_rejected() {
        let text = format!("{}\nHope this helps!", block(1));
        assert!(parse_quiz(&text, 1).is_err());
    }

    #[test]
    fn test_json_response_rejected() {
        let text = r#"[{"question": "Q?", "options": ["a","b","c","d"], "answer": "A"}]"#;
        assert!(parse_quiz(text, 1).is_err());
    }

    #[test]
    fn test_empty_response() {
        assert!(parse_quiz("", 1).is_err());
        assert!(parse_quiz("---\n---\n", 1).is_err());
    }

    #[test]
    fn test_trailing_delimiter_ignored() {
        let text = format!("{}\n---\n", response(2));
        assert_eq!(parse_quiz(&text, 2).unwrap().len(), 2);
    }
}
