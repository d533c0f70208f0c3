//! Prompt templates for summarization and quiz generation

use lectern_common::{LecternError, Result};

/// Line separating question blocks in a quiz response
pub const QUIZ_DELIMITER: &str = "---";

/// Substituted for a chunk summary that could not be produced
pub const CONTENT_UNAVAILABLE: &str = "[content unavailable]";

/// Model task a prompt is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Summarize lecture material (a whole text, or one section when context is given)
    Summarize,

    /// Combine ordered partial summaries into one
    MergeSummaries,

    /// Produce a multiple-choice quiz in the line format parsed by the quiz crate
    GenerateQuiz { question_count: usize },
}

const SUMMARY_TEMPLATE: &str = r#"You are an expert educational content summarizer. Analyze the following lecture material and create a comprehensive summary.

LECTURE MATERIAL:
<<<MATERIAL
{{content}}
MATERIAL>>>

Create a well-structured summary that includes:
1. **Main Topic**: A brief one-line description of what this lecture is about
2. **Key Concepts**: List the 3-5 most important concepts covered
3. **Detailed Summary**: A thorough but concise summary of the main points
4. **Key Takeaways**: 3-5 bullet points that students should remember

Format your response in Markdown for clear readability."#;

const SECTION_TEMPLATE: &str = r#"Summarize the following section of lecture material ({{context}}) concisely, capturing all key points:

<<<MATERIAL
{{content}}
MATERIAL>>>

Provide a concise summary that preserves the main ideas and important details."#;

const MERGE_TEMPLATE: &str = r#"You are an expert educational content summarizer. Combine the following partial summaries into one comprehensive, well-structured summary.
{{context}}
PARTIAL SUMMARIES:
<<<MATERIAL
{{content}}
MATERIAL>>>

Sections marked [content unavailable] could not be processed. Do not invent their content.

Create a unified summary that includes:
1. **Main Topic**: A brief one-line description of what this lecture is about
2. **Key Concepts**: List the 3-5 most important concepts covered
3. **Detailed Summary**: A thorough but concise summary of the main points
4. **Key Takeaways**: 3-5 bullet points that students should remember

Format your response in Markdown for clear readability."#;

const QUIZ_TEMPLATE: &str = r#"Based on the following lecture summary, create exactly {{count}} multiple-choice quiz questions to test student understanding.
{{context}}
LECTURE SUMMARY:
<<<MATERIAL
{{content}}
MATERIAL>>>

Requirements:
- Each question should test a key concept from the material
- Provide exactly 4 answer options (A, B, C, D) for each question
- All 4 options must be different and non-empty
- Ensure only one option is correct
- Make incorrect options plausible but clearly wrong
- Vary the difficulty from basic recall to application

IMPORTANT: Respond ONLY with the questions in the format below. No additional text before or after.
Separate questions with a line containing only ---

Format:
QUESTION: Your question here?
A) First option
B) Second option
C) Third option
D) Fourth option
ANSWER: A
EXPLANATION: Brief explanation of why this is correct
---
QUESTION: Next question?
..."#;

/// Render the prompt for a task
///
/// `content` is required. `context` names the section for per-chunk
/// summaries and adds an extra note to merge and quiz prompts.
pub fn build_prompt(task: TaskKind, content: &str, context: Option<&str>) -> Result<String> {
    if content.trim().is_empty() {
        return Err(LecternError::invalid_input("Prompt content cannot be empty"));
    }

    let content = escape(content);
    let context = context.map(str::trim).filter(|c| !c.is_empty()).map(escape);

    let prompt = match task {
        TaskKind::Summarize => match context {
            Some(section) => render(SECTION_TEMPLATE, &[("content", &content), ("context", &section)]),
            None => render(SUMMARY_TEMPLATE, &[("content", &content)]),
        },
        TaskKind::MergeSummaries => render(
            MERGE_TEMPLATE,
            &[("content", &content), ("context", &context_note(context.as_deref()))],
        ),
        TaskKind::GenerateQuiz { question_count } => {
            if question_count == 0 {
                return Err(LecternError::invalid_input("Question count must be greater than 0"));
            }
            render(
                QUIZ_TEMPLATE,
                &[
                    ("content", &content),
                    ("count", &question_count.to_string()),
                    ("context", &context_note(context.as_deref())),
                ],
            )
        }
    };

    Ok(prompt)
}

fn context_note(context: Option<&str>) -> String {
    context
        .map(|c| format!("\nADDITIONAL CONTEXT: {}\n", c))
        .unwrap_or_default()
}

/// Neutralize placeholder braces and material fences inside user content
fn escape(text: &str) -> String {
    let text = neutralize(text, "{{", "{ {");
    let text = neutralize(&text, "}}", "} }");
    let text = neutralize(&text, "<<<", "<< <");
    neutralize(&text, ">>>", "> >>")
}

fn neutralize(text: &str, pattern: &str, replacement: &str) -> String {
    let mut text = text.to_string();
    while text.contains(pattern) {
        text = text.replace(pattern, replacement);
    }
    text
}

/// Substitute `{{name}}` placeholders in a single pass
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        match after.find("}}") {
            Some(close) => {
                let name = &after[..close];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => output.push_str(value),
                    None => output.push_str(&rest[open..open + close + 4]),
                }
                rest = &after[close + 2..];
            }
            None => {
                output.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}
