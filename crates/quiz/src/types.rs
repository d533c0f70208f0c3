use lectern_common::{LecternError, Result};
use serde::{Deserialize, Serialize};

/// Answer options per question
pub const OPTION_COUNT: usize = 4;

/// Multiple-choice question
///
/// Always holds a non-empty question, four unique non-empty options and a
/// correct index below [`OPTION_COUNT`]. Deserialization runs the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizQuestion")]
pub struct QuizQuestion {
    question: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

/// Unvalidated wire form
#[derive(Deserialize)]
struct RawQuizQuestion {
    question: String,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    explanation: Option<String>,
}

impl TryFrom<RawQuizQuestion> for QuizQuestion {
    type Error = LecternError;

    fn try_from(raw: RawQuizQuestion) -> Result<Self> {
        let options: [String; OPTION_COUNT] = raw.options.try_into().map_err(|options: Vec<String>| {
            LecternError::invalid_input(format!(
                "Question must have exactly {} options, got {}",
                OPTION_COUNT,
                options.len()
            ))
        })?;

        Self::new(raw.question, options, raw.correct_index, raw.explanation)
    }
}

impl QuizQuestion {
    /// Create a validated question; text is trimmed
    pub fn new(
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
        explanation: Option<String>,
    ) -> Result<Self> {
        let question = question.into().trim().to_string();
        if question.is_empty() {
            return Err(LecternError::invalid_input("Question text cannot be empty"));
        }

        let options = options.map(|o| o.trim().to_string());
        for (i, option) in options.iter().enumerate() {
            if option.is_empty() {
                return Err(LecternError::invalid_input(format!(
                    "Option {} is empty",
                    option_letter(i)
                )));
            }
            if options[..i].contains(option) {
                return Err(LecternError::invalid_input(format!(
                    "Option {} duplicates an earlier option",
                    option_letter(i)
                )));
            }
        }

        if correct_index >= OPTION_COUNT {
            return Err(LecternError::invalid_input(format!(
                "Correct index {} out of range",
                correct_index
            )));
        }

        let explanation = explanation
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            question,
            options,
            correct_index,
            explanation,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

/// Option label ("A" to "D")
pub fn option_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Generated quiz, in question order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    questions: Vec<QuizQuestion>,
}

impl QuizSet {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
