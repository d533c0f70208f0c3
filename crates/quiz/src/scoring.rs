use lectern_common::{LecternError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::{QuizSet, OPTION_COUNT};

/// Answers selected so far, bound to the question count of one quiz
///
/// Updates return a new attempt; the original is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizAttempt")]
pub struct QuizAttempt {
    question_count: usize,
    answers: BTreeMap<usize, usize>,
}

#[derive(Deserialize)]
struct RawQuizAttempt {
    question_count: usize,
    #[serde(default)]
    answers: BTreeMap<usize, usize>,
}

impl TryFrom<RawQuizAttempt> for QuizAttempt {
    type Error = LecternError;

    fn try_from(raw: RawQuizAttempt) -> Result<Self> {
        let attempt = Self {
            question_count: raw.question_count,
            answers: BTreeMap::new(),
        };
        raw.answers
            .into_iter()
            .try_fold(attempt, |attempt, (question, option)| attempt.record_answer(question, option))
    }
}

impl QuizAttempt {
    /// Empty attempt for a quiz
    pub fn new(quiz: &QuizSet) -> Self {
        Self {
            question_count: quiz.len(),
            answers: BTreeMap::new(),
        }
    }

    /// Attempt with one answer recorded (or replaced)
    pub fn record_answer(&self, question_index: usize, option_index: usize) -> Result<Self> {
        if question_index >= self.question_count {
            return Err(LecternError::invalid_input(format!(
                "Question index {} out of range (quiz has {} questions)",
                question_index, self.question_count
            )));
        }
        if option_index >= OPTION_COUNT {
            return Err(LecternError::invalid_input(format!(
                "Option index {} out of range (0-{})",
                option_index,
                OPTION_COUNT - 1
            )));
        }

        let mut next = self.clone();
        next.answers.insert(question_index, option_index);
        Ok(next)
    }

    /// Fresh attempt for the same quiz
    pub fn reset(&self) -> Self {
        Self {
            question_count: self.question_count,
            answers: BTreeMap::new(),
        }
    }

    pub fn answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Whether this attempt was started for `quiz`
    pub fn matches(&self, quiz: &QuizSet) -> bool {
        self.question_count == quiz.len()
    }
}

/// Final result of an attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,

    /// Correctness per question, in quiz order
    pub per_question: Vec<bool>,
}

impl Score {
    /// Percentage of correct answers (0 for an empty quiz)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }
}

/// Grade band shown with a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    KeepPracticing,
}

impl Grade {
    fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Grade::Excellent
        } else if percentage >= 60.0 {
            Grade::Good
        } else {
            Grade::KeepPracticing
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "Excellent!"),
            Grade::Good => write!(f, "Good!"),
            Grade::KeepPracticing => write!(f, "Keep practicing!"),
        }
    }
}

/// Score an attempt; unanswered questions count as incorrect
pub fn score(attempt: &QuizAttempt, quiz: &QuizSet) -> Score {
    let per_question: Vec<bool> = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(i, question)| attempt.answer(i).is_some_and(|option| question.is_correct(option)))
        .collect();

    Score {
        correct: per_question.iter().filter(|&&correct| correct).count(),
        total: quiz.len(),
        per_question,
    }
}
