//! Lectern Quiz
//!
//! Multiple-choice quiz generation from summaries, strict response
//! parsing and session scoring

mod generator;
mod parser;
mod scoring;
mod types;

pub use generator::QuizGenerator;
pub use parser::parse_quiz;
pub use scoring::{score, Grade, QuizAttempt, Score};
pub use types::{option_letter, QuizQuestion, QuizSet, OPTION_COUNT};
