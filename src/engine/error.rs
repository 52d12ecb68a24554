//! Errors surfaced to the learner by the progress engine

use thiserror::Error;

/// An action the learner tried that is not allowed right now
///
/// None of these change engine state; the action is simply refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Module not found: {0}")]
    UnknownModule(String),

    #[error("\"{title}\" is locked. Complete the previous module first")]
    ModuleLocked { title: String },

    #[error("No quiz available for \"{title}\"")]
    NoQuizzes { title: String },

    #[error("\"{title}\" has no questions yet")]
    EmptyQuiz { title: String },

    #[error("Quiz {0} does not exist in this module")]
    UnknownQuiz(usize),

    #[error("Question {0} is not part of this quiz")]
    UnknownQuestion(u64),

    #[error("Option {option} is not valid for question {question_id}")]
    InvalidOption { question_id: u64, option: usize },

    #[error("Answer all questions before submitting ({answered}/{total} answered)")]
    IncompleteAnswers { answered: usize, total: usize },

    #[error("No previous results for \"{title}\"")]
    NoAttempts { title: String },

    #[error("The next module is not available yet")]
    NextModuleUnavailable,

    #[error("Cannot {action} from the current view")]
    InvalidTransition { action: &'static str },
}
