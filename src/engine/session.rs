//! Quiz session state
//!
//! The learner moves through these views:
//!
//! ```text
//! Overview -> Lesson -> QuizSelection (more than one quiz) -> QuizInProgress -> QuizResults
//!     \-> ReviewChoice (completed module) -> Lesson | QuizSelection/QuizInProgress | QuizResults
//! ```

use std::collections::BTreeMap;
use std::fmt;

use super::error::EngineError;
use crate::content::model::{Difficulty, Quiz};
use crate::progress::record::QuizAttempt;

/// Answers given so far in a quiz that has not been submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    /// Selected option index per question id
    pub answers: BTreeMap<u64, usize>,
}

impl QuizDraft {
    /// Record an answer, replacing any earlier answer to the same question
    pub fn answer(&mut self, quiz: &Quiz, question_id: u64, option: usize) -> Result<(), EngineError> {
        let question = quiz
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(EngineError::UnknownQuestion(question_id))?;
        if option >= question.options.len() {
            return Err(EngineError::InvalidOption { question_id, option });
        }
        self.answers.insert(question_id, option);
        Ok(())
    }

    /// Number of the quiz's questions that have an answer
    pub fn answered_count(&self, quiz: &Quiz) -> usize {
        quiz.questions.iter().filter(|q| self.answers.contains_key(&q.id)).count()
    }

    /// Every question has an answer
    pub fn is_complete(&self, quiz: &Quiz) -> bool {
        self.answered_count(quiz) == quiz.questions.len()
    }

    /// Number of answers that match the correct option exactly
    pub fn score(&self, quiz: &Quiz) -> u32 {
        quiz.questions.iter().filter(|q| self.answers.get(&q.id) == Some(&q.correct)).count() as u32
    }
}

/// What the learner is looking at
#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    /// Module list, nothing selected
    #[default]
    Overview,
    /// A completed module was opened: review lessons, retake, or see results
    ReviewChoice { module: usize },
    /// Reading a lesson
    Lesson { module: usize, lesson: usize },
    /// Choosing one of several quizzes
    QuizSelection { module: usize },
    /// Answering a quiz
    QuizInProgress { module: usize, quiz: usize, draft: QuizDraft },
    /// Looking at the result of a submitted attempt
    QuizResults { module: usize, quiz: usize, attempt: QuizAttempt },
}

impl View {
    /// Index of the module this view belongs to
    pub fn module(&self) -> Option<usize> {
        match self {
            View::Overview => None,
            View::ReviewChoice { module }
            | View::Lesson { module, .. }
            | View::QuizSelection { module }
            | View::QuizInProgress { module, .. }
            | View::QuizResults { module, .. } => Some(*module),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::ReviewChoice { .. } => "review-choice",
            View::Lesson { .. } => "lesson",
            View::QuizSelection { .. } => "quiz-selection",
            View::QuizInProgress { .. } => "quiz",
            View::QuizResults { .. } => "results",
        }
    }
}

/// Status line for one quiz of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStatus {
    pub index: usize,
    pub title: String,
    pub question_count: usize,
    /// At least one attempt exists
    pub completed: bool,
    pub attempts: usize,
    /// Score and question count of the most recent attempt
    pub last_score: Option<(u32, u32)>,
}

/// A notification for the learner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ScoreRecorded { score: u32, total: u32, attempt_number: u32 },
    ModuleCompleted { title: String },
    PathCompleted { difficulty: Difficulty },
    ProgressNotSaved { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ScoreRecorded { score, total, attempt_number } => {
                write!(f, "You scored {}/{} (attempt {})", score, total, attempt_number)
            }
            Notice::ModuleCompleted { title } => write!(f, "Module complete: {}", title),
            Notice::PathCompleted { difficulty } => write!(
                f,
                "Congratulations! You have completed the entire {} learning path",
                difficulty
            ),
            Notice::ProgressNotSaved { reason } => {
                write!(f, "Your progress could not be saved: {}", reason)
            }
        }
    }
}

/// Result of submitting a quiz
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub attempt: QuizAttempt,
    /// Every quiz of the module now has an attempt
    pub module_completed: bool,
    /// This submission is what completed the module
    pub module_newly_completed: bool,
    /// Every module of the path is now complete
    pub path_completed: bool,
    pub notices: Vec<Notice>,
}
