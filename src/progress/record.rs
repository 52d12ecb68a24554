//! Persisted progress records

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::model::{Difficulty, Module};

/// Build the attempt key for a quiz of a module
pub fn attempt_key(module_id: &str, quiz_title: &str) -> String {
    format!("{}_{}", module_id, quiz_title)
}

/// Module id part of an attempt key (everything before the first `_`)
pub fn module_id_of_attempt_key(key: &str) -> Option<&str> {
    key.split_once('_').map(|(module_id, _)| module_id)
}

/// One submitted quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    /// Number of exactly matching answers
    pub score: u32,
    pub total_questions: u32,
    /// Selected option index per question id
    pub answers: BTreeMap<u64, usize>,
    pub timestamp: DateTime<Utc>,
    pub quiz_title: String,
    /// 1-based, per attempt key
    pub attempt_number: u32,
}

impl QuizAttempt {
    /// Score as a percentage of the question count
    pub fn percentage(&self) -> u8 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u8
    }
}

/// Learner progress for one tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_modules: Vec<String>,
    /// Lesson progress per module, in percent
    #[serde(default)]
    pub module_progress: BTreeMap<String, f64>,
    /// Attempt history per attempt key, oldest first
    #[serde(default)]
    pub quiz_attempts: BTreeMap<String, Vec<QuizAttempt>>,
    #[serde(default)]
    pub total_modules: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub path_completed: bool,
}

impl ProgressRecord {
    /// True when none of the progress collections hold anything
    pub fn has_no_progress(&self) -> bool {
        self.completed_modules.is_empty()
            && self.module_progress.is_empty()
            && self.quiz_attempts.is_empty()
    }

    /// Attempts recorded under a key, oldest first
    pub fn attempts(&self, key: &str) -> &[QuizAttempt] {
        self.quiz_attempts.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Has the quiz been submitted at least once?
    pub fn has_attempts(&self, key: &str) -> bool {
        !self.attempts(key).is_empty()
    }

    /// Most recent attempt under a key
    pub fn last_attempt(&self, key: &str) -> Option<&QuizAttempt> {
        self.attempts(key).last()
    }

    /// Append an attempt, numbering it after the existing ones
    pub fn record_attempt(
        &mut self,
        key: &str,
        quiz_title: &str,
        score: u32,
        total_questions: u32,
        answers: BTreeMap<u64, usize>,
    ) -> &QuizAttempt {
        let history = self.quiz_attempts.entry(key.to_string()).or_default();
        history.push(QuizAttempt {
            score,
            total_questions,
            answers,
            timestamp: Utc::now(),
            quiz_title: quiz_title.to_string(),
            attempt_number: history.len() as u32 + 1,
        });
        &history[history.len() - 1]
    }

    /// Whether every quiz of the module has at least one attempt
    ///
    /// A module without quizzes is never complete.
    pub fn is_module_completed(&self, module: &Module) -> bool {
        let quizzes = module.quizzes();
        !quizzes.is_empty()
            && quizzes.iter().all(|quiz| self.has_attempts(&attempt_key(&module.id, &quiz.title)))
    }

    /// Whether any quiz of the module has an attempt
    pub fn has_module_attempts(&self, module: &Module) -> bool {
        module.quizzes().iter().any(|quiz| self.has_attempts(&attempt_key(&module.id, &quiz.title)))
    }

    /// Add a module to the completed list if it is not there yet
    pub fn mark_completed(&mut self, module_id: &str) -> bool {
        if self.completed_modules.iter().any(|id| id == module_id) {
            return false;
        }
        self.completed_modules.push(module_id.to_string());
        true
    }

    /// Raise the lesson progress of a module; never lowers it
    pub fn raise_module_progress(&mut self, module_id: &str, percent: f64) -> bool {
        let entry = self.module_progress.entry(module_id.to_string()).or_insert(0.0);
        if percent > *entry {
            *entry = percent;
            true
        } else {
            false
        }
    }

    /// Keep only entries that refer to one of the given modules
    ///
    /// If nothing survives, the result is an empty record even when the
    /// input held stale entries.
    pub fn validated_against(self, modules: &[Module]) -> Self {
        let known: BTreeSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();
        let is_known = |id: &str| known.contains(id);

        let completed_modules: Vec<String> =
            self.completed_modules.into_iter().filter(|id| is_known(id.as_str())).collect();
        let module_progress: BTreeMap<String, f64> =
            self.module_progress.into_iter().filter(|(id, _)| is_known(id.as_str())).collect();
        let quiz_attempts: BTreeMap<String, Vec<QuizAttempt>> = self
            .quiz_attempts
            .into_iter()
            .filter(|(key, _)| module_id_of_attempt_key(key).is_some_and(is_known))
            .collect();

        let pruned = Self { completed_modules, module_progress, quiz_attempts, ..self };
        if pruned.has_no_progress() {
            return Self::default();
        }
        pruned
    }
}

/// Whether every module of a path is complete
///
/// An empty module list is never complete.
pub fn is_path_completed(modules: &[Module], record: &ProgressRecord) -> bool {
    !modules.is_empty() && modules.iter().all(|m| record.is_module_completed(m))
}

/// Cross-tier completion percentages, keyed by lowercase tier name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverallProgress {
    pub tiers: BTreeMap<String, u8>,
}

impl OverallProgress {
    /// Completion percentage of a tier
    pub fn get(&self, difficulty: Difficulty) -> u8 {
        self.tiers.get(difficulty.as_str()).copied().unwrap_or(0)
    }

    /// Set the completion percentage of a tier
    pub fn set(&mut self, difficulty: Difficulty, percent: u8) {
        self.tiers.insert(difficulty.as_str().to_string(), percent.min(100));
    }
}
