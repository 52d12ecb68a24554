//! Learner progress engine
//!
//! `LearningPath` owns the loaded modules, the learner's progress record and
//! the current view. Every action either moves to a new view or is refused
//! with an `EngineError` and leaves the state untouched. Every change to the
//! progress record is written back through `ProgressSync`.

pub mod error;
pub mod navigation;
pub mod session;
pub mod sync;

pub use error::EngineError;
pub use session::{Notice, QuizDraft, QuizStatus, SubmitOutcome, View};
pub use sync::ProgressSync;

use crate::content::loader::{ContentOrigin, LoadedPath};
use crate::content::model::{Difficulty, Lesson, Module, Quiz};
use crate::progress::record::{ProgressRecord, attempt_key, is_path_completed};
use crate::progress::store::{KeyValueStore, ProgressStore};

/// One learner working through one tier
pub struct LearningPath<S> {
    difficulty: Difficulty,
    modules: Vec<Module>,
    origin: ContentOrigin,
    progress: ProgressRecord,
    view: View,
    sync: ProgressSync<S>,
}

impl<S: KeyValueStore> LearningPath<S> {
    /// Open a loaded path and restore the learner's saved progress
    pub fn open(path: LoadedPath, store: ProgressStore<S>) -> Self {
        let sync = ProgressSync::new(store, path.difficulty);
        let progress = sync.restore(&path.modules);
        tracing::info!(
            difficulty = %path.difficulty,
            modules = path.modules.len(),
            completed = progress.completed_modules.len(),
            "opened learning path"
        );

        Self {
            difficulty: path.difficulty,
            modules: path.modules,
            origin: path.origin,
            progress,
            view: View::Overview,
            sync,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Whether the modules came from the API or the bundled defaults
    pub fn origin(&self) -> ContentOrigin {
        self.origin
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn sync(&self) -> &ProgressSync<S> {
        &self.sync
    }

    /// Find a module by id
    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Module of the current view
    pub fn current_module(&self) -> Option<&Module> {
        self.view.module().and_then(|i| self.modules.get(i))
    }

    /// Lesson of the current view, when reading one
    pub fn current_lesson(&self) -> Option<&Lesson> {
        match self.view {
            View::Lesson { module, lesson } => self.modules.get(module)?.lessons.get(lesson),
            _ => None,
        }
    }

    /// Quiz of the current view, when answering or reviewing one
    pub fn current_quiz(&self) -> Option<&Quiz> {
        match self.view {
            View::QuizInProgress { module, quiz, .. } | View::QuizResults { module, quiz, .. } => {
                self.modules.get(module)?.quizzes().get(quiz)
            }
            _ => None,
        }
    }

    pub fn is_module_locked(&self, module_id: &str) -> bool {
        navigation::is_module_locked(&self.modules, &self.progress, module_id)
    }

    pub fn is_module_completed(&self, module_id: &str) -> bool {
        navigation::is_module_completed(&self.modules, &self.progress, module_id)
    }

    pub fn next_module(&self, module_id: &str) -> Option<&Module> {
        navigation::next_module(&self.modules, module_id)
    }

    /// Whether every module of the path is complete
    pub fn is_path_completed(&self) -> bool {
        is_path_completed(&self.modules, &self.progress)
    }

    /// Whether the "next module" action is available from the current module
    pub fn can_advance(&self) -> bool {
        self.current_module()
            .is_some_and(|m| navigation::can_advance(&self.modules, &self.progress, &m.id))
    }

    /// Completion status of each quiz of a module
    pub fn quiz_statuses(&self, module_id: &str) -> Result<Vec<QuizStatus>, EngineError> {
        let module =
            self.module(module_id).ok_or_else(|| EngineError::UnknownModule(module_id.into()))?;
        Ok(module
            .quizzes()
            .iter()
            .enumerate()
            .map(|(index, quiz)| {
                let attempts = self.progress.attempts(&attempt_key(&module.id, &quiz.title));
                QuizStatus {
                    index,
                    title: quiz.title.clone(),
                    question_count: quiz.questions.len(),
                    completed: !attempts.is_empty(),
                    attempts: attempts.len(),
                    last_score: attempts.last().map(|a| (a.score, a.total_questions)),
                }
            })
            .collect())
    }

    /// Open a module
    ///
    /// A completed module with attempts opens the review choice; otherwise
    /// the first lesson is shown.
    pub fn select_module(&mut self, module_id: &str) -> Result<&View, EngineError> {
        let index = navigation::module_index(&self.modules, module_id)
            .ok_or_else(|| EngineError::UnknownModule(module_id.into()))?;
        let module = &self.modules[index];

        if navigation::is_locked_at(&self.modules, &self.progress, index) {
            return Err(EngineError::ModuleLocked { title: module.title.clone() });
        }

        if self.progress.is_module_completed(module) && self.progress.has_module_attempts(module) {
            self.set_view(View::ReviewChoice { module: index });
        } else {
            self.show_lesson(index, 0);
        }
        Ok(&self.view)
    }

    /// From the review choice or a quiz result: start over at the first lesson
    pub fn review_lessons(&mut self) -> Result<&View, EngineError> {
        let (View::ReviewChoice { module } | View::QuizResults { module, .. }) = self.view else {
            return Err(EngineError::InvalidTransition { action: "review lessons" });
        };
        self.show_lesson(module, 0);
        Ok(&self.view)
    }

    /// From the review choice: show the most recent attempt of the module
    pub fn view_last_results(&mut self) -> Result<&View, EngineError> {
        let View::ReviewChoice { module } = self.view else {
            return Err(EngineError::InvalidTransition { action: "view last results" });
        };
        let current = &self.modules[module];

        let latest = current
            .quizzes()
            .iter()
            .enumerate()
            .filter_map(|(i, quiz)| {
                self.progress.last_attempt(&attempt_key(&current.id, &quiz.title)).map(|a| (i, a))
            })
            .max_by_key(|(_, attempt)| attempt.timestamp);

        let Some((quiz, attempt)) = latest else {
            return Err(EngineError::NoAttempts { title: current.title.clone() });
        };
        let attempt = attempt.clone();
        self.set_view(View::QuizResults { module, quiz, attempt });
        Ok(&self.view)
    }

    /// Move to the next lesson, or into the quiz after the last lesson
    pub fn next_lesson(&mut self) -> Result<&View, EngineError> {
        let View::Lesson { module, lesson } = self.view else {
            return Err(EngineError::InvalidTransition { action: "go to the next lesson" });
        };

        if lesson + 1 < self.modules[module].lessons.len() {
            self.show_lesson(module, lesson + 1);
            Ok(&self.view)
        } else {
            self.enter_quiz(module)
        }
    }

    /// Move to the previous lesson; does nothing at the first lesson
    pub fn previous_lesson(&mut self) -> Result<&View, EngineError> {
        let View::Lesson { module, lesson } = self.view else {
            return Err(EngineError::InvalidTransition { action: "go to the previous lesson" });
        };
        if lesson > 0 {
            self.show_lesson(module, lesson - 1);
        }
        Ok(&self.view)
    }

    /// Jump to the quiz of the current module from any lesson or result view
    pub fn go_to_quiz(&mut self) -> Result<&View, EngineError> {
        let module = self.view.module().ok_or(EngineError::InvalidTransition { action: "open the quiz" })?;
        self.enter_quiz(module)
    }

    /// Pick one quiz from the selection list
    pub fn select_quiz(&mut self, quiz: usize) -> Result<&View, EngineError> {
        let View::QuizSelection { module } = self.view else {
            return Err(EngineError::InvalidTransition { action: "select a quiz" });
        };
        if quiz >= self.modules[module].quizzes().len() {
            return Err(EngineError::UnknownQuiz(quiz));
        }
        self.start_quiz(module, quiz)
    }

    /// Answer a question of the quiz in progress
    pub fn answer(&mut self, question_id: u64, option: usize) -> Result<(), EngineError> {
        let View::QuizInProgress { module, quiz, ref mut draft } = self.view else {
            return Err(EngineError::InvalidTransition { action: "answer a question" });
        };
        draft.answer(&self.modules[module].quizzes()[quiz], question_id, option)
    }

    /// Whether every question of the quiz in progress has an answer
    pub fn can_submit(&self) -> bool {
        match &self.view {
            View::QuizInProgress { module, quiz, draft } => {
                draft.is_complete(&self.modules[*module].quizzes()[*quiz])
            }
            _ => false,
        }
    }

    /// Submit the quiz in progress
    ///
    /// Records a new attempt, completes the module once every quiz has an
    /// attempt, saves the progress, and records whole-path completion.
    pub fn submit(&mut self) -> Result<SubmitOutcome, EngineError> {
        let View::QuizInProgress { module, quiz, ref draft } = self.view else {
            return Err(EngineError::InvalidTransition { action: "submit" });
        };
        let current = &self.modules[module];
        let current_quiz = &current.quizzes()[quiz];

        let total = current_quiz.questions.len();
        let answered = draft.answered_count(current_quiz);
        if answered < total {
            return Err(EngineError::IncompleteAnswers { answered, total });
        }

        let score = draft.score(current_quiz);
        let key = attempt_key(&current.id, &current_quiz.title);
        let attempt = self
            .progress
            .record_attempt(&key, &current_quiz.title, score, total as u32, draft.answers.clone())
            .clone();
        tracing::info!(
            module = %current.id,
            quiz = %current_quiz.title,
            score,
            total,
            attempt = attempt.attempt_number,
            "quiz submitted"
        );

        let mut notices = vec![Notice::ScoreRecorded {
            score,
            total: total as u32,
            attempt_number: attempt.attempt_number,
        }];

        // Uses the attempt map including the attempt just recorded
        let module_completed = self.progress.is_module_completed(current);
        let mut module_newly_completed = false;
        if module_completed {
            module_newly_completed = self.progress.mark_completed(&current.id);
            self.progress.raise_module_progress(&current.id, 100.0);
            if module_newly_completed {
                notices.push(Notice::ModuleCompleted { title: current.title.clone() });
            }
        }

        let module_id = current.id.clone();
        if let Err(e) = self.sync.persist(&self.modules, &mut self.progress) {
            tracing::error!(module = %module_id, "failed to save progress: {}", e);
            notices.push(Notice::ProgressNotSaved { reason: e.to_string() });
        }

        let path_completed = self.is_path_completed();
        if path_completed {
            if let Err(e) = self.sync.record_path_completion() {
                tracing::error!("failed to save overall progress: {}", e);
                notices.push(Notice::ProgressNotSaved { reason: e.to_string() });
            }
            notices.push(Notice::PathCompleted { difficulty: self.difficulty });
        }

        self.set_view(View::QuizResults { module, quiz, attempt: attempt.clone() });

        Ok(SubmitOutcome { attempt, module_completed, module_newly_completed, path_completed, notices })
    }

    /// Take the same quiz again with a blank answer sheet
    pub fn retake(&mut self) -> Result<&View, EngineError> {
        let View::QuizResults { module, quiz, .. } = self.view else {
            return Err(EngineError::InvalidTransition { action: "retake the quiz" });
        };
        self.start_quiz(module, quiz)
    }

    /// From the review choice: retake the module's quiz
    pub fn retake_from_review(&mut self) -> Result<&View, EngineError> {
        let View::ReviewChoice { module } = self.view else {
            return Err(EngineError::InvalidTransition { action: "retake the quiz" });
        };
        self.enter_quiz(module)
    }

    /// Open the next module once the current one is complete
    pub fn advance_to_next_module(&mut self) -> Result<&View, EngineError> {
        if !self.can_advance() {
            return Err(EngineError::NextModuleUnavailable);
        }
        let Some(next) = self.view.module().map(|i| i + 1) else {
            return Err(EngineError::NextModuleUnavailable);
        };
        self.show_lesson(next, 0);
        Ok(&self.view)
    }

    /// Leave the module and return to the module list
    pub fn exit(&mut self) -> &View {
        self.set_view(View::Overview);
        &self.view
    }

    fn set_view(&mut self, view: View) {
        tracing::debug!(from = self.view.name(), to = view.name(), "view change");
        self.view = view;
    }

    /// Show a lesson and raise the module's lesson progress
    fn show_lesson(&mut self, module: usize, lesson: usize) {
        self.set_view(View::Lesson { module, lesson });

        let current = &self.modules[module];
        if current.lessons.is_empty() {
            return;
        }
        let percent = navigation::lesson_progress_percent(lesson, current.lessons.len());
        if self.progress.raise_module_progress(&current.id, percent) {
            let module_id = current.id.clone();
            if let Err(e) = self.sync.persist(&self.modules, &mut self.progress) {
                tracing::error!(module = %module_id, "failed to save lesson progress: {}", e);
            }
        }
    }

    /// Go to the quiz selection, or straight into the only quiz
    fn enter_quiz(&mut self, module: usize) -> Result<&View, EngineError> {
        let current = &self.modules[module];
        match current.quizzes().len() {
            0 => Err(EngineError::NoQuizzes { title: current.title.clone() }),
            1 => self.start_quiz(module, 0),
            _ => {
                self.set_view(View::QuizSelection { module });
                Ok(&self.view)
            }
        }
    }

    fn start_quiz(&mut self, module: usize, quiz: usize) -> Result<&View, EngineError> {
        let selected = &self.modules[module].quizzes()[quiz];
        if selected.questions.is_empty() {
            return Err(EngineError::EmptyQuiz { title: selected.title.clone() });
        }
        self.set_view(View::QuizInProgress { module, quiz, draft: QuizDraft::default() });
        Ok(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::{Question, QuizConfig};
    use crate::progress::store::{MemoryStore, StoreError};
    use pretty_assertions::assert_eq;

    fn question(id: u64, correct: usize) -> Question {
        Question {
            id,
            question: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct,
            explanation: String::new(),
            image: None,
            video: None,
            required: true,
        }
    }

    fn quiz(title: &str, question_count: u64) -> Quiz {
        Quiz {
            id: title.to_lowercase(),
            title: title.into(),
            questions: (1..=question_count).map(|id| question(id, 0)).collect(),
        }
    }

    fn lesson(id: u64) -> Lesson {
        Lesson {
            id,
            title: format!("Lesson {id}"),
            content: String::new(),
            points: Vec::new(),
            images: Vec::new(),
            videos: Vec::new(),
        }
    }

    fn module(id: &str, lesson_count: u64, quizzes: Vec<Quiz>) -> Module {
        let mut module = Module::new(id, id.to_uppercase(), Difficulty::Expert);
        module.lessons = (1..=lesson_count).map(lesson).collect();
        module.quiz_config = QuizConfig::Multiple(quizzes);
        module
    }

    fn three_modules() -> Vec<Module> {
        vec![
            module("m1", 2, vec![quiz("Basics", 2)]),
            module("m2", 1, vec![quiz("A", 2), quiz("B", 1)]),
            module("m3", 1, vec![quiz("Final", 1)]),
        ]
    }

    fn open(modules: Vec<Module>) -> LearningPath<MemoryStore> {
        let store = ProgressStore::new(MemoryStore::default(), Some("7".into()));
        LearningPath::open(LoadedPath::new(Difficulty::Expert, modules, ContentOrigin::Remote), store)
    }

    fn answer_all(path: &mut LearningPath<MemoryStore>) {
        let questions: Vec<u64> =
            path.current_quiz().unwrap().questions.iter().map(|q| q.id).collect();
        for id in questions {
            path.answer(id, 0).unwrap();
        }
    }

    fn pass_quiz(path: &mut LearningPath<MemoryStore>) -> SubmitOutcome {
        answer_all(path);
        path.submit().unwrap()
    }

    #[test]
    fn opening_module_shows_first_lesson_and_records_progress() {
        let mut path = open(three_modules());
        assert_eq!(path.select_module("m1").unwrap(), &View::Lesson { module: 0, lesson: 0 });
        assert_eq!(path.progress().module_progress.get("m1"), Some(&50.0));
        assert_eq!(path.current_lesson().map(|l| l.id), Some(1));

        path.next_lesson().unwrap();
        assert_eq!(path.progress().module_progress.get("m1"), Some(&100.0));

        path.previous_lesson().unwrap();
        path.previous_lesson().unwrap();
        assert_eq!(path.view(), &View::Lesson { module: 0, lesson: 0 });
        assert_eq!(path.progress().module_progress.get("m1"), Some(&100.0));
    }

    #[test]
    fn locked_module_is_refused() {
        let mut path = open(three_modules());
        let err = path.select_module("m2").unwrap_err();
        assert_eq!(err, EngineError::ModuleLocked { title: "M2".into() });
        assert_eq!(path.view(), &View::Overview);

        assert!(matches!(path.select_module("nope"), Err(EngineError::UnknownModule(_))));
    }

    #[test]
    fn next_lesson_after_last_enters_single_quiz() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.next_lesson().unwrap();
        let view = path.next_lesson().unwrap();
        assert!(matches!(view, View::QuizInProgress { module: 0, quiz: 0, .. }));
    }

    #[test]
    fn submit_requires_every_answer() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        path.answer(1, 0).unwrap();
        assert!(!path.can_submit());

        let err = path.submit().unwrap_err();
        assert_eq!(err, EngineError::IncompleteAnswers { answered: 1, total: 2 });
        assert!(path.progress().quiz_attempts.is_empty());
        assert!(matches!(path.view(), View::QuizInProgress { .. }));
    }

    #[test]
    fn submitting_only_quiz_completes_module_and_unlocks_next() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        path.answer(1, 0).unwrap();
        path.answer(2, 1).unwrap();
        let outcome = path.submit().unwrap();

        assert_eq!(outcome.attempt.score, 1);
        assert_eq!(outcome.attempt.total_questions, 2);
        assert_eq!(outcome.attempt.attempt_number, 1);
        assert!(outcome.module_completed);
        assert!(outcome.module_newly_completed);
        assert!(!outcome.path_completed);
        assert!(outcome.notices.contains(&Notice::ModuleCompleted { title: "M1".into() }));

        assert!(path.is_module_completed("m1"));
        assert!(!path.is_module_locked("m2"));
        assert!(path.is_module_locked("m3"));
        assert_eq!(path.progress().module_progress.get("m1"), Some(&100.0));
        assert!(path.can_advance());

        path.advance_to_next_module().unwrap();
        assert_eq!(path.view(), &View::Lesson { module: 1, lesson: 0 });
    }

    #[test]
    fn module_with_two_quizzes_needs_both() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        pass_quiz(&mut path);
        path.advance_to_next_module().unwrap();

        assert_eq!(path.go_to_quiz().unwrap(), &View::QuizSelection { module: 1 });
        path.select_quiz(0).unwrap();
        let outcome = pass_quiz(&mut path);
        assert_eq!((outcome.attempt.score, outcome.attempt.total_questions), (2, 2));
        assert_eq!(outcome.attempt.quiz_title, "A");
        assert!(!outcome.module_completed);
        assert!(!path.is_module_completed("m2"));
        assert!(path.is_module_locked("m3"));
        assert!(!path.can_advance());
        assert_eq!(path.advance_to_next_module().unwrap_err(), EngineError::NextModuleUnavailable);

        let statuses = path.quiz_statuses("m2").unwrap();
        assert!(statuses[0].completed);
        assert_eq!(statuses[0].last_score, Some((2, 2)));
        assert!(!statuses[1].completed);
        assert_eq!(statuses[1].last_score, None);

        path.go_to_quiz().unwrap();
        path.select_quiz(1).unwrap();
        let outcome = pass_quiz(&mut path);
        assert_eq!((outcome.attempt.score, outcome.attempt.total_questions), (1, 1));
        assert!(outcome.module_completed);
        assert!(path.is_module_completed("m2"));
        assert!(!path.is_module_locked("m3"));
    }

    #[test]
    fn retakes_are_numbered_and_history_is_kept() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();

        for expected in 1..=3 {
            let outcome = pass_quiz(&mut path);
            assert_eq!(outcome.attempt.attempt_number, expected);
            path.retake().unwrap();
            assert!(matches!(path.view(), View::QuizInProgress { draft, .. } if draft.answers.is_empty()));
        }

        let history = path.progress().attempts(&attempt_key("m1", "Basics"));
        assert_eq!(history.iter().map(|a| a.attempt_number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(path.progress().completed_modules, vec!["m1".to_string()]);
    }

    #[test]
    fn completed_module_opens_review_choice() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        let outcome = pass_quiz(&mut path);
        path.exit();

        assert_eq!(path.select_module("m1").unwrap(), &View::ReviewChoice { module: 0 });

        let view = path.view_last_results().unwrap();
        assert!(matches!(view, View::QuizResults { attempt, .. } if *attempt == outcome.attempt));

        path.exit();
        path.select_module("m1").unwrap();
        assert_eq!(path.review_lessons().unwrap(), &View::Lesson { module: 0, lesson: 0 });

        path.exit();
        path.select_module("m1").unwrap();
        assert!(matches!(path.retake_from_review().unwrap(), View::QuizInProgress { .. }));
    }

    #[test]
    fn results_lead_back_to_lessons() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        pass_quiz(&mut path);

        assert_eq!(path.review_lessons().unwrap(), &View::Lesson { module: 0, lesson: 0 });
        assert!(matches!(path.review_lessons(), Err(EngineError::InvalidTransition { .. })));
    }

    #[test]
    fn module_without_quiz_is_refused() {
        let mut path = open(vec![module("m1", 1, Vec::new())]);
        path.select_module("m1").unwrap();
        assert_eq!(path.next_lesson().unwrap_err(), EngineError::NoQuizzes { title: "M1".into() });
        assert_eq!(path.view(), &View::Lesson { module: 0, lesson: 0 });
    }

    #[test]
    fn quiz_without_questions_is_refused() {
        let mut path = open(vec![module("m1", 1, vec![quiz("Empty", 0)])]);
        path.select_module("m1").unwrap();
        assert_eq!(path.go_to_quiz().unwrap_err(), EngineError::EmptyQuiz { title: "Empty".into() });
    }

    #[test]
    fn actions_from_wrong_view_are_refused() {
        let mut path = open(three_modules());
        assert!(matches!(path.submit(), Err(EngineError::InvalidTransition { .. })));
        assert!(matches!(path.answer(1, 0), Err(EngineError::InvalidTransition { .. })));
        assert!(matches!(path.select_quiz(0), Err(EngineError::InvalidTransition { .. })));
        assert!(matches!(path.view_last_results(), Err(EngineError::InvalidTransition { .. })));
        assert_eq!(path.view(), &View::Overview);
    }

    #[test]
    fn completing_every_module_completes_path() {
        let mut path = open(three_modules());
        for (id, quizzes) in [("m1", 1), ("m2", 2), ("m3", 1)] {
            path.exit();
            path.select_module(id).unwrap();
            for index in 0..quizzes {
                path.go_to_quiz().unwrap();
                if quizzes > 1 {
                    path.select_quiz(index).unwrap();
                }
                let outcome = pass_quiz(&mut path);
                assert_eq!(outcome.path_completed, id == "m3");
            }
        }

        assert!(path.is_path_completed());
        assert!(path.progress().path_completed);
        assert_eq!(path.sync().overall().get(Difficulty::Expert), 100);
        assert!(!path.can_advance());
    }

    #[test]
    fn progress_survives_reopening() {
        let mut path = open(three_modules());
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        pass_quiz(&mut path);
        let saved = path.sync().store().store().clone();

        let store = ProgressStore::new(saved, Some("7".into()));
        let reopened = LearningPath::open(
            LoadedPath::new(Difficulty::Expert, three_modules(), ContentOrigin::Remote),
            store,
        );
        assert!(reopened.is_module_completed("m1"));
        assert!(!reopened.is_module_locked("m2"));
        assert_eq!(reopened.progress().attempts(&attempt_key("m1", "Basics")).len(), 1);
    }

    #[derive(Default)]
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn failed_save_keeps_attempt_and_warns() {
        let store = ProgressStore::new(ReadOnlyStore, None);
        let loaded = LoadedPath::new(Difficulty::Expert, three_modules(), ContentOrigin::Fallback);
        let mut path = LearningPath::open(loaded, store);
        path.select_module("m1").unwrap();
        path.go_to_quiz().unwrap();
        path.answer(1, 0).unwrap();
        path.answer(2, 0).unwrap();

        let outcome = path.submit().unwrap();
        assert!(outcome.notices.iter().any(|n| matches!(n, Notice::ProgressNotSaved { .. })));
        assert!(path.is_module_completed("m1"));
    }
}
