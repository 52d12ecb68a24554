//! Module unlock chain and lesson sequencing

use crate::content::model::Module;
use crate::progress::record::ProgressRecord;

/// Position of a module in the path
pub fn module_index(modules: &[Module], module_id: &str) -> Option<usize> {
    modules.iter().position(|m| m.id == module_id)
}

/// Whether the module exists and every one of its quizzes has an attempt
pub fn is_module_completed(modules: &[Module], record: &ProgressRecord, module_id: &str) -> bool {
    module_index(modules, module_id).is_some_and(|i| record.is_module_completed(&modules[i]))
}

/// Whether the module at `index` is locked
///
/// The first module is always open; every other module opens only when its
/// immediate predecessor is complete.
pub fn is_locked_at(modules: &[Module], record: &ProgressRecord, index: usize) -> bool {
    match index {
        0 => false,
        i if i < modules.len() => !record.is_module_completed(&modules[i - 1]),
        _ => true,
    }
}

/// Whether a module is locked; unknown modules count as locked
pub fn is_module_locked(modules: &[Module], record: &ProgressRecord, module_id: &str) -> bool {
    module_index(modules, module_id).is_none_or(|i| is_locked_at(modules, record, i))
}

/// The module after `module_id`, if any
pub fn next_module<'a>(modules: &'a [Module], module_id: &str) -> Option<&'a Module> {
    module_index(modules, module_id).and_then(|i| modules.get(i + 1))
}

/// Whether the learner may move on from `module_id` to the next module
///
/// Requires a next module that is unlocked and a fully completed current
/// module; finishing only some of the current module's quizzes is not enough.
pub fn can_advance(modules: &[Module], record: &ProgressRecord, module_id: &str) -> bool {
    let Some(index) = module_index(modules, module_id) else {
        return false;
    };
    index + 1 < modules.len()
        && !is_locked_at(modules, record, index + 1)
        && record.is_module_completed(&modules[index])
}

/// Lesson progress after viewing the lesson at `lesson_index`, in percent
pub fn lesson_progress_percent(lesson_index: usize, lesson_count: usize) -> f64 {
    if lesson_count == 0 {
        return 0.0;
    }
    let viewed = (lesson_index + 1).min(lesson_count);
    ((viewed as f64 / lesson_count as f64) * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::{Difficulty, Question, Quiz, QuizConfig};
    use crate::progress::record::attempt_key;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn module(id: &str, quiz_count: usize) -> Module {
        let mut module = Module::new(id, id, Difficulty::Expert);
        let quizzes = (0..quiz_count)
            .map(|i| Quiz {
                id: format!("{id}-{i}"),
                title: format!("Quiz {i}"),
                questions: vec![Question {
                    id: 1,
                    question: "Q".into(),
                    options: vec!["a".into(), "b".into()],
                    correct: 0,
                    explanation: String::new(),
                    image: None,
                    video: None,
                    required: true,
                }],
            })
            .collect();
        module.quiz_config = QuizConfig::Multiple(quizzes);
        module
    }

    fn complete(record: &mut ProgressRecord, module: &Module) {
        for quiz in module.quizzes() {
            record.record_attempt(
                &attempt_key(&module.id, &quiz.title),
                &quiz.title,
                1,
                1,
                BTreeMap::new(),
            );
        }
    }

    fn path() -> Vec<Module> {
        vec![module("m0", 1), module("m1", 2), module("m2", 1)]
    }

    #[test]
    fn first_module_is_always_unlocked() {
        let modules = path();
        assert!(!is_module_locked(&modules, &ProgressRecord::default(), "m0"));
    }

    #[test]
    fn unknown_module_is_locked_and_incomplete() {
        let modules = path();
        let record = ProgressRecord::default();
        assert!(is_module_locked(&modules, &record, "ghost"));
        assert!(!is_module_completed(&modules, &record, "ghost"));
        assert!(next_module(&modules, "ghost").is_none());
    }

    #[test]
    fn second_module_locked_until_first_complete() {
        let modules = path();
        let mut record = ProgressRecord::default();
        assert!(is_module_locked(&modules, &record, "m1"));
        assert!(!can_advance(&modules, &record, "m0"));

        complete(&mut record, &modules[0]);
        assert!(!is_module_locked(&modules, &record, "m1"));
        assert!(can_advance(&modules, &record, "m0"));
        assert_eq!(next_module(&modules, "m0").map(|m| m.id.as_str()), Some("m1"));
    }

    #[test]
    fn partial_quiz_completion_does_not_advance() {
        let modules = path();
        let mut record = ProgressRecord::default();
        complete(&mut record, &modules[0]);
        let first_quiz = &modules[1].quizzes()[0];
        record.record_attempt(
            &attempt_key("m1", &first_quiz.title),
            &first_quiz.title,
            1,
            1,
            BTreeMap::new(),
        );

        assert!(!is_module_completed(&modules, &record, "m1"));
        assert!(is_module_locked(&modules, &record, "m2"));
        assert!(!can_advance(&modules, &record, "m1"));
    }

    #[test]
    fn last_module_cannot_advance() {
        let modules = path();
        let mut record = ProgressRecord::default();
        for module in &modules {
            complete(&mut record, module);
        }
        assert!(!can_advance(&modules, &record, "m2"));
        assert!(next_module(&modules, "m2").is_none());
    }

    #[test]
    fn module_without_quizzes_blocks_the_chain() {
        let modules = vec![module("m0", 0), module("m1", 1)];
        let record = ProgressRecord::default();
        assert!(!is_module_completed(&modules, &record, "m0"));
        assert!(is_module_locked(&modules, &record, "m1"));
    }

    #[test]
    fn lesson_percent() {
        assert_eq!(lesson_progress_percent(0, 4), 25.0);
        assert_eq!(lesson_progress_percent(3, 4), 100.0);
        assert_eq!(lesson_progress_percent(1, 3), 67.0);
        assert_eq!(lesson_progress_percent(9, 3), 100.0);
        assert_eq!(lesson_progress_percent(0, 0), 0.0);
    }

    proptest! {
        #[test]
        fn lock_follows_predecessor_completion(
            quiz_counts in prop::collection::vec(0usize..3, 1..6),
            completed in prop::collection::vec(any::<bool>(), 6),
        ) {
            let modules: Vec<Module> = quiz_counts
                .iter()
                .enumerate()
                .map(|(i, &count)| module(&format!("m{i}"), count))
                .collect();
            let mut record = ProgressRecord::default();
            for (module, &done) in modules.iter().zip(&completed) {
                if done {
                    complete(&mut record, module);
                }
            }

            prop_assert!(!is_module_locked(&modules, &record, &modules[0].id));
            for i in 1..modules.len() {
                let predecessor_done = record.is_module_completed(&modules[i - 1]);
                prop_assert_eq!(is_module_locked(&modules, &record, &modules[i].id), !predecessor_done);
            }
            for module in &modules {
                let expected = !module.quizzes().is_empty() && completed[module_index(&modules, &module.id).unwrap()];
                prop_assert_eq!(record.is_module_completed(module), expected);
            }
        }
    }
}
