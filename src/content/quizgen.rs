//! Practice question generation from lesson text
//!
//! Builds fill-in-the-blank questions from a lesson's bullet points and
//! sentences. The blanked word is the longest significant word of the
//! statement; the wrong options are significant words taken from the other
//! statements of the same lesson.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Lesson, Question, Quiz};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+(\s+|$)").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]*[A-Za-z]").unwrap());

/// Marker that replaces the key word in a question
pub const BLANK: &str = "_____";

/// Shortest word considered significant enough to blank out
const MIN_KEY_LEN: usize = 5;

/// Shortest statement (in words) worth asking about
const MIN_STATEMENT_WORDS: usize = 4;

/// Most wrong options per question
const MAX_DISTRACTORS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "along", "among", "because", "before", "being", "below",
    "between", "could", "during", "every", "first", "their", "there", "these", "those", "through",
    "under", "until", "where", "which", "while", "within", "without", "would", "should", "other",
];

/// A statement split out of the lesson with its chosen key word
struct Statement {
    text: String,
    /// Byte range of the key word in `text`
    key: Option<(usize, usize)>,
}

impl Statement {
    fn new(text: &str) -> Option<Self> {
        let text = text.trim().trim_end_matches(['.', '!', '?']).trim().to_string();
        if text.split_whitespace().count() < MIN_STATEMENT_WORDS {
            return None;
        }

        let key = significant_words(&text)
            .fold(None::<(usize, usize)>, |best, (start, end)| match best {
                Some((s, e)) if e - s >= end - start => Some((s, e)),
                _ => Some((start, end)),
            });

        Some(Self { text, key })
    }

    fn key_word(&self) -> Option<&str> {
        self.key.map(|(start, end)| &self.text[start..end])
    }

    fn blanked(&self) -> Option<String> {
        let (start, end) = self.key?;
        Some(format!("{}{}{}", &self.text[..start], BLANK, &self.text[end..]))
    }
}

/// Byte ranges of the significant words in a piece of text
fn significant_words(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    WORD.find_iter(text).filter_map(|m| {
        let word = m.as_str();
        let lower = word.to_lowercase();
        let significant = word.chars().count() >= MIN_KEY_LEN && !STOP_WORDS.contains(&lower.as_str());
        significant.then(|| (m.start(), m.end()))
    })
}

/// Split lesson content into statements, bullet points first
fn statements(lesson: &Lesson) -> Vec<Statement> {
    let points = lesson.points.iter().map(String::as_str);
    let sentences = SENTENCE_END.split(&lesson.content);
    points.chain(sentences).filter_map(Statement::new).collect()
}

/// Generate up to `max` practice questions from a lesson
pub fn generate_questions(lesson: &Lesson, max: usize) -> Vec<Question> {
    let statements = statements(lesson);
    let mut questions = Vec::new();

    for (index, statement) in statements.iter().enumerate() {
        if questions.len() >= max {
            break;
        }
        let (Some(key), Some(blanked)) = (statement.key_word(), statement.blanked()) else {
            continue;
        };

        let mut distractors: Vec<String> = Vec::new();
        for other in statements.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, s)| s) {
            let Some(word) = other.key_word() else {
                continue;
            };
            let taken = word.eq_ignore_ascii_case(key)
                || distractors.iter().any(|d| d.eq_ignore_ascii_case(word))
                || statement.text.to_lowercase().contains(&word.to_lowercase());
            if !taken {
                distractors.push(word.to_string());
            }
            if distractors.len() == MAX_DISTRACTORS {
                break;
            }
        }

        if distractors.is_empty() {
            tracing::debug!(lesson = lesson.id, "no distractors for statement, skipping");
            continue;
        }

        let correct = questions.len() % (distractors.len() + 1);
        let mut options = distractors;
        options.insert(correct, key.to_string());

        questions.push(Question {
            id: questions.len() as u64 + 1,
            question: format!("Fill in the blank: {}", blanked),
            options,
            correct,
            explanation: format!("{}.", statement.text),
            image: None,
            video: None,
            required: true,
        });
    }

    questions
}

/// Generate a practice quiz for a lesson
pub fn generate_quiz(lesson: &Lesson, max: usize) -> Quiz {
    Quiz {
        id: format!("generated-{}", lesson.id),
        title: format!("{} Practice", lesson.title),
        questions: generate_questions(lesson, max),
    }
}
