//! Content model for learning paths
//!
//! A learning path is an ordered list of modules for one difficulty tier.
//! Each module holds lessons and a normalized quiz configuration. The order
//! of modules in a path is the unlock order.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Difficulty tier of a learning path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "expert")]
    Expert,
}

impl Difficulty {
    /// Lowercase identifier used in API paths and the overall progress record
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }

    /// Base storage key for this tier's progress record
    pub fn progress_key(&self) -> &'static str {
        match self {
            Self::Beginner => "beginnerProgress",
            Self::Intermediate => "intermediateProgress",
            Self::Expert => "expertProgress",
        }
    }

    /// Parse a tier name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "b" => Some(Self::Beginner),
            "intermediate" | "i" => Some(Self::Intermediate),
            "expert" | "e" => Some(Self::Expert),
            _ => None,
        }
    }

    /// All tiers in ascending order
    pub fn all() -> &'static [Difficulty] {
        &[Self::Beginner, Self::Intermediate, Self::Expert]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Unknown difficulty: {}. Options: beginner, intermediate, expert", s)
        })
    }
}

/// An image or video attached to a lesson or module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Server-side file identifier
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_id")]
    pub id: Option<String>,
    /// Public URL of the file
    #[serde(default, alias = "fileUrl")]
    pub url: String,
    /// Original file name or caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single lesson within a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default, deserialize_with = "flexible_u64")]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Bullet highlights shown under the lesson text
    #[serde(default, deserialize_with = "lenient_list")]
    pub points: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<Media>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub videos: Vec<Media>,
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "flexible_u64")]
    pub id: u64,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options` of the right answer
    #[serde(deserialize_with = "flexible_index")]
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    /// At least two options and a correct index that points at one of them
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.correct < self.options.len()
    }
}

/// A quiz attached to a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub questions: Vec<Question>,
}

/// How a module's quizzes are configured
///
/// Resolved once when content is loaded; the raw `quiz`/`quizzes` shapes are
/// never looked at again after that.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QuizConfig {
    /// The module has no quiz and can never be completed
    #[default]
    None,
    /// A single quiz from the legacy `quiz` field
    Legacy(Quiz),
    /// One or more quizzes from the `quizzes` array
    Multiple(Vec<Quiz>),
}

impl QuizConfig {
    /// The effective quiz list
    pub fn quizzes(&self) -> &[Quiz] {
        match self {
            Self::None => &[],
            Self::Legacy(quiz) => std::slice::from_ref(quiz),
            Self::Multiple(quizzes) => quizzes,
        }
    }

    /// Resolve the raw `quizzes` and `quiz` fields of an API module
    ///
    /// `quizzes` may arrive as an array or as a JSON string holding an
    /// array. Malformed entries are dropped one by one. A non-empty list
    /// wins; otherwise the legacy `quiz` is used.
    pub fn from_raw(quizzes: Option<Value>, quiz: Option<Value>) -> Self {
        let list: Vec<Quiz> = quizzes.and_then(parse_embedded::<Vec<Value>>).map(keep_valid).unwrap_or_default();
        if !list.is_empty() {
            return Self::Multiple(list);
        }
        match quiz.and_then(parse_embedded::<Quiz>) {
            Some(quiz) => Self::Legacy(quiz),
            None => Self::None,
        }
    }
}

impl Serialize for QuizConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.quizzes().serialize(serializer)
    }
}

/// Parse a value that is either the JSON itself or a string containing it
fn parse_embedded<T: DeserializeOwned>(value: Value) -> Option<T> {
    match value {
        Value::String(text) => serde_json::from_str(&text).ok(),
        Value::Null => None,
        other => serde_json::from_value(other).ok(),
    }
}

/// Deserialize each element on its own, skipping the ones that fail
pub(crate) fn keep_valid<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                let kind = std::any::type_name::<T>().rsplit("::").next().unwrap_or("entry");
                tracing::warn!(index, "skipping malformed {}: {}", kind, e);
                None
            }
        })
        .collect()
}

/// A list field where one bad element must not reject the whole document
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Value>::deserialize(deserializer)?.and_then(parse_embedded::<Vec<Value>>);
    Ok(items.map(keep_valid).unwrap_or_default())
}

/// A module of a learning path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub estimated_time: String,
    pub difficulty: Difficulty,
    pub lessons: Vec<Lesson>,
    #[serde(rename = "quizzes")]
    pub quiz_config: QuizConfig,
    pub images: Vec<Media>,
    pub videos: Vec<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Module {
    /// Create an empty module
    pub fn new(id: impl Into<String>, title: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            estimated_time: String::new(),
            difficulty,
            lessons: Vec::new(),
            quiz_config: QuizConfig::None,
            images: Vec::new(),
            videos: Vec::new(),
            icon: None,
            color: None,
        }
    }

    /// The effective quiz list
    pub fn quizzes(&self) -> &[Quiz] {
        self.quiz_config.quizzes()
    }
}

/// A module as delivered by the content API, before normalization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModule {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub quizzes: Option<Value>,
    #[serde(default)]
    pub quiz: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<Media>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub videos: Vec<Media>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RawModule {
    /// Normalize into a `Module`, filling a missing difficulty with the tier
    pub fn normalize(self, tier: Difficulty) -> Module {
        Module {
            id: self.id,
            title: self.title,
            description: self.description,
            estimated_time: self.estimated_time,
            difficulty: self.difficulty.unwrap_or(tier),
            lessons: self.lessons,
            quiz_config: QuizConfig::from_raw(self.quizzes, self.quiz),
            images: self.images,
            videos: self.videos,
            icon: self.icon,
            color: self.color,
        }
    }
}

/// Accept ids sent either as strings or as numbers
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

/// Accept non-negative integers sent either as numbers or numeric strings
fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("expected a non-negative integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
        other => Err(serde::de::Error::custom(format!("expected a number, got {other}"))),
    }
}

fn flexible_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = flexible_u64(deserializer)?;
    usize::try_from(value).map_err(serde::de::Error::custom)
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let id = string_or_number(deserializer)?;
    Ok(if id.is_empty() { None } else { Some(id) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn quiz_json(title: &str) -> Value {
        json!({
            "id": title.to_lowercase(),
            "title": title,
            "questions": [
                {"id": 1, "question": "Q?", "options": ["a", "b"], "correct": 1}
            ]
        })
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!(Difficulty::parse("Expert"), Some(Difficulty::Expert));
        assert_eq!(Difficulty::parse(" beginner "), Some(Difficulty::Beginner));
        assert_eq!(Difficulty::parse("master"), None);
        assert!("master".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_keys() {
        assert_eq!(Difficulty::Expert.progress_key(), "expertProgress");
        assert_eq!(Difficulty::Intermediate.as_str(), "intermediate");
    }

    #[test]
    fn quizzes_array_wins() {
        let config = QuizConfig::from_raw(
            Some(json!([quiz_json("A"), quiz_json("B")])),
            Some(quiz_json("Legacy")),
        );
        let titles: Vec<_> = config.quizzes().iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn quizzes_as_serialized_string_are_parsed() {
        let text = serde_json::to_string(&json!([quiz_json("A")])).unwrap();
        let config = QuizConfig::from_raw(Some(Value::String(text)), None);
        assert!(matches!(config, QuizConfig::Multiple(ref list) if list.len() == 1));
    }

    #[test]
    fn invalid_quizzes_fall_back_to_legacy_quiz() {
        let config =
            QuizConfig::from_raw(Some(Value::String("not json".into())), Some(quiz_json("Old")));
        assert!(matches!(config, QuizConfig::Legacy(ref q) if q.title == "Old"));
    }

    #[test]
    fn empty_quizzes_fall_back_to_legacy_quiz() {
        let config = QuizConfig::from_raw(Some(json!([])), Some(quiz_json("Old")));
        assert_eq!(config.quizzes().len(), 1);
    }

    #[test]
    fn no_quiz_fields_means_no_quizzes() {
        assert_eq!(QuizConfig::from_raw(None, None), QuizConfig::None);
        assert_eq!(QuizConfig::from_raw(Some(Value::Null), Some(Value::Null)), QuizConfig::None);
        assert!(QuizConfig::None.quizzes().is_empty());
    }

    #[test]
    fn raw_module_accepts_numeric_id_and_fills_difficulty() {
        let raw: RawModule = serde_json::from_value(json!({
            "id": 7,
            "title": "Soil",
            "estimatedTime": "20 min",
            "quiz": quiz_json("Soil Quiz")
        }))
        .unwrap();

        let module = raw.normalize(Difficulty::Beginner);
        assert_eq!(module.id, "7");
        assert_eq!(module.estimated_time, "20 min");
        assert_eq!(module.difficulty, Difficulty::Beginner);
        assert_eq!(module.quizzes()[0].title, "Soil Quiz");
    }

    #[test]
    fn module_serializes_effective_quiz_list() {
        let raw: RawModule =
            serde_json::from_value(json!({"id": "m1", "quiz": quiz_json("Only")})).unwrap();
        let module = raw.normalize(Difficulty::Expert);

        let value = serde_json::to_value(&module).unwrap();
        assert_eq!(value["quizzes"][0]["title"], "Only");
        assert_eq!(value["estimatedTime"], "");
        assert!(value.get("quiz").is_none());
    }

    #[test]
    fn lesson_without_title_keeps_the_module() {
        let raw: RawModule = serde_json::from_value(json!({
            "id": "m1",
            "lessons": [
                {"id": 1, "content": "Loam holds water."},
                {"id": "2", "title": "Drainage"},
                {"id": "two", "title": "Broken id"}
            ]
        }))
        .unwrap();

        let module = raw.normalize(Difficulty::Beginner);
        let ids: Vec<u64> = module.lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(module.lessons[0].title, "");
    }

    #[test]
    fn textual_correct_index_is_accepted() {
        let config = QuizConfig::from_raw(
            Some(json!([{
                "id": 1,
                "title": "Soil",
                "questions": [{"id": "1", "question": "Q?", "options": ["a", "b"], "correct": "1"}]
            }])),
            None,
        );
        let quizzes = config.quizzes();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].questions[0].correct, 1);
        assert!(quizzes[0].questions[0].is_well_formed());
    }

    #[test]
    fn malformed_quiz_entry_is_dropped_alone() {
        let config = QuizConfig::from_raw(
            Some(json!([quiz_json("A"), {"title": ["not", "a", "title"]}, quiz_json("B")])),
            Some(quiz_json("Legacy")),
        );
        let titles: Vec<_> = config.quizzes().iter().map(|q| q.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn malformed_question_is_dropped_from_its_quiz() {
        let config = QuizConfig::from_raw(
            Some(json!([{
                "title": "Mixed",
                "questions": [
                    {"id": 1, "question": "Q?", "options": ["a", "b"], "correct": 0},
                    {"id": 2, "question": "No answer", "options": ["a", "b"]}
                ]
            }])),
            None,
        );
        assert_eq!(config.quizzes()[0].questions.len(), 1);
    }

    #[test]
    fn media_accepts_file_url_alias() {
        let media: Media =
            serde_json::from_value(json!({"id": 3, "fileUrl": "/uploads/a.png"})).unwrap();
        assert_eq!(media.id.as_deref(), Some("3"));
        assert_eq!(media.url, "/uploads/a.png");
    }

    #[test]
    fn question_well_formedness() {
        let mut question = Question {
            id: 1,
            question: "Q".into(),
            options: vec!["a".into(), "b".into()],
            correct: 1,
            explanation: String::new(),
            image: None,
            video: None,
            required: true,
        };
        assert!(question.is_well_formed());

        question.correct = 2;
        assert!(!question.is_well_formed());

        question.correct = 0;
        question.options.truncate(1);
        assert!(!question.is_well_formed());
    }
}
