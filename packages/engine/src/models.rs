//! Question and attempt records exchanged with the collaborators.
//!
//! Questions are immutable once created and owned by the question source;
//! the engine references them by id and only touches the text transiently
//! for similarity scoring.

use serde::{Deserialize, Serialize};

/// Ordered difficulty bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn to_index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Bands apart, 0..=2.
    pub fn distance(&self, other: Difficulty) -> usize {
        self.to_index().abs_diff(other.to_index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    MultipleChoice,
    Numeric,
    AssertionReason,
}

/// One answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option key the learner replies with ("A", "B", ...)
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CorrectAnswer {
    /// Key of the single correct option.
    OptionKey { key: String },
    /// Expected numeric value with an absolute tolerance.
    Numeric { value: f64, tolerance: f64 },
}

impl CorrectAnswer {
    pub fn display(&self) -> String {
        match self {
            CorrectAnswer::OptionKey { key } => key.clone(),
            CorrectAnswer::Numeric { value, .. } => value.to_string(),
        }
    }
}

/// Where a question came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Provenance {
    /// Historical exam paper.
    PastExam { year: i32, exam: String },
    /// Produced by the generative collaborator.
    Generated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub subject: String,
    pub chapter: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    pub text: String,
    /// Ordered, non-empty for multiple choice; empty otherwise.
    pub options: Vec<AnswerOption>,
    pub correct: CorrectAnswer,
    pub solution: String,
    pub provenance: Provenance,
}

impl Question {
    pub fn is_generated(&self) -> bool {
        self.provenance == Provenance::Generated
    }

    /// Grade a learner's reply against the correct answer.
    ///
    /// Option keys compare case-insensitively; numeric answers must parse
    /// and land within the tolerance window.
    pub fn grade(&self, given: &str) -> bool {
        match &self.correct {
            CorrectAnswer::OptionKey { key } => given.trim().eq_ignore_ascii_case(key),
            CorrectAnswer::Numeric { value, tolerance } => given
                .trim()
                .parse::<f64>()
                .map(|v| (v - value).abs() <= *tolerance)
                .unwrap_or(false),
        }
    }
}

/// Append-only fact: one graded attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub user_id: String,
    pub question_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub given: String,
    pub is_correct: bool,
    pub elapsed_ms: i64,
}

/// What `submit_attempt` hands back to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub is_correct: bool,
    pub correct_answer: String,
    pub solution: String,
}

/// Candidate-pool filter for fetch and recommend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFilter {
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        self.subject.as_deref().map_or(true, |s| s == question.subject)
            && self.chapter.as_deref().map_or(true, |c| c == question.chapter)
            && self.topic.as_deref().map_or(true, |t| t == question.topic)
            && self.difficulty.map_or(true, |d| d == question.difficulty)
    }
}
