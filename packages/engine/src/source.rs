//! Question source collaborator.
//!
//! The engine only consumes the `Question` schema; transport, credentials,
//! and prompt details of a generative backend live behind this trait. The
//! in-memory bank doubles as the fixed-corpus source and as the test
//! double for the generative path.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Result;
use crate::models::{
    AnswerOption, CorrectAnswer, Difficulty, Provenance, Question, QuestionFilter, QuestionKind,
};

pub trait QuestionSource: Send + Sync {
    /// All questions matching the filter.
    fn fetch(&self, filter: &QuestionFilter) -> Result<Vec<Question>>;

    /// Look up a single question by id.
    fn get(&self, id: &str) -> Result<Option<Question>>;

    /// Produce a new question with provenance `Generated`.
    fn generate(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
        difficulty: Difficulty,
    ) -> Result<Question>;
}

/// Fixed-corpus source over a vector of questions.
///
/// `generate` synthesizes a placeholder question, mirroring the sample
/// fallback the original corpus loader used when no generative backend
/// was configured.
#[derive(Default)]
pub struct InMemoryQuestionBank {
    questions: RwLock<Vec<Question>>,
    generated_seq: AtomicU64,
}

impl InMemoryQuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: RwLock::new(questions),
            generated_seq: AtomicU64::new(0),
        }
    }

    pub fn add(&self, question: Question) {
        self.questions.write().push(question);
    }

    pub fn len(&self) -> usize {
        self.questions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.read().is_empty()
    }
}

impl QuestionSource for InMemoryQuestionBank {
    fn fetch(&self, filter: &QuestionFilter) -> Result<Vec<Question>> {
        Ok(self
            .questions
            .read()
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Question>> {
        Ok(self.questions.read().iter().find(|q| q.id == id).cloned())
    }

    fn generate(
        &self,
        subject: &str,
        chapter: &str,
        topic: &str,
        difficulty: Difficulty,
    ) -> Result<Question> {
        let seq = self.generated_seq.fetch_add(1, Ordering::Relaxed);
        let question = Question {
            id: format!("gen_{seq:04}"),
            subject: subject.to_string(),
            chapter: chapter.to_string(),
            topic: topic.to_string(),
            difficulty,
            kind: QuestionKind::MultipleChoice,
            text: format!("Sample {subject} question on {topic}"),
            options: ["A", "B", "C", "D"]
                .iter()
                .map(|key| AnswerOption {
                    key: key.to_string(),
                    text: format!("Option {key}"),
                })
                .collect(),
            correct: CorrectAnswer::OptionKey { key: "A".into() },
            solution: "Detailed solution would be provided here.".into(),
            provenance: Provenance::Generated,
        };
        self.add(question.clone());
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, subject: &str, topic: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.into(),
            subject: subject.into(),
            chapter: "Mechanics".into(),
            topic: topic.into(),
            difficulty,
            kind: QuestionKind::MultipleChoice,
            text: format!("question about {topic}"),
            options: vec![
                AnswerOption { key: "A".into(), text: "first".into() },
                AnswerOption { key: "B".into(), text: "second".into() },
            ],
            correct: CorrectAnswer::OptionKey { key: "A".into() },
            solution: String::new(),
            provenance: Provenance::PastExam { year: 2023, exam: "Main".into() },
        }
    }

    #[test]
    fn test_fetch_applies_filter() {
        let bank = InMemoryQuestionBank::new(vec![
            sample("q1", "Physics", "Kinematics", Difficulty::Easy),
            sample("q2", "Physics", "Gravitation", Difficulty::Hard),
            sample("q3", "Chemistry", "Hydrocarbons", Difficulty::Easy),
        ]);

        let physics = bank
            .fetch(&QuestionFilter { subject: Some("Physics".into()), ..Default::default() })
            .unwrap();
        assert_eq!(physics.len(), 2);

        let easy = bank
            .fetch(&QuestionFilter { difficulty: Some(Difficulty::Easy), ..Default::default() })
            .unwrap();
        assert_eq!(easy.len(), 2);
    }

    #[test]
    fn test_get_by_id() {
        let bank = InMemoryQuestionBank::new(vec![sample(
            "q1",
            "Physics",
            "Kinematics",
            Difficulty::Easy,
        )]);
        assert!(bank.get("q1").unwrap().is_some());
        assert!(bank.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_generate_adds_to_bank_with_unique_ids() {
        let bank = InMemoryQuestionBank::default();
        let a = bank.generate("Physics", "Mechanics", "Kinematics", Difficulty::Medium).unwrap();
        let b = bank.generate("Physics", "Mechanics", "Kinematics", Difficulty::Medium).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.is_generated());
        assert_eq!(bank.len(), 2);
    }
}
