//! Adaptive practice engine for exam preparation.
//!
//! Tracks per-topic mastery, schedules spaced review, filters
//! near-duplicate generated questions through a TF-IDF index, and serves
//! personalized question batches. [`PracticeEngine`] is the single entry
//! point; question storage and persistence plug in behind the
//! [`QuestionSource`] and [`ProgressStore`] traits.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod source;
pub mod store;
pub mod syllabus;

pub use config::EngineConfig;
pub use engine::PracticeEngine;
pub use error::{EngineError, Result};
pub use models::{
    AnswerOption, AttemptRecord, CorrectAnswer, Difficulty, Evaluation, Provenance, Question,
    QuestionFilter, QuestionKind,
};
pub use services::analytics::AnalyticsReport;
pub use source::{InMemoryQuestionBank, QuestionSource};
pub use store::{MemoryStore, ProgressStore};
pub use syllabus::Syllabus;
