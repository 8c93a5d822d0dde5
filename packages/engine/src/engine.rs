//! Engine facade.
//!
//! One `PracticeEngine` per deployment: it owns the services and the
//! similarity index, talks to the question source and progress store
//! through their traits, and serializes mutations per user so concurrent
//! submissions for the same learner cannot interleave a load/save
//! round-trip.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{AttemptRecord, Evaluation, Question, QuestionFilter};
use crate::services::analytics::{AnalyticsReport, AnalyticsReporter, QuestionMeta};
use crate::services::mastery::TopicMasteryModel;
use crate::services::recommend::{RecommendContext, RecommendationEngine};
use crate::services::scheduler::SpacedRepetitionScheduler;
use crate::services::similarity::SimilarityIndex;
use crate::source::QuestionSource;
use crate::store::ProgressStore;
use crate::syllabus::Syllabus;

pub struct PracticeEngine {
    config: EngineConfig,
    source: Arc<dyn QuestionSource>,
    store: Arc<dyn ProgressStore>,
    mastery: TopicMasteryModel,
    scheduler: SpacedRepetitionScheduler,
    recommender: RecommendationEngine,
    similarity: SimilarityIndex,
    analytics: AnalyticsReporter,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PracticeEngine {
    pub fn new(
        config: EngineConfig,
        syllabus: Arc<Syllabus>,
        source: Arc<dyn QuestionSource>,
        store: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            mastery: TopicMasteryModel::new(config.mastery.clone(), syllabus),
            scheduler: SpacedRepetitionScheduler::new(config.schedule.clone()),
            recommender: RecommendationEngine::new(config.weights.clone()),
            similarity: SimilarityIndex::new(config.similarity.clone()),
            analytics: AnalyticsReporter::new(config.trend.clone()),
            config,
            source,
            store,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    /// Index every question the source currently knows about. Call once at
    /// startup and again after bulk imports; returns the number indexed.
    pub fn index_corpus(&self) -> Result<usize> {
        let questions = self.source.fetch(&QuestionFilter::default())?;
        let indexed = self.similarity.index_all(questions.iter());
        info!(indexed, "similarity corpus indexed");
        Ok(indexed)
    }

    /// Grade one answer and fold it into the user's mastery and schedule.
    ///
    /// Validation happens before any mutation: an unknown question id or
    /// off-syllabus topic returns an error and leaves the user's state
    /// exactly as it was.
    #[instrument(skip(self, answer))]
    pub fn submit_attempt(
        &self,
        user_id: &str,
        question_id: &str,
        answer: &str,
        timestamp: i64,
        elapsed_ms: i64,
    ) -> Result<Evaluation> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let question = self
            .source
            .get(question_id)?
            .ok_or_else(|| EngineError::NotFound(question_id.to_string()))?;
        let is_correct = question.grade(answer);

        let mut mastery = self.store.load_mastery(user_id)?;
        let mut schedule = self.store.load_schedule(user_id)?;

        // Topic validation inside `update` runs before either map is saved.
        self.mastery
            .update(&mut mastery, &question.topic, is_correct, timestamp)?;
        self.scheduler
            .record(&mut schedule, question_id, is_correct, timestamp);

        self.store.save_mastery(user_id, &mastery)?;
        self.store.save_schedule(user_id, &schedule)?;
        self.store.append_attempt(&AttemptRecord {
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            timestamp,
            given: answer.to_string(),
            is_correct,
            elapsed_ms,
        })?;

        info!(user_id, question_id, is_correct, "attempt recorded");

        Ok(Evaluation {
            is_correct,
            correct_answer: question.correct.display(),
            solution: question.solution,
        })
    }

    /// Personalized batch for `user_id` at an explicit clock reading.
    pub fn recommend_at(
        &self,
        user_id: &str,
        count: i64,
        filter: &QuestionFilter,
        now: i64,
    ) -> Result<Vec<Question>> {
        let pool = self.source.fetch(filter)?;
        let mastery = self.store.load_mastery(user_id)?;
        let schedule = self.store.load_schedule(user_id)?;
        let recent = self.recent_question_ids(user_id, now)?;

        let ctx = RecommendContext {
            mastery: &mastery,
            schedule: &schedule,
            recent: &recent,
            now,
        };
        let ids = self.recommender.recommend(
            &pool,
            &self.mastery,
            &self.scheduler,
            &self.similarity,
            &ctx,
            count,
        )?;

        let by_id: HashMap<&str, &Question> =
            pool.iter().map(|q| (q.id.as_str(), q)).collect();
        let batch: Vec<Question> = ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|q| (*q).clone()))
            .collect();

        // Generated questions that made it into a batch become part of the
        // corpus, so the next generation round dedups against them.
        for question in &batch {
            if question.is_generated() && !self.similarity.contains(&question.id) {
                self.similarity.index(question);
            }
        }

        info!(user_id, requested = count, served = batch.len(), "batch recommended");
        Ok(batch)
    }

    pub fn get_recommendations(
        &self,
        user_id: &str,
        count: i64,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>> {
        self.recommend_at(user_id, count, filter, now_ms())
    }

    pub fn get_analytics(&self, user_id: &str) -> Result<AnalyticsReport> {
        let attempts = self.store.load_attempts(user_id)?;
        let mastery = self.store.load_mastery(user_id)?;
        let meta = self.question_meta(&attempts)?;
        Ok(self.analytics.report(&attempts, &meta, &self.mastery, &mastery))
    }

    /// Per-topic accuracy deltas, first user minus second.
    pub fn compare_users(&self, user_a: &str, user_b: &str) -> Result<BTreeMap<String, f64>> {
        let attempts_a = self.store.load_attempts(user_a)?;
        let attempts_b = self.store.load_attempts(user_b)?;
        let mut combined = attempts_a.clone();
        combined.extend(attempts_b.iter().cloned());
        let meta = self.question_meta(&combined)?;
        Ok(self.analytics.compare(&attempts_a, &attempts_b, &meta))
    }

    pub fn get_weak_topics(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self.mastery.weak_topics(&self.store.load_mastery(user_id)?))
    }

    pub fn get_strong_topics(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self.mastery.strong_topics(&self.store.load_mastery(user_id)?))
    }

    fn recent_question_ids(&self, user_id: &str, now: i64) -> Result<HashSet<String>> {
        let window = self.config.weights.recency_window_ms;
        Ok(self
            .store
            .load_attempts(user_id)?
            .into_iter()
            .filter(|r| now - r.timestamp <= window)
            .map(|r| r.question_id)
            .collect())
    }

    fn question_meta(&self, attempts: &[AttemptRecord]) -> Result<HashMap<String, QuestionMeta>> {
        let mut meta = HashMap::new();
        for record in attempts {
            if meta.contains_key(&record.question_id) {
                continue;
            }
            if let Some(question) = self.source.get(&record.question_id)? {
                meta.insert(
                    record.question_id.clone(),
                    QuestionMeta {
                        subject: question.subject,
                        topic: question.topic,
                    },
                );
            }
        }
        Ok(meta)
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
