//! Personalized batch selection.
//!
//! Candidates are scored from the user's schedule and mastery snapshots,
//! ordered deterministically, then drawn under a per-topic quota so one
//! weak area cannot monopolize a batch. Generated candidates that
//! near-duplicate an indexed question are dropped before scoring.

use std::collections::{HashMap, HashSet};

use prepa_algo::types::Classification;
use tracing::{debug, warn};

use crate::config::ScoreWeights;
use crate::error::{EngineError, Result};
use crate::models::{Difficulty, Question};
use crate::services::mastery::TopicMasteryModel;
use crate::services::scheduler::SpacedRepetitionScheduler;
use crate::services::similarity::SimilarityIndex;
use crate::store::{MasteryMap, ScheduleMap};

/// Read-only snapshot the selection runs against.
pub struct RecommendContext<'a> {
    pub mastery: &'a MasteryMap,
    pub schedule: &'a ScheduleMap,
    /// Question ids attempted within the recency window before `now`.
    pub recent: &'a HashSet<String>,
    pub now: i64,
}

struct ScoredCandidate {
    id: String,
    topic: String,
    score: f64,
    due_priority: f64,
}

pub struct RecommendationEngine {
    weights: ScoreWeights,
}

impl RecommendationEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Difficulty band a topic's mastery calls for: struggling users get
    /// easy questions, mastered topics escalate.
    fn target_band(classification: Classification) -> Difficulty {
        match classification {
            Classification::Weak => Difficulty::Easy,
            Classification::Neutral => Difficulty::Medium,
            Classification::Strong => Difficulty::Hard,
        }
    }

    fn difficulty_fit(question: &Question, classification: Classification) -> f64 {
        match question.difficulty.distance(Self::target_band(classification)) {
            0 => 1.0,
            1 => 0.5,
            _ => 0.0,
        }
    }

    /// Select up to `count` question ids from the pool.
    pub fn recommend(
        &self,
        pool: &[Question],
        mastery_model: &TopicMasteryModel,
        scheduler: &SpacedRepetitionScheduler,
        similarity: &SimilarityIndex,
        ctx: &RecommendContext<'_>,
        count: i64,
    ) -> Result<Vec<String>> {
        if count <= 0 {
            return Err(EngineError::InvalidCount(count));
        }
        if pool.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        let count = count as usize;

        let weak: HashSet<String> = mastery_model.weak_topics(ctx.mastery).into_iter().collect();

        let mut seen_ids = HashSet::new();
        let mut scored = Vec::with_capacity(pool.len());

        for question in pool {
            if !seen_ids.insert(question.id.as_str()) {
                continue;
            }
            // Generated candidates not yet in the index must clear the
            // duplicate filter before competing.
            if question.is_generated()
                && !similarity.contains(&question.id)
                && similarity.is_duplicate(&question.text)
            {
                warn!(question_id = %question.id, "dropped near-duplicate generated candidate");
                continue;
            }

            let due_priority = scheduler.priority(ctx.schedule, &question.id, ctx.now);
            let classification = mastery_model.classify(ctx.mastery, &question.topic);
            let weak_bonus = if weak.contains(question.topic.as_str()) { 1.0 } else { 0.0 };
            let fit = Self::difficulty_fit(question, classification);
            let repetition = if ctx.recent.contains(&question.id) { 1.0 } else { 0.0 };

            let score = self.weights.due_priority * due_priority
                + self.weights.weak_topic * weak_bonus
                + self.weights.difficulty_fit * fit
                - self.weights.repetition * repetition;

            debug!(
                question_id = %question.id,
                topic = %question.topic,
                score,
                due_priority,
                weak_bonus,
                fit,
                "candidate scored"
            );

            scored.push(ScoredCandidate {
                id: question.id.clone(),
                topic: question.topic.clone(),
                score,
                due_priority,
            });
        }

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.due_priority.total_cmp(&a.due_priority))
                .then_with(|| a.topic.cmp(&b.topic))
                .then_with(|| a.id.cmp(&b.id))
        });

        // Per-topic cap: skip over-quota candidates in score order, which
        // backfills naturally from the next best topics.
        let quota = ((self.weights.topic_quota_fraction * count as f64).ceil() as usize).max(1);
        let mut per_topic: HashMap<&str, usize> = HashMap::new();
        let mut batch = Vec::with_capacity(count);

        for candidate in &scored {
            if batch.len() == count {
                break;
            }
            let taken = per_topic.entry(candidate.topic.as_str()).or_insert(0);
            if *taken >= quota {
                continue;
            }
            *taken += 1;
            batch.push(candidate.id.clone());
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use prepa_algo::types::{MasteryParams, ScheduleParams};

    use crate::config::SimilarityParams;
    use crate::models::{CorrectAnswer, Provenance, QuestionKind};
    use crate::syllabus::Syllabus;

    const NOW: i64 = 1_700_000_000_000;

    fn question(id: &str, topic: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.into(),
            subject: "Physics".into(),
            chapter: "Mechanics".into(),
            topic: topic.into(),
            difficulty,
            kind: QuestionKind::MultipleChoice,
            text: format!("unique text for {id} about {topic}"),
            options: vec![],
            correct: CorrectAnswer::OptionKey { key: "A".into() },
            solution: String::new(),
            provenance: Provenance::PastExam { year: 2023, exam: "Main".into() },
        }
    }

    fn services() -> (TopicMasteryModel, SpacedRepetitionScheduler, SimilarityIndex) {
        let syllabus = Syllabus::new()
            .add_topic("Physics", "Mechanics", "Kinematics")
            .add_topic("Physics", "Mechanics", "Gravitation")
            .add_topic("Physics", "Optics", "Ray Optics");
        (
            TopicMasteryModel::new(MasteryParams::default(), Arc::new(syllabus)),
            SpacedRepetitionScheduler::new(ScheduleParams::default()),
            SimilarityIndex::new(SimilarityParams::default()),
        )
    }

    fn empty_ctx<'a>(
        mastery: &'a MasteryMap,
        schedule: &'a ScheduleMap,
        recent: &'a HashSet<String>,
    ) -> RecommendContext<'a> {
        RecommendContext { mastery, schedule, recent, now: NOW }
    }

    #[test]
    fn test_invalid_count_rejected() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        let pool = vec![question("q1", "Kinematics", Difficulty::Easy)];
        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());

        let err = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidCount(0)));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());

        let err = engine
            .recommend(&[], &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 3)
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyPool));
    }

    #[test]
    fn test_no_duplicate_ids_in_batch() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        // Same id appears twice in the pool.
        let pool = vec![
            question("q1", "Kinematics", Difficulty::Medium),
            question("q1", "Kinematics", Difficulty::Medium),
            question("q2", "Gravitation", Difficulty::Medium),
        ];
        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());

        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 5)
            .unwrap();
        assert_eq!(batch.len(), 2);
        let unique: HashSet<&String> = batch.iter().collect();
        assert_eq!(unique.len(), batch.len());
    }

    #[test]
    fn test_topic_quota_enforced() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        let mut pool = Vec::new();
        for i in 0..6 {
            pool.push(question(&format!("kin_{i}"), "Kinematics", Difficulty::Medium));
        }
        for i in 0..6 {
            pool.push(question(&format!("grav_{i}"), "Gravitation", Difficulty::Medium));
        }
        for i in 0..6 {
            pool.push(question(&format!("opt_{i}"), "Ray Optics", Difficulty::Medium));
        }
        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());

        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 5)
            .unwrap();
        assert_eq!(batch.len(), 5);

        // quota = ceil(0.4 * 5) = 2 per topic
        let mut per_topic: HashMap<&str, usize> = HashMap::new();
        for id in &batch {
            let topic = pool.iter().find(|q| &q.id == id).unwrap().topic.as_str();
            *per_topic.entry(topic).or_insert(0) += 1;
        }
        assert!(per_topic.values().all(|&n| n <= 2), "quota violated: {per_topic:?}");
    }

    #[test]
    fn test_weak_topic_scores_above_neutral() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());

        let mut mastery = MasteryMap::new();
        for i in 0..5 {
            mastery_model.update(&mut mastery, "Kinematics", i >= 4, NOW + i).unwrap();
        }
        let (schedule, recent) = (ScheduleMap::new(), HashSet::new());

        let pool = vec![
            question("grav_1", "Gravitation", Difficulty::Easy),
            question("kin_1", "Kinematics", Difficulty::Easy),
        ];
        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 1)
            .unwrap();
        assert_eq!(batch, vec!["kin_1".to_string()]);
    }

    #[test]
    fn test_generated_duplicate_dropped() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());

        let indexed = question("pyq_1", "Kinematics", Difficulty::Medium);
        similarity.index(&indexed);

        let mut clone = question("gen_1", "Kinematics", Difficulty::Medium);
        clone.text = indexed.text.clone();
        clone.provenance = Provenance::Generated;

        let mut fresh = question("gen_2", "Gravitation", Difficulty::Medium);
        fresh.provenance = Provenance::Generated;

        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());
        let pool = vec![clone, fresh];
        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 5)
            .unwrap();
        assert_eq!(batch, vec!["gen_2".to_string()]);
    }

    #[test]
    fn test_deterministic_tie_break_by_topic_then_id() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        let pool = vec![
            question("q_z", "Kinematics", Difficulty::Medium),
            question("q_a", "Kinematics", Difficulty::Medium),
            question("q_m", "Gravitation", Difficulty::Medium),
        ];
        let (mastery, schedule, recent) = (MasteryMap::new(), ScheduleMap::new(), HashSet::new());

        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 3)
            .unwrap();
        // Equal scores: Gravitation < Kinematics, then id ascending.
        assert_eq!(batch, vec!["q_m".to_string(), "q_a".to_string(), "q_z".to_string()]);
    }

    #[test]
    fn test_recent_question_penalized() {
        let (mastery_model, scheduler, similarity) = services();
        let engine = RecommendationEngine::new(ScoreWeights::default());
        let pool = vec![
            question("q_a", "Kinematics", Difficulty::Medium),
            question("q_b", "Kinematics", Difficulty::Medium),
        ];
        let (mastery, schedule) = (MasteryMap::new(), ScheduleMap::new());
        let recent: HashSet<String> = ["q_a".to_string()].into();

        let batch = engine
            .recommend(&pool, &mastery_model, &scheduler, &similarity,
                       &empty_ctx(&mastery, &schedule, &recent), 1)
            .unwrap();
        assert_eq!(batch, vec!["q_b".to_string()]);
    }
}
