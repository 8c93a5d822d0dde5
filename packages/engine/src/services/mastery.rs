//! Topic mastery service.
//!
//! Stateless over an externally supplied `MasteryMap` snapshot; the facade
//! owns the load/save round-trip. Topic names are validated against the
//! syllabus before any mutation, so an update either fully applies or
//! leaves the map untouched.

use std::sync::Arc;

use prepa_algo::mastery;
use prepa_algo::types::{Classification, MasteryParams};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::store::MasteryMap;
use crate::syllabus::Syllabus;

pub struct TopicMasteryModel {
    params: MasteryParams,
    syllabus: Arc<Syllabus>,
}

impl TopicMasteryModel {
    pub fn new(params: MasteryParams, syllabus: Arc<Syllabus>) -> Self {
        Self { params, syllabus }
    }

    /// Fold one attempt into the user's state for `topic`.
    pub fn update(
        &self,
        states: &mut MasteryMap,
        topic: &str,
        correct: bool,
        timestamp: i64,
    ) -> Result<()> {
        if !self.syllabus.contains_topic(topic) {
            return Err(EngineError::InvalidTopic(topic.to_string()));
        }

        let previous = states.get(topic).cloned().unwrap_or_default();
        let next = mastery::fold_attempt(&previous, correct, timestamp, &self.params);
        debug!(
            topic,
            correct,
            estimate = next.estimate,
            exposures = next.exposures,
            "mastery updated"
        );
        states.insert(topic.to_string(), next);
        Ok(())
    }

    pub fn classify(&self, states: &MasteryMap, topic: &str) -> Classification {
        states
            .get(topic)
            .map(|state| mastery::classify(state, &self.params))
            .unwrap_or(Classification::Neutral)
    }

    pub fn weak_topics(&self, states: &MasteryMap) -> Vec<String> {
        mastery::weak_topics(states.iter().map(|(t, s)| (t.as_str(), s)), &self.params)
    }

    pub fn strong_topics(&self, states: &MasteryMap) -> Vec<String> {
        mastery::strong_topics(states.iter().map(|(t, s)| (t.as_str(), s)), &self.params)
    }

    pub fn params(&self) -> &MasteryParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TopicMasteryModel {
        let syllabus = Syllabus::new()
            .add_topic("Physics", "Mechanics", "Kinematics")
            .add_topic("Mathematics", "Calculus", "Integration");
        TopicMasteryModel::new(MasteryParams::default(), Arc::new(syllabus))
    }

    #[test]
    fn test_unknown_topic_rejected_without_mutation() {
        let model = model();
        let mut states = MasteryMap::new();
        let err = model.update(&mut states, "Astrology", true, 1000).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTopic(_)));
        assert!(states.is_empty());
    }

    #[test]
    fn test_update_creates_state_lazily() {
        let model = model();
        let mut states = MasteryMap::new();
        model.update(&mut states, "Kinematics", true, 1000).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states["Kinematics"].exposures, 1);
    }

    #[test]
    fn test_unattempted_topic_is_neutral() {
        let model = model();
        assert_eq!(model.classify(&MasteryMap::new(), "Integration"), Classification::Neutral);
    }

    #[test]
    fn test_weak_topics_after_failures() {
        let model = model();
        let mut states = MasteryMap::new();
        for i in 0..5 {
            model.update(&mut states, "Kinematics", i >= 3, i).unwrap();
        }
        assert_eq!(model.weak_topics(&states), vec!["Kinematics".to_string()]);
        assert!(model.strong_topics(&states).is_empty());
    }
}
