//! Persistence collaborator.
//!
//! The engine does a load / mutate / save round-trip per operation and
//! nothing more; transactional guarantees beyond single-record
//! read-modify-write belong to the implementation behind the trait.

use std::collections::HashMap;

use parking_lot::RwLock;
use prepa_algo::types::{MasteryState, ScheduleEntry};

use crate::error::Result;
use crate::models::AttemptRecord;

/// topic -> mastery state for one user.
pub type MasteryMap = HashMap<String, MasteryState>;

/// question id -> schedule entry for one user.
pub type ScheduleMap = HashMap<String, ScheduleEntry>;

pub trait ProgressStore: Send + Sync {
    fn load_mastery(&self, user_id: &str) -> Result<MasteryMap>;
    fn save_mastery(&self, user_id: &str, states: &MasteryMap) -> Result<()>;
    fn load_schedule(&self, user_id: &str) -> Result<ScheduleMap>;
    fn save_schedule(&self, user_id: &str, entries: &ScheduleMap) -> Result<()>;
    fn append_attempt(&self, record: &AttemptRecord) -> Result<()>;
    /// Attempts for one user, in append order.
    fn load_attempts(&self, user_id: &str) -> Result<Vec<AttemptRecord>>;
}

/// Default store when no external persistence is wired in.
#[derive(Default)]
pub struct MemoryStore {
    mastery: RwLock<HashMap<String, MasteryMap>>,
    schedule: RwLock<HashMap<String, ScheduleMap>>,
    attempts: RwLock<Vec<AttemptRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.read().len()
    }
}

impl ProgressStore for MemoryStore {
    fn load_mastery(&self, user_id: &str) -> Result<MasteryMap> {
        Ok(self.mastery.read().get(user_id).cloned().unwrap_or_default())
    }

    fn save_mastery(&self, user_id: &str, states: &MasteryMap) -> Result<()> {
        self.mastery.write().insert(user_id.to_string(), states.clone());
        Ok(())
    }

    fn load_schedule(&self, user_id: &str) -> Result<ScheduleMap> {
        Ok(self.schedule.read().get(user_id).cloned().unwrap_or_default())
    }

    fn save_schedule(&self, user_id: &str, entries: &ScheduleMap) -> Result<()> {
        self.schedule.write().insert(user_id.to_string(), entries.clone());
        Ok(())
    }

    fn append_attempt(&self, record: &AttemptRecord) -> Result<()> {
        self.attempts.write().push(record.clone());
        Ok(())
    }

    fn load_attempts(&self, user_id: &str) -> Result<Vec<AttemptRecord>> {
        Ok(self
            .attempts
            .read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepa_algo::types::MasteryState;

    #[test]
    fn test_mastery_round_trip() {
        let store = MemoryStore::new();
        let mut map = MasteryMap::new();
        map.insert("Kinematics".into(), MasteryState { exposures: 3, correct: 1, estimate: 0.4, updated_at: 10 });

        store.save_mastery("u1", &map).unwrap();
        assert_eq!(store.load_mastery("u1").unwrap(), map);
        assert!(store.load_mastery("u2").unwrap().is_empty());
    }

    #[test]
    fn test_attempts_isolated_per_user() {
        let store = MemoryStore::new();
        for (user, n) in [("u1", 3), ("u2", 2)] {
            for i in 0..n {
                store
                    .append_attempt(&AttemptRecord {
                        user_id: user.into(),
                        question_id: format!("q{i}"),
                        timestamp: i,
                        given: "A".into(),
                        is_correct: true,
                        elapsed_ms: 1000,
                    })
                    .unwrap();
            }
        }
        assert_eq!(store.load_attempts("u1").unwrap().len(), 3);
        assert_eq!(store.load_attempts("u2").unwrap().len(), 2);
        assert_eq!(store.attempt_count(), 5);
    }
}
