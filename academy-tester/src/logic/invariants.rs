//! Step-by-step invariant checks for simulated sessions.
use academy_engine::{PlayerStats, StatKey, UnitStatus};

use crate::logic::game_tester::SimSession;

const fn status_rank(status: UnitStatus) -> u8 {
    match status {
        UnitStatus::Locked => 0,
        UnitStatus::Current => 1,
        UnitStatus::Complete => 2,
    }
}

/// Remembers the previous observation so each check can compare against it.
#[derive(Debug, Clone)]
pub struct InvariantMonitor {
    stats: PlayerStats,
    history_len: usize,
    lessons: Vec<u8>,
    fitness: Vec<u8>,
    unlocked: usize,
    triggered: usize,
}

impl InvariantMonitor {
    pub fn observe(session: &SimSession) -> Self {
        Self {
            stats: *session.stats(),
            history_len: session.history().len(),
            lessons: session
                .lessons()
                .iter()
                .map(|lesson| status_rank(lesson.status))
                .collect(),
            fitness: session
                .fitness_activities()
                .iter()
                .map(|activity| status_rank(activity.status))
                .collect(),
            unlocked: session.unlocked_skills().len(),
            triggered: session.story().triggered_count(),
        }
    }

    /// Compare `session` with the last observation and record it.
    pub fn check(&mut self, session: &SimSession) -> Vec<String> {
        let next = Self::observe(session);
        let mut violations = Vec::new();
        let stats = next.stats;

        if !stats.level_consistent(session.config().xp_per_level.max(1)) {
            violations.push(format!(
                "level {} does not match {} xp",
                stats.level, stats.xp
            ));
        }
        if stats.xp < self.stats.xp {
            violations.push(format!("xp fell from {} to {}", self.stats.xp, stats.xp));
        }
        if stats.level < self.stats.level {
            violations.push(format!(
                "level fell from {} to {}",
                self.stats.level, stats.level
            ));
        }
        if next.history_len < self.history_len {
            violations.push("history shrank".to_string());
        }
        if session.history().latest().map(|snap| snap.stats.xp) != Some(stats.xp) {
            violations.push("latest history snapshot disagrees with xp".to_string());
        }
        if session.history().peak(StatKey::Xp) != Some(stats.xp) {
            violations.push("an earlier snapshot holds more xp than now".to_string());
        }
        for (label, points) in session.history().charts() {
            if points.len() != next.history_len {
                violations.push(format!(
                    "{label} chart has {} points for {} snapshots",
                    points.len(),
                    next.history_len
                ));
            }
        }
        if regressed(&self.lessons, &next.lessons) {
            violations.push("a lesson moved backwards".to_string());
        }
        if regressed(&self.fitness, &next.fitness) {
            violations.push("a fitness activity moved backwards".to_string());
        }
        if next.unlocked < self.unlocked {
            violations.push("an unlocked skill was lost".to_string());
        }
        for skill_id in session.unlocked_skills().iter() {
            let satisfied = session.skill_tree().get(skill_id).is_some_and(|skill| {
                skill
                    .dependencies
                    .iter()
                    .all(|dependency| session.unlocked_skills().contains(dependency))
            });
            if !satisfied {
                violations.push(format!("{skill_id} unlocked without its dependencies"));
            }
        }
        if next.triggered < self.triggered {
            violations.push("a story event fired twice or was reset".to_string());
        }
        if session.active_story_event().is_none() && !session.queued_story_events().is_empty() {
            violations.push("story events queued with nothing showing".to_string());
        }

        *self = next;
        violations
    }
}

fn regressed(before: &[u8], after: &[u8]) -> bool {
    before.len() != after.len() || before.iter().zip(after).any(|(old, new)| new < old)
}
