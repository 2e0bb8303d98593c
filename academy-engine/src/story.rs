//! One-shot narrative events fired by stat predicates.
//!
//! A pass scans events in declaration order and fires the first untriggered
//! one whose trigger holds. At most one event fires per pass, and a fired
//! event never fires again. The session runs a pass after every committed
//! stat change.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{LOG_STORY_FIRED, LOG_STORY_QUEUED};
use crate::stats::{PlayerStats, StatDelta, StatKey};

/// Declarative predicate over player stats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum StoryTrigger {
    StatAtLeast { stat: StatKey, value: u32 },
    StatAtMost { stat: StatKey, value: u32 },
    All { of: Vec<StoryTrigger> },
    Any { of: Vec<StoryTrigger> },
}

impl StoryTrigger {
    #[must_use]
    pub fn holds(&self, stats: &PlayerStats) -> bool {
        match self {
            Self::StatAtLeast { stat, value } => stats.get(*stat) >= *value,
            Self::StatAtMost { stat, value } => stats.get(*stat) <= *value,
            Self::All { of } => of.iter().all(|trigger| trigger.holds(stats)),
            Self::Any { of } => of.iter().any(|trigger| trigger.holds(stats)),
        }
    }
}

/// A narrative beat shown once when its trigger first holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEvent {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub trigger: StoryTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<StatDelta>,
    #[serde(default)]
    pub is_triggered: bool,
}

/// Index of the first untriggered event whose trigger holds.
///
/// Returns `None` while `suppressed` is set (the welcome screen is up).
#[must_use]
pub fn evaluate(stats: &PlayerStats, events: &[StoryEvent], suppressed: bool) -> Option<usize> {
    if suppressed {
        return None;
    }
    events
        .iter()
        .position(|event| !event.is_triggered && event.trigger.holds(stats))
}

/// Event set plus notification state owned by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoryBoard {
    events: Vec<StoryEvent>,
    active: Option<usize>,
    queued: VecDeque<usize>,
}

impl StoryBoard {
    /// Load events with every trigger latch cleared.
    #[must_use]
    pub fn new(events: Vec<StoryEvent>) -> Self {
        let events = events
            .into_iter()
            .map(|event| StoryEvent {
                is_triggered: false,
                ..event
            })
            .collect();
        Self {
            events,
            active: None,
            queued: VecDeque::new(),
        }
    }

    /// Run one evaluation pass. Returns the fired event's rewards, if any,
    /// so the caller can commit them through the reward engine.
    pub fn run_pass(&mut self, stats: &PlayerStats, suppressed: bool) -> Option<StatDelta> {
        let index = evaluate(stats, &self.events, suppressed)?;
        let event = &mut self.events[index];
        event.is_triggered = true;
        let rewards = event.rewards;
        if self.active.is_none() {
            log::info!("{LOG_STORY_FIRED}: {}", event.id);
            self.active = Some(index);
        } else {
            log::info!("{LOG_STORY_QUEUED}: {}", event.id);
            self.queued.push_back(index);
        }
        rewards
    }

    /// Dismiss the active notification and surface the next queued one.
    pub fn close(&mut self) {
        self.active = self.queued.pop_front();
    }

    #[must_use]
    pub fn active(&self) -> Option<&StoryEvent> {
        self.active.and_then(|index| self.events.get(index))
    }

    pub fn queued(&self) -> impl Iterator<Item = &StoryEvent> {
        self.queued.iter().filter_map(|index| self.events.get(*index))
    }

    #[must_use]
    pub fn events(&self) -> &[StoryEvent] {
        &self.events
    }

    #[must_use]
    pub fn triggered_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_triggered).count()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.events.iter().all(|event| event.is_triggered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, trigger: StoryTrigger, rewards: Option<StatDelta>) -> StoryEvent {
        StoryEvent {
            id: id.to_string(),
            title: id.to_string(),
            text: String::new(),
            icon: None,
            trigger,
            rewards,
            is_triggered: false,
        }
    }

    fn at_least(stat: StatKey, value: u32) -> StoryTrigger {
        StoryTrigger::StatAtLeast { stat, value }
    }

    #[test]
    fn first_satisfied_event_in_order_wins() {
        let events = vec![
            event("never", at_least(StatKey::Xp, 10_000), None),
            event("first", at_least(StatKey::Health, 1), None),
            event("second", at_least(StatKey::Energy, 1), None),
        ];
        assert_eq!(evaluate(&PlayerStats::default(), &events, false), Some(1));
        assert_eq!(evaluate(&PlayerStats::default(), &events, true), None);
    }

    #[test]
    fn one_event_fires_per_pass_and_latches() {
        let mut board = StoryBoard::new(vec![
            event("a", at_least(StatKey::Health, 1), None),
            event("b", at_least(StatKey::Health, 1), None),
        ]);
        let stats = PlayerStats::default();
        board.run_pass(&stats, false);
        assert_eq!(board.triggered_count(), 1);
        assert_eq!(board.active().map(|e| e.id.as_str()), Some("a"));

        board.run_pass(&stats, false);
        assert_eq!(board.triggered_count(), 2);
        assert_eq!(board.active().map(|e| e.id.as_str()), Some("a"));
        assert_eq!(board.queued().count(), 1);

        assert_eq!(board.run_pass(&stats, false), None);
        assert_eq!(board.triggered_count(), 2);
        assert!(board.is_exhausted());
    }

    #[test]
    fn closing_surfaces_queued_event() {
        let mut board = StoryBoard::new(vec![
            event("a", at_least(StatKey::Health, 1), None),
            event("b", at_least(StatKey::Health, 1), None),
        ]);
        let stats = PlayerStats::default();
        board.run_pass(&stats, false);
        board.run_pass(&stats, false);
        board.close();
        assert_eq!(board.active().map(|e| e.id.as_str()), Some("b"));
        board.close();
        assert!(board.active().is_none());
    }

    #[test]
    fn pass_returns_rewards_of_fired_event() {
        let mut board = StoryBoard::new(vec![event(
            "bonus",
            at_least(StatKey::Level, 1),
            Some(StatDelta::xp(20)),
        )]);
        assert_eq!(
            board.run_pass(&PlayerStats::default(), false),
            Some(StatDelta::xp(20))
        );
    }

    #[test]
    fn composite_triggers_evaluate_children() {
        let trigger = StoryTrigger::All {
            of: vec![
                at_least(StatKey::Intellect, 50),
                StoryTrigger::Any {
                    of: vec![
                        at_least(StatKey::Xp, 500),
                        StoryTrigger::StatAtMost {
                            stat: StatKey::Energy,
                            value: 80,
                        },
                    ],
                },
            ],
        };
        assert!(trigger.holds(&PlayerStats::default()));
        let tired = PlayerStats {
            energy: 81,
            ..PlayerStats::default()
        };
        assert!(!trigger.holds(&tired));
    }

    #[test]
    fn loading_clears_latches() {
        let mut fired = event("a", at_least(StatKey::Health, 1), None);
        fired.is_triggered = true;
        let board = StoryBoard::new(vec![fired]);
        assert_eq!(board.triggered_count(), 0);
    }

    #[test]
    fn trigger_parses_from_json() {
        let json = r#"{"when":"all","of":[{"when":"stat_at_least","stat":"level","value":2}]}"#;
        let trigger: StoryTrigger = serde_json::from_str(json).expect("trigger parses");
        assert!(!trigger.holds(&PlayerStats::default()));
    }
}
