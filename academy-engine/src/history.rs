//! Append-only timeline of stat snapshots used for growth charts.
use serde::{Deserialize, Serialize};

use crate::constants::CHART_MIN_POINTS;
use crate::stats::{PlayerStats, StatKey};

/// Stats captured at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSnapshot {
    #[serde(flatten)]
    pub stats: PlayerStats,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Ordered snapshot log. Entries are never mutated or pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatsHistory {
    entries: Vec<StatSnapshot>,
}

impl StatsHistory {
    /// Start a history with the session's opening snapshot.
    #[must_use]
    pub fn starting_at(stats: PlayerStats, timestamp: i64) -> Self {
        Self {
            entries: vec![StatSnapshot { stats, timestamp }],
        }
    }

    pub(crate) fn record(&mut self, stats: PlayerStats, timestamp: i64) {
        self.entries.push(StatSnapshot { stats, timestamp });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[StatSnapshot] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&StatSnapshot> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatSnapshot> {
        self.entries.iter()
    }

    /// `(timestamp, value)` points for one chartable stat, in recording order.
    /// Progress counters (XP, level, skill points) have no chart and yield
    /// no points.
    #[must_use]
    pub fn series(&self, stat: StatKey) -> Vec<(i64, u32)> {
        if !stat.is_chartable() {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|snapshot| (snapshot.timestamp, snapshot.stats.get(stat)))
            .collect()
    }

    /// Every growth chart, labelled, in display order.
    #[must_use]
    pub fn charts(&self) -> Vec<(&'static str, Vec<(i64, u32)>)> {
        StatKey::CHARTABLE
            .iter()
            .map(|stat| (stat.label(), self.series(*stat)))
            .collect()
    }

    /// Whether there are enough points to draw a line chart.
    #[must_use]
    pub fn chart_ready(&self) -> bool {
        self.entries.len() >= CHART_MIN_POINTS
    }

    /// Highest value a stat has reached over the session.
    #[must_use]
    pub fn peak(&self, stat: StatKey) -> Option<u32> {
        self.entries
            .iter()
            .map(|snapshot| snapshot.stats.get(stat))
            .max()
    }
}

impl<'a> IntoIterator for &'a StatsHistory {
    type Item = &'a StatSnapshot;
    type IntoIter = std::slice::Iter<'a, StatSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_starts_with_one_snapshot() {
        let history = StatsHistory::starting_at(PlayerStats::default(), 10);
        assert_eq!(history.len(), 1);
        assert!(!history.chart_ready());
        assert_eq!(history.latest().map(|s| s.timestamp), Some(10));
    }

    #[test]
    fn series_tracks_each_recorded_value() {
        let mut history = StatsHistory::starting_at(PlayerStats::default(), 0);
        let mut next = PlayerStats::default();
        next.intellect = 60;
        history.record(next, 5);

        assert!(history.chart_ready());
        assert_eq!(history.series(StatKey::Intellect), vec![(0, 50), (5, 60)]);
        assert_eq!(history.peak(StatKey::Intellect), Some(60));
    }

    #[test]
    fn progress_counters_are_not_charted() {
        let mut history = StatsHistory::starting_at(PlayerStats::default(), 0);
        let mut next = PlayerStats::default();
        next.xp = 150;
        next.level = 2;
        history.record(next, 5);

        assert!(history.series(StatKey::Xp).is_empty());
        assert!(history.series(StatKey::SkillPoints).is_empty());
        assert_eq!(history.peak(StatKey::Xp), Some(150));

        let charts = history.charts();
        let labels: Vec<_> = charts.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Intellect", "Energy", "Health", "Social"]);
        assert!(charts.iter().all(|(_, points)| points.len() == 2));
    }

    #[test]
    fn snapshot_serializes_flat() {
        let snapshot = StatSnapshot {
            stats: PlayerStats::default(),
            timestamp: 42,
        };
        let json = serde_json::to_value(snapshot).expect("serializes");
        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["health"], 100);
    }
}
