//! Player stat model: attributes, partial deltas and level math.
use serde::{Deserialize, Serialize};

use crate::constants::{
    START_ENERGY, START_HEALTH, START_INTELLECT, START_LEVEL, START_SKILL_POINTS, START_SOCIAL,
    START_XP,
};

/// The learner's numeric attributes.
///
/// `level` is derived from `xp`; the reward engine keeps the two in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub xp: u32,
    pub level: u32,
    pub skill_points: u32,
    pub intellect: u32,
    pub energy: u32,
    pub health: u32,
    pub social: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            xp: START_XP,
            level: START_LEVEL,
            skill_points: START_SKILL_POINTS,
            intellect: START_INTELLECT,
            energy: START_ENERGY,
            health: START_HEALTH,
            social: START_SOCIAL,
        }
    }
}

impl PlayerStats {
    /// Read a single stat by key.
    #[must_use]
    pub const fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::Xp => self.xp,
            StatKey::Level => self.level,
            StatKey::SkillPoints => self.skill_points,
            StatKey::Intellect => self.intellect,
            StatKey::Energy => self.energy,
            StatKey::Health => self.health,
            StatKey::Social => self.social,
        }
    }

    /// Whether `level` agrees with `xp` for the given level size.
    #[must_use]
    pub const fn level_consistent(&self, xp_per_level: u32) -> bool {
        self.level == level_for_xp(self.xp, xp_per_level)
    }
}

/// Level reached at a given XP total: `floor(xp / xp_per_level) + 1`.
///
/// A zero level size is treated as one XP per level rather than dividing by zero.
/// The formula is exact for every XP total up to [`max_xp`]; rewards never
/// push XP past that cap.
#[must_use]
pub const fn level_for_xp(xp: u32, xp_per_level: u32) -> u32 {
    let per = if xp_per_level <= 1 { 1 } else { xp_per_level };
    (xp / per).saturating_add(1)
}

/// Largest XP total whose level still fits in a `u32`.
#[must_use]
pub const fn max_xp(xp_per_level: u32) -> u32 {
    if xp_per_level <= 1 { u32::MAX - 1 } else { u32::MAX }
}

/// Key addressing one stat of [`PlayerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Xp,
    Level,
    SkillPoints,
    Intellect,
    Energy,
    Health,
    Social,
}

impl StatKey {
    /// Stats shown on the growth charts.
    pub const CHARTABLE: [Self; 4] = [Self::Intellect, Self::Energy, Self::Health, Self::Social];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Xp => "XP",
            Self::Level => "Level",
            Self::SkillPoints => "Skill Points",
            Self::Intellect => "Intellect",
            Self::Energy => "Energy",
            Self::Health => "Health",
            Self::Social => "Social",
        }
    }

    #[must_use]
    pub const fn is_chartable(self) -> bool {
        matches!(
            self,
            Self::Intellect | Self::Energy | Self::Health | Self::Social
        )
    }
}

/// Partial stat change applied by rewards. Absent fields count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intellect: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<i32>,
}

impl StatDelta {
    #[must_use]
    pub const fn xp(amount: i32) -> Self {
        Self {
            xp: Some(amount),
            intellect: None,
            energy: None,
            health: None,
            social: None,
        }
    }

    #[must_use]
    pub const fn with_xp(mut self, amount: i32) -> Self {
        self.xp = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_intellect(mut self, amount: i32) -> Self {
        self.intellect = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_energy(mut self, amount: i32) -> Self {
        self.energy = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_health(mut self, amount: i32) -> Self {
        self.health = Some(amount);
        self
    }

    #[must_use]
    pub const fn with_social(mut self, amount: i32) -> Self {
        self.social = Some(amount);
        self
    }

    /// Delta for a key, zero when absent or when the key is not rewardable.
    #[must_use]
    pub fn amount(&self, key: StatKey) -> i32 {
        let field = match key {
            StatKey::Xp => self.xp,
            StatKey::Intellect => self.intellect,
            StatKey::Energy => self.energy,
            StatKey::Health => self.health,
            StatKey::Social => self.social,
            StatKey::Level | StatKey::SkillPoints => None,
        };
        field.unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            self.xp,
            self.intellect,
            self.energy,
            self.health,
            self.social,
        ]
        .iter()
        .all(|value| value.unwrap_or(0) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_match_new_learner() {
        let stats = PlayerStats::default();
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.skill_points, 1);
        assert_eq!(stats.energy, 80);
        assert!(stats.level_consistent(100));
    }

    #[test]
    fn level_for_xp_steps_every_hundred() {
        assert_eq!(level_for_xp(0, 100), 1);
        assert_eq!(level_for_xp(99, 100), 1);
        assert_eq!(level_for_xp(100, 100), 2);
        assert_eq!(level_for_xp(105, 100), 2);
        assert_eq!(level_for_xp(350, 100), 4);
        assert_eq!(level_for_xp(3, 0), 4);
    }

    #[test]
    fn delta_parses_partial_json() {
        let delta: StatDelta = serde_json::from_str(r#"{"health":5,"energy":-10,"xp":10}"#)
            .expect("delta parses");
        assert_eq!(delta.amount(StatKey::Health), 5);
        assert_eq!(delta.amount(StatKey::Energy), -10);
        assert_eq!(delta.amount(StatKey::Intellect), 0);
        assert!(!delta.is_empty());
        assert!(StatDelta::default().is_empty());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(PlayerStats::default()).expect("serializes");
        assert_eq!(json["skillPoints"], 1);
    }
}
