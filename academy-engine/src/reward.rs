//! Reward application: modifiers, floors and level transitions.
use serde::{Deserialize, Serialize};

use crate::modifiers::ModifierTable;
use crate::numbers::{add_floored, scale_delta};
use crate::stats::{PlayerStats, StatDelta, StatKey, level_for_xp, max_xp};

/// Result of applying one reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub stats: PlayerStats,
    /// Delta actually applied after modifiers and rounding, before flooring.
    pub applied: AppliedDelta,
    pub levels_gained: u32,
}

impl RewardOutcome {
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppliedDelta {
    pub xp: i64,
    pub intellect: i64,
    pub energy: i64,
    pub health: i64,
    pub social: i64,
}

/// Apply a partial stat delta to `current`.
///
/// XP and energy deltas are scaled by the `xp_gain` and
/// `energy_cost_reduction` multipliers and rounded half-up. The energy
/// multiplier scales positive deltas as well as costs. XP never decreases;
/// `intellect`, `energy`, `health` and `social` floor at zero. Crossing a
/// level boundary raises `level` and grants one skill point per level gained.
#[must_use]
pub fn apply_reward(
    current: &PlayerStats,
    modifiers: &ModifierTable,
    reward: &StatDelta,
    xp_per_level: u32,
) -> RewardOutcome {
    let applied = AppliedDelta {
        xp: scale_delta(reward.amount(StatKey::Xp), modifiers.xp_gain).max(0),
        intellect: i64::from(reward.amount(StatKey::Intellect)),
        energy: scale_delta(
            reward.amount(StatKey::Energy),
            modifiers.energy_cost_reduction,
        ),
        health: i64::from(reward.amount(StatKey::Health)),
        social: i64::from(reward.amount(StatKey::Social)),
    };

    let mut stats = PlayerStats {
        xp: add_floored(current.xp, applied.xp)
            .min(max_xp(xp_per_level))
            .max(current.xp),
        intellect: add_floored(current.intellect, applied.intellect),
        energy: add_floored(current.energy, applied.energy),
        health: add_floored(current.health, applied.health),
        social: add_floored(current.social, applied.social),
        ..*current
    };

    let new_level = level_for_xp(stats.xp, xp_per_level);
    let levels_gained = new_level.saturating_sub(current.level);
    if levels_gained > 0 {
        stats.level = new_level;
        stats.skill_points = stats.skill_points.saturating_add(levels_gained);
    }

    RewardOutcome {
        stats,
        applied,
        levels_gained,
    }
}
