//! Folding unlocked skill effects into a keyed modifier table.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{ENERGY_COST_DEFAULT, XP_GAIN_DEFAULT};
use crate::numbers::{add_floored, round_half_up_f64_to_i64};
use crate::skills::{SkillTree, UnlockedSkills};
use crate::stats::{PlayerStats, StatKey};

/// What a skill effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKey {
    Xp,
    Intellect,
    Energy,
    Health,
    Social,
    /// Multiplier on every XP delta.
    XpGain,
    /// Multiplier on every energy delta.
    EnergyCostReduction,
}

impl EffectKey {
    /// Stat targeted by a flat bonus, `None` for multiplier keys.
    #[must_use]
    pub const fn flat_stat(self) -> Option<StatKey> {
        match self {
            Self::Xp => Some(StatKey::Xp),
            Self::Intellect => Some(StatKey::Intellect),
            Self::Energy => Some(StatKey::Energy),
            Self::Health => Some(StatKey::Health),
            Self::Social => Some(StatKey::Social),
            Self::XpGain | Self::EnergyCostReduction => None,
        }
    }
}

/// A single skill effect: `value` is a multiplier for `xp_gain` and
/// `energy_cost_reduction`, and a flat amount for stat keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub stat: EffectKey,
    pub value: f64,
}

/// Aggregated modifiers for the current unlocked skill set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierTable {
    pub xp_gain: f64,
    pub energy_cost_reduction: f64,
    /// Summed flat bonuses per stat.
    pub flat: BTreeMap<StatKey, f64>,
}

impl Default for ModifierTable {
    fn default() -> Self {
        Self {
            xp_gain: XP_GAIN_DEFAULT,
            energy_cost_reduction: ENERGY_COST_DEFAULT,
            flat: BTreeMap::new(),
        }
    }
}

impl ModifierTable {
    /// Fold the effects of every unlocked skill present in `tree`.
    ///
    /// Multipliers compose by product, flat bonuses by sum. Unlocked ids
    /// missing from the tree contribute nothing.
    #[must_use]
    pub fn from_unlocked(tree: &SkillTree, unlocked: &UnlockedSkills) -> Self {
        unlocked
            .iter()
            .filter_map(|id| tree.get(id))
            .fold(Self::default(), |mut table, skill| {
                table.fold_effect(skill.effect);
                table
            })
    }

    fn fold_effect(&mut self, effect: SkillEffect) {
        match effect.stat {
            EffectKey::XpGain => self.xp_gain *= effect.value,
            EffectKey::EnergyCostReduction => self.energy_cost_reduction *= effect.value,
            key => {
                if let Some(stat) = key.flat_stat() {
                    *self.flat.entry(stat).or_insert(0.0) += effect.value;
                }
            }
        }
    }

    #[must_use]
    pub fn flat_bonus(&self, stat: StatKey) -> f64 {
        self.flat.get(&stat).copied().unwrap_or(0.0)
    }

    /// Stats as displayed with flat skill bonuses added on top.
    ///
    /// Canonical stats are left untouched; the bonuses are a read-only view.
    #[must_use]
    pub fn effective_stats(&self, stats: &PlayerStats) -> PlayerStats {
        let bump = |value: u32, stat: StatKey| {
            add_floored(value, round_half_up_f64_to_i64(self.flat_bonus(stat)))
        };
        PlayerStats {
            intellect: bump(stats.intellect, StatKey::Intellect),
            energy: bump(stats.energy, StatKey::Energy),
            health: bump(stats.health, StatKey::Health),
            social: bump(stats.social, StatKey::Social),
            ..*stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::{Skill, SkillPosition};

    fn skill(id: &str, stat: EffectKey, value: f64) -> Skill {
        Skill {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            cost: 1,
            dependencies: Default::default(),
            position: SkillPosition::default(),
            effect: SkillEffect { stat, value },
        }
    }

    #[test]
    fn empty_set_yields_identity_table() {
        let table = ModifierTable::from_unlocked(&SkillTree::default(), &UnlockedSkills::new());
        assert!((table.xp_gain - 1.0).abs() < f64::EPSILON);
        assert!((table.energy_cost_reduction - 1.0).abs() < f64::EPSILON);
        assert!(table.flat.is_empty());
    }

    #[test]
    fn multipliers_compose_and_flats_sum() {
        let tree = SkillTree::new(vec![
            skill("a", EffectKey::XpGain, 1.1),
            skill("b", EffectKey::XpGain, 2.0),
            skill("c", EffectKey::Intellect, 5.0),
            skill("d", EffectKey::Intellect, 3.0),
            skill("e", EffectKey::EnergyCostReduction, 0.9),
        ]);
        let unlocked: UnlockedSkills = ["a", "b", "c", "d", "e"].into_iter().collect();
        let table = ModifierTable::from_unlocked(&tree, &unlocked);
        assert!((table.xp_gain - 2.2).abs() < 1e-9);
        assert!((table.energy_cost_reduction - 0.9).abs() < 1e-9);
        assert!((table.flat_bonus(StatKey::Intellect) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn effective_stats_leave_level_math_alone() {
        let tree = SkillTree::new(vec![skill("root", EffectKey::Health, 10.0)]);
        let unlocked: UnlockedSkills = std::iter::once("root").collect();
        let table = ModifierTable::from_unlocked(&tree, &unlocked);
        let base = PlayerStats::default();
        let shown = table.effective_stats(&base);
        assert_eq!(shown.health, base.health + 10);
        assert_eq!(shown.xp, base.xp);
        assert_eq!(shown.level, base.level);
    }
}
