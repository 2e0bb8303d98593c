//! Skill tree gate: eligibility checks and unlock transactions.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::modifiers::SkillEffect;
use crate::stats::PlayerStats;

/// Placement on the tree view, in percent of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SkillPosition {
    pub x: f64,
    pub y: f64,
}

/// A purchasable node of the skill tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in skill points.
    pub cost: u32,
    /// Skills that must already be unlocked. Empty for roots.
    #[serde(default)]
    pub dependencies: SmallVec<[String; 2]>,
    #[serde(default)]
    pub position: SkillPosition,
    pub effect: SkillEffect,
}

/// Ordered set of unlocked skill ids. Only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnlockedSkills(BTreeSet<String>);

impl UnlockedSkills {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, id: &str) -> bool {
        self.0.insert(id.to_string())
    }
}

impl<'a> FromIterator<&'a str> for UnlockedSkills {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Display state of a node on the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillNodeState {
    Unlocked,
    Available,
    Locked,
}

/// Whether `skill` may be unlocked right now.
///
/// True iff it is not already unlocked, the player can afford it, and every
/// dependency is unlocked.
#[must_use]
pub fn can_unlock(skill: &Skill, stats: &PlayerStats, unlocked: &UnlockedSkills) -> bool {
    !unlocked.contains(&skill.id)
        && stats.skill_points >= skill.cost
        && skill
            .dependencies
            .iter()
            .all(|dependency| unlocked.contains(dependency))
}

/// Spend points and add `skill` to the unlocked set.
///
/// Eligibility is re-checked; an ineligible unlock returns the inputs
/// unchanged. Effects are not applied here, the reward engine reads them.
#[must_use]
pub fn unlock(
    skill: &Skill,
    stats: &PlayerStats,
    unlocked: &UnlockedSkills,
) -> (PlayerStats, UnlockedSkills) {
    if !can_unlock(skill, stats, unlocked) {
        return (*stats, unlocked.clone());
    }
    let mut next_unlocked = unlocked.clone();
    next_unlocked.insert(&skill.id);
    let next_stats = PlayerStats {
        skill_points: stats.skill_points - skill.cost,
        ..*stats
    };
    (next_stats, next_unlocked)
}

#[must_use]
pub fn node_state(skill: &Skill, stats: &PlayerStats, unlocked: &UnlockedSkills) -> SkillNodeState {
    if unlocked.contains(&skill.id) {
        SkillNodeState::Unlocked
    } else if can_unlock(skill, stats, unlocked) {
        SkillNodeState::Available
    } else {
        SkillNodeState::Locked
    }
}

/// The full catalog of skills in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SkillTree {
    skills: Vec<Skill>,
}

impl SkillTree {
    #[must_use]
    pub const fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.skills.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills with no dependencies.
    pub fn roots(&self) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(|skill| skill.dependencies.is_empty())
    }

    /// `(dependency, dependent)` pairs for drawing connecting paths.
    /// Dependencies naming unknown skills are skipped.
    #[must_use]
    pub fn edges(&self) -> Vec<(&Skill, &Skill)> {
        self.skills
            .iter()
            .flat_map(|skill| {
                skill
                    .dependencies
                    .iter()
                    .filter_map(|dependency| self.get(dependency))
                    .map(move |from| (from, skill))
            })
            .collect()
    }

    /// Dependency ids that name no skill in the tree, as `(skill, dependency)`.
    #[must_use]
    pub fn unknown_dependencies(&self) -> Vec<(&str, &str)> {
        self.skills
            .iter()
            .flat_map(|skill| {
                skill
                    .dependencies
                    .iter()
                    .filter(|dependency| self.get(dependency).is_none())
                    .map(move |dependency| (skill.id.as_str(), dependency.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::EffectKey;
    use smallvec::smallvec;

    fn root_mind() -> Skill {
        Skill {
            id: "root_mind".to_string(),
            name: "Focused Mind".to_string(),
            description: String::new(),
            cost: 1,
            dependencies: SmallVec::new(),
            position: SkillPosition::default(),
            effect: SkillEffect {
                stat: EffectKey::Intellect,
                value: 5.0,
            },
        }
    }

    fn xp_boost() -> Skill {
        Skill {
            id: "xp_boost_1".to_string(),
            name: "Efficient Learner I".to_string(),
            description: String::new(),
            cost: 2,
            dependencies: smallvec!["root_mind".to_string()],
            position: SkillPosition::default(),
            effect: SkillEffect {
                stat: EffectKey::XpGain,
                value: 1.1,
            },
        }
    }

    fn with_points(points: u32) -> PlayerStats {
        PlayerStats {
            skill_points: points,
            ..PlayerStats::default()
        }
    }

    #[test]
    fn roots_unlock_once_affordable() {
        let none = UnlockedSkills::new();
        assert!(can_unlock(&root_mind(), &with_points(1), &none));
        assert!(!can_unlock(&root_mind(), &with_points(0), &none));
    }

    #[test]
    fn insufficient_points_block_unlock() {
        let unlocked: UnlockedSkills = std::iter::once("root_mind").collect();
        assert!(!can_unlock(&xp_boost(), &with_points(1), &unlocked));
    }

    #[test]
    fn unmet_dependency_blocks_unlock() {
        assert!(!can_unlock(&xp_boost(), &with_points(2), &UnlockedSkills::new()));
        let (stats, unlocked) = unlock(&xp_boost(), &with_points(2), &UnlockedSkills::new());
        assert_eq!(stats.skill_points, 2);
        assert!(unlocked.is_empty());
    }

    #[test]
    fn unlock_spends_cost_exactly_once() {
        let base: UnlockedSkills = std::iter::once("root_mind").collect();
        let (stats, unlocked) = unlock(&xp_boost(), &with_points(5), &base);
        assert_eq!(stats.skill_points, 3);
        assert!(unlocked.contains("xp_boost_1"));

        let (again_stats, again_unlocked) = unlock(&xp_boost(), &stats, &unlocked);
        assert_eq!(again_stats.skill_points, 3);
        assert_eq!(again_unlocked.len(), 2);
    }

    #[test]
    fn node_state_reflects_gate() {
        let tree = SkillTree::new(vec![root_mind(), xp_boost()]);
        let none = UnlockedSkills::new();
        let stats = with_points(1);
        assert_eq!(node_state(&root_mind(), &stats, &none), SkillNodeState::Available);
        assert_eq!(node_state(&xp_boost(), &stats, &none), SkillNodeState::Locked);
        let edges = tree.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].0.id, "root_mind");
        assert_eq!(edges[0].1.id, "xp_boost_1");
        assert_eq!(tree.roots().count(), 1);
        assert!(tree.unknown_dependencies().is_empty());
    }
}
