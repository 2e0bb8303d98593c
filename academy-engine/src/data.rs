use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::challenges::CodingChallenge;
use crate::constants::LOG_CHAIN_ISSUE;
use crate::error::CatalogError;
use crate::progression::{ChainIssue, FitnessActivity, Lesson, validate_chain};
use crate::skills::{Skill, SkillTree};
use crate::story::StoryEvent;

/// Catalog JSON shipped inside the engine.
pub const BUNDLED_CATALOG_JSON: &str = include_str!("../assets/catalog.json");

/// Content bundled with the academy: journeys, challenges, skills and story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub fitness_activities: Vec<FitnessActivity>,
    #[serde(default)]
    pub challenges: Vec<CodingChallenge>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub story_events: Vec<StoryEvent>,
}

impl Catalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON string and check its identities.
    ///
    /// Chain shape problems are logged as warnings, not rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, an id is declared
    /// twice, or a skill depends on a skill that does not exist.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        for issue in catalog.chain_issues() {
            log::warn!("{LOG_CHAIN_ISSUE}: {issue}");
        }
        Ok(catalog)
    }

    /// Load the catalog shipped with the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG_JSON)
    }

    /// Check id uniqueness and skill dependency references.
    ///
    /// # Errors
    ///
    /// Returns the first identity problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        ensure_unique("lesson", self.lessons.iter().map(|l| l.id.to_string()))?;
        ensure_unique(
            "fitness activity",
            self.fitness_activities.iter().map(|a| a.id.to_string()),
        )?;
        ensure_unique("challenge", self.challenges.iter().map(|c| c.id.clone()))?;
        ensure_unique("skill", self.skills.iter().map(|s| s.id.clone()))?;
        ensure_unique("story event", self.story_events.iter().map(|e| e.id.clone()))?;

        let tree = self.skill_tree();
        if let Some((skill, dependency)) = tree.unknown_dependencies().into_iter().next() {
            return Err(CatalogError::UnknownDependency {
                skill: skill.to_string(),
                dependency: dependency.to_string(),
            });
        }
        Ok(())
    }

    /// Shape issues across both journeys, lessons first.
    #[must_use]
    pub fn chain_issues(&self) -> Vec<ChainIssue> {
        let mut issues = validate_chain(&self.lessons);
        issues.extend(validate_chain(&self.fitness_activities));
        issues
    }

    #[must_use]
    pub fn skill_tree(&self) -> SkillTree {
        SkillTree::new(self.skills.clone())
    }

    #[must_use]
    pub fn challenge(&self, id: &str) -> Option<&CodingChallenge> {
        self.challenges.iter().find(|challenge| challenge.id == id)
    }

    /// Challenge behind a lesson, if the lesson is playable content.
    #[must_use]
    pub fn challenge_for_lesson(&self, lesson: &Lesson) -> Option<&CodingChallenge> {
        self.challenge(&lesson.challenge_id)
    }
}

fn ensure_unique(
    kind: &'static str,
    ids: impl Iterator<Item = String>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
