//! Academy Progression Engine
//!
//! Platform-agnostic core logic for a gamified learning academy: stats and
//! levels, lesson and fitness journeys, the skill tree, story events and the
//! fitness minigames. This crate has no UI or platform-specific dependencies;
//! a presentation layer drives an [`AcademySession`] through intents.

pub mod challenges;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod fitness;
pub mod history;
pub mod modifiers;
pub mod numbers;
pub mod onboarding;
pub mod progression;
pub mod reward;
pub mod session;
pub mod skills;
pub mod stats;
pub mod story;

// Re-export commonly used types
pub use challenges::{
    ChallengeKind, CodingChallenge, DailyActivity, Difficulty, Language, TestCase,
    challenges_by_language,
};
pub use config::{ConfigError, ProgressionConfig};
pub use constants::XP_PER_LEVEL;
pub use data::{BUNDLED_CATALOG_JSON, Catalog};
pub use error::CatalogError;
pub use fitness::{
    ActivityRun, FitnessRunner, Minigame, MinigameConfig, MinigameInput, MinigameOutcome,
    RapidClick, RunToken, TimedHold,
};
pub use history::{StatSnapshot, StatsHistory};
pub use modifiers::{EffectKey, ModifierTable, SkillEffect};
pub use onboarding::Onboarding;
pub use progression::{
    ChainIssue, ChainUnit, FitnessActivity, FitnessKind, Lesson, LessonKind, UnitStatus,
    complete_unit, current_unit, progress, validate_chain,
};
pub use reward::{AppliedDelta, RewardOutcome, apply_reward};
pub use session::{AcademySession, Clock, ManualClock, SessionState, SystemClock};
pub use skills::{
    Skill, SkillNodeState, SkillPosition, SkillTree, UnlockedSkills, can_unlock, node_state,
};
pub use stats::{PlayerStats, StatDelta, StatKey, level_for_xp, max_xp};
pub use story::{StoryBoard, StoryEvent, StoryTrigger};

/// Name under which the progression settings are requested from a loader.
pub const PROGRESSION_CONFIG_NAME: &str = "progression";

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the content catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Loader serving the catalog compiled into the engine with default settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLoader;

impl DataLoader for BundledLoader {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::load_from_static()
    }

    fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(serde_json::from_str("{}")?)
    }
}

/// Main engine for building academy sessions
pub struct AcademyEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> AcademyEngine<L>
where
    L: DataLoader,
{
    /// Create a new engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Load and validate the progression settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded or break the level
    /// invariant.
    pub fn load_config(&self) -> anyhow::Result<ProgressionConfig>
    where
        L::Error: Into<anyhow::Error>,
    {
        let config: ProgressionConfig = self
            .data_loader
            .load_config(PROGRESSION_CONFIG_NAME)
            .map_err(Into::into)?;
        config.validate()?;
        Ok(config)
    }

    /// Construct a fresh session on the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or settings cannot be loaded.
    pub fn create_session(&self) -> anyhow::Result<AcademySession>
    where
        L::Error: Into<anyhow::Error>,
    {
        self.create_session_with_clock(SystemClock)
    }

    /// Construct a fresh session driven by `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or settings cannot be loaded.
    pub fn create_session_with_clock<C: Clock>(&self, clock: C) -> anyhow::Result<AcademySession<C>>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self.data_loader.load_catalog().map_err(Into::into)?;
        let config = self.load_config()?;
        Ok(AcademySession::with_clock(catalog, config, clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::empty())
        }

        fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
        where
            T: DeserializeOwned,
        {
            let parsed = serde_json::from_str(r#"{"xp_per_level": 50}"#).unwrap();
            Ok(parsed)
        }
    }

    #[derive(Clone, Copy, Default)]
    struct BrokenConfigLoader;

    impl DataLoader for BrokenConfigLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::empty())
        }

        fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
        where
            T: DeserializeOwned,
        {
            Ok(serde_json::from_str(r#"{"xp_per_level": 0}"#)?)
        }
    }

    #[test]
    fn engine_applies_loaded_config() {
        let engine = AcademyEngine::new(FixtureLoader);
        let mut session = engine
            .create_session_with_clock(ManualClock::starting_at(0))
            .unwrap();
        session.on_activity_complete(StatDelta::xp(60));
        assert_eq!(session.stats().level, 2);
        assert!(session.lessons().is_empty());
    }

    #[test]
    fn engine_rejects_invalid_config() {
        let engine = AcademyEngine::new(BrokenConfigLoader);
        let err = engine.create_session().unwrap_err();
        assert!(err.to_string().contains("xp_per_level"));
    }

    #[test]
    fn bundled_loader_serves_static_catalog() {
        let engine = AcademyEngine::new(BundledLoader);
        let session = engine.create_session().unwrap();
        assert_eq!(session.lessons().len(), 13);
        assert_eq!(session.config(), &ProgressionConfig::default());
    }
}
