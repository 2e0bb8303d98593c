//! Centralized balance and tuning constants for the academy progression engine.
//!
//! These values define the deterministic math for stat growth. Keeping them
//! together ensures that progression can only be adjusted via code changes
//! reviewed in version control, or through an explicit `ProgressionConfig`.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "ACADEMY_DEBUG_LOGS";
pub(crate) const LOG_LEVEL_UP: &str = "log.level-up";
pub(crate) const LOG_SKILL_UNLOCKED: &str = "log.skill.unlocked";
pub(crate) const LOG_SKILL_REJECTED: &str = "log.skill.rejected";
pub(crate) const LOG_CHAIN_ADVANCED: &str = "log.chain.advanced";
pub(crate) const LOG_CHAIN_ISSUE: &str = "log.chain.issue";
pub(crate) const LOG_DAILY_ACTIVITY: &str = "log.daily-activity";
pub(crate) const LOG_STORY_FIRED: &str = "log.story.fired";
pub(crate) const LOG_STORY_QUEUED: &str = "log.story.queued";
pub(crate) const LOG_FITNESS_STALE_TICK: &str = "log.fitness.stale-tick";

// Progression tuning -------------------------------------------------------
pub const XP_PER_LEVEL: u32 = 100;
pub(crate) const XP_GAIN_DEFAULT: f64 = 1.0;
pub(crate) const ENERGY_COST_DEFAULT: f64 = 1.0;

// Starting stats -----------------------------------------------------------
pub(crate) const START_XP: u32 = 0;
pub(crate) const START_LEVEL: u32 = 1;
pub(crate) const START_SKILL_POINTS: u32 = 1;
pub(crate) const START_INTELLECT: u32 = 50;
pub(crate) const START_ENERGY: u32 = 80;
pub(crate) const START_HEALTH: u32 = 100;
pub(crate) const START_SOCIAL: u32 = 50;

// Daily pursuits -----------------------------------------------------------
pub(crate) const DAILY_STUDY_INTELLECT: i32 = 10;
pub(crate) const DAILY_STUDY_ENERGY: i32 = -15;
pub(crate) const DAILY_TRAIN_HEALTH: i32 = 5;
pub(crate) const DAILY_TRAIN_ENERGY: i32 = -20;
pub(crate) const DAILY_RELAX_SOCIAL: i32 = 10;
pub(crate) const DAILY_RELAX_ENERGY: i32 = 5;
pub(crate) const DAILY_XP: i32 = 5;

// Onboarding ---------------------------------------------------------------
pub(crate) const TUTORIAL_STEPS: u8 = 4;

// Fitness minigames --------------------------------------------------------
pub(crate) const MILLIS_PER_SECOND: u64 = 1_000;

// History ------------------------------------------------------------------
pub(crate) const CHART_MIN_POINTS: usize = 2;
