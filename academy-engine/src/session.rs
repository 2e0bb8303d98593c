//! Session controller: the single owner of a player's canonical state.
//!
//! The presentation layer reads through accessors and dispatches intents.
//! Every intent is infallible; unknown ids and ineligible requests resolve to
//! silent no-ops. After each committed stat change the story board gets one
//! evaluation pass, and story rewards are committed the same way, so a chain
//! of rewarded events settles before the intent returns.
use std::cell::Cell;
use std::rc::Rc;

use crate::challenges::{CodingChallenge, DailyActivity};
use crate::config::ProgressionConfig;
use crate::constants::{
    DEBUG_ENV_VAR, LOG_CHAIN_ADVANCED, LOG_DAILY_ACTIVITY, LOG_LEVEL_UP, LOG_SKILL_REJECTED,
    LOG_SKILL_UNLOCKED,
};
use crate::data::Catalog;
use crate::fitness::{ActivityRun, FitnessRunner, MinigameInput, MinigameOutcome, RunToken};
use crate::history::StatsHistory;
use crate::modifiers::ModifierTable;
use crate::onboarding::Onboarding;
use crate::progression::{
    ChainUnit, FitnessActivity, Lesson, complete_unit, current_unit, progress,
};
use crate::reward::apply_reward;
use crate::skills::{Skill, SkillNodeState, SkillTree, UnlockedSkills, can_unlock, node_state};
use crate::stats::{PlayerStats, StatDelta};
use crate::story::{StoryBoard, StoryEvent};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Source of wall-clock milliseconds for history timestamps and hold timers.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for deterministic sessions. Clones share one reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(millis: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(millis)),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    pub fn set(&self, millis: i64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Canonical per-player state. Only the session mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub stats: PlayerStats,
    pub history: StatsHistory,
    pub lessons: Vec<Lesson>,
    pub fitness_activities: Vec<FitnessActivity>,
    pub unlocked: UnlockedSkills,
    pub story: StoryBoard,
    pub onboarding: Onboarding,
}

#[derive(Debug)]
pub struct AcademySession<C: Clock = SystemClock> {
    state: SessionState,
    skill_tree: SkillTree,
    challenges: Vec<CodingChallenge>,
    config: ProgressionConfig,
    fitness: FitnessRunner,
    clock: C,
}

impl AcademySession<SystemClock> {
    /// Start a fresh session on the system clock.
    #[must_use]
    pub fn new(catalog: Catalog, config: ProgressionConfig) -> Self {
        Self::with_clock(catalog, config, SystemClock)
    }
}

impl<C: Clock> AcademySession<C> {
    /// Start a fresh session. The opening history snapshot is taken now.
    #[must_use]
    pub fn with_clock(catalog: Catalog, config: ProgressionConfig, clock: C) -> Self {
        let Catalog {
            lessons,
            fitness_activities,
            challenges,
            skills,
            story_events,
        } = catalog;
        let stats = config.initial_stats;
        let state = SessionState {
            stats,
            history: StatsHistory::starting_at(stats, clock.now_millis()),
            lessons,
            fitness_activities,
            unlocked: UnlockedSkills::new(),
            story: StoryBoard::new(story_events),
            onboarding: Onboarding::default(),
        };
        Self {
            state,
            skill_tree: SkillTree::new(skills),
            challenges,
            config,
            fitness: FitnessRunner::default(),
            clock,
        }
    }

    /// Replace the onboarding flow, e.g. to resume past the welcome screen.
    #[must_use]
    pub fn with_onboarding(mut self, onboarding: Onboarding) -> Self {
        self.state.onboarding = onboarding;
        self
    }

    // Read-only views ------------------------------------------------------

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn stats(&self) -> &PlayerStats {
        &self.state.stats
    }

    /// Stats with flat skill bonuses layered on for display.
    #[must_use]
    pub fn effective_stats(&self) -> PlayerStats {
        self.modifiers().effective_stats(&self.state.stats)
    }

    #[must_use]
    pub fn modifiers(&self) -> ModifierTable {
        ModifierTable::from_unlocked(&self.skill_tree, &self.state.unlocked)
    }

    #[must_use]
    pub const fn history(&self) -> &StatsHistory {
        &self.state.history
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.state.lessons
    }

    #[must_use]
    pub fn fitness_activities(&self) -> &[FitnessActivity] {
        &self.state.fitness_activities
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        current_unit(&self.state.lessons)
    }

    #[must_use]
    pub fn current_fitness_activity(&self) -> Option<&FitnessActivity> {
        current_unit(&self.state.fitness_activities)
    }

    /// `(completed, total)` lessons.
    #[must_use]
    pub fn lesson_progress(&self) -> (usize, usize) {
        progress(&self.state.lessons)
    }

    /// `(completed, total)` fitness activities.
    #[must_use]
    pub fn fitness_progress(&self) -> (usize, usize) {
        progress(&self.state.fitness_activities)
    }

    #[must_use]
    pub fn challenges(&self) -> &[CodingChallenge] {
        &self.challenges
    }

    #[must_use]
    pub fn challenge(&self, id: &str) -> Option<&CodingChallenge> {
        self.challenges.iter().find(|challenge| challenge.id == id)
    }

    #[must_use]
    pub const fn skill_tree(&self) -> &SkillTree {
        &self.skill_tree
    }

    #[must_use]
    pub const fn unlocked_skills(&self) -> &UnlockedSkills {
        &self.state.unlocked
    }

    /// Every node of the tree with its display state.
    #[must_use]
    pub fn skill_states(&self) -> Vec<(&Skill, SkillNodeState)> {
        self.skill_tree
            .iter()
            .map(|skill| {
                (
                    skill,
                    node_state(skill, &self.state.stats, &self.state.unlocked),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn active_story_event(&self) -> Option<&StoryEvent> {
        self.state.story.active()
    }

    #[must_use]
    pub fn queued_story_events(&self) -> Vec<&StoryEvent> {
        self.state.story.queued().collect()
    }

    #[must_use]
    pub const fn story(&self) -> &StoryBoard {
        &self.state.story
    }

    #[must_use]
    pub const fn onboarding(&self) -> &Onboarding {
        &self.state.onboarding
    }

    #[must_use]
    pub const fn active_fitness_run(&self) -> Option<&ActivityRun> {
        self.fitness.active()
    }

    #[must_use]
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    // Intents --------------------------------------------------------------

    /// Apply a reward through the current modifiers and settle the story.
    pub fn on_activity_complete(&mut self, reward: StatDelta) {
        self.commit(reward);
    }

    pub fn on_daily_activity(&mut self, activity: DailyActivity) {
        log::debug!("{LOG_DAILY_ACTIVITY}: {}", activity.label());
        self.commit(activity.reward());
    }

    /// Reward a finished challenge and advance the lesson chain keyed by its id.
    pub fn on_challenge_complete(&mut self, challenge: &CodingChallenge) {
        self.commit(challenge.reward);
        self.state.lessons = advance_chain(&self.state.lessons, challenge.id.as_str(), "lesson");
    }

    /// Reward a finished fitness activity and advance the fitness chain.
    pub fn on_fitness_activity_complete(&mut self, activity_id: u32) {
        let Some(reward) = self
            .state
            .fitness_activities
            .iter()
            .find(|activity| activity.id == activity_id)
            .map(|activity| activity.reward)
        else {
            return;
        };
        self.commit(reward);
        self.state.fitness_activities =
            advance_chain(&self.state.fitness_activities, &activity_id, "fitness");
    }

    /// Spend skill points on a node. Returns whether the unlock happened.
    pub fn on_unlock_skill(&mut self, skill_id: &str) -> bool {
        let Some(skill) = self.skill_tree.get(skill_id) else {
            log::debug!("{LOG_SKILL_REJECTED}: {skill_id} is not in the tree");
            return false;
        };
        if !can_unlock(skill, &self.state.stats, &self.state.unlocked) {
            log::debug!(
                "{LOG_SKILL_REJECTED}: {skill_id} (cost {}, {} points available)",
                skill.cost,
                self.state.stats.skill_points
            );
            return false;
        }
        let (stats, unlocked) = crate::skills::unlock(skill, &self.state.stats, &self.state.unlocked);
        log::info!(
            "{LOG_SKILL_UNLOCKED}: {skill_id} ({} points left)",
            stats.skill_points
        );
        self.state.stats = stats;
        self.state.unlocked = unlocked;
        self.settle_story();
        true
    }

    /// Dismiss the showing story notification; the next queued one takes its place.
    pub fn close_story_event(&mut self) {
        self.state.story.close();
    }

    /// Leave the welcome screen and run the first story pass.
    pub fn begin(&mut self) -> bool {
        let was_showing = self.state.onboarding.begin();
        self.settle_story();
        was_showing
    }

    pub fn tutorial_next(&mut self) {
        self.state.onboarding.next_step();
    }

    pub fn tutorial_complete(&mut self) {
        self.state.onboarding.complete();
    }

    /// Launch the minigame of a playable fitness activity.
    pub fn start_fitness_activity(&mut self, activity_id: u32) -> Option<RunToken> {
        let activity = self
            .state
            .fitness_activities
            .iter()
            .find(|activity| activity.id == activity_id)
            .filter(|activity| activity.status.is_playable())?;
        Some(self.fitness.start(activity.id, activity.challenge))
    }

    /// Route one input to the run owning `token`. Success completes the activity.
    pub fn fitness_input(&mut self, token: RunToken, input: MinigameInput) -> Option<MinigameOutcome> {
        let (activity_id, outcome) = self.fitness.handle(token, input)?;
        if outcome == MinigameOutcome::Success {
            self.on_fitness_activity_complete(activity_id);
        }
        Some(outcome)
    }

    pub fn fitness_click(&mut self, token: RunToken) -> Option<MinigameOutcome> {
        self.fitness_input(token, MinigameInput::Click)
    }

    pub fn fitness_second_elapsed(&mut self, token: RunToken) -> Option<MinigameOutcome> {
        self.fitness_input(token, MinigameInput::SecondElapsed)
    }

    pub fn fitness_press(&mut self, token: RunToken) -> Option<MinigameOutcome> {
        let now_ms = self.now_ms();
        self.fitness_input(token, MinigameInput::Press { now_ms })
    }

    pub fn fitness_release(&mut self, token: RunToken) -> Option<MinigameOutcome> {
        let now_ms = self.now_ms();
        self.fitness_input(token, MinigameInput::Release { now_ms })
    }

    pub fn fitness_tick(&mut self, token: RunToken) -> Option<MinigameOutcome> {
        let now_ms = self.now_ms();
        self.fitness_input(token, MinigameInput::Tick { now_ms })
    }

    pub fn cancel_fitness_activity(&mut self) {
        self.fitness.cancel();
    }

    // Internals ------------------------------------------------------------

    fn now_ms(&self) -> u64 {
        u64::try_from(self.clock.now_millis()).unwrap_or(0)
    }

    /// Apply `reward`, then keep committing story rewards until a pass fires
    /// nothing rewarded. Each event fires at most once, so this terminates.
    fn commit(&mut self, reward: StatDelta) {
        let mut pending = Some(reward);
        while let Some(reward) = pending.take() {
            self.apply(&reward);
            pending = self.story_pass();
        }
    }

    fn settle_story(&mut self) {
        if let Some(reward) = self.story_pass() {
            self.commit(reward);
        }
    }

    fn story_pass(&mut self) -> Option<StatDelta> {
        let suppressed = self.state.onboarding.suppresses_story();
        self.state.story.run_pass(&self.state.stats, suppressed)
    }

    fn apply(&mut self, reward: &StatDelta) {
        let modifiers = self.modifiers();
        let outcome = apply_reward(
            &self.state.stats,
            &modifiers,
            reward,
            self.config.xp_per_level,
        );
        if debug_log_enabled() {
            log::debug!(
                "reward {reward:?} applied as {:?} (xp x{}, energy x{})",
                outcome.applied,
                modifiers.xp_gain,
                modifiers.energy_cost_reduction
            );
        }
        if outcome.leveled_up() {
            log::info!(
                "{LOG_LEVEL_UP}: level {} reached (+{} skill points)",
                outcome.stats.level,
                outcome.levels_gained
            );
        }
        self.state.stats = outcome.stats;
        self.state
            .history
            .record(outcome.stats, self.clock.now_millis());
    }
}

fn advance_chain<U, Q>(units: &[U], completed: &Q, journey: &str) -> Vec<U>
where
    U: ChainUnit + PartialEq,
    U::Ref: std::borrow::Borrow<Q>,
    Q: PartialEq + std::fmt::Debug + ?Sized,
{
    let next = complete_unit(units, completed);
    if next.as_slice() != units {
        log::info!("{LOG_CHAIN_ADVANCED}: {journey} chain after {completed:?}");
    }
    next
}
