use std::sync::Arc;

use academy_engine::{
    AcademySession, BUNDLED_CATALOG_JSON, Catalog, ManualClock, Onboarding, PlayerStats, ProgressionConfig,
};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::logic::invariants::InvariantMonitor;

/// Clock reading every simulated session starts from (2024-01-01T00:00:00Z).
const SIMULATION_EPOCH_MS: i64 = 1_704_067_200_000;

pub type SimSession = AcademySession<ManualClock>;

/// Immutable content shared by every simulated session.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    catalog: Catalog,
    config: ProgressionConfig,
}

impl TesterAssets {
    /// Bundled catalog with default progression settings.
    pub fn load_default() -> Result<Self> {
        Self::from_catalog_json(BUNDLED_CATALOG_JSON)
    }

    pub fn from_catalog_json(json: &str) -> Result<Self> {
        let catalog = Catalog::from_json(json).context("failed to load catalog")?;
        Ok(Self::new(catalog, ProgressionConfig::default()))
    }

    pub const fn new(catalog: Catalog, config: ProgressionConfig) -> Self {
        Self { catalog, config }
    }
}

/// Inputs available to a plan step.
pub struct StepCtx<'a> {
    pub session: &'a mut SimSession,
    pub clock: &'a ManualClock,
    pub rng: &'a mut ChaCha8Rng,
}

pub type PlanStep = fn(&mut StepCtx<'_>);

/// Declarative plan for driving a session through intents.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub steps: usize,
    pub initial_stats: Option<PlayerStats>,
    pub skip_onboarding: bool,
    pub step: PlanStep,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(steps: usize, step: PlanStep) -> Self {
        Self {
            steps,
            initial_stats: None,
            skip_onboarding: true,
            step,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_initial_stats(mut self, stats: PlayerStats) -> Self {
        self.initial_stats = Some(stats);
        self
    }

    /// Keep the welcome screen up so story evaluation stays suppressed.
    #[must_use]
    pub const fn staying_on_welcome(mut self) -> Self {
        self.skip_onboarding = false;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub steps_run: usize,
    pub final_stats: PlayerStats,
    pub history_len: usize,
    pub lessons_completed: usize,
    pub lessons_total: usize,
    pub current_lesson: Option<String>,
    pub fitness_completed: usize,
    pub fitness_total: usize,
    pub skills_unlocked: Vec<String>,
    pub story_fired: Vec<String>,
    pub violations: Vec<String>,
}

/// Headless deterministic runner for academy sessions.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub fn try_new(verbose: bool) -> Result<Self> {
        Ok(Self::new(Arc::new(TesterAssets::load_default()?), verbose))
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    fn new_session(&self, plan: &SimulationPlan, clock: &ManualClock) -> SimSession {
        let config = ProgressionConfig {
            initial_stats: plan.initial_stats.unwrap_or(self.assets.config.initial_stats),
            ..self.assets.config.clone()
        };
        let session =
            AcademySession::with_clock(self.assets.catalog.clone(), config, clock.clone());
        if plan.skip_onboarding {
            session.with_onboarding(Onboarding::finished())
        } else {
            session
        }
    }

    /// Run `plan` from a fresh session seeded with `seed`, checking
    /// invariants after every step.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let clock = ManualClock::starting_at(SIMULATION_EPOCH_MS);
        let mut session = self.new_session(plan, &clock);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut monitor = InvariantMonitor::observe(&session);
        let mut violations = Vec::new();

        for index in 0..plan.steps {
            let mut ctx = StepCtx {
                session: &mut session,
                clock: &clock,
                rng: &mut rng,
            };
            (plan.step)(&mut ctx);
            for violation in monitor.check(&session) {
                if self.verbose {
                    println!("  ⚠️ step {}: {violation}", index + 1);
                }
                violations.push(format!("step {}: {violation}", index + 1));
            }
        }

        summarize(&session, seed, plan.steps, violations)
    }
}

fn summarize(
    session: &SimSession,
    seed: u64,
    steps_run: usize,
    violations: Vec<String>,
) -> SimulationSummary {
    let (lessons_completed, lessons_total) = session.lesson_progress();
    let (fitness_completed, fitness_total) = session.fitness_progress();
    SimulationSummary {
        seed,
        steps_run,
        final_stats: *session.stats(),
        history_len: session.history().len(),
        lessons_completed,
        lessons_total,
        current_lesson: session.current_lesson().map(|lesson| lesson.name.clone()),
        fitness_completed,
        fitness_total,
        skills_unlocked: session
            .unlocked_skills()
            .iter()
            .map(str::to_string)
            .collect(),
        story_fired: session
            .story()
            .events()
            .iter()
            .filter(|event| event.is_triggered)
            .map(|event| event.id.clone())
            .collect(),
        violations,
    }
}
