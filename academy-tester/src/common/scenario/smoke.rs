use academy_engine::{DailyActivity, PlayerStats, StatDelta};
use anyhow::ensure;
use rand::Rng;

use super::TestScenario;
use crate::logic::{SimulationPlan, SimulationSummary, StepCtx};

const SMOKE_STEPS: usize = 12;
const RANDOM_WALK_STEPS: usize = 300;

fn daily_step(ctx: &mut StepCtx<'_>) {
    let activity = DailyActivity::ALL[ctx.rng.gen_range(0..DailyActivity::ALL.len())];
    ctx.session.on_daily_activity(activity);
    if ctx.session.active_story_event().is_some() {
        ctx.session.close_story_event();
    }
}

fn smoke_expectation(summary: &SimulationSummary) -> anyhow::Result<()> {
    ensure!(
        summary.final_stats.xp >= 60,
        "expected at least 60 XP after {} dailies, got {}",
        summary.steps_run,
        summary.final_stats.xp
    );
    ensure!(
        summary.history_len > summary.steps_run,
        "history recorded {} snapshots for {} steps",
        summary.history_len,
        summary.steps_run
    );
    Ok(())
}

pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke",
        SimulationPlan::new(SMOKE_STEPS, daily_step).with_expectation(smoke_expectation),
    )
}

fn welcome_expectation(summary: &SimulationSummary) -> anyhow::Result<()> {
    ensure!(
        summary.story_fired.is_empty(),
        "story fired behind the welcome screen: [{}]",
        summary.story_fired.join(",")
    );
    ensure!(
        summary.history_len == summary.steps_run + 1,
        "expected one snapshot per daily, got {}",
        summary.history_len
    );
    Ok(())
}

/// Starts past every single-stat story threshold without dismissing the welcome screen.
pub fn welcome_gate_scenario() -> TestScenario {
    let gifted = PlayerStats {
        intellect: 90,
        health: 130,
        social: 80,
        ..PlayerStats::default()
    };
    TestScenario::simulation(
        "Welcome Gate",
        SimulationPlan::new(SMOKE_STEPS, daily_step)
            .with_initial_stats(gifted)
            .staying_on_welcome()
            .with_expectation(welcome_expectation),
    )
}

fn random_delta(ctx: &mut StepCtx<'_>) -> StatDelta {
    let mut delta = StatDelta::xp(ctx.rng.gen_range(-10..=50));
    if ctx.rng.gen_bool(0.5) {
        delta = delta.with_energy(ctx.rng.gen_range(-40..=25));
    }
    if ctx.rng.gen_bool(0.3) {
        delta = delta.with_intellect(ctx.rng.gen_range(-10..=20));
    }
    if ctx.rng.gen_bool(0.3) {
        delta = delta.with_health(ctx.rng.gen_range(-25..=15));
    }
    if ctx.rng.gen_bool(0.3) {
        delta = delta.with_social(ctx.rng.gen_range(-10..=15));
    }
    delta
}

fn random_intent(ctx: &mut StepCtx<'_>) {
    match ctx.rng.gen_range(0..7) {
        0 => {
            let delta = random_delta(ctx);
            ctx.session.on_activity_complete(delta);
        }
        1 => daily_step(ctx),
        2 => {
            let index = ctx.rng.gen_range(0..ctx.session.challenges().len().max(1));
            if let Some(challenge) = ctx.session.challenges().get(index).cloned() {
                ctx.session.on_challenge_complete(&challenge);
            }
        }
        3 => {
            let id = ctx.rng.gen_range(0..=6);
            ctx.session.on_fitness_activity_complete(id);
        }
        4 => {
            let index = ctx.rng.gen_range(0..ctx.session.skill_tree().len().max(1));
            let id = ctx.session.skill_tree().iter().nth(index).map(|s| s.id.clone());
            if let Some(id) = id {
                ctx.session.on_unlock_skill(&id);
            }
        }
        5 => ctx.session.close_story_event(),
        _ => {
            let id = ctx.rng.gen_range(1..=5);
            if let Some(token) = ctx.session.start_fitness_activity(id) {
                ctx.session.fitness_press(token);
                ctx.clock.advance(ctx.rng.gen_range(0..20_000));
                ctx.session.fitness_release(token);
                for _ in 0..ctx.rng.gen_range(0..40) {
                    ctx.session.fitness_click(token);
                }
                ctx.session.fitness_second_elapsed(token);
                ctx.session.cancel_fitness_activity();
            }
        }
    }
}

fn history_kept(summary: &SimulationSummary) -> anyhow::Result<()> {
    ensure!(summary.history_len > 1, "no snapshot was ever recorded");
    Ok(())
}

pub fn random_walk_scenario() -> TestScenario {
    TestScenario::simulation(
        "Random Walk",
        SimulationPlan::new(RANDOM_WALK_STEPS, random_intent).with_expectation(history_kept),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;

    #[test]
    fn smoke_passes_for_several_seeds() {
        let scenario = smoke_scenario();
        let tester = GameTester::try_new(false).unwrap();
        for seed in [1, 2, 1337] {
            let summary = tester.run_plan(&scenario.plan, seed);
            assert!(summary.violations.is_empty(), "{:?}", summary.violations);
            smoke_expectation(&summary).unwrap();
        }
    }

    #[test]
    fn welcome_gate_holds_every_story_back() {
        let scenario = welcome_gate_scenario();
        let summary = GameTester::try_new(false).unwrap().run_plan(&scenario.plan, 4);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        welcome_expectation(&summary).unwrap();
    }

    #[test]
    fn random_walk_stays_clean() {
        let scenario = random_walk_scenario();
        let summary = GameTester::try_new(false).unwrap().run_plan(&scenario.plan, 0xACAD);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }
}
