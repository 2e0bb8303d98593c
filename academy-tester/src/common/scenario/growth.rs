use academy_engine::{Catalog, DailyActivity, SkillNodeState, StatDelta};
use anyhow::ensure;
use rand::Rng;

use super::TestScenario;
use crate::logic::{SimulationPlan, SimulationSummary, StepCtx};

const SKILL_STEPS: usize = 60;
const STORY_STEPS: usize = 80;
const DISMISS_CHANCE: f64 = 0.5;
const MIN_STORY_EVENTS: usize = 4;

/// Earn some XP, then spend points on one affordable skill.
fn grow_skills(ctx: &mut StepCtx<'_>) {
    let earned = ctx.rng.gen_range(20..=60);
    ctx.session.on_activity_complete(StatDelta::xp(earned));
    ctx.session.close_story_event();

    let available: Vec<String> = ctx
        .session
        .skill_states()
        .into_iter()
        .filter(|(_, state)| *state == SkillNodeState::Available)
        .map(|(skill, _)| skill.id.clone())
        .collect();
    if available.is_empty() {
        return;
    }
    let pick = &available[ctx.rng.gen_range(0..available.len())];
    ctx.session.on_unlock_skill(pick);
}

fn skill_expectation(summary: &SimulationSummary) -> anyhow::Result<()> {
    let total = Catalog::load_from_static()?.skills.len();
    ensure!(
        summary.skills_unlocked.len() == total,
        "unlocked {}/{total} skills: [{}]",
        summary.skills_unlocked.len(),
        summary.skills_unlocked.join(",")
    );
    Ok(())
}

pub fn skill_tree_scenario() -> TestScenario {
    TestScenario::simulation(
        "Skill Tree",
        SimulationPlan::new(SKILL_STEPS, grow_skills).with_expectation(skill_expectation),
    )
}

/// One random daily, dismissing whatever story is showing half of the time.
fn lazy_daily(ctx: &mut StepCtx<'_>) {
    let activity = DailyActivity::ALL[ctx.rng.gen_range(0..DailyActivity::ALL.len())];
    ctx.session.on_daily_activity(activity);
    if ctx.rng.gen_bool(DISMISS_CHANCE) {
        ctx.session.close_story_event();
    }
}

fn story_count_expectation(summary: &SimulationSummary) -> anyhow::Result<()> {
    ensure!(
        summary.story_fired.len() >= MIN_STORY_EVENTS,
        "only {} story events fired: [{}]",
        summary.story_fired.len(),
        summary.story_fired.join(",")
    );
    ensure!(
        summary.story_fired.iter().any(|id| id == "first_steps"),
        "the first XP milestone never fired"
    );
    Ok(())
}

/// Every daily and every rewarded story event appends exactly one snapshot.
fn story_history_expectation(summary: &SimulationSummary) -> anyhow::Result<()> {
    let catalog = Catalog::load_from_static()?;
    let rewarded = catalog
        .story_events
        .iter()
        .filter(|event| event.rewards.is_some() && summary.story_fired.contains(&event.id))
        .count();
    let expected = 1 + summary.steps_run + rewarded;
    ensure!(
        summary.history_len == expected,
        "history holds {} snapshots, expected {expected}",
        summary.history_len
    );
    Ok(())
}

pub fn story_cascade_scenario() -> TestScenario {
    TestScenario::simulation(
        "Story Cascade",
        SimulationPlan::new(STORY_STEPS, lazy_daily)
            .with_expectation(story_count_expectation)
            .with_expectation(story_history_expectation),
    )
}
