use academy_engine::{PlayerStats, StatKey};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

const REPORTED_STATS: [StatKey; 4] = [
    StatKey::Xp,
    StatKey::Level,
    StatKey::Energy,
    StatKey::Intellect,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: GameTester,
}

impl LogicTester {
    pub const fn new(tester: GameTester) -> Self {
        Self { tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.tester.verbose() {
                println!(
                    "🧪 Testing scenario: {} (steps: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.steps,
                    seed
                );
            }

            let result = self.run_single_scenario(scenario, seed, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: avg_duration,
            performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = self.tester.run_plan(plan, iteration_seed);

            if let Some(err) = evaluate_expectations(plan, &summary) {
                failures.push(format!(
                    "Iteration {} (seed {}, steps {}): {} | {} | final {}",
                    i + 1,
                    summary.seed,
                    summary.steps_run,
                    err,
                    summarize_progress(&summary),
                    summarize_stats(&summary.final_stats)
                ));

                if self.tester.verbose() {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if self.tester.verbose() {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) level:{} lessons:{}/{} story:{}",
                        i + 1,
                        iterations,
                        summary.final_stats.level,
                        summary.lessons_completed,
                        summary.lessons_total,
                        summary.story_fired.len()
                    );
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(first) = summary.violations.first() {
        return Some(format!(
            "invariant violated ({} total): {first}",
            summary.violations.len()
        ));
    }
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn summarize_progress(summary: &SimulationSummary) -> String {
    format!(
        "lessons {}/{} fitness {}/{} skills [{}] story [{}]",
        summary.lessons_completed,
        summary.lessons_total,
        summary.fitness_completed,
        summary.fitness_total,
        summary.skills_unlocked.join(","),
        summary.story_fired.join(",")
    )
}

fn summarize_stats(stats: &PlayerStats) -> String {
    REPORTED_STATS
        .iter()
        .map(|key| format!("{} {}", key.label(), stats.get(*key)))
        .collect::<Vec<_>>()
        .join(" ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::game_tester::StepCtx;
    use academy_engine::DailyActivity;

    fn relax(ctx: &mut StepCtx<'_>) {
        ctx.session.on_daily_activity(DailyActivity::Relax);
    }

    fn greedy(summary: &SimulationSummary) -> anyhow::Result<()> {
        anyhow::ensure!(summary.final_stats.xp > 1_000, "not enough xp");
        Ok(())
    }

    #[test]
    fn failing_expectation_is_reported_per_iteration() {
        let plan = SimulationPlan::new(2, relax).with_expectation(greedy);
        let scenario = TestScenario::simulation("Too Greedy", plan);
        let tester = LogicTester::new(GameTester::try_new(false).unwrap());
        let results = tester.run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.passed));
        assert_eq!(results[0].failures.len(), 3);
        assert!(results[0].failures[0].contains("not enough xp"));
        assert!(results[0].failures[0].contains("final XP 10 Level 1 Energy 90 Intellect 50"));
    }

    #[test]
    fn passing_scenario_records_durations() {
        let scenario = TestScenario::simulation("Relax", SimulationPlan::new(3, relax));
        let tester = LogicTester::new(GameTester::try_new(false).unwrap());
        let results = tester.run_scenario(&scenario, &[9], 2);
        assert!(results[0].passed);
        assert_eq!(results[0].successful_iterations, 2);
        assert_eq!(results[0].performance_data.len(), 2);
        let json = serde_json::to_string(&results[0]).unwrap();
        assert!(json.contains("\"average_duration\""));
    }
}
