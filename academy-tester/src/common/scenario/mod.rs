mod growth;
mod journeys;
mod smoke;

use crate::logic::SimulationPlan;

/// A named simulation plan runnable from the command line.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Keys accepted by `--scenarios`, in the order `all` expands to.
pub const ALL_SCENARIOS: [&str; 7] = [
    "smoke",
    "welcome-gate",
    "coding-path",
    "fitness-path",
    "skill-tree",
    "story-cascade",
    "random-walk",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke::smoke_scenario()),
        "welcome-gate" | "welcome" => Some(smoke::welcome_gate_scenario()),
        "coding-path" | "coding" => Some(journeys::coding_path_scenario()),
        "fitness-path" | "fitness" => Some(journeys::fitness_path_scenario()),
        "skill-tree" | "skills" => Some(growth::skill_tree_scenario()),
        "story-cascade" | "story" => Some(growth::story_cascade_scenario()),
        "random-walk" | "random" => Some(smoke::random_walk_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Daily activities after onboarding; XP and history grow"),
        (
            "welcome-gate",
            "A gifted newcomer idles on the welcome screen; no story fires",
        ),
        (
            "coding-path",
            "Solve every coding lesson in order until the social lesson unlocks",
        ),
        (
            "fitness-path",
            "Play each fitness minigame to success, sometimes failing first",
        ),
        ("skill-tree", "Earn XP and spend points until the tree is full"),
        (
            "story-cascade",
            "Random dailies with lazy dismissals; story events fire once each",
        ),
        ("random-walk", "Random intents with invariant checks on every step"),
    ]
}
