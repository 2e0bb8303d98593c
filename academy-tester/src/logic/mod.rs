pub mod game_tester;
pub mod invariants;
pub mod reports;
pub mod tester;

pub use game_tester::{GameTester, SimulationPlan, SimulationSummary, StepCtx};
pub use tester::*;
