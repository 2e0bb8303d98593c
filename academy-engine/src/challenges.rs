//! Coding challenge content and the daily pursuits on the home hub.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DAILY_RELAX_ENERGY, DAILY_RELAX_SOCIAL, DAILY_STUDY_ENERGY, DAILY_STUDY_INTELLECT,
    DAILY_TRAIN_ENERGY, DAILY_TRAIN_HEALTH, DAILY_XP,
};
use crate::stats::StatDelta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Javascript,
    Python,
    Java,
    Algo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One input/expected pair for a code challenge. Values are opaque JSON
/// handed to the external grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Vec<serde_json::Value>,
    pub expected: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shape-specific part of a challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChallengeKind {
    Mcq {
        options: Vec<String>,
        correct_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Code {
        starter_code: String,
        function_name: String,
        #[serde(default)]
        test_cases: Vec<TestCase>,
    },
}

/// A challenge contained in a lesson. Its `id` is the lesson's completion ref.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingChallenge {
    pub id: String,
    pub title: String,
    pub language: Language,
    pub difficulty: Difficulty,
    pub question: String,
    #[serde(default)]
    pub reward: StatDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_step: Option<String>,
    #[serde(flatten)]
    pub kind: ChallengeKind,
}

impl CodingChallenge {
    /// Grade a multiple-choice answer. Code challenges are graded
    /// externally, so this is always false for them.
    #[must_use]
    pub fn check_answer(&self, selected: usize) -> bool {
        match &self.kind {
            ChallengeKind::Mcq { correct_index, .. } => *correct_index == selected,
            ChallengeKind::Code { .. } => false,
        }
    }

    #[must_use]
    pub const fn is_mcq(&self) -> bool {
        matches!(self.kind, ChallengeKind::Mcq { .. })
    }
}

/// Challenges for one language, in catalog order.
#[must_use]
pub fn challenges_by_language(
    challenges: &[CodingChallenge],
    language: Language,
) -> Vec<&CodingChallenge> {
    challenges
        .iter()
        .filter(|challenge| challenge.language == language)
        .collect()
}

/// The three repeatable pursuits offered on the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyActivity {
    Study,
    Train,
    Relax,
}

impl DailyActivity {
    pub const ALL: [Self; 3] = [Self::Study, Self::Train, Self::Relax];

    #[must_use]
    pub const fn reward(self) -> StatDelta {
        let base = StatDelta::xp(DAILY_XP);
        match self {
            Self::Study => base
                .with_intellect(DAILY_STUDY_INTELLECT)
                .with_energy(DAILY_STUDY_ENERGY),
            Self::Train => base
                .with_health(DAILY_TRAIN_HEALTH)
                .with_energy(DAILY_TRAIN_ENERGY),
            Self::Relax => base
                .with_social(DAILY_RELAX_SOCIAL)
                .with_energy(DAILY_RELAX_ENERGY),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Study => "Study Session",
            Self::Train => "Gym Workout",
            Self::Relax => "Cafe Hangout",
        }
    }
}
