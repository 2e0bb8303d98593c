//! Linked unlock chains for lessons and fitness activities.
//!
//! Each unit names the unit that precedes it. Completing a unit marks it
//! complete and promotes every locked unit that names it as predecessor to
//! `current`. The resolver is two independent linear scans, so it tolerates
//! malformed chains instead of rejecting them; [`validate_chain`] reports
//! such issues separately at load time.
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

use crate::fitness::MinigameConfig;
use crate::stats::StatDelta;

/// Lifecycle of a unit: `locked -> current -> complete`, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Locked,
    Current,
    Complete,
}

impl UnitStatus {
    /// Rank used to keep transitions forward-only.
    const fn rank(self) -> u8 {
        match self {
            Self::Locked => 0,
            Self::Current => 1,
            Self::Complete => 2,
        }
    }

    #[must_use]
    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Current | Self::Complete)
    }
}

/// A unit that participates in a progression chain.
pub trait ChainUnit: Clone {
    /// Reference type other units use to name this one as predecessor.
    type Ref: Eq + Hash + Debug;

    /// The reference that completing this unit broadcasts.
    fn completion_ref(&self) -> &Self::Ref;

    /// The reference whose completion promotes this unit, if any.
    fn predecessor_ref(&self) -> Option<&Self::Ref>;

    fn status(&self) -> UnitStatus;

    fn set_status(&mut self, status: UnitStatus);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Coding,
    Social,
    Milestone,
    Project,
}

/// A node on the coding journey. Completing its challenge unlocks the next lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: UnitStatus,
    pub kind: LessonKind,
    pub description: String,
    pub challenge_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_on_challenge_id: Option<String>,
}

impl ChainUnit for Lesson {
    type Ref = String;

    fn completion_ref(&self) -> &String {
        &self.challenge_id
    }

    fn predecessor_ref(&self) -> Option<&String> {
        self.unlocks_on_challenge_id.as_ref()
    }

    fn status(&self) -> UnitStatus {
        self.status
    }

    fn set_status(&mut self, status: UnitStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessKind {
    Cardio,
    Strength,
    Flexibility,
}

/// A node on the fitness journey, carrying its own reward and minigame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessActivity {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: UnitStatus,
    pub kind: FitnessKind,
    pub description: String,
    #[serde(default)]
    pub reward: StatDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_on_activity_id: Option<u32>,
    pub challenge: MinigameConfig,
}

impl ChainUnit for FitnessActivity {
    type Ref = u32;

    fn completion_ref(&self) -> &u32 {
        &self.id
    }

    fn predecessor_ref(&self) -> Option<&u32> {
        self.unlocks_on_activity_id.as_ref()
    }

    fn status(&self) -> UnitStatus {
        self.status
    }

    fn set_status(&mut self, status: UnitStatus) {
        self.status = status;
    }
}

/// Mark every unit matching `completed` as complete and promote its locked
/// successors to current.
///
/// Returns the collection unchanged when no unit carries `completed` as its
/// completion reference. Statuses only ever move forward, so re-completing
/// a unit cannot revert or re-unlock a successor.
#[must_use]
pub fn complete_unit<U, Q>(units: &[U], completed: &Q) -> Vec<U>
where
    U: ChainUnit,
    U::Ref: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    let found = units
        .iter()
        .any(|unit| ref_matches(unit.completion_ref(), completed));
    if !found {
        return units.to_vec();
    }

    let mut next = units.to_vec();
    for unit in &mut next {
        if ref_matches(unit.completion_ref(), completed) {
            advance(unit, UnitStatus::Complete);
        }
    }
    for unit in &mut next {
        if unit
            .predecessor_ref()
            .is_some_and(|prev| ref_matches(prev, completed))
        {
            advance(unit, UnitStatus::Current);
        }
    }
    next
}

fn ref_matches<R, Q>(reference: &R, target: &Q) -> bool
where
    R: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    Borrow::<Q>::borrow(reference) == target
}

fn advance<U: ChainUnit>(unit: &mut U, target: UnitStatus) {
    if target.rank() > unit.status().rank() {
        unit.set_status(target);
    }
}

/// First unit currently open for play.
#[must_use]
pub fn current_unit<U: ChainUnit>(units: &[U]) -> Option<&U> {
    units
        .iter()
        .find(|unit| unit.status() == UnitStatus::Current)
}

/// `(completed, total)` for journey-map progress bars.
#[must_use]
pub fn progress<U: ChainUnit>(units: &[U]) -> (usize, usize) {
    let done = units
        .iter()
        .filter(|unit| unit.status() == UnitStatus::Complete)
        .count();
    (done, units.len())
}

/// Structural problems detected in a chain definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainIssue {
    #[error("chain has no head unit (no unit without a predecessor)")]
    MissingHead,
    #[error("chain has {count} units marked current (expected at most one)")]
    MultipleCurrent { count: usize },
    #[error("completion reference {reference} is used by {count} units")]
    DuplicateRef { reference: String, count: usize },
    #[error("unit {reference} names unknown predecessor {predecessor}")]
    DanglingPredecessor {
        reference: String,
        predecessor: String,
    },
    #[error("predecessor {predecessor} unlocks {count} units")]
    SharedPredecessor { predecessor: String, count: usize },
}

/// Report structural issues in a chain without changing it.
#[must_use]
pub fn validate_chain<U: ChainUnit>(units: &[U]) -> Vec<ChainIssue> {
    let mut issues = Vec::new();
    if units.is_empty() {
        return issues;
    }

    if units.iter().all(|unit| unit.predecessor_ref().is_some()) {
        issues.push(ChainIssue::MissingHead);
    }

    let current = units
        .iter()
        .filter(|unit| unit.status() == UnitStatus::Current)
        .count();
    if current > 1 {
        issues.push(ChainIssue::MultipleCurrent { count: current });
    }

    let mut refs: HashMap<&U::Ref, usize> = HashMap::new();
    for unit in units {
        *refs.entry(unit.completion_ref()).or_default() += 1;
    }
    let mut successors: HashMap<&U::Ref, usize> = HashMap::new();
    for unit in units {
        if let Some(prev) = unit.predecessor_ref() {
            *successors.entry(prev).or_default() += 1;
            if !refs.contains_key(prev) {
                issues.push(ChainIssue::DanglingPredecessor {
                    reference: format!("{:?}", unit.completion_ref()),
                    predecessor: format!("{prev:?}"),
                });
            }
        }
    }

    let mut duplicates: Vec<_> = refs.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicates.sort_by_key(|(reference, _)| format!("{reference:?}"));
    issues.extend(
        duplicates
            .into_iter()
            .map(|(reference, count)| ChainIssue::DuplicateRef {
                reference: format!("{reference:?}"),
                count,
            }),
    );

    let mut shared: Vec<_> = successors
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();
    shared.sort_by_key(|(predecessor, _)| format!("{predecessor:?}"));
    issues.extend(
        shared
            .into_iter()
            .map(|(predecessor, count)| ChainIssue::SharedPredecessor {
                predecessor: format!("{predecessor:?}"),
                count,
            }),
    );

    issues
}
