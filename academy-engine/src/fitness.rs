//! Fitness minigames as tick-driven state machines.
//!
//! The presentation layer owns the real timers and forwards ticks. Every run
//! carries a [`RunToken`]; starting a new run or cancelling the current one
//! invalidates older tokens so late callbacks from a torn-down timer cannot
//! act on a superseded activity.
use serde::{Deserialize, Serialize};

use crate::constants::{LOG_FITNESS_STALE_TICK, MILLIS_PER_SECOND};

/// Minigame attached to a fitness activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MinigameConfig {
    /// Reach `target` clicks before the countdown of `duration` seconds ends.
    RapidClick { duration: u32, target: u32 },
    /// Hold continuously for `duration` seconds.
    TimedHold { duration: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameOutcome {
    Success,
    Failure,
}

/// Countdown clicker. One `tick_second` per elapsed second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RapidClick {
    duration_secs: u32,
    target: u32,
    clicks: u32,
    time_left: u32,
    active: bool,
}

impl RapidClick {
    #[must_use]
    pub const fn new(duration_secs: u32, target: u32) -> Self {
        Self {
            duration_secs,
            target,
            clicks: 0,
            time_left: duration_secs,
            active: false,
        }
    }

    pub const fn start(&mut self) {
        self.active = true;
        self.clicks = 0;
        self.time_left = self.duration_secs;
    }

    pub const fn click(&mut self) {
        if self.active {
            self.clicks = self.clicks.saturating_add(1);
        }
    }

    /// Advance the countdown by one second, finishing when it reaches zero.
    pub fn tick_second(&mut self) -> Option<MinigameOutcome> {
        if !self.active {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return None;
        }
        self.active = false;
        Some(if self.clicks >= self.target {
            MinigameOutcome::Success
        } else {
            MinigameOutcome::Failure
        })
    }

    #[must_use]
    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    #[must_use]
    pub const fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Percentage of the click target reached, capped at 100.
    #[must_use]
    pub fn progress_pct(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        (f64::from(self.clicks) / f64::from(self.target) * 100.0).min(100.0)
    }
}

/// Press-and-hold timer driven by millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedHold {
    duration_secs: u32,
    hold_started_ms: Option<u64>,
    last_seen_ms: u64,
}

impl TimedHold {
    #[must_use]
    pub const fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            hold_started_ms: None,
            last_seen_ms: 0,
        }
    }

    const fn duration_ms(&self) -> u64 {
        self.duration_secs as u64 * MILLIS_PER_SECOND
    }

    pub const fn press(&mut self, now_ms: u64) {
        if self.hold_started_ms.is_none() {
            self.hold_started_ms = Some(now_ms);
            self.last_seen_ms = now_ms;
        }
    }

    /// Let go. Releasing before the full duration fails the hold.
    pub fn release(&mut self, now_ms: u64) -> Option<MinigameOutcome> {
        let started = self.hold_started_ms.take()?;
        let held = now_ms.saturating_sub(started);
        Some(if held >= self.duration_ms() {
            MinigameOutcome::Success
        } else {
            MinigameOutcome::Failure
        })
    }

    /// Check the running hold, succeeding once the duration has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Option<MinigameOutcome> {
        let started = self.hold_started_ms?;
        self.last_seen_ms = now_ms;
        if now_ms.saturating_sub(started) >= self.duration_ms() {
            self.hold_started_ms = None;
            return Some(MinigameOutcome::Success);
        }
        None
    }

    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.hold_started_ms.is_some()
    }

    /// Percentage of the hold completed as of the last tick.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_pct(&self) -> f64 {
        let Some(started) = self.hold_started_ms else {
            return 0.0;
        };
        let duration = self.duration_ms();
        if duration == 0 {
            return 100.0;
        }
        let elapsed = self.last_seen_ms.saturating_sub(started);
        (elapsed as f64 / duration as f64 * 100.0).min(100.0)
    }
}

/// Either minigame, built from an activity's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Minigame {
    RapidClick(RapidClick),
    TimedHold(TimedHold),
}

impl Minigame {
    #[must_use]
    pub const fn from_config(config: MinigameConfig) -> Self {
        match config {
            MinigameConfig::RapidClick { duration, target } => {
                Self::RapidClick(RapidClick::new(duration, target))
            }
            MinigameConfig::TimedHold { duration } => Self::TimedHold(TimedHold::new(duration)),
        }
    }
}

/// Identifies one run of one activity's minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunToken(u64);

/// A live minigame bound to the activity that launched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRun {
    pub activity_id: u32,
    pub token: RunToken,
    pub game: Minigame,
}

/// Input forwarded from presentation timers and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinigameInput {
    Click,
    SecondElapsed,
    Press { now_ms: u64 },
    Release { now_ms: u64 },
    Tick { now_ms: u64 },
}

/// Owns at most one active run and hands out fresh tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitnessRunner {
    generation: u64,
    active: Option<ActivityRun>,
}

impl FitnessRunner {
    /// Begin a run, superseding any run already in progress.
    pub fn start(&mut self, activity_id: u32, config: MinigameConfig) -> RunToken {
        self.generation = self.generation.wrapping_add(1);
        let token = RunToken(self.generation);
        let mut game = Minigame::from_config(config);
        if let Minigame::RapidClick(clicker) = &mut game {
            clicker.start();
        }
        self.active = Some(ActivityRun {
            activity_id,
            token,
            game,
        });
        token
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub const fn active(&self) -> Option<&ActivityRun> {
        self.active.as_ref()
    }

    /// Route an input to the run owning `token`.
    ///
    /// Stale tokens are ignored. A finished run is cleared and its outcome
    /// returned together with the activity id.
    pub fn handle(&mut self, token: RunToken, input: MinigameInput) -> Option<(u32, MinigameOutcome)> {
        let Some(run) = self.active.as_mut().filter(|run| run.token == token) else {
            log::debug!("{LOG_FITNESS_STALE_TICK}: {token:?} ignored");
            return None;
        };
        let outcome = match (&mut run.game, input) {
            (Minigame::RapidClick(clicker), MinigameInput::Click) => {
                clicker.click();
                None
            }
            (Minigame::RapidClick(clicker), MinigameInput::SecondElapsed) => clicker.tick_second(),
            (Minigame::TimedHold(hold), MinigameInput::Press { now_ms }) => {
                hold.press(now_ms);
                None
            }
            (Minigame::TimedHold(hold), MinigameInput::Release { now_ms }) => hold.release(now_ms),
            (Minigame::TimedHold(hold), MinigameInput::Tick { now_ms }) => hold.tick(now_ms),
            _ => None,
        }?;
        let activity_id = run.activity_id;
        self.active = None;
        Some((activity_id, outcome))
    }
}
