//! Welcome gate and tutorial overlay progression.
use serde::{Deserialize, Serialize};

use crate::constants::TUTORIAL_STEPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Onboarding {
    welcome: bool,
    tutorial_active: bool,
    tutorial_step: u8,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self {
            welcome: true,
            tutorial_active: true,
            tutorial_step: 0,
        }
    }
}

impl Onboarding {
    /// Onboarding already finished, for resumed or scripted sessions.
    #[must_use]
    pub const fn finished() -> Self {
        Self {
            welcome: false,
            tutorial_active: false,
            tutorial_step: 0,
        }
    }

    /// Story evaluation is held back while the welcome screen is showing.
    #[must_use]
    pub const fn suppresses_story(&self) -> bool {
        self.welcome
    }

    #[must_use]
    pub const fn on_welcome(&self) -> bool {
        self.welcome
    }

    /// Leave the welcome screen. Returns true if it was showing.
    pub const fn begin(&mut self) -> bool {
        let was_showing = self.welcome;
        self.welcome = false;
        was_showing
    }

    /// Advance the overlay; moving past the last step ends the tutorial.
    pub const fn next_step(&mut self) {
        if !self.tutorial_active {
            return;
        }
        if self.tutorial_step + 1 >= TUTORIAL_STEPS {
            self.complete();
        } else {
            self.tutorial_step += 1;
        }
    }

    pub const fn complete(&mut self) {
        self.tutorial_active = false;
        self.tutorial_step = 0;
    }

    #[must_use]
    pub const fn tutorial_step(&self) -> Option<u8> {
        if self.tutorial_active {
            Some(self.tutorial_step)
        } else {
            None
        }
    }

    /// The assistant character only appears after the tutorial.
    #[must_use]
    pub const fn assistant_available(&self) -> bool {
        !self.tutorial_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_suppresses_until_begin() {
        let mut onboarding = Onboarding::default();
        assert!(onboarding.suppresses_story());
        assert!(onboarding.begin());
        assert!(!onboarding.suppresses_story());
        assert!(!onboarding.begin());
    }

    #[test]
    fn tutorial_walks_four_steps_then_ends() {
        let mut onboarding = Onboarding::default();
        assert_eq!(onboarding.tutorial_step(), Some(0));
        onboarding.next_step();
        onboarding.next_step();
        onboarding.next_step();
        assert_eq!(onboarding.tutorial_step(), Some(3));
        assert!(!onboarding.assistant_available());
        onboarding.next_step();
        assert_eq!(onboarding.tutorial_step(), None);
        assert!(onboarding.assistant_available());
    }

    #[test]
    fn finished_onboarding_is_quiet() {
        let onboarding = Onboarding::finished();
        assert!(!onboarding.on_welcome());
        assert!(onboarding.assistant_available());
    }
}
