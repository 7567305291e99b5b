//! Millisecond countdowns for cooldowns and effect lifetimes.

use serde::{Deserialize, Serialize};

/// Countdown over a fixed period.
///
/// A freshly constructed countdown is already finished, which is what a
/// cooldown wants (usables start ready). Call [`Countdown::restart`] to run
/// it, or use [`Countdown::started`].
///
/// ```
/// use skirmish_core::timer::Countdown;
///
/// let mut cooldown = Countdown::new(1000);
/// assert!(cooldown.is_finished());
///
/// cooldown.restart();
/// cooldown.tick(400);
/// assert_eq!(cooldown.remaining_ms(), 600);
/// cooldown.tick(700);
/// assert!(cooldown.is_finished());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    period_ms: u32,
    remaining_ms: u32,
}

impl Countdown {
    /// Create a finished countdown with the given period.
    #[must_use]
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            remaining_ms: 0,
        }
    }

    /// Create a countdown that is already running.
    #[must_use]
    pub const fn started(period_ms: u32) -> Self {
        Self {
            period_ms,
            remaining_ms: period_ms,
        }
    }

    /// Period in milliseconds.
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Milliseconds left before the countdown finishes.
    #[must_use]
    pub const fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Start again from the full period.
    pub fn restart(&mut self) {
        self.remaining_ms = self.period_ms;
    }

    /// Advance by `dt` milliseconds.
    pub fn tick(&mut self, dt: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(dt);
    }

    /// True once no time remains. A zero period is always finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Fraction of the period that has elapsed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.period_ms == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let remaining = self.remaining_ms as f32 / self.period_ms as f32;
        1.0 - remaining
    }
}
