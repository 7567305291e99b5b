//! Per-state animation progress.
//!
//! The core never draws anything; it only needs to know which frame of a
//! [`Sequence`] is showing so that attacks land on their impact frame and
//! dying units are removed once their last frame has played.

use serde::{Deserialize, Serialize};

use crate::archetype::Sequence;

/// Default frame length in milliseconds.
pub const FRAME_MS: u32 = 50;

/// Frame clock over one [`Sequence`].
///
/// Looping is implicit: [`AnimationClock::frame`] wraps around the frame
/// count. Frame crossings are tracked per advance so that a large `dt` that
/// skips over a frame still reports it as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClock {
    sequence: Sequence,
    frame_ms: u32,
    elapsed_ms: u32,
    frames_before: u32,
    frames_now: u32,
}

impl AnimationClock {
    /// Start a sequence at frame 0 with the default frame length.
    #[must_use]
    pub const fn new(sequence: Sequence) -> Self {
        Self::with_frame_ms(sequence, FRAME_MS)
    }

    /// Start a sequence at frame 0 with an explicit frame length.
    #[must_use]
    pub const fn with_frame_ms(sequence: Sequence, frame_ms: u32) -> Self {
        Self {
            sequence,
            frame_ms: if frame_ms == 0 { 1 } else { frame_ms },
            elapsed_ms: 0,
            frames_before: 0,
            frames_now: 0,
        }
    }

    /// Sequence being played.
    #[must_use]
    pub const fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Advance by `dt` milliseconds.
    pub fn advance(&mut self, dt: u32) {
        self.frames_before = self.frames_now;
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt);
        self.frames_now = self.elapsed_ms / self.frame_ms;
    }

    /// Frame currently showing.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frames_now % self.sequence.frame_count()
    }

    /// Whether `frame` was entered during the last [`advance`](Self::advance).
    #[must_use]
    pub fn entered_frame(&self, frame: u32) -> bool {
        let count = self.sequence.frame_count();
        if frame >= count {
            return false;
        }
        if self.frames_now - self.frames_before >= count {
            return true;
        }
        (self.frames_before + 1..=self.frames_now).any(|k| k % count == frame)
    }

    /// Whether the last frame has been reached at least once.
    #[must_use]
    pub const fn reached_last_frame(&self) -> bool {
        self.frames_now + 1 >= self.sequence.frame_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_advance_and_wrap() {
        let mut clock = AnimationClock::new(Sequence::Slash);
        assert_eq!(clock.frame(), 0);
        clock.advance(120);
        assert_eq!(clock.frame(), 2);
        clock.advance(200);
        assert_eq!(clock.frame(), 0);
    }

    #[test]
    fn impact_frame_is_entered_once_per_cycle() {
        let mut clock = AnimationClock::new(Sequence::Slash);
        let mut hits = 0;
        for _ in 0..12 {
            clock.advance(50);
            if clock.entered_frame(3) {
                hits += 1;
            }
        }
        // 12 frames of a 6-frame loop
        assert_eq!(hits, 2);
    }

    #[test]
    fn large_step_does_not_skip_frames() {
        let mut clock = AnimationClock::new(Sequence::Shoot);
        clock.advance(500);
        assert!(clock.entered_frame(9));
        assert!(!clock.entered_frame(11));
    }

    #[test]
    fn frame_zero_is_not_entered_at_start() {
        let mut clock = AnimationClock::new(Sequence::Thrust);
        clock.advance(10);
        assert!(!clock.entered_frame(0));
    }

    #[test]
    fn last_frame_detection() {
        let mut clock = AnimationClock::new(Sequence::Dying);
        clock.advance(200);
        assert!(!clock.reached_last_frame());
        clock.advance(50);
        assert!(clock.reached_last_frame());

        assert!(AnimationClock::new(Sequence::Idle).reached_last_frame());
    }

    #[test]
    fn custom_frame_length() {
        let mut clock = AnimationClock::with_frame_ms(Sequence::Walk, 100);
        clock.advance(150);
        assert_eq!(clock.frame(), 1);
    }
}
