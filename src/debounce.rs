//! Debounce and event engine.
//!
//! Turns the noisy per-frame gesture label stream into discrete events: one
//! `Confirmed` per stable hold, plus a separate `HoldConfirmed(Clear)` when a
//! fist is held long enough. Timing uses the real elapsed time of each frame,
//! so behavior does not depend on frame rate.

use std::time::Duration;

use tracing::debug;

use crate::calculator::Command;
use crate::classifier::Gesture;

/// Actions bound to a long hold rather than a quick confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldAction {
    Clear,
}

// ── Events ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// A gesture was held stable past the confirmation threshold.
    Confirmed(Gesture),
    /// A gesture was held past its long-hold threshold.
    HoldConfirmed(HoldAction),
}

impl GestureEvent {
    /// The calculator command this event drives, if any.
    pub fn command(&self) -> Option<Command> {
        match self {
            Self::Confirmed(gesture) => gesture.command(),
            Self::HoldConfirmed(HoldAction::Clear) => Some(Command::Clear),
        }
    }
}

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Stable time before a label is confirmed.
    pub confirm_after: Duration,
    /// Stable fist time before Clear fires.
    pub clear_hold: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            confirm_after: Duration::from_millis(400),
            clear_hold: Duration::from_millis(1000),
        }
    }
}

// ── Engine ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DebounceEngine {
    config: DebounceConfig,
    current: Gesture,
    stable_for: Duration,
    confirmed_this_hold: bool,
    clear_fired_this_hold: bool,
    last_confirmed: Option<Gesture>,
}

impl DebounceEngine {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            current: Gesture::None,
            stable_for: Duration::ZERO,
            confirmed_this_hold: false,
            clear_fired_this_hold: false,
            last_confirmed: None,
        }
    }

    /// Feed one frame's label and the time since the previous frame.
    /// Returns at most one event.
    pub fn update(&mut self, label: Gesture, dt: Duration) -> Option<GestureEvent> {
        if label != self.current {
            self.current = label;
            self.stable_for = Duration::ZERO;
            self.confirmed_this_hold = false;
            self.clear_fired_this_hold = false;
            return None;
        }
        if label == Gesture::None {
            return None;
        }

        self.stable_for += dt;

        if !self.confirmed_this_hold && self.stable_for >= self.config.confirm_after {
            self.confirmed_this_hold = true;
            self.last_confirmed = Some(label);
            debug!(
                "Gesture confirmed: {} after {:?}",
                label.as_str(),
                self.stable_for
            );
            return Some(GestureEvent::Confirmed(label));
        }

        if label == Gesture::Fist
            && self.confirmed_this_hold
            && !self.clear_fired_this_hold
            && self.stable_for >= self.config.clear_hold
        {
            self.clear_fired_this_hold = true;
            debug!("Fist held {:?}: clear", self.stable_for);
            return Some(GestureEvent::HoldConfirmed(HoldAction::Clear));
        }

        None
    }

    /// Progress of the current hold toward its next event, in `0.0..=1.0`.
    pub fn hold_progress(&self) -> f32 {
        if self.current == Gesture::None {
            return 0.0;
        }
        let target = if !self.confirmed_this_hold {
            self.config.confirm_after
        } else if self.current == Gesture::Fist && !self.clear_fired_this_hold {
            self.config.clear_hold
        } else {
            return 1.0;
        };
        if target.is_zero() {
            return 1.0;
        }
        (self.stable_for.as_secs_f32() / target.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Back to idle. Last-confirmed feedback is kept.
    pub fn reset(&mut self) {
        self.current = Gesture::None;
        self.stable_for = Duration::ZERO;
        self.confirmed_this_hold = false;
        self.clear_fired_this_hold = false;
    }

    pub fn current(&self) -> Gesture {
        self.current
    }

    pub fn stable_for(&self) -> Duration {
        self.stable_for
    }

    pub fn last_confirmed(&self) -> Option<Gesture> {
        self.last_confirmed
    }
}

impl Default for DebounceEngine {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_millis(50);

    fn hold(engine: &mut DebounceEngine, label: Gesture, frames: usize) -> Vec<GestureEvent> {
        (0..frames)
            .filter_map(|_| engine.update(label, FRAME))
            .collect()
    }

    #[test]
    fn test_single_confirm_per_hold() {
        let mut engine = DebounceEngine::default();
        // Three seconds of the same label.
        let events = hold(&mut engine, Gesture::Three, 60);
        assert_eq!(events, vec![GestureEvent::Confirmed(Gesture::Three)]);
        assert_eq!(engine.last_confirmed(), Some(Gesture::Three));
    }

    #[test]
    fn test_confirm_timing() {
        let mut engine = DebounceEngine::default();
        // First frame only records the label; 8 more frames reach 400 ms.
        assert!(hold(&mut engine, Gesture::Two, 8).is_empty());
        assert_eq!(
            engine.update(Gesture::Two, FRAME),
            Some(GestureEvent::Confirmed(Gesture::Two))
        );
    }

    #[test]
    fn test_fist_hold_emits_confirm_then_one_clear() {
        let mut engine = DebounceEngine::default();
        let events = hold(&mut engine, Gesture::Fist, 80);
        assert_eq!(
            events,
            vec![
                GestureEvent::Confirmed(Gesture::Fist),
                GestureEvent::HoldConfirmed(HoldAction::Clear),
            ]
        );
    }

    #[test]
    fn test_short_fist_does_not_clear() {
        let mut engine = DebounceEngine::default();
        let events = hold(&mut engine, Gesture::Fist, 15);
        assert_eq!(events, vec![GestureEvent::Confirmed(Gesture::Fist)]);
    }

    #[test]
    fn test_long_frame_splits_events_across_frames() {
        let mut engine = DebounceEngine::default();
        assert_eq!(engine.update(Gesture::Fist, FRAME), None);
        assert_eq!(
            engine.update(Gesture::Fist, Duration::from_millis(1500)),
            Some(GestureEvent::Confirmed(Gesture::Fist))
        );
        assert_eq!(
            engine.update(Gesture::Fist, FRAME),
            Some(GestureEvent::HoldConfirmed(HoldAction::Clear))
        );
    }

    #[test]
    fn test_flicker_never_confirms() {
        let mut engine = DebounceEngine::default();
        for i in 0..400 {
            let label = if i % 2 == 0 { Gesture::Four } else { Gesture::Five };
            assert_eq!(engine.update(label, FRAME), None);
        }
        assert!(engine.last_confirmed().is_none());
    }

    #[test]
    fn test_release_allows_reconfirm() {
        let mut engine = DebounceEngine::default();
        assert_eq!(hold(&mut engine, Gesture::One, 20).len(), 1);
        hold(&mut engine, Gesture::None, 5);
        assert_eq!(hold(&mut engine, Gesture::One, 20).len(), 1);
    }

    #[test]
    fn test_none_never_confirms() {
        let mut engine = DebounceEngine::default();
        assert!(hold(&mut engine, Gesture::None, 100).is_empty());
        assert_eq!(engine.hold_progress(), 0.0);
    }

    #[test]
    fn test_hold_progress() {
        let mut engine = DebounceEngine::default();
        hold(&mut engine, Gesture::Fist, 5);
        assert!((engine.hold_progress() - 0.5).abs() < 1e-3);
        hold(&mut engine, Gesture::Fist, 5);
        // Confirmed at 400 ms, now counting toward the 1 s clear.
        assert!((engine.hold_progress() - 0.45).abs() < 1e-3);
        hold(&mut engine, Gesture::Fist, 20);
        assert_eq!(engine.hold_progress(), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut engine = DebounceEngine::default();
        hold(&mut engine, Gesture::Peace, 10);
        engine.reset();
        assert_eq!(engine.current(), Gesture::None);
        assert_eq!(engine.stable_for(), Duration::ZERO);
        assert_eq!(engine.last_confirmed(), Some(Gesture::Peace));
    }

    #[test]
    fn test_command_mapping() {
        assert_eq!(
            GestureEvent::HoldConfirmed(HoldAction::Clear).command(),
            Some(Command::Clear)
        );
        assert_eq!(
            GestureEvent::Confirmed(Gesture::Three).command(),
            Some(Command::Digit(3))
        );
    }

    proptest! {
        #[test]
        fn prop_alternating_labels_never_confirm(
            ms in 1u64..2000,
            frames in 2usize..300,
        ) {
            let mut engine = DebounceEngine::default();
            let dt = Duration::from_millis(ms);
            for i in 0..frames {
                let label = if i % 2 == 0 { Gesture::Four } else { Gesture::Five };
                prop_assert_eq!(engine.update(label, dt), None);
            }
        }

        #[test]
        fn prop_unbroken_hold_confirms_exactly_once(
            ms in 10u64..200,
            frames in 1usize..400,
        ) {
            let mut engine = DebounceEngine::default();
            let dt = Duration::from_millis(ms);
            let confirms = (0..frames)
                .filter_map(|_| engine.update(Gesture::Five, dt))
                .filter(|e| matches!(e, GestureEvent::Confirmed(_)))
                .count();
            let held = dt * (frames as u32 - 1);
            let expected = usize::from(held >= Duration::from_millis(400));
            prop_assert_eq!(confirms, expected);
        }
    }
}
