//! Fade transition state machine for switching between scenes.
//!
//! A transition runs `Idle → FadingOut → Switched → FadingIn → Idle`:
//!
//! 1. **FadingOut**: the overlay ramps to opaque, then holds for a short settle.
//! 2. **Switched**: instantaneous. The caller swaps the scene while the
//!    overlay is fully opaque.
//! 3. **FadingIn**: the overlay ramps back to transparent.
//!
//! Nothing here runs on a timer. The owner calls [`TransitionController::advance`]
//! once per frame with the current time, and each call reports at most one
//! [`TransitionStep`]; callers loop until it returns `None`.

use std::time::Duration;

/// Easing functions for smooth transitions.
///
/// These control the acceleration curve of the overlay fade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Durations for each timed part of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Overlay ramp from transparent to opaque.
    pub fade_out: Duration,
    /// Hold at fully opaque before the scene is swapped.
    pub settle: Duration,
    /// Overlay ramp from opaque back to transparent.
    pub fade_in: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fade_out: Duration::from_millis(350),
            settle: Duration::from_millis(50),
            fade_in: Duration::from_millis(350),
        }
    }
}

impl TransitionTiming {
    /// Time from activation until the transition is idle again.
    pub fn total(&self) -> Duration {
        self.fade_out + self.settle + self.fade_in
    }
}

/// Observable phase of the transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    FadingOut,
    Switched,
    FadingIn,
}

/// Something the owner must act on, reported by [`TransitionController::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStep {
    /// The overlay is opaque: swap to this scene index now.
    Swap(i64),
    /// The overlay is transparent again and new activations are accepted.
    Completed,
}

#[derive(Clone, Copy, Debug)]
enum State {
    Idle,
    FadingOut { target: i64, started: Duration },
    Switched { at: Duration },
    FadingIn { started: Duration },
}

/// Sequences the fade-out / swap / fade-in of a scene change.
///
/// At most one transition is in flight. Requests made while not idle are
/// dropped, not queued.
#[derive(Clone, Debug)]
pub struct TransitionController {
    state: State,
    timing: TransitionTiming,
    easing: Easing,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

impl TransitionController {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            state: State::Idle,
            timing,
            easing: Easing::default(),
        }
    }

    /// Set the easing curve for the overlay opacity.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state {
            State::Idle => TransitionPhase::Idle,
            State::FadingOut { .. } => TransitionPhase::FadingOut,
            State::Switched { .. } => TransitionPhase::Switched,
            State::FadingIn { .. } => TransitionPhase::FadingIn,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Start a transition toward `target` at time `now`.
    ///
    /// Returns `false`, changing nothing, if a transition is already running.
    pub fn request(&mut self, target: i64, now: Duration) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = State::FadingOut {
            target,
            started: now,
        };
        true
    }

    /// Move the state machine forward to `now`.
    ///
    /// Each call performs at most one state change and reports it. Deadlines
    /// are measured from the previous deadline rather than from `now`, so a
    /// late frame does not stretch the sequence.
    pub fn advance(&mut self, now: Duration) -> Option<TransitionStep> {
        match self.state {
            State::Idle => None,
            State::FadingOut { target, started } => {
                let swap_at = started + self.timing.fade_out + self.timing.settle;
                if now < swap_at {
                    return None;
                }
                self.state = State::Switched { at: swap_at };
                Some(TransitionStep::Swap(target))
            }
            State::Switched { at } => {
                self.state = State::FadingIn { started: at };
                // Report completion straight away if the frame is already past it.
                self.advance(now)
            }
            State::FadingIn { started } => {
                if now < started + self.timing.fade_in {
                    return None;
                }
                self.state = State::Idle;
                Some(TransitionStep::Completed)
            }
        }
    }

    /// Drop any in-flight transition without reporting further steps.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Opacity of the full-screen overlay at time `now` (0 = transparent).
    pub fn overlay_alpha(&self, now: Duration) -> f32 {
        match self.state {
            State::Idle => 0.0,
            State::FadingOut { started, .. } => {
                self.easing
                    .apply(progress(now.saturating_sub(started), self.timing.fade_out))
            }
            State::Switched { .. } => 1.0,
            State::FadingIn { started } => {
                1.0 - self
                    .easing
                    .apply(progress(now.saturating_sub(started), self.timing.fade_in))
            }
        }
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
    }

    #[test]
    fn full_sequence() {
        let mut t = TransitionController::default();
        assert!(t.request(1, ms(0)));
        assert_eq!(t.phase(), TransitionPhase::FadingOut);

        assert_eq!(t.advance(ms(349)), None);
        assert_eq!(t.overlay_alpha(ms(350)), 1.0);
        // Settling: still opaque, not swapped yet.
        assert_eq!(t.advance(ms(399)), None);
        assert_eq!(t.phase(), TransitionPhase::FadingOut);

        assert_eq!(t.advance(ms(400)), Some(TransitionStep::Swap(1)));
        assert_eq!(t.phase(), TransitionPhase::Switched);
        assert_eq!(t.overlay_alpha(ms(400)), 1.0);

        assert_eq!(t.advance(ms(400)), None);
        assert_eq!(t.phase(), TransitionPhase::FadingIn);

        assert_eq!(t.advance(ms(749)), None);
        assert_eq!(t.advance(ms(750)), Some(TransitionStep::Completed));
        assert!(t.is_idle());
        assert_eq!(t.overlay_alpha(ms(750)), 0.0);
    }

    #[test]
    fn requests_while_busy_are_dropped() {
        let mut t = TransitionController::default();
        assert!(t.request(1, ms(0)));
        assert!(!t.request(2, ms(100)));
        // Timing was not restarted by the dropped request.
        assert_eq!(t.advance(ms(400)), Some(TransitionStep::Swap(1)));
        assert!(!t.request(2, ms(500)));
    }

    #[test]
    fn late_frame_runs_through_in_order() {
        let mut t = TransitionController::default();
        t.request(3, ms(0));
        assert_eq!(t.advance(ms(2000)), Some(TransitionStep::Swap(3)));
        assert_eq!(t.advance(ms(2000)), Some(TransitionStep::Completed));
        assert_eq!(t.advance(ms(2000)), None);
    }

    #[test]
    fn overlay_ramps_monotonically() {
        let mut t = TransitionController::new(TransitionTiming::default()).easing(Easing::Linear);
        t.request(0, ms(0));
        let a = t.overlay_alpha(ms(100));
        let b = t.overlay_alpha(ms(200));
        assert!(a > 0.0 && a < b && b < 1.0);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut t = TransitionController::default();
        t.request(1, ms(0));
        t.cancel();
        assert!(t.is_idle());
        assert_eq!(t.advance(ms(1000)), None);
    }
}
