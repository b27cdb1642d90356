//! Pointer, wheel and keyboard input mapped onto the camera orientation.
//!
//! Window events are first translated into [`InputEvent`]s, then
//! [`InputController::apply`] turns each event plus the current orientation
//! into the next orientation. The controller only remembers what it needs
//! for dragging (the captured pointer and where it was last seen).

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::orientation::OrientationState;

/// Degrees of rotation per pixel of pointer drag.
pub const DRAG_SENSITIVITY: f32 = 0.1;
/// Degrees of field of view per scroll unit.
pub const ZOOM_SENSITIVITY: f32 = 0.05;
/// Degrees per arrow-key event.
pub const KEY_STEP: f32 = 1.5;
/// Scroll units reported for one wheel notch when the platform reports lines.
pub const LINE_SCROLL_UNITS: f32 = 100.0;
/// A press and release closer together than this (in pixels of total travel)
/// counts as a click rather than a drag.
pub const CLICK_SLOP: f32 = 4.0;

/// Arrow keys that nudge the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
    Up,
    Down,
}

/// A single input event, independent of the windowing backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary pointer pressed at a position in window pixels.
    Press(Vec2),
    /// Pointer moved to a position in window pixels.
    Move(Vec2),
    /// Primary pointer released.
    Release,
    /// Wheel scrolled. Positive values scroll down and zoom out.
    Scroll(f32),
    /// An arrow key went down (including OS key-repeat).
    Key(ArrowKey),
}

impl InputEvent {
    /// Translate a winit event. `cursor` is the last known pointer position,
    /// needed because winit reports button presses without coordinates.
    pub fn from_window_event(event: &WindowEvent, cursor: Vec2) -> Option<Self> {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(match state {
                ElementState::Pressed => InputEvent::Press(cursor),
                ElementState::Released => InputEvent::Release,
            }),
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::Move(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports wheel-up as positive; scroll units grow downward.
                let units = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_UNITS,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                Some(InputEvent::Scroll(units))
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                let key = match event.physical_key {
                    PhysicalKey::Code(KeyCode::ArrowLeft) => ArrowKey::Left,
                    PhysicalKey::Code(KeyCode::ArrowRight) => ArrowKey::Right,
                    PhysicalKey::Code(KeyCode::ArrowUp) => ArrowKey::Up,
                    PhysicalKey::Code(KeyCode::ArrowDown) => ArrowKey::Down,
                    _ => return None,
                };
                Some(InputEvent::Key(key))
            }
            _ => None,
        }
    }
}

/// What an event did beyond changing the orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputOutcome {
    /// Set when a press/release pair barely moved: a click at this position.
    pub click: Option<Vec2>,
}

/// Converts input events into orientation changes.
#[derive(Clone, Debug, Default)]
pub struct InputController {
    /// Last pointer position seen while captured.
    captured: Option<Vec2>,
    /// Distance travelled since the current capture started.
    travel: f32,
    /// Last pointer position seen at all, for click reporting.
    cursor: Vec2,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the pointer is captured for dragging.
    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    /// Last known pointer position in window pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Stop any drag in progress, e.g. when the window loses focus.
    pub fn release_capture(&mut self) {
        self.captured = None;
    }

    /// Apply one event to `orientation`.
    pub fn apply(&mut self, event: InputEvent, orientation: &mut OrientationState) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        match event {
            InputEvent::Press(position) => {
                self.captured = Some(position);
                self.travel = 0.0;
                self.cursor = position;
            }
            InputEvent::Move(position) => {
                self.cursor = position;
                if let Some(last) = self.captured {
                    let delta = position - last;
                    // Drag right looks left; drag down raises the view.
                    orientation
                        .apply_delta(-delta.x * DRAG_SENSITIVITY, delta.y * DRAG_SENSITIVITY);
                    self.travel += delta.length();
                    self.captured = Some(position);
                }
            }
            InputEvent::Release => {
                if self.captured.take().is_some() && self.travel <= CLICK_SLOP {
                    outcome.click = Some(self.cursor);
                }
            }
            InputEvent::Scroll(units) => {
                orientation.apply_zoom(units * ZOOM_SENSITIVITY);
            }
            InputEvent::Key(key) => match key {
                ArrowKey::Left => orientation.apply_delta(-KEY_STEP, 0.0),
                ArrowKey::Right => orientation.apply_delta(KEY_STEP, 0.0),
                ArrowKey::Up => orientation.apply_delta(0.0, -KEY_STEP),
                ArrowKey::Down => orientation.apply_delta(0.0, KEY_STEP),
            },
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drag_right_decreases_yaw() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();

        input.apply(InputEvent::Press(Vec2::new(100.0, 100.0)), &mut orientation);
        assert!(input.is_dragging());
        input.apply(InputEvent::Move(Vec2::new(200.0, 100.0)), &mut orientation);
        input.apply(InputEvent::Release, &mut orientation);

        assert_relative_eq!(orientation.yaw(), -10.0, epsilon = 1e-5);
        assert_eq!(orientation.pitch(), 0.0);
        assert!(!input.is_dragging());
    }

    #[test]
    fn drag_down_increases_pitch() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        input.apply(InputEvent::Press(Vec2::ZERO), &mut orientation);
        input.apply(InputEvent::Move(Vec2::new(0.0, 50.0)), &mut orientation);
        assert_relative_eq!(orientation.pitch(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn moves_without_capture_are_ignored() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        input.apply(InputEvent::Move(Vec2::new(300.0, 300.0)), &mut orientation);
        assert_eq!(orientation, OrientationState::default());
        assert_eq!(input.cursor(), Vec2::new(300.0, 300.0));
    }

    #[test]
    fn scroll_down_zooms_out() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        input.apply(InputEvent::Scroll(100.0), &mut orientation);
        assert_relative_eq!(orientation.fov(), 80.0, epsilon = 1e-5);
    }

    #[test]
    fn every_key_event_applies_a_step() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        for _ in 0..4 {
            input.apply(InputEvent::Key(ArrowKey::Right), &mut orientation);
        }
        input.apply(InputEvent::Key(ArrowKey::Up), &mut orientation);
        assert_relative_eq!(orientation.yaw(), 6.0, epsilon = 1e-5);
        assert_relative_eq!(orientation.pitch(), -1.5, epsilon = 1e-5);
    }

    #[test]
    fn short_press_is_a_click() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        input.apply(InputEvent::Press(Vec2::new(10.0, 10.0)), &mut orientation);
        input.apply(InputEvent::Move(Vec2::new(12.0, 11.0)), &mut orientation);
        let outcome = input.apply(InputEvent::Release, &mut orientation);
        assert_eq!(outcome.click, Some(Vec2::new(12.0, 11.0)));
    }

    #[test]
    fn long_drag_is_not_a_click() {
        let mut input = InputController::new();
        let mut orientation = OrientationState::default();
        input.apply(InputEvent::Press(Vec2::ZERO), &mut orientation);
        input.apply(InputEvent::Move(Vec2::new(40.0, 0.0)), &mut orientation);
        let outcome = input.apply(InputEvent::Release, &mut orientation);
        assert_eq!(outcome.click, None);
    }
}
