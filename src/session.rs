//! One viewer session: scene graph, orientation, input and transitions.
//!
//! [`PanoramaSession`] owns every piece of mutable viewer state and is driven
//! from a single thread by three kinds of calls:
//!
//! - [`handle_input`](PanoramaSession::handle_input) for each window event
//! - [`advance`](PanoramaSession::advance) once per frame to run transition deadlines
//! - [`frame`](PanoramaSession::frame) once per frame to orient the camera
//!   and place hotspots
//!
//! The session knows nothing about the GPU. When `advance` swaps scenes it
//! returns the new index so the renderer can replace its resources.

use std::time::Duration;

use glam::Vec2;

use crate::camera::Camera;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::frame::{FrameOutput, tick};
use crate::input::{InputController, InputEvent};
use crate::orientation::{OrientationState, ViewAngles};
use crate::projector::{HotspotPlacement, MARKER_RADIUS, hit_test};
use crate::scene::{Scene, SceneGraph, TransitionController, TransitionPhase, TransitionStep};

/// Snapshot of the externally visible viewer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerState {
    pub current_scene_index: usize,
    pub is_dragging: bool,
    pub transition_phase: TransitionPhase,
}

/// State for a single panorama viewing session.
pub struct PanoramaSession {
    graph: SceneGraph,
    orientation: OrientationState,
    input: InputController,
    transitions: TransitionController,
    camera: Camera,
    placements: Vec<HotspotPlacement>,
    on_scene_change: Option<Box<dyn FnMut(usize)>>,
    torn_down: bool,
}

impl PanoramaSession {
    /// Start a session on `graph`'s current scene.
    pub fn new(graph: SceneGraph, transitions: TransitionController) -> Self {
        let mut orientation = OrientationState::default();
        apply_initial_view(&mut orientation, graph.current_scene());

        Self {
            graph,
            orientation,
            input: InputController::new(),
            transitions,
            camera: Camera::new(),
            placements: Vec::new(),
            on_scene_change: None,
            torn_down: false,
        }
    }

    /// Start a session from a loaded configuration.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        let graph = config.into_scene_graph()?;
        Ok(Self::new(graph, TransitionController::default()))
    }

    /// Register a callback fired with the new index after each scene swap.
    pub fn on_scene_change<F: FnMut(usize) + 'static>(&mut self, callback: F) {
        self.on_scene_change = Some(Box::new(callback));
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn current_scene(&self) -> &Scene {
        self.graph.current_scene()
    }

    pub fn orientation(&self) -> &OrientationState {
        &self.orientation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Hotspot placements computed by the last [`frame`](Self::frame).
    pub fn placements(&self) -> &[HotspotPlacement] {
        &self.placements
    }

    pub fn viewer_state(&self) -> ViewerState {
        ViewerState {
            current_scene_index: self.graph.current_index(),
            is_dragging: self.input.is_dragging(),
            transition_phase: self.transitions.phase(),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Recompute the camera's aspect ratio and viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Apply one input event. A click on a visible hotspot activates it.
    ///
    /// Returns `true` if the event started a transition.
    pub fn handle_input(&mut self, event: InputEvent, now: Duration) -> bool {
        if self.torn_down {
            return false;
        }
        let outcome = self.input.apply(event, &mut self.orientation);
        match outcome.click {
            Some(point) => self.click(point, now),
            None => false,
        }
    }

    /// Activate whichever visible hotspot contains `point`.
    pub fn click(&mut self, point: Vec2, now: Duration) -> bool {
        match hit_test(&self.placements, point, MARKER_RADIUS) {
            Some(index) => self.activate_hotspot(index, now),
            None => false,
        }
    }

    /// Activate hotspot `index` of the current scene.
    pub fn activate_hotspot(&mut self, index: usize, now: Duration) -> bool {
        let Some(target) = self
            .graph
            .current_scene()
            .hotspots
            .get(index)
            .map(|h| h.target_scene_index)
        else {
            log::warn!("[scene] no hotspot {} in the current scene", index);
            return false;
        };
        self.activate(target, now)
    }

    /// Begin a transition to scene `target`.
    ///
    /// Ignored in single-image mode, after teardown, or while another
    /// transition is running.
    pub fn activate(&mut self, target: i64, now: Duration) -> bool {
        if self.torn_down || !self.graph.is_navigable() {
            return false;
        }
        if !self.transitions.request(target, now) {
            log::debug!(
                "[scene] ignoring activation of scene {} during {:?}",
                target,
                self.transitions.phase()
            );
            return false;
        }
        true
    }

    /// Run transition deadlines up to `now`.
    ///
    /// Returns the new scene index if a swap happened, so GPU resources for
    /// that scene can be loaded.
    pub fn advance(&mut self, now: Duration) -> Option<usize> {
        if self.torn_down {
            return None;
        }

        let mut swapped = None;
        while let Some(step) = self.transitions.advance(now) {
            match step {
                TransitionStep::Swap(target) => {
                    let index = self.graph.activate(target);
                    if index as i64 != target {
                        log::warn!(
                            "[scene] hotspot target {} out of range, clamped to {}",
                            target,
                            index
                        );
                    }
                    apply_initial_view(&mut self.orientation, self.graph.current_scene());
                    log::info!(
                        "[scene] switched to scene {} '{}'",
                        index,
                        self.graph.current_scene().display_name()
                    );
                    if let Some(callback) = self.on_scene_change.as_mut() {
                        callback(index);
                    }
                    swapped = Some(index);
                }
                TransitionStep::Completed => {
                    log::debug!("[scene] transition complete");
                }
            }
        }
        swapped
    }

    /// Opacity of the full-screen fade overlay at `now`.
    pub fn overlay_alpha(&self, now: Duration) -> f32 {
        self.transitions.overlay_alpha(now)
    }

    /// Orient the camera and place hotspots for this frame.
    pub fn frame(&mut self) -> FrameOutput {
        let output = tick(&self.orientation, &self.graph, &self.camera);
        self.camera = output.camera;
        self.placements.clone_from(&output.placements);
        output
    }

    /// Last known pointer position in window pixels.
    pub fn cursor(&self) -> Vec2 {
        self.input.cursor()
    }

    /// Stop any drag in progress, e.g. when the window loses focus.
    pub fn release_capture(&mut self) {
        self.input.release_capture();
    }

    /// Index of the visible hotspot under the pointer, if any.
    pub fn hovered_hotspot(&self) -> Option<usize> {
        hit_test(&self.placements, self.input.cursor(), MARKER_RADIUS)
    }

    /// Label of the visible hotspot under the pointer, if any.
    pub fn hovered_label(&self) -> Option<&str> {
        let index = self.hovered_hotspot()?;
        self.placements
            .iter()
            .find(|p| p.index == index)
            .and_then(|p| p.label.as_deref())
    }

    /// End the session. Pending transition deadlines and later calls become no-ops.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.transitions.cancel();
        self.input.release_capture();
        self.placements.clear();
        self.on_scene_change = None;
    }
}

fn apply_initial_view(orientation: &mut OrientationState, scene: &Scene) {
    if let Some(view) = scene.initial_view {
        let current: ViewAngles = orientation.angles();
        orientation.reset_to(view.resolve(current));
    }
}
