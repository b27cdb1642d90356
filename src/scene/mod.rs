//! Scenes, the graph linking them, and the fade between them.
//!
//! A session holds an ordered list of [`Scene`]s. Each scene's hotspots are
//! edges to other scenes by index, so the list forms a directed graph that
//! may contain cycles and parallel edges. [`SceneGraph`] owns the list and the
//! index of the scene on screen.
//!
//! Switching scenes always goes through a [`TransitionController`]: the screen
//! fades to black, the scene is swapped while nothing is visible, then the
//! screen fades back in.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use panorama::scene::{Hotspot, Scene, SceneGraph, TransitionController, TransitionStep};
//!
//! let hall = Scene::new("hall.jpg").with_hotspot(Hotspot {
//!     id: None,
//!     yaw: 40.0,
//!     pitch: 0.0,
//!     label: Some("Garden".into()),
//!     target_scene_index: 1,
//! });
//! let mut graph = SceneGraph::new(vec![hall, Scene::new("garden.jpg")], 0).unwrap();
//! let mut fade = TransitionController::default();
//!
//! fade.request(1, Duration::ZERO);
//! while let Some(step) = fade.advance(Duration::from_millis(750)) {
//!     if let TransitionStep::Swap(target) = step {
//!         graph.activate(target);
//!     }
//! }
//! assert_eq!(graph.current_index(), 1);
//! ```

mod graph;
mod transition;
mod transition_pass;

pub use graph::{DanglingEdge, Hotspot, InitialView, Scene, SceneGraph};
pub use transition::{
    Easing, TransitionController, TransitionPhase, TransitionStep, TransitionTiming,
};
pub use transition_pass::TransitionPass;
