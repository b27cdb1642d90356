//! # panorama
//!
//! **A 360° equirectangular panorama viewer with hotspot navigation.**
//!
//! An equirectangular image is painted on the inside of a sphere and the
//! camera looks out from its centre. Drag to look around, scroll to zoom,
//! or use the arrow keys. Scenes can be linked by hotspots: clicking one
//! fades to black, swaps the scene, and fades back in.
//!
//! ## Quick Start
//!
//! ```no_run
//! use panorama::{PanoramaSession, SessionConfig};
//!
//! fn main() -> Result<(), panorama::PanoramaError> {
//!     let config = SessionConfig::from_file("tour.json")?;
//!     let mut session = PanoramaSession::from_config(config)?;
//!     session.on_scene_change(|index| println!("now showing scene {index}"));
//!     panorama::run(session)
//! }
//! ```
//!
//! ## Headless use
//!
//! Everything except [`GpuContext`], [`PanoramaRenderer`] and [`run`] works
//! without a window. Feed [`InputEvent`]s and timestamps to a
//! [`PanoramaSession`] and read back orientation, hotspot placements and the
//! transition phase.

mod app;
mod camera;
mod config;
mod error;
mod frame;
mod gpu;
mod input;
mod mesh;
mod orientation;
mod overlay;
mod projector;
mod renderer;
pub mod scene;
mod session;
mod texture;

pub use app::{AppConfig, run, run_with_config};
pub use camera::{Camera, EYE_POSITION};
pub use config::SessionConfig;
pub use error::{PanoramaError, Result};
pub use frame::{FrameOutput, tick};
pub use gpu::GpuContext;
pub use input::{ArrowKey, InputController, InputEvent, InputOutcome};
pub use mesh::{Mesh, SPHERE_RINGS, SPHERE_SEGMENTS, SphereGeometry, Vertex3d};
pub use orientation::{
    DEFAULT_FOV, MAX_FOV, MAX_PITCH, MIN_FOV, MIN_PITCH, OrientationState, SPHERE_RADIUS,
    ViewAngles, spherical_to_cartesian,
};
pub use overlay::{Color, MarkerBatch, OverlayPass};
pub use projector::{
    HotspotPlacement, MARKER_RADIUS, hit_test, ndc_to_screen, project_hotspot, project_hotspots,
};
pub use renderer::PanoramaRenderer;
pub use session::{PanoramaSession, ViewerState};
pub use texture::Texture;

// Re-export glam math types for convenience
pub use glam::{Vec2, Vec3};
