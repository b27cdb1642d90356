//! The per-frame tick, kept free of any GPU or window state.

use crate::camera::Camera;
use crate::orientation::OrientationState;
use crate::projector::{HotspotPlacement, project_hotspots};
use crate::scene::SceneGraph;

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    /// Camera oriented for this frame.
    pub camera: Camera,
    /// Overlay placement for each hotspot of the active scene.
    pub placements: Vec<HotspotPlacement>,
}

/// Orient the camera from `orientation` and place the active scene's hotspots.
///
/// Hotspots are only placed when the graph is navigable; a single-image
/// session has no overlay controls.
pub fn tick(orientation: &OrientationState, graph: &SceneGraph, camera: &Camera) -> FrameOutput {
    let mut camera = *camera;
    camera.fov = orientation.fov().to_radians();
    camera.look_at(orientation.look_direction());

    let placements = if graph.is_navigable() {
        project_hotspots(&camera, &graph.current_scene().hotspots)
    } else {
        Vec::new()
    };

    FrameOutput { camera, placements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Hotspot, Scene};
    use approx::assert_relative_eq;

    fn graph_with_hotspot_at(yaw: f32) -> SceneGraph {
        let scene = Scene::new("a.jpg").with_hotspot(Hotspot {
            id: None,
            yaw,
            pitch: 0.0,
            label: Some("next".into()),
            target_scene_index: 0,
        });
        SceneGraph::new(vec![scene], 0).unwrap()
    }

    #[test]
    fn tick_orients_camera_and_applies_fov() {
        let mut orientation = OrientationState::default();
        orientation.apply_zoom(-15.0);
        let graph = graph_with_hotspot_at(0.0);
        let out = tick(&orientation, &graph, &Camera::new().with_viewport(640, 480));

        assert_relative_eq!(out.camera.fov, 60f32.to_radians());
        assert!(out.camera.forward.x > 0.99);
        assert_eq!(out.placements.len(), 1);
        assert!(out.placements[0].is_visible());
        assert_eq!(out.placements[0].label.as_deref(), Some("next"));
    }

    #[test]
    fn tick_does_not_mutate_inputs() {
        let orientation = OrientationState::default();
        let graph = graph_with_hotspot_at(0.0);
        let camera = Camera::new().with_viewport(640, 480);
        let _ = tick(&orientation, &graph, &camera);
        assert_eq!(camera, Camera::new().with_viewport(640, 480));
    }

    #[test]
    fn single_image_has_no_placements() {
        let graph = SceneGraph::single("pano.jpg", 75.0);
        let out = tick(&OrientationState::default(), &graph, &Camera::new());
        assert!(out.placements.is_empty());
    }
}
