//! Hotspot projection from the sphere onto the screen.
//!
//! Each frame, every hotspot of the active scene is placed on the sphere with
//! the same spherical mapping the camera uses, then pushed through the
//! camera's view-projection to find where its marker goes on screen.
//!
//! A hotspot is shown only when both hold:
//!
//! - it is in the camera's forward hemisphere (`dot(forward, dir) > 0`)
//! - its projected depth lies inside the clip volume (`-1 <= z <= 1`)
//!
//! Nothing is cached between frames.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::orientation::{SPHERE_RADIUS, spherical_to_cartesian};
use crate::scene::Hotspot;

/// Radius in pixels of the clickable area around a hotspot marker.
pub const MARKER_RADIUS: f32 = 18.0;

/// Where one hotspot's overlay control goes this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotPlacement {
    /// Index of the hotspot within the active scene.
    pub index: usize,
    /// Destination scene index as configured.
    pub target: i64,
    /// Screen position in pixels, `None` when the hotspot is culled.
    pub screen: Option<Vec2>,
    pub label: Option<String>,
}

impl HotspotPlacement {
    pub fn is_visible(&self) -> bool {
        self.screen.is_some()
    }
}

/// Project a single hotspot. Returns its pixel position when visible.
pub fn project_hotspot(camera: &Camera, yaw: f32, pitch: f32) -> Option<Vec2> {
    let position: Vec3 = spherical_to_cartesian(yaw, pitch, SPHERE_RADIUS);

    let facing = camera.forward.dot(position.normalize_or_zero()) > 0.0;
    if !facing {
        return None;
    }

    let ndc = camera.project(position)?;
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    Some(ndc_to_screen(
        ndc.truncate(),
        camera.width() as f32,
        camera.height() as f32,
    ))
}

/// Map normalized device coordinates to window pixels (origin top-left).
pub fn ndc_to_screen(ndc: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new((ndc.x + 1.0) / 2.0 * width, (1.0 - ndc.y) / 2.0 * height)
}

/// Project every hotspot of a scene, preserving order.
pub fn project_hotspots(camera: &Camera, hotspots: &[Hotspot]) -> Vec<HotspotPlacement> {
    hotspots
        .iter()
        .enumerate()
        .map(|(index, hotspot)| HotspotPlacement {
            index,
            target: hotspot.target_scene_index,
            screen: project_hotspot(camera, hotspot.yaw, hotspot.pitch),
            label: hotspot.label.clone(),
        })
        .collect()
}

/// Find the visible hotspot whose marker contains `point`.
///
/// Later placements are drawn on top, so they win ties.
pub fn hit_test(placements: &[HotspotPlacement], point: Vec2, radius: f32) -> Option<usize> {
    placements
        .iter()
        .rev()
        .find(|p| {
            p.screen
                .is_some_and(|screen| screen.distance_squared(point) <= radius * radius)
        })
        .map(|p| p.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationState;
    use approx::assert_relative_eq;

    fn camera_looking(yaw: f32, pitch: f32) -> Camera {
        let mut orientation = OrientationState::default();
        orientation.apply_delta(yaw, pitch);
        let mut camera = Camera::new().with_viewport(1000, 500);
        camera.look_at(orientation.look_direction());
        camera
    }

    #[test]
    fn hotspot_ahead_lands_in_the_middle() {
        let camera = camera_looking(0.0, 0.0);
        let screen = project_hotspot(&camera, 0.0, 0.0).unwrap();
        assert_relative_eq!(screen.x, 500.0, epsilon = 0.5);
        assert_relative_eq!(screen.y, 250.0, epsilon = 0.5);
    }

    #[test]
    fn hotspot_behind_is_culled() {
        let camera = camera_looking(180.0, 0.0);
        assert_eq!(project_hotspot(&camera, 0.0, 0.0), None);
    }

    #[test]
    fn hotspot_past_right_angle_is_culled() {
        let camera = camera_looking(100.0, 0.0);
        assert_eq!(project_hotspot(&camera, 0.0, 0.0), None);
    }

    #[test]
    fn hotspot_to_the_right_is_right_of_centre() {
        let camera = camera_looking(0.0, 0.0);
        let screen = project_hotspot(&camera, 20.0, 0.0).unwrap();
        assert!(screen.x > 500.0);
    }

    #[test]
    fn hotspot_above_horizon_is_above_centre() {
        let camera = camera_looking(0.0, 0.0);
        let screen = project_hotspot(&camera, 0.0, 15.0).unwrap();
        assert!(screen.y < 250.0);
    }

    #[test]
    fn ndc_corners_map_to_screen_corners() {
        assert_eq!(
            ndc_to_screen(Vec2::new(-1.0, 1.0), 800.0, 600.0),
            Vec2::ZERO
        );
        assert_eq!(
            ndc_to_screen(Vec2::new(1.0, -1.0), 800.0, 600.0),
            Vec2::new(800.0, 600.0)
        );
    }

    #[test]
    fn hit_test_prefers_topmost_visible() {
        let placements = vec![
            HotspotPlacement {
                index: 0,
                target: 1,
                screen: Some(Vec2::new(100.0, 100.0)),
                label: None,
            },
            HotspotPlacement {
                index: 1,
                target: 2,
                screen: None,
                label: None,
            },
            HotspotPlacement {
                index: 2,
                target: 0,
                screen: Some(Vec2::new(105.0, 100.0)),
                label: None,
            },
        ];
        assert_eq!(hit_test(&placements, Vec2::new(102.0, 100.0), 10.0), Some(2));
        assert_eq!(hit_test(&placements, Vec2::new(90.0, 100.0), 10.0), Some(0));
        assert_eq!(hit_test(&placements, Vec2::new(400.0, 400.0), 10.0), None);
    }
}
