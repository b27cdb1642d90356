use glam::{Mat4, Vec3, Vec4};

/// Where the viewer sits inside the sphere. Slightly off-centre so the
/// look-at basis never degenerates.
pub const EYE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 0.1);

/// A perspective camera for looking out from inside the panorama sphere.
///
/// Tracks the viewport it renders into, so resizing recomputes both the
/// aspect ratio and the pixel size used to place hotspot markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    width: u32,
    height: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: EYE_POSITION,
            forward: Vec3::X,
            up: Vec3::Y,
            fov: 75f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            width: 1,
            height: 1,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.resize(width, height);
        self
    }

    /// Point the camera at a world-space target.
    pub fn look_at(&mut self, target: Vec3) {
        self.forward = (target - self.position).normalize_or_zero();
    }

    /// Recompute aspect ratio and viewport size.
    ///
    /// Zero-sized dimensions (a minimised window) are ignored. Calling this
    /// repeatedly with the same size has no further effect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Transform a world-space point to normalized device coordinates.
    ///
    /// Returns `None` when the clip-space `w` is zero.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn resize_is_idempotent() {
        let mut once = Camera::new();
        once.resize(1280, 720);

        let mut twice = Camera::new();
        twice.resize(1280, 720);
        twice.resize(1280, 720);

        assert_eq!(once, twice);
        assert_relative_eq!(twice.aspect, 1280.0 / 720.0);
        assert_eq!((twice.width(), twice.height()), (1280, 720));
    }

    #[test]
    fn resize_ignores_zero_size() {
        let mut camera = Camera::new().with_viewport(800, 600);
        camera.resize(0, 600);
        camera.resize(800, 0);
        assert_eq!((camera.width(), camera.height()), (800, 600));
    }

    #[test]
    fn point_straight_ahead_projects_to_centre() {
        let mut camera = Camera::new().with_viewport(800, 600);
        camera.look_at(Vec3::new(500.0, 0.0, 0.1));
        let ndc = camera.project(Vec3::new(500.0, 0.0, 0.1)).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
