//! Camera orientation for looking around the inside of the panorama sphere.
//!
//! [`OrientationState`] is the single owner of yaw, pitch and field of view.
//! All mutation goes through methods that enforce the clamp invariants, so a
//! value read anywhere in the frame loop is always usable as-is.
//!
//! Angles are degrees throughout. The mapping from angles to directions is
//! shared with the hotspot projector and the sphere mesh via
//! [`spherical_to_cartesian`], which keeps image columns, the camera and
//! hotspot markers in agreement:
//!
//! - yaw 0 looks down +X, increasing yaw turns toward +Z (pans right)
//! - pitch 0 is the horizon, positive pitch is above it

use glam::Vec3;

/// Radius of the panorama sphere in world units.
pub const SPHERE_RADIUS: f32 = 500.0;

/// Lowest allowed pitch in degrees. Keeps the camera off the pole singularity.
pub const MIN_PITCH: f32 = -85.0;
/// Highest allowed pitch in degrees.
pub const MAX_PITCH: f32 = 85.0;
/// Narrowest allowed vertical field of view in degrees.
pub const MIN_FOV: f32 = 30.0;
/// Widest allowed vertical field of view in degrees.
pub const MAX_FOV: f32 = 100.0;
/// Field of view used when neither the config nor a scene provides one.
pub const DEFAULT_FOV: f32 = 75.0;

/// Convert a yaw/pitch pair (degrees) to a point on a sphere of `radius`.
///
/// Pitch becomes the polar angle `phi = 90° - pitch` and yaw the azimuth.
pub fn spherical_to_cartesian(yaw: f32, pitch: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - pitch).to_radians();
    let theta = yaw.to_radians();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// A full yaw/pitch/fov triple, used to reset the orientation on scene change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewAngles {
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
}

impl Default for ViewAngles {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: DEFAULT_FOV,
        }
    }
}

/// The camera's look angles.
///
/// Yaw is unbounded and wraps through the trigonometry. Pitch is always in
/// `[MIN_PITCH, MAX_PITCH]` and fov always in `[MIN_FOV, MAX_FOV]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationState {
    yaw: f32,
    pitch: f32,
    fov: f32,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::new(ViewAngles::default())
    }
}

impl OrientationState {
    /// Create an orientation from the given angles, clamping pitch and fov.
    pub fn new(view: ViewAngles) -> Self {
        let mut state = Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: DEFAULT_FOV,
        };
        state.reset_to(view);
        state
    }

    /// Horizontal look angle in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Vertical look angle in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Current angles as a [`ViewAngles`].
    pub fn angles(&self) -> ViewAngles {
        ViewAngles {
            yaw: self.yaw,
            pitch: self.pitch,
            fov: self.fov,
        }
    }

    /// Add to yaw (unclamped) and pitch (clamped).
    pub fn apply_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Add to the field of view, clamped.
    pub fn apply_zoom(&mut self, delta_fov: f32) {
        self.fov = (self.fov + delta_fov).clamp(MIN_FOV, MAX_FOV);
    }

    /// Overwrite all three angles.
    pub fn reset_to(&mut self, view: ViewAngles) {
        self.yaw = view.yaw;
        self.pitch = view.pitch.clamp(MIN_PITCH, MAX_PITCH);
        self.fov = view.fov.clamp(MIN_FOV, MAX_FOV);
    }

    /// Point on the sphere the camera should look at, relative to the origin.
    pub fn look_direction(&self) -> Vec3 {
        spherical_to_cartesian(self.yaw, self.pitch, SPHERE_RADIUS)
    }
}
