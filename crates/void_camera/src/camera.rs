//! Camera pose and partial pose.
//!
//! `CameraState` is the full pose a viewport renders with. `CameraDelta` is a
//! partial pose: only the fields that are `Some` are meant to change. Deltas
//! merge shallowly, later fields overwriting earlier ones.

use crate::vector::Vec3;

/// Pose of one viewport's camera.
///
/// `up` must not be collinear with `position - target`; keeping it that way
/// is the caller's job.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Positive zoom factor (used by orthographic projection)
    pub zoom: f32,
    pub is_orthographic: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0,
            zoom: 1.0,
            is_orthographic: false,
        }
    }
}

impl CameraState {
    /// Create a perspective camera looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            ..Self::default()
        }
    }

    /// Builder: mark as orthographic
    pub fn orthographic(mut self) -> Self {
        self.is_orthographic = true;
        self
    }

    /// Builder: set zoom
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Builder: set field of view (degrees)
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Builder: set look-at point
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Builder: set eye position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Vector from the look-at point to the eye
    #[inline]
    pub fn eye_offset(&self) -> Vec3 {
        self.position - self.target
    }

    /// Distance from the eye to the look-at point
    #[inline]
    pub fn distance(&self) -> f32 {
        self.eye_offset().length()
    }

    /// Unit direction the camera looks along
    #[inline]
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Apply the present fields of `delta` onto this pose.
    ///
    /// Non-finite values and a non-positive zoom are ignored.
    pub fn apply(&mut self, delta: &CameraDelta) {
        if let Some(position) = delta.position.filter(is_finite_vec) {
            self.position = position;
        }
        if let Some(target) = delta.target.filter(is_finite_vec) {
            self.target = target;
        }
        if let Some(up) = delta.up.filter(is_finite_vec) {
            self.up = up;
        }
        if let Some(fov) = delta.fov.filter(|f| f.is_finite()) {
            self.fov = fov;
        }
        if let Some(zoom) = delta.zoom.filter(|z| z.is_finite() && *z > 0.0) {
            self.zoom = zoom;
        }
    }

    /// Copy of this pose with `delta` applied
    pub fn with_delta(&self, delta: &CameraDelta) -> Self {
        let mut next = self.clone();
        next.apply(delta);
        next
    }
}

fn is_finite_vec(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Partial camera pose: the subset of fields that changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraDelta {
    pub position: Option<Vec3>,
    pub target: Option<Vec3>,
    pub up: Option<Vec3>,
    pub fov: Option<f32>,
    pub zoom: Option<f32>,
}

impl CameraDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: impl Into<Vec3>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<Vec3>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_up(mut self, up: impl Into<Vec3>) -> Self {
        self.up = Some(up.into());
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = Some(fov);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// No field present
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of present fields
    pub fn field_count(&self) -> usize {
        usize::from(self.position.is_some())
            + usize::from(self.target.is_some())
            + usize::from(self.up.is_some())
            + usize::from(self.fov.is_some())
            + usize::from(self.zoom.is_some())
    }

    /// Shallow merge: every field present in `other` overwrites ours
    pub fn merge(&mut self, other: &CameraDelta) {
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.target.is_some() {
            self.target = other.target;
        }
        if other.up.is_some() {
            self.up = other.up;
        }
        if other.fov.is_some() {
            self.fov = other.fov;
        }
        if other.zoom.is_some() {
            self.zoom = other.zoom;
        }
    }

    /// Owned variant of [`merge`](Self::merge)
    pub fn merged(mut self, other: &CameraDelta) -> Self {
        self.merge(other);
        self
    }
}
