//! Quaternion for carrying camera orbits between viewports

use crate::vector::Vec3;
use core::ops::Mul;

/// Quaternion representing a 3D rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from axis and angle (radians)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        let axis = axis.normalize_or_zero();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Shortest-arc rotation taking direction `from` onto direction `to`.
    ///
    /// Degenerate inputs (either vector zero) yield the identity.
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let from = from.normalize_or_zero();
        let to = to.normalize_or_zero();
        if from == Vec3::ZERO || to == Vec3::ZERO {
            return Self::IDENTITY;
        }

        let dot = from.dot(to);
        if dot > 0.99999 {
            return Self::IDENTITY;
        }

        if dot < -0.99999 {
            // Opposite directions: any perpendicular axis works
            let axis = Vec3::X.cross(from);
            let axis = if axis.length_squared() < 1e-6 {
                Vec3::Y.cross(from)
            } else {
                axis
            };
            return Self::from_axis_angle(axis, crate::consts::PI);
        }

        let axis = from.cross(to);
        let s = ((1.0 + dot) * 2.0).sqrt();
        let inv_s = 1.0 / s;
        Self::new(axis.x * inv_s, axis.y * inv_s, axis.z * inv_s, s * 0.5).normalize()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length_squared().sqrt();
        if len > crate::consts::EPSILON {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotation angle in radians (0..=PI)
    pub fn angle(self) -> f32 {
        2.0 * self.w.abs().min(1.0).acos()
    }

    /// Rotate a vector
    #[inline]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_leaves_vector() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((Quat::IDENTITY * v - v).length() < 1e-6);
    }

    #[test]
    fn test_rotation_arc_maps_from_onto_to() {
        let from = Vec3::new(0.0, 0.0, 5.0);
        let to = Vec3::new(3.0, 4.0, 0.0);
        let q = Quat::from_rotation_arc(from, to);
        let rotated = q * from;
        assert!((rotated - to.normalize_or_zero() * 5.0).length() < 1e-4);
    }

    #[test]
    fn test_rotation_arc_opposite_directions() {
        let q = Quat::from_rotation_arc(Vec3::Z, Vec3::NEG_Z);
        assert!((q * Vec3::Z - Vec3::NEG_Z).length() < 1e-5);
        assert!((q.angle() - crate::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_arc_degenerate_is_identity() {
        assert_eq!(Quat::from_rotation_arc(Vec3::ZERO, Vec3::X), Quat::IDENTITY);
        assert_eq!(Quat::from_rotation_arc(Vec3::X, Vec3::X * 2.0), Quat::IDENTITY);
    }
}
