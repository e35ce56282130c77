//! Orthographic constraint table.
//!
//! Canonical camera placement for each standard view. A locked entry fixes
//! the eye direction and up vector; only the look-at point, distance and zoom
//! of a locked view may move.

use void_camera::{CameraState, Vec3};

use crate::viewport::ViewType;

const INV_SQRT_3: f32 = 0.577_350_26;

/// Canonical placement for one standard view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConstraint {
    pub view_type: ViewType,
    /// Unit vector from the look-at point towards the eye
    pub direction: Vec3,
    pub up: Vec3,
    /// Whether the eye direction is fixed for this view
    pub locked: bool,
}

static CONSTRAINTS: [ViewConstraint; 8] = [
    ViewConstraint {
        view_type: ViewType::Perspective,
        direction: Vec3::new(INV_SQRT_3, INV_SQRT_3, INV_SQRT_3),
        up: Vec3::Y,
        locked: false,
    },
    ViewConstraint {
        view_type: ViewType::Front,
        direction: Vec3::Z,
        up: Vec3::Y,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Back,
        direction: Vec3::NEG_Z,
        up: Vec3::Y,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Left,
        direction: Vec3::NEG_X,
        up: Vec3::Y,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Right,
        direction: Vec3::X,
        up: Vec3::Y,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Top,
        direction: Vec3::Y,
        up: Vec3::NEG_Z,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Bottom,
        direction: Vec3::NEG_Y,
        up: Vec3::Z,
        locked: true,
    },
    ViewConstraint {
        view_type: ViewType::Iso,
        direction: Vec3::new(INV_SQRT_3, INV_SQRT_3, INV_SQRT_3),
        up: Vec3::Y,
        locked: true,
    },
];

/// Look up the constraint entry for a view type
pub fn constraint_for(view_type: ViewType) -> &'static ViewConstraint {
    let index = match view_type {
        ViewType::Perspective => 0,
        ViewType::Front => 1,
        ViewType::Back => 2,
        ViewType::Left => 3,
        ViewType::Right => 4,
        ViewType::Top => 5,
        ViewType::Bottom => 6,
        ViewType::Iso => 7,
    };
    &CONSTRAINTS[index]
}

impl ViewConstraint {
    /// Eye position at `distance` from `look_at` along the canonical direction
    #[inline]
    pub fn place_eye(&self, look_at: Vec3, distance: f32) -> Vec3 {
        look_at + self.direction * distance
    }

    /// Canonical camera for this view around `look_at`
    pub fn canonical_camera(&self, look_at: Vec3, distance: f32) -> CameraState {
        CameraState {
            position: self.place_eye(look_at, distance),
            target: look_at,
            up: self.up,
            is_orthographic: self.view_type.is_orthographic(),
            ..CameraState::default()
        }
    }

    /// Project a world-space displacement onto this view's screen plane.
    ///
    /// Unlocked views have no fixed plane and pass the displacement through.
    pub fn project_onto_view_plane(&self, displacement: Vec3) -> Vec3 {
        if self.locked {
            displacement.reject_from(self.direction)
        } else {
            displacement
        }
    }

    /// Whether `camera` still looks along this view's canonical direction
    pub fn is_aligned(&self, camera: &CameraState, epsilon: f32) -> bool {
        !camera
            .eye_offset()
            .normalize_or_zero()
            .differs_from(self.direction, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_view_type() {
        for view_type in ViewType::ALL {
            assert_eq!(constraint_for(view_type).view_type, view_type);
        }
    }

    #[test]
    fn test_directions_are_unit_and_not_collinear_with_up() {
        for view_type in ViewType::ALL {
            let c = constraint_for(view_type);
            assert!((c.direction.length() - 1.0).abs() < 1e-5, "{view_type}");
            assert!(c.direction.cross(c.up).length() > 0.5, "{view_type}");
        }
    }

    #[test]
    fn test_only_perspective_is_unlocked() {
        for view_type in ViewType::ALL {
            assert_eq!(constraint_for(view_type).locked, view_type.is_orthographic());
        }
    }

    #[test]
    fn test_projection_removes_depth_axis() {
        let front = constraint_for(ViewType::Front);
        let projected = front.project_onto_view_plane(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(projected, Vec3::new(1.0, 2.0, 0.0));

        let top = constraint_for(ViewType::Top);
        assert_eq!(top.project_onto_view_plane(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 0.0, 3.0));

        let persp = constraint_for(ViewType::Perspective);
        assert_eq!(
            persp.project_onto_view_plane(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_canonical_camera_is_aligned() {
        let right = constraint_for(ViewType::Right);
        let camera = right.canonical_camera(Vec3::new(1.0, 2.0, 3.0), 7.0);
        assert!(right.is_aligned(&camera, 1e-5));
        assert!((camera.distance() - 7.0).abs() < 1e-5);
        assert!(camera.is_orthographic);
    }
}
