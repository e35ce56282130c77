//! Mode resolver and camera transformer.
//!
//! Given a source change and one target viewport, compute the partial camera
//! the target should receive under the effective sync mode. Each mode is one
//! match arm, so adding a mode is a compile error until it is handled.

use void_camera::{CameraDelta, CameraState, Quat};

use crate::constraints::constraint_for;
use crate::delta::VECTOR_EPSILON;
use crate::events::SyncEvent;
use crate::settings::{SyncConfig, SyncMode};
use crate::viewport::ViewportInstance;

/// Effective mode for a (target, source) pair.
///
/// `None` on either side suppresses propagation; otherwise the more
/// restrictive (lower index) mode wins, so a `Full` source never overrides a
/// target that only accepts `Zoom`.
pub fn resolve_sync_mode(target_mode: SyncMode, source_mode: SyncMode) -> SyncMode {
    if target_mode == SyncMode::None || source_mode == SyncMode::None {
        return SyncMode::None;
    }
    target_mode.min(source_mode)
}

/// Partial camera to apply to `target` for the change described by `event`.
///
/// `config` is the target's own sync config. An orthographic target that
/// asked for `OrthographicLock` never has its position, up or fov touched,
/// whatever mode the resolver settled on.
pub fn transform_camera_for_viewport(
    source: &ViewportInstance,
    target: &ViewportInstance,
    event: &SyncEvent,
    mode: SyncMode,
    config: &SyncConfig,
) -> CameraDelta {
    let transform = Transform {
        source,
        target,
        event,
        config,
    };

    let partial = match mode {
        SyncMode::None => CameraDelta::new(),
        SyncMode::Zoom => transform.zoom(),
        SyncMode::Pan => transform.pan(&target.camera),
        SyncMode::Rotation => transform.rotation(),
        SyncMode::Full => transform.full(),
        SyncMode::OrthographicLock => transform.orthographic_lock(),
    };

    if config.mode == SyncMode::OrthographicLock && target.camera.is_orthographic {
        CameraDelta {
            target: partial.target,
            zoom: partial.zoom,
            ..CameraDelta::default()
        }
    } else {
        partial
    }
}

struct Transform<'a> {
    source: &'a ViewportInstance,
    target: &'a ViewportInstance,
    event: &'a SyncEvent,
    config: &'a SyncConfig,
}

impl Transform<'_> {
    fn preserves_orthographic(&self) -> bool {
        self.target.camera.is_orthographic && self.config.preserve_orthographic
    }

    fn zoom(&self) -> CameraDelta {
        CameraDelta {
            zoom: self.event.delta_camera().zoom,
            ..CameraDelta::default()
        }
    }

    /// Follow the source's look-at and carry its orbit onto the target
    fn rotation(&self) -> CameraDelta {
        if self.preserves_orthographic() {
            return self.preserve_orthographic_rotation();
        }

        let camera = &self.target.camera;
        let mut out = CameraDelta::new();
        let mut pose = camera.clone();
        if let Some(look_at) = self.event.delta_camera().target {
            pose.position = look_at + camera.eye_offset();
            pose.target = look_at;
            out.target = Some(pose.target);
            out.position = Some(pose.position);
        }
        out.merged(&self.orbit(&pose))
    }

    /// Orthographic targets only follow the look-at point; the eye is
    /// re-placed along the view's canonical direction at the current distance.
    fn preserve_orthographic_rotation(&self) -> CameraDelta {
        let Some(look_at) = self.event.delta_camera().target else {
            return CameraDelta::new();
        };

        let camera = &self.target.camera;
        let constraint = constraint_for(self.target.view_type);
        let direction = if constraint.locked {
            constraint.direction
        } else {
            camera.eye_offset().normalize_or_zero()
        };

        CameraDelta::new()
            .with_target(look_at)
            .with_position(look_at + direction * camera.distance())
    }

    /// Rotate `pose`'s eye about its look-at by the source's orbit, the
    /// shortest arc between the source's previous and new eye offsets.
    fn orbit(&self, pose: &CameraState) -> CameraDelta {
        let before = self.event.previous_camera();
        let after = before.with_delta(self.event.delta_camera());
        let rotation = Quat::from_rotation_arc(before.eye_offset(), after.eye_offset());
        if rotation.angle() < 1e-5 {
            return CameraDelta::new();
        }

        let position = pose.target + rotation * pose.eye_offset();
        let up = (rotation * pose.up).normalize_or_zero();

        let mut out = CameraDelta::new();
        if position.differs_from(pose.position, VECTOR_EPSILON) {
            out.position = Some(position);
        }
        if up.differs_from(pose.up, VECTOR_EPSILON) {
            out.up = Some(up);
        }
        out
    }

    /// Translate `pose` by the source's look-at displacement, restricted to
    /// the sync direction and projected onto the target's view plane.
    fn pan(&self, pose: &CameraState) -> CameraDelta {
        let Some(look_at) = self.event.delta_camera().target else {
            return CameraDelta::new();
        };

        let displacement = look_at - self.event.previous_camera().target;
        let displacement = constraint_for(self.source.view_type).project_onto_view_plane(
            displacement,
        );
        let displacement = self.config.direction.mask(displacement);
        let displacement = constraint_for(self.target.view_type).project_onto_view_plane(
            displacement,
        );
        if displacement.is_zero(VECTOR_EPSILON) {
            return CameraDelta::new();
        }

        CameraDelta::new()
            .with_target(pose.target + displacement)
            .with_position(pose.position + displacement)
    }

    /// Orbit, then pan, then zoom, each applied to the pose left by the previous step
    fn full(&self) -> CameraDelta {
        let mut pose = self.target.camera.clone();
        let mut out = CameraDelta::new();

        if !self.preserves_orthographic() {
            let orbit = self.orbit(&pose);
            pose.apply(&orbit);
            out.merge(&orbit);
        }

        let pan = self.pan(&pose);
        out.merge(&pan);
        out.merged(&self.zoom())
    }

    fn orthographic_lock(&self) -> CameraDelta {
        if !self.target.camera.is_orthographic {
            return self.full();
        }

        CameraDelta {
            target: self.pan(&self.target.camera).target,
            zoom: self.event.delta_camera().zoom,
            ..CameraDelta::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewType;
    use void_camera::Vec3;

    const ALL_MODES: [SyncMode; 6] = [
        SyncMode::None,
        SyncMode::Zoom,
        SyncMode::Pan,
        SyncMode::Rotation,
        SyncMode::Full,
        SyncMode::OrthographicLock,
    ];

    fn persp(id: &str) -> ViewportInstance {
        ViewportInstance::new(
            id,
            ViewType::Perspective,
            CameraState::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y),
        )
    }

    fn change(source: &ViewportInstance, new: &CameraState, mode: SyncMode) -> SyncEvent {
        let delta = crate::delta::compute_delta(new, &source.camera);
        SyncEvent::new(source.id.clone(), delta, source.camera.clone(), mode)
    }

    fn config(mode: SyncMode) -> SyncConfig {
        SyncConfig::default().with_mode(mode)
    }

    #[test]
    fn test_none_wins_on_either_side() {
        for mode in ALL_MODES {
            assert_eq!(resolve_sync_mode(SyncMode::None, mode), SyncMode::None);
            assert_eq!(resolve_sync_mode(mode, SyncMode::None), SyncMode::None);
        }
    }

    #[test]
    fn test_more_restrictive_mode_wins() {
        assert_eq!(resolve_sync_mode(SyncMode::Full, SyncMode::Zoom), SyncMode::Zoom);
        assert_eq!(resolve_sync_mode(SyncMode::Zoom, SyncMode::Full), SyncMode::Zoom);
        assert_eq!(resolve_sync_mode(SyncMode::OrthographicLock, SyncMode::Pan), SyncMode::Pan);
        for a in ALL_MODES {
            for b in ALL_MODES {
                assert_eq!(resolve_sync_mode(a, b), resolve_sync_mode(b, a));
            }
        }
    }

    #[test]
    fn test_zoom_passes_only_zoom() {
        let source = persp("src");
        let target = persp("dst");
        let new = source.camera.clone().with_zoom(2.5).with_target(Vec3::X);
        let event = change(&source, &new, SyncMode::Zoom);

        let out = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::Zoom,
            &config(SyncMode::Zoom),
        );
        assert_eq!(out, CameraDelta::new().with_zoom(2.5));
    }

    #[test]
    fn test_rotation_keeps_orthographic_axis() {
        let source = persp("persp");
        let front = ViewportInstance::standard("front", ViewType::Front, 20.0);
        let new = source.camera.clone().with_target(Vec3::new(5.0, 5.0, 5.0));
        let event = change(&source, &new, SyncMode::Rotation);

        let out = transform_camera_for_viewport(
            &source,
            &front,
            &event,
            SyncMode::Rotation,
            &config(SyncMode::Rotation),
        );
        let moved = front.camera.with_delta(&out);

        assert_eq!(moved.target, Vec3::new(5.0, 5.0, 5.0));
        assert!((moved.position - Vec3::new(5.0, 5.0, 25.0)).length() < 1e-4);
        assert!(constraint_for(ViewType::Front).is_aligned(&moved, 1e-5));
        assert!(out.up.is_none());
    }

    #[test]
    fn test_rotation_ignores_orbit_for_orthographic_target() {
        let source = persp("persp");
        let top = ViewportInstance::standard("top", ViewType::Top, 20.0);
        let new = source.camera.clone().with_position(Vec3::new(10.0, 0.0, 0.0));
        let event = change(&source, &new, SyncMode::Rotation);

        let out = transform_camera_for_viewport(
            &source,
            &top,
            &event,
            SyncMode::Rotation,
            &config(SyncMode::Rotation),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_rotation_carries_orbit_to_perspective_target() {
        let source = persp("src");
        let mut target = persp("dst");
        target.camera.position = Vec3::new(0.0, 0.0, 4.0);

        // quarter orbit around +Y: eye moves from +Z to +X
        let new = source.camera.clone().with_position(Vec3::new(10.0, 0.0, 0.0));
        let event = change(&source, &new, SyncMode::Rotation);

        let out = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::Rotation,
            &config(SyncMode::Rotation),
        );
        let moved = target.camera.with_delta(&out);

        assert!((moved.position - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
        assert!((moved.distance() - 4.0).abs() < 1e-4);
        assert_eq!(moved.target, Vec3::ZERO);
    }

    #[test]
    fn test_identical_perspective_views_stay_identical() {
        let source = persp("src");
        let target = persp("dst");
        let new = source.camera.clone().with_position(Vec3::new(6.0, 8.0, 0.0));
        let event = change(&source, &new, SyncMode::Rotation);

        let out = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::Rotation,
            &config(SyncMode::Rotation),
        );
        let moved = target.camera.with_delta(&out);
        assert!((moved.position - new.position).length() < 1e-3);
    }

    #[test]
    fn test_pan_projects_onto_target_view_plane() {
        let source = persp("src");
        let top = ViewportInstance::standard("top", ViewType::Top, 10.0);
        let new = source.camera.clone().with_target(Vec3::new(1.0, 2.0, 3.0));
        let event = change(&source, &new, SyncMode::Pan);

        let out = transform_camera_for_viewport(
            &source,
            &top,
            &event,
            SyncMode::Pan,
            &config(SyncMode::Pan),
        );
        assert_eq!(out.target, Some(Vec3::new(1.0, 0.0, 3.0)));
        assert_eq!(out.position, Some(top.camera.position + Vec3::new(1.0, 0.0, 3.0)));

        let moved = top.camera.with_delta(&out);
        assert!((moved.distance() - top.camera.distance()).abs() < 1e-4);
    }

    #[test]
    fn test_pan_along_depth_axis_is_dropped() {
        let source = persp("src");
        let front = ViewportInstance::standard("front", ViewType::Front, 10.0);
        let new = source.camera.clone().with_target(Vec3::new(0.0, 0.0, 4.0));
        let event = change(&source, &new, SyncMode::Pan);

        let out = transform_camera_for_viewport(
            &source,
            &front,
            &event,
            SyncMode::Pan,
            &config(SyncMode::Pan),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_pan_honours_direction() {
        let source = persp("src");
        let target = persp("dst");
        let new = source.camera.clone().with_target(Vec3::new(1.0, 2.0, 3.0));
        let event = change(&source, &new, SyncMode::Pan);
        let cfg = config(SyncMode::Pan).with_direction(crate::settings::SyncDirection::Xz);

        let out = transform_camera_for_viewport(&source, &target, &event, SyncMode::Pan, &cfg);
        assert_eq!(out.target, Some(Vec3::new(1.0, 0.0, 3.0)));
    }

    #[test]
    fn test_full_composes_orbit_pan_and_zoom() {
        let source = persp("src");
        let target = persp("dst");
        let new = source
            .camera
            .clone()
            .with_target(Vec3::new(1.0, 0.0, 0.0))
            .with_position(Vec3::new(11.0, 0.0, 0.0))
            .with_zoom(2.0);
        let event = change(&source, &new, SyncMode::Full);

        let out = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::Full,
            &config(SyncMode::Full),
        );
        let moved = target.camera.with_delta(&out);

        assert_eq!(moved.target, Vec3::new(1.0, 0.0, 0.0));
        assert!((moved.position - Vec3::new(11.0, 0.0, 0.0)).length() < 1e-3);
        assert_eq!(moved.zoom, 2.0);
    }

    #[test]
    fn test_orthographic_lock_never_touches_position_or_up() {
        let source = ViewportInstance::standard("src", ViewType::Front, 10.0);
        let right = ViewportInstance::standard("right", ViewType::Right, 10.0);
        let new = source
            .camera
            .clone()
            .with_target(Vec3::new(0.0, 3.0, 0.0))
            .with_position(Vec3::new(7.0, 3.0, 7.0))
            .with_zoom(4.0);
        let event = change(&source, &new, SyncMode::OrthographicLock);

        let out = transform_camera_for_viewport(
            &source,
            &right,
            &event,
            SyncMode::OrthographicLock,
            &config(SyncMode::OrthographicLock),
        );
        assert!(out.position.is_none());
        assert!(out.up.is_none());
        assert_eq!(out.target, Some(Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(out.zoom, Some(4.0));
    }

    #[test]
    fn test_orthographic_lock_guard_applies_under_any_resolved_mode() {
        let source = persp("src");
        let front = ViewportInstance::standard("front", ViewType::Front, 10.0);
        let new = source.camera.clone().with_target(Vec3::new(2.0, 2.0, 0.0));
        let event = change(&source, &new, SyncMode::Rotation);

        for mode in ALL_MODES {
            let out = transform_camera_for_viewport(
                &source,
                &front,
                &event,
                mode,
                &config(SyncMode::OrthographicLock),
            );
            assert!(out.position.is_none(), "{mode:?}");
            assert!(out.up.is_none(), "{mode:?}");
        }
    }

    #[test]
    fn test_orthographic_lock_on_perspective_target_behaves_like_full() {
        let source = persp("src");
        let target = persp("dst");
        let new = source.camera.clone().with_target(Vec3::new(1.0, 1.0, 0.0)).with_zoom(3.0);
        let event = change(&source, &new, SyncMode::OrthographicLock);

        let lock = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::OrthographicLock,
            &config(SyncMode::Full),
        );
        let full = transform_camera_for_viewport(
            &source,
            &target,
            &event,
            SyncMode::Full,
            &config(SyncMode::Full),
        );
        assert_eq!(lock, full);
    }
}
