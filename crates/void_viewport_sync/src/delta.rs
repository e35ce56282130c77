//! Delta computer: which camera fields changed, and whether it matters.

use void_camera::{CameraDelta, CameraState};

/// Per-component tolerance for position, target and up
pub const VECTOR_EPSILON: f32 = 0.001;
/// Tolerance for field of view (degrees)
pub const FOV_EPSILON: f32 = 0.1;
/// Tolerance for zoom
pub const ZOOM_EPSILON: f32 = 0.001;

/// Fields of `new` that differ from `previous` beyond the fixed tolerances
pub fn compute_delta(new: &CameraState, previous: &CameraState) -> CameraDelta {
    let mut delta = CameraDelta::new();

    if new.position.differs_from(previous.position, VECTOR_EPSILON) {
        delta.position = Some(new.position);
    }
    if new.target.differs_from(previous.target, VECTOR_EPSILON) {
        delta.target = Some(new.target);
    }
    if new.up.differs_from(previous.up, VECTOR_EPSILON) {
        delta.up = Some(new.up);
    }
    if (new.fov - previous.fov).abs() > FOV_EPSILON {
        delta.fov = Some(new.fov);
    }
    if (new.zoom - previous.zoom).abs() > ZOOM_EPSILON {
        delta.zoom = Some(new.zoom);
    }

    delta
}

/// Presence-based significance: true iff the delta carries a position,
/// target, zoom or fov change. An up-only change is not propagated.
///
/// The numeric sync threshold is not consulted here; see
/// [`exceeds_threshold`] for the magnitude gate.
pub fn is_significant(delta: &CameraDelta) -> bool {
    !delta.is_empty()
        && (delta.position.is_some()
            || delta.target.is_some()
            || delta.zoom.is_some()
            || delta.fov.is_some())
}

/// Largest change carried by `delta` relative to `previous`.
///
/// Vectors contribute their euclidean displacement, scalars their absolute
/// difference.
pub fn delta_magnitude(delta: &CameraDelta, previous: &CameraState) -> f32 {
    let mut magnitude: f32 = 0.0;
    if let Some(position) = delta.position {
        magnitude = magnitude.max(position.distance(previous.position));
    }
    if let Some(target) = delta.target {
        magnitude = magnitude.max(target.distance(previous.target));
    }
    if let Some(up) = delta.up {
        magnitude = magnitude.max(up.distance(previous.up));
    }
    if let Some(fov) = delta.fov {
        magnitude = magnitude.max((fov - previous.fov).abs());
    }
    if let Some(zoom) = delta.zoom {
        magnitude = magnitude.max((zoom - previous.zoom).abs());
    }
    magnitude
}

/// Magnitude gate: true if the delta's largest change exceeds `threshold`
pub fn exceeds_threshold(delta: &CameraDelta, previous: &CameraState, threshold: f32) -> bool {
    delta_magnitude(delta, previous) > threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_camera::Vec3;

    #[test]
    fn test_identical_cameras_have_empty_delta() {
        let camera = CameraState::default();
        assert!(compute_delta(&camera, &camera).is_empty());
    }

    #[test]
    fn test_changes_below_epsilon_are_dropped() {
        let previous = CameraState::default();
        let mut new = previous.clone();
        new.position.x += 0.0005;
        new.fov += 0.05;
        new.zoom += 0.0005;
        assert!(compute_delta(&new, &previous).is_empty());
    }

    #[test]
    fn test_only_changed_fields_are_reported() {
        let previous = CameraState::default();
        let new = previous.clone().with_target(Vec3::new(5.0, 5.0, 5.0)).with_fov(60.0);
        let delta = compute_delta(&new, &previous);

        assert_eq!(delta.target, Some(Vec3::new(5.0, 5.0, 5.0)));
        assert_eq!(delta.fov, Some(60.0));
        assert!(delta.position.is_none());
        assert!(delta.up.is_none());
        assert!(delta.zoom.is_none());
    }

    #[test]
    fn test_up_only_change_is_not_significant() {
        let delta = CameraDelta::new().with_up([1.0, 0.0, 0.0]);
        assert!(!is_significant(&delta));
        assert!(!is_significant(&CameraDelta::new()));
        assert!(is_significant(&CameraDelta::new().with_zoom(2.0)));
        assert!(is_significant(&CameraDelta::new().with_fov(30.0)));
    }

    #[test]
    fn test_magnitude_gate() {
        let previous = CameraState::default();
        let delta = CameraDelta::new().with_target([0.0, 0.5, 0.0]).with_zoom(1.2);
        assert!((delta_magnitude(&delta, &previous) - 0.5).abs() < 1e-6);
        assert!(exceeds_threshold(&delta, &previous, 0.1));
        assert!(!exceeds_threshold(&delta, &previous, 1.0));
    }
}
