//! # void_camera - Camera Pose Math
//!
//! The small amount of 3D math a viewport camera needs:
//! - `Vec3` for positions, look-at points and up vectors
//! - `Quat` for carrying an orbit from one camera onto another
//! - `CameraState` (a full pose) and `CameraDelta` (a partial pose)

pub mod vector;
pub mod quaternion;
pub mod camera;

pub use vector::Vec3;
pub use quaternion::Quat;
pub use camera::{CameraDelta, CameraState};

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const EPSILON: f32 = 1e-6;
}

pub mod prelude {
    pub use crate::camera::{CameraDelta, CameraState};
    pub use crate::quaternion::Quat;
    pub use crate::vector::Vec3;
}
