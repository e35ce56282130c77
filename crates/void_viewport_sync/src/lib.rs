//! # void_viewport_sync - Multi-Viewport Camera Synchronization
//!
//! Keeps the cameras of a multi-viewport 3D editor coherent. When the user
//! orbits, pans or zooms one viewport, the change is carried to the other
//! registered viewports according to each one's sync mode and view type:
//! - perspective targets receive the orbit and pan relative to their own view
//! - orthographic targets (front, top, iso, ...) follow pan and zoom while
//!   staying aligned to their canonical axis
//! - rapid changes are coalesced per target and applied once the target has
//!   been quiet for its debounce interval
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host editor (input handling, rendering, frame loop)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  void_viewport_sync (this crate)                            │
//! │  ├─ ViewportSyncEngine (calloop timers, dispatch)           │
//! │  ├─ Registry + per-viewport sync settings                   │
//! │  ├─ Camera transformation per sync mode                     │
//! │  └─ Debounce batching, listeners, performance monitor       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  void_camera (Vec3, Quat, CameraState, CameraDelta)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use void_viewport_sync::prelude::*;
//!
//! let mut engine = ViewportSyncEngine::with_defaults()?;
//! let persp = ViewportInstance::standard("persp", ViewType::Perspective, 20.0);
//! engine.register_viewport(persp, None);
//! engine.register_viewport(ViewportInstance::standard("front", ViewType::Front, 20.0), None);
//!
//! let previous = engine.camera("persp").cloned().unwrap_or_default();
//! let moved = previous.clone().with_target(Vec3::new(1.0, 0.0, 0.0));
//! engine.sync_camera_change("persp", moved, &previous);
//!
//! // from the host's frame loop
//! engine.dispatch(Some(std::time::Duration::from_millis(1)))?;
//! # Ok::<(), void_viewport_sync::SyncError>(())
//! ```

pub mod batcher;
pub mod config;
pub mod constraints;
pub mod delta;
pub mod engine;
pub mod error;
pub mod events;
pub mod monitor;
pub mod registry;
pub mod settings;
pub mod transform;
pub mod viewport;

pub use config::SyncEngineConfig;
pub use constraints::{constraint_for, ViewConstraint};
pub use delta::{compute_delta, delta_magnitude, exceeds_threshold, is_significant};
pub use engine::ViewportSyncEngine;
pub use error::{ConfigError, ListenerError, SyncError, SyncResult};
pub use events::{ListenerId, SyncEvent, ENGINE_SOURCE_ID};
pub use monitor::PerformanceMetrics;
pub use settings::{SyncConfig, SyncDirection, SyncMode, SyncSettingsPatch, ViewportSyncSettings};
pub use transform::{resolve_sync_mode, transform_camera_for_viewport};
pub use viewport::{Quality, RenderMode, ViewType, ViewportId, ViewportInstance};

pub use void_camera::{CameraDelta, CameraState, Vec3};

pub mod prelude {
    pub use crate::config::SyncEngineConfig;
    pub use crate::engine::ViewportSyncEngine;
    pub use crate::error::{ListenerError, SyncError};
    pub use crate::events::SyncEvent;
    pub use crate::settings::{SyncConfig, SyncDirection, SyncMode, SyncSettingsPatch};
    pub use crate::viewport::{RenderMode, ViewType, ViewportInstance};
    pub use void_camera::prelude::*;
}
