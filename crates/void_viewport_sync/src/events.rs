//! Sync events and the per-viewport listener bus.
//!
//! Listeners learn when the engine itself moved a viewport's camera, as
//! opposed to the user moving it directly.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use void_camera::{CameraDelta, CameraState};

use crate::error::ListenerError;
use crate::settings::SyncMode;
use crate::viewport::ViewportId;

/// Source id carried by events the engine emits when it applies a batched update
pub const ENGINE_SOURCE_ID: &str = "sync-engine";

/// One propagation occurrence. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncEvent {
    source_viewport_id: ViewportId,
    timestamp: Instant,
    delta_camera: CameraDelta,
    previous_camera: CameraState,
    sync_mode: SyncMode,
}

impl SyncEvent {
    pub fn new(
        source_viewport_id: impl Into<ViewportId>,
        delta_camera: CameraDelta,
        previous_camera: CameraState,
        sync_mode: SyncMode,
    ) -> Self {
        Self {
            source_viewport_id: source_viewport_id.into(),
            timestamp: Instant::now(),
            delta_camera,
            previous_camera,
            sync_mode,
        }
    }

    /// Viewport the change originated from, or [`ENGINE_SOURCE_ID`]
    pub fn source_viewport_id(&self) -> &ViewportId {
        &self.source_viewport_id
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Fields that changed
    pub fn delta_camera(&self) -> &CameraDelta {
        &self.delta_camera
    }

    /// Pose the change was measured from
    pub fn previous_camera(&self) -> &CameraState {
        &self.previous_camera
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Whether the engine (not a user gesture) produced this event
    pub fn is_engine_update(&self) -> bool {
        self.source_viewport_id == ENGINE_SOURCE_ID
    }
}

/// Listener ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Camera listener callback
pub type Listener = Box<dyn FnMut(&SyncEvent) -> Result<(), ListenerError>>;

/// Per-viewport subscriber lists
pub struct EventBus {
    listeners: HashMap<ViewportId, Vec<(ListenerId, Listener)>>,
    next_listener_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_listener_id: 1,
        }
    }

    /// Subscribe to engine updates of one viewport
    pub fn add_listener(&mut self, viewport_id: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;

        self.listeners
            .entry(ViewportId::from(viewport_id))
            .or_default()
            .push((id, listener));
        id
    }

    /// Unsubscribe. Returns false if the listener was not registered for that viewport.
    pub fn remove_listener(&mut self, viewport_id: &str, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(viewport_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener_id, _)| *listener_id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(viewport_id);
        }
        removed
    }

    /// Drop every listener of one viewport
    pub fn remove_all(&mut self, viewport_id: &str) -> usize {
        self.listeners
            .remove(viewport_id)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Invoke the viewport's listeners in registration order.
    ///
    /// A failing or panicking listener is logged and does not stop the rest.
    /// Returns the number of listeners that completed successfully.
    pub fn notify(&mut self, viewport_id: &str, event: &SyncEvent) -> usize {
        let Some(list) = self.listeners.get_mut(viewport_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (id, listener) in list.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => {
                    log::warn!("Camera listener {:?} on '{}' failed: {}", id, viewport_id, err);
                }
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    log::error!(
                        "Camera listener {:?} on '{}' panicked: {}",
                        id,
                        viewport_id,
                        message
                    );
                }
            }
        }
        delivered
    }

    /// Number of listeners registered for a viewport
    pub fn listener_count(&self, viewport_id: &str) -> usize {
        self.listeners.get(viewport_id).map(Vec::len).unwrap_or(0)
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
