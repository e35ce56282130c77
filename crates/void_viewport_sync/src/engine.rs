//! The viewport sync engine.
//!
//! Owns a `calloop` event loop carrying the engine state. Debounce timers
//! and the performance monitor's frame loop are timer sources on that loop;
//! the host drives them by calling [`ViewportSyncEngine::dispatch`] from its
//! own frame loop. Every public call runs to completion synchronously.
//!
//! ```text
//! sync_camera_change ─► compute_delta ─► broadcast_sync_event
//!                                            │ per target, priority order
//!                                            ▼
//!                      resolve_sync_mode ─► transform_camera_for_viewport
//!                                            │
//!                                            ▼
//!                      debounce_camera_update ─(timer)─► flush_batched_update
//!                                                          │
//!                                          registry camera ◄┴► listeners
//! ```

use std::borrow::Cow;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopHandle, RegistrationToken};
use void_camera::{CameraDelta, CameraState};

use crate::batcher::DebounceBatcher;
use crate::config::SyncEngineConfig;
use crate::delta::{compute_delta, exceeds_threshold, is_significant};
use crate::error::{ListenerError, SyncError, SyncResult};
use crate::events::{EventBus, ListenerId, SyncEvent, ENGINE_SOURCE_ID};
use crate::monitor::{PerformanceMetrics, PerformanceMonitor};
use crate::registry::ViewportRegistry;
use crate::settings::{SyncSettingsPatch, ViewportSyncSettings};
use crate::transform::{resolve_sync_mode, transform_camera_for_viewport};
use crate::viewport::{RenderMode, ViewType, ViewportId, ViewportInstance};

/// Camera synchronization engine for one editor session
pub struct ViewportSyncEngine {
    event_loop: EventLoop<'static, EngineState>,
    state: EngineState,
}

/// Mutable engine state, handed to timer callbacks by the event loop
struct EngineState {
    handle: LoopHandle<'static, EngineState>,
    config: SyncEngineConfig,
    registry: ViewportRegistry,
    batcher: DebounceBatcher<RegistrationToken>,
    listeners: EventBus,
    monitor: PerformanceMonitor,
    frame_timer: Option<RegistrationToken>,
    is_active: bool,
    disposed: bool,
}

impl ViewportSyncEngine {
    /// Create an engine and start its performance-monitor frame loop
    pub fn new(config: SyncEngineConfig) -> SyncResult<Self> {
        config.validate()?;

        let event_loop: EventLoop<'static, EngineState> =
            EventLoop::try_new().map_err(|e| SyncError::EventLoop(e.to_string()))?;

        let monitor = PerformanceMonitor::new(config.metrics_window(), Instant::now());
        let mut state = EngineState {
            handle: event_loop.handle(),
            config,
            registry: ViewportRegistry::new(),
            batcher: DebounceBatcher::new(),
            listeners: EventBus::new(),
            monitor,
            frame_timer: None,
            is_active: true,
            disposed: false,
        };
        state.start_frame_loop()?;

        log::info!("Viewport sync engine started");
        Ok(Self { event_loop, state })
    }

    /// Create an engine with the default configuration
    pub fn with_defaults() -> SyncResult<Self> {
        Self::new(SyncEngineConfig::default())
    }

    /// Run one iteration of the event loop, firing due timers
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> SyncResult<()> {
        self.event_loop
            .dispatch(timeout, &mut self.state)
            .map_err(|e| SyncError::EventLoop(e.to_string()))
    }

    /// Keep dispatching until `duration` has elapsed
    pub fn run_for(&mut self, duration: Duration) -> SyncResult<()> {
        let Some(deadline) = Instant::now().checked_add(duration) else {
            return self.dispatch(Some(duration));
        };
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            self.dispatch(Some(deadline - now))?;
        }
    }

    // ---- registry ----

    /// Insert or replace a viewport. Settings start from the configured
    /// defaults for its view type, then `settings_override` is merged in.
    pub fn register_viewport(
        &mut self,
        viewport: ViewportInstance,
        settings_override: Option<SyncSettingsPatch>,
    ) {
        self.state.register_viewport(viewport, settings_override.as_ref());
    }

    /// Remove a viewport with its listeners, pending timer and batched update
    pub fn unregister_viewport(&mut self, id: &str) {
        self.state.unregister_viewport(id);
    }

    /// Shallow-merge settings. Returns false for unknown ids.
    pub fn update_sync_settings(&mut self, id: &str, patch: SyncSettingsPatch) -> bool {
        self.state.registry.update_settings(id, &patch)
    }

    pub fn sync_settings(&self, id: &str) -> Option<&ViewportSyncSettings> {
        self.state.registry.settings(id)
    }

    pub fn viewport(&self, id: &str) -> Option<&ViewportInstance> {
        self.state.registry.get(id).map(|e| &e.viewport)
    }

    pub fn camera(&self, id: &str) -> Option<&CameraState> {
        self.viewport(id).map(|v| &v.camera)
    }

    /// Registered ids in registration order
    pub fn viewport_ids(&self) -> Vec<ViewportId> {
        self.state.registry.ids()
    }

    pub fn viewport_count(&self) -> usize {
        self.state.registry.len()
    }

    /// Switch a viewport to another standard view. Any update still pending
    /// for it was computed for the old view and is dropped.
    pub fn set_view_type(&mut self, id: &str, view_type: ViewType) -> bool {
        self.state.set_view_type(id, view_type)
    }

    pub fn set_render_mode(&mut self, id: &str, render_mode: RenderMode) -> bool {
        match self.state.registry.get_mut(id) {
            Some(entry) => {
                entry.viewport.render_mode = render_mode;
                true
            }
            None => false,
        }
    }

    /// Make `id` the only active viewport
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.state.registry.contains(id) {
            return false;
        }
        for entry in self.state.registry.iter_mut() {
            entry.viewport.is_active = entry.viewport.id == id;
        }
        true
    }

    // ---- propagation ----

    /// Record a user-driven camera change on `source_id` and propagate it.
    /// Returns the number of targets an update was scheduled for.
    pub fn sync_camera_change(
        &mut self,
        source_id: &str,
        new_camera: CameraState,
        previous_camera: &CameraState,
    ) -> usize {
        self.state.sync_camera_change(source_id, new_camera, previous_camera)
    }

    /// Propagate an already built event to every eligible target
    pub fn broadcast_sync_event(&mut self, event: &SyncEvent) -> usize {
        self.state.broadcast_sync_event(event)
    }

    /// Merge `partial` into the target's batch and (re)start its quiet interval
    pub fn debounce_camera_update(
        &mut self,
        target_id: &str,
        partial: CameraDelta,
        debounce_ms: u64,
    ) {
        self.state.debounce_camera_update(target_id, partial, debounce_ms);
    }

    /// Apply the target's batch now. Returns false if nothing was pending.
    pub fn flush_batched_update(&mut self, target_id: &str) -> bool {
        self.state.flush_batched_update(target_id)
    }

    /// Apply every pending batch now
    pub fn flush_all(&mut self) -> usize {
        self.state.flush_all()
    }

    /// The batch waiting for a target, if any
    pub fn pending_update(&self, target_id: &str) -> Option<&CameraDelta> {
        self.state.batcher.pending(target_id)
    }

    /// Pause or resume propagation. Source poses are still recorded while paused.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.disposed {
            log::warn!("set_enabled ignored: engine disposed");
            return;
        }
        self.state.is_active = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_active
    }

    // ---- listeners ----

    /// Subscribe to engine-applied camera updates of one viewport
    pub fn add_event_listener<F>(&mut self, viewport_id: &str, listener: F) -> ListenerId
    where
        F: FnMut(&SyncEvent) -> Result<(), ListenerError> + 'static,
    {
        if self.state.disposed {
            log::warn!("add_event_listener('{}') ignored: engine disposed", viewport_id);
            return ListenerId(0);
        }
        self.state.listeners.add_listener(viewport_id, Box::new(listener))
    }

    pub fn remove_event_listener(&mut self, viewport_id: &str, id: ListenerId) -> bool {
        self.state.listeners.remove_listener(viewport_id, id)
    }

    pub fn listener_count(&self, viewport_id: &str) -> usize {
        self.state.listeners.listener_count(viewport_id)
    }

    // ---- diagnostics / lifecycle ----

    /// Snapshot of the performance counters
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        let mut metrics = self.state.monitor.snapshot();
        metrics.coalesced_updates = self.state.batcher.coalesced_count();
        metrics.viewport_count = self.state.registry.len();
        metrics
    }

    /// When the engine last applied an update (engine start if never)
    pub fn last_update_timestamp(&self) -> Instant {
        self.state.monitor.last_update_timestamp()
    }

    pub fn config(&self) -> &SyncEngineConfig {
        &self.state.config
    }

    /// Stop the frame loop, cancel every timer and clear all state.
    /// Later calls are ignored; the engine is not meant to be reused.
    pub fn dispose(&mut self) {
        self.state.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.state.disposed
    }
}

impl Drop for ViewportSyncEngine {
    fn drop(&mut self) {
        self.state.dispose();
    }
}

impl EngineState {
    fn start_frame_loop(&mut self) -> SyncResult<()> {
        let interval = self.config.frame_interval();
        let token = self
            .handle
            .insert_source(Timer::from_duration(interval), move |_, _, state: &mut EngineState| {
                if state.disposed {
                    return TimeoutAction::Drop;
                }
                state.monitor.record_frame(Instant::now());
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|e| SyncError::EventLoop(e.error.to_string()))?;
        self.frame_timer = Some(token);
        Ok(())
    }

    fn register_viewport(
        &mut self,
        viewport: ViewportInstance,
        settings_override: Option<&SyncSettingsPatch>,
    ) {
        if self.disposed {
            log::warn!("register_viewport('{}') ignored: engine disposed", viewport.id);
            return;
        }

        let mut settings = self.config.settings_for(viewport.view_type);
        if let Some(patch) = settings_override {
            settings.apply(patch);
        }

        let id = viewport.id.clone();
        if self.registry.register(viewport, settings) {
            // a pending update was computed for the replaced viewport
            if let Some(token) = self.batcher.purge(id.as_str()) {
                self.handle.remove(token);
            }
            log::debug!("Viewport '{}' re-registered", id);
        } else {
            log::debug!("Viewport '{}' registered", id);
        }
    }

    fn unregister_viewport(&mut self, id: &str) {
        if let Some(token) = self.batcher.purge(id) {
            self.handle.remove(token);
        }
        self.listeners.remove_all(id);
        if self.registry.unregister(id).is_some() {
            log::debug!("Viewport '{}' unregistered", id);
        }
    }

    fn set_view_type(&mut self, id: &str, view_type: ViewType) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            return false;
        };
        entry.viewport.set_view_type(view_type);
        if let Some(token) = self.batcher.purge(id) {
            self.handle.remove(token);
        }
        true
    }

    fn sync_camera_change(
        &mut self,
        source_id: &str,
        new_camera: CameraState,
        previous_camera: &CameraState,
    ) -> usize {
        if self.disposed {
            log::warn!("sync_camera_change('{}') ignored: engine disposed", source_id);
            return 0;
        }

        let delta = compute_delta(&new_camera, previous_camera);
        let (mode, threshold, emits) = match self.registry.get_mut(source_id) {
            Some(entry) => {
                entry.viewport.camera = new_camera;
                let settings = &entry.settings;
                (
                    settings.sync_config.mode,
                    settings.sync_config.threshold,
                    settings.emits_updates(),
                )
            }
            None => {
                log::debug!("Camera change from unknown viewport '{}' ignored", source_id);
                return 0;
            }
        };

        // the user's own gesture supersedes anything still pending for the source
        if let Some(token) = self.batcher.purge(source_id) {
            self.handle.remove(token);
        }

        if !self.is_active || !emits || !is_significant(&delta) {
            return 0;
        }
        if self.config.magnitude_gate && !exceeds_threshold(&delta, previous_camera, threshold) {
            return 0;
        }

        let event = SyncEvent::new(source_id, delta, previous_camera.clone(), mode);
        self.broadcast_sync_event(&event)
    }

    fn broadcast_sync_event(&mut self, event: &SyncEvent) -> usize {
        if self.disposed || !self.is_active {
            return 0;
        }

        let Some(source) = self.registry.get(event.source_viewport_id().as_str()) else {
            log::debug!("Broadcast from unknown viewport '{}' ignored", event.source_viewport_id());
            return 0;
        };

        let batcher = &self.batcher;
        let scheduled: Vec<(ViewportId, CameraDelta, u64)> = self
            .registry
            .sync_targets(source.viewport.id.as_str())
            .into_iter()
            .filter_map(|target| {
                let config = &target.settings.sync_config;
                let mode = resolve_sync_mode(config.mode, event.sync_mode());

                // transform from where the target will be once its pending batch lands
                let projected = match batcher.pending(target.viewport.id.as_str()) {
                    Some(pending) => {
                        let mut viewport = target.viewport.clone();
                        viewport.camera.apply(pending);
                        Cow::Owned(viewport)
                    }
                    None => Cow::Borrowed(&target.viewport),
                };

                let partial = transform_camera_for_viewport(
                    &source.viewport,
                    &projected,
                    event,
                    mode,
                    config,
                );
                if partial.is_empty() {
                    None
                } else {
                    Some((target.viewport.id.clone(), partial, config.debounce_ms))
                }
            })
            .collect();

        self.monitor.record_broadcast();
        log::debug!(
            "Broadcast from '{}' ({:?}) scheduled {} target(s)",
            event.source_viewport_id(),
            event.sync_mode(),
            scheduled.len()
        );

        let count = scheduled.len();
        for (target_id, partial, debounce_ms) in scheduled {
            self.debounce_camera_update(target_id.as_str(), partial, debounce_ms);
        }
        count
    }

    fn debounce_camera_update(&mut self, target_id: &str, partial: CameraDelta, debounce_ms: u64) {
        if self.disposed {
            return;
        }
        if !self.registry.contains(target_id) {
            log::debug!("Update for unknown viewport '{}' ignored", target_id);
            return;
        }

        if let Some(previous) = self.batcher.stage(target_id, &partial) {
            self.handle.remove(previous);
        }

        let id = ViewportId::from(target_id);
        let timer = Timer::from_duration(Duration::from_millis(debounce_ms));
        let inserted = self.handle.insert_source(timer, move |_, _, state: &mut EngineState| {
            state.on_debounce_elapsed(id.as_str());
            TimeoutAction::Drop
        });

        match inserted {
            Ok(token) => {
                self.batcher.arm(target_id, token);
            }
            Err(err) => {
                log::error!(
                    "Failed to schedule update for '{}': {}; applying now",
                    target_id,
                    err.error
                );
                self.flush_batched_update(target_id);
            }
        }
    }

    /// Timer path: the loop drops the source itself once we return
    fn on_debounce_elapsed(&mut self, target_id: &str) {
        self.batcher.disarm(target_id);
        self.apply_batched_update(target_id);
    }

    fn flush_batched_update(&mut self, target_id: &str) -> bool {
        if let Some(token) = self.batcher.disarm(target_id) {
            self.handle.remove(token);
        }
        self.apply_batched_update(target_id)
    }

    fn flush_all(&mut self) -> usize {
        self.batcher
            .pending_ids()
            .iter()
            .filter(|id| self.flush_batched_update(id.as_str()))
            .count()
    }

    fn apply_batched_update(&mut self, target_id: &str) -> bool {
        let Some(batch) = self.batcher.take_batch(target_id) else {
            return false;
        };
        let Some(entry) = self.registry.get_mut(target_id) else {
            return false;
        };

        let previous = entry.viewport.camera.clone();
        entry.viewport.camera.apply(&batch);
        let event = SyncEvent::new(
            ENGINE_SOURCE_ID,
            batch,
            previous,
            entry.settings.sync_config.mode,
        );

        self.monitor.record_applied_update(event.timestamp());
        log::debug!("Applied sync update to '{}'", target_id);
        self.listeners.notify(target_id, &event);
        true
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        if let Some(token) = self.frame_timer.take() {
            self.handle.remove(token);
        }
        for token in self.batcher.drain() {
            self.handle.remove(token);
        }
        self.registry.clear();
        self.listeners.clear();
        self.is_active = false;
        self.disposed = true;

        log::info!("Viewport sync engine disposed");
    }
}
