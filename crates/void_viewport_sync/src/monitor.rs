//! Performance monitor.
//!
//! Fed by the engine's frame loop, independent of sync traffic. Once per
//! window it recomputes the frame-callback rate and the time since the last
//! applied sync update.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Snapshot of engine performance counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Frame callbacks per second over the last window
    pub updates_per_second: u32,
    /// Milliseconds since the last applied sync update, as of the last window
    pub sync_latency_ms: f64,
    /// Frame callbacks since start
    pub frames: u64,
    /// Source changes broadcast to targets
    pub total_broadcasts: u64,
    /// Batched updates applied to viewports
    pub total_flushes: u64,
    /// Updates merged into an already pending batch
    pub coalesced_updates: u64,
    /// Registered viewports
    pub viewport_count: usize,
}

/// Frame-loop driven performance monitor
pub struct PerformanceMonitor {
    window: Duration,
    window_start: Instant,
    frames_in_window: u32,
    last_update: Instant,
    metrics: PerformanceMetrics,
}

impl PerformanceMonitor {
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            window_start: now,
            frames_in_window: 0,
            last_update: now,
            metrics: PerformanceMetrics::default(),
        }
    }

    /// Count one frame callback. Returns true when the window rolled over and
    /// the rate and latency were recomputed.
    pub fn record_frame(&mut self, now: Instant) -> bool {
        self.metrics.frames += 1;
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return false;
        }

        let per_second = f64::from(self.frames_in_window) / elapsed.as_secs_f64();
        self.metrics.updates_per_second = per_second.round() as u32;
        self.metrics.sync_latency_ms =
            now.saturating_duration_since(self.last_update).as_secs_f64() * 1000.0;

        self.window_start = now;
        self.frames_in_window = 0;
        true
    }

    /// A batched update was applied to a viewport
    pub fn record_applied_update(&mut self, now: Instant) {
        self.last_update = now;
        self.metrics.total_flushes += 1;
    }

    /// A source change was broadcast
    pub fn record_broadcast(&mut self) {
        self.metrics.total_broadcasts += 1;
    }

    /// When the last sync update was applied (engine start if none yet)
    pub fn last_update_timestamp(&self) -> Instant {
        self.last_update
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> PerformanceMetrics {
        self.metrics.clone()
    }
}
