//! Engine configuration.
//!
//! Loaded from TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! perspective_priority = 10
//! default_priority = 5
//! frame_interval_ms = 16
//! metrics_window_ms = 1000
//! magnitude_gate = false
//!
//! [default_sync]
//! mode = "rotation"          # none | zoom | pan | rotation | full | orthographic-lock
//! direction = "all"          # xy | xz | yz | all
//! preserve_orthographic = true
//! interpolation_speed = 0.8
//! threshold = 0.001
//! debounce_ms = 16
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::settings::{SyncConfig, ViewportSyncSettings, DEFAULT_PRIORITY, PERSPECTIVE_PRIORITY};
use crate::viewport::ViewType;

/// Viewport sync engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncEngineConfig {
    /// Policy given to viewports registered without an override
    pub default_sync: SyncConfig,
    /// Default priority of perspective viewports
    pub perspective_priority: i32,
    /// Default priority of every other viewport
    pub default_priority: i32,
    /// Period of the performance monitor's frame loop
    pub frame_interval_ms: u64,
    /// How often the monitor recomputes its rates
    pub metrics_window_ms: u64,
    /// Gate changes on the source's numeric threshold, not just on field presence
    pub magnitude_gate: bool,
}

impl Default for SyncEngineConfig {
    fn default() -> Self {
        Self {
            default_sync: SyncConfig::default(),
            perspective_priority: PERSPECTIVE_PRIORITY,
            default_priority: DEFAULT_PRIORITY,
            frame_interval_ms: 16,
            metrics_window_ms: 1000,
            magnitude_gate: false,
        }
    }
}

impl SyncEngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded viewport sync config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let sync = &self.default_sync;
        if !(0.0..=1.0).contains(&sync.interpolation_speed) {
            return Err(ConfigError::Validation(format!(
                "interpolation_speed must be within 0..=1, got {}",
                sync.interpolation_speed
            )));
        }
        if !sync.threshold.is_finite() || sync.threshold < 0.0 {
            return Err(ConfigError::Validation(format!(
                "threshold must be a non-negative number, got {}",
                sync.threshold
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Validation("frame_interval_ms must be positive".into()));
        }
        if self.metrics_window_ms == 0 {
            return Err(ConfigError::Validation("metrics_window_ms must be positive".into()));
        }
        Ok(())
    }

    /// Default registry settings for a viewport showing `view_type`
    pub fn settings_for(&self, view_type: ViewType) -> ViewportSyncSettings {
        let mut settings = ViewportSyncSettings::for_view_type(
            view_type,
            self.default_sync.clone(),
        );
        settings.priority = if view_type == ViewType::Perspective {
            self.perspective_priority
        } else {
            self.default_priority
        };
        settings
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn metrics_window(&self) -> Duration {
        Duration::from_millis(self.metrics_window_ms)
    }
}
