//! Per-viewport synchronization policy.

use serde::{Deserialize, Serialize};
use void_camera::Vec3;

use crate::viewport::ViewType;

/// Propagation mode, ordered by restrictiveness.
///
/// The declaration order is the conflict-resolution index: when a source and
/// a target disagree, the variant declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    None,
    Zoom,
    Pan,
    #[default]
    Rotation,
    Full,
    OrthographicLock,
}

impl SyncMode {
    /// Position in the restrictiveness order (0 = `None`)
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Axes a pan displacement may propagate along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Xy,
    Xz,
    Yz,
    #[default]
    All,
}

impl SyncDirection {
    /// Zero the axes outside this direction's plane
    pub fn mask(self, v: Vec3) -> Vec3 {
        match self {
            SyncDirection::Xy => Vec3::new(v.x, v.y, 0.0),
            SyncDirection::Xz => Vec3::new(v.x, 0.0, v.z),
            SyncDirection::Yz => Vec3::new(0.0, v.y, v.z),
            SyncDirection::All => v,
        }
    }
}

/// Propagation policy of one viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub mode: SyncMode,
    pub direction: SyncDirection,
    /// Keep orthographic targets axis aligned under rotation sync
    pub preserve_orthographic: bool,
    /// Smoothing hint for the host renderer (0..=1)
    pub interpolation_speed: f32,
    /// Magnitude below which a change is not worth propagating
    pub threshold: f32,
    /// Quiet interval before a batched update is applied
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::Rotation,
            direction: SyncDirection::All,
            preserve_orthographic: true,
            interpolation_speed: 0.8,
            threshold: 0.001,
            debounce_ms: 16,
        }
    }
}

impl SyncConfig {
    /// Builder: set mode
    pub fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: set direction
    pub fn with_direction(mut self, direction: SyncDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Builder: set debounce window
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Builder: set threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Priority of perspective viewports unless overridden
pub const PERSPECTIVE_PRIORITY: i32 = 10;
/// Priority of every other viewport unless overridden
pub const DEFAULT_PRIORITY: i32 = 5;

/// Registry entry controlling one viewport's participation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSyncSettings {
    pub participate_in_sync: bool,
    pub receives_updates: bool,
    pub sends_updates: bool,
    /// Processing order among targets, higher first
    pub priority: i32,
    pub sync_config: SyncConfig,
}

impl ViewportSyncSettings {
    /// Default settings for a viewport showing `view_type`
    pub fn for_view_type(view_type: ViewType, sync_config: SyncConfig) -> Self {
        let priority = if view_type == ViewType::Perspective {
            PERSPECTIVE_PRIORITY
        } else {
            DEFAULT_PRIORITY
        };
        Self {
            participate_in_sync: true,
            receives_updates: true,
            sends_updates: true,
            priority,
            sync_config,
        }
    }

    /// Whether this viewport accepts updates from others
    pub fn accepts_updates(&self) -> bool {
        self.participate_in_sync && self.receives_updates && self.sync_config.mode != SyncMode::None
    }

    /// Whether changes to this viewport propagate to others
    pub fn emits_updates(&self) -> bool {
        self.participate_in_sync && self.sends_updates
    }

    /// Shallow merge: present fields replace ours, `sync_config` as a whole
    pub fn apply(&mut self, patch: &SyncSettingsPatch) {
        if let Some(v) = patch.participate_in_sync {
            self.participate_in_sync = v;
        }
        if let Some(v) = patch.receives_updates {
            self.receives_updates = v;
        }
        if let Some(v) = patch.sends_updates {
            self.sends_updates = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(config) = &patch.sync_config {
            self.sync_config = config.clone();
        }
        if let Some(mode) = patch.sync_mode {
            self.sync_config.mode = mode;
        }
    }
}

/// Partial `ViewportSyncSettings`; absent fields mean "no change"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettingsPatch {
    pub participate_in_sync: Option<bool>,
    pub receives_updates: Option<bool>,
    pub sends_updates: Option<bool>,
    pub priority: Option<i32>,
    pub sync_config: Option<SyncConfig>,
    /// Mode only; merged into the stored config after `sync_config`
    pub sync_mode: Option<SyncMode>,
}

impl SyncSettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participate_in_sync(mut self, v: bool) -> Self {
        self.participate_in_sync = Some(v);
        self
    }

    pub fn receives_updates(mut self, v: bool) -> Self {
        self.receives_updates = Some(v);
        self
    }

    pub fn sends_updates(mut self, v: bool) -> Self {
        self.sends_updates = Some(v);
        self
    }

    pub fn priority(mut self, v: i32) -> Self {
        self.priority = Some(v);
        self
    }

    pub fn sync_config(mut self, config: SyncConfig) -> Self {
        self.sync_config = Some(config);
        self
    }

    /// Change only the mode, keeping the rest of the stored config
    pub fn mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = Some(mode);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_order() {
        assert!(SyncMode::None < SyncMode::Zoom);
        assert!(SyncMode::Zoom < SyncMode::Pan);
        assert!(SyncMode::Pan < SyncMode::Rotation);
        assert!(SyncMode::Rotation < SyncMode::Full);
        assert!(SyncMode::Full < SyncMode::OrthographicLock);
        assert_eq!(SyncMode::OrthographicLock.index(), 5);
    }

    #[test]
    fn test_default_priority_by_view_type() {
        let persp = ViewportSyncSettings::for_view_type(
            ViewType::Perspective,
            SyncConfig::default(),
        );
        let top = ViewportSyncSettings::for_view_type(ViewType::Top, SyncConfig::default());
        assert_eq!(persp.priority, 10);
        assert_eq!(top.priority, 5);
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut settings = ViewportSyncSettings::for_view_type(
            ViewType::Front,
            SyncConfig::default(),
        );
        settings.apply(&SyncSettingsPatch::new().priority(42).receives_updates(false));

        assert_eq!(settings.priority, 42);
        assert!(!settings.receives_updates);
        assert!(settings.sends_updates);
        assert_eq!(settings.sync_config, SyncConfig::default());

        settings.apply(&SyncSettingsPatch::new().mode(SyncMode::Zoom));
        assert_eq!(settings.sync_config.mode, SyncMode::Zoom);
        assert_eq!(settings.priority, 42);
    }

    #[test]
    fn test_mode_patch_keeps_rest_of_config() {
        let config = SyncConfig::default()
            .with_debounce_ms(200)
            .with_direction(SyncDirection::Xz)
            .with_threshold(0.5);
        let mut settings = ViewportSyncSettings::for_view_type(ViewType::Top, config);
        settings.apply(&SyncSettingsPatch::new().mode(SyncMode::Pan));

        assert_eq!(settings.sync_config.mode, SyncMode::Pan);
        assert_eq!(settings.sync_config.debounce_ms, 200);
        assert_eq!(settings.sync_config.direction, SyncDirection::Xz);
        assert_eq!(settings.sync_config.threshold, 0.5);
        assert!(settings.sync_config.preserve_orthographic);
    }

    #[test]
    fn test_mode_patch_applies_after_config_replacement() {
        let mut settings = ViewportSyncSettings::for_view_type(
            ViewType::Top,
            SyncConfig::default(),
        );
        let patch = SyncSettingsPatch::new()
            .mode(SyncMode::Zoom)
            .sync_config(SyncConfig::default().with_debounce_ms(40));
        settings.apply(&patch);

        assert_eq!(settings.sync_config.mode, SyncMode::Zoom);
        assert_eq!(settings.sync_config.debounce_ms, 40);
    }

    #[test]
    fn test_accepts_updates_requires_all_flags() {
        let mut settings = ViewportSyncSettings::for_view_type(
            ViewType::Front,
            SyncConfig::default(),
        );
        assert!(settings.accepts_updates());
        settings.sync_config.mode = SyncMode::None;
        assert!(!settings.accepts_updates());
    }

    #[test]
    fn test_direction_mask() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(SyncDirection::Xy.mask(v), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(SyncDirection::Xz.mask(v), Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(SyncDirection::Yz.mask(v), Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(SyncDirection::All.mask(v), v);
    }
}
