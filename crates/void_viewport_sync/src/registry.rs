//! Viewport registry.
//!
//! The authoritative set of known viewports and their sync settings.
//! Entries keep registration order, which is the tie-break when targets
//! share a priority.

use crate::settings::{SyncSettingsPatch, ViewportSyncSettings};
use crate::viewport::{ViewportId, ViewportInstance};

/// A registered viewport and its settings
#[derive(Debug, Clone)]
pub struct RegisteredViewport {
    pub viewport: ViewportInstance,
    pub settings: ViewportSyncSettings,
}

/// Registered viewports in registration order
#[derive(Debug, Default)]
pub struct ViewportRegistry {
    entries: Vec<RegisteredViewport>,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.viewport.id == id)
    }

    /// Insert or replace. A replaced entry keeps its registration slot.
    /// Returns true if an entry with that id already existed.
    pub fn register(&mut self, viewport: ViewportInstance, settings: ViewportSyncSettings) -> bool {
        let entry = RegisteredViewport { viewport, settings };
        match self.position(entry.viewport.id.as_str()) {
            Some(index) => {
                self.entries[index] = entry;
                true
            }
            None => {
                self.entries.push(entry);
                false
            }
        }
    }

    /// Remove an entry. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) -> Option<RegisteredViewport> {
        self.position(id).map(|index| self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredViewport> {
        self.entries.iter().find(|e| e.viewport.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RegisteredViewport> {
        self.entries.iter_mut().find(|e| e.viewport.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn settings(&self, id: &str) -> Option<&ViewportSyncSettings> {
        self.get(id).map(|e| &e.settings)
    }

    /// Shallow-merge a settings patch. Returns false for unknown ids.
    pub fn update_settings(&mut self, id: &str, patch: &SyncSettingsPatch) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.settings.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Viewports eligible to receive a change from `source_id`, highest
    /// priority first, ties in registration order.
    pub fn sync_targets(&self, source_id: &str) -> Vec<&RegisteredViewport> {
        let mut targets: Vec<&RegisteredViewport> = self
            .entries
            .iter()
            .filter(|e| e.viewport.id != source_id && e.settings.accepts_updates())
            .collect();
        // stable: equal priorities keep registration order
        targets.sort_by(|a, b| b.settings.priority.cmp(&a.settings.priority));
        targets
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredViewport> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegisteredViewport> {
        self.entries.iter_mut()
    }

    /// Ids in registration order
    pub fn ids(&self) -> Vec<ViewportId> {
        self.entries.iter().map(|e| e.viewport.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
