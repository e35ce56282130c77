//! Viewport model: identity, standard view type and display flags.

use std::borrow::Borrow;
use std::fmt;

use void_camera::CameraState;

use crate::constraints::constraint_for;

/// Unique viewport identifier within a registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewportId(String);

impl ViewportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ViewportId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewportId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ViewportId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ViewportId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ViewportId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Standard view a viewport is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    Perspective,
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    Iso,
}

impl ViewType {
    pub const ALL: [ViewType; 8] = [
        ViewType::Perspective,
        ViewType::Front,
        ViewType::Back,
        ViewType::Left,
        ViewType::Right,
        ViewType::Top,
        ViewType::Bottom,
        ViewType::Iso,
    ];

    /// Every standard view except the free perspective view projects orthographically
    pub fn is_orthographic(self) -> bool {
        !matches!(self, ViewType::Perspective)
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewType::Perspective => "perspective",
            ViewType::Front => "front",
            ViewType::Back => "back",
            ViewType::Left => "left",
            ViewType::Right => "right",
            ViewType::Top => "top",
            ViewType::Bottom => "bottom",
            ViewType::Iso => "iso",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shading style the host renders a viewport with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Shaded,
    ShadedWithEdges,
    Wireframe,
    HiddenLine,
}

/// Render quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

/// One independently camera'd view of the shared scene
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportInstance {
    pub id: ViewportId,
    pub view_type: ViewType,
    pub render_mode: RenderMode,
    pub camera: CameraState,
    pub is_active: bool,
    pub is_visible: bool,
    pub is_locked: bool,
    pub show_grid: bool,
    pub show_axes: bool,
    pub quality: Quality,
}

impl ViewportInstance {
    /// Create a viewport with an explicit camera
    pub fn new(id: impl Into<ViewportId>, view_type: ViewType, camera: CameraState) -> Self {
        Self {
            id: id.into(),
            view_type,
            render_mode: RenderMode::default(),
            camera,
            is_active: false,
            is_visible: true,
            is_locked: false,
            show_grid: true,
            show_axes: true,
            quality: Quality::default(),
        }
    }

    /// Create a viewport placed at the canonical camera for `view_type`,
    /// looking at the origin from `distance`.
    pub fn standard(id: impl Into<ViewportId>, view_type: ViewType, distance: f32) -> Self {
        let camera = constraint_for(view_type).canonical_camera(void_camera::Vec3::ZERO, distance);
        Self::new(id, view_type, camera)
    }

    /// Builder: set render mode
    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Builder: set quality tier
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Builder: mark as the active viewport
    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }

    /// Switch to another standard view, snapping the camera to that view's
    /// canonical placement around the current look-at point and distance.
    pub fn set_view_type(&mut self, view_type: ViewType) {
        let distance = self.camera.distance();
        let canonical = constraint_for(view_type).canonical_camera(self.camera.target, distance);

        self.view_type = view_type;
        self.camera.is_orthographic = canonical.is_orthographic;
        if view_type.is_orthographic() {
            self.camera.position = canonical.position;
            self.camera.up = canonical.up;
        }
    }
}
