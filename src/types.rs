/*
 * Platform-agnostic value types used across the crate: opaque window and timer
 * identifiers, logical/pixel sizes, the typed input events produced by the
 * message router, host configuration, and the small enums the main window glue
 * reports to its listener.
 */
use std::time::Duration;

/// Opaque identifier of a native window.
///
/// On Windows the payload is the `HWND` value. Callers that need the raw handle
/// (for example to bind a graphics swap chain) use [`NativeWindowId::as_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindowId(isize);

impl NativeWindowId {
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> isize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Identifier of a running frame timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub usize);

/// Size in device-independent units (1/96 inch).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSize {
    pub width: i32,
    pub height: i32,
}

impl PixelSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// One translated window message. Produced and consumed within a single
/// message dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMove {
        x: f32,
        y: f32,
    },
    /// Also emitted for mouse-leave as "all released at (0, 0)"; those
    /// coordinates are not a cursor position.
    MouseButton {
        left: bool,
        right: bool,
        x: f32,
        y: f32,
    },
    /// Wheel movement in notches (raw delta divided by 120).
    MouseWheel {
        delta: f32,
    },
    HitTestQuery,
    FocusContextChange {
        active: bool,
    },
}

/// Settings for the hosted render surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Window class used for the hosted child window.
    pub class_name: String,
    /// Control identifier passed as the child window's menu handle.
    pub host_control_id: i32,
    /// Interval of the per-frame update notification.
    pub frame_interval: Duration,
    /// Request `WM_MOUSELEAVE` delivery for the hosted window.
    pub track_mouse_leave: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            class_name: "STATIC".to_string(),
            host_control_id: 2,
            frame_interval: Duration::from_millis(16),
            track_mouse_leave: true,
        }
    }
}

/// Handed to the listener once the render panel has a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSurface {
    pub window: NativeWindowId,
    pub size: PixelSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFileKind {
    MetroModel,
    Obj,
    Fbx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsType {
    Box,
    Sphere,
}

impl BoundsType {
    pub const ALL: [BoundsType; 2] = [BoundsType::Box, BoundsType::Sphere];

    pub fn name(self) -> &'static str {
        match self {
            BoundsType::Box => "Box",
            BoundsType::Sphere => "Sphere",
        }
    }
}

/// Boolean debug switches exposed on the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugToggle {
    ShowBounds,
    ShowSubmodelsBounds,
    SkeletonShowBones,
    SkeletonShowBonesLinks,
    SkeletonShowBonesNames,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub text: String,
    pub tag: i32,
    pub expanded: bool,
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    pub fn new(text: impl Into<String>, tag: i32) -> Self {
        Self {
            text: text.into(),
            tag,
            expanded: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn contains_tag(&self, tag: i32) -> bool {
        self.tag == tag || self.children.iter().any(|child| child.contains_tag(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProperty {
    pub name: String,
    pub value: String,
}
