/*
 * Public entry point of the renderhost crate. It hosts a native render
 * surface (a Win32 child window) inside an application's window, translates
 * the surface's raw window messages into typed input events, converts layout
 * sizes to DPI-aware pixel sizes, and routes the model viewer's main-window
 * commands to a `MainWindowListener`.
 *
 * All decision logic is platform-agnostic and compiled everywhere so it can be
 * tested off Windows; the Win32 backend, frame timer and file dialogs are only
 * built for Windows targets.
 */
#[cfg(target_os = "windows")]
pub(crate) mod dialog_windows;
pub mod error;
pub mod file_dialogs;
#[cfg(target_os = "windows")]
pub(crate) mod frame_timer;
pub mod listener;
pub mod main_window;
pub mod message_router;
pub mod native_host;
pub mod pixel_size;
pub mod render_panel;
#[cfg(test)]
mod test_support;
pub mod types;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

#[cfg(target_os = "windows")]
pub use dialog_windows::Win32FileDialogs;
pub use error::{PlatformError, Result as PlatformResult};
pub use file_dialogs::{FileDialogRequest, FileDialogs, FileFilter};
pub use listener::MainWindowListener;
pub use main_window::MainWindow;
pub use message_router::{MessageOutcome, RawMessage, decode_mouse_message, route_message};
pub use native_host::{HostedWindow, MessageHook, MessageInterceptor, NativeWindowBackend};
pub use pixel_size::{DeviceTransform, DisplayScale, to_pixel_size};
pub use render_panel::{InputHandler, RenderPanel};
pub use types::{
    BoundsType, DebugToggle, HostConfig, InputEvent, LogicalSize, ModelFileKind, ModelProperty,
    NativeWindowId, PixelSize, RenderSurface, TimerId, TreeItem,
};
#[cfg(target_os = "windows")]
pub use window_common::Win32Backend;
