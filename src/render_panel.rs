/*
 * The panel that embeds the render surface. It converts its logical layout
 * size into pixels, owns the `HostedWindow`, installs the message router as
 * the window's hook and forwards translated input to a single input handler.
 *
 * Callers only ever see `NativeWindowId`; the platform handle type stays in
 * the backend.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::message_router::{RawMessage, WM_MOUSELEAVE, WM_MOUSEMOVE, route_message};
use crate::native_host::{HostedWindow, MessageHook, NativeWindowBackend};
use crate::pixel_size::to_pixel_size;
use crate::types::{HostConfig, InputEvent, LogicalSize, NativeWindowId, PixelSize};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type InputHandler = Box<dyn FnMut(InputEvent)>;

type InputHandlerSlot = Rc<RefCell<Option<InputHandler>>>;

pub struct RenderPanel<B: NativeWindowBackend + 'static> {
    backend: Rc<B>,
    config: HostConfig,
    logical_size: LogicalSize,
    host: Option<HostedWindow<B>>,
    input_handler: InputHandlerSlot,
}

impl<B: NativeWindowBackend + 'static> RenderPanel<B> {
    pub fn new(backend: Rc<B>, config: HostConfig) -> Self {
        Self {
            backend,
            config,
            logical_size: LogicalSize::default(),
            host: None,
            input_handler: Rc::new(RefCell::new(None)),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.logical_size
    }

    pub fn set_input_handler(&self, handler: InputHandler) {
        *self.input_handler.borrow_mut() = Some(handler);
    }

    pub fn native_window(&self) -> Option<NativeWindowId> {
        self.host.as_ref().and_then(HostedWindow::handle)
    }

    /// Current pixel size of the panel's layout area.
    pub fn pixel_size(&self) -> PlatformResult<PixelSize> {
        to_pixel_size(&*self.backend, self.native_window(), self.logical_size)
    }

    /*
     * Creates the hosted window under `parent`, wires the router and asks for
     * leave notifications. The hosted window fills the panel without a margin,
     * so leave tracking is the only way the router learns the cursor left.
     */
    pub fn prepare_hwnd(&mut self, parent: NativeWindowId) -> PlatformResult<NativeWindowId> {
        if let Some(existing) = self.native_window() {
            log::warn!("RenderPanel: prepare_hwnd called twice (host {existing:?})");
            return Err(PlatformError::OperationFailed(format!(
                "render panel already hosts window {existing:?}"
            )));
        }

        let size = to_pixel_size(&*self.backend, Some(parent), self.logical_size)?;
        let host = HostedWindow::create(Rc::clone(&self.backend), parent, size, &self.config)?;
        let handle = host.handle().ok_or_else(|| {
            PlatformError::InitializationFailed("hosted window has no handle".to_string())
        })?;

        let tracking = self.config.track_mouse_leave
            && arm_leave_tracking(&*self.backend, handle);
        host.set_message_hook(router_hook(
            Rc::downgrade(&self.backend),
            Rc::clone(&self.input_handler),
            self.config.track_mouse_leave.then_some(tracking),
        ));

        log::debug!("RenderPanel: prepared host {handle:?} at {size:?}");
        self.host = Some(host);
        Ok(handle)
    }

    /// Layout changed; recompute the pixel size and resize the host in place.
    pub fn on_size_changed(&mut self, logical_size: LogicalSize) -> PlatformResult<()> {
        self.logical_size = logical_size;
        let Some(host) = self.host.as_mut() else {
            return Ok(());
        };
        let size = to_pixel_size(&*self.backend, host.handle(), logical_size)?;
        host.resize(size)?;
        Ok(())
    }

    pub fn teardown(&mut self) {
        if let Some(mut host) = self.host.take() {
            host.destroy();
        }
    }
}

fn arm_leave_tracking<B: NativeWindowBackend>(backend: &B, window: NativeWindowId) -> bool {
    match backend.track_mouse_leave(window) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("RenderPanel: leave tracking for {window:?} failed: {err}");
            false
        }
    }
}

/*
 * Builds the hook that routes the hosted window's messages. `leave_tracking`
 * is `None` when leave notifications are disabled, otherwise whether a
 * request is currently armed. The OS cancels the request once it reports a
 * leave, so the next mouse move arms it again.
 */
fn router_hook<B: NativeWindowBackend + 'static>(
    backend: Weak<B>,
    input_handler: InputHandlerSlot,
    mut leave_tracking: Option<bool>,
) -> MessageHook {
    Box::new(move |window: NativeWindowId, message: &RawMessage| {
        let routed = route_message(message);

        if let Some(tracking) = leave_tracking.as_mut() {
            match message.msg {
                WM_MOUSELEAVE => *tracking = false,
                WM_MOUSEMOVE if !*tracking => {
                    if let Some(backend) = backend.upgrade() {
                        *tracking = arm_leave_tracking(&*backend, window);
                    }
                }
                _ => {}
            }
        }

        if routed.focus_hosted_window
            && let Some(backend) = backend.upgrade()
        {
            backend.set_focus(window);
        }

        if let Some(event) = routed.event {
            match input_handler.try_borrow_mut() {
                Ok(mut slot) => {
                    if let Some(handler) = slot.as_mut() {
                        handler(event);
                    }
                }
                Err(_) => {
                    log::trace!("RenderPanel: dropped re-entrant input event {event:?}");
                }
            }
        }

        routed.outcome
    })
}
