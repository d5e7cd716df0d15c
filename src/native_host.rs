/*
 * Owns the single native child window that hosts the render surface.
 *
 * `HostedWindow` creates the window through a `NativeWindowBackend`, resizes it
 * in place when the owning panel's pixel size changes, and destroys it exactly
 * once. Messages sent to the window reach `MessageInterceptor`, which the
 * backend and the host share: the backend's window procedure calls it for
 * every message and the owner installs the hook that decides what is handled.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::message_router::{MessageOutcome, RawMessage};
use crate::pixel_size::DisplayScale;
use crate::types::{HostConfig, NativeWindowId, PixelSize, TimerId};

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub type MessageHook = Box<dyn FnMut(NativeWindowId, &RawMessage) -> MessageOutcome>;
pub type SharedInterceptor = Rc<MessageInterceptor>;

/*
 * Dispatch point for messages delivered to a hosted window.
 *
 * The hook is moved out of its slot while it runs, so it may tear its own
 * window down: `clear_hook` from inside the hook marks the slot cleared and
 * the running hook is dropped once it returns instead of being put back.
 * Messages that arrive while the hook runs find the slot empty and are left
 * unhandled.
 */
#[derive(Default)]
pub struct MessageInterceptor {
    hook: RefCell<Option<MessageHook>>,
    cleared: Cell<bool>,
}

impl MessageInterceptor {
    pub fn set_hook(&self, hook: MessageHook) {
        self.cleared.set(false);
        *self.hook.borrow_mut() = Some(hook);
    }

    pub fn clear_hook(&self) {
        self.cleared.set(true);
        self.hook.borrow_mut().take();
    }

    pub fn has_hook(&self) -> bool {
        self.hook.borrow().is_some()
    }

    /// Without a hook every message is left to the default procedure.
    pub fn intercept(&self, window: NativeWindowId, message: &RawMessage) -> MessageOutcome {
        let Some(mut hook) = self.hook.borrow_mut().take() else {
            return MessageOutcome::unhandled();
        };
        let outcome = hook(window, message);

        let mut slot = self.hook.borrow_mut();
        if self.cleared.get() || slot.is_some() {
            log::trace!("MessageInterceptor: hook for {window:?} cleared or replaced while running");
        } else {
            *slot = Some(hook);
        }
        outcome
    }
}

impl std::fmt::Debug for MessageInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageInterceptor")
            .field("has_hook", &self.has_hook())
            .field("cleared", &self.cleared.get())
            .finish()
    }
}

/// Native windowing operations the host and panel depend on.
///
/// All calls happen on the UI thread.
pub trait NativeWindowBackend: DisplayScale {
    /// Creates a visible child window of `parent` at (0, 0) with `size` and
    /// routes its messages through `interceptor`.
    fn create_child_window(
        &self,
        parent: NativeWindowId,
        size: PixelSize,
        config: &HostConfig,
        interceptor: SharedInterceptor,
    ) -> PlatformResult<NativeWindowId>;

    /// Resizes without moving, activating or changing z-order.
    fn set_window_size(&self, window: NativeWindowId, size: PixelSize) -> PlatformResult<()>;

    fn destroy_window(&self, window: NativeWindowId) -> PlatformResult<()>;

    /// Requests a leave notification for `window`.
    fn track_mouse_leave(&self, window: NativeWindowId) -> PlatformResult<()>;

    fn set_focus(&self, window: NativeWindowId);

    fn start_frame_timer(
        &self,
        interval: Duration,
        tick: Box<dyn FnMut()>,
    ) -> PlatformResult<TimerId>;

    fn stop_frame_timer(&self, timer: TimerId);
}

pub struct HostedWindow<B: NativeWindowBackend> {
    backend: Rc<B>,
    handle: Option<NativeWindowId>,
    size: PixelSize,
    interceptor: SharedInterceptor,
}

impl<B: NativeWindowBackend> HostedWindow<B> {
    /*
     * Creates the child window. Sizes are passed through unchanged, including
     * zero or negative values; validating them is the caller's job.
     */
    pub fn create(
        backend: Rc<B>,
        parent: NativeWindowId,
        initial_size: PixelSize,
        config: &HostConfig,
    ) -> PlatformResult<Self> {
        if parent.is_null() {
            log::error!("HostedWindow: refusing to create a child of a null parent window");
            return Err(PlatformError::InvalidHandle(
                "parent window for hosted render surface is null".to_string(),
            ));
        }

        let interceptor = SharedInterceptor::default();
        let handle = backend
            .create_child_window(parent, initial_size, config, Rc::clone(&interceptor))
            .map_err(|err| {
                log::error!("HostedWindow: native window creation under {parent:?} failed: {err}");
                PlatformError::InitializationFailed(format!(
                    "creating hosted window under {parent:?} failed: {err}"
                ))
            })?;

        if handle.is_null() {
            return Err(PlatformError::InitializationFailed(format!(
                "backend returned a null hosted window under {parent:?}"
            )));
        }

        log::debug!(
            "HostedWindow: created {handle:?} under {parent:?} at {}x{}",
            initial_size.width,
            initial_size.height
        );
        Ok(Self {
            backend,
            handle: Some(handle),
            size: initial_size,
            interceptor,
        })
    }

    pub fn handle(&self) -> Option<NativeWindowId> {
        self.handle
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Returns `Ok(true)` when a native resize was issued.
    pub fn resize(&mut self, new_size: PixelSize) -> PlatformResult<bool> {
        let Some(handle) = self.handle else {
            log::warn!("HostedWindow: resize to {new_size:?} after destruction");
            return Err(PlatformError::InvalidHandle(
                "hosted window was already destroyed".to_string(),
            ));
        };

        if new_size == self.size {
            return Ok(false);
        }

        self.backend.set_window_size(handle, new_size)?;
        log::trace!("HostedWindow: {handle:?} resized {:?} -> {new_size:?}", self.size);
        self.size = new_size;
        Ok(true)
    }

    /// Destroys the native window. Later calls are no-ops.
    pub fn destroy(&mut self) {
        let Some(handle) = self.handle.take() else {
            log::debug!("HostedWindow: destroy called on an already destroyed host");
            return;
        };
        self.interceptor.clear_hook();
        if let Err(err) = self.backend.destroy_window(handle) {
            log::error!("HostedWindow: destroying {handle:?} failed: {err}");
        } else {
            log::debug!("HostedWindow: destroyed {handle:?}");
        }
    }

    pub fn set_message_hook(&self, hook: MessageHook) {
        self.interceptor.set_hook(hook);
    }

    pub fn intercept_message(&self, message: &RawMessage) -> MessageOutcome {
        let Some(handle) = self.handle else {
            return MessageOutcome::unhandled();
        };
        self.interceptor.intercept(handle, message)
    }
}

impl<B: NativeWindowBackend> Drop for HostedWindow<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_router::{HTCLIENT, WM_MOUSEMOVE, WM_NCHITTEST};
    use crate::test_support::{BackendCall, MockBackend, PARENT};

    fn host(backend: &Rc<MockBackend>, size: PixelSize) -> HostedWindow<MockBackend> {
        HostedWindow::create(Rc::clone(backend), PARENT, size, &HostConfig::default()).unwrap()
    }

    #[test]
    fn create_passes_width_and_height_in_order() {
        let backend = Rc::new(MockBackend::new());
        let hosted = host(&backend, PixelSize::new(640, 480));
        let handle = hosted.handle().unwrap();
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Create {
                parent: PARENT,
                size: PixelSize::new(640, 480),
                class_name: "STATIC".to_string(),
                control_id: 2,
                window: handle,
            }]
        );
    }

    #[test]
    fn create_accepts_degenerate_sizes() {
        let backend = Rc::new(MockBackend::new());
        let hosted = host(&backend, PixelSize::new(0, -5));
        assert_eq!(hosted.size(), PixelSize::new(0, -5));
    }

    #[test]
    fn creation_failure_is_fatal() {
        let backend = Rc::new(MockBackend::new());
        backend.fail_create.set(true);
        let result =
            HostedWindow::create(Rc::clone(&backend), PARENT, PixelSize::new(1, 1), &HostConfig::default());
        assert!(matches!(result, Err(PlatformError::InitializationFailed(_))));
    }

    #[test]
    fn null_parent_is_rejected() {
        let backend = Rc::new(MockBackend::new());
        let result = HostedWindow::create(
            Rc::clone(&backend),
            NativeWindowId::from_raw(0),
            PixelSize::new(1, 1),
            &HostConfig::default(),
        );
        assert!(matches!(result, Err(PlatformError::InvalidHandle(_))));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn resize_is_idempotent() {
        let backend = Rc::new(MockBackend::new());
        let mut hosted = host(&backend, PixelSize::new(100, 100));

        assert!(hosted.resize(PixelSize::new(200, 150)).unwrap());
        assert!(!hosted.resize(PixelSize::new(200, 150)).unwrap());
        assert!(!hosted.resize(PixelSize::new(200, 150)).unwrap());

        assert_eq!(backend.resize_calls(), vec![PixelSize::new(200, 150)]);
        assert_eq!(hosted.size(), PixelSize::new(200, 150));
    }

    #[test]
    fn resize_to_initial_size_issues_no_native_call() {
        let backend = Rc::new(MockBackend::new());
        let mut hosted = host(&backend, PixelSize::new(100, 100));
        assert!(!hosted.resize(PixelSize::new(100, 100)).unwrap());
        assert!(backend.resize_calls().is_empty());
    }

    #[test]
    fn failed_resize_keeps_previous_size() {
        let backend = Rc::new(MockBackend::new());
        let mut hosted = host(&backend, PixelSize::new(100, 100));
        backend.fail_resize.set(true);
        assert!(hosted.resize(PixelSize::new(50, 50)).is_err());
        assert_eq!(hosted.size(), PixelSize::new(100, 100));
    }

    #[test]
    fn destroy_twice_is_safe_and_invalidates_handle() {
        let backend = Rc::new(MockBackend::new());
        let mut hosted = host(&backend, PixelSize::new(10, 10));
        let handle = hosted.handle().unwrap();

        hosted.destroy();
        hosted.destroy();
        drop(hosted);

        assert_eq!(backend.destroy_calls(), vec![handle]);
    }

    #[test]
    fn resize_after_destroy_is_rejected() {
        let backend = Rc::new(MockBackend::new());
        let mut hosted = host(&backend, PixelSize::new(10, 10));
        hosted.destroy();
        assert!(hosted.handle().is_none());
        assert!(matches!(
            hosted.resize(PixelSize::new(20, 20)),
            Err(PlatformError::InvalidHandle(_))
        ));
    }

    #[test]
    fn drop_destroys_the_window() {
        let backend = Rc::new(MockBackend::new());
        let handle = host(&backend, PixelSize::new(10, 10)).handle().unwrap();
        assert_eq!(backend.destroy_calls(), vec![handle]);
    }

    #[test]
    fn intercept_defaults_to_unhandled() {
        let backend = Rc::new(MockBackend::new());
        let hosted = host(&backend, PixelSize::new(10, 10));
        let outcome = hosted.intercept_message(&RawMessage::new(WM_MOUSEMOVE, 0, 0));
        assert_eq!(outcome, MessageOutcome::unhandled());
    }

    #[test]
    fn installed_hook_sees_backend_delivered_messages() {
        let backend = Rc::new(MockBackend::new());
        let hosted = host(&backend, PixelSize::new(10, 10));
        let handle = hosted.handle().unwrap();
        hosted.set_message_hook(Box::new(|_: NativeWindowId, message: &RawMessage| {
            if message.msg == WM_NCHITTEST {
                MessageOutcome::handled(HTCLIENT)
            } else {
                MessageOutcome::unhandled()
            }
        }));

        let hit = backend.deliver(handle, RawMessage::new(WM_NCHITTEST, 0, 0));
        assert_eq!(hit, MessageOutcome::handled(HTCLIENT));
        let direct = hosted.intercept_message(&RawMessage::new(WM_NCHITTEST, 0, 0));
        assert_eq!(direct, MessageOutcome::handled(HTCLIENT));
        let other = backend.deliver(handle, RawMessage::new(WM_MOUSEMOVE, 0, 0));
        assert_eq!(other, MessageOutcome::unhandled());
    }

    #[test]
    fn hook_can_destroy_its_own_window() {
        let backend = Rc::new(MockBackend::new());
        let hosted = Rc::new(RefCell::new(host(&backend, PixelSize::new(10, 10))));
        let handle = hosted.borrow().handle().unwrap();

        let owner = Rc::clone(&hosted);
        hosted
            .borrow()
            .set_message_hook(Box::new(move |_: NativeWindowId, _: &RawMessage| {
                owner.borrow_mut().destroy();
                MessageOutcome::handled(0)
            }));

        let outcome = backend.deliver(handle, RawMessage::new(WM_MOUSEMOVE, 0, 0));
        assert_eq!(outcome, MessageOutcome::handled(0));
        assert_eq!(backend.destroy_calls(), vec![handle]);
        assert!(hosted.borrow().handle().is_none());
        assert_eq!(
            hosted.borrow().intercept_message(&RawMessage::new(WM_MOUSEMOVE, 0, 0)),
            MessageOutcome::unhandled()
        );
    }

    #[test]
    fn hook_cleared_while_running_is_not_restored() {
        let interceptor = SharedInterceptor::default();
        let inner = Rc::clone(&interceptor);
        interceptor.set_hook(Box::new(move |_: NativeWindowId, _: &RawMessage| {
            inner.clear_hook();
            MessageOutcome::handled(7)
        }));

        let window = NativeWindowId::from_raw(0x42);
        let message = RawMessage::new(WM_NCHITTEST, 0, 0);
        assert_eq!(interceptor.intercept(window, &message), MessageOutcome::handled(7));
        assert!(!interceptor.has_hook());
        assert_eq!(interceptor.intercept(window, &message), MessageOutcome::unhandled());
    }

    #[test]
    fn reentrant_messages_are_unhandled_and_hook_survives() {
        let interceptor = SharedInterceptor::default();
        let inner = Rc::clone(&interceptor);
        let nested = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&nested);
        interceptor.set_hook(Box::new(move |window: NativeWindowId, _: &RawMessage| {
            let again = inner.intercept(window, &RawMessage::new(WM_MOUSEMOVE, 0, 0));
            seen.borrow_mut().push(again);
            MessageOutcome::handled(1)
        }));

        let window = NativeWindowId::from_raw(0x42);
        let message = RawMessage::new(WM_NCHITTEST, 0, 0);
        assert_eq!(interceptor.intercept(window, &message), MessageOutcome::handled(1));
        assert_eq!(interceptor.intercept(window, &message), MessageOutcome::handled(1));
        assert_eq!(*nested.borrow(), vec![MessageOutcome::unhandled(); 2]);
        assert!(interceptor.has_hook());
    }
}
