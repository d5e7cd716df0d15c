/*
 * Recording backend used by the unit tests. It mimics the Win32 backend's
 * observable behavior: windows get increasing ids, delivered messages go
 * through the window's interceptor (falling back to "unhandled" on re-entry),
 * destruction drops the interceptor, and timers are fired by hand.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::message_router::{MessageOutcome, RawMessage};
use crate::native_host::{NativeWindowBackend, SharedInterceptor};
use crate::pixel_size::{DeviceTransform, DisplayScale};
use crate::types::{HostConfig, NativeWindowId, PixelSize, TimerId};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

pub(crate) const PARENT: NativeWindowId = NativeWindowId::from_raw(0x1000);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    Create {
        parent: NativeWindowId,
        size: PixelSize,
        class_name: String,
        control_id: i32,
        window: NativeWindowId,
    },
    Resize(NativeWindowId, PixelSize),
    Destroy(NativeWindowId),
    TrackLeave(NativeWindowId),
    Focus(NativeWindowId),
    StartTimer(Duration),
    StopTimer(TimerId),
}

pub(crate) struct MockBackend {
    calls: RefCell<Vec<BackendCall>>,
    interceptors: RefCell<HashMap<NativeWindowId, SharedInterceptor>>,
    timers: RefCell<HashMap<TimerId, Box<dyn FnMut()>>>,
    next_id: Cell<isize>,
    pub fail_create: Cell<bool>,
    pub fail_resize: Cell<bool>,
    pub fail_track: Cell<bool>,
    pub fail_timer: Cell<bool>,
    pub window_dpi: Cell<Option<u32>>,
    pub default_dpi: Cell<Option<u32>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            interceptors: RefCell::new(HashMap::new()),
            timers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0x2000),
            fail_create: Cell::new(false),
            fail_resize: Cell::new(false),
            fail_track: Cell::new(false),
            fail_timer: Cell::new(false),
            window_dpi: Cell::new(Some(96)),
            default_dpi: Cell::new(Some(96)),
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub fn resize_calls(&self) -> Vec<PixelSize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Resize(_, size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    pub fn destroy_calls(&self) -> Vec<NativeWindowId> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Destroy(window) => Some(*window),
                _ => None,
            })
            .collect()
    }

    pub fn track_leave_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, BackendCall::TrackLeave(_)))
            .count()
    }

    pub fn has_call(&self, expected: &BackendCall) -> bool {
        self.calls.borrow().iter().any(|call| call == expected)
    }

    /// Delivers a message the way the subclassed window procedure does.
    pub fn deliver(&self, window: NativeWindowId, message: RawMessage) -> MessageOutcome {
        let interceptor = self.interceptors.borrow().get(&window).cloned();
        match interceptor {
            Some(interceptor) => interceptor.intercept(window, &message),
            None => MessageOutcome::unhandled(),
        }
    }

    pub fn active_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Fires every running timer once.
    pub fn fire_timers(&self) {
        let ids: Vec<TimerId> = self.timers.borrow().keys().copied().collect();
        for id in ids {
            let callback = self.timers.borrow_mut().remove(&id);
            if let Some(mut callback) = callback {
                callback();
                self.timers.borrow_mut().insert(id, callback);
            }
        }
    }

    fn record(&self, call: BackendCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_id(&self) -> isize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl DisplayScale for MockBackend {
    fn window_transform(&self, _window: NativeWindowId) -> Option<DeviceTransform> {
        self.window_dpi.get().map(|dpi| DeviceTransform::from_dpi(dpi, dpi))
    }

    fn default_transform(&self) -> PlatformResult<DeviceTransform> {
        self.default_dpi
            .get()
            .map(|dpi| DeviceTransform::from_dpi(dpi, dpi))
            .ok_or_else(|| PlatformError::DisplayUnavailable("mock screen unavailable".into()))
    }
}

impl NativeWindowBackend for MockBackend {
    fn create_child_window(
        &self,
        parent: NativeWindowId,
        size: PixelSize,
        config: &HostConfig,
        interceptor: SharedInterceptor,
    ) -> PlatformResult<NativeWindowId> {
        if self.fail_create.get() {
            return Err(PlatformError::OperationFailed("mock creation failure".into()));
        }
        let window = NativeWindowId::from_raw(self.allocate_id());
        self.interceptors.borrow_mut().insert(window, interceptor);
        self.record(BackendCall::Create {
            parent,
            size,
            class_name: config.class_name.clone(),
            control_id: config.host_control_id,
            window,
        });
        Ok(window)
    }

    fn set_window_size(&self, window: NativeWindowId, size: PixelSize) -> PlatformResult<()> {
        if self.fail_resize.get() {
            return Err(PlatformError::OperationFailed("mock resize failure".into()));
        }
        self.record(BackendCall::Resize(window, size));
        Ok(())
    }

    fn destroy_window(&self, window: NativeWindowId) -> PlatformResult<()> {
        self.interceptors.borrow_mut().remove(&window);
        self.record(BackendCall::Destroy(window));
        Ok(())
    }

    fn track_mouse_leave(&self, window: NativeWindowId) -> PlatformResult<()> {
        if self.fail_track.get() {
            return Err(PlatformError::OperationFailed("mock tracking failure".into()));
        }
        self.record(BackendCall::TrackLeave(window));
        Ok(())
    }

    fn set_focus(&self, window: NativeWindowId) {
        self.record(BackendCall::Focus(window));
    }

    fn start_frame_timer(
        &self,
        interval: Duration,
        tick: Box<dyn FnMut()>,
    ) -> PlatformResult<TimerId> {
        if self.fail_timer.get() {
            return Err(PlatformError::InitializationFailed("mock timer failure".into()));
        }
        let id = TimerId(self.allocate_id() as usize);
        self.timers.borrow_mut().insert(id, tick);
        self.record(BackendCall::StartTimer(interval));
        Ok(id)
    }

    fn stop_frame_timer(&self, timer: TimerId) {
        self.timers.borrow_mut().remove(&timer);
        self.record(BackendCall::StopTimer(timer));
    }
}
