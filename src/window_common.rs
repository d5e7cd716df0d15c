/*
 * Win32 implementation of `NativeWindowBackend`.
 *
 * The render surface is a plain STATIC child window that we subclass: its
 * original window procedure is kept in `HostedWndData` (stored in
 * GWLP_USERDATA) together with the shared `MessageInterceptor`. The
 * subclass procedure offers every message to the interceptor first and only
 * falls through to the original procedure when the hook leaves it unhandled.
 * On WM_NCDESTROY the original procedure is restored and the data freed.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::frame_timer;
use crate::message_router::RawMessage;
use crate::native_host::{NativeWindowBackend, SharedInterceptor};
use crate::pixel_size::{DeviceTransform, DisplayScale};
use crate::types::{HostConfig, NativeWindowId, PixelSize, TimerId};

use std::ffi::c_void;
use std::rc::Rc;
use std::time::Duration;
use windows::Win32::{
    Foundation::{ERROR_INVALID_WINDOW_HANDLE, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
    Graphics::Gdi::{GetDC, GetDeviceCaps, LOGPIXELSX, LOGPIXELSY, ReleaseDC},
    System::LibraryLoader::GetModuleHandleW,
    UI::{
        HiDpi::GetDpiForWindow,
        Input::KeyboardAndMouse::{SetFocus, TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent},
        WindowsAndMessaging::{
            CallWindowProcW, CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA,
            GWLP_WNDPROC, GetWindowLongPtrW, HMENU, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER,
            SetWindowLongPtrW, SetWindowPos, WINDOW_EX_STYLE, WINDOW_STYLE, WM_NCDESTROY, WNDPROC,
            WS_CHILD, WS_VISIBLE,
        },
    },
};
use windows::core::HSTRING;

/// Strongly-typed window style for the hosted surface: a visible child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HostWindowStyle(WINDOW_STYLE);

impl HostWindowStyle {
    fn base() -> Self {
        Self(WS_CHILD | WS_VISIBLE)
    }

    const fn as_raw(self) -> WINDOW_STYLE {
        self.0
    }
}

pub(crate) fn hwnd_from_id(window: NativeWindowId) -> HWND {
    HWND(window.as_raw() as *mut c_void)
}

pub(crate) fn id_from_hwnd(hwnd: HWND) -> NativeWindowId {
    NativeWindowId::from_raw(hwnd.0 as isize)
}

/// Per-window data of a subclassed hosted window.
struct HostedWndData {
    previous_proc: isize,
    interceptor: SharedInterceptor,
}

unsafe extern "system" fn hosted_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        let data_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut HostedWndData;
        if data_ptr.is_null() {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        let previous_raw = (*data_ptr).previous_proc;
        let previous: WNDPROC = std::mem::transmute(previous_raw);

        if msg == WM_NCDESTROY {
            SetWindowLongPtrW(hwnd, GWLP_WNDPROC, previous_raw);
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(data_ptr));
            log::debug!("Win32Backend: unsubclassed hosted window {hwnd:?}");
            return CallWindowProcW(previous, hwnd, msg, wparam, lparam);
        }

        // The hook may destroy this window, which frees `data_ptr` from the
        // nested WM_NCDESTROY. Hold our own reference to the interceptor.
        let interceptor = Rc::clone(&(*data_ptr).interceptor);
        let message = RawMessage::new(msg, wparam.0, lparam.0);
        let outcome = interceptor.intercept(id_from_hwnd(hwnd), &message);

        if outcome.handled {
            LRESULT(outcome.result)
        } else {
            CallWindowProcW(previous, hwnd, msg, wparam, lparam)
        }
    }
}

#[derive(Debug)]
pub struct Win32Backend {
    h_instance: HINSTANCE,
}

impl Win32Backend {
    pub fn new() -> PlatformResult<Self> {
        let module = unsafe { GetModuleHandleW(None)? };
        Ok(Self {
            h_instance: HINSTANCE(module.0),
        })
    }
}

impl DisplayScale for Win32Backend {
    fn window_transform(&self, window: NativeWindowId) -> Option<DeviceTransform> {
        let dpi = unsafe { GetDpiForWindow(hwnd_from_id(window)) };
        (dpi != 0).then(|| DeviceTransform::from_dpi(dpi, dpi))
    }

    fn default_transform(&self) -> PlatformResult<DeviceTransform> {
        let hdc_screen = unsafe { GetDC(None) };
        if hdc_screen.is_invalid() {
            return Err(PlatformError::DisplayUnavailable(
                "could not acquire screen DC".to_string(),
            ));
        }
        let (dpi_x, dpi_y) = unsafe {
            (
                GetDeviceCaps(Some(hdc_screen), LOGPIXELSX),
                GetDeviceCaps(Some(hdc_screen), LOGPIXELSY),
            )
        };
        unsafe { ReleaseDC(None, hdc_screen) };

        if dpi_x <= 0 || dpi_y <= 0 {
            return Err(PlatformError::DisplayUnavailable(format!(
                "screen DC reported {dpi_x}x{dpi_y} DPI"
            )));
        }
        Ok(DeviceTransform::from_dpi(dpi_x as u32, dpi_y as u32))
    }
}

impl NativeWindowBackend for Win32Backend {
    fn create_child_window(
        &self,
        parent: NativeWindowId,
        size: PixelSize,
        config: &HostConfig,
        interceptor: SharedInterceptor,
    ) -> PlatformResult<NativeWindowId> {
        let hwnd_parent = hwnd_from_id(parent);
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                &HSTRING::from(config.class_name.as_str()),
                &HSTRING::new(),
                HostWindowStyle::base().as_raw(),
                0,
                0,
                size.width,
                size.height,
                Some(hwnd_parent),
                Some(HMENU(config.host_control_id as isize as *mut _)),
                Some(self.h_instance),
                None,
            )?
        };

        let data = Box::new(HostedWndData {
            previous_proc: unsafe { GetWindowLongPtrW(hwnd, GWLP_WNDPROC) },
            interceptor,
        });
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(data) as isize);
            #[allow(clippy::fn_to_numeric_cast)]
            let _ = SetWindowLongPtrW(hwnd, GWLP_WNDPROC, hosted_wnd_proc as isize);
        }

        log::debug!(
            "Win32Backend: created hosted '{}' window {hwnd:?} under {hwnd_parent:?}",
            config.class_name
        );
        Ok(id_from_hwnd(hwnd))
    }

    fn set_window_size(&self, window: NativeWindowId, size: PixelSize) -> PlatformResult<()> {
        unsafe {
            SetWindowPos(
                hwnd_from_id(window),
                None,
                0,
                0,
                size.width,
                size.height,
                SWP_NOACTIVATE | SWP_NOMOVE | SWP_NOZORDER,
            )?;
        }
        Ok(())
    }

    fn destroy_window(&self, window: NativeWindowId) -> PlatformResult<()> {
        let hwnd = hwnd_from_id(window);
        unsafe {
            if DestroyWindow(hwnd).is_err() {
                let last_error = GetLastError();
                if last_error.0 != ERROR_INVALID_WINDOW_HANDLE.0 {
                    log::error!("Win32Backend: DestroyWindow for {hwnd:?} failed: {last_error:?}");
                    return Err(PlatformError::OperationFailed(format!(
                        "DestroyWindow for {hwnd:?} failed: {last_error:?}"
                    )));
                }
                log::debug!("Win32Backend: {hwnd:?} was already destroyed");
            }
        }
        Ok(())
    }

    fn track_mouse_leave(&self, window: NativeWindowId) -> PlatformResult<()> {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd_from_id(window),
            dwHoverTime: 0,
        };
        unsafe { TrackMouseEvent(&mut tme)? };
        Ok(())
    }

    fn set_focus(&self, window: NativeWindowId) {
        if let Err(err) = unsafe { SetFocus(Some(hwnd_from_id(window))) } {
            log::debug!("Win32Backend: SetFocus on {window:?} failed: {err}");
        }
    }

    fn start_frame_timer(
        &self,
        interval: Duration,
        tick: Box<dyn FnMut()>,
    ) -> PlatformResult<TimerId> {
        frame_timer::start(interval, tick)
    }

    fn stop_frame_timer(&self, timer: TimerId) {
        frame_timer::stop(timer);
    }
}
