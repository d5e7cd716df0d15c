/*
 * Translates the handful of window messages the render surface cares about
 * into `InputEvent`s. Everything here is pure: the router only classifies a
 * `RawMessage` and reports what should happen (result, handled flag, event,
 * focus request); performing side effects is left to the hook that calls it.
 *
 * The message numbers are defined locally so the routing logic compiles and is
 * tested on every platform. Several of them (e.g. WM_MOUSELEAVE) are not
 * exported by windows-rs anyway.
 */
use crate::types::InputEvent;

pub const WM_NCHITTEST: u32 = 0x0084;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_IME_SETCONTEXT: u32 = 0x0281;
pub const WM_MOUSELEAVE: u32 = 0x02A3;

/// Hit-test result for "client area".
pub const HTCLIENT: isize = 1;
/// Button-state bit for the left mouse button in mouse message `wParam`s.
pub const MK_LBUTTON: usize = 0x0001;
/// Raw wheel units per notch.
pub const WHEEL_DELTA: f32 = 120.0;

/// A window message as delivered to the hosted window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub const fn new(msg: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            msg,
            wparam,
            lparam,
        }
    }
}

/// What the window procedure should return for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageOutcome {
    pub result: isize,
    pub handled: bool,
}

impl MessageOutcome {
    pub const fn unhandled() -> Self {
        Self {
            result: 0,
            handled: false,
        }
    }

    pub const fn handled(result: isize) -> Self {
        Self {
            result,
            handled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedMessage {
    pub outcome: MessageOutcome,
    pub event: Option<InputEvent>,
    /// Input focus should be moved to the hosted window.
    pub focus_hosted_window: bool,
}

impl RoutedMessage {
    fn ignored() -> Self {
        Self {
            outcome: MessageOutcome::unhandled(),
            event: None,
            focus_hosted_window: false,
        }
    }

    fn handled_with(event: InputEvent) -> Self {
        Self {
            outcome: MessageOutcome::handled(0),
            event: Some(event),
            focus_hosted_window: false,
        }
    }
}

#[inline]
pub(crate) fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

#[inline]
pub(crate) fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

fn packed_position(lparam: isize) -> (f32, f32) {
    let bits = lparam as usize;
    (f32::from(loword(bits)), f32::from(hiword(bits)))
}

/*
 * Unpacks the mouse-related messages. This is the only place that knows how
 * coordinates, button bits and wheel deltas are packed into wParam/lParam.
 */
pub fn decode_mouse_message(message: &RawMessage) -> Option<InputEvent> {
    match message.msg {
        WM_MOUSEMOVE => {
            let (x, y) = packed_position(message.lparam);
            Some(InputEvent::MouseMove { x, y })
        }
        WM_LBUTTONDOWN | WM_LBUTTONUP => {
            let (x, y) = packed_position(message.lparam);
            Some(InputEvent::MouseButton {
                left: message.wparam & MK_LBUTTON != 0,
                right: false,
                x,
                y,
            })
        }
        WM_MOUSEWHEEL => {
            let raw_delta = hiword(message.wparam) as i16;
            Some(InputEvent::MouseWheel {
                delta: f32::from(raw_delta) / WHEEL_DELTA,
            })
        }
        WM_MOUSELEAVE => Some(InputEvent::MouseButton {
            left: false,
            right: false,
            x: 0.0,
            y: 0.0,
        }),
        _ => None,
    }
}

pub fn route_message(message: &RawMessage) -> RoutedMessage {
    match message.msg {
        WM_NCHITTEST => RoutedMessage {
            outcome: MessageOutcome::handled(HTCLIENT),
            event: Some(InputEvent::HitTestQuery),
            focus_hosted_window: false,
        },
        WM_IME_SETCONTEXT => {
            let active = loword(message.wparam) != 0;
            RoutedMessage {
                outcome: MessageOutcome::handled(0),
                event: Some(InputEvent::FocusContextChange { active }),
                focus_hosted_window: active,
            }
        }
        // Pressing into the surface takes keyboard focus from sibling controls.
        WM_LBUTTONDOWN => RoutedMessage {
            focus_hosted_window: true,
            ..route_mouse(message)
        },
        _ => route_mouse(message),
    }
}

fn route_mouse(message: &RawMessage) -> RoutedMessage {
    match decode_mouse_message(message) {
        Some(event) => RoutedMessage::handled_with(event),
        None => RoutedMessage::ignored(),
    }
}
