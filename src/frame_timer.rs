/*
 * Window-less Win32 timers driving the per-frame update notification.
 *
 * `SetTimer` without a window calls back through a TIMERPROC that carries no
 * user data, so callbacks are kept in a thread-local registry keyed by the
 * timer id the system hands out. A callback is taken out of the registry while
 * it runs, which keeps a tick that stops its own timer from touching a
 * borrowed map.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::types::TimerId;

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{KillTimer, SetTimer},
};

type TickCallback = Box<dyn FnMut()>;

thread_local! {
    static FRAME_TIMERS: RefCell<HashMap<usize, Option<TickCallback>>> =
        RefCell::new(HashMap::new());
}

unsafe extern "system" fn frame_timer_proc(_hwnd: HWND, _msg: u32, timer_id: usize, _time: u32) {
    let callback = FRAME_TIMERS.with(|timers| {
        timers
            .borrow_mut()
            .get_mut(&timer_id)
            .and_then(Option::take)
    });
    let Some(mut callback) = callback else {
        return;
    };

    callback();

    FRAME_TIMERS.with(|timers| {
        // Stopped during the tick: the entry is gone and the callback is dropped.
        if let Some(slot) = timers.borrow_mut().get_mut(&timer_id) {
            *slot = Some(callback);
        }
    });
}

/// Clamps to the 1 ms minimum `SetTimer` accepts.
fn interval_millis(interval: Duration) -> u32 {
    u32::try_from(interval.as_millis()).unwrap_or(u32::MAX).max(1)
}

pub(crate) fn start(interval: Duration, tick: TickCallback) -> PlatformResult<TimerId> {
    let millis = interval_millis(interval);
    let timer_id = unsafe { SetTimer(None, 0, millis, Some(frame_timer_proc)) };
    if timer_id == 0 {
        log::error!("FrameTimer: SetTimer({millis} ms) failed");
        return Err(PlatformError::InitializationFailed(format!(
            "SetTimer for a {millis} ms frame timer failed"
        )));
    }
    FRAME_TIMERS.with(|timers| timers.borrow_mut().insert(timer_id, Some(tick)));
    log::debug!("FrameTimer: started timer {timer_id} every {millis} ms");
    Ok(TimerId(timer_id))
}

pub(crate) fn stop(timer: TimerId) {
    if let Err(err) = unsafe { KillTimer(None, timer.0) } {
        log::warn!("FrameTimer: KillTimer({}) failed: {err}", timer.0);
    }
    let removed = FRAME_TIMERS.with(|timers| timers.borrow_mut().remove(&timer.0));
    if removed.is_none() {
        log::debug!("FrameTimer: timer {} was not running", timer.0);
    }
}
