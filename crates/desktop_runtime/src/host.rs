//! Browser host boundary: viewport queries, id salting, minimize timers, and window listeners.
//!
//! Everything that touches `web_sys` lives here so the reducer and store stay target-independent.
//! Off-wasm the queries fall back to fixed values, listeners are inert, and minimize timers are
//! recorded without being armed.

#[cfg(target_arch = "wasm32")]
use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::{ev, logging, on_cleanup, window_event_listener};

use crate::{
    model::{Viewport, WindowId},
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

/// Fallback timer for one pending minimize commit.
///
/// Off-wasm there is no event loop: the timer is only recorded, and the commit arrives through
/// [`DesktopRuntimeContext::animation_finished`] or [`DesktopRuntimeContext::fire_minimize_timer`].
#[derive(Debug, Clone, Copy)]
pub struct MinimizeTimer {
    #[cfg(target_arch = "wasm32")]
    handle: TimeoutHandle,
    /// Delay the timer was armed with.
    pub delay_ms: u32,
}

impl MinimizeTimer {
    fn clear(self) {
        #[cfg(target_arch = "wasm32")]
        self.handle.clear();
    }
}

/// Per-process seed mixed into generated window ids.
pub fn id_salt() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * f64::from(u32::MAX)) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::from(elapsed.subsec_nanos()) ^ elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// Current browser viewport. Falls back to 1280x720 when no window is available.
pub fn current_viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let fallback = Viewport::default();
        let width = window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value as i32)
            .unwrap_or(fallback.width);
        let height = window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value as i32)
            .unwrap_or(fallback.height);
        Viewport::new(width, height)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Viewport::default()
    }
}

/// Maps a keydown to a window shortcut: Cmd+W closes and Cmd+M minimizes the front window.
pub fn shortcut_action(key: &str, meta_key: bool) -> Option<DesktopAction> {
    if !meta_key {
        return None;
    }
    match key.to_ascii_lowercase().as_str() {
        "w" => Some(DesktopAction::CloseActiveWindow),
        "m" => Some(DesktopAction::MinimizeActiveWindow),
        _ => None,
    }
}

/// Arms the fallback timer that commits a minimize if the renderer never reports completion.
pub(crate) fn schedule_minimize_commit(
    runtime: DesktopRuntimeContext,
    window_id: WindowId,
    delay_ms: u32,
) {
    cancel_minimize_commit(runtime, &window_id);
    match arm_minimize_timer(runtime, window_id.clone(), delay_ms) {
        Ok(timer) => runtime.minimize_timers.update_value(|timers| {
            timers.insert(window_id, timer);
        }),
        Err(err) => {
            logging::warn!("minimize timer for `{window_id}` could not be armed: {err}");
            runtime.fire_minimize_timer(&window_id);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn arm_minimize_timer(
    runtime: DesktopRuntimeContext,
    window_id: WindowId,
    delay_ms: u32,
) -> Result<MinimizeTimer, String> {
    let handle = leptos::set_timeout_with_handle(
        move || {
            runtime.minimize_timers.update_value(|timers| {
                timers.remove(&window_id);
            });
            runtime.fire_minimize_timer(&window_id);
        },
        std::time::Duration::from_millis(u64::from(delay_ms)),
    )
    .map_err(|err| format!("{err:?}"))?;
    Ok(MinimizeTimer { handle, delay_ms })
}

#[cfg(not(target_arch = "wasm32"))]
fn arm_minimize_timer(
    _runtime: DesktopRuntimeContext,
    _window_id: WindowId,
    delay_ms: u32,
) -> Result<MinimizeTimer, String> {
    Ok(MinimizeTimer { delay_ms })
}

pub(crate) fn cancel_minimize_commit(runtime: DesktopRuntimeContext, window_id: &WindowId) {
    let mut cancelled = None;
    runtime.minimize_timers.update_value(|timers| {
        cancelled = timers.remove(window_id);
    });
    if let Some(timer) = cancelled {
        timer.clear();
    }
}

/// Re-clamps windows on `resize` and `orientationchange`, and once immediately on mount.
pub(crate) fn install_viewport_listeners(runtime: DesktopRuntimeContext) {
    runtime.dispatch_action(DesktopAction::ViewportResized {
        viewport: current_viewport(),
    });

    #[cfg(target_arch = "wasm32")]
    {
        let on_viewport_change = move |_: web_sys::Event| {
            runtime.dispatch_action(DesktopAction::ViewportResized {
                viewport: current_viewport(),
            });
        };
        let resize = leptos::window_event_listener_untyped("resize", on_viewport_change);
        let orientation =
            leptos::window_event_listener_untyped("orientationchange", on_viewport_change);
        on_cleanup(move || {
            resize.remove();
            orientation.remove();
        });
    }
}

/// Routes Cmd+W / Cmd+M to the front-most visible window.
pub(crate) fn install_shortcut_listener(runtime: DesktopRuntimeContext) {
    let listener = window_event_listener(ev::keydown, move |event| {
        if let Some(action) = shortcut_action(&event.key(), event.meta_key()) {
            event.prevent_default();
            runtime.dispatch_action(action);
        }
    });
    on_cleanup(move || listener.remove());
}
