//! Geometry helpers shared by the desktop reducer: zoom bounds, viewport clamping, default
//! placement, and focus-stack derived z-order.

use desktop_app_contract::AppKey;

use crate::{
    config::WindowManagerConfig,
    model::{PointerPosition, Viewport, WindowId, WindowMemory, WindowRect},
};

/// Scales a viewport length by `ratio`, rounding down to whole pixels.
fn scaled(len: i32, ratio: f64) -> i32 {
    // The epsilon keeps products like 1280 * 0.95 from landing one pixel short.
    (f64::from(len) * ratio + 1e-9).floor() as i32
}

/// Returns the "maximized" rectangle for the given viewport.
///
/// Full viewport width (never narrower than the configured minimum), height minus the menu bar and
/// dock allowances, horizontally centered, vertical origin just below the menu bar.
pub fn zoomed_rect(viewport: Viewport, config: &WindowManagerConfig) -> WindowRect {
    let w = config.zoom_min_width.max(viewport.width);
    let h = config
        .zoom_min_height
        .max(viewport.height - config.menu_bar_height - config.dock_reserve);
    let x = 0.max((viewport.width - w).div_euclid(2));
    WindowRect {
        x,
        y: config.menu_bar_height,
        w,
        h,
    }
}

/// Clamps a window so it fits inside `viewport`. Applying it twice yields the same rectangle.
///
/// Never panics: degenerate input (negative sizes, coordinates near `i32` bounds) saturates.
pub fn clamp_to_viewport(
    rect: WindowRect,
    viewport: Viewport,
    config: &WindowManagerConfig,
) -> WindowRect {
    let w = rect
        .w
        .min(scaled(viewport.width, config.clamp_width_ratio))
        .max(0);
    let h = rect
        .h
        .min(scaled(viewport.height, config.clamp_height_ratio))
        .max(0);
    let x = rect.x.max(0).min(viewport.width.saturating_sub(w));
    let y = rect.y.max(0).min(viewport.height.saturating_sub(h));
    WindowRect { x, y, w, h }
}

/// Geometry for a window opened without explicit bounds.
///
/// Reuses the app's remembered geometry when present, otherwise centers a default-sized window
/// shrunk to fit small viewports.
pub fn default_placement(
    memory: &WindowMemory,
    app_key: &AppKey,
    viewport: Viewport,
    config: &WindowManagerConfig,
) -> WindowRect {
    if let Some(remembered) = memory.get(app_key) {
        return remembered;
    }

    let w = config
        .default_window_width
        .min(scaled(viewport.width, config.placement_width_ratio));
    let h = config
        .default_window_height
        .min(scaled(viewport.height, config.placement_height_ratio));
    WindowRect {
        x: 10.max((viewport.width - w).div_euclid(2)),
        y: 20.max((viewport.height - h).div_euclid(2)),
        w,
        h,
    }
}

/// z-index derived from focus-stack position. Ids missing from the stack sit at `base`.
pub fn z_index_for(focus_stack: &[WindowId], window_id: &WindowId, base: u32) -> u32 {
    let index = focus_stack
        .iter()
        .position(|id| id == window_id)
        .unwrap_or(0);
    base.saturating_add(index as u32)
}

/// Translation from a window's bottom-center to its dock icon, used as the minimize animation
/// target. A missing dock icon is treated as the screen origin.
pub fn genie_offset(rect: WindowRect, dock_icon: Option<PointerPosition>) -> PointerPosition {
    let target = dock_icon.unwrap_or(PointerPosition { x: 0, y: 0 });
    PointerPosition {
        x: target.x.saturating_sub(rect.x.saturating_add(rect.w / 2)),
        y: target.y.saturating_sub(rect.y.saturating_add(rect.h)),
    }
}
