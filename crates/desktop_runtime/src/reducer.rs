//! Reducer actions, side-effect intents, and transition logic for the desktop window manager.

use desktop_app_contract::{AppKey, AppLifecycleEvent};
use thiserror::Error;

use crate::{
    config::WindowManagerConfig,
    model::{
        DesktopIcon, DesktopState, DockEntry, OpenWindowRequest, PointerPosition, Viewport,
        WindowId, WindowRecord, WindowRect,
    },
    window_manager::{clamp_to_viewport, default_placement, zoomed_rect},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Register a window and make it the active one.
    OpenWindow {
        /// Window descriptor.
        request: OpenWindowRequest,
        /// Viewport used for default placement and the mount-time clamp.
        viewport: Viewport,
    },
    /// Remove a window from the map, the focus stack, and the dock.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Move a window to the top of the focus stack.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Start the two-phase minimize: flag the window as minimizing and schedule the commit.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Commit a pending minimize once the animation is over.
    CompleteMinimize {
        /// Window whose minimize animation finished.
        window_id: WindowId,
    },
    /// Bring a window back from the dock and focus it.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Toggle between normal and zoomed geometry. Both directions report
    /// [`AppLifecycleEvent::Zoomed`].
    ToggleZoom {
        /// Window to zoom or un-zoom.
        window_id: WindowId,
        /// Viewport the zoomed bounds are computed from.
        viewport: Viewport,
    },
    /// Commit the final position of a drag.
    MoveWindow {
        /// Dragged window.
        window_id: WindowId,
        /// Final left edge.
        x: i32,
        /// Final top edge.
        y: i32,
    },
    /// Commit the final geometry of a resize.
    ResizeWindow {
        /// Resized window.
        window_id: WindowId,
        /// Final geometry; minimum sizes are enforced by the renderer.
        rect: WindowRect,
    },
    /// Clamp every window into a new viewport.
    ViewportResized {
        /// New viewport size.
        viewport: Viewport,
    },
    /// Record where an app's dock icon sits on screen.
    SetDockIconPosition {
        /// App owning the icon.
        app_key: AppKey,
        /// Icon center in screen coordinates.
        position: PointerPosition,
    },
    /// Dock click on a running window: restore it when minimized, focus it otherwise.
    ActivateDockWindow {
        /// Window bound to the clicked dock item.
        window_id: WindowId,
    },
    /// Dock or desktop icon launch: reuse the app's most recent window or open a new one.
    ActivateApp {
        /// App to activate.
        app_key: AppKey,
        /// Viewport for placement if a new window opens.
        viewport: Viewport,
    },
    /// Close the front-most visible window (Cmd+W).
    CloseActiveWindow,
    /// Minimize the front-most visible window (Cmd+M).
    MinimizeActiveWindow,
    /// Keep an app's icon in the dock even when it has no open window.
    PinApp {
        /// App whose desktop icon is pinned.
        app_key: AppKey,
    },
    /// Drop an app from the pinned dock set.
    UnpinApp {
        /// App whose desktop icon is unpinned.
        app_key: AppKey,
    },
    /// Drag a desktop icon to a new position.
    MoveDesktopIcon {
        /// App owning the icon.
        app_key: AppKey,
        /// New icon position in desktop coordinates.
        position: PointerPosition,
    },
    /// Move a desktop icon into the trash.
    MoveToTrash {
        /// App owning the icon.
        app_key: AppKey,
    },
    /// Put a trashed icon back at the end of the desktop layout.
    RestoreFromTrash {
        /// App owning the trashed icon.
        app_key: AppKey,
    },
    /// Permanently discard every trashed icon.
    EmptyTrash,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Arm the timer that dispatches [`DesktopAction::CompleteMinimize`].
    ScheduleMinimizeCommit {
        /// Window being minimized.
        window_id: WindowId,
        /// Delay matching the minimize animation.
        delay_ms: u32,
    },
    /// Drop a pending minimize commit for a window that was closed, restored, or replaced.
    CancelMinimizeCommit(WindowId),
    /// Report a lifecycle change to the app hosted in the window.
    NotifyLifecycle {
        /// Affected window.
        window_id: WindowId,
        /// Lifecycle event.
        event: AppLifecycleEvent,
    },
    /// Play a named system sound.
    PlaySound(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference a window that does not exist.
pub enum ReducerError {
    /// The target window id was not found in the current state. State is left untouched.
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
}

/// Applies a [`DesktopAction`] to the window-manager state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when a mutating action references a missing window.
/// [`DesktopAction::CompleteMinimize`] for a missing window is not an error: a close can race
/// the animation timer.
pub fn reduce_desktop(
    state: &mut DesktopState,
    config: &WindowManagerConfig,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow { request, viewport } => {
            let window_id = request
                .id
                .unwrap_or_else(|| state.next_window_id(&request.app_key));
            let placed = request.rect.unwrap_or_else(|| {
                default_placement(&state.window_memory, &request.app_key, viewport, config)
            });
            let rect = clamp_to_viewport(placed, viewport, config);
            state.window_memory.remember(&request.app_key, rect);

            let record = WindowRecord {
                id: window_id.clone(),
                app_key: request.app_key,
                rect,
                minimized: request.minimized,
                zoomed: request.zoomed,
                last_bounds: None,
                minimizing: false,
                props: request.props,
            };
            let dock_entry = record.minimized.then(|| DockEntry {
                app_key: record.app_key.clone(),
                window_id: window_id.clone(),
            });
            if let Some(replaced) = state.windows.insert(window_id.clone(), record) {
                if replaced.minimizing {
                    effects.push(RuntimeEffect::CancelMinimizeCommit(window_id.clone()));
                }
            }
            raise_to_top(state, &window_id);
            state.dock.retain(|entry| entry.window_id != window_id);
            state.dock.extend(dock_entry);

            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Mounted,
            });
            effects.push(RuntimeEffect::PlaySound("open"));
        }
        DesktopAction::CloseWindow { window_id } => {
            let removed = state
                .windows
                .remove(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            state.focus_stack.retain(|id| id != &window_id);
            state.dock.retain(|entry| entry.window_id != window_id);

            if removed.minimizing {
                effects.push(RuntimeEffect::CancelMinimizeCommit(window_id.clone()));
            }
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Closed,
            });
            effects.push(RuntimeEffect::PlaySound("close"));
        }
        DesktopAction::FocusWindow { window_id } => {
            ensure_exists(state, &window_id)?;
            if !state.is_active(&window_id) {
                raise_to_top(state, &window_id);
                effects.push(RuntimeEffect::NotifyLifecycle {
                    window_id,
                    event: AppLifecycleEvent::Focused,
                });
                effects.push(RuntimeEffect::PlaySound("focus"));
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            if window.minimized || window.minimizing {
                return Ok(effects);
            }
            window.minimizing = true;
            effects.push(RuntimeEffect::ScheduleMinimizeCommit {
                window_id: window_id.clone(),
                delay_ms: config.minimize_animation_ms,
            });
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Minimizing,
            });
            effects.push(RuntimeEffect::PlaySound("minimize"));
        }
        DesktopAction::CompleteMinimize { window_id } => {
            let Some(window) = state.windows.get_mut(&window_id) else {
                return Ok(effects);
            };
            if !window.minimizing {
                return Ok(effects);
            }
            window.minimizing = false;
            window.minimized = true;
            let entry = DockEntry {
                app_key: window.app_key.clone(),
                window_id: window_id.clone(),
            };
            state.dock.retain(|existing| existing.window_id != window_id);
            state.dock.push(entry);
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Minimized,
            });
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            let was_minimizing = window.minimizing;
            window.minimized = false;
            window.minimizing = false;
            raise_to_top(state, &window_id);
            state.dock.retain(|entry| entry.window_id != window_id);

            if was_minimizing {
                effects.push(RuntimeEffect::CancelMinimizeCommit(window_id.clone()));
            }
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Restored,
            });
        }
        DesktopAction::ToggleZoom {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, &window_id)?;
            if window.zoomed {
                if let Some(bounds) = window.last_bounds {
                    window.rect = bounds;
                }
                window.zoomed = false;
            } else {
                window.last_bounds = Some(window.rect);
                window.rect = zoomed_rect(viewport, config);
                window.zoomed = true;
            }
            // `Zoomed` marks the toggle itself; apps read `zoomed` for the direction.
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Zoomed,
            });
            effects.push(RuntimeEffect::PlaySound("zoom"));
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            let window = find_window_mut(state, &window_id)?;
            window.rect = window.rect.moved_to(x, y);
            let (app_key, rect) = (window.app_key.clone(), window.rect);
            state.window_memory.remember(&app_key, rect);
        }
        DesktopAction::ResizeWindow { window_id, rect } => {
            let window = find_window_mut(state, &window_id)?;
            window.rect = rect;
            let app_key = window.app_key.clone();
            state.window_memory.remember(&app_key, rect);
        }
        DesktopAction::ViewportResized { viewport } => {
            // Walk bottom-to-top so the front-most window of an app wins the memory slot.
            let ordered: Vec<WindowId> = state.focus_stack.clone();
            let unstacked: Vec<WindowId> = state
                .windows
                .keys()
                .filter(|id| !ordered.contains(id))
                .cloned()
                .collect();
            for window_id in unstacked.iter().chain(ordered.iter()) {
                let Some(window) = state.windows.get_mut(window_id) else {
                    continue;
                };
                window.rect = clamp_to_viewport(window.rect, viewport, config);
                let (app_key, rect) = (window.app_key.clone(), window.rect);
                state.window_memory.remember(&app_key, rect);
            }
        }
        DesktopAction::SetDockIconPosition { app_key, position } => {
            state.dock_icon_positions.insert(app_key, position);
        }
        DesktopAction::ActivateDockWindow { window_id } => {
            let window = state
                .window(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let next = if window.minimized || window.minimizing {
                DesktopAction::RestoreWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            effects.extend(reduce_desktop(state, config, next)?);
        }
        DesktopAction::ActivateApp { app_key, viewport } => {
            let next = match state.preferred_window_for_app(&app_key) {
                Some(window_id) => DesktopAction::ActivateDockWindow {
                    window_id: window_id.clone(),
                },
                None => DesktopAction::OpenWindow {
                    request: OpenWindowRequest::new(app_key),
                    viewport,
                },
            };
            effects.extend(reduce_desktop(state, config, next)?);
        }
        DesktopAction::CloseActiveWindow => {
            if let Some(window_id) = frontmost_visible_window(state) {
                effects.extend(reduce_desktop(
                    state,
                    config,
                    DesktopAction::CloseWindow { window_id },
                )?);
            }
        }
        DesktopAction::MinimizeActiveWindow => {
            if let Some(window_id) = frontmost_visible_window(state) {
                effects.extend(reduce_desktop(
                    state,
                    config,
                    DesktopAction::MinimizeWindow { window_id },
                )?);
            }
        }
        DesktopAction::PinApp { app_key } => set_pinned(state, &app_key, true),
        DesktopAction::UnpinApp { app_key } => set_pinned(state, &app_key, false),
        DesktopAction::MoveDesktopIcon { app_key, position } => {
            if let Some(icon) = desktop_icon_mut(state, &app_key) {
                icon.position = position;
            }
        }
        DesktopAction::MoveToTrash { app_key } => {
            if let Some(index) = state
                .desktop_icons
                .iter()
                .position(|icon| icon.app_key == app_key)
            {
                let icon = state.desktop_icons.remove(index);
                state.trash.push(icon);
                effects.push(RuntimeEffect::PlaySound("trash"));
            }
        }
        DesktopAction::RestoreFromTrash { app_key } => {
            if let Some(index) = state.trash.iter().position(|icon| icon.app_key == app_key) {
                let icon = state.trash.remove(index);
                state.desktop_icons.push(icon);
            }
        }
        DesktopAction::EmptyTrash => {
            if !state.trash.is_empty() {
                state.trash.clear();
                effects.push(RuntimeEffect::PlaySound("empty-trash"));
            }
        }
    }

    Ok(effects)
}

fn ensure_exists(state: &DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    if state.contains(window_id) {
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound(window_id.clone()))
    }
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .get_mut(window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

// Icon actions for apps without a desktop icon are no-ops, matching a click on a stale icon.
fn desktop_icon_mut<'a>(
    state: &'a mut DesktopState,
    app_key: &AppKey,
) -> Option<&'a mut DesktopIcon> {
    state
        .desktop_icons
        .iter_mut()
        .find(|icon| &icon.app_key == app_key)
}

fn set_pinned(state: &mut DesktopState, app_key: &AppKey, pinned: bool) {
    if let Some(icon) = desktop_icon_mut(state, app_key) {
        icon.pinned = pinned;
    }
}

/// Moves `window_id` to the end of the focus stack, dropping any earlier occurrence.
fn raise_to_top(state: &mut DesktopState, window_id: &WindowId) {
    state.focus_stack.retain(|id| id != window_id);
    state.focus_stack.push(window_id.clone());
}

/// Top-most window that is neither minimized nor animating toward the dock.
fn frontmost_visible_window(state: &DesktopState) -> Option<WindowId> {
    state
        .focus_stack
        .iter()
        .rev()
        .find(|id| {
            state
                .window(id)
                .map(|w| !w.minimized && !w.minimizing)
                .unwrap_or(false)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1280, 800);

    fn config() -> WindowManagerConfig {
        WindowManagerConfig::default()
    }

    fn reduce(state: &mut DesktopState, action: DesktopAction) -> Vec<RuntimeEffect> {
        reduce_desktop(state, &config(), action).expect("reduce")
    }

    fn open_at(state: &mut DesktopState, id: &str, app: &str, rect: WindowRect) -> WindowId {
        let window_id = WindowId::new(id);
        reduce(
            state,
            DesktopAction::OpenWindow {
                request: OpenWindowRequest::new(AppKey::trusted(app))
                    .with_id(window_id.clone())
                    .with_rect(rect),
                viewport: VIEWPORT,
            },
        );
        window_id
    }

    fn ids(raw: &[&str]) -> Vec<WindowId> {
        raw.iter().map(|id| WindowId::new(*id)).collect()
    }

    #[test]
    fn open_window_registers_and_focuses() {
        let mut state = DesktopState::default();
        let id = open_at(
            &mut state,
            "finder-abc",
            "finder",
            WindowRect::new(100, 100, 400, 300),
        );

        assert_eq!(state.focus_stack, ids(&["finder-abc"]));
        let record = state.window(&id).expect("record");
        assert_eq!(record.rect, WindowRect::new(100, 100, 400, 300));
        assert!(!record.minimized);
        assert!(!record.minimizing);
    }

    #[test]
    fn open_without_id_or_rect_mints_id_and_places_window() {
        let mut state = DesktopState::with_id_salt(42);
        let effects = reduce(
            &mut state,
            DesktopAction::OpenWindow {
                request: OpenWindowRequest::new(AppKey::trusted("games")),
                viewport: VIEWPORT,
            },
        );

        let id = state.active_window_id().expect("active").clone();
        assert!(id.as_str().starts_with("games-"));
        assert_eq!(
            state.window(&id).expect("record").rect,
            WindowRect::new(320, 190, 640, 420)
        );
        assert!(effects.contains(&RuntimeEffect::PlaySound("open")));
    }

    #[test]
    fn new_window_reuses_app_memory_from_last_move() {
        let mut state = DesktopState::default();
        let first = open_at(
            &mut state,
            "finder-1",
            "finder",
            WindowRect::new(100, 100, 400, 300),
        );
        reduce(
            &mut state,
            DesktopAction::MoveWindow {
                window_id: first,
                x: 220,
                y: 140,
            },
        );
        reduce(
            &mut state,
            DesktopAction::OpenWindow {
                request: OpenWindowRequest::new(AppKey::trusted("finder")),
                viewport: VIEWPORT,
            },
        );

        let second = state.active_window_id().expect("active").clone();
        assert_eq!(
            state.window(&second).expect("record").rect,
            WindowRect::new(220, 140, 400, 300)
        );
    }

    #[test]
    fn reopening_an_id_replaces_the_record_without_duplicating_stack_entries() {
        let mut state = DesktopState::default();
        open_at(&mut state, "finder-abc", "finder", WindowRect::new(0, 30, 200, 200));
        open_at(&mut state, "games-xyz", "games", WindowRect::new(10, 30, 200, 200));
        open_at(&mut state, "finder-abc", "finder", WindowRect::new(50, 60, 300, 300));

        assert_eq!(state.focus_stack, ids(&["games-xyz", "finder-abc"]));
        assert_eq!(state.windows.len(), 2);
    }

    #[test]
    fn open_carries_launch_props() {
        let mut state = DesktopState::default();
        let mut props = desktop_app_contract::LaunchProps::new();
        props.insert("path".to_string(), json!(["Trash"]));
        reduce(
            &mut state,
            DesktopAction::OpenWindow {
                request: OpenWindowRequest::new(AppKey::trusted("finder"))
                    .with_id(WindowId::new("finder-trash"))
                    .with_props(props.clone()),
                viewport: VIEWPORT,
            },
        );

        let record = state.window(&WindowId::new("finder-trash")).expect("record");
        assert_eq!(record.props.as_ref(), Some(&props));
    }

    #[test]
    fn opening_minimized_keeps_dock_in_sync() {
        let mut state = DesktopState::default();
        let mut request = OpenWindowRequest::new(AppKey::trusted("itunes"))
            .with_id(WindowId::new("itunes-1"))
            .with_rect(WindowRect::new(40, 40, 300, 200));
        request.minimized = true;
        reduce(
            &mut state,
            DesktopAction::OpenWindow {
                request,
                viewport: VIEWPORT,
            },
        );

        assert!(state.is_docked(&WindowId::new("itunes-1")));
    }

    #[test]
    fn focus_moves_window_to_top_of_stack() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        open_at(&mut state, "games-xyz", "games", WindowRect::new(120, 120, 400, 300));

        let effects = reduce(
            &mut state,
            DesktopAction::FocusWindow {
                window_id: finder.clone(),
            },
        );

        assert_eq!(state.focus_stack, ids(&["games-xyz", "finder-abc"]));
        assert!(state.is_active(&finder));
        assert!(effects.contains(&RuntimeEffect::NotifyLifecycle {
            window_id: finder,
            event: AppLifecycleEvent::Focused,
        }));
    }

    #[test]
    fn focusing_the_active_window_emits_nothing() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        let before = state.clone();

        let effects = reduce(&mut state, DesktopAction::FocusWindow { window_id: finder });

        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn missing_window_is_reported_and_state_is_untouched() {
        let mut state = DesktopState::default();
        open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        let before = state.clone();
        let ghost = WindowId::new("ghost");

        for action in [
            DesktopAction::CloseWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::FocusWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::MinimizeWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::RestoreWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::ToggleZoom {
                window_id: ghost.clone(),
                viewport: VIEWPORT,
            },
            DesktopAction::MoveWindow {
                window_id: ghost.clone(),
                x: 1,
                y: 1,
            },
        ] {
            let err = reduce_desktop(&mut state, &config(), action).expect_err("missing window");
            assert_eq!(err, ReducerError::WindowNotFound(ghost.clone()));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn minimize_is_two_phase() {
        let mut state = DesktopState::default();
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(100, 100, 400, 300));

        let effects = reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: games.clone(),
            },
        );
        let record = state.window(&games).expect("record");
        assert!(record.minimizing);
        assert!(!record.minimized);
        assert!(state.dock.is_empty());
        assert!(effects.contains(&RuntimeEffect::ScheduleMinimizeCommit {
            window_id: games.clone(),
            delay_ms: 500,
        }));

        reduce(
            &mut state,
            DesktopAction::CompleteMinimize {
                window_id: games.clone(),
            },
        );
        let record = state.window(&games).expect("record");
        assert!(!record.minimizing);
        assert!(record.minimized);
        assert_eq!(
            state.dock,
            vec![DockEntry {
                app_key: AppKey::trusted("games"),
                window_id: games,
            }]
        );
    }

    #[test]
    fn minimize_twice_schedules_a_single_commit() {
        let mut state = DesktopState::default();
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(100, 100, 400, 300));
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: games.clone(),
            },
        );
        let effects = reduce(&mut state, DesktopAction::MinimizeWindow { window_id: games });
        assert!(effects.is_empty());
    }

    #[test]
    fn complete_minimize_after_close_is_silent() {
        let mut state = DesktopState::default();
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(100, 100, 400, 300));
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: games.clone(),
            },
        );
        let effects = reduce(
            &mut state,
            DesktopAction::CloseWindow {
                window_id: games.clone(),
            },
        );
        assert!(effects.contains(&RuntimeEffect::CancelMinimizeCommit(games.clone())));

        let effects = reduce(&mut state, DesktopAction::CompleteMinimize { window_id: games });
        assert!(effects.is_empty());
        assert!(state.windows.is_empty());
        assert!(state.dock.is_empty());
    }

    #[test]
    fn restore_during_animation_cancels_the_commit() {
        let mut state = DesktopState::default();
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(100, 100, 400, 300));
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: games.clone(),
            },
        );
        let effects = reduce(
            &mut state,
            DesktopAction::RestoreWindow {
                window_id: games.clone(),
            },
        );
        assert!(effects.contains(&RuntimeEffect::CancelMinimizeCommit(games.clone())));

        reduce(
            &mut state,
            DesktopAction::CompleteMinimize {
                window_id: games.clone(),
            },
        );
        let record = state.window(&games).expect("record");
        assert!(!record.minimized);
        assert!(!state.is_docked(&games));
    }

    #[test]
    fn restore_clears_flags_refocuses_and_undocks() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(120, 120, 400, 300));
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: finder.clone(),
            },
        );
        reduce(
            &mut state,
            DesktopAction::CompleteMinimize {
                window_id: finder.clone(),
            },
        );
        reduce(
            &mut state,
            DesktopAction::FocusWindow {
                window_id: games.clone(),
            },
        );

        reduce(
            &mut state,
            DesktopAction::RestoreWindow {
                window_id: finder.clone(),
            },
        );

        let record = state.window(&finder).expect("record");
        assert!(!record.minimized);
        assert!(!record.minimizing);
        assert!(state.dock.is_empty());
        assert_eq!(state.focus_stack, vec![games, finder]);
    }

    #[test]
    fn zoom_round_trip_restores_pre_zoom_geometry() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));

        reduce(
            &mut state,
            DesktopAction::ToggleZoom {
                window_id: finder.clone(),
                viewport: VIEWPORT,
            },
        );
        let record = state.window(&finder).expect("record");
        assert!(record.zoomed);
        assert_eq!(record.rect, WindowRect::new(0, 24, 1280, 676));
        assert_eq!(record.last_bounds, Some(WindowRect::new(100, 100, 400, 300)));

        reduce(
            &mut state,
            DesktopAction::ToggleZoom {
                window_id: finder.clone(),
                viewport: VIEWPORT,
            },
        );
        let record = state.window(&finder).expect("record");
        assert!(!record.zoomed);
        assert_eq!(record.rect, WindowRect::new(100, 100, 400, 300));
        assert_eq!(record.last_bounds, Some(WindowRect::new(100, 100, 400, 300)));
    }

    #[test]
    fn unzoom_without_saved_bounds_keeps_geometry() {
        let mut state = DesktopState::default();
        let mut request = OpenWindowRequest::new(AppKey::trusted("finder"))
            .with_id(WindowId::new("finder-z"))
            .with_rect(WindowRect::new(10, 30, 500, 400));
        request.zoomed = true;
        reduce(
            &mut state,
            DesktopAction::OpenWindow {
                request,
                viewport: VIEWPORT,
            },
        );

        reduce(
            &mut state,
            DesktopAction::ToggleZoom {
                window_id: WindowId::new("finder-z"),
                viewport: VIEWPORT,
            },
        );
        let record = state.window(&WindowId::new("finder-z")).expect("record");
        assert!(!record.zoomed);
        assert_eq!(record.rect, WindowRect::new(10, 30, 500, 400));
    }

    #[test]
    fn resize_commits_geometry_and_memory() {
        let mut state = DesktopState::default();
        let term = open_at(&mut state, "terminal-1", "terminal", WindowRect::new(10, 30, 400, 300));
        let rect = WindowRect::new(15, 35, 520, 380);
        reduce(
            &mut state,
            DesktopAction::ResizeWindow {
                window_id: term.clone(),
                rect,
            },
        );

        assert_eq!(state.window(&term).expect("record").rect, rect);
        assert_eq!(
            state.window_memory.get(&AppKey::trusted("terminal")),
            Some(rect)
        );
    }

    #[test]
    fn viewport_resize_clamps_every_window_and_updates_memory() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(500, 450, 700, 300));
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(20, 40, 400, 300));
        let small = Viewport::new(640, 480);

        reduce(&mut state, DesktopAction::ViewportResized { viewport: small });

        assert_eq!(
            state.window(&finder).expect("record").rect,
            WindowRect::new(32, 180, 608, 300)
        );
        assert_eq!(
            state.window(&games).expect("record").rect,
            WindowRect::new(20, 40, 400, 300)
        );
        assert_eq!(
            state.window_memory.get(&AppKey::trusted("finder")),
            Some(WindowRect::new(32, 180, 608, 300))
        );
    }

    #[test]
    fn dock_click_restores_minimized_and_focuses_visible() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(120, 120, 400, 300));
        reduce(
            &mut state,
            DesktopAction::MinimizeWindow {
                window_id: games.clone(),
            },
        );
        reduce(
            &mut state,
            DesktopAction::CompleteMinimize {
                window_id: games.clone(),
            },
        );

        reduce(
            &mut state,
            DesktopAction::ActivateDockWindow {
                window_id: finder.clone(),
            },
        );
        assert!(state.is_active(&finder));

        reduce(
            &mut state,
            DesktopAction::ActivateDockWindow {
                window_id: games.clone(),
            },
        );
        assert!(state.is_active(&games));
        assert!(!state.window(&games).expect("record").minimized);
    }

    #[test]
    fn activate_app_reuses_existing_window_before_opening() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        open_at(&mut state, "games-xyz", "games", WindowRect::new(120, 120, 400, 300));

        reduce(
            &mut state,
            DesktopAction::ActivateApp {
                app_key: AppKey::trusted("finder"),
                viewport: VIEWPORT,
            },
        );
        assert_eq!(state.windows.len(), 2);
        assert!(state.is_active(&finder));

        reduce(
            &mut state,
            DesktopAction::ActivateApp {
                app_key: AppKey::trusted("terminal"),
                viewport: VIEWPORT,
            },
        );
        assert_eq!(state.windows.len(), 3);
        let active = state.active_window_id().expect("active");
        assert_eq!(
            state.window(active).expect("record").app_key,
            AppKey::trusted("terminal")
        );
    }

    #[test]
    fn keyboard_shortcuts_skip_windows_heading_to_the_dock() {
        let mut state = DesktopState::default();
        let finder = open_at(&mut state, "finder-abc", "finder", WindowRect::new(100, 100, 400, 300));
        let games = open_at(&mut state, "games-xyz", "games", WindowRect::new(120, 120, 400, 300));
        reduce(&mut state, DesktopAction::MinimizeActiveWindow);
        assert!(state.window(&games).expect("record").minimizing);

        reduce(&mut state, DesktopAction::CloseActiveWindow);
        assert!(!state.contains(&finder));
        assert!(state.contains(&games));
    }

    #[test]
    fn keyboard_shortcuts_without_windows_are_noops() {
        let mut state = DesktopState::default();
        assert!(reduce(&mut state, DesktopAction::CloseActiveWindow).is_empty());
        assert!(reduce(&mut state, DesktopAction::MinimizeActiveWindow).is_empty());
    }

    #[test]
    fn dock_icon_positions_are_recorded_per_app() {
        let mut state = DesktopState::default();
        reduce(
            &mut state,
            DesktopAction::SetDockIconPosition {
                app_key: AppKey::trusted("games"),
                position: PointerPosition { x: 500, y: 780 },
            },
        );
        assert_eq!(
            state.dock_icon_position(&AppKey::trusted("games")),
            Some(PointerPosition { x: 500, y: 780 })
        );
    }

    fn icon(app: &str, pinned: bool, x: i32, y: i32) -> DesktopIcon {
        DesktopIcon {
            app_key: AppKey::trusted(app),
            pinned,
            position: PointerPosition { x, y },
        }
    }

    fn desktop_with_icons() -> DesktopState {
        DesktopState::default().with_desktop_icons(vec![
            icon("finder", true, 80, 100),
            icon("calendar", false, 80, 200),
            icon("synth", false, 80, 300),
        ])
    }

    fn icon_keys(icons: &[DesktopIcon]) -> Vec<&str> {
        icons.iter().map(|icon| icon.app_key.as_str()).collect()
    }

    #[test]
    fn unzoom_reports_zoomed_lifecycle_and_restores_bounds() {
        let mut state = DesktopState::default();
        let original = WindowRect::new(100, 100, 400, 300);
        let finder = open_at(&mut state, "finder-abc", "finder", original);
        let toggle = DesktopAction::ToggleZoom {
            window_id: finder.clone(),
            viewport: VIEWPORT,
        };
        reduce(&mut state, toggle.clone());

        let effects = reduce(&mut state, toggle);

        assert_eq!(
            effects,
            vec![
                RuntimeEffect::NotifyLifecycle {
                    window_id: finder.clone(),
                    event: AppLifecycleEvent::Zoomed,
                },
                RuntimeEffect::PlaySound("zoom"),
            ]
        );
        let record = state.window(&finder).expect("record");
        assert!(!record.zoomed);
        assert_eq!(record.rect, original);
    }

    #[test]
    fn pin_and_unpin_toggle_dock_membership() {
        let mut state = desktop_with_icons();
        let calendar = AppKey::trusted("calendar");

        reduce(
            &mut state,
            DesktopAction::PinApp {
                app_key: calendar.clone(),
            },
        );
        assert!(state.is_pinned(&calendar));
        assert_eq!(
            state.dock_apps(),
            vec![&AppKey::trusted("finder"), &calendar]
        );

        reduce(
            &mut state,
            DesktopAction::UnpinApp {
                app_key: AppKey::trusted("finder"),
            },
        );
        assert!(!state.is_pinned(&AppKey::trusted("finder")));
        assert_eq!(state.dock_apps(), vec![&calendar]);
    }

    #[test]
    fn icon_actions_for_unknown_apps_are_noops() {
        let mut state = desktop_with_icons();
        let before = state.clone();
        let ghost = AppKey::trusted("ghost");

        for action in [
            DesktopAction::PinApp {
                app_key: ghost.clone(),
            },
            DesktopAction::UnpinApp {
                app_key: ghost.clone(),
            },
            DesktopAction::MoveDesktopIcon {
                app_key: ghost.clone(),
                position: PointerPosition { x: 1, y: 1 },
            },
            DesktopAction::MoveToTrash {
                app_key: ghost.clone(),
            },
            DesktopAction::RestoreFromTrash {
                app_key: AppKey::trusted("finder"),
            },
            DesktopAction::EmptyTrash,
        ] {
            assert!(reduce(&mut state, action).is_empty());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn move_desktop_icon_updates_only_that_icon() {
        let mut state = desktop_with_icons();
        reduce(
            &mut state,
            DesktopAction::MoveDesktopIcon {
                app_key: AppKey::trusted("calendar"),
                position: PointerPosition { x: 420, y: 260 },
            },
        );

        assert_eq!(
            state.desktop_icons,
            vec![
                icon("finder", true, 80, 100),
                icon("calendar", false, 420, 260),
                icon("synth", false, 80, 300),
            ]
        );
    }

    #[test]
    fn trash_round_trip_appends_restored_icon() {
        let mut state = desktop_with_icons();
        let finder = AppKey::trusted("finder");

        let effects = reduce(
            &mut state,
            DesktopAction::MoveToTrash {
                app_key: finder.clone(),
            },
        );
        assert_eq!(effects, vec![RuntimeEffect::PlaySound("trash")]);
        assert_eq!(icon_keys(&state.desktop_icons), vec!["calendar", "synth"]);
        assert_eq!(icon_keys(&state.trash), vec!["finder"]);
        assert!(state.dock_apps().is_empty());

        reduce(
            &mut state,
            DesktopAction::RestoreFromTrash {
                app_key: finder.clone(),
            },
        );
        assert!(state.trash.is_empty());
        assert_eq!(
            icon_keys(&state.desktop_icons),
            vec!["calendar", "synth", "finder"]
        );
        assert!(state.is_pinned(&finder));
    }

    #[test]
    fn empty_trash_discards_icons_for_good() {
        let mut state = desktop_with_icons();
        let synth = AppKey::trusted("synth");
        reduce(
            &mut state,
            DesktopAction::MoveToTrash {
                app_key: synth.clone(),
            },
        );

        let effects = reduce(&mut state, DesktopAction::EmptyTrash);

        assert_eq!(effects, vec![RuntimeEffect::PlaySound("empty-trash")]);
        assert!(state.trash.is_empty());
        let restore = DesktopAction::RestoreFromTrash {
            app_key: synth.clone(),
        };
        assert!(reduce(&mut state, restore).is_empty());
        assert!(state.desktop_icon(&synth).is_none());
    }
}
