//! Headless window-manager store: owns [`DesktopState`], applies reducer actions as whole-state
//! replacements, notifies subscribers, and tracks pending minimize commits per window.

use std::collections::{BTreeMap, BTreeSet};

use leptos::logging;

use crate::{
    apps,
    config::WindowManagerConfig,
    host,
    model::{DesktopState, DockEntry, PointerPosition, WindowId, WindowRecord},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_manager::{genie_offset, z_index_for},
};

/// Handle returned by [`DesktopStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn Fn(&DesktopState)>;

/// Single-threaded state container shared by every consumer of window state.
///
/// Listeners run synchronously after each state change and receive the new state.
pub struct DesktopStore {
    config: WindowManagerConfig,
    state: DesktopState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    pending_minimize: BTreeSet<WindowId>,
}

impl DesktopStore {
    /// Creates a store with no windows, the catalog's desktop icons, and a per-process id salt.
    pub fn new(config: WindowManagerConfig) -> Self {
        let state = DesktopState::with_id_salt(host::id_salt())
            .with_desktop_icons(apps::initial_desktop_icons());
        Self::with_state(config, state)
    }

    /// Creates a store around an existing state.
    pub fn with_state(config: WindowManagerConfig, state: DesktopState) -> Self {
        Self {
            config,
            state,
            listeners: Vec::new(),
            next_subscription: 1,
            pending_minimize: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn windows(&self) -> &BTreeMap<WindowId, WindowRecord> {
        &self.state.windows
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn focus_stack(&self) -> &[WindowId] {
        &self.state.focus_stack
    }

    pub fn dock(&self) -> &[DockEntry] {
        &self.state.dock
    }

    /// Render layer for a live window, derived from its focus-stack position.
    pub fn z_index(&self, window_id: &WindowId) -> Option<u32> {
        self.state.contains(window_id).then(|| {
            z_index_for(
                &self.state.focus_stack,
                window_id,
                self.config.z_index_base,
            )
        })
    }

    /// Minimize animation translation toward the window's dock icon.
    pub fn genie_target(&self, window_id: &WindowId) -> Option<PointerPosition> {
        let window = self.state.window(window_id)?;
        Some(genie_offset(
            window.rect,
            self.state.dock_icon_position(&window.app_key),
        ))
    }

    pub fn has_pending_minimize(&self, window_id: &WindowId) -> bool {
        self.pending_minimize.contains(window_id)
    }

    /// Registers a listener that runs after every state change.
    pub fn subscribe(&mut self, listener: impl Fn(&DesktopState) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Applies `action` and returns the effects the host still has to execute.
    ///
    /// Actions referencing a missing window leave state unchanged; the reducer error is logged
    /// and no effects are returned.
    pub fn dispatch(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        let mut next = self.state.clone();
        match reduce_desktop(&mut next, &self.config, action) {
            Ok(effects) => {
                self.track_minimize_commits(&effects);
                if next != self.state {
                    self.state = next;
                    self.notify();
                }
                effects
            }
            Err(err) => {
                logging::warn!("desktop reducer error: {err}");
                Vec::new()
            }
        }
    }

    /// Timer callback for a scheduled minimize commit.
    ///
    /// A timer whose commit was cancelled (window closed, restored, or reopened) is ignored.
    pub fn fire_minimize_timer(&mut self, window_id: &WindowId) -> Vec<RuntimeEffect> {
        if !self.pending_minimize.remove(window_id) {
            logging::debug_warn!("ignoring stale minimize timer for `{window_id}`");
            return Vec::new();
        }
        self.dispatch(DesktopAction::CompleteMinimize {
            window_id: window_id.clone(),
        })
    }

    /// Commits a minimize as soon as the renderer reports the animation finished.
    pub fn animation_finished(&mut self, window_id: &WindowId) -> Vec<RuntimeEffect> {
        self.pending_minimize.remove(window_id);
        self.dispatch(DesktopAction::CompleteMinimize {
            window_id: window_id.clone(),
        })
    }

    fn track_minimize_commits(&mut self, effects: &[RuntimeEffect]) {
        for effect in effects {
            match effect {
                RuntimeEffect::ScheduleMinimizeCommit { window_id, .. } => {
                    self.pending_minimize.insert(window_id.clone());
                }
                RuntimeEffect::CancelMinimizeCommit(window_id) => {
                    self.pending_minimize.remove(window_id);
                }
                RuntimeEffect::NotifyLifecycle { .. } | RuntimeEffect::PlaySound(_) => {}
            }
        }
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

impl Default for DesktopStore {
    fn default() -> Self {
        Self::new(WindowManagerConfig::default())
    }
}

impl std::fmt::Debug for DesktopStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopStore")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("pending_minimize", &self.pending_minimize)
            .finish()
    }
}
