//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived [`DesktopStore`], mirrors its state into a reactive signal for
//! renderers, queues reducer effects for the executor, and installs the browser listeners.
#![allow(clippy::clone_on_copy)]

use std::collections::BTreeMap;

use desktop_app_contract::AppLifecycleEvent;
use leptos::*;

use crate::{
    config::WindowManagerConfig,
    effect_executor,
    host::{self, MinimizeTimer},
    model::{DesktopState, WindowId},
    reducer::{DesktopAction, RuntimeEffect},
    store::DesktopStore,
};

#[derive(Clone, Copy)]
/// Leptos context for reading window-manager state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Authoritative headless store.
    pub store: StoredValue<DesktopStore>,
    /// Reactive copy of the store state, updated after every change.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Latest lifecycle event per open window, readable by hosted apps.
    pub lifecycle: RwSignal<BTreeMap<WindowId, AppLifecycleEvent>>,
    /// Most recent UI sound cue (`open`, `close`, ...) for the audio layer to play.
    pub sound_cue: RwSignal<Option<&'static str>>,
    /// Armed minimize-commit timers keyed by window.
    pub minimize_timers: StoredValue<BTreeMap<WindowId, MinimizeTimer>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Commits a pending minimize when its fallback timer fires.
    pub fn fire_minimize_timer(&self, window_id: &WindowId) {
        apply_to_store(self.store, self.state, self.effects, |store| {
            store.fire_minimize_timer(window_id)
        });
    }

    /// Commits a minimize when the renderer reports that the exit animation finished.
    pub fn animation_finished(&self, window_id: &WindowId) {
        host::cancel_minimize_commit(*self, window_id);
        apply_to_store(self.store, self.state, self.effects, |store| {
            store.animation_finished(window_id)
        });
    }

    /// z-index for a window, derived from its focus-stack position.
    pub fn z_index(&self, window_id: &WindowId) -> Option<u32> {
        self.store.with_value(|store| store.z_index(window_id))
    }
}

/// Runs `update` against the store, then mirrors state and queues effects.
///
/// The signal write happens after the store borrow ends so subscribers may read the store.
fn apply_to_store(
    store: StoredValue<DesktopStore>,
    state: RwSignal<DesktopState>,
    effects: RwSignal<Vec<RuntimeEffect>>,
    update: impl FnOnce(&mut DesktopStore) -> Vec<RuntimeEffect>,
) {
    let mut new_effects = Vec::new();
    store.update_value(|store| new_effects = update(store));

    let next = store.with_value(|store| store.state().clone());
    if state.with_untracked(|current| current != &next) {
        state.set(next);
    }
    if !new_effects.is_empty() {
        effects.update(|queue| queue.extend(new_effects));
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    effect_executor::install(runtime);
    host::install_viewport_listeners(runtime);
    host::install_shortcut_listener(runtime);
}

/// Builds the reactive runtime around `store` and installs its effect executor and listeners.
///
/// Must run inside a Leptos reactive owner. Mounting re-clamps every window to the current
/// viewport.
pub fn create_desktop_runtime(store: DesktopStore) -> DesktopRuntimeContext {
    let store = store_value(store);
    let state = create_rw_signal(store.with_value(|store| store.state().clone()));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let lifecycle = create_rw_signal(BTreeMap::<WindowId, AppLifecycleEvent>::new());
    let sound_cue = create_rw_signal(None::<&'static str>);
    let minimize_timers = store_value(BTreeMap::<WindowId, MinimizeTimer>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        apply_to_store(store, state, effects, |store| store.dispatch(action));
    });

    let runtime = DesktopRuntimeContext {
        store,
        state,
        effects,
        lifecycle,
        sound_cue,
        minimize_timers,
        dispatch,
    };

    install_runtime_orchestration(runtime);
    runtime
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Geometry and timing configuration; defaults apply when omitted.
    #[prop(optional)]
    config: Option<WindowManagerConfig>,
    children: Children,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let config = match config.validate() {
        Ok(()) => config,
        Err(err) => {
            logging::warn!("window manager config rejected, using defaults: {err}");
            WindowManagerConfig::default()
        }
    };

    let runtime = create_desktop_runtime(DesktopStore::new(config));
    provide_context(runtime.clone());

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
