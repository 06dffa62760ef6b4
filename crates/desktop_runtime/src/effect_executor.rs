//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use desktop_app_contract::AppLifecycleEvent;
use leptos::*;

use crate::{host, reducer::RuntimeEffect, runtime_context::DesktopRuntimeContext};

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before processing so effects emitted by nested dispatches land in a fresh
    // batch instead of being overwritten by the in-flight drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }
    });
}

fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    match effect {
        RuntimeEffect::ScheduleMinimizeCommit {
            window_id,
            delay_ms,
        } => host::schedule_minimize_commit(runtime, window_id, delay_ms),
        RuntimeEffect::CancelMinimizeCommit(window_id) => {
            host::cancel_minimize_commit(runtime, &window_id)
        }
        RuntimeEffect::NotifyLifecycle { window_id, event } => {
            runtime.lifecycle.update(|lifecycle| {
                if event == AppLifecycleEvent::Closed {
                    lifecycle.remove(&window_id);
                } else {
                    lifecycle.insert(window_id, event);
                }
            });
        }
        RuntimeEffect::PlaySound(cue) => runtime.sound_cue.set(Some(cue)),
    }
}
