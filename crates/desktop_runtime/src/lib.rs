//! Window-manager runtime for the retro desktop: window records, focus stack, dock, two-phase
//! minimize, and the Leptos provider that drives them in the browser.

pub mod apps;
pub mod config;
mod effect_executor;
pub mod host;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod store;
pub mod window_manager;

pub use config::{ConfigError, WindowManagerConfig};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{
    create_desktop_runtime, use_desktop_runtime, DesktopProvider, DesktopRuntimeContext,
};
pub use store::{DesktopStore, SubscriptionId};
