//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! Apps are addressed by a short [`AppKey`] (`finder`, `games`, ...). The runtime registry resolves
//! a key to the [`AppMeta`] flags the window chrome needs; the window manager does not interpret
//! those flags beyond handing them to the renderer.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum accepted length of an app key.
pub const MAX_APP_KEY_LEN: usize = 48;

/// Launch-time parameters handed to a hosted app (for example a requested initial path).
pub type LaunchProps = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Validation failures for [`AppKey::new`].
pub enum AppKeyError {
    /// The key was empty.
    #[error("app key must not be empty")]
    Empty,
    /// The key exceeded [`MAX_APP_KEY_LEN`].
    #[error("app key `{0}` is longer than {MAX_APP_KEY_LEN} characters")]
    TooLong(String),
    /// The key contained characters outside `[a-z0-9-]` or did not start with a letter.
    #[error("invalid app key `{0}`; expected lowercase letters, digits and `-`")]
    InvalidCharacters(String),
}

/// Stable identifier of an application bound to a window. Immutable once a window exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppKey(String);

impl AppKey {
    /// Returns an app key when `raw` is a lowercase slug such as `finder` or `about-app`.
    pub fn new(raw: impl Into<String>) -> Result<Self, AppKeyError> {
        let raw = raw.into();
        validate_app_key(&raw)?;
        Ok(Self(raw))
    }

    /// Creates a key without validation for compile-time trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AppKey {
    type Err = AppKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(raw)
    }
}

fn validate_app_key(raw: &str) -> Result<(), AppKeyError> {
    if raw.is_empty() {
        return Err(AppKeyError::Empty);
    }
    if raw.len() > MAX_APP_KEY_LEN {
        return Err(AppKeyError::TooLong(raw.to_string()));
    }
    let starts_with_letter = raw
        .chars()
        .next()
        .map(|c| c.is_ascii_lowercase())
        .unwrap_or(false);
    let charset_ok = raw
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !starts_with_letter || !charset_ok || raw.ends_with('-') {
        return Err(AppKeyError::InvalidCharacters(raw.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Window chrome flags declared by an app and passed through to the renderer.
pub struct AppMeta {
    /// Whether the window may be resized by the user.
    pub resizable: bool,
    /// Whether app content stretches to fill the window body.
    pub expand_to_fit: bool,
}

impl Default for AppMeta {
    fn default() -> Self {
        Self {
            resizable: true,
            expand_to_fit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events the window manager reports to hosted apps.
pub enum AppLifecycleEvent {
    /// App view has been mounted into a managed window.
    Mounted,
    /// Window became the top of the focus stack.
    Focused,
    /// Minimize animation started.
    Minimizing,
    /// Window finished minimizing and sits in the dock.
    Minimized,
    /// Window came back from the dock.
    Restored,
    /// Window toggled into or out of the zoomed bounds.
    Zoomed,
    /// Window was closed.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Minimizing => "minimizing",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Zoomed => "zoomed",
            Self::Closed => "closed",
        }
    }
}
