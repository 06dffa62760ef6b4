use std::collections::BTreeMap;

use desktop_app_contract::{AppKey, LaunchProps};
use serde::{Deserialize, Serialize};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SALT_WIDTH: usize = 4;

/// Process-wide window identifier of the form `<app-key>-<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    /// Wraps an externally supplied id (for example one minted by a launcher).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Builds the id for the `seq`-th window of a store seeded with `salt`.
    ///
    /// The salt is rendered at a fixed width so distinct sequence numbers never collide.
    pub fn generate(app_key: &AppKey, salt: u64, seq: u64) -> Self {
        let salt = to_base36(salt % 36u64.pow(ID_SALT_WIDTH as u32));
        Self(format!(
            "{app_key}-{salt:0>width$}{seq}",
            seq = to_base36(seq),
            width = ID_SALT_WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn moved_to(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// One open window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_key: AppKey,
    pub rect: WindowRect,
    /// Set once the minimize animation has completed.
    pub minimized: bool,
    pub zoomed: bool,
    /// Geometry captured by the most recent zoom.
    pub last_bounds: Option<WindowRect>,
    /// True only while the minimize animation plays.
    pub minimizing: bool,
    pub props: Option<LaunchProps>,
}

/// Restore affordance for a minimized window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockEntry {
    pub app_key: AppKey,
    pub window_id: WindowId,
}

/// Last committed geometry per app, kept in process memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowMemory {
    entries: BTreeMap<AppKey, WindowRect>,
}

impl WindowMemory {
    pub fn get(&self, app_key: &AppKey) -> Option<WindowRect> {
        self.entries.get(app_key).copied()
    }

    pub fn remember(&mut self, app_key: &AppKey, rect: WindowRect) {
        self.entries.insert(app_key.clone(), rect);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Launcher icon on the desktop. `pinned` icons also stay in the dock without open windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub app_key: AppKey,
    pub pinned: bool,
    pub position: PointerPosition,
}

/// Whole window-manager state. Every reducer transition replaces this value atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesktopState {
    pub windows: BTreeMap<WindowId, WindowRecord>,
    /// Recency-ordered window ids; the last element is the active window.
    pub focus_stack: Vec<WindowId>,
    pub dock: Vec<DockEntry>,
    pub window_memory: WindowMemory,
    pub dock_icon_positions: BTreeMap<AppKey, PointerPosition>,
    /// Desktop launcher icons in layout order.
    pub desktop_icons: Vec<DesktopIcon>,
    /// Icons removed from the desktop, restorable until the trash is emptied.
    pub trash: Vec<DesktopIcon>,
    pub id_salt: u64,
    pub next_window_seq: u64,
}

impl DesktopState {
    /// Creates an empty state whose generated window ids carry `id_salt`.
    pub fn with_id_salt(id_salt: u64) -> Self {
        Self {
            id_salt,
            ..Self::default()
        }
    }

    /// Replaces the desktop icon layout, typically with the catalog defaults.
    pub fn with_desktop_icons(mut self, icons: Vec<DesktopIcon>) -> Self {
        self.desktop_icons = icons;
        self
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.get(window_id)
    }

    pub fn contains(&self, window_id: &WindowId) -> bool {
        self.windows.contains_key(window_id)
    }

    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.focus_stack.last()
    }

    pub fn is_active(&self, window_id: &WindowId) -> bool {
        self.active_window_id() == Some(window_id)
    }

    /// Index of `window_id` in the focus stack; larger means visually higher.
    pub fn stack_position(&self, window_id: &WindowId) -> Option<usize> {
        self.focus_stack.iter().position(|id| id == window_id)
    }

    /// Windows ordered bottom-to-top for rendering.
    pub fn windows_in_stack_order(&self) -> Vec<&WindowRecord> {
        self.focus_stack
            .iter()
            .filter_map(|id| self.windows.get(id))
            .collect()
    }

    pub fn is_docked(&self, window_id: &WindowId) -> bool {
        self.dock.iter().any(|entry| &entry.window_id == window_id)
    }

    /// Most recently focused window of `app_key`, if any.
    pub fn preferred_window_for_app(&self, app_key: &AppKey) -> Option<&WindowId> {
        self.focus_stack.iter().rev().find(|id| {
            self.windows
                .get(*id)
                .map(|w| &w.app_key == app_key)
                .unwrap_or(false)
        })
    }

    pub fn desktop_icon(&self, app_key: &AppKey) -> Option<&DesktopIcon> {
        self.desktop_icons
            .iter()
            .find(|icon| &icon.app_key == app_key)
    }

    pub fn is_pinned(&self, app_key: &AppKey) -> bool {
        self.desktop_icon(app_key)
            .map(|icon| icon.pinned)
            .unwrap_or(false)
    }

    /// Apps shown in the dock: pinned icons in layout order, then apps with open windows.
    ///
    /// Apps without a desktop icon (for example trashed ones) get no dock slot.
    pub fn dock_apps(&self) -> Vec<&AppKey> {
        let mut apps: Vec<&AppKey> = self
            .desktop_icons
            .iter()
            .filter(|icon| icon.pinned)
            .map(|icon| &icon.app_key)
            .collect();
        for window in self.windows.values() {
            if self.desktop_icon(&window.app_key).is_some() && !apps.contains(&&window.app_key) {
                apps.push(&window.app_key);
            }
        }
        apps
    }

    pub fn dock_icon_position(&self, app_key: &AppKey) -> Option<PointerPosition> {
        self.dock_icon_positions.get(app_key).copied()
    }

    /// Mints an id for a new window of `app_key` that no live record uses.
    pub fn next_window_id(&mut self, app_key: &AppKey) -> WindowId {
        loop {
            let id = WindowId::generate(app_key, self.id_salt, self.next_window_seq);
            self.next_window_seq = self.next_window_seq.saturating_add(1);
            if !self.windows.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Descriptor accepted by the open transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    /// Caller-chosen id; minted from the app key when absent.
    pub id: Option<WindowId>,
    pub app_key: AppKey,
    /// Explicit geometry; default placement applies when absent.
    pub rect: Option<WindowRect>,
    pub minimized: bool,
    pub zoomed: bool,
    pub props: Option<LaunchProps>,
}

impl OpenWindowRequest {
    pub fn new(app_key: AppKey) -> Self {
        Self {
            id: None,
            app_key,
            rect: None,
            minimized: false,
            zoomed: false,
            props: None,
        }
    }

    pub fn with_id(mut self, id: WindowId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_rect(mut self, rect: WindowRect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_props(mut self, props: LaunchProps) -> Self {
        self.props = Some(props);
        self
    }
}
