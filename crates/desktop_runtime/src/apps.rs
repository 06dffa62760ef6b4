//! App catalog generated from `apps.catalog.toml` at build time, plus launch-request helpers.

use std::sync::OnceLock;

use desktop_app_contract::{AppKey, AppMeta, LaunchProps};
use leptos::logging;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{DesktopIcon, OpenWindowRequest, PointerPosition, WindowRect};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

/// Key of the special window that describes another app.
pub const ABOUT_APP_KEY: &str = "about-app";

const ABOUT_WINDOW_WIDTH: i32 = 320;
const ABOUT_WINDOW_HEIGHT: i32 = 240;

const ICON_ROWS: usize = 6;
const ICON_GRID_ORIGIN: PointerPosition = PointerPosition { x: 80, y: 100 };
const ICON_GRID_STEP: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// One catalog entry.
pub struct AppDescriptor {
    pub key: AppKey,
    pub title: String,
    #[serde(flatten)]
    pub meta: AppMeta,
    /// Shown in the dock even when no window is open.
    pub pinned: bool,
    /// Gets a launcher icon in the initial desktop layout.
    pub show_on_desktop: bool,
}

/// All catalog entries in dock order.
pub fn app_registry() -> &'static [AppDescriptor] {
    static CATALOG: OnceLock<Vec<AppDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| match serde_json::from_str(APP_CATALOG_JSON) {
        Ok(entries) => entries,
        Err(err) => {
            logging::warn!("generated app catalog failed to parse: {err}");
            Vec::new()
        }
    })
}

pub fn app_descriptor(app_key: &AppKey) -> Option<&'static AppDescriptor> {
    app_registry()
        .iter()
        .find(|descriptor| &descriptor.key == app_key)
}

/// Window chrome flags for `app_key`; unknown apps get resizable, stretch-to-fit defaults.
pub fn app_meta(app_key: &AppKey) -> AppMeta {
    app_descriptor(app_key)
        .map(|descriptor| descriptor.meta)
        .unwrap_or_default()
}

/// Display title, falling back to the key itself.
pub fn app_title(app_key: &AppKey) -> String {
    app_descriptor(app_key)
        .map(|descriptor| descriptor.title.clone())
        .unwrap_or_else(|| app_key.to_string())
}

pub fn pinned_apps() -> Vec<&'static AppDescriptor> {
    app_registry()
        .iter()
        .filter(|descriptor| descriptor.pinned)
        .collect()
}

/// Initial desktop layout: catalog order filled column by column, six icons per column.
pub fn initial_desktop_icons() -> Vec<DesktopIcon> {
    app_registry()
        .iter()
        .filter(|descriptor| descriptor.show_on_desktop)
        .enumerate()
        .map(|(index, descriptor)| {
            let column = (index / ICON_ROWS) as i32;
            let row = (index % ICON_ROWS) as i32;
            DesktopIcon {
                app_key: descriptor.key.clone(),
                pinned: descriptor.pinned,
                position: PointerPosition {
                    x: ICON_GRID_ORIGIN.x + column * ICON_GRID_STEP,
                    y: ICON_GRID_ORIGIN.y + row * ICON_GRID_STEP,
                },
            }
        })
        .collect()
}

/// Open request used when an app is launched from the dock or desktop.
///
/// Geometry is left to the reducer so remembered bounds win over defaults.
pub fn default_open_request(app_key: AppKey) -> OpenWindowRequest {
    OpenWindowRequest::new(app_key)
}

/// Builds the small "about" window describing `app_key`.
///
/// Returns `None` for apps missing from the catalog.
pub fn open_about_app_request(app_key: &AppKey) -> Option<OpenWindowRequest> {
    let descriptor = app_descriptor(app_key)?;
    let mut props = LaunchProps::new();
    props.insert("appKey".to_string(), Value::from(app_key.as_str()));
    props.insert("title".to_string(), Value::from(descriptor.title.as_str()));
    props.insert(
        "description".to_string(),
        Value::from(format!("{} is part of the desktop", descriptor.title)),
    );

    Some(
        OpenWindowRequest::new(AppKey::trusted(ABOUT_APP_KEY))
            .with_rect(WindowRect::new(0, 0, ABOUT_WINDOW_WIDTH, ABOUT_WINDOW_HEIGHT))
            .with_props(props),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(raw: &str) -> AppKey {
        AppKey::new(raw).expect("valid key")
    }

    #[test]
    fn generated_catalog_parses_with_unique_keys() {
        let registry = app_registry();
        assert!(!registry.is_empty());
        let mut keys: Vec<&str> = registry.iter().map(|entry| entry.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), registry.len());
    }

    #[test]
    fn fixed_size_apps_are_not_resizable() {
        assert!(!app_meta(&key("synth")).resizable);
        assert!(!app_meta(&key("itunes")).resizable);
        assert!(app_meta(&key("finder")).resizable);
    }

    #[test]
    fn unknown_app_uses_default_meta_and_key_title() {
        let unknown = key("not-installed");
        assert_eq!(app_meta(&unknown), AppMeta::default());
        assert_eq!(app_title(&unknown), "not-installed");
        assert!(open_about_app_request(&unknown).is_none());
    }

    #[test]
    fn pinned_apps_follow_catalog_order() {
        let pinned: Vec<&str> = pinned_apps()
            .into_iter()
            .map(|entry| entry.key.as_str())
            .collect();
        assert_eq!(
            pinned,
            vec![
                "finder",
                "guestbook",
                "games",
                "wallpapers",
                "explorer",
                "terminal"
            ]
        );
    }

    #[test]
    fn initial_icons_fill_columns_of_six() {
        let icons = initial_desktop_icons();
        assert_eq!(icons.len(), 11);
        assert!(icons.iter().all(|icon| icon.app_key.as_str() != ABOUT_APP_KEY));

        assert_eq!(icons[0].app_key.as_str(), "finder");
        assert_eq!(icons[0].position, PointerPosition { x: 80, y: 100 });
        assert!(icons[0].pinned);
        assert_eq!(icons[5].position, PointerPosition { x: 80, y: 600 });
        assert_eq!(icons[6].position, PointerPosition { x: 180, y: 100 });

        let synth = icons
            .iter()
            .find(|icon| icon.app_key.as_str() == "synth")
            .expect("synth icon");
        assert!(!synth.pinned);
    }

    #[test]
    fn about_request_describes_target_app() {
        let request = open_about_app_request(&key("games")).expect("games is catalogued");
        assert_eq!(request.app_key.as_str(), ABOUT_APP_KEY);
        assert_eq!(request.rect, Some(WindowRect::new(0, 0, 320, 240)));
        let props = request.props.expect("about props");
        assert_eq!(props.get("appKey"), Some(&Value::from("games")));
        assert_eq!(props.get("title"), Some(&Value::from("igames")));
    }

    #[test]
    fn default_request_leaves_geometry_to_the_reducer() {
        let request = default_open_request(key("terminal"));
        assert_eq!(request.rect, None);
        assert_eq!(request.id, None);
        assert!(!request.minimized);
    }
}
