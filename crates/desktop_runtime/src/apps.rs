pub use desktop_app_contract::ACCOUNT_APP_ID;
use desktop_app_contract::AppDefinition;

const ACCOUNT_APP: AppDefinition = AppDefinition {
    id: ACCOUNT_APP_ID,
    name: "Account",
    icon: "👤",
    color: "#e0e0e0",
};

const APP_REGISTRY: [AppDefinition; 12] = [
    AppDefinition {
        id: "google_drive_app",
        name: "Drive",
        icon: "🗂️",
        color: "#e3f2fd",
    },
    AppDefinition {
        id: "google_gmail_app",
        name: "Gmail",
        icon: "✉️",
        color: "#ffebee",
    },
    AppDefinition {
        id: "google_calendar_app",
        name: "Calendar",
        icon: "📅",
        color: "#e3f2fd",
    },
    AppDefinition {
        id: "google_docs_app",
        name: "Docs",
        icon: "📄",
        color: "#e8f0fe",
    },
    AppDefinition {
        id: "google_sheets_app",
        name: "Sheets",
        icon: "📊",
        color: "#e6f4ea",
    },
    AppDefinition {
        id: "google_slides_app",
        name: "Slides",
        icon: "📽️",
        color: "#fff1e3",
    },
    AppDefinition {
        id: "trash_bin",
        name: "Trash Bin",
        icon: "🗑️",
        color: "#ffebee",
    },
    AppDefinition {
        id: "notepad_app",
        name: "Notepad",
        icon: "📝",
        color: "#fffde7",
    },
    AppDefinition {
        id: "settings_app",
        name: "Settings",
        icon: "⚙️",
        color: "#e7f3ff",
    },
    AppDefinition {
        id: "web_browser_app",
        name: "Web",
        icon: "🌐",
        color: "#e0f7fa",
    },
    AppDefinition {
        id: "gaming_app",
        name: "Games",
        icon: "🎮",
        color: "#f3e5f5",
    },
    ACCOUNT_APP,
];

const DESKTOP_APP_IDS: [&str; 2] = ["google_drive_app", "trash_bin"];

const START_MENU_APP_IDS: [&str; 9] = [
    "google_gmail_app",
    "google_calendar_app",
    "google_docs_app",
    "google_sheets_app",
    "google_slides_app",
    "notepad_app",
    "settings_app",
    "web_browser_app",
    "gaming_app",
];

pub fn app_registry() -> &'static [AppDefinition] {
    &APP_REGISTRY
}

pub fn app_definition(app_id: &str) -> Option<AppDefinition> {
    app_registry().iter().copied().find(|app| app.id == app_id)
}

/// Apps shown as desktop icons, in registry order.
pub fn desktop_apps() -> Vec<AppDefinition> {
    app_registry()
        .iter()
        .copied()
        .filter(|app| DESKTOP_APP_IDS.contains(&app.id))
        .collect()
}

/// Apps listed in the start menu, sorted by display name.
pub fn start_menu_apps() -> Vec<AppDefinition> {
    let mut apps: Vec<_> = app_registry()
        .iter()
        .copied()
        .filter(|app| START_MENU_APP_IDS.contains(&app.id))
        .collect();
    apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    apps
}

/// The app behind the start menu's user button.
pub fn account_app() -> AppDefinition {
    ACCOUNT_APP
}
