use desktop_app_contract::{AppDefinition, UserState};
use serde::{Deserialize, Serialize};

use crate::{
    history::InteractionHistory,
    path_cache::{InteractionPath, PathCache},
    streaming::ContentStreamState,
};

pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 0;
pub const SHUTDOWN_DELAY_MS: u64 = 2_500;
pub const DESKTOP_WINDOW_TITLE: &str = "DNA OS";

/// Tag of one generation request. Tokens only grow, including across reboots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

/// Tag of one scheduled shutdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerToken(pub u64);

/// Settings-panel tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopPreferences {
    /// Upper bound on recorded interactions forwarded as generation context.
    pub max_history_length: usize,
    /// Replays cached content for previously visited interaction paths.
    pub statefulness_enabled: bool,
}

impl Default for DesktopPreferences {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            statefulness_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Running,
    ShuttingDown { timer: TimerToken },
    Off,
}

/// Top-level view inside the running desktop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellView {
    Desktop,
    App(AppDefinition),
    /// Settings panel. The app that was open when the panel opened is remembered but never
    /// restored.
    Parameters { suspended: Option<AppDefinition> },
}

/// Flat session projection exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "app_id", rename_all = "snake_case")]
pub enum SessionState {
    Desktop,
    AppOpen(String),
    ParametersOpen,
    ShuttingDown,
    Off,
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopFrame {
    pub session: SessionState,
    pub title: String,
    pub content: String,
    pub busy: bool,
    pub error: Option<String>,
    pub user: UserState,
    pub login_visible: bool,
    pub start_menu_open: bool,
    pub max_history_length: usize,
    pub statefulness_enabled: bool,
}

/// The single owned session aggregate mutated by [`crate::reducer::reduce_desktop`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub power: PowerState,
    pub view: ShellView,
    pub login_visible: bool,
    pub start_menu_open: bool,
    pub user: UserState,
    pub preferences: DesktopPreferences,
    pub history: InteractionHistory,
    pub path: InteractionPath,
    pub cache: PathCache,
    pub content: ContentStreamState,
    boot_preferences: DesktopPreferences,
    next_timer_token: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(DesktopPreferences::default())
    }
}

impl DesktopState {
    pub fn new(preferences: DesktopPreferences) -> Self {
        Self {
            power: PowerState::Running,
            view: ShellView::Desktop,
            login_visible: false,
            start_menu_open: false,
            user: UserState::guest(),
            history: InteractionHistory::new(preferences.max_history_length),
            path: InteractionPath::default(),
            cache: PathCache::default(),
            content: ContentStreamState::default(),
            boot_preferences: preferences.clone(),
            preferences,
            next_timer_token: 1,
        }
    }

    /// Returns the state a fresh boot would produce.
    ///
    /// Request and timer counters carry over so work issued before the reboot can never match a
    /// token issued after it.
    pub fn rebooted(&self) -> Self {
        let mut state = Self::new(self.boot_preferences.clone());
        state.content = ContentStreamState::continuing_after(&self.content);
        state.next_timer_token = self.next_timer_token;
        state
    }

    pub fn active_app(&self) -> Option<&AppDefinition> {
        match &self.view {
            ShellView::App(app) => Some(app),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.power, PowerState::Running)
    }

    pub fn session_state(&self) -> SessionState {
        match (self.power, &self.view) {
            (PowerState::ShuttingDown { .. }, _) => SessionState::ShuttingDown,
            (PowerState::Off, _) => SessionState::Off,
            (PowerState::Running, ShellView::Desktop) => SessionState::Desktop,
            (PowerState::Running, ShellView::App(app)) => SessionState::AppOpen(app.id.to_string()),
            (PowerState::Running, ShellView::Parameters { .. }) => SessionState::ParametersOpen,
        }
    }

    pub fn window_title(&self) -> &str {
        match &self.view {
            ShellView::App(app) => app.name,
            ShellView::Desktop | ShellView::Parameters { .. } => DESKTOP_WINDOW_TITLE,
        }
    }

    pub fn frame(&self) -> DesktopFrame {
        DesktopFrame {
            session: self.session_state(),
            title: self.window_title().to_string(),
            content: self.content.buffer().to_string(),
            busy: self.content.is_busy(),
            error: self.content.error().map(str::to_string),
            user: self.user.clone(),
            login_visible: self.login_visible,
            start_menu_open: self.start_menu_open,
            max_history_length: self.preferences.max_history_length,
            statefulness_enabled: self.preferences.statefulness_enabled,
        }
    }

    pub(crate) fn next_timer_token(&mut self) -> TimerToken {
        let token = TimerToken(self.next_timer_token);
        self.next_timer_token = self.next_timer_token.saturating_add(1);
        token
    }
}
