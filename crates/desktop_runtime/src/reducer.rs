//! Reducer actions, side-effect intents, and transition logic for the desktop session.

use desktop_app_contract::{
    AppDefinition, AuthTransition, GenerationRequest, InteractionData, APP_CLOSE_BUTTON_ID,
    INITIATE_SIGN_IN_ID,
};
use platform_host::ServiceError;
use thiserror::Error;

use crate::{
    model::{
        DesktopState, PowerState, RequestToken, ShellView, TimerToken, SHUTDOWN_DELAY_MS,
    },
    path_cache::write_back,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open an app from a desktop icon, the taskbar, or the start menu.
    OpenApp(AppDefinition),
    /// Close the active app and return to the desktop.
    CloseApp,
    /// Hierarchical close: settings panel first, then the active app.
    Close,
    /// Open or close the settings panel.
    ToggleParameters,
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Show the login overlay.
    InitiateSignIn,
    /// Dismiss the login overlay without signing in.
    CancelSignIn,
    /// Forward a user interaction from generated content or an overlay.
    Interact(InteractionData),
    /// Change the history length limit.
    SetHistoryLimit {
        /// New limit.
        max_history_length: usize,
    },
    /// Enable or disable path-keyed content replay.
    SetStatefulness {
        /// Whether statefulness is enabled.
        enabled: bool,
    },
    /// Begin the shutdown sequence.
    Shutdown,
    /// Reset the whole session as if the process restarted.
    Reboot,
    /// A chunk arrived for a generation request.
    StreamChunk {
        /// Request the chunk belongs to.
        token: RequestToken,
        /// Chunk text.
        chunk: String,
    },
    /// A generation request failed.
    StreamFailed {
        /// Request that failed.
        token: RequestToken,
        /// Failure reported by the service.
        error: ServiceError,
    },
    /// A generation request delivered its last chunk.
    StreamCompleted {
        /// Request that completed.
        token: RequestToken,
    },
    /// A scheduled shutdown timer fired.
    ShutdownTimerElapsed {
        /// Timer that fired.
        token: TimerToken,
    },
}

impl DesktopAction {
    fn is_user_action(&self) -> bool {
        !matches!(
            self,
            Self::Reboot
                | Self::StreamChunk { .. }
                | Self::StreamFailed { .. }
                | Self::StreamCompleted { .. }
                | Self::ShutdownTimerElapsed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime to execute.
pub enum RuntimeEffect {
    /// Start streaming content for `request`, tagging every resulting event with `token`.
    RequestGeneration {
        /// Token issued for the request.
        token: RequestToken,
        /// Context forwarded to the content service.
        request: GenerationRequest,
    },
    /// Fire [`DesktopAction::ShutdownTimerElapsed`] after `delay_ms`.
    ScheduleShutdownTimer {
        /// Timer to schedule.
        token: TimerToken,
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// Drop a scheduled shutdown timer.
    CancelShutdownTimer {
        /// Timer to cancel.
        token: TimerToken,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that are invalid in the current state.
pub enum ReducerError {
    /// A user action arrived while the session was shutting down or off.
    #[error("session is not running")]
    SessionNotRunning,
}

/// Applies a [`DesktopAction`] to the session state and collects resulting side effects.
///
/// This function is the authoritative transition table for the session. After every action the
/// cache write-back post-condition runs, so finished content reaches the path cache without any
/// caller involvement.
///
/// # Errors
///
/// Returns [`ReducerError::SessionNotRunning`] for user actions while the session is shutting
/// down or off. The state is left untouched in that case.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    if action.is_user_action() && !state.is_running() {
        return Err(ReducerError::SessionNotRunning);
    }

    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenApp(app) => open_app(state, app, &mut effects),
        DesktopAction::CloseApp => close_app(state),
        DesktopAction::Close => match state.view {
            ShellView::Parameters { .. } => toggle_parameters(state),
            ShellView::App(_) => close_app(state),
            ShellView::Desktop => {}
        },
        DesktopAction::ToggleParameters => toggle_parameters(state),
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::InitiateSignIn => {
            state.login_visible = true;
        }
        DesktopAction::CancelSignIn => {
            state.login_visible = false;
        }
        DesktopAction::Interact(interaction) => interact(state, interaction, &mut effects),
        DesktopAction::SetHistoryLimit { max_history_length } => {
            state.preferences.max_history_length = max_history_length;
            state.history.set_limit(max_history_length);
        }
        DesktopAction::SetStatefulness { enabled } => {
            state.preferences.statefulness_enabled = enabled;
            if !enabled {
                state.cache.clear();
            }
        }
        DesktopAction::Shutdown => {
            let timer = state.next_timer_token();
            state.start_menu_open = false;
            state.power = PowerState::ShuttingDown { timer };
            tracing::info!(timer = timer.0, "shutdown started");
            effects.push(RuntimeEffect::ScheduleShutdownTimer {
                token: timer,
                delay_ms: SHUTDOWN_DELAY_MS,
            });
        }
        DesktopAction::ShutdownTimerElapsed { token } => {
            if state.power == (PowerState::ShuttingDown { timer: token }) {
                state.power = PowerState::Off;
                tracing::info!("session powered off");
            } else {
                tracing::debug!(timer = token.0, "ignoring stale shutdown timer");
            }
        }
        DesktopAction::Reboot => {
            if let PowerState::ShuttingDown { timer } = state.power {
                effects.push(RuntimeEffect::CancelShutdownTimer { token: timer });
            }
            *state = state.rebooted();
            tracing::info!("session rebooted");
        }
        DesktopAction::StreamChunk { token, chunk } => {
            if !state.content.apply_chunk(token, &chunk) {
                tracing::debug!(request = token.0, "dropping chunk from superseded request");
            }
        }
        DesktopAction::StreamFailed { token, error } => {
            if state.content.fail(token) {
                tracing::warn!(request = token.0, "content stream failed: {error}");
            } else {
                tracing::debug!(request = token.0, "ignoring failure of superseded request");
            }
        }
        DesktopAction::StreamCompleted { token } => {
            if state.content.complete(token) {
                tracing::debug!(
                    request = token.0,
                    bytes = state.content.buffer().len(),
                    "content stream completed"
                );
            }
        }
    }

    if write_back(
        &mut state.cache,
        &state.path,
        &state.content,
        state.preferences.statefulness_enabled,
    ) {
        tracing::debug!(
            key = %state.path.key(),
            entries = state.cache.len(),
            "cached generated content"
        );
    }
    Ok(effects)
}

fn open_app(state: &mut DesktopState, app: AppDefinition, effects: &mut Vec<RuntimeEffect>) {
    state.start_menu_open = false;
    state.view = ShellView::App(app);
    state.history.reset_to(InteractionData::app_open(&app));
    state.path.start(app.id);
    tracing::info!(app = app.id, "app opened");
    request_content(state, false, effects);
}

fn close_app(state: &mut DesktopState) {
    if let ShellView::App(_) = state.view {
        state.view = ShellView::Desktop;
    }
    state.history.clear();
    state.path.clear();
    state.content.reset();
    state.start_menu_open = false;
}

fn toggle_parameters(state: &mut DesktopState) {
    match state.view {
        ShellView::Parameters { .. } => {
            state.view = ShellView::Desktop;
            state.history.clear();
            state.path.clear();
            state.content.reset();
        }
        ShellView::App(app) => {
            state.view = ShellView::Parameters {
                suspended: Some(app),
            };
            state.content.reset();
            state.start_menu_open = false;
        }
        ShellView::Desktop => {
            state.view = ShellView::Parameters { suspended: None };
            state.content.reset();
            state.start_menu_open = false;
        }
    }
}

fn interact(
    state: &mut DesktopState,
    interaction: InteractionData,
    effects: &mut Vec<RuntimeEffect>,
) {
    match interaction.id.as_str() {
        APP_CLOSE_BUTTON_ID => {
            close_app(state);
            return;
        }
        INITIATE_SIGN_IN_ID => {
            state.content.clear_error();
            state.login_visible = true;
            return;
        }
        _ => {}
    }

    let auth = AuthTransition::from_interaction(&interaction);
    if let Some(transition) = &auth {
        state.user = transition.resulting_user();
        if matches!(transition, AuthTransition::SignIn(_)) {
            state.login_visible = false;
        }
        tracing::info!(signed_in = state.user.is_signed_in, "user changed");
    }

    if state.active_app().is_some() {
        state.path.push(&interaction.id);
    } else {
        state.path.restart_with(&interaction.id);
    }
    state.history.record(interaction);
    request_content(state, auth.is_some(), effects);
}

/// Serves cached content for the current path or issues a new generation.
///
/// Identity changes always regenerate: the user is part of the request context but not of the
/// cache key.
fn request_content(
    state: &mut DesktopState,
    bypass_cache: bool,
    effects: &mut Vec<RuntimeEffect>,
) {
    if state.preferences.statefulness_enabled && !bypass_cache {
        if let Some(cached) = state.cache.get(&state.path) {
            tracing::debug!(key = %state.path.key(), "serving cached content");
            let cached = cached.to_string();
            state.content.serve_cached(&cached);
            return;
        }
    }

    if state.history.is_empty() {
        tracing::warn!("generation requested without interaction history");
        state.content.reject_empty_history();
        return;
    }

    let token = state.content.begin();
    effects.push(RuntimeEffect::RequestGeneration {
        token,
        request: GenerationRequest {
            history: state.history.entries().to_vec(),
            history_limit: state.preferences.max_history_length,
            user: state.user.clone(),
        },
    });
}
