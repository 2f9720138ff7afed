//! Shared contract types between the desktop session runtime, the presentation layer, and the
//! generative content service.
//!
//! Everything in this crate crosses a boundary: interactions are emitted by the presentation
//! layer, app definitions come from the static registry, and [`GenerationRequest`] is the full
//! context handed to the content service for one generation.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// Interaction id emitted by the window close affordance inside generated content.
pub const APP_CLOSE_BUTTON_ID: &str = "app_close_button";
/// Interaction id that asks the shell to show the login overlay.
pub const INITIATE_SIGN_IN_ID: &str = "initiate_google_signin";
/// Interaction id emitted by the login overlay on success; `value` carries the e-mail.
pub const SIGN_IN_SUCCESS_ID: &str = "google_signin_success";
/// Interaction id emitted by generated content to sign the user out.
pub const SIGN_OUT_ID: &str = "sign_out_button";
/// Id of the account app, where the login overlay reports its result.
pub const ACCOUNT_APP_ID: &str = "account_app";
/// Interaction type of the synthetic interaction recorded when an app opens.
pub const APP_OPEN_INTERACTION_TYPE: &str = "app_open";
/// Interaction type emitted by the login overlay.
pub const USER_LOGIN_INTERACTION_TYPE: &str = "user_login";

const GUEST_NAME: &str = "Guest";
const FALLBACK_SIGNED_IN_NAME: &str = "User";

/// Static application definition supplied by the app registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AppDefinition {
    /// Stable app identifier, also the first segment of every interaction path in the app.
    pub id: &'static str,
    /// Display name used for window titles and launchers.
    pub name: &'static str,
    /// Launcher glyph.
    pub icon: &'static str,
    /// Launcher accent color.
    pub color: &'static str,
}

/// One user-originated event forwarded to the runtime.
///
/// Interactions are immutable once recorded. The `id` is not unique: reopening an app or
/// clicking the same control twice produces interactions with equal ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionData {
    /// Interaction identifier (`data-interaction-id` of the element, or an app id).
    pub id: String,
    /// Interaction kind (`click`, `app_open`, `user_login`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Visible text of the element, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_text: Option<String>,
    /// Element tag or role, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// App the interaction originated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_context: Option<String>,
    /// Value captured from an associated input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl InteractionData {
    /// Creates an interaction with only an id and a kind.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            element_text: None,
            element_type: None,
            app_context: None,
            value: None,
        }
    }

    /// Creates the synthetic interaction recorded when `app` is opened.
    pub fn app_open(app: &AppDefinition) -> Self {
        Self {
            id: app.id.to_string(),
            kind: APP_OPEN_INTERACTION_TYPE.to_string(),
            element_text: Some(app.name.to_string()),
            element_type: Some("icon".to_string()),
            app_context: Some(app.id.to_string()),
            value: None,
        }
    }

    /// Creates the interaction the login overlay emits after a successful sign-in.
    pub fn sign_in_success(email: impl Into<String>) -> Self {
        Self::new(SIGN_IN_SUCCESS_ID, USER_LOGIN_INTERACTION_TYPE)
            .with_element_type("button")
            .with_element_text("Sign In")
            .with_app_context(ACCOUNT_APP_ID)
            .with_value(email)
    }

    /// Sets the element text.
    pub fn with_element_text(mut self, text: impl Into<String>) -> Self {
        self.element_text = Some(text.into());
        self
    }

    /// Sets the element type.
    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// Sets the originating app.
    pub fn with_app_context(mut self, app_id: impl Into<String>) -> Self {
        self.app_context = Some(app_id.into());
        self
    }

    /// Sets the captured input value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Simulated signed-in identity. Not a trust boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    /// Whether a user is signed in.
    pub is_signed_in: bool,
    /// Display name (`Guest` when signed out).
    pub name: String,
}

impl Default for UserState {
    fn default() -> Self {
        Self::guest()
    }
}

impl UserState {
    /// Signed-out identity.
    pub fn guest() -> Self {
        Self {
            is_signed_in: false,
            name: GUEST_NAME.to_string(),
        }
    }

    /// Signed-in identity derived from the e-mail submitted to the login overlay.
    ///
    /// The display name is the local part of the address with its first letter upper-cased,
    /// or `User` when the local part is empty.
    pub fn signed_in_from_email(email: &str) -> Self {
        let local = email.split('@').next().unwrap_or_default();
        let mut chars = local.chars();
        let name: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => FALLBACK_SIGNED_IN_NAME.to_string(),
        };
        Self {
            is_signed_in: true,
            name,
        }
    }
}

/// Interactions that change [`UserState`].
///
/// User identity is part of the generation context but not of the content-cache key, so every
/// identity change must be expressed here: the runtime both applies the new user and bypasses
/// the cache for exactly these interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTransition {
    /// The login overlay reported success.
    SignIn(UserState),
    /// The user signed out.
    SignOut,
}

impl AuthTransition {
    /// Classifies `interaction`, returning `None` for identity-neutral interactions.
    pub fn from_interaction(interaction: &InteractionData) -> Option<Self> {
        match interaction.id.as_str() {
            SIGN_IN_SUCCESS_ID => Some(Self::SignIn(UserState::signed_in_from_email(
                interaction.value.as_deref().unwrap_or_default(),
            ))),
            SIGN_OUT_ID => Some(Self::SignOut),
            _ => None,
        }
    }

    /// Returns the user state after the transition.
    pub fn resulting_user(&self) -> UserState {
        match self {
            Self::SignIn(user) => user.clone(),
            Self::SignOut => UserState::guest(),
        }
    }
}

/// Full context for one generation: everything the content service sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Recent interactions, most recent first.
    pub history: Vec<InteractionData>,
    /// Configured history limit at the time of the request.
    pub history_limit: usize,
    /// Identity at the time of the request.
    pub user: UserState,
}

impl GenerationRequest {
    /// Returns the interaction that triggered this request.
    pub fn current_interaction(&self) -> Option<&InteractionData> {
        self.history.first()
    }
}
