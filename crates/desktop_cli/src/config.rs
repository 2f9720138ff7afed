//! Typed session-file loading.

use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use desktop_runtime::{app_definition, DesktopPreferences};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{CliError, CliResult};

/// Generic TOML-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and TOML deserialization. Callers validate
/// the typed value afterwards.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Load and deserialize the configuration file.
    pub fn load(&self) -> CliResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|source| CliError::ReadConfig {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&body).map_err(|source| CliError::ParseConfig {
            path: self.path.clone(),
            source,
        })
    }

    /// Return the config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A scripted desktop session: boot preferences plus the steps to replay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SessionConfig {
    /// Preferences the session boots (and reboots) with.
    #[serde(default)]
    pub preferences: DesktopPreferences,
    /// Sleep for real on `wait` steps instead of advancing a simulated clock.
    #[serde(default)]
    pub realtime: bool,
    /// Steps replayed in order.
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl SessionConfig {
    /// Checks that every `open_app` step names a registered app.
    pub fn validate(&self) -> CliResult<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if let ScriptStep::OpenApp { app_id } = step {
                if app_definition(app_id).is_none() {
                    return Err(CliError::UnknownApp {
                        step: index + 1,
                        app_id: app_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn default_interaction_type() -> String {
    "click".to_string()
}

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    OpenApp {
        app_id: String,
    },
    Interact {
        id: String,
        #[serde(rename = "type", default = "default_interaction_type")]
        kind: String,
        #[serde(default)]
        element_text: Option<String>,
        #[serde(default)]
        element_type: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
    Close,
    CloseApp,
    ToggleParameters,
    ToggleStartMenu,
    SignIn {
        email: String,
    },
    SignOut,
    SetHistoryLimit {
        max_history_length: usize,
    },
    SetStatefulness {
        enabled: bool,
    },
    Shutdown,
    Reboot,
    /// Let time pass so pending timers can fire.
    Wait {
        ms: u64,
    },
}
