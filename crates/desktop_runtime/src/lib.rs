//! Session state machine and runtime container for the generative desktop.
//!
//! The reducer in [`reducer`] owns every transition. [`runtime_context::DesktopRuntime`] wraps it
//! with effect execution over injected host services and frame publication.

pub mod apps;
mod effect_executor;
pub mod history;
pub mod host;
pub mod model;
pub mod path_cache;
pub mod reducer;
pub mod runtime_context;
pub mod streaming;

pub use apps::{account_app, app_definition, app_registry, desktop_apps, start_menu_apps};
pub use host::DesktopHostContext;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::DesktopRuntime;
