//! Scripted session replay for the generative desktop runtime.

pub mod config;
pub mod error;
pub mod script;

pub use config::{ConfigLoader, ScriptStep, SessionConfig};
pub use error::{CliError, CliResult};
pub use script::{ReplaySummary, ScriptRunner};
