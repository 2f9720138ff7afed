//! Generative content service contracts and lightweight adapters.

mod manual;
mod preview;
mod scripted;
mod service;

pub use manual::ManualContentGenerator;
pub use preview::PreviewContentGenerator;
pub use scripted::ScriptedContentGenerator;
pub use service::{ContentGenerator, ContentStream, NoopContentGenerator, ServiceError};
