//! Typed host-domain contracts shared by the desktop session runtime and its entry layers.
//!
//! This crate is the API-first boundary for platform services. It exposes the generative content
//! service port with offline and test adapters, and the clock port used for deferred work.
//! Concrete network-backed generators live outside the workspace and plug in through
//! [`ContentGenerator`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod generation;
pub mod time;

pub use generation::{
    ContentGenerator, ContentStream, ManualContentGenerator, NoopContentGenerator,
    PreviewContentGenerator, ScriptedContentGenerator, ServiceError,
};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
