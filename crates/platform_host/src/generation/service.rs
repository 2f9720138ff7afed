//! Content generation service contract and no-op adapter.

use desktop_app_contract::GenerationRequest;
use futures::stream::{self, LocalBoxStream, StreamExt};
use thiserror::Error;

/// Lazy, finite, non-restartable sequence of content chunks produced for one request.
///
/// The stream may yield an error at any point; chunks delivered before the error stay
/// delivered.
pub type ContentStream = LocalBoxStream<'static, Result<String, ServiceError>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by a content generation service.
pub enum ServiceError {
    /// The service refused or could not start the request.
    #[error("generation request failed: {0}")]
    Request(String),
    /// The stream broke off after it started producing output.
    #[error("generation stream interrupted: {0}")]
    Stream(String),
}

/// Host service that turns a [`GenerationRequest`] into streamed window content.
///
/// Implementations are stateless across invocations from the caller's perspective; all context
/// travels in the request.
pub trait ContentGenerator {
    /// Starts a generation and returns its chunk stream.
    fn generate(&self, request: &GenerationRequest) -> ContentStream;
}

#[derive(Debug, Clone, Copy, Default)]
/// Generator that completes immediately without output.
pub struct NoopContentGenerator;

impl ContentGenerator for NoopContentGenerator {
    fn generate(&self, _request: &GenerationRequest) -> ContentStream {
        stream::empty().boxed_local()
    }
}
