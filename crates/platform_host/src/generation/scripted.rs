//! Queue-backed generator adapter for deterministic tests.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use desktop_app_contract::GenerationRequest;
use futures::stream::{self, StreamExt};

use super::service::{ContentGenerator, ContentStream, ServiceError};

type ScriptedReply = Vec<Result<String, ServiceError>>;

#[derive(Debug, Default)]
struct ScriptedState {
    replies: VecDeque<ScriptedReply>,
    fallback: ScriptedReply,
    requests: Vec<GenerationRequest>,
}

#[derive(Debug, Clone, Default)]
/// Generator that replays queued replies in order and records every request it receives.
///
/// Clones share the same queue and request log, so a test can keep one handle while the runtime
/// owns another. Once the queue is exhausted the fallback reply is used.
pub struct ScriptedContentGenerator {
    inner: Rc<RefCell<ScriptedState>>,
}

impl ScriptedContentGenerator {
    /// Creates a generator whose fallback reply is the given chunk sequence.
    pub fn with_fallback<'a>(chunks: impl IntoIterator<Item = &'a str>) -> Self {
        let generator = Self::default();
        generator.inner.borrow_mut().fallback = chunks
            .into_iter()
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        generator
    }

    /// Queues a successful reply made of `chunks`.
    pub fn push_reply<'a>(&self, chunks: impl IntoIterator<Item = &'a str>) {
        self.inner.borrow_mut().replies.push_back(
            chunks
                .into_iter()
                .map(|chunk| Ok(chunk.to_string()))
                .collect(),
        );
    }

    /// Queues a reply that delivers `chunks` and then fails with `error`.
    pub fn push_failure<'a>(&self, chunks: impl IntoIterator<Item = &'a str>, error: ServiceError) {
        let mut reply: ScriptedReply = chunks
            .into_iter()
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        reply.push(Err(error));
        self.inner.borrow_mut().replies.push_back(reply);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.inner.borrow().requests.clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }
}

impl ContentGenerator for ScriptedContentGenerator {
    fn generate(&self, request: &GenerationRequest) -> ContentStream {
        let mut state = self.inner.borrow_mut();
        state.requests.push(request.clone());
        let reply = match state.replies.pop_front() {
            Some(reply) => reply,
            None => state.fallback.clone(),
        };
        stream::iter(reply).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{InteractionData, UserState};
    use futures::executor::block_on;

    use super::*;

    fn request(id: &str) -> GenerationRequest {
        GenerationRequest {
            history: vec![InteractionData::new(id, "click")],
            history_limit: 3,
            user: UserState::guest(),
        }
    }

    #[test]
    fn queued_replies_are_served_before_the_fallback() {
        let generator = ScriptedContentGenerator::with_fallback(["fallback"]);
        generator.push_reply(["<p>", "one", "</p>"]);

        let first: Vec<_> = block_on(generator.generate(&request("a")).collect());
        let second: Vec<_> = block_on(generator.generate(&request("b")).collect());

        assert_eq!(
            first,
            vec![
                Ok("<p>".to_string()),
                Ok("one".to_string()),
                Ok("</p>".to_string())
            ]
        );
        assert_eq!(second, vec![Ok("fallback".to_string())]);
        assert_eq!(generator.request_count(), 2);
        assert_eq!(generator.requests()[1].history[0].id, "b");
    }

    #[test]
    fn failure_reply_ends_with_the_error() {
        let generator = ScriptedContentGenerator::default();
        generator.push_failure(["partial"], ServiceError::Stream("reset".to_string()));

        let items: Vec<_> = block_on(generator.generate(&request("a")).collect());
        assert_eq!(
            items,
            vec![
                Ok("partial".to_string()),
                Err(ServiceError::Stream("reset".to_string()))
            ]
        );
    }
}
