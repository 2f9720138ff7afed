//! Channel-fed generator adapter for tests that interleave concurrent streams.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::GenerationRequest;
use futures::{
    channel::mpsc::{self, UnboundedSender},
    stream::StreamExt,
};

use super::service::{ContentGenerator, ContentStream, ServiceError};

#[derive(Debug, Default)]
struct ManualState {
    senders: Vec<UnboundedSender<Result<String, ServiceError>>>,
    requests: Vec<GenerationRequest>,
}

#[derive(Debug, Clone, Default)]
/// Generator whose streams are fed by the caller, one channel per request.
///
/// Requests are addressed by their zero-based arrival index. Nothing is delivered until the
/// caller pushes chunks, which makes it possible to resolve an older stream after a newer one.
pub struct ManualContentGenerator {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualContentGenerator {
    /// Pushes a chunk into the stream of request `index`.
    ///
    /// Returns `false` when the request does not exist or its stream is already closed or
    /// dropped by the consumer.
    pub fn send_chunk(&self, index: usize, chunk: &str) -> bool {
        self.send(index, Ok(chunk.to_string()))
    }

    /// Pushes a failure into the stream of request `index` and closes it.
    pub fn fail(&self, index: usize, error: ServiceError) -> bool {
        let sent = self.send(index, Err(error));
        self.finish(index);
        sent
    }

    /// Closes the stream of request `index`.
    pub fn finish(&self, index: usize) {
        if let Some(sender) = self.inner.borrow().senders.get(index) {
            sender.close_channel();
        }
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.inner.borrow().requests.clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    fn send(&self, index: usize, item: Result<String, ServiceError>) -> bool {
        self.inner
            .borrow()
            .senders
            .get(index)
            .is_some_and(|sender| sender.unbounded_send(item).is_ok())
    }
}

impl ContentGenerator for ManualContentGenerator {
    fn generate(&self, request: &GenerationRequest) -> ContentStream {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.inner.borrow_mut();
        state.senders.push(tx);
        state.requests.push(request.clone());
        rx.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::UserState;
    use futures::executor::block_on;

    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            history: Vec::new(),
            history_limit: 0,
            user: UserState::guest(),
        }
    }

    #[test]
    fn streams_are_fed_independently_by_index() {
        let generator = ManualContentGenerator::default();
        let first = generator.generate(&request());
        let second = generator.generate(&request());

        assert!(generator.send_chunk(1, "b"));
        generator.finish(1);
        assert!(generator.send_chunk(0, "a"));
        assert!(generator.fail(0, ServiceError::Request("down".to_string())));

        let second: Vec<_> = block_on(second.collect());
        let first: Vec<_> = block_on(first.collect());
        assert_eq!(second, vec![Ok("b".to_string())]);
        assert_eq!(
            first,
            vec![
                Ok("a".to_string()),
                Err(ServiceError::Request("down".to_string()))
            ]
        );
        assert!(!generator.send_chunk(7, "missing"));
    }
}
