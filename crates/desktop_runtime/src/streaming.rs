//! Active content buffer and the request-token guard for streamed generations.
//!
//! Every generation is tagged with a [`RequestToken`]. Only the most recently issued token is
//! live; anything that resets the visible content also retires it, so events from a superseded
//! stream are rejected instead of leaking into newer content.

use crate::model::RequestToken;

pub const STREAM_ERROR_MESSAGE: &str = "Failed to stream content from the API.";
pub const EMPTY_HISTORY_ERROR: &str = "No interaction data to process.";
pub const ERROR_FRAGMENT: &str =
    r#"<div class="p-4 text-red-600 bg-red-100 rounded-md">Error loading content.</div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStreamState {
    buffer: String,
    busy: bool,
    error: Option<String>,
    active: Option<RequestToken>,
    last_issued: u64,
}

impl Default for ContentStreamState {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            busy: false,
            error: None,
            active: None,
            last_issued: 0,
        }
    }
}

impl ContentStreamState {
    /// Fresh state whose next token continues after every token `previous` issued.
    pub fn continuing_after(previous: &Self) -> Self {
        Self {
            last_issued: previous.last_issued,
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_request(&self) -> Option<RequestToken> {
        self.active
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.active == Some(token)
    }

    /// Issues a new token, retiring any in-flight one, and clears buffer and error.
    pub fn begin(&mut self) -> RequestToken {
        self.last_issued = self.last_issued.saturating_add(1);
        let token = RequestToken(self.last_issued);
        self.active = Some(token);
        self.buffer.clear();
        self.busy = true;
        self.error = None;
        token
    }

    /// Shows previously generated content without a request.
    pub fn serve_cached(&mut self, content: &str) {
        self.reset();
        self.buffer.push_str(content);
    }

    /// Records that a generation was attempted without any interaction context.
    pub fn reject_empty_history(&mut self) {
        self.reset();
        self.error = Some(EMPTY_HISTORY_ERROR.to_string());
    }

    /// Drops a recorded error together with the error fragment it left in the buffer.
    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.buffer.clear();
        }
    }

    /// Clears buffer, busy flag and error, retiring any in-flight request.
    pub fn reset(&mut self) {
        self.active = None;
        self.buffer.clear();
        self.busy = false;
        self.error = None;
    }

    /// Appends a chunk of the live request. Returns `false` for a stale token.
    pub fn apply_chunk(&mut self, token: RequestToken, chunk: &str) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.buffer.push_str(chunk);
        true
    }

    /// Settles the live request as failed, replacing the buffer with [`ERROR_FRAGMENT`].
    pub fn fail(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.active = None;
        self.busy = false;
        self.error = Some(STREAM_ERROR_MESSAGE.to_string());
        self.buffer.clear();
        self.buffer.push_str(ERROR_FRAGMENT);
        true
    }

    /// Settles the live request as complete.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.active = None;
        self.busy = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn chunks_append_in_order_until_completion() {
        let mut state = ContentStreamState::default();
        let token = state.begin();
        assert!(state.is_busy());

        let mut seen = Vec::new();
        for chunk in ["<div>", "Hello", "</div>"] {
            assert!(state.apply_chunk(token, chunk));
            seen.push(state.buffer().to_string());
        }
        assert_eq!(seen, vec!["<div>", "<div>Hello", "<div>Hello</div>"]);

        assert!(state.complete(token));
        assert!(!state.is_busy());
        assert_eq!(state.active_request(), None);
        assert!(!state.apply_chunk(token, "late"));
        assert_eq!(state.buffer(), "<div>Hello</div>");
    }

    #[test]
    fn newer_request_retires_older_token() {
        let mut state = ContentStreamState::default();
        let first = state.begin();
        state.apply_chunk(first, "old");
        let second = state.begin();
        assert!(second > first);

        assert!(!state.apply_chunk(first, " stale"));
        assert!(!state.fail(first));
        assert!(!state.complete(first));
        assert!(state.apply_chunk(second, "new"));
        assert_eq!(state.buffer(), "new");
        assert!(state.is_busy());
    }

    #[test]
    fn failure_keeps_renderable_fragment_and_message() {
        let mut state = ContentStreamState::default();
        let token = state.begin();
        state.apply_chunk(token, "partial");
        assert!(state.fail(token));
        assert_eq!(state.buffer(), ERROR_FRAGMENT);
        assert_eq!(state.error(), Some(STREAM_ERROR_MESSAGE));
        assert!(!state.is_busy());

        state.begin();
        assert_eq!(state.error(), None);
        assert_eq!(state.buffer(), "");
    }

    #[test]
    fn cached_content_and_resets_retire_the_live_request() {
        let mut state = ContentStreamState::default();
        let token = state.begin();
        state.serve_cached("<p>cached</p>");
        assert!(!state.is_busy());
        assert!(!state.apply_chunk(token, "x"));
        assert_eq!(state.buffer(), "<p>cached</p>");

        state.reject_empty_history();
        assert_eq!(state.error(), Some(EMPTY_HISTORY_ERROR));
        assert_eq!(state.buffer(), "");
    }

    #[test]
    fn clearing_an_error_drops_the_fragment_but_keeps_good_content() {
        let mut state = ContentStreamState::default();
        let token = state.begin();
        state.fail(token);
        state.clear_error();
        assert_eq!(state.error(), None);
        assert_eq!(state.buffer(), "");

        state.serve_cached("<p>ok</p>");
        state.clear_error();
        assert_eq!(state.buffer(), "<p>ok</p>");
    }

    #[test]
    fn continuing_state_never_reissues_old_tokens() {
        let mut state = ContentStreamState::default();
        let old = state.begin();
        let mut next = ContentStreamState::continuing_after(&state);
        assert!(!next.is_current(old));
        assert!(next.begin() > old);
    }
}
