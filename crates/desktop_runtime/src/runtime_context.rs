//! Long-lived runtime container for the desktop session.
//!
//! [`DesktopRuntime`] owns the reducer state, dispatches actions, executes the resulting effects
//! through the injected [`DesktopHostContext`], and publishes a [`DesktopFrame`] to subscribers
//! whenever the visible projection changes.

use std::{cell::RefCell, rc::Rc};

use crate::{
    effect_executor,
    host::DesktopHostContext,
    model::{DesktopFrame, DesktopPreferences, DesktopState, RequestToken, TimerToken},
    reducer::{reduce_desktop, DesktopAction, ReducerError},
};

type FrameListener = Rc<dyn Fn(&DesktopFrame)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingTimer {
    pub token: TimerToken,
    pub due_ms: u64,
}

struct RuntimeInner {
    state: DesktopState,
    last_frame: DesktopFrame,
    listeners: Vec<FrameListener>,
    pending_timer: Option<PendingTimer>,
}

#[derive(Clone)]
/// Shared handle to the desktop session. Clones observe and mutate the same session.
pub struct DesktopRuntime {
    host: DesktopHostContext,
    inner: Rc<RefCell<RuntimeInner>>,
}

impl DesktopRuntime {
    /// Boots a session with `preferences` on top of the given host services.
    pub fn new(host: DesktopHostContext, preferences: DesktopPreferences) -> Self {
        let state = DesktopState::new(preferences);
        let last_frame = state.frame();
        tracing::info!(
            max_history_length = state.preferences.max_history_length,
            statefulness_enabled = state.preferences.statefulness_enabled,
            "desktop session booted"
        );
        Self {
            host,
            inner: Rc::new(RefCell::new(RuntimeInner {
                state,
                last_frame,
                listeners: Vec::new(),
                pending_timer: None,
            })),
        }
    }

    /// Returns the host services backing this runtime.
    pub fn host(&self) -> &DesktopHostContext {
        &self.host
    }

    /// Applies `action`, notifies subscribers of a changed frame, and runs emitted effects.
    ///
    /// Safe to call from subscribers and from spawned stream drivers: no borrow of the session is
    /// held while listeners or effects run.
    pub fn dispatch(&self, action: DesktopAction) -> Result<(), ReducerError> {
        let (effects, changed_frame, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let effects = match reduce_desktop(&mut inner.state, action) {
                Ok(effects) => effects,
                Err(err) => {
                    tracing::warn!("desktop action rejected: {err}");
                    return Err(err);
                }
            };
            let frame = inner.state.frame();
            let changed_frame = if frame != inner.last_frame {
                inner.last_frame = frame.clone();
                Some(frame)
            } else {
                None
            };
            (effects, changed_frame, inner.listeners.clone())
        };

        if let Some(frame) = changed_frame {
            for listener in &listeners {
                listener(&frame);
            }
        }

        effect_executor::run_effects(self, effects);
        Ok(())
    }

    /// Registers a listener invoked with every changed frame.
    pub fn subscribe(&self, listener: impl Fn(&DesktopFrame) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(listener));
    }

    /// Returns the current frame.
    pub fn frame(&self) -> DesktopFrame {
        self.inner.borrow().last_frame.clone()
    }

    /// Runs `f` against a read-only view of the session state.
    pub fn with_state<R>(&self, f: impl FnOnce(&DesktopState) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Whether `token` still identifies the live generation request.
    pub fn is_current_request(&self, token: RequestToken) -> bool {
        self.inner.borrow().state.content.is_current(token)
    }

    /// Fires the shutdown timer if it is due. Returns `true` when a timer fired.
    pub fn poll_timers(&self) -> bool {
        let now = self.host.clock().now_ms();
        let due = {
            let mut inner = self.inner.borrow_mut();
            let due = inner.pending_timer.filter(|timer| timer.due_ms <= now);
            if due.is_some() {
                inner.pending_timer = None;
            }
            due
        };
        let Some(timer) = due else {
            return false;
        };
        tracing::debug!(timer = timer.token.0, now, "shutdown timer elapsed");
        let elapsed = DesktopAction::ShutdownTimerElapsed { token: timer.token };
        if let Err(err) = self.dispatch(elapsed) {
            tracing::warn!("shutdown timer dispatch failed: {err}");
        }
        true
    }

    /// Returns when the pending shutdown timer is due, in clock milliseconds.
    pub fn next_timer_due_ms(&self) -> Option<u64> {
        self.inner.borrow().pending_timer.map(|timer| timer.due_ms)
    }

    pub(crate) fn arm_timer(&self, timer: PendingTimer) {
        self.inner.borrow_mut().pending_timer = Some(timer);
    }

    pub(crate) fn disarm_timer(&self, token: TimerToken) {
        let mut inner = self.inner.borrow_mut();
        if inner.pending_timer.map(|timer| timer.token) == Some(token) {
            inner.pending_timer = None;
        }
    }
}

impl std::fmt::Debug for DesktopRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopRuntime")
            .field("frame", &self.frame())
            .field("next_timer_due_ms", &self.next_timer_due_ms())
            .finish_non_exhaustive()
    }
}
