//! Explicit runtime effect executor for reducer-emitted side effects.

use futures::{task::LocalSpawnExt, StreamExt};
use platform_host::{ContentStream, ServiceError};

use crate::{
    model::RequestToken,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::{DesktopRuntime, PendingTimer},
};

/// Executes effects in emission order.
pub(crate) fn run_effects(runtime: &DesktopRuntime, effects: Vec<RuntimeEffect>) {
    for effect in effects {
        run_effect(runtime, effect);
    }
}

fn run_effect(runtime: &DesktopRuntime, effect: RuntimeEffect) {
    match effect {
        RuntimeEffect::RequestGeneration { token, request } => {
            tracing::debug!(
                request = token.0,
                history = request.history.len(),
                "requesting generated content"
            );
            let stream = runtime.host().content_generator().generate(&request);
            let driver = drive_stream(runtime.clone(), token, stream);
            if let Err(err) = runtime.host().spawner().spawn_local(driver) {
                tracing::error!(request = token.0, "failed to spawn content stream: {err}");
                dispatch(
                    runtime,
                    DesktopAction::StreamFailed {
                        token,
                        error: ServiceError::Request(err.to_string()),
                    },
                );
            }
        }
        RuntimeEffect::ScheduleShutdownTimer { token, delay_ms } => {
            let due_ms = runtime.host().clock().now_ms().saturating_add(delay_ms);
            tracing::debug!(timer = token.0, due_ms, "shutdown timer scheduled");
            runtime.arm_timer(PendingTimer { token, due_ms });
        }
        RuntimeEffect::CancelShutdownTimer { token } => {
            tracing::debug!(timer = token.0, "shutdown timer cancelled");
            runtime.disarm_timer(token);
        }
    }
}

/// Feeds one content stream into the runtime until it ends, fails, or is superseded.
async fn drive_stream(runtime: DesktopRuntime, token: RequestToken, mut stream: ContentStream) {
    while let Some(item) = stream.next().await {
        if !runtime.is_current_request(token) {
            tracing::debug!(request = token.0, "abandoning superseded content stream");
            return;
        }
        match item {
            Ok(chunk) => dispatch(&runtime, DesktopAction::StreamChunk { token, chunk }),
            Err(error) => {
                dispatch(&runtime, DesktopAction::StreamFailed { token, error });
                return;
            }
        }
    }
    dispatch(&runtime, DesktopAction::StreamCompleted { token });
}

fn dispatch(runtime: &DesktopRuntime, action: DesktopAction) {
    if let Err(err) = runtime.dispatch(action) {
        tracing::warn!("stream event rejected: {err}");
    }
}
