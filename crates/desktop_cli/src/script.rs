//! Replays a [`SessionConfig`] script against a live desktop runtime.

use std::{rc::Rc, thread, time::Duration};

use desktop_app_contract::{InteractionData, SIGN_OUT_ID};
use desktop_runtime::{
    app_definition, DesktopAction, DesktopHostContext, DesktopPreferences, DesktopRuntime,
};
use futures::executor::LocalPool;
use platform_host::{Clock, ContentGenerator, ManualClock, SystemClock};

use crate::{
    config::ScriptStep,
    error::{CliError, CliResult},
};

enum TimeSource {
    Simulated(ManualClock),
    Realtime,
}

/// Outcome counters for one replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Steps the runtime accepted.
    pub applied: usize,
    /// Steps rejected because the session was not running.
    pub rejected: usize,
}

/// Owns the executor, clock and runtime for a scripted session.
pub struct ScriptRunner {
    pool: LocalPool,
    time: TimeSource,
    runtime: DesktopRuntime,
}

impl ScriptRunner {
    /// Boots a runtime on `generator`.
    ///
    /// With `realtime` unset, time only moves on `wait` steps, so replays are instantaneous and
    /// deterministic.
    pub fn new(
        generator: Rc<dyn ContentGenerator>,
        preferences: DesktopPreferences,
        realtime: bool,
    ) -> Self {
        let pool = LocalPool::new();
        let time = if realtime {
            TimeSource::Realtime
        } else {
            TimeSource::Simulated(ManualClock::starting_at(0))
        };
        let clock: Rc<dyn Clock> = match &time {
            TimeSource::Simulated(clock) => Rc::new(clock.clone()),
            TimeSource::Realtime => Rc::new(SystemClock),
        };
        let host = DesktopHostContext::new(generator, clock, Rc::new(pool.spawner()));
        let runtime = DesktopRuntime::new(host, preferences);
        Self {
            pool,
            time,
            runtime,
        }
    }

    /// The runtime being driven.
    pub fn runtime(&self) -> &DesktopRuntime {
        &self.runtime
    }

    /// Replays every step in order.
    pub fn run(&mut self, steps: &[ScriptStep]) -> CliResult<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for (index, step) in steps.iter().enumerate() {
            if self.run_step(index + 1, step)? {
                summary.applied += 1;
            } else {
                summary.rejected += 1;
            }
        }
        Ok(summary)
    }

    /// Runs one step and lets spawned streams and due timers settle.
    ///
    /// Returns `false` when the runtime rejected the step.
    pub fn run_step(&mut self, number: usize, step: &ScriptStep) -> CliResult<bool> {
        tracing::debug!(step = number, ?step, "replaying step");
        let accepted = match step {
            ScriptStep::Wait { ms } => {
                self.wait(*ms);
                true
            }
            other => {
                let action = self.action_for(number, other)?;
                self.runtime.dispatch(action).is_ok()
            }
        };
        self.pool.run_until_stalled();
        if self.runtime.poll_timers() {
            self.pool.run_until_stalled();
        }
        Ok(accepted)
    }

    fn wait(&self, ms: u64) {
        match &self.time {
            TimeSource::Simulated(clock) => clock.advance(ms),
            TimeSource::Realtime => thread::sleep(Duration::from_millis(ms)),
        }
    }

    fn action_for(&self, number: usize, step: &ScriptStep) -> CliResult<DesktopAction> {
        let action = match step {
            ScriptStep::OpenApp { app_id } => {
                let app = app_definition(app_id).ok_or_else(|| CliError::UnknownApp {
                    step: number,
                    app_id: app_id.clone(),
                })?;
                DesktopAction::OpenApp(app)
            }
            ScriptStep::Interact {
                id,
                kind,
                element_text,
                element_type,
                value,
            } => {
                let mut interaction = InteractionData::new(id.as_str(), kind.as_str());
                interaction.element_text = element_text.clone();
                interaction.element_type = element_type.clone();
                interaction.value = value.clone();
                DesktopAction::Interact(self.in_app_context(interaction))
            }
            ScriptStep::Close => DesktopAction::Close,
            ScriptStep::CloseApp => DesktopAction::CloseApp,
            ScriptStep::ToggleParameters => DesktopAction::ToggleParameters,
            ScriptStep::ToggleStartMenu => DesktopAction::ToggleStartMenu,
            ScriptStep::SignIn { email } => {
                DesktopAction::Interact(InteractionData::sign_in_success(email.as_str()))
            }
            ScriptStep::SignOut => DesktopAction::Interact(
                self.in_app_context(InteractionData::new(SIGN_OUT_ID, "click")),
            ),
            ScriptStep::SetHistoryLimit { max_history_length } => {
                DesktopAction::SetHistoryLimit {
                    max_history_length: *max_history_length,
                }
            }
            ScriptStep::SetStatefulness { enabled } => {
                DesktopAction::SetStatefulness { enabled: *enabled }
            }
            ScriptStep::Shutdown => DesktopAction::Shutdown,
            ScriptStep::Reboot => DesktopAction::Reboot,
            ScriptStep::Wait { .. } => {
                return Err(CliError::Usage("wait steps carry no action".to_string()))
            }
        };
        Ok(action)
    }

    fn in_app_context(&self, interaction: InteractionData) -> InteractionData {
        match self.runtime.with_state(|state| state.active_app().map(|app| app.id)) {
            Some(app_id) => interaction.with_app_context(app_id),
            None => interaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use desktop_runtime::SessionState;
    use platform_host::ScriptedContentGenerator;
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(app_id: &str) -> ScriptStep {
        ScriptStep::OpenApp {
            app_id: app_id.into(),
        }
    }

    fn click(id: &str) -> ScriptStep {
        ScriptStep::Interact {
            id: id.into(),
            kind: "click".into(),
            element_text: None,
            element_type: None,
            value: None,
        }
    }

    #[test]
    fn interactions_carry_the_active_app_as_context() {
        let generator = ScriptedContentGenerator::with_fallback(["<p>ok</p>"]);
        let mut runner = ScriptRunner::new(
            Rc::new(generator.clone()),
            DesktopPreferences {
                max_history_length: 2,
                statefulness_enabled: false,
            },
            false,
        );
        let summary = runner
            .run(&[open("google_calendar_app"), click("calendar_next_week")])
            .expect("replay");
        assert_eq!(summary.applied, 2);

        let requests = generator.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].history[0].app_context.as_deref(),
            Some("google_calendar_app")
        );
        assert_eq!(runner.runtime().frame().content, "<p>ok</p>");
    }

    #[test]
    fn waits_drive_the_shutdown_timer_on_simulated_time() {
        let mut runner = ScriptRunner::new(
            Rc::new(ScriptedContentGenerator::default()),
            DesktopPreferences::default(),
            false,
        );
        let summary = runner
            .run(&[
                ScriptStep::Shutdown,
                ScriptStep::ToggleStartMenu,
                ScriptStep::Wait { ms: 2_499 },
            ])
            .expect("replay");
        assert_eq!(summary, ReplaySummary { applied: 2, rejected: 1 });
        assert_eq!(runner.runtime().frame().session, SessionState::ShuttingDown);

        runner.run(&[ScriptStep::Wait { ms: 1 }]).expect("replay");
        assert_eq!(runner.runtime().frame().session, SessionState::Off);

        runner.run(&[ScriptStep::Reboot]).expect("replay");
        assert_eq!(runner.runtime().frame().session, SessionState::Desktop);
    }

    #[test]
    fn sign_in_and_out_steps_change_the_user() {
        let mut runner = ScriptRunner::new(
            Rc::new(ScriptedContentGenerator::default()),
            DesktopPreferences::default(),
            false,
        );
        runner
            .run(&[
                open("account_app"),
                ScriptStep::SignIn {
                    email: "robin@example.com".into(),
                },
            ])
            .expect("replay");
        let frame = runner.runtime().frame();
        assert!(frame.user.is_signed_in);
        assert_eq!(frame.user.name, "Robin");

        runner.run(&[ScriptStep::SignOut]).expect("replay");
        assert!(!runner.runtime().frame().user.is_signed_in);
    }

    #[test]
    fn unknown_app_stops_the_replay() {
        let mut runner = ScriptRunner::new(
            Rc::new(ScriptedContentGenerator::default()),
            DesktopPreferences::default(),
            false,
        );
        let err = runner
            .run(&[ScriptStep::Close, open("nope")])
            .expect_err("unknown app");
        assert!(matches!(err, CliError::UnknownApp { step: 2, .. }));
    }
}
