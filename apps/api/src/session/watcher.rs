//! Idle watcher task.
//!
//! One tokio task per session owns an [`IdleClock`], sleeps until the
//! clock's next deadline, and applies commands from the session's handle as
//! they arrive. The task ends on sign-out or when the handle goes away;
//! the latter never signs anyone out.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::session::idle::{IdleClock, IdleConfig, IdleEvent, IdlePhase};
use crate::session::terminator::{SessionSubject, SessionTerminator};
use crate::session::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleCommand {
    Activity,
    Visibility { visible: bool },
    Confirm,
    Decline,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleStatus {
    pub phase: IdlePhase,
    pub idle_ms: u64,
    pub hidden: bool,
    pub warn_after_ms: u64,
    pub sign_out_after_ms: u64,
}

impl IdleStatus {
    fn of(clock: &IdleClock, now: Instant) -> Self {
        let config = clock.config();
        Self {
            phase: clock.phase(),
            idle_ms: millis(clock.idle_for(now)),
            hidden: clock.is_hidden(),
            warn_after_ms: millis(config.warn_after),
            sign_out_after_ms: millis(config.sign_out_after),
        }
    }
}

struct Envelope {
    command: IdleCommand,
    reply: oneshot::Sender<IdleStatus>,
}

/// Owner's side of a running watcher. Dropping it stops the task.
pub struct IdleHandle {
    subject: SessionSubject,
    commands: mpsc::UnboundedSender<Envelope>,
    status: watch::Receiver<IdleStatus>,
    task: JoinHandle<()>,
}

impl IdleHandle {
    /// Last published status; may lag the clock by up to one deadline.
    pub fn latest(&self) -> IdleStatus {
        self.status.borrow().clone()
    }

    /// True once the task has ended, by sign-out or shutdown.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Applies `command` and returns the resulting status.
    pub async fn send(&self, command: IdleCommand) -> Result<IdleStatus, SessionError> {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Envelope { command, reply }).is_err() {
            return self.finished_status(command);
        }
        match response.await {
            Ok(status) => Ok(status),
            Err(_) => self.finished_status(command),
        }
    }

    fn finished_status(&self, command: IdleCommand) -> Result<IdleStatus, SessionError> {
        // A finished watcher can still report how it ended.
        if command == IdleCommand::Status {
            Ok(self.latest())
        } else {
            Err(SessionError::Finished(self.subject.session_id))
        }
    }

    /// Stops the watcher and clears its timers without signing out.
    pub async fn shutdown(self) {
        let IdleHandle { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!("Idle watcher task ended abnormally: {e}");
        }
    }
}

/// Starts the watcher for one session. Must be called inside a tokio runtime.
pub fn spawn_idle_watcher(
    config: IdleConfig,
    subject: SessionSubject,
    terminator: Arc<dyn SessionTerminator>,
) -> IdleHandle {
    let now = Instant::now();
    let clock = IdleClock::new(config, now);
    let (commands, inbox) = mpsc::unbounded_channel();
    let (status_tx, status) = watch::channel(IdleStatus::of(&clock, now));

    let task = tokio::spawn(run(clock, subject.clone(), terminator, inbox, status_tx));

    IdleHandle {
        subject,
        commands,
        status,
        task,
    }
}

async fn run(
    mut clock: IdleClock,
    subject: SessionSubject,
    terminator: Arc<dyn SessionTerminator>,
    mut inbox: mpsc::UnboundedReceiver<Envelope>,
    status_tx: watch::Sender<IdleStatus>,
) {
    debug!(session_id = %subject.session_id, "Idle watcher started");
    loop {
        let deadline = clock.next_deadline();
        let mut reply = None;

        let event = tokio::select! {
            envelope = inbox.recv() => {
                let Some(Envelope { command, reply: r }) = envelope else {
                    debug!(session_id = %subject.session_id, "Idle watcher stopped");
                    return;
                };
                reply = Some(r);
                apply(&mut clock, command, Instant::now())
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                clock.evaluate(Instant::now())
            }
        };

        match event {
            Some(IdleEvent::Prompt) => {
                info!(session_id = %subject.session_id, "Session idle; prompting to stay signed in");
            }
            Some(IdleEvent::SignOut) => {
                if let Err(e) = terminator.sign_out(&subject).await {
                    warn!(session_id = %subject.session_id, "Idle sign-out failed: {e}");
                }
            }
            None => {}
        }

        let status = IdleStatus::of(&clock, Instant::now());
        status_tx.send_replace(status.clone());
        if let Some(reply) = reply {
            let _ = reply.send(status);
        }

        if clock.phase() == IdlePhase::SignedOut {
            return;
        }
    }
}

/// Thresholds already crossed are applied before the command, so a command
/// racing a deadline cannot undo a sign-out that was due.
fn apply(clock: &mut IdleClock, command: IdleCommand, now: Instant) -> Option<IdleEvent> {
    let due = clock.evaluate(now);
    if clock.phase() == IdlePhase::SignedOut {
        return due;
    }
    let caused = match command {
        IdleCommand::Activity => {
            clock.record_activity(now);
            None
        }
        IdleCommand::Visibility { visible: false } => {
            clock.hide(now);
            None
        }
        IdleCommand::Visibility { visible: true } => {
            clock.show(now);
            clock.evaluate(now)
        }
        IdleCommand::Confirm => {
            clock.confirm(now);
            None
        }
        IdleCommand::Decline => clock.decline(),
        IdleCommand::Status => None,
    };
    caused.or(due)
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
