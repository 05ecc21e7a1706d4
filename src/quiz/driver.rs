//! Runs a [`QuizSession`] on a tokio task.
//!
//! The task owns the session and the one armed timer. Commands arrive over an
//! mpsc channel and every change is published through a `watch` channel.

use super::questions::Question;
use super::session::{Phase, QuizSession, Schedule, TimerEvent, TimerKind};
use crate::config::QuizConfig;
use crate::errors::QuizError;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

const COMMAND_BUFFER: usize = 16;

#[derive(Debug)]
pub enum SessionCommand {
    Start(Vec<Question>),
    Answer(String),
    Reset,
    Shutdown,
}

/// What observers see after each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub score: usize,
    pub total: usize,
    pub current: Option<Question>,
    /// The last command the session rejected, cleared by the next accepted one.
    pub last_error: Option<QuizError>,
}

impl SessionSnapshot {
    fn of(session: &QuizSession, last_error: Option<QuizError>) -> Self {
        Self {
            phase: session.phase().clone(),
            score: session.score(),
            total: session.questions().len(),
            current: session.current().cloned(),
            last_error,
        }
    }
}

struct ArmedTimer {
    event: TimerEvent,
    deadline: Instant,
    repeat: Option<Duration>,
}

struct SessionDriver {
    session: QuizSession,
    timer: Option<ArmedTimer>,
    last_error: Option<QuizError>,
    publisher: watch::Sender<SessionSnapshot>,
}

impl SessionDriver {
    fn new(session: QuizSession, publisher: watch::Sender<SessionSnapshot>) -> Self {
        Self {
            session,
            timer: None,
            last_error: None,
            publisher,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        loop {
            let deadline = self.timer.as_ref().map(|timer| timer.deadline);
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                _ = sleep_until_armed(deadline) => self.fire(),
            }
            self.publish();
        }
        tracing::debug!("Quiz session driver stopped");
    }

    fn handle(&mut self, command: SessionCommand) {
        let result = match command {
            SessionCommand::Start(questions) => self.session.start(questions),
            SessionCommand::Answer(selected) => self.session.answer(&selected),
            SessionCommand::Reset => Ok(self.session.reset()),
            SessionCommand::Shutdown => Ok(Schedule::Unchanged),
        };
        match result {
            Ok(schedule) => {
                self.last_error = None;
                self.arm(schedule);
            }
            Err(err) => {
                tracing::warn!("Rejected quiz command: {}", err);
                self.last_error = Some(err);
            }
        }
    }

    fn fire(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        match self.session.on_timer(timer.event) {
            Schedule::Unchanged => {
                if let Some(period) = timer.repeat {
                    self.timer = Some(ArmedTimer {
                        deadline: timer.deadline + period,
                        ..timer
                    });
                }
            }
            schedule => self.arm(schedule),
        }
    }

    fn arm(&mut self, schedule: Schedule) {
        match schedule {
            Schedule::Unchanged => {}
            Schedule::Idle => self.timer = None,
            Schedule::Countdown { epoch, period } => {
                self.timer = Some(ArmedTimer {
                    event: TimerEvent {
                        kind: TimerKind::Countdown,
                        epoch,
                    },
                    deadline: Instant::now() + period,
                    repeat: Some(period),
                });
            }
            Schedule::Advance { epoch, after } => {
                self.timer = Some(ArmedTimer {
                    event: TimerEvent {
                        kind: TimerKind::Advance,
                        epoch,
                    },
                    deadline: Instant::now() + after,
                    repeat: None,
                });
            }
        }
    }

    fn publish(&self) {
        self.publisher
            .send_replace(SessionSnapshot::of(&self.session, self.last_error.clone()));
    }
}

async fn sleep_until_armed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Client side of a running session.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Returns `false` once the driver has stopped.
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub async fn start(&self, questions: Vec<Question>) -> bool {
        self.send(SessionCommand::Start(questions)).await
    }

    pub async fn answer(&self, selected: impl Into<String>) -> bool {
        self.send(SessionCommand::Answer(selected.into())).await
    }

    pub async fn reset(&self) -> bool {
        self.send(SessionCommand::Reset).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Option<SessionSnapshot> {
        let mut receiver = self.snapshots.clone();
        let snapshot = receiver.wait_for(predicate).await.ok()?.clone();
        Some(snapshot)
    }

    /// Stop the driver and wait for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        if let Err(err) = self.task.await {
            tracing::warn!("Quiz session task ended abnormally: {}", err);
        }
    }
}

/// Spawn a driver for a fresh session on the current tokio runtime.
pub fn spawn_session(config: &QuizConfig) -> SessionHandle {
    let session = QuizSession::new(config);
    let (publisher, snapshots) = watch::channel(SessionSnapshot::of(&session, None));
    let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(SessionDriver::new(session, publisher).run(receiver));
    SessionHandle {
        commands,
        snapshots,
        task,
    }
}
