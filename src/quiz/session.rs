//! Quiz session state machine.
//!
//! The session never sleeps. Every transition returns the [`Schedule`] the
//! owner has to arm, and timer callbacks come back in through
//! [`QuizSession::on_timer`] carrying the epoch they were armed under. Any
//! transition that arms or cancels a timer bumps the epoch, so a callback
//! from an older timer is ignored.

use super::questions::Question;
use crate::config::QuizConfig;
use crate::errors::{QuizError, QuizResult};
use std::time::Duration;

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerState {
    /// `time_left` is `None` for untimed questions.
    Unanswered { time_left: Option<u32> },
    Answered { selected: String, correct: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Active { index: usize, answer: AnswerState },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub epoch: u64,
}

/// What the owner should do with its timer after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Keep whatever is armed.
    Unchanged,
    /// Cancel the armed timer.
    Idle,
    /// Fire `TimerKind::Countdown` every `period`.
    Countdown { epoch: u64, period: Duration },
    /// Fire `TimerKind::Advance` once after `after`.
    Advance { epoch: u64, after: Duration },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    phase: Phase,
    score: usize,
    epoch: u64,
    question_time: u32,
    timed_advance: Duration,
    untimed_advance: Duration,
}

impl QuizSession {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            questions: Vec::new(),
            phase: Phase::Setup,
            score: 0,
            epoch: 0,
            question_time: config.question_time_secs,
            timed_advance: Duration::from_millis(config.timed_advance_ms),
            untimed_advance: Duration::from_millis(config.untimed_advance_ms),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&Question> {
        match &self.phase {
            Phase::Active { index, .. } => self.questions.get(*index),
            _ => None,
        }
    }

    pub fn start(&mut self, questions: Vec<Question>) -> QuizResult<Schedule> {
        if self.phase != Phase::Setup {
            return Err(QuizError::InvalidTransition(
                "a quiz is already running; reset first".to_string(),
            ));
        }
        if questions.is_empty() {
            return Err(QuizError::InvalidTransition(
                "cannot start a quiz with no questions".to_string(),
            ));
        }
        self.questions = questions;
        self.score = 0;
        Ok(self.enter_question(0))
    }

    fn enter_question(&mut self, index: usize) -> Schedule {
        self.epoch += 1;
        let timed = self.questions[index].timed;
        self.phase = Phase::Active {
            index,
            answer: AnswerState::Unanswered {
                time_left: timed.then_some(self.question_time),
            },
        };
        if timed {
            Schedule::Countdown {
                epoch: self.epoch,
                period: COUNTDOWN_PERIOD,
            }
        } else {
            Schedule::Idle
        }
    }

    /// Submit an answer to the current question.
    pub fn answer(&mut self, selected: &str) -> QuizResult<Schedule> {
        let index = match &self.phase {
            Phase::Active {
                index,
                answer: AnswerState::Unanswered { .. },
            } => *index,
            Phase::Active { .. } => {
                return Err(QuizError::InvalidTransition(
                    "question already answered".to_string(),
                ))
            }
            _ => {
                return Err(QuizError::InvalidTransition(
                    "no question is being asked".to_string(),
                ))
            }
        };

        let question = &self.questions[index];
        let correct = question.is_correct(selected);
        let after = if question.timed {
            self.timed_advance
        } else {
            self.untimed_advance
        };
        if correct {
            self.score += 1;
        }

        self.epoch += 1;
        self.phase = Phase::Active {
            index,
            answer: AnswerState::Answered {
                selected: selected.to_string(),
                correct,
            },
        };
        Ok(Schedule::Advance {
            epoch: self.epoch,
            after,
        })
    }

    /// Handle a timer firing. Events from an older epoch change nothing.
    pub fn on_timer(&mut self, event: TimerEvent) -> Schedule {
        if event.epoch != self.epoch {
            tracing::trace!("Ignoring stale {:?} timer", event.kind);
            return Schedule::Unchanged;
        }

        match (event.kind, &mut self.phase) {
            (
                TimerKind::Countdown,
                Phase::Active {
                    answer:
                        AnswerState::Unanswered {
                            time_left: Some(time_left),
                        },
                    ..
                },
            ) => {
                *time_left = time_left.saturating_sub(1);
                if *time_left > 0 {
                    return Schedule::Unchanged;
                }
                // Time ran out: an empty answer never matches
                self.answer("").unwrap_or(Schedule::Idle)
            }
            (
                TimerKind::Advance,
                Phase::Active {
                    index,
                    answer: AnswerState::Answered { .. },
                },
            ) => {
                let next = *index + 1;
                if next < self.questions.len() {
                    self.enter_question(next)
                } else {
                    self.epoch += 1;
                    self.phase = Phase::Completed;
                    Schedule::Idle
                }
            }
            _ => Schedule::Unchanged,
        }
    }

    /// Back to setup from any phase, cancelling any timer.
    pub fn reset(&mut self) -> Schedule {
        self.epoch += 1;
        self.phase = Phase::Setup;
        self.questions.clear();
        self.score = 0;
        Schedule::Idle
    }
}
