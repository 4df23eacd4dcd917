use chrono::{DateTime, Local, Utc};
use rand::Rng;

use crate::quiz::choices::ChoiceError;
use crate::quiz::generator::QuestionGenerator;
use crate::quiz::results::{self, SessionOutcome};
use crate::quiz::QuestionItem;
use crate::recorder::ResultRecorder;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a name is required before starting")]
    EmptyName,
    #[error("'{0}' is not one of the offered answers")]
    NotAChoice(String),
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("failed to generate questions: {0}")]
    Generation(#[from] ChoiceError),
}

/// Timing and batch sizes of a quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub duration_secs: i64,
    pub initial_batch: usize,
    pub extend_batch: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            initial_batch: 20,
            extend_batch: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub score: u32,
    pub attempted: u32,
    pub current: usize,
    pub questions: Vec<QuestionItem>,
}

impl QuizSession {
    pub fn start<R: Rng + ?Sized>(
        name: &str,
        generator: &QuestionGenerator,
        initial_batch: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            started_at: now,
            score: 0,
            attempted: 0,
            current: 0,
            questions: generator.batch(initial_batch.max(1), rng)?,
        })
    }

    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.questions.get(self.current)
    }

    /// Scores `answer` against the current question and moves on, topping the
    /// batch up when it runs out. Returns whether the answer was correct.
    pub fn submit<R: Rng + ?Sized>(
        &mut self,
        answer: &str,
        generator: &QuestionGenerator,
        extend_batch: usize,
        rng: &mut R,
    ) -> Result<bool, SessionError> {
        while self.current >= self.questions.len() {
            self.questions.extend(generator.batch(extend_batch.max(1), rng)?);
        }
        let question = &self.questions[self.current];

        if let Some(options) = &question.choices {
            if !options.iter().any(|o| o == answer.trim()) {
                return Err(SessionError::NotAChoice(answer.trim().to_string()));
            }
        }

        let correct = question.is_correct(answer);
        log::debug!(
            "{} answered {:?} to {:?}: {}",
            self.name,
            answer.trim(),
            question.text,
            if correct { "correct" } else { "wrong" }
        );

        self.attempted += 1;
        if correct {
            self.score += 1;
        }
        self.current += 1;

        if self.current >= self.questions.len() {
            self.questions.extend(generator.batch(extend_batch.max(1), rng)?);
        }
        Ok(correct)
    }

    pub fn elapsed_millis(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.started_at).num_milliseconds()
    }

    pub fn is_expired(&self, now: DateTime<Utc>, duration_secs: i64) -> bool {
        self.elapsed_millis(now) >= duration_secs * 1000
    }

    /// Whole seconds left, rounded up and never negative.
    pub fn remaining_secs(&self, now: DateTime<Utc>, duration_secs: i64) -> i64 {
        let left = duration_secs * 1000 - self.elapsed_millis(now);
        if left <= 0 {
            0
        } else {
            (left + 999) / 1000
        }
    }
}

/// The lifecycle of one user's quiz, stored per chat.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SessionState {
    /// Nothing has been said to this chat yet.
    #[default]
    Start,
    Idle,
    NameEntered {
        name: String,
    },
    Active {
        session: QuizSession,
    },
    Finished {
        outcome: SessionOutcome,
    },
}

impl SessionState {
    fn label(&self) -> &'static str {
        match self {
            SessionState::Start => "not greeted yet",
            SessionState::Idle => "idle",
            SessionState::NameEntered { .. } => "waiting to start",
            SessionState::Active { .. } => "a quiz is running",
            SessionState::Finished { .. } => "showing results",
        }
    }

    /// Start → Idle once the greeting has been sent.
    pub fn greet(&self) -> Result<SessionState, SessionError> {
        match self {
            SessionState::Start => Ok(SessionState::Idle),
            other => Err(SessionError::InvalidTransition {
                action: "greet",
                state: other.label(),
            }),
        }
    }

    pub fn enter_name(&self, input: &str) -> Result<SessionState, SessionError> {
        match self {
            SessionState::Idle | SessionState::NameEntered { .. } => {
                let name = input.trim();
                if name.is_empty() {
                    return Err(SessionError::EmptyName);
                }
                Ok(SessionState::NameEntered {
                    name: name.to_string(),
                })
            }
            other => Err(SessionError::InvalidTransition {
                action: "change the name",
                state: other.label(),
            }),
        }
    }

    pub fn start<R: Rng + ?Sized>(
        &self,
        generator: &QuestionGenerator,
        settings: &QuizSettings,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SessionState, SessionError> {
        match self {
            SessionState::NameEntered { name } => {
                let session =
                    QuizSession::start(name, generator, settings.initial_batch, now, rng)?;
                log::info!(
                    "{} started a quiz with {} questions",
                    session.name,
                    session.questions.len()
                );
                Ok(SessionState::Active { session })
            }
            SessionState::Idle => Err(SessionError::EmptyName),
            other => Err(SessionError::InvalidTransition {
                action: "start",
                state: other.label(),
            }),
        }
    }

    /// Records the session and moves to the results screen.
    pub async fn finish(
        session: &QuizSession,
        recorder: &dyn ResultRecorder,
        at: DateTime<Local>,
    ) -> SessionState {
        let outcome = results::record_session(session, recorder, at).await;
        log::info!(
            "{} finished with {}/{} ({}%)",
            outcome.record.name,
            outcome.record.score,
            outcome.record.attempted,
            outcome.record.accuracy
        );
        SessionState::Finished { outcome }
    }

    pub fn restart(&self) -> SessionState {
        SessionState::Idle
    }
}
