//! Client-side quiz state machine.
//!
//! ```text
//! Idle -> Loading -> InProgress -> Completing -> Completed -> (restart) Idle
//!            |  ^
//!            v  | retry
//!         LoadError -> (change topic) Idle
//! ```
//!
//! Model calls happen outside the flow. Every call the flow asks for is
//! described by a [`RequestTicket`]; its result is only applied if the
//! ticket still matches the live session.

use thiserror::Error;
use uuid::Uuid;

use crate::models::domain::{FeedbackResult, QuizItem};
use crate::session::state::QuizSession;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Ready(FeedbackResult),
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    LoadError(String),
    InProgress,
    Completing,
    Completed(FeedbackOutcome),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::LoadError(_) => "load error",
            Phase::InProgress => "in progress",
            Phase::Completing => "completing",
            Phase::Completed(_) => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("action not allowed while {0}")]
    NotAllowed(&'static str),
}

/// Identifies the session an outstanding generation call was made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTicket {
    pub session_id: Uuid,
    pub topic: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

/// Read-only view of one item after completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    pub number: usize,
    pub question: &'a str,
    pub chosen: Option<&'a str>,
    pub correct: Option<&'a str>,
    pub is_correct: bool,
}

#[derive(Debug, Default)]
pub struct QuizFlow {
    session: Option<QuizSession>,
    phase: Phase,
    index: usize,
}

impl QuizFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.topic.as_str())
    }

    pub fn items(&self) -> &[QuizItem] {
        self.session
            .as_ref()
            .map(|s| s.items.as_slice())
            .unwrap_or_default()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_item(&self) -> Option<&QuizItem> {
        self.items().get(self.index)
    }

    pub fn answered_count(&self) -> usize {
        self.session.as_ref().map_or(0, QuizSession::answered_count)
    }

    pub fn correct_count(&self) -> usize {
        self.session.as_ref().map_or(0, QuizSession::correct_count)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            index: self.index,
            total: self.items().len(),
            answered: self.answered_count(),
            correct: self.correct_count(),
        }
    }

    pub fn feedback(&self) -> Option<&FeedbackOutcome> {
        match &self.phase {
            Phase::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Starts a new session. Only valid from Idle; the returned ticket must
    /// accompany the question generation result.
    pub fn submit_topic(&mut self, topic: &str) -> Result<RequestTicket, FlowError> {
        self.require(matches!(self.phase, Phase::Idle))?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(FlowError::EmptyTopic);
        }

        let session = QuizSession::new(topic);
        let ticket = ticket_for(&session);
        log::debug!("Session {} started for '{}'", session.id, session.topic);

        self.session = Some(session);
        self.phase = Phase::Loading;
        self.index = 0;
        Ok(ticket)
    }

    /// Applies a question generation result. Returns false when the result
    /// is stale and was discarded.
    pub fn apply_questions(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Vec<QuizItem>, String>,
    ) -> bool {
        if !matches!(self.phase, Phase::Loading) || !self.is_current(ticket) {
            log::debug!("Discarding stale questions for '{}'", ticket.topic);
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match result {
            Ok(items) if !items.is_empty() => {
                session.items = items;
                self.index = 0;
                self.phase = Phase::InProgress;
            }
            Ok(_) => {
                session.items.clear();
                self.phase = Phase::LoadError("No questions were generated".to_string());
            }
            Err(message) => {
                session.items.clear();
                self.phase = Phase::LoadError(message);
            }
        }
        true
    }

    pub fn retry(&mut self) -> Result<RequestTicket, FlowError> {
        self.require(matches!(self.phase, Phase::LoadError(_)))?;
        let session = self
            .session
            .as_ref()
            .ok_or(FlowError::NotAllowed("idle"))?;

        let ticket = ticket_for(session);
        self.phase = Phase::Loading;
        Ok(ticket)
    }

    pub fn change_topic(&mut self) -> Result<(), FlowError> {
        self.require(matches!(self.phase, Phase::LoadError(_)))?;
        self.reset();
        Ok(())
    }

    /// Chooses an option for the current question. No effect outside InProgress.
    pub fn select_answer(&mut self, option: usize) -> bool {
        if !matches!(self.phase, Phase::InProgress) {
            return false;
        }
        let index = self.index;
        self.session
            .as_mut()
            .is_some_and(|session| session.select(index, option))
    }

    /// Moves back one question; browses the review once completed.
    pub fn previous(&mut self) -> bool {
        if !matches!(self.phase, Phase::InProgress | Phase::Completed(_)) || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Moves forward one question. At the last question while in progress
    /// this completes the quiz and returns the ticket for the feedback call.
    pub fn advance(&mut self) -> Option<RequestTicket> {
        let last = self.items().len().saturating_sub(1);

        match self.phase {
            Phase::InProgress if self.index >= last => {
                let ticket = self.session.as_ref().map(ticket_for)?;
                self.phase = Phase::Completing;
                Some(ticket)
            }
            Phase::InProgress | Phase::Completed(_) => {
                self.index = (self.index + 1).min(last);
                None
            }
            _ => None,
        }
    }

    /// Tab navigation, only while answering.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if !matches!(self.phase, Phase::InProgress) || index >= self.items().len() {
            return false;
        }
        self.index = index;
        true
    }

    /// Applies a feedback result. A failure still completes the quiz.
    pub fn apply_feedback(&mut self, ticket: &RequestTicket, result: Result<String, String>) -> bool {
        if !matches!(self.phase, Phase::Completing) || !self.is_current(ticket) {
            log::debug!("Discarding stale feedback for '{}'", ticket.topic);
            return false;
        }

        self.phase = Phase::Completed(match result {
            Ok(text) => FeedbackOutcome::Ready(FeedbackResult::new(text)),
            Err(message) => FeedbackOutcome::Failed(message),
        });
        true
    }

    pub fn review(&mut self) -> bool {
        if !matches!(self.phase, Phase::Completed(_)) {
            return false;
        }
        self.index = 0;
        true
    }

    pub fn review_entries(&self) -> Vec<ReviewEntry<'_>> {
        self.items()
            .iter()
            .enumerate()
            .map(|(i, item)| ReviewEntry {
                number: i + 1,
                question: &item.question,
                chosen: item.chosen_option(),
                correct: item.correct_option(),
                is_correct: item.is_correct(),
            })
            .collect()
    }

    /// Drops the session and any feedback, from any phase.
    pub fn restart(&mut self) {
        if let Some(session) = &self.session {
            log::debug!("Session {} for '{}' discarded", session.id, session.topic);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.session = None;
        self.phase = Phase::Idle;
        self.index = 0;
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.id == ticket.session_id && s.topic == ticket.topic)
    }

    fn require(&self, allowed: bool) -> Result<(), FlowError> {
        if allowed {
            Ok(())
        } else {
            Err(FlowError::NotAllowed(self.phase.name()))
        }
    }
}

fn ticket_for(session: &QuizSession) -> RequestTicket {
    RequestTicket {
        session_id: session.id,
        topic: session.topic.clone(),
    }
}
