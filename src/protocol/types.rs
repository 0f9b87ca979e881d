//! Token, status, and snapshot types.
//!
//! Status and channel values serialize as SCREAMING_SNAKE_CASE strings
//! (`WAITING`, `WITH_DOCTOR`, `WALK_IN`, ...) to match the wire format the
//! front-desk and display clients already speak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Partition key: all queue state is scoped to one calendar date.
pub type QueueDate = NaiveDate;

/// How a token entered the queue. Immutable once issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Appointment,
    #[default]
    WalkIn,
}

impl Channel {
    /// Dispatch priority lane: appointments (0) are always served before
    /// walk-ins (1).
    #[inline(always)]
    pub fn priority_class(self) -> u8 {
        match self {
            Channel::Appointment => 0,
            Channel::WalkIn => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Appointment => "APPOINTMENT",
            Channel::WalkIn => "WALK_IN",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token lifecycle status.
///
/// The state machine is strictly monotonic:
/// `WAITING -> WITH_DOCTOR -> COMPLETED` and `WAITING -> SKIPPED`.
/// No token ever re-enters `WAITING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenStatus {
    Waiting,
    WithDoctor,
    Completed,
    Skipped,
}

impl TokenStatus {
    /// Whether `self -> target` is a legal state machine edge.
    #[inline]
    pub fn can_transition_to(self, target: TokenStatus) -> bool {
        matches!(
            (self, target),
            (TokenStatus::Waiting, TokenStatus::WithDoctor)
                | (TokenStatus::Waiting, TokenStatus::Skipped)
                | (TokenStatus::WithDoctor, TokenStatus::Completed)
        )
    }

    #[inline(always)]
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenStatus::Completed | TokenStatus::Skipped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenStatus::Waiting => "WAITING",
            TokenStatus::WithDoctor => "WITH_DOCTOR",
            TokenStatus::Completed => "COMPLETED",
            TokenStatus::Skipped => "SKIPPED",
        }
    }
}

impl std::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch ordering key: lexicographic on (priority lane, arrival sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub class: u8,
    pub sequence: u64,
}

/// One patient's place in the queue for a given day.
///
/// Timestamps are epoch milliseconds; 0 means "not yet set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Display number, unique and monotonically increasing within the day.
    pub number: u64,
    /// Per-day arrival counter, the base ordering key. Distinct from `number`.
    pub sequence: u64,
    pub channel: Channel,
    /// Opaque patient identifier supplied by the caller.
    pub patient_ref: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Opaque appointment identifier; at most one non-terminal token per value.
    #[serde(default)]
    pub appointment_ref: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    pub status: TokenStatus,
    pub checked_in_at: u64,
    #[serde(default)]
    pub called_at: u64,
    #[serde(default)]
    pub completed_at: u64,
}

impl Token {
    #[inline(always)]
    pub fn sort_key(&self) -> SortKey {
        SortKey {
            class: self.channel.priority_class(),
            sequence: self.sequence,
        }
    }

    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Time spent waiting before being called, if the token was called.
    #[inline]
    pub fn wait_ms(&self) -> Option<u64> {
        if self.called_at > 0 {
            Some(self.called_at.saturating_sub(self.checked_in_at))
        } else {
            None
        }
    }
}

/// Check-in request from the reception interface.
///
/// `patient_ref` and `appointment_ref` are assumed already validated against
/// the relational store; the engine does not interpret them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckIn {
    pub channel: Channel,
    pub patient_ref: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub appointment_ref: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    /// Staff identity forwarded to the audit collaborator.
    #[serde(default)]
    pub actor: Option<String>,
}

/// Audit/analytics event, published fire-and-forget after every successful
/// check-in, dispatch, and terminal transition.
#[derive(Debug, Clone, Serialize)]
pub struct QueueEvent {
    pub event_type: String,
    pub date: QueueDate,
    pub token: Token,
    pub actor: Option<String>,
    pub timestamp: u64,
}

/// Point-in-time snapshot of one day's queue, grouped by status.
///
/// `waiting` is ordered by dispatch order; the other groups by arrival
/// sequence. Not a live stream - callers poll.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodayQueue {
    pub waiting: Vec<Token>,
    pub with_doctor: Vec<Token>,
    pub completed: Vec<Token>,
    pub skipped: Vec<Token>,
}

/// Read-only aggregate for the end-of-day summary job.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSummary {
    pub date: QueueDate,
    pub total_issued: u64,
    pub waiting: u64,
    pub with_doctor: u64,
    pub total_completed: u64,
    pub total_skipped: u64,
    /// Mean of `called_at - checked_in_at` over completed tokens.
    pub average_wait_ms: Option<u64>,
    pub current_token: Option<u64>,
}
