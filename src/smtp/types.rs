use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::deadline::Deadline;

/// A raw SMTP reply, preserving the numeric status code and message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// `250`, the only answer accepted for `NOOP`.
    pub fn is_ok(&self) -> bool {
        self.code == 250
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}

/// One host/port pair to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.host, self.port)
    }
}

/// Limits for one probe attempt: an absolute deadline, plus an optional flag
/// raised once an earlier port of the same host has already answered.
#[derive(Debug, Clone, Copy)]
pub struct ProbeBudget<'a> {
    deadline: Deadline,
    cancelled: Option<&'a AtomicBool>,
}

impl<'a> ProbeBudget<'a> {
    pub fn new(deadline: Deadline) -> Self {
        Self {
            deadline,
            cancelled: None,
        }
    }

    pub fn with_cancel(self, flag: &'a AtomicBool) -> Self {
        Self {
            cancelled: Some(flag),
            ..self
        }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    pub fn is_exhausted(&self) -> bool {
        self.is_cancelled() || self.deadline.expired()
    }

    /// How long the next blocking call may wait, at most `slice`. `None` once
    /// the attempt is cancelled or out of time.
    pub fn next_wait(&self, slice: Duration) -> Option<Duration> {
        if self.is_cancelled() {
            return None;
        }
        Some(self.deadline.cap(slice)).filter(|wait| !wait.is_zero())
    }
}
