//! Results of user-triggered actions.

use std::fmt;

/// Whether a control can be triggered right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Enabled,
    /// The same action is already in flight.
    Busy,
    /// A precondition is missing; the text says which.
    Blocked(&'static str),
}

impl Availability {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Availability::Enabled)
    }
}

/// Why a trigger did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Busy,
    Blocked(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Busy => f.write_str("already in progress"),
            SkipReason::Blocked(reason) => f.write_str(reason),
        }
    }
}

/// What happened when an action was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Completed; carries the confirmation shown to the user.
    Done(String),
    /// Disabled control; nothing was sent.
    Skipped(SkipReason),
    /// The call failed; carries the inline error message.
    Failed(String),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    /// Outcome for a control that is not enabled.
    pub fn from_availability(availability: Availability) -> Option<Self> {
        match availability {
            Availability::Enabled => None,
            Availability::Busy => Some(Outcome::Skipped(SkipReason::Busy)),
            Availability::Blocked(reason) => Some(Outcome::Skipped(SkipReason::Blocked(reason))),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done(message) => f.write_str(message),
            Outcome::Skipped(reason) => write!(f, "Skipped: {}", reason),
            Outcome::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}
