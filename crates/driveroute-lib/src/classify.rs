//! Failure classification into user-facing messages.
//!
//! Every message a user ends up seeing is produced by [`classify`]. Call sites
//! hand over whatever caused the failure plus a fallback, and never inline
//! their own fallback decisions.

use crate::error::Error;

/// A failure cause that may carry a message fit for display.
pub trait FailureCause {
    /// The readable message, if this cause has one.
    fn readable_message(&self) -> Option<String>;
}

impl FailureCause for str {
    fn readable_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FailureCause for String {
    fn readable_message(&self) -> Option<String> {
        self.as_str().readable_message()
    }
}

impl<T: FailureCause + ?Sized> FailureCause for &T {
    fn readable_message(&self) -> Option<String> {
        (**self).readable_message()
    }
}

impl<T: FailureCause> FailureCause for Option<T> {
    fn readable_message(&self) -> Option<String> {
        self.as_ref().and_then(FailureCause::readable_message)
    }
}

/// Server-reported failures and validation reasons are readable. Transport and
/// status failures are not: their text carries URLs and client internals.
impl FailureCause for Error {
    fn readable_message(&self) -> Option<String> {
        match self {
            Error::Domain { message } => message.clone(),
            Error::Shape(err) => Some(err.to_string()),
            Error::PollLimitExceeded { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

/// Resolve `cause` to a display message, falling back to `fallback` when the
/// cause has no readable (non-blank) message. Never fails.
pub fn classify<C: FailureCause + ?Sized>(cause: &C, fallback: &str) -> String {
    cause
        .readable_message()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
