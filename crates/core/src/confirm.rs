//! Explicit user confirmation for destructive actions.
//!
//! The controller deletes unconditionally. Callers that need a "are you
//! sure?" step ask first and pass the answer in; only
//! [`Decision::Confirmed`] lets the action run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Confirmed,
    Declined,
}

impl Decision {
    pub fn from_bool(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }

    /// Run `action` only when confirmed. A declined prompt yields `None`.
    pub fn run<T>(self, action: impl FnOnce() -> T) -> Option<T> {
        self.is_confirmed().then(action)
    }
}
