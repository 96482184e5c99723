//! View state for each screen.
//!
//! Views hold what a screen shows, call the service modules, and derive
//! display-only aggregates. They never render; the shell turns their state
//! into output. Time is passed in as `now` so every derivation is
//! reproducible.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod form;
pub mod nav;

use thiserror::Error;

/// Input rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Appointment must be at least 24 hours in advance (earliest {earliest})")]
    TooSoon { earliest: String },
}

/// Interactive yes/no confirmation, the `window.confirm` of this client.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
