//! Session errors.

use thiserror::Error;

use super::effects::EffectKind;

/// Reasons a session refuses an operation outright.
///
/// Local validation problems are not errors; they come back as a warning on
/// the transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session is waiting on {0} and cannot accept input")]
    Busy(EffectKind),

    #[error("Session is closed")]
    Closed,

    #[error("Session is not waiting on any result")]
    NotAwaiting,

    #[error("Session is waiting on {expected}, got a {actual} result")]
    UnexpectedResolution {
        expected: EffectKind,
        actual: EffectKind,
    },
}
