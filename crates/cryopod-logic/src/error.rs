//! Command and dosing failures.
//!
//! Every variant is a local, recoverable condition. A failing operation
//! leaves the pod exactly as it was before the call.

use thiserror::Error;

/// Errors returned by pod commands and reservoir operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PodError {
    /// The command needs an occupant but the pod is empty.
    #[error("no occupant in the pod")]
    NoOccupant,
    /// An occupant is already inside the pod.
    #[error("pod is already occupied")]
    AlreadyOccupied,
    /// The command needs a beaker but none is loaded.
    #[error("no beaker loaded")]
    NotLoaded,
    /// A beaker is already loaded.
    #[error("a beaker is already loaded")]
    AlreadyLoaded,
    /// The beaker holds less than the requested amount.
    #[error("insufficient volume: requested {requested}, available {available}")]
    InsufficientVolume { requested: f32, available: f32 },
    /// A load volume or draw amount outside the valid range.
    #[error("invalid beaker volume: {0}")]
    InvalidVolume(f32),
    /// Action name not recognised by the command parser.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(PodError::NotLoaded.to_string(), "no beaker loaded");
        let e = PodError::InsufficientVolume {
            requested: 1.0,
            available: 0.0,
        };
        assert_eq!(e.to_string(), "insufficient volume: requested 1, available 0");
        assert_eq!(
            PodError::UnknownCommand("eject".into()).to_string(),
            "unknown command: eject"
        );
    }
}
