//! Error types for the actor runtime.

use thiserror::Error;

/// Errors returned by ask-style requests to an actor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The target actor is no longer running (stopped by DEL, or its
    /// mailbox closed before the reply was sent).
    #[error("actor stopped")]
    Stopped,

    /// The actor did not reply within the ask timeout. In-flight
    /// mutations are not rolled back.
    #[error("timed out waiting for actor reply")]
    Timeout,
}
