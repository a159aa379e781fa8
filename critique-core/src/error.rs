//! Error taxonomy for the review session.
//!
//! Local precondition failures (`InvalidModel`, `NotReady`, `NothingToApply`)
//! are returned synchronously and never change session state. Failures of the
//! remote service are [`ServiceError`]s; the session absorbs them into its
//! error flag instead of returning them to unrelated callers.

use thiserror::Error;

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReadyReason {
    Busy,
    NoCode,
    Unauthenticated,
}

impl std::fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            NotReadyReason::Busy => "a review is already in progress",
            NotReadyReason::NoCode => "no code to review",
            NotReadyReason::Unauthenticated => "not signed in",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown review model `{0}`")]
    InvalidModel(String),
    #[error("cannot submit: {0}")]
    NotReady(NotReadyReason),
    #[error("no improved code to apply")]
    NothingToApply,
    #[error("host connection is closed")]
    HostDisconnected,
}

/// Failure of a single call to the remote review service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("review service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("review service reported an error: {0}")]
    Envelope(String),
    #[error("could not read review service response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("model catalog is empty")]
    Empty,
    #[error("model id `{0}` appears more than once in the catalog")]
    DuplicateId(String),
}
