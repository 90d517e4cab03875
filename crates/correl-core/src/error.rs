// File: crates/correl-core/src/error.rs
// Summary: Error taxonomy for the correlation core; all variants are recoverable.

use thiserror::Error;

/// Errors produced by the correlation/mapping/resampling core.
///
/// None of these are fatal to a session: callers report them at the boundary
/// where the user action occurred and editing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelError {
    /// A candidate anchor would cross an existing connection: its rank among
    /// axis-A coordinates differs from its rank among axis-B coordinates,
    /// or one of its coordinates duplicates an existing anchor.
    #[error("anchor ({pos_a}, {pos_b}) would cross existing connections")]
    Crossing { pos_a: f64, pos_b: f64 },

    /// A mapping needs at least two anchors.
    #[error("mapping requires at least 2 anchors, have {have}")]
    InsufficientAnchors { have: usize },

    /// Non-finite or out-of-domain input.
    #[error("domain error: {reason}")]
    Domain { reason: String },

    /// Persisted correlation columns are not strictly increasing, not unique,
    /// or not parallel. Rejects the one correlation item, not the whole load.
    #[error("malformed correlation data: {reason}")]
    MalformedPersistedData { reason: String },

    /// Registry lookup found no item with the given id.
    #[error("unknown item {id}")]
    UnknownItem { id: String },

    /// Registry lookup found an item of the wrong kind for the operation.
    #[error("item {id} is not a {expected}")]
    WrongItemKind { id: String, expected: &'static str },
}

impl CorrelError {
    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        CorrelError::Domain { reason: reason.into() }
    }
}
