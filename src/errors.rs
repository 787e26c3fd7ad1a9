// /src/errors.rs
//! Error types for reconciliation: precondition failures and handler failures
use std::convert::Infallible;
use std::fmt::Debug;
use thiserror::Error;

/// Which input sequence an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("Duplicate key {key} in {side} sequence at positions {first} and {second}")]
    DuplicateKey {
        side: Side,
        key: String,
        first: usize,
        second: usize,
    },

    #[error("Invalid options: {details}")]
    OptionsError { details: String },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Failure of a single diff run.
///
/// Handler errors abort the walk at the failing call. Operations already
/// delivered to the handlers are not rolled back.
#[derive(Error, Debug)]
pub enum DiffError<E> {
    #[error(transparent)]
    Reconciler(#[from] ReconcilerError),

    #[error("Handler failed: {0}")]
    Handler(#[source] E),
}

impl<E> DiffError<E> {
    /// The handler error, if this failure came from a handler.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            DiffError::Handler(e) => Some(e),
            DiffError::Reconciler(_) => None,
        }
    }
}

impl From<DiffError<Infallible>> for ReconcilerError {
    fn from(err: DiffError<Infallible>) -> Self {
        match err {
            DiffError::Reconciler(e) => e,
            DiffError::Handler(never) => match never {},
        }
    }
}

pub(crate) fn duplicate_key<K: Debug>(
    side: Side,
    key: &K,
    first: usize,
    second: usize,
) -> ReconcilerError {
    ReconcilerError::DuplicateKey {
        side,
        key: format!("{:?}", key),
        first,
        second,
    }
}

#[cfg(feature = "python")]
impl From<ReconcilerError> for pyo3::PyErr {
    fn from(err: ReconcilerError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
