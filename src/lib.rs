//! Keyed reconciliation of one sibling group.
//!
//! Given the old and the new ordered children of a parent, [`diff`] asks a
//! [`Handlers`] implementation to mount, patch, unmount and move elements so
//! the host ends up matching the new order, reusing every element whose key
//! survives and moving as few of them as possible.
//!
//! ```
//! use keyed_reconciler::{diff_keys, OperationKind};
//!
//! let ops = diff_keys(&["a", "b", "c"], &["c", "a", "b"]).unwrap();
//! let moves = ops.iter().filter(|op| op.kind() == OperationKind::Move).count();
//! assert_eq!(moves, 1);
//! ```
//!
//! Diagnostics go through the [`log`] facade: `debug` per phase, `trace` per
//! operation.
mod converters;
mod diff_engine;
mod errors;
mod handlers;
mod host;
mod move_set;
mod types;

pub use converters::{operations_to_json, report_to_json};
pub use diff_engine::{same_key, DiffEngine};
pub use errors::{DiffError, ReconcilerError, Side};
pub use handlers::{FnHandlers, Handlers, Recorder};
pub use host::{HostError, KeyedList};
pub use move_set::longest_increasing_subsequence;
pub use types::{DiffOptions, DiffStats, DuplicateKeyPolicy, Keyed, Operation, OperationKind};

/// Reconcile `old` into `new` with default options and key-only matching.
pub fn diff<T, H>(old: &[T], new: &[T], handlers: &mut H) -> Result<DiffStats, DiffError<H::Error>>
where
    T: Keyed,
    H: Handlers<T::Key>,
{
    DiffEngine::new(old, new, handlers).reconcile()
}

/// Like [`diff`], with explicit options.
pub fn diff_with_options<T, H>(
    old: &[T],
    new: &[T],
    handlers: &mut H,
    options: DiffOptions,
) -> Result<DiffStats, DiffError<H::Error>>
where
    T: Keyed,
    H: Handlers<T::Key>,
{
    DiffEngine::new(old, new, handlers).with_options(options).reconcile()
}

/// The operations that turn `old` into `new`, in emission order.
pub fn diff_keys<T: Keyed>(
    old: &[T],
    new: &[T],
) -> Result<Vec<Operation<T::Key>>, ReconcilerError> {
    let mut recorder = Recorder::new();
    diff(old, new, &mut recorder)?;
    Ok(recorder.into_operations())
}

#[cfg(feature = "python")]
mod python {
    use crate::converters::{json_to_pyobject, string_keys_diff_to_json};
    use crate::OperationKind;
    use pyo3::prelude::*;

    /// Diff two lists of string keys; returns a list of operation dicts.
    #[pyfunction]
    #[pyo3(signature = (old, new, reject_duplicates=true))]
    fn diff_keys<'py>(
        py: Python<'py>,
        old: Vec<String>,
        new: Vec<String>,
        reject_duplicates: bool,
    ) -> PyResult<Bound<'py, PyAny>> {
        let json = string_keys_diff_to_json(&old, &new, reject_duplicates)?;
        json_to_pyobject(py, &json)
    }

    #[pymodule]
    fn keyed_reconciler(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(diff_keys, m)?)?;

        for kind in [
            OperationKind::Mount,
            OperationKind::Patch,
            OperationKind::Unmount,
            OperationKind::Move,
        ] {
            m.add(kind.as_str(), kind.as_str())?;
        }

        Ok(())
    }
}
