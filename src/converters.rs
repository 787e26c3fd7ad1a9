//! JSON conversion of diff results, plus the Python bridge when enabled
use crate::diff_engine::DiffEngine;
use crate::errors::ReconcilerError;
use crate::handlers::Recorder;
use crate::types::{DiffOptions, DiffStats, DuplicateKeyPolicy, Operation};
use serde::Serialize;

/// Serialize operations as a JSON array of `{"action": ..., "key": ...}` objects.
pub fn operations_to_json<K: Serialize>(
    ops: &[Operation<K>],
) -> Result<serde_json::Value, ReconcilerError> {
    Ok(serde_json::to_value(ops)?)
}

/// Operations and counters of one diff as a single JSON object.
pub fn report_to_json<K: Serialize>(
    ops: &[Operation<K>],
    stats: &DiffStats,
) -> Result<serde_json::Value, ReconcilerError> {
    Ok(serde_json::json!({
        "operations": operations_to_json(ops)?,
        "stats": serde_json::to_value(stats)?,
    }))
}

/// Diff two lists of string keys into the JSON handed to Python's `diff_keys`.
#[cfg_attr(not(feature = "python"), allow(dead_code))]
pub(crate) fn string_keys_diff_to_json(
    old: &[String],
    new: &[String],
    reject_duplicates: bool,
) -> Result<serde_json::Value, ReconcilerError> {
    let policy = if reject_duplicates {
        DuplicateKeyPolicy::Reject
    } else {
        DuplicateKeyPolicy::LastWins
    };
    let mut recorder = Recorder::new();
    DiffEngine::new(old, new, &mut recorder)
        .with_options(DiffOptions::default().with_duplicate_keys(policy))
        .reconcile()?;
    operations_to_json(recorder.operations())
}

/// Convert JSON back to Python with proper type mapping
#[cfg(feature = "python")]
pub fn json_to_pyobject<'py>(
    py: pyo3::Python<'py>,
    value: &serde_json::Value,
) -> pyo3::PyResult<pyo3::Bound<'py, pyo3::PyAny>> {
    use pyo3::prelude::*;
    use pyo3::types::{PyDict, PyList};

    match value {
        serde_json::Value::Null => Ok(py.None().into_bound(py).into_any()),
        serde_json::Value::Bool(b) => Ok((*b).into_pyobject(py)?.to_owned().into_any()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.into_pyobject(py)?.into_any())
            } else if let Some(f) = n.as_f64() {
                Ok(f.into_pyobject(py)?.into_any())
            } else {
                Ok(n.to_string().into_pyobject(py)?.into_any())
            }
        }
        serde_json::Value::String(s) => Ok(s.as_str().into_pyobject(py)?.into_any()),
        serde_json::Value::Array(arr) => {
            let list = PyList::empty(py);
            for v in arr {
                list.append(json_to_pyobject(py, v)?)?;
            }
            Ok(list.into_any())
        }
        serde_json::Value::Object(map) => {
            let dict = PyDict::new(py);
            for (k, v) in map {
                dict.set_item(k, json_to_pyobject(py, v)?)?;
            }
            Ok(dict.into_any())
        }
    }
}
