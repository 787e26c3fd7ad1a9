//! Keyed elements, emitted operations and diff options
use crate::errors::ReconcilerError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// An element of a sibling group, identified by exactly one key.
pub trait Keyed {
    type Key: Hash + Eq + Clone + Debug;

    fn key(&self) -> &Self::Key;
}

macro_rules! self_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                type Key = $ty;

                fn key(&self) -> &$ty {
                    self
                }
            }
        )*
    };
}

self_keyed!(String, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<'a> Keyed for &'a str {
    type Key = &'a str;

    fn key(&self) -> &&'a str {
        self
    }
}

/// Operation kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Mount,
    Patch,
    Unmount,
    Move,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Mount => "MOUNT",
            OperationKind::Patch => "PATCH",
            OperationKind::Unmount => "UNMOUNT",
            OperationKind::Move => "MOVE",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural operation against the host tree.
///
/// `before` is the key of the new sibling the element is placed in front of;
/// `None` places it at the end of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation<K> {
    Mount { key: K, before: Option<K> },
    Patch { key: K },
    Unmount { key: K },
    Move { key: K, before: Option<K> },
}

impl<K> Operation<K> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Mount { .. } => OperationKind::Mount,
            Operation::Patch { .. } => OperationKind::Patch,
            Operation::Unmount { .. } => OperationKind::Unmount,
            Operation::Move { .. } => OperationKind::Move,
        }
    }

    pub fn key(&self) -> &K {
        match self {
            Operation::Mount { key, .. }
            | Operation::Patch { key }
            | Operation::Unmount { key }
            | Operation::Move { key, .. } => key,
        }
    }

    pub fn anchor(&self) -> Option<&K> {
        match self {
            Operation::Mount { before, .. } | Operation::Move { before, .. } => before.as_ref(),
            Operation::Patch { .. } | Operation::Unmount { .. } => None,
        }
    }
}

/// Counters for one diff run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub mounted: usize,
    pub patched: usize,
    pub unmounted: usize,
    pub moved: usize,
    /// Reused middle-range elements left in place because they lie on the LIS.
    pub stable: usize,
}

impl DiffStats {
    pub fn count(&self, kind: OperationKind) -> usize {
        match kind {
            OperationKind::Mount => self.mounted,
            OperationKind::Patch => self.patched,
            OperationKind::Unmount => self.unmounted,
            OperationKind::Move => self.moved,
        }
    }

    pub(crate) fn record(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Mount => self.mounted += 1,
            OperationKind::Patch => self.patched += 1,
            OperationKind::Unmount => self.unmounted += 1,
            OperationKind::Move => self.moved += 1,
        }
    }
}

/// What to do when a sequence contains the same key twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Validate both sequences up front and fail before any handler runs.
    #[default]
    Reject,
    /// Skip validation. The later duplicate wins the key map entry and surplus
    /// old matches are unmounted once every new slot is taken.
    LastWins,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl DiffOptions {
    pub fn from_json(s: &str) -> Result<Self, ReconcilerError> {
        serde_json::from_str(s).map_err(|e| ReconcilerError::OptionsError {
            details: e.to_string(),
        })
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}
