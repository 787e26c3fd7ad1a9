//! In-memory host list that applies operations the way a live tree would
use crate::types::Operation;
use std::fmt::Debug;
use thiserror::Error;

use crate::handlers::Handlers;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Element {key} is already mounted")]
    AlreadyMounted { key: String },

    #[error("Element {key} is not mounted")]
    NotMounted { key: String },

    #[error("Anchor {anchor} for element {key} is not mounted")]
    MissingAnchor { key: String, anchor: String },
}

/// Ordered children of one parent, addressed by key.
///
/// Mounts and moves insert in front of their anchor; patches only count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedList<K> {
    children: Vec<K>,
    patches: usize,
}

impl<K: PartialEq + Clone + Debug> KeyedList<K> {
    pub fn new(children: impl IntoIterator<Item = K>) -> Self {
        KeyedList {
            children: children.into_iter().collect(),
            patches: 0,
        }
    }

    pub fn children(&self) -> &[K] {
        &self.children
    }

    pub fn patch_count(&self) -> usize {
        self.patches
    }

    /// Replay recorded operations against this list.
    pub fn apply_all<'a>(
        &mut self,
        ops: impl IntoIterator<Item = &'a Operation<K>>,
    ) -> Result<(), HostError>
    where
        K: 'a,
    {
        for op in ops {
            match op {
                Operation::Mount { key, before } => self.mount_before(key, before.as_ref())?,
                Operation::Patch { key } => self.patch(key)?,
                Operation::Unmount { key } => self.unmount(key)?,
                Operation::Move { key, before } => self.move_before(key, before.as_ref())?,
            }
        }
        Ok(())
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.children.iter().position(|k| k == key)
    }

    fn insert_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), HostError> {
        let at = match anchor {
            Some(anchor) => self.position(anchor).ok_or_else(|| HostError::MissingAnchor {
                key: format!("{:?}", key),
                anchor: format!("{:?}", anchor),
            })?,
            None => self.children.len(),
        };
        self.children.insert(at, key.clone());
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<(), HostError> {
        let at = self.position(key).ok_or_else(|| HostError::NotMounted {
            key: format!("{:?}", key),
        })?;
        self.children.remove(at);
        Ok(())
    }
}

impl<K: PartialEq + Clone + Debug> Handlers<K> for KeyedList<K> {
    type Error = HostError;

    fn mount_element(&mut self, key: &K) -> Result<(), HostError> {
        self.mount_before(key, None)
    }

    fn patch(&mut self, key: &K) -> Result<(), HostError> {
        if self.position(key).is_none() {
            return Err(HostError::NotMounted {
                key: format!("{:?}", key),
            });
        }
        self.patches += 1;
        Ok(())
    }

    fn unmount(&mut self, key: &K) -> Result<(), HostError> {
        self.remove(key)
    }

    fn move_element(&mut self, key: &K) -> Result<(), HostError> {
        self.move_before(key, None)
    }

    fn mount_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), HostError> {
        if self.position(key).is_some() {
            return Err(HostError::AlreadyMounted {
                key: format!("{:?}", key),
            });
        }
        self.insert_before(key, anchor)
    }

    fn move_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), HostError> {
        self.remove(key)?;
        self.insert_before(key, anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_and_move_respect_anchor() {
        let mut list = KeyedList::new(["a", "b", "c"]);
        list.mount_before(&"x", Some(&"b")).unwrap();
        assert_eq!(list.children(), ["a", "x", "b", "c"]);

        list.move_before(&"c", Some(&"a")).unwrap();
        assert_eq!(list.children(), ["c", "a", "x", "b"]);

        list.move_element(&"c").unwrap();
        assert_eq!(list.children(), ["a", "x", "b", "c"]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut list = KeyedList::new([1, 2]);
        assert_eq!(
            list.unmount(&3),
            Err(HostError::NotMounted { key: "3".into() })
        );
        assert!(matches!(list.mount_element(&1), Err(HostError::AlreadyMounted { .. })));
        assert!(matches!(
            list.mount_before(&5, Some(&9)),
            Err(HostError::MissingAnchor { .. })
        ));
        assert_eq!(list.children(), [1, 2]);
    }
}
