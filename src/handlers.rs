//! Handler seam between the diff engine and the host tree
use crate::types::{DiffStats, Operation, OperationKind};
use std::convert::Infallible;

/// Side effects requested by the diff engine, addressed by key.
///
/// Every call is synchronous. Returning an error aborts the diff at that
/// call; nothing already applied is undone.
pub trait Handlers<K> {
    type Error;

    /// Create and insert a new element for `key`.
    fn mount_element(&mut self, key: &K) -> Result<(), Self::Error>;

    /// Update the existing element for `key` in place.
    fn patch(&mut self, key: &K) -> Result<(), Self::Error>;

    /// Remove the element for `key`.
    fn unmount(&mut self, key: &K) -> Result<(), Self::Error>;

    /// Reposition the existing element for `key`. No content update.
    fn move_element(&mut self, key: &K) -> Result<(), Self::Error>;

    /// Mount `key` in front of `anchor`, or at the end when `anchor` is `None`.
    fn mount_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Self::Error> {
        let _ = anchor;
        self.mount_element(key)
    }

    /// Move `key` in front of `anchor`, or to the end when `anchor` is `None`.
    fn move_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Self::Error> {
        let _ = anchor;
        self.move_element(key)
    }
}

impl<K, H: Handlers<K> + ?Sized> Handlers<K> for &mut H {
    type Error = H::Error;

    fn mount_element(&mut self, key: &K) -> Result<(), Self::Error> {
        (**self).mount_element(key)
    }

    fn patch(&mut self, key: &K) -> Result<(), Self::Error> {
        (**self).patch(key)
    }

    fn unmount(&mut self, key: &K) -> Result<(), Self::Error> {
        (**self).unmount(key)
    }

    fn move_element(&mut self, key: &K) -> Result<(), Self::Error> {
        (**self).move_element(key)
    }

    fn mount_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Self::Error> {
        (**self).mount_before(key, anchor)
    }

    fn move_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Self::Error> {
        (**self).move_before(key, anchor)
    }
}

/// Handlers assembled from four closures sharing one error type.
pub struct FnHandlers<M, P, U, V> {
    pub mount_element: M,
    pub patch: P,
    pub unmount: U,
    pub move_element: V,
}

impl<K, E, M, P, U, V> Handlers<K> for FnHandlers<M, P, U, V>
where
    M: FnMut(&K) -> Result<(), E>,
    P: FnMut(&K) -> Result<(), E>,
    U: FnMut(&K) -> Result<(), E>,
    V: FnMut(&K) -> Result<(), E>,
{
    type Error = E;

    fn mount_element(&mut self, key: &K) -> Result<(), E> {
        (self.mount_element)(key)
    }

    fn patch(&mut self, key: &K) -> Result<(), E> {
        (self.patch)(key)
    }

    fn unmount(&mut self, key: &K) -> Result<(), E> {
        (self.unmount)(key)
    }

    fn move_element(&mut self, key: &K) -> Result<(), E> {
        (self.move_element)(key)
    }
}

/// Records every requested operation, anchors included.
#[derive(Debug, Clone)]
pub struct Recorder<K> {
    operations: Vec<Operation<K>>,
    stats: DiffStats,
}

impl<K> Default for Recorder<K> {
    fn default() -> Self {
        Recorder {
            operations: Vec::new(),
            stats: DiffStats::default(),
        }
    }
}

impl<K> Recorder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation<K>] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation<K>> {
        self.operations
    }

    /// Keys of the recorded operations of one kind, in emission order.
    pub fn keys_of(&self, kind: OperationKind) -> Vec<&K> {
        self.operations
            .iter()
            .filter(|op| op.kind() == kind)
            .map(Operation::key)
            .collect()
    }

    pub fn count(&self, kind: OperationKind) -> usize {
        self.stats.count(kind)
    }

    fn push(&mut self, op: Operation<K>) {
        self.stats.record(op.kind());
        self.operations.push(op);
    }
}

impl<K: Clone> Handlers<K> for Recorder<K> {
    type Error = Infallible;

    fn mount_element(&mut self, key: &K) -> Result<(), Infallible> {
        self.mount_before(key, None)
    }

    fn patch(&mut self, key: &K) -> Result<(), Infallible> {
        self.push(Operation::Patch { key: key.clone() });
        Ok(())
    }

    fn unmount(&mut self, key: &K) -> Result<(), Infallible> {
        self.push(Operation::Unmount { key: key.clone() });
        Ok(())
    }

    fn move_element(&mut self, key: &K) -> Result<(), Infallible> {
        self.move_before(key, None)
    }

    fn mount_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Infallible> {
        self.push(Operation::Mount {
            key: key.clone(),
            before: anchor.cloned(),
        });
        Ok(())
    }

    fn move_before(&mut self, key: &K, anchor: Option<&K>) -> Result<(), Infallible> {
        self.push(Operation::Move {
            key: key.clone(),
            before: anchor.cloned(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_receive_keys() {
        let mut log = Vec::new();
        {
            let log = std::cell::RefCell::new(&mut log);
            let mut handlers = FnHandlers {
                mount_element: |k: &u32| -> Result<(), ()> {
                    log.borrow_mut().push(format!("mount {}", k));
                    Ok(())
                },
                patch: |k: &u32| -> Result<(), ()> {
                    log.borrow_mut().push(format!("patch {}", k));
                    Ok(())
                },
                unmount: |k: &u32| -> Result<(), ()> {
                    log.borrow_mut().push(format!("unmount {}", k));
                    Ok(())
                },
                move_element: |k: &u32| -> Result<(), ()> {
                    log.borrow_mut().push(format!("move {}", k));
                    Ok(())
                },
            };
            handlers.mount_before(&1, Some(&2)).unwrap();
            handlers.patch(&2).unwrap();
            handlers.move_before(&3, None).unwrap();
            handlers.unmount(&4).unwrap();
        }
        assert_eq!(log, vec!["mount 1", "patch 2", "move 3", "unmount 4"]);
    }

    #[test]
    fn recorder_keeps_anchors_and_counts() {
        let mut rec = Recorder::new();
        rec.patch(&'a').unwrap();
        rec.mount_before(&'b', Some(&'c')).unwrap();
        rec.move_element(&'c').unwrap();

        assert_eq!(rec.count(OperationKind::Patch), 1);
        assert_eq!(rec.keys_of(OperationKind::Mount), vec![&'b']);
        assert_eq!(rec.operations()[1].anchor(), Some(&'c'));
        assert_eq!(rec.operations()[2].anchor(), None);
    }
}
