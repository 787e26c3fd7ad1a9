//! Keyed sibling diff: two-end scan, key correlation, LIS move set, emission
use super::errors::{duplicate_key, DiffError, ReconcilerError, Side};
use super::handlers::Handlers;
use super::move_set::longest_increasing_subsequence;
use super::types::*;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Default same-node predicate: elements match when their keys are equal.
pub fn same_key<T: Keyed>(a: &T, b: &T) -> bool {
    a.key() == b.key()
}

/// One reconciliation of an old and a new sibling sequence.
///
/// All scratch state (key map, correlation array, LIS) is built inside
/// [`DiffEngine::reconcile`] and dropped when it returns, so handlers may
/// start nested diffs of their own.
pub struct DiffEngine<'a, T, H, F = fn(&T, &T) -> bool> {
    old: &'a [T],
    new: &'a [T],
    handlers: &'a mut H,
    same_node: F,
    options: DiffOptions,
    stats: DiffStats,
}

impl<'a, T: Keyed, H: Handlers<T::Key>> DiffEngine<'a, T, H> {
    pub fn new(old: &'a [T], new: &'a [T], handlers: &'a mut H) -> Self {
        DiffEngine {
            old,
            new,
            handlers,
            same_node: same_key::<T>,
            options: DiffOptions::default(),
            stats: DiffStats::default(),
        }
    }
}

impl<'a, T, H, F> DiffEngine<'a, T, H, F> {
    /// Replace the same-node predicate, e.g. to also compare a type tag.
    /// The key map still correlates by key; a key hit that fails the
    /// predicate is unmounted and its new slot mounted afresh.
    pub fn with_predicate<G>(self, same_node: G) -> DiffEngine<'a, T, H, G>
    where
        G: Fn(&T, &T) -> bool,
    {
        DiffEngine {
            old: self.old,
            new: self.new,
            handlers: self.handlers,
            same_node,
            options: self.options,
            stats: self.stats,
        }
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }
}

impl<'a, T, H, F> DiffEngine<'a, T, H, F>
where
    T: Keyed,
    H: Handlers<T::Key>,
    F: Fn(&T, &T) -> bool,
{
    pub fn reconcile(mut self) -> Result<DiffStats, DiffError<H::Error>> {
        if self.options.duplicate_keys == DuplicateKeyPolicy::Reject {
            ensure_unique_keys(Side::Old, self.old)?;
            ensure_unique_keys(Side::New, self.new)?;
        }

        let (old, new) = (self.old, self.new);
        let mut i = 0;
        // exclusive ends of the unresolved ranges
        let mut old_end = old.len();
        let mut new_end = new.len();

        while i < old_end && i < new_end && (self.same_node)(&old[i], &new[i]) {
            self.patch(old[i].key())?;
            i += 1;
        }

        while i < old_end
            && i < new_end
            && (self.same_node)(&old[old_end - 1], &new[new_end - 1])
        {
            self.patch(old[old_end - 1].key())?;
            old_end -= 1;
            new_end -= 1;
        }

        log::debug!(
            "DiffEngine: old.len={} new.len={} prefix={} suffix={}",
            old.len(),
            new.len(),
            i,
            new.len() - new_end
        );

        if i >= old_end {
            // every remaining new element goes in front of the matched suffix
            let anchor = new.get(new_end).map(Keyed::key);
            for node in &new[i..new_end] {
                self.mount_element(node.key(), anchor)?;
            }
        } else if i >= new_end {
            for node in &old[i..old_end] {
                self.unmount(node.key())?;
            }
        } else {
            self.reconcile_middle(i, old_end, new_end)?;
        }

        log::debug!("DiffEngine: done {:?}", self.stats);
        Ok(self.stats)
    }

    fn reconcile_middle(
        &mut self,
        start: usize,
        old_end: usize,
        new_end: usize,
    ) -> Result<(), DiffError<H::Error>> {
        let (old, new) = (self.old, self.new);

        // a later duplicate overwrites the earlier entry's index
        let key_to_new_index: IndexMap<&T::Key, usize> = new[start..new_end]
            .iter()
            .enumerate()
            .map(|(offset, node)| (node.key(), start + offset))
            .collect();

        let to_be_patched = new_end - start;
        let mut new_index_to_old_index: Vec<Option<usize>> = vec![None; to_be_patched];
        let mut patched = 0;
        let mut moved = false;
        let mut max_new_index_so_far = 0;

        for old_index in start..old_end {
            let prev = &old[old_index];

            if patched >= to_be_patched {
                // every new slot already has a supplier
                self.unmount(prev.key())?;
                continue;
            }

            match key_to_new_index.get(prev.key()) {
                Some(&new_index) if (self.same_node)(prev, &new[new_index]) => {
                    new_index_to_old_index[new_index - start] = Some(old_index);
                    if new_index >= max_new_index_so_far {
                        max_new_index_so_far = new_index;
                    } else {
                        moved = true;
                    }
                    self.patch(prev.key())?;
                    patched += 1;
                }
                _ => self.unmount(prev.key())?,
            }
        }

        let increasing_new_index_sequence = if moved {
            longest_increasing_subsequence(&new_index_to_old_index)
        } else {
            Vec::new()
        };

        log::debug!(
            "DiffEngine: middle old=[{}, {}) new=[{}, {}) reused={} moved={} lis={}",
            start,
            old_end,
            start,
            new_end,
            patched,
            moved,
            increasing_new_index_sequence.len()
        );

        // consumed from the tail as the walk runs back to front
        let mut stable = increasing_new_index_sequence.iter().rev().peekable();

        for offset in (0..to_be_patched).rev() {
            let new_index = start + offset;
            let key = new[new_index].key();
            let anchor = new.get(new_index + 1).map(Keyed::key);

            match new_index_to_old_index[offset] {
                None => self.mount_element(key, anchor)?,
                Some(_) if moved => {
                    if stable.next_if_eq(&&offset).is_some() {
                        self.stats.stable += 1;
                    } else {
                        self.move_element(key, anchor)?;
                    }
                }
                Some(_) => self.stats.stable += 1,
            }
        }

        Ok(())
    }

    fn mount_element(
        &mut self,
        key: &T::Key,
        anchor: Option<&T::Key>,
    ) -> Result<(), DiffError<H::Error>> {
        log::trace!("DiffEngine: mount {:?} before {:?}", key, anchor);
        self.handlers.mount_before(key, anchor).map_err(DiffError::Handler)?;
        self.stats.record(OperationKind::Mount);
        Ok(())
    }

    fn patch(&mut self, key: &T::Key) -> Result<(), DiffError<H::Error>> {
        log::trace!("DiffEngine: patch {:?}", key);
        self.handlers.patch(key).map_err(DiffError::Handler)?;
        self.stats.record(OperationKind::Patch);
        Ok(())
    }

    fn unmount(&mut self, key: &T::Key) -> Result<(), DiffError<H::Error>> {
        log::trace!("DiffEngine: unmount {:?}", key);
        self.handlers.unmount(key).map_err(DiffError::Handler)?;
        self.stats.record(OperationKind::Unmount);
        Ok(())
    }

    fn move_element(
        &mut self,
        key: &T::Key,
        anchor: Option<&T::Key>,
    ) -> Result<(), DiffError<H::Error>> {
        log::trace!("DiffEngine: move {:?} before {:?}", key, anchor);
        self.handlers.move_before(key, anchor).map_err(DiffError::Handler)?;
        self.stats.record(OperationKind::Move);
        Ok(())
    }
}

fn ensure_unique_keys<T: Keyed>(side: Side, nodes: &[T]) -> Result<(), ReconcilerError> {
    let mut seen: HashMap<&T::Key, usize> = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if let Some(first) = seen.insert(node.key(), index) {
            return Err(duplicate_key(side, node.key(), first, index));
        }
    }
    Ok(())
}
