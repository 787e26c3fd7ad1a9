//! Property-based tests for keyed reconciliation.
//!
//! 1. **Coverage**: removed keys unmount once, added keys mount once, kept keys patch once.
//! 2. **Convergence**: replaying the operations on the old host yields the new order.
//! 3. **Minimal moves**: moves equal kept keys minus the LIS of their old positions.
//! 4. **LIS solver**: agrees in length with an independent implementation.

use keyed_reconciler::{diff, longest_increasing_subsequence, KeyedList, OperationKind, Recorder};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

/// Length of a longest increasing subsequence, computed by the `lis` crate.
fn reference_lis_len(values: &[usize]) -> usize {
    if values.is_empty() {
        0
    } else {
        lis::longest_increasing_subsequence(values).len()
    }
}

/// A duplicate-free key sequence drawn from a small alphabet, so old and new overlap often.
fn keys() -> impl Strategy<Value = Vec<u16>> {
    prop::sample::subsequence((0..24u16).collect::<Vec<_>>(), 0..=24).prop_shuffle()
}

/// A correlation array: distinct old positions scattered between empty slots.
fn correlation() -> impl Strategy<Value = Vec<Option<usize>>> {
    (
        prop::sample::subsequence((0..40usize).collect::<Vec<_>>(), 0..=40).prop_shuffle(),
        prop::collection::vec(any::<bool>(), 0..20),
    )
        .prop_map(|(values, gaps)| {
            let mut arr = Vec::new();
            let mut gaps = gaps.into_iter();
            for v in values {
                if gaps.next().unwrap_or(false) {
                    arr.push(None);
                }
                arr.push(Some(v));
            }
            arr.extend(gaps.map(|_| None));
            arr
        })
}

proptest! {
    #[test]
    fn prop_every_key_accounted_for_once(old in keys(), new in keys()) {
        let mut rec = Recorder::new();
        diff(&old, &new, &mut rec).unwrap();

        let old_set: HashSet<u16> = old.iter().copied().collect();
        let new_set: HashSet<u16> = new.iter().copied().collect();

        let mut counts: HashMap<(OperationKind, u16), usize> = HashMap::new();
        for op in rec.operations() {
            *counts.entry((op.kind(), *op.key())).or_default() += 1;
        }
        let count = |kind: OperationKind, key: u16| counts.get(&(kind, key)).copied().unwrap_or(0);

        for &key in old_set.union(&new_set) {
            let (kept, added, removed) = (
                old_set.contains(&key) && new_set.contains(&key),
                !old_set.contains(&key),
                !new_set.contains(&key),
            );
            prop_assert_eq!(count(OperationKind::Patch, key), usize::from(kept));
            prop_assert_eq!(count(OperationKind::Mount, key), usize::from(added));
            prop_assert_eq!(count(OperationKind::Unmount, key), usize::from(removed));
            if !kept {
                prop_assert_eq!(count(OperationKind::Move, key), 0);
            }
        }
    }

    #[test]
    fn prop_host_converges_to_new_order(old in keys(), new in keys()) {
        let mut host = KeyedList::new(old.iter().copied());
        diff(&old, &new, &mut host).unwrap();
        prop_assert_eq!(host.children(), new.as_slice());
    }

    #[test]
    fn prop_recorded_operations_replay_to_new_order(old in keys(), new in keys()) {
        let mut rec = Recorder::new();
        diff(&old, &new, &mut rec).unwrap();

        let mut host = KeyedList::new(old.iter().copied());
        host.apply_all(rec.operations()).unwrap();
        prop_assert_eq!(host.children(), new.as_slice());
    }

    #[test]
    fn prop_move_count_is_minimal(old in keys(), new in keys()) {
        let mut rec = Recorder::new();
        let stats = diff(&old, &new, &mut rec).unwrap();

        let old_position: HashMap<u16, usize> =
            old.iter().enumerate().map(|(i, &k)| (k, i)).collect();
        let kept_in_new_order: Vec<usize> =
            new.iter().filter_map(|k| old_position.get(k).copied()).collect();
        let in_place = reference_lis_len(&kept_in_new_order);

        prop_assert_eq!(stats.moved, kept_in_new_order.len() - in_place);
    }

    #[test]
    fn prop_identical_sequences_only_patch(seq in keys()) {
        let mut rec = Recorder::new();
        let stats = diff(&seq, &seq, &mut rec).unwrap();
        prop_assert_eq!(stats.patched, seq.len());
        prop_assert_eq!(rec.operations().len(), seq.len());
    }

    #[test]
    fn prop_lis_matches_reference_length(arr in correlation()) {
        let offsets = longest_increasing_subsequence(&arr);

        let present: Vec<usize> = arr.iter().flatten().copied().collect();
        prop_assert_eq!(offsets.len(), reference_lis_len(&present));

        prop_assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        let values: Vec<usize> = offsets.iter().map(|&o| arr[o]).collect::<Option<_>>().unwrap();
        prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
    }
}
