//! Longest increasing subsequence over the correlation array

/// Offsets into `arr` whose values form a longest strictly increasing
/// subsequence of the `Some` entries, in ascending offset order.
///
/// `None` slots are skipped. Equal values never extend a run. O(n log n):
/// `tails[k]` holds the offset ending the best run of length `k + 1` seen so
/// far, and `predecessors` lets the final run be rebuilt, since earlier
/// `tails` entries get overwritten in place.
pub fn longest_increasing_subsequence(arr: &[Option<usize>]) -> Vec<usize> {
    let mut predecessors: Vec<Option<usize>> = vec![None; arr.len()];
    let mut tails: Vec<usize> = Vec::new();

    for (idx, slot) in arr.iter().enumerate() {
        let Some(value) = *slot else { continue };

        if let Some(&last) = tails.last() {
            if value_at(arr, last) < value {
                predecessors[idx] = Some(last);
                tails.push(idx);
                continue;
            }
        } else {
            tails.push(idx);
            continue;
        }

        // lower bound: first run whose tail is >= value
        let mut low = 0;
        let mut high = tails.len() - 1;
        while low < high {
            let mid = low + (high - low) / 2;
            if value_at(arr, tails[mid]) < value {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        if value < value_at(arr, tails[low]) {
            if low > 0 {
                predecessors[idx] = Some(tails[low - 1]);
            }
            tails[low] = idx;
        }
    }

    let mut lis = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(k) = cursor {
        lis.push(k);
        cursor = predecessors[k];
    }
    lis.reverse();
    lis
}

// Only ever called with offsets recorded from `Some` slots.
fn value_at(arr: &[Option<usize>], offset: usize) -> usize {
    arr[offset].unwrap_or(0)
}
