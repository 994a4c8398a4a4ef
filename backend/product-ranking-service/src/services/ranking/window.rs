use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Partitioned top-K: the in-memory form of
/// `ROW_NUMBER() OVER (PARTITION BY key ORDER BY ...) <= k`.
///
/// Rows are grouped by `partition_key`, each group is sorted with `order`
/// and truncated to its first `k` rows. Partitions come back in ascending
/// key order. Rank state lives only in this call.
pub fn windowed_top_k<'a, T, K, P, O>(
    rows: impl IntoIterator<Item = &'a T>,
    partition_key: P,
    order: O,
    k: usize,
) -> BTreeMap<K, Vec<&'a T>>
where
    T: 'a,
    K: Ord,
    P: Fn(&T) -> K,
    O: Fn(&T, &T) -> Ordering,
{
    let mut partitions: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for row in rows {
        partitions.entry(partition_key(row)).or_default().push(row);
    }

    for rows in partitions.values_mut() {
        rows.sort_by(|a, b| order(a, b));
        rows.truncate(k);
    }

    partitions.retain(|_, rows| !rows.is_empty());
    partitions
}
