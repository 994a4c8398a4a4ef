// Ordering helpers shared by the ranking views
use std::cmp::Ordering;

/// Descending by score, then ascending by product code.
///
/// Every ranked view uses this so equal scores come out in the same order
/// on every call.
pub fn score_desc_then_code(a_score: i64, a_code: &str, b_score: i64, b_code: &str) -> Ordering {
    b_score.cmp(&a_score).then_with(|| a_code.cmp(b_code))
}

/// Index of the first maximum under `key`, scanning in order.
///
/// Later elements only win on a strictly greater key, so callers control
/// tie-breaking through the iteration order they pass in.
pub fn first_max_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        match &best {
            Some((_, best_k)) if k <= *best_k => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}
