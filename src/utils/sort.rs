use indexmap::IndexMap;

/// Top `n` entries of a count map, highest count first.
///
/// The sort is stable, so equal counts keep the map's insertion order.
pub fn top_n_by_count<K>(counts: IndexMap<K, u64>, n: usize) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// Sort `(key, score)` pairs by descending score.
///
/// NaN scores are dropped. Stable, so ties keep input order.
pub fn sort_by_score_desc<K>(list: &mut Vec<(K, f64)>) {
    list.retain(|(_, s)| !s.is_nan());
    list.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Nearest-rank percentile without interpolation.
///
/// `sorted` must be ascending. The index is `floor(p / 100 * (n - 1))`.
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let index = ((p / 100.0) * (sorted.len() - 1) as f64).floor() as usize;
    sorted.get(index.min(sorted.len() - 1)).copied()
}

/// Ascending copy of `values` with NaN removed.
pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_insertion_order() {
        let mut counts = IndexMap::new();
        counts.insert("banana", 2);
        counts.insert("apple", 2);
        counts.insert("cherry", 5);
        counts.insert("date", 1);
        let top = top_n_by_count(counts, 3);
        assert_eq!(top, vec![("cherry", 5), ("banana", 2), ("apple", 2)]);
    }

    #[test]
    fn score_sort_is_stable_and_drops_nan() {
        let mut list = vec![("a", 0.5), ("b", f64::NAN), ("c", 0.9), ("d", 0.5)];
        sort_by_score_desc(&mut list);
        let keys: Vec<_> = list.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["c", "a", "d"]);
    }

    #[test]
    fn percentile_uses_floor_index() {
        let scores: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_eq!(percentile(&scores, 1.0), Some(1.0)); // index 0
        assert_eq!(percentile(&scores, 99.0), Some(99.0)); // index 98
        assert_eq!(percentile(&scores, 100.0), Some(100.0));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 99.0), Some(7.0));
    }
}
