use std::fmt::Debug;

use serde::Serialize;

/// Scored results of a one-to-many similarity query
#[derive(Clone, PartialEq, Serialize)]
pub struct Hits<K> {
    /// (key, score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<(K, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score, NaN dropped. Stable, so ties keep input order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    /// keep the first `k` hits
    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    /// Replace keys, e.g. document indices by document ids.
    pub fn map_keys<T, F>(self, mut f: F) -> Hits<T>
    where
        F: FnMut(K) -> T,
    {
        Hits { list: self.list.into_iter().map(|(k, s)| (f(k), s)).collect() }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_truncate_map() {
        let mut hits = Hits::new(vec![(0, 0.1), (1, 0.7), (2, f64::NAN), (3, 0.7)]);
        hits.sort_by_score().truncate(2);
        let hits = hits.map_keys(|i| format!("doc{i}"));
        assert_eq!(hits.list, vec![("doc1".to_string(), 0.7), ("doc3".to_string(), 0.7)]);
        assert_eq!(format!("{:?}", Hits::<u8>::new(vec![])), "[]");
    }
}
