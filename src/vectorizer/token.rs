use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TokenFrequency
/// Raw token counts of one document.
///
/// Tokens keep the order in which they were first added, which is what makes
/// vocabulary order and frequency tie-breaking deterministic.
///
/// # Examples
/// ```
/// use post_analytics::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["apple", "banana", "apple"]);
/// assert_eq!(freq.token_count("apple"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u64>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Count every whitespace separated token of already normalized text.
    pub fn from_text(text: &str) -> Self {
        let mut freq = Self::new();
        for token in text.split_whitespace() {
            freq.add_token(token);
        }
        freq
    }

    /// add one occurrence of `token`
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        match self.token_count.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_count.insert(token.to_string(), 1);
            }
        }
        self.total_token_count += 1;
        self
    }

    /// add every token of the slice
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// occurrences of `token`, 0 when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// total number of tokens added
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_count.contains_key(token)
    }

    /// number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// distinct tokens in first-seen order
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.token_count.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Tokens sorted by count descending, ties in first-seen order.
    pub fn sorted_frequency_vector(&self) -> Vec<(String, u64)> {
        let mut vec: Vec<(String, u64)> = self
            .token_count
            .iter()
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        vec.sort_by(|a, b| b.1.cmp(&a.1));
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_sum() {
        let freq = TokenFrequency::from_text("a b a c a");
        assert_eq!(freq.token_count("a"), 3);
        assert_eq!(freq.token_count("z"), 0);
        assert_eq!(freq.token_sum(), 5);
        assert_eq!(freq.token_num(), 3);
        assert_eq!(freq.token_set_ref_str(), vec!["a", "b", "c"]);
    }

    #[test]
    fn sorted_frequency_is_stable() {
        let freq = TokenFrequency::from_text("x y z y x w");
        let sorted = freq.sorted_frequency_vector();
        assert_eq!(
            sorted,
            vec![("x".into(), 2), ("y".into(), 2), ("z".into(), 1), ("w".into(), 1)]
        );
    }

    #[test]
    fn empty_text() {
        let freq = TokenFrequency::from_text("");
        assert!(freq.is_empty());
        assert_eq!(freq.token_sum(), 0);
    }
}
