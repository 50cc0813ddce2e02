use std::collections::HashSet;

use once_cell::sync::Lazy;

/// English stopwords removed by the frequency and topic flows.
/// Entries are already in normalized form (no apostrophes).
const STOPWORDS_EN: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "arent", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cant", "cannot", "could", "couldnt", "did", "didnt", "do", "does",
    "doesnt", "doing", "dont", "down", "during", "each", "few", "for", "from", "further", "had",
    "hadnt", "has", "hasnt", "have", "havent", "having", "he", "hed", "hell", "hes", "her",
    "here", "heres", "hers", "herself", "him", "himself", "his", "how", "hows", "i", "id", "ill",
    "im", "ive", "if", "in", "into", "is", "isnt", "it", "its", "itself", "lets", "me", "more",
    "most", "mustnt", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shant", "she",
    "shed", "shell", "shes", "should", "shouldnt", "so", "some", "such", "than", "that", "thats",
    "the", "their", "theirs", "them", "themselves", "then", "there", "theres", "these", "they",
    "theyd", "theyll", "theyre", "theyve", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasnt", "we", "wed", "well", "were", "weve", "werent", "what",
    "whats", "when", "whens", "where", "wheres", "which", "while", "who", "whos", "whom", "why",
    "whys", "will", "with", "wont", "would", "wouldnt", "you", "youd", "youll", "youre", "youve",
    "your", "yours", "yourself", "yourselves", "rt", "amp", "via", "just", "get", "got", "also",
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS_EN.iter().copied().collect());

/// Normalize raw post text.
///
/// Lowercases, keeps only ASCII letters, digits and whitespace (anything else
/// is dropped without leaving a gap, so `don't` becomes `dont`), collapses
/// whitespace runs and trims. `None` and empty input give an empty string.
///
/// # Examples
/// ```
/// use post_analytics::normalize;
/// assert_eq!(normalize(Some("  Don't   STOP!\tme ")), "dont stop me");
/// assert_eq!(normalize(None), "");
/// ```
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() {
            pending_space = true;
        }
    }
    out
}

/// Split normalized text into whitespace separated tokens.
#[inline]
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[inline]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Drop English stopwords, keeping token order.
pub fn remove_stopwords<'a, T>(tokens: &'a [T]) -> Vec<&'a str>
where
    T: AsRef<str>,
{
    tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.is_empty() && !is_stopword(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_without_space() {
        assert_eq!(normalize(Some("Don't")), "dont");
        assert_eq!(normalize(Some("e-mail, please!!")), "email please");
        assert_eq!(normalize(Some("#COVID19 is @here")), "covid19 is here");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize(Some("  a \n\n b\t\tc  ")), "a b c");
        // a whitespace gap made only of punctuation still separates words
        assert_eq!(normalize(Some("one ... two")), "one two");
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
        assert_eq!(normalize(Some("!!! ???")), "");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(normalize(Some("café naïve")), "caf nave");
    }

    #[test]
    fn stopwords_removed_in_order() {
        let tokens = tokenize("the quick fox and the lazy dog");
        assert_eq!(remove_stopwords(&tokens), vec!["quick", "fox", "lazy", "dog"]);
        assert!(!is_stopword("apple"));
    }
}
