use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TokenFrequency;

/// Corpus statistics of one model.
/// Keeps the document count and, per term, the number of documents the term
/// appears in. Terms are kept in first-seen order, which is the vocabulary
/// order every vector of the model is aligned to.
///
/// It does not store document text; see [`crate::TfIdfModel`] for that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    doc_num: u64,
    #[serde(with = "indexmap::map::serde_seq")]
    term_doc_counts: IndexMap<String, u64>,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one document. Each distinct term counts once.
    pub fn add_set(&mut self, freq: &TokenFrequency) {
        self.doc_num += 1;
        for (term, _) in freq.iter() {
            match self.term_doc_counts.get_mut(term) {
                Some(count) => *count += 1,
                None => {
                    self.term_doc_counts.insert(term.to_string(), 1);
                }
            }
        }
    }

    /// number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_doc_counts.get(term).copied().unwrap_or(0)
    }

    /// vocabulary position of `term`
    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_doc_counts.get_index_of(term)
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_doc_counts.len()
    }

    /// vocabulary in first-seen order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.term_doc_counts.keys().map(String::as_str)
    }

    /// document frequencies aligned with [`CorpusStats::vocabulary`]
    pub fn doc_freqs(&self) -> impl Iterator<Item = u64> + '_ {
        self.term_doc_counts.values().copied()
    }
}
