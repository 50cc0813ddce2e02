pub mod corpus;
pub mod tfidf;
pub mod token;

use rayon::prelude::*;

use crate::{
    config::IdfWeighting,
    error::{AnalyticsError, Result},
    utils::sort::sort_by_score_desc,
    vectorizer::{corpus::CorpusStats, tfidf::TfIdfEngine, token::TokenFrequency},
};

/// TF-IDF model over one corpus snapshot.
///
/// Documents are identified by their insertion index. Every vector the model
/// hands out is aligned with the same vocabulary, so vectors from one model
/// can always be compared with each other.
///
/// `E` selects the IDF weighting; the default reads it from configuration.
#[derive(Debug, Clone)]
pub struct TfIdfModel<E = IdfWeighting>
where
    E: TfIdfEngine,
{
    /// per document token counts
    pub documents: Vec<TokenFrequency>,
    /// document count and document frequencies
    pub corpus: CorpusStats,
    engine: E,
}

impl Default for TfIdfModel<IdfWeighting> {
    fn default() -> Self {
        Self::new(IdfWeighting::default())
    }
}

impl<E> TfIdfModel<E>
where
    E: TfIdfEngine,
{
    pub fn new(engine: E) -> Self {
        Self {
            documents: Vec::new(),
            corpus: CorpusStats::new(),
            engine,
        }
    }

    /// Build a model from normalized texts, in order.
    pub fn from_texts<I, S>(engine: E, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self::new(engine);
        for text in texts {
            model.add_document(text.as_ref());
        }
        model
    }

    /// Add a normalized document and return its index.
    pub fn add_document(&mut self, text: &str) -> usize {
        let freq = TokenFrequency::from_text(text);
        self.corpus.add_set(&freq);
        self.documents.push(freq);
        self.documents.len() - 1
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.corpus.vocab_size()
    }

    /// vocabulary in first-seen order
    pub fn vocabulary(&self) -> Vec<&str> {
        self.corpus.vocabulary().collect()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// raw count of `term` in document `doc`
    #[inline]
    pub fn term_frequency(&self, term: &str, doc: usize) -> u64 {
        self.documents.get(doc).map_or(0, |freq| freq.token_count(term))
    }

    #[inline]
    pub fn idf(&self, term: &str) -> f64 {
        self.engine.idf(self.corpus.get_doc_num(), self.corpus.get_term_count(term))
    }

    /// tf * idf of `term` in document `doc`, 0 when either is absent
    #[inline]
    pub fn tfidf(&self, term: &str, doc: usize) -> f64 {
        match self.documents.get(doc) {
            Some(freq) if freq.contains_token(term) => self.engine.tf(freq, term) * self.idf(term),
            _ => 0.0,
        }
    }

    fn dense(&self, freq: &TokenFrequency, idf_vec: &[f64]) -> Vec<f64> {
        let mut vec = vec![0.0; idf_vec.len()];
        for (term, _) in freq.iter() {
            if let Some(i) = self.corpus.term_index(term) {
                vec[i] = self.engine.tf(freq, term) * idf_vec[i];
            }
        }
        vec
    }

    /// Dense vector of document `doc` over the model vocabulary.
    pub fn vector(&self, doc: usize) -> Option<Vec<f64>> {
        let freq = self.documents.get(doc)?;
        Some(self.dense(freq, &self.engine.idf_vec(&self.corpus)))
    }

    /// Dense vectors of every document, in document order.
    pub fn vectors(&self) -> Vec<Vec<f64>> {
        let idf_vec = self.engine.idf_vec(&self.corpus);
        self.documents
            .par_iter()
            .map(|freq| self.dense(freq, &idf_vec))
            .collect()
    }

    /// Score a text that is not part of the model.
    ///
    /// TF comes from `text`, IDF from this model's document count and
    /// document frequencies. Terms outside the vocabulary are ignored and the
    /// model itself is left untouched.
    pub fn vector_for_text(&self, text: &str) -> Vec<f64> {
        let freq = TokenFrequency::from_text(text);
        self.dense(&freq, &self.engine.idf_vec(&self.corpus))
    }

    /// Terms of document `doc` with their tf-idf, highest first.
    pub fn list_terms(&self, doc: usize) -> Vec<(String, f64)> {
        let Some(freq) = self.documents.get(doc) else {
            return Vec::new();
        };
        let mut terms: Vec<(String, f64)> = freq
            .iter()
            .map(|(term, _)| (term.to_string(), self.engine.tf(freq, term) * self.idf(term)))
            .collect();
        sort_by_score_desc(&mut terms);
        terms
    }

    /// Reject models that would produce degenerate or oversized dense matrices.
    pub fn ensure_dense_bounds(&self, max_cells: usize) -> Result<()> {
        if self.is_empty() || self.vocab_size() == 0 {
            return Err(AnalyticsError::NoData("corpus has no terms".into()));
        }
        let cells = self.doc_num().saturating_mul(self.vocab_size());
        if cells > max_cells {
            return Err(AnalyticsError::ResourceLimit(format!(
                "{} documents x {} terms exceeds {} cells",
                self.doc_num(),
                self.vocab_size(),
                max_cells
            )));
        }
        Ok(())
    }
}
