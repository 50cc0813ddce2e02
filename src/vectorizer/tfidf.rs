use crate::{config::IdfWeighting, vectorizer::{corpus::CorpusStats, token::TokenFrequency}};

pub trait TfIdfEngine: Send + Sync {
    /// IDF of a term
    /// # Arguments
    /// * `doc_num` - documents in the corpus
    /// * `doc_freq` - documents containing the term
    fn idf(&self, doc_num: u64, doc_freq: u64) -> f64;

    /// TF of a term, the raw count by default
    #[inline]
    fn tf(&self, freq: &TokenFrequency, term: &str) -> f64 {
        freq.token_count(term) as f64
    }

    /// IDF vector aligned with the corpus vocabulary
    fn idf_vec(&self, corpus: &CorpusStats) -> Vec<f64> {
        let doc_num = corpus.get_doc_num();
        corpus
            .doc_freqs()
            .map(|doc_freq| self.idf(doc_num, doc_freq))
            .collect()
    }
}

/// `ln(N / (df + 1))`
///
/// A term present in every document gets a slightly negative weight and a
/// term present in `N - 1` documents gets exactly zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRatioIdf;

impl TfIdfEngine for LogRatioIdf {
    #[inline]
    fn idf(&self, doc_num: u64, doc_freq: u64) -> f64 {
        if doc_num == 0 {
            return 0.0;
        }
        (doc_num as f64 / (doc_freq as f64 + 1.0)).ln()
    }
}

/// `1 + ln(N / (df + 1))`, strictly positive for every term of the corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetLogRatioIdf;

impl TfIdfEngine for OffsetLogRatioIdf {
    #[inline]
    fn idf(&self, doc_num: u64, doc_freq: u64) -> f64 {
        if doc_num == 0 {
            return 0.0;
        }
        1.0 + (doc_num as f64 / (doc_freq as f64 + 1.0)).ln()
    }
}

/// runtime selection from configuration
impl TfIdfEngine for IdfWeighting {
    #[inline]
    fn idf(&self, doc_num: u64, doc_freq: u64) -> f64 {
        match self {
            IdfWeighting::LogRatio => LogRatioIdf.idf(doc_num, doc_freq),
            IdfWeighting::OffsetLogRatio => OffsetLogRatioIdf.idf(doc_num, doc_freq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_ratio_formula() {
        assert!((LogRatioIdf.idf(3, 1) - 1.5_f64.ln()).abs() < 1e-12);
        assert_eq!(LogRatioIdf.idf(3, 2), 0.0);
        assert!(LogRatioIdf.idf(2, 2) < 0.0);
        assert_eq!(LogRatioIdf.idf(0, 0), 0.0);
    }

    #[test]
    fn offset_is_positive_for_seen_terms() {
        for n in 1..50_u64 {
            for df in 1..=n {
                assert!(OffsetLogRatioIdf.idf(n, df) > 0.0, "n={n} df={df}");
            }
        }
    }

    #[test]
    fn enum_dispatches() {
        assert_eq!(IdfWeighting::LogRatio.idf(10, 4), LogRatioIdf.idf(10, 4));
        assert_eq!(IdfWeighting::OffsetLogRatio.idf(10, 4), OffsetLogRatioIdf.idf(10, 4));
    }
}
