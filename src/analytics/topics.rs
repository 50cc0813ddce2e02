use std::collections::HashSet;

use indexmap::IndexMap;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{
    error::{AnalyticsError, Result},
    utils::normalizer::{is_stopword, tokenize},
};

/// Collapsed Gibbs sampler settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LdaOptions {
    pub topics: usize,
    pub terms: usize,
    pub iterations: usize,
    pub seed: u64,
    pub alpha: f64,
    pub beta: f64,
    /// minimum number of non-empty documents
    pub min_documents: usize,
}

impl Default for LdaOptions {
    fn default() -> Self {
        Self { topics: 5, terms: 5, iterations: 200, seed: 123, alpha: 0.1, beta: 0.01, min_documents: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicTerm {
    pub term: String,
    pub probability: f64,
}

/// Stopword-filtered token lists, empty documents dropped.
pub fn prepare_documents<'a, I>(texts: I) -> Vec<Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(|text| tokenize(text).into_iter().filter(|t| !is_stopword(t)).collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Latent Dirichlet allocation by collapsed Gibbs sampling.
///
/// Returns `topics` lists of the `terms` most probable words under each
/// topic's word distribution `(n_kw + β) / (n_k + Vβ)`. Equal probabilities
/// keep vocabulary order. The same documents and seed always yield the same
/// topics.
pub fn lda(documents: &[Vec<&str>], options: &LdaOptions) -> Result<Vec<Vec<TopicTerm>>> {
    if options.topics == 0 {
        return Err(AnalyticsError::invalid("topics", "must be at least 1"));
    }
    if !(options.alpha > 0.0 && options.beta > 0.0) {
        return Err(AnalyticsError::invalid("alpha/beta", "priors must be positive"));
    }
    if documents.len() < options.min_documents.max(1) {
        return Err(AnalyticsError::NotEnoughData { required: options.min_documents.max(1), actual: documents.len() });
    }

    let mut vocab: IndexMap<&str, usize> = IndexMap::new();
    let words: Vec<Vec<usize>> = documents
        .iter()
        .map(|doc| {
            doc.iter()
                .map(|w| {
                    let next = vocab.len();
                    *vocab.entry(*w).or_insert(next)
                })
                .collect()
        })
        .collect();

    let k = options.topics;
    let v = vocab.len();
    let v_beta = v as f64 * options.beta;
    let mut rng = StdRng::seed_from_u64(options.seed);

    let mut doc_topic = Array2::<u32>::zeros((words.len(), k));
    let mut topic_word = Array2::<u32>::zeros((k, v));
    let mut topic_total = vec![0u32; k];
    let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(words.len());

    for (d, doc) in words.iter().enumerate() {
        let z: Vec<usize> = doc.iter().map(|_| rng.gen_range(0..k)).collect();
        for (&w, &t) in doc.iter().zip(&z) {
            doc_topic[[d, t]] += 1;
            topic_word[[t, w]] += 1;
            topic_total[t] += 1;
        }
        assignments.push(z);
    }

    let mut weights = vec![0.0; k];
    for iteration in 0..options.iterations {
        for (d, doc) in words.iter().enumerate() {
            for (n, &w) in doc.iter().enumerate() {
                let old = assignments[d][n];
                doc_topic[[d, old]] -= 1;
                topic_word[[old, w]] -= 1;
                topic_total[old] -= 1;

                let mut total = 0.0;
                for t in 0..k {
                    total += (doc_topic[[d, t]] as f64 + options.alpha)
                        * (topic_word[[t, w]] as f64 + options.beta)
                        / (topic_total[t] as f64 + v_beta);
                    weights[t] = total;
                }
                let draw = rng.gen::<f64>() * total;
                let new = weights.iter().position(|&c| draw < c).unwrap_or(k - 1);

                assignments[d][n] = new;
                doc_topic[[d, new]] += 1;
                topic_word[[new, w]] += 1;
                topic_total[new] += 1;
            }
        }
        if (iteration + 1) % 50 == 0 {
            tracing::debug!(iteration = iteration + 1, of = options.iterations, "lda sweep");
        }
    }

    let terms: Vec<&str> = vocab.keys().copied().collect();
    let topics = (0..k)
        .map(|t| {
            let denom = topic_total[t] as f64 + v_beta;
            let mut ranked: Vec<(usize, f64)> = (0..v)
                .map(|w| (w, (topic_word[[t, w]] as f64 + options.beta) / denom))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ranked
                .into_iter()
                .take(options.terms)
                .map(|(w, probability)| TopicTerm { term: terms[w].to_string(), probability })
                .collect()
        })
        .collect();
    tracing::debug!(documents = words.len(), vocabulary = v, topics = k, "lda fitted");
    Ok(topics)
}

/// UMass coherence of one topic's ranked words.
///
/// Averages `ln((D(w_i, w_j) + 1) / D(w_i))` over pairs `j < i`, where `D`
/// counts documents. Pairs whose `w_i` occurs nowhere are skipped. Topics with
/// fewer than two words, or no countable pair, score 0.
pub fn umass_coherence<S: AsRef<str>>(words: &[S], documents: &[HashSet<&str>]) -> f64 {
    if words.len() < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 1..words.len() {
        let wi = words[i].as_ref();
        for wj in &words[..i] {
            let wj = wj.as_ref();
            let (df_i, both) = documents.iter().fold((0u64, 0u64), |(df, co), doc| {
                if doc.contains(wi) {
                    (df + 1, co + u64::from(doc.contains(wj)))
                } else {
                    (df, co)
                }
            });
            if df_i == 0 {
                continue;
            }
            sum += ((both + 1) as f64 / df_i as f64).ln();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceReport {
    pub coherence_scores: Vec<f64>,
    /// rounded to 4 decimals
    pub avg_coherence: f64,
    pub topics: Vec<Vec<String>>,
}

/// Fit LDA and score every topic's words against the same documents.
pub fn topic_coherence(documents: &[Vec<&str>], options: &LdaOptions) -> Result<CoherenceReport> {
    let topics: Vec<Vec<String>> = lda(documents, options)?
        .into_iter()
        .map(|topic| topic.into_iter().map(|t| t.term).collect())
        .collect();
    let sets: Vec<HashSet<&str>> = documents.iter().map(|doc| doc.iter().copied().collect()).collect();
    let coherence_scores: Vec<f64> = topics.iter().map(|words| umass_coherence(words, &sets)).collect();
    let avg = crate::utils::math::vector::mean(&coherence_scores);
    Ok(CoherenceReport {
        coherence_scores,
        avg_coherence: (avg * 10_000.0).round() / 10_000.0,
        topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "flight delayed gate airport",
            "airport gate flight crew",
            "crew flight delayed luggage",
            "vaccine virus hospital doctors",
            "hospital virus vaccine nurses",
            "doctors nurses hospital vaccine",
            "luggage airport gate delayed",
            "virus doctors vaccine masks",
        ]
    }

    #[test]
    fn prepared_documents_skip_stopwords_and_empties() {
        let docs = prepare_documents(["the cat is here", "", "the and", "dog"]);
        assert_eq!(docs, vec![vec!["cat"], vec!["dog"]]);
    }

    #[test]
    fn topics_have_requested_shape_and_valid_probabilities() {
        let docs = prepare_documents(corpus());
        let topics = lda(&docs, &LdaOptions { topics: 2, terms: 4, ..Default::default() }).unwrap();
        assert_eq!(topics.len(), 2);
        for topic in &topics {
            assert_eq!(topic.len(), 4);
            for pair in topic.windows(2) {
                assert!(pair[0].probability >= pair[1].probability);
            }
            assert!(topic.iter().all(|t| t.probability > 0.0 && t.probability < 1.0));
        }
    }

    #[test]
    fn seeded_lda_is_deterministic() {
        let docs = prepare_documents(corpus());
        let opts = LdaOptions::default();
        assert_eq!(lda(&docs, &opts).unwrap(), lda(&docs, &opts).unwrap());
    }

    #[test]
    fn too_few_documents() {
        let docs = prepare_documents(["one doc", "two docs", "", "the"]);
        let err = lda(&docs, &LdaOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotEnoughData { required: 5, actual: 2 }));
        assert_eq!(err.kind(), crate::ErrorKind::InsufficientData);
    }

    #[test]
    fn umass_by_hand() {
        let a: HashSet<&str> = ["x", "y"].into_iter().collect();
        let b: HashSet<&str> = ["x"].into_iter().collect();
        let c: HashSet<&str> = ["y"].into_iter().collect();
        let docs = vec![a, b, c];
        // pair (y, x): D(y) = 2, D(x, y) = 1
        let expected = (2.0f64 / 2.0).ln();
        assert_eq!(umass_coherence(&["x", "y"], &docs), expected);
        // z occurs nowhere: its pairs are skipped, leaving (y, x) only
        assert_eq!(umass_coherence(&["x", "y", "z"], &docs), expected);
        assert_eq!(umass_coherence(&["x"], &docs), 0.0);
        assert_eq!(umass_coherence(&["z", "q"], &docs), 0.0);
    }

    #[test]
    fn coherence_report_rounds_average() {
        let docs = prepare_documents(corpus());
        let report = topic_coherence(&docs, &LdaOptions::default()).unwrap();
        assert_eq!(report.topics.len(), 5);
        assert_eq!(report.coherence_scores.len(), 5);
        let scaled = report.avg_coherence * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6);
        assert!(report.coherence_scores.iter().all(|s| *s <= (2.0f64).ln() + 1e-12));
    }
}
