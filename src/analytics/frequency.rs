use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{AnalyticsError, Result},
    utils::{
        normalizer::{remove_stopwords, tokenize},
        sort::{sort_by_score_desc, top_n_by_count},
    },
    vectorizer::{tfidf::TfIdfEngine, TfIdfModel},
};

/// Unigram counts over stopword-filtered tokens, most frequent first.
/// Equal counts keep first-seen order.
pub fn word_frequency<'a, I>(texts: I, top_n: usize) -> IndexMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for text in texts {
        let tokens = tokenize(text);
        for word in remove_stopwords(&tokens) {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    top_n_by_count(counts, top_n).into_iter().collect()
}

/// Contiguous bigrams and trigrams of each text after stopword removal.
///
/// Grams never span two documents. Each document contributes its bigrams
/// before its trigrams, which fixes the tie order.
pub fn ngram_frequency<'a, I>(texts: I, top_n: usize) -> IndexMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for text in texts {
        let tokens = tokenize(text);
        let words = remove_stopwords(&tokens);
        for size in [2, 3] {
            for gram in words.windows(size) {
                *counts.entry(gram.join(" ")).or_insert(0) += 1;
            }
        }
    }
    top_n_by_count(counts, top_n).into_iter().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    pub score: f64,
}

/// Terms with the highest mean tf-idf across the model's documents.
///
/// A term's tf-idf is summed over the documents containing it and divided by
/// the total document count.
pub fn tfidf_keywords<E>(model: &TfIdfModel<E>, top_n: usize) -> Result<Vec<Keyword>>
where
    E: TfIdfEngine,
{
    if model.is_empty() {
        return Err(AnalyticsError::NoData("no data for tf-idf analysis".into()));
    }
    let per_doc: Vec<Vec<(String, f64)>> = (0..model.doc_num())
        .into_par_iter()
        .map(|i| model.list_terms(i))
        .collect();

    let mut totals: IndexMap<String, f64> = IndexMap::with_capacity(model.vocab_size());
    for (term, score) in per_doc.into_iter().flatten() {
        *totals.entry(term).or_insert(0.0) += score;
    }
    let n = model.doc_num() as f64;
    let mut averaged: Vec<(String, f64)> = totals.into_iter().map(|(t, s)| (t, s / n)).collect();
    sort_by_score_desc(&mut averaged);
    averaged.truncate(top_n);
    Ok(averaged.into_iter().map(|(term, score)| Keyword { term, score }).collect())
}

/// Word cloud entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudWord {
    pub text: String,
    pub weight: f64,
}

pub fn keyword_cloud<E>(model: &TfIdfModel<E>, top_n: usize) -> Result<Vec<CloudWord>>
where
    E: TfIdfEngine,
{
    Ok(tfidf_keywords(model, top_n)?
        .into_iter()
        .map(|k| CloudWord { text: k.term, weight: k.score })
        .collect())
}
