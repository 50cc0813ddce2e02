//! Cross-dataset, per-period and per-author comparisons.
use std::collections::BTreeMap;

use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    analytics::sentiment::compound_score,
    dataset::{
        adapter::{field, RawRecord},
        DatasetKey, Document,
    },
    utils::math::vector::mean,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformStats {
    pub average_score: f64,
    pub document_count: usize,
}

/// Mean score and post count per dataset.
///
/// Every key in `datasets` gets an entry, in that order, even when it has
/// no documents.
pub fn platform_comparison(datasets: &[DatasetKey], documents: &[Document]) -> IndexMap<&'static str, PlatformStats> {
    let mut scores: IndexMap<DatasetKey, Vec<f64>> = datasets.iter().map(|key| (*key, Vec::new())).collect();
    for doc in documents {
        if let Some(list) = scores.get_mut(&doc.dataset) {
            list.push(doc.score);
        }
    }
    scores
        .into_iter()
        .map(|(key, list)| {
            (key.as_str(), PlatformStats { average_score: mean(&list), document_count: list.len() })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodStats {
    pub average_score: f64,
    pub average_sentiment: f64,
    pub posts: usize,
}

/// Mean score and sentiment per ISO week, keyed `YYYY-WW` by ISO year.
/// Only dated documents with text count.
pub fn time_period_comparison(documents: &[Document]) -> BTreeMap<String, PeriodStats> {
    let mut weeks: BTreeMap<String, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for doc in documents.iter().filter(|d| d.has_text()) {
        let Some(day) = doc.day() else {
            continue;
        };
        let week = day.iso_week();
        let (scores, sentiments) = weeks.entry(format!("{}-{:02}", week.year(), week.week())).or_default();
        scores.push(doc.score);
        sentiments.push(compound_score(&doc.cleaned_text));
    }
    weeks
        .into_iter()
        .map(|(key, (scores, sentiments))| {
            let stats = PeriodStats {
                average_score: mean(&scores),
                average_sentiment: mean(&sentiments),
                posts: scores.len(),
            };
            (key, stats)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorComparison {
    pub dataset: DatasetKey,
    pub author: String,
    pub post_count: usize,
    pub avg_score: f64,
    pub avg_sentiment: f64,
}

/// Most active `(dataset, author)` pairs with their mean score and
/// sentiment. The same handle on two datasets counts as two authors.
pub fn author_comparison(documents: &[Document], top_n: usize) -> Vec<AuthorComparison> {
    let mut per_author: IndexMap<(DatasetKey, &str), (Vec<f64>, Vec<f64>)> = IndexMap::new();
    for doc in documents.iter().filter(|d| d.author != Document::UNKNOWN_AUTHOR) {
        let (scores, sentiments) = per_author.entry((doc.dataset, doc.author.as_str())).or_default();
        scores.push(doc.score);
        sentiments.push(compound_score(&doc.cleaned_text));
    }
    let mut results: Vec<AuthorComparison> = per_author
        .into_iter()
        .map(|((dataset, author), (scores, sentiments))| AuthorComparison {
            dataset,
            author: author.to_string(),
            post_count: scores.len(),
            avg_score: mean(&scores),
            avg_sentiment: mean(&sentiments),
        })
        .collect();
    results.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    results.truncate(top_n);
    results
}

/// Raw record fields tallied by [`DemographicsSummary`].
pub const DEMOGRAPHIC_FIELDS: [&str; 3] = ["user_gender", "user_age", "user_location"];

/// Value counts of the demographic fields, read straight from raw records
/// since the uniform document projection drops them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DemographicsSummary {
    fields: IndexMap<&'static str, IndexMap<String, u64>>,
}

impl Default for DemographicsSummary {
    fn default() -> Self {
        Self { fields: DEMOGRAPHIC_FIELDS.iter().map(|f| (*f, IndexMap::new())).collect() }
    }
}

impl DemographicsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the demographic values of one record. Values are trimmed and
    /// lowercased; null, empty, `false` and `0` are ignored.
    pub fn add(&mut self, record: &RawRecord) {
        for (name, counts) in self.fields.iter_mut() {
            if let Some(value) = field(record, name).and_then(demographic_value) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
    }

    pub fn field(&self, name: &str) -> Option<&IndexMap<String, u64>> {
        self.fields.get(name)
    }
}

fn demographic_value(value: &Value) -> Option<String> {
    let key = match value {
        Value::String(s) => s.trim().to_lowercase(),
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => return None,
    };
    (!key.is_empty()).then_some(key)
}
