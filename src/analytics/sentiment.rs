use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::{dataset::Document, utils::math::vector::mean};

/// Compound scores at or beyond ±0.05 count as polar.
pub const POLARITY_THRESHOLD: f64 = 0.05;

static ANALYZER: Lazy<SentimentIntensityAnalyzer<'static>> = Lazy::new(|| SentimentIntensityAnalyzer::new());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POLARITY_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= -POLARITY_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// VADER compound sentiment of normalized text, in [-1, 1].
///
/// Text without any lexicon word scores 0.
pub fn compound_score(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    ANALYZER
        .polarity_scores(text)
        .get("compound")
        .copied()
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub documents: usize,
    pub average_compound: f64,
    pub distribution: SentimentDistribution,
}

/// Average compound and polarity counts over documents with text.
pub fn sentiment_summary(documents: &[Document]) -> SentimentSummary {
    let scores: Vec<f64> = documents
        .iter()
        .filter(|d| d.has_text())
        .map(|d| compound_score(&d.cleaned_text))
        .collect();
    let mut distribution = SentimentDistribution { positive: 0, neutral: 0, negative: 0 };
    for &score in &scores {
        match SentimentLabel::from_compound(score) {
            SentimentLabel::Positive => distribution.positive += 1,
            SentimentLabel::Neutral => distribution.neutral += 1,
            SentimentLabel::Negative => distribution.negative += 1,
        }
    }
    SentimentSummary { documents: scores.len(), average_compound: mean(&scores), distribution }
}

/// Mean compound per UTC day, days ascending.
/// Documents without a timestamp or text are skipped.
pub fn daily_sentiment(documents: &[Document]) -> IndexMap<NaiveDate, f64> {
    let mut per_day: IndexMap<NaiveDate, Vec<f64>> = IndexMap::new();
    for doc in documents.iter().filter(|d| d.has_text()) {
        if let Some(day) = doc.day() {
            per_day.entry(day).or_default().push(compound_score(&doc.cleaned_text));
        }
    }
    per_day.sort_keys();
    per_day.into_iter().map(|(day, scores)| (day, mean(&scores))).collect()
}

/// Trailing mean over the last `window` observed days (not calendar days).
pub fn rolling_average(daily: &IndexMap<NaiveDate, f64>, window: usize) -> IndexMap<NaiveDate, f64> {
    let window = window.max(1);
    let values: Vec<f64> = daily.values().copied().collect();
    daily
        .keys()
        .enumerate()
        .map(|(i, day)| {
            let start = (i + 1).saturating_sub(window);
            (*day, mean(&values[start..=i]))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSentiment {
    pub author: String,
    pub post_count: usize,
    pub avg_sentiment: f64,
}

/// Authors with the most posts and their mean compound.
pub fn author_sentiment(documents: &[Document], top_n: usize) -> Vec<AuthorSentiment> {
    let mut per_author: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for doc in documents.iter().filter(|d| d.has_text() && d.author != Document::UNKNOWN_AUTHOR) {
        per_author.entry(doc.author.as_str()).or_default().push(compound_score(&doc.cleaned_text));
    }
    let mut results: Vec<AuthorSentiment> = per_author
        .into_iter()
        .map(|(author, scores)| AuthorSentiment {
            author: author.to_string(),
            post_count: scores.len(),
            avg_sentiment: mean(&scores),
        })
        .collect();
    results.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    results.truncate(top_n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetKey;
    use chrono::{TimeZone, Utc};

    fn doc(id: &str, text: &str, author: &str, day: Option<u32>) -> Document {
        Document {
            id: id.into(),
            dataset: DatasetKey::Reddit,
            text: text.into(),
            cleaned_text: crate::normalize(Some(text)),
            score: 0.0,
            comments: 0.0,
            timestamp: day.map(|d| Utc.with_ymd_and_hms(2020, 3, d, 12, 0, 0).unwrap()),
            author: author.into(),
            hashtags: vec![],
        }
    }

    #[test]
    fn polarity_of_simple_phrases() {
        assert!(compound_score("i love this great airline") > 0.5);
        assert!(compound_score("worst flight ever terrible service") < -0.5);
        assert_eq!(compound_score("the table is brown"), 0.0);
        assert_eq!(compound_score(""), 0.0);
    }

    #[test]
    fn negation_flips_and_boosters_amplify() {
        let plain = compound_score("good");
        assert!(compound_score("not good") < 0.0);
        assert!(compound_score("very good") > plain);
        assert!(compound_score("slightly good") < plain);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        assert!(compound_score("the food was good but the service was terrible") < 0.0);
    }

    #[test]
    fn labels_follow_polarity_threshold() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(compound_score("the airline staff were helpful")), SentimentLabel::Positive);
    }

    #[test]
    fn compound_is_bounded() {
        let text = "love ".repeat(200);
        let c = compound_score(&text);
        assert!(c <= 1.0 && c > 0.99);
    }

    #[test]
    fn summary_counts_labels() {
        let docs = vec![
            doc("1", "I love it", "a", None),
            doc("2", "I hate it", "a", None),
            doc("3", "a table", "b", None),
            doc("4", "", "b", None),
        ];
        let summary = sentiment_summary(&docs);
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.distribution, SentimentDistribution { positive: 1, neutral: 1, negative: 1 });
    }

    #[test]
    fn daily_and_rolling() {
        let docs = vec![
            doc("1", "great", "a", Some(3)),
            doc("2", "awful", "a", Some(1)),
            doc("3", "table", "a", Some(2)),
            doc("4", "great", "a", None),
        ];
        let daily = daily_sentiment(&docs);
        let days: Vec<u32> = daily.keys().map(chrono::Datelike::day).collect();
        assert_eq!(days, vec![1, 2, 3]);
        let raw: Vec<f64> = daily.values().copied().collect();
        let rolling: Vec<f64> = rolling_average(&daily, 2).values().copied().collect();
        assert_eq!(rolling[0], raw[0]);
        assert!((rolling[2] - (raw[1] + raw[2]) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn authors_ranked_by_post_count() {
        let docs = vec![
            doc("1", "good", "bob", None),
            doc("2", "bad", "amy", None),
            doc("3", "great", "amy", None),
            doc("4", "fine", Document::UNKNOWN_AUTHOR, None),
        ];
        let ranked = author_sentiment(&docs, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].author, "amy");
        assert_eq!(ranked[0].post_count, 2);
        assert_eq!(author_sentiment(&docs, 1).len(), 1);
    }
}
