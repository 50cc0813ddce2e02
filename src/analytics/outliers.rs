use serde::Serialize;

use crate::{
    analytics::sentiment::compound_score,
    dataset::Document,
    error::{AnalyticsError, Result},
    utils::sort::{percentile, sorted_ascending},
};

/// Inclusive band; values strictly outside it are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    /// `low`/`high` percentiles of `values`, `None` when empty.
    pub fn from_percentiles(values: &[f64], low: f64, high: f64) -> Option<Self> {
        let sorted = sorted_ascending(values);
        Some(Band { low: percentile(&sorted, low)?, high: percentile(&sorted, high)? })
    }

    #[inline]
    pub fn excludes(&self, value: f64) -> bool {
        value < self.low || value > self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub id: String,
    pub score: f64,
    pub sentiment: f64,
    pub score_outlier: bool,
    pub sentiment_outlier: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub score_band: Band,
    pub sentiment_band: Band,
    pub outliers: Vec<Outlier>,
}

/// Flag documents whose score or sentiment compound falls outside the
/// `[low, high]` percentile band of the corpus. Both bands are computed
/// independently; documents keep corpus order.
pub fn detect_outliers(documents: &[Document], low: f64, high: f64) -> Result<OutlierReport> {
    if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low > high {
        return Err(AnalyticsError::invalid("percentiles", format!("[{low}, {high}] is not a band within [0, 100]")));
    }
    let scores: Vec<f64> = documents.iter().map(|d| d.score).collect();
    let sentiments: Vec<f64> = documents.iter().map(|d| compound_score(&d.cleaned_text)).collect();

    let (Some(score_band), Some(sentiment_band)) = (
        Band::from_percentiles(&scores, low, high),
        Band::from_percentiles(&sentiments, low, high),
    ) else {
        return Err(AnalyticsError::NoData("no documents for outlier detection".into()));
    };

    let outliers = documents
        .iter()
        .zip(sentiments)
        .filter_map(|(doc, sentiment)| {
            let score_outlier = score_band.excludes(doc.score);
            let sentiment_outlier = sentiment_band.excludes(sentiment);
            (score_outlier || sentiment_outlier).then(|| Outlier {
                id: doc.id.clone(),
                score: doc.score,
                sentiment,
                score_outlier,
                sentiment_outlier,
            })
        })
        .collect();

    Ok(OutlierReport { score_band, sentiment_band, outliers })
}
