use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "POST_ANALYTICS_CONFIG";

/// IDF weighting used by a [`crate::TfIdfModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdfWeighting {
    /// `ln(N / (df + 1))`
    #[default]
    LogRatio,
    /// `1 + ln(N / (df + 1))`, never zero for terms seen in the corpus
    OffsetLogRatio,
}

/// How feature-importance coefficients are mapped back to terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureAlignment {
    /// Columns are the shared vocabulary, names are exact.
    #[default]
    SharedVocabulary,
    /// Columns are each document's tf-idf ranked terms padded with 0,
    /// named after the first document's ranking.
    RankedTerms,
}

/// Tunables for every analytics operation.
///
/// Missing fields fall back to [`AnalyticsConfig::default`], so a partial
/// JSON document is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub idf_weighting: IdfWeighting,

    pub text_similarity_sample: usize,
    pub content_similarity_sample: usize,
    pub neighbor_sample_limit: usize,
    pub neighbor_top_k: usize,
    pub duplicate_threshold: f64,
    pub duplicate_sample_limit: usize,

    pub kmeans_clusters: usize,
    pub kmeans_seed: u64,
    pub kmeans_max_iterations: u64,
    pub kmeans_tolerance: f64,
    pub kmeans_report_limit: usize,
    /// documents vectorized for clustering
    pub kmeans_sample_limit: usize,

    pub regression_training_limit: usize,
    pub regression_ridge: f64,
    pub feature_alignment: FeatureAlignment,

    pub outlier_low_percentile: f64,
    pub outlier_high_percentile: f64,

    pub word_top_n: usize,
    pub word_sample_limit: usize,
    pub ngram_top_n: usize,
    pub ngram_sample_limit: usize,
    pub keyword_top_n: usize,

    pub lda_topics: usize,
    pub lda_terms: usize,
    pub lda_iterations: usize,
    pub lda_seed: u64,
    pub lda_alpha: f64,
    pub lda_beta: f64,
    pub lda_min_documents: usize,
    pub lda_sample_limit: usize,

    pub sentiment_rolling_window: usize,
    pub top_authors: usize,
    pub trending_hashtags_per_day: usize,
    pub forecast_days: u32,

    /// Upper bound for any caller supplied sample size.
    pub max_sample_size: usize,
    /// Upper bound for `documents x vocabulary` dense matrices.
    pub max_matrix_cells: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            idf_weighting: IdfWeighting::LogRatio,
            text_similarity_sample: 10,
            content_similarity_sample: 20,
            neighbor_sample_limit: 500,
            neighbor_top_k: 5,
            duplicate_threshold: 0.8,
            duplicate_sample_limit: 1000,
            kmeans_clusters: 5,
            kmeans_seed: 42,
            kmeans_max_iterations: 300,
            kmeans_tolerance: 1e-4,
            kmeans_report_limit: 50,
            kmeans_sample_limit: 1000,
            regression_training_limit: 500,
            regression_ridge: 1e-8,
            feature_alignment: FeatureAlignment::SharedVocabulary,
            outlier_low_percentile: 1.0,
            outlier_high_percentile: 99.0,
            word_top_n: 50,
            word_sample_limit: 20_000,
            ngram_top_n: 20,
            ngram_sample_limit: 20_000,
            keyword_top_n: 20,
            lda_topics: 5,
            lda_terms: 5,
            lda_iterations: 200,
            lda_seed: 123,
            lda_alpha: 0.1,
            lda_beta: 0.01,
            lda_min_documents: 5,
            lda_sample_limit: 5000,
            sentiment_rolling_window: 7,
            top_authors: 10,
            trending_hashtags_per_day: 5,
            forecast_days: 7,
            max_sample_size: 20_000,
            max_matrix_cells: 25_000_000,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Load from the file named by `POST_ANALYTICS_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                tracing::debug!(path = ?path, "loading analytics config");
                Self::from_path(path)
            }
            None => Ok(Self::default()),
        }
    }
}
