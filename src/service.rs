use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    analytics::{
        clustering::{kmeans, ClusterAssignment, KMeansOptions},
        comparison::{self, AuthorComparison, DemographicsSummary, PeriodStats, PlatformStats},
        engagement::{self, HashtagCount, HourCount, HourlyEngagement, TrendForecast, UserActivity},
        frequency::{self, CloudWord, Keyword},
        outliers::{detect_outliers, OutlierReport},
        regression::{self, FeatureImportance},
        sentiment::{self, AuthorSentiment, SentimentSummary},
        topics::{self, CoherenceReport, LdaOptions, TopicTerm},
    },
    config::{AnalyticsConfig, FeatureAlignment},
    dataset::{
        loader::{fetch_corpus, LoadOptions},
        store::DocumentStore,
        Corpus, DatasetSelector,
    },
    error::{AnalyticsError, ErrorKind, Result},
    similarity::{find_duplicates, nearest_neighbors, similarity_matrix, SimilarityMatrix},
    vectorizer::TfIdfModel,
};

/// Entry point of every analytics operation.
///
/// Each call scans the store afresh, builds its own model and drops it on
/// return, so one service can be shared between threads without locking.
///
/// # Examples
/// ```
/// use post_analytics::{AnalyticsService, DatasetSelector, InMemoryStore};
/// use serde_json::json;
///
/// let mut store = InMemoryStore::new();
/// store
///     .extend_values(
///         "reddit".parse().unwrap(),
///         [
///             json!({"id": "a", "selftext": "Cheap flights to Rome", "score": 4}),
///             json!({"id": "b", "selftext": "cheap flights to Rome!", "score": 9}),
///         ],
///     )
///     .unwrap();
///
/// let service = AnalyticsService::new(store, Default::default());
/// let dataset: DatasetSelector = "reddit".parse().unwrap();
/// let dups = service.duplicate_detection(dataset, None, None).unwrap();
/// assert_eq!(dups["a"], vec!["b".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsService<S> {
    store: S,
    config: AnalyticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborReport {
    pub target_id: String,
    pub neighbors: Vec<Neighbor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementPrediction {
    pub post_id: String,
    pub predicted_engagement_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NgramReport {
    pub sample_limit: usize,
    pub top: IndexMap<String, u64>,
}

impl<S> AnalyticsService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a caller supplied sample size against the configured cap.
    fn sample_size(&self, name: &'static str, requested: Option<usize>, default: usize) -> Result<usize> {
        let size = requested.unwrap_or(default);
        if size == 0 {
            return Err(AnalyticsError::invalid(name, "must be at least 1"));
        }
        if size > self.config.max_sample_size {
            return Err(AnalyticsError::ResourceLimit(format!(
                "{name} {size} exceeds the maximum of {}",
                self.config.max_sample_size
            )));
        }
        Ok(size)
    }

    fn corpus(&self, dataset: DatasetSelector, options: LoadOptions) -> Result<Corpus> {
        fetch_corpus(&self.store, dataset, options)
    }

    /// Documents with text, capped at `limit`, and a model over them.
    fn text_model(&self, dataset: DatasetSelector, limit: usize) -> Result<(Corpus, TfIdfModel)> {
        let corpus = self.corpus(dataset, LoadOptions::texts(Some(limit)))?.with_text();
        let model = TfIdfModel::from_texts(self.config.idf_weighting, corpus.cleaned_texts());
        Ok((corpus, model))
    }

    /// Dense vectors of a model, refused when empty or oversized.
    fn dense_vectors(&self, model: &TfIdfModel) -> Result<Vec<Vec<f64>>> {
        model.ensure_dense_bounds(self.config.max_matrix_cells)?;
        Ok(model.vectors())
    }

    fn ensure_pairwise_bounds(&self, n: usize) -> Result<()> {
        if n.saturating_mul(n) > self.config.max_matrix_cells {
            return Err(AnalyticsError::ResourceLimit(format!(
                "{n} x {n} similarity matrix exceeds {} cells",
                self.config.max_matrix_cells
            )));
        }
        Ok(())
    }

    fn similarity(&self, dataset: DatasetSelector, sample: usize) -> Result<SimilarityMatrix> {
        self.ensure_pairwise_bounds(sample)?;
        let (corpus, model) = self.text_model(dataset, sample)?;
        let vectors = self.dense_vectors(&model)?;
        let matrix = similarity_matrix(&vectors)?;
        Ok(SimilarityMatrix { ids: corpus.ids(), matrix })
    }

    /// Pairwise cosine similarity of the first `sample_size` posts.
    #[tracing::instrument(skip(self))]
    pub fn text_similarity(&self, dataset: DatasetSelector, sample_size: Option<usize>) -> Result<SimilarityMatrix> {
        let sample = self.sample_size("sample_size", sample_size, self.config.text_similarity_sample)?;
        self.similarity(dataset, sample)
    }

    /// Similarity rows keyed by post id.
    #[tracing::instrument(skip(self))]
    pub fn content_similarity(
        &self,
        dataset: DatasetSelector,
        sample_size: Option<usize>,
    ) -> Result<IndexMap<String, Vec<f64>>> {
        let sample = self.sample_size("sample_size", sample_size, self.config.content_similarity_sample)?;
        Ok(self.similarity(dataset, sample)?.keyed())
    }

    /// Posts closest to `post_id`, or to the first sampled post when absent.
    #[tracing::instrument(skip(self))]
    pub fn most_similar_posts(
        &self,
        dataset: DatasetSelector,
        post_id: Option<&str>,
        limit: Option<usize>,
        top_k: Option<usize>,
    ) -> Result<NeighborReport> {
        let limit = self.sample_size("limit", limit, self.config.neighbor_sample_limit)?;
        let top_k = top_k.unwrap_or(self.config.neighbor_top_k);
        let (corpus, model) = self.text_model(dataset, limit)?;
        let vectors = self.dense_vectors(&model)?;

        let target = match post_id {
            Some(id) => corpus.position(id).ok_or_else(|| AnalyticsError::PostNotFound(id.to_string()))?,
            None => 0,
        };
        let hits = nearest_neighbors(&vectors, target, top_k)?;
        let neighbors = hits
            .list
            .into_iter()
            .map(|(i, similarity)| Neighbor { id: corpus.documents[i].id.clone(), similarity })
            .collect();
        Ok(NeighborReport { target_id: corpus.documents[target].id.clone(), neighbors })
    }

    /// Near-duplicate posts grouped under the earliest post of each pair.
    #[tracing::instrument(skip(self))]
    pub fn duplicate_detection(
        &self,
        dataset: DatasetSelector,
        threshold: Option<f64>,
        limit: Option<usize>,
    ) -> Result<IndexMap<String, Vec<String>>> {
        let threshold = threshold.unwrap_or(self.config.duplicate_threshold);
        let limit = self.sample_size("limit", limit, self.config.duplicate_sample_limit)?;
        let (corpus, model) = self.text_model(dataset, limit)?;
        let vectors = self.dense_vectors(&model)?;

        let groups = find_duplicates(&vectors, threshold)?;
        tracing::debug!(groups = groups.len(), "duplicate groups found");
        let id = |i: usize| corpus.documents[i].id.clone();
        Ok(groups
            .into_iter()
            .map(|(key, dups)| (id(key), dups.into_iter().map(id).collect()))
            .collect())
    }

    /// K-means over the tf-idf vectors of the first `sample_size` posts;
    /// labels of the first documents only.
    #[tracing::instrument(skip(self))]
    pub fn kmeans_clustering(
        &self,
        dataset: DatasetSelector,
        clusters: Option<usize>,
        sample_size: Option<usize>,
    ) -> Result<Vec<ClusterAssignment>> {
        let options = KMeansOptions {
            clusters: clusters.unwrap_or(self.config.kmeans_clusters),
            seed: self.config.kmeans_seed,
            max_iterations: self.config.kmeans_max_iterations,
            tolerance: self.config.kmeans_tolerance,
        };
        if options.clusters == 0 {
            return Err(AnalyticsError::invalid("clusters", "must be at least 1"));
        }
        let sample = self.sample_size("sample_size", sample_size, self.config.kmeans_sample_limit)?;
        let (corpus, model) = self.text_model(dataset, sample)?;
        if corpus.is_empty() {
            return Err(AnalyticsError::NoData("no data for clustering".into()));
        }
        let vectors = self.dense_vectors(&model)?;
        let labels = kmeans(&vectors, &options)?;
        Ok(corpus
            .iter()
            .zip(labels)
            .take(self.config.kmeans_report_limit)
            .map(|(doc, cluster)| ClusterAssignment { id: doc.id.clone(), cluster })
            .collect())
    }

    /// Predict a post's engagement from a regression over its dataset.
    ///
    /// The target defaults to the first training post. It is scored against
    /// the training vocabulary without joining the training set.
    #[tracing::instrument(skip(self))]
    pub fn predict_engagement(
        &self,
        dataset: Option<DatasetSelector>,
        post_id: Option<&str>,
    ) -> Result<EngagementPrediction> {
        let key = match dataset.ok_or(AnalyticsError::MissingParameter("dataset"))? {
            DatasetSelector::Single(key) => key,
            DatasetSelector::Combined => {
                return Err(AnalyticsError::invalid("dataset", "prediction needs a single dataset"));
            }
        };
        let (corpus, model) = self.text_model(key.into(), self.config.regression_training_limit)?;
        if corpus.is_empty() {
            return Err(AnalyticsError::NoData("no training data".into()));
        }
        model.ensure_dense_bounds(self.config.max_matrix_cells)?;

        let post_id = post_id.map_or_else(|| corpus.documents[0].id.clone(), str::to_string);
        let target = self
            .store
            .find_by_id(key, &post_id)?
            .and_then(|record| key.adapter().to_document(&record))
            .filter(|doc| doc.has_text())
            .ok_or_else(|| AnalyticsError::PostNotFound(post_id.clone()))?;

        let scores: Vec<f64> = corpus.iter().map(|d| d.score).collect();
        let predicted = regression::predict_engagement(&model, &scores, &target.cleaned_text, self.config.regression_ridge)?;
        tracing::debug!(post_id = %post_id, predicted, "engagement predicted");
        Ok(EngagementPrediction { post_id, predicted_engagement_score: predicted })
    }

    /// Regression coefficients per term, largest magnitude first.
    #[tracing::instrument(skip(self))]
    pub fn feature_importance(
        &self,
        dataset: DatasetSelector,
        alignment: Option<FeatureAlignment>,
    ) -> Result<Vec<FeatureImportance>> {
        let (corpus, model) = self.text_model(dataset, self.config.regression_training_limit)?;
        if corpus.is_empty() {
            return Err(AnalyticsError::NoData("not enough data for training".into()));
        }
        model.ensure_dense_bounds(self.config.max_matrix_cells)?;
        let scores: Vec<f64> = corpus.iter().map(|d| d.score).collect();
        regression::feature_importance(
            &model,
            &scores,
            alignment.unwrap_or(self.config.feature_alignment),
            self.config.regression_ridge,
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn outlier_detection(&self, dataset: DatasetSelector) -> Result<OutlierReport> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        detect_outliers(&corpus.documents, self.config.outlier_low_percentile, self.config.outlier_high_percentile)
    }

    /// Top words over the first `limit` posts with text.
    #[tracing::instrument(skip(self))]
    pub fn word_frequency(
        &self,
        dataset: DatasetSelector,
        top_n: Option<usize>,
        limit: Option<usize>,
    ) -> Result<IndexMap<String, u64>> {
        let limit = self.sample_size("limit", limit, self.config.word_sample_limit)?;
        let corpus = self.corpus(dataset, LoadOptions::texts(Some(limit)))?;
        Ok(frequency::word_frequency(corpus.cleaned_texts(), top_n.unwrap_or(self.config.word_top_n)))
    }

    #[tracing::instrument(skip(self))]
    pub fn ngram_frequency(&self, dataset: DatasetSelector, limit: Option<usize>) -> Result<NgramReport> {
        let sample_limit = self.sample_size("limit", limit, self.config.ngram_sample_limit)?;
        let corpus = self.corpus(dataset, LoadOptions::sample(sample_limit))?;
        let top = frequency::ngram_frequency(corpus.cleaned_texts(), self.config.ngram_top_n);
        Ok(NgramReport { sample_limit, top })
    }

    #[tracing::instrument(skip(self))]
    pub fn tfidf_keywords(&self, dataset: DatasetSelector, limit: Option<usize>) -> Result<Vec<Keyword>> {
        let limit = self.sample_size("limit", limit, self.config.max_sample_size)?;
        let (_, model) = self.text_model(dataset, limit)?;
        frequency::tfidf_keywords(&model, self.config.keyword_top_n)
    }

    #[tracing::instrument(skip(self))]
    pub fn keyword_cloud(&self, dataset: DatasetSelector, limit: Option<usize>) -> Result<Vec<CloudWord>> {
        let limit = self.sample_size("limit", limit, self.config.max_sample_size)?;
        let (_, model) = self.text_model(dataset, limit)?;
        frequency::keyword_cloud(&model, self.config.keyword_top_n)
    }

    fn lda_options(&self) -> LdaOptions {
        LdaOptions {
            topics: self.config.lda_topics,
            terms: self.config.lda_terms,
            iterations: self.config.lda_iterations,
            seed: self.config.lda_seed,
            alpha: self.config.lda_alpha,
            beta: self.config.lda_beta,
            min_documents: self.config.lda_min_documents,
        }
    }

    /// Topics labelled `Topic 1`, `Topic 2`, ...
    #[tracing::instrument(skip(self))]
    pub fn topic_modeling(&self, dataset: DatasetSelector) -> Result<IndexMap<String, Vec<TopicTerm>>> {
        let corpus = self.corpus(dataset, LoadOptions::texts(Some(self.config.lda_sample_limit)))?;
        let documents = topics::prepare_documents(corpus.cleaned_texts());
        let fitted = topics::lda(&documents, &self.lda_options())?;
        Ok(fitted
            .into_iter()
            .enumerate()
            .map(|(i, terms)| (format!("Topic {}", i + 1), terms))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    pub fn topic_coherence(&self, dataset: DatasetSelector) -> Result<CoherenceReport> {
        let corpus = self.corpus(dataset, LoadOptions::texts(Some(self.config.lda_sample_limit)))?;
        let documents = topics::prepare_documents(corpus.cleaned_texts());
        topics::topic_coherence(&documents, &self.lda_options())
    }

    #[tracing::instrument(skip(self))]
    pub fn sentiment_summary(&self, dataset: DatasetSelector) -> Result<SentimentSummary> {
        let corpus = self.corpus(dataset, LoadOptions::texts(None))?;
        if corpus.is_empty() {
            return Err(AnalyticsError::NoData("no text to score".into()));
        }
        Ok(sentiment::sentiment_summary(&corpus.documents))
    }

    #[tracing::instrument(skip(self))]
    pub fn sentiment_time_series(&self, dataset: DatasetSelector) -> Result<IndexMap<NaiveDate, f64>> {
        let corpus = self.corpus(dataset, LoadOptions::texts(None))?;
        Ok(sentiment::daily_sentiment(&corpus.documents))
    }

    #[tracing::instrument(skip(self))]
    pub fn rolling_sentiment(
        &self,
        dataset: DatasetSelector,
        window: Option<usize>,
    ) -> Result<IndexMap<NaiveDate, f64>> {
        let window = window.unwrap_or(self.config.sentiment_rolling_window);
        if window == 0 {
            return Err(AnalyticsError::invalid("window", "must be at least 1"));
        }
        let daily = self.sentiment_time_series(dataset)?;
        Ok(sentiment::rolling_average(&daily, window))
    }

    #[tracing::instrument(skip(self))]
    pub fn author_sentiment(&self, dataset: DatasetSelector, top_n: Option<usize>) -> Result<Vec<AuthorSentiment>> {
        let corpus = self.corpus(dataset, LoadOptions::texts(None))?;
        Ok(sentiment::author_sentiment(&corpus.documents, top_n.unwrap_or(self.config.top_authors)))
    }

    #[tracing::instrument(skip(self))]
    pub fn trending_hashtags(
        &self,
        dataset: DatasetSelector,
        per_day: Option<usize>,
    ) -> Result<BTreeMap<NaiveDate, Vec<HashtagCount>>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(engagement::trending_hashtags(
            &corpus.documents,
            per_day.unwrap_or(self.config.trending_hashtags_per_day),
        ))
    }

    #[tracing::instrument(skip(self))]
    pub fn engagement_distribution(&self, dataset: DatasetSelector) -> Result<IndexMap<&'static str, u64>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(engagement::engagement_distribution(&corpus.documents))
    }

    #[tracing::instrument(skip(self))]
    pub fn user_activity(&self, dataset: DatasetSelector, top_n: Option<usize>) -> Result<Vec<UserActivity>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(engagement::user_activity(&corpus.documents, top_n.unwrap_or(self.config.top_authors)))
    }

    /// Average score and comments per UTC hour of the day.
    #[tracing::instrument(skip(self))]
    pub fn engagement_by_time_of_day(&self, dataset: DatasetSelector) -> Result<IndexMap<String, HourlyEngagement>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(engagement::engagement_by_hour(&corpus.documents))
    }

    /// Post counts per UTC hour; `combined` merges every dataset.
    #[tracing::instrument(skip(self))]
    pub fn hourly_summary(&self, dataset: DatasetSelector) -> Result<Vec<HourCount>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(engagement::hourly_post_counts(&corpus.documents))
    }

    /// Average sentiment per week since New Year.
    #[tracing::instrument(skip(self))]
    pub fn trend_analysis(&self, dataset: DatasetSelector) -> Result<BTreeMap<String, f64>> {
        let corpus = self.corpus(dataset, LoadOptions::texts(None))?;
        Ok(engagement::weekly_sentiment(&corpus.documents))
    }

    #[tracing::instrument(skip(self))]
    pub fn platform_comparison(&self, dataset: DatasetSelector) -> Result<IndexMap<&'static str, PlatformStats>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(comparison::platform_comparison(dataset.keys(), &corpus.documents))
    }

    /// Average score and sentiment per ISO week.
    #[tracing::instrument(skip(self))]
    pub fn time_period_comparison(&self, dataset: DatasetSelector) -> Result<BTreeMap<String, PeriodStats>> {
        let corpus = self.corpus(dataset, LoadOptions::texts(None))?;
        Ok(comparison::time_period_comparison(&corpus.documents))
    }

    #[tracing::instrument(skip(self))]
    pub fn author_comparison(&self, dataset: DatasetSelector, top_n: Option<usize>) -> Result<Vec<AuthorComparison>> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        Ok(comparison::author_comparison(&corpus.documents, top_n.unwrap_or(self.config.top_authors)))
    }

    /// Gender, age and location counts over the raw records.
    #[tracing::instrument(skip(self))]
    pub fn demographics_summary(&self, dataset: DatasetSelector) -> Result<DemographicsSummary> {
        let mut summary = DemographicsSummary::new();
        for &key in dataset.keys() {
            for record in self.store.scan(key, None)? {
                summary.add(&record?);
            }
        }
        Ok(summary)
    }

    /// Daily average scores and a flat forecast for the days after `as_of`.
    #[tracing::instrument(skip(self))]
    pub fn trend_forecast(
        &self,
        dataset: DatasetSelector,
        as_of: NaiveDate,
        days: Option<u32>,
    ) -> Result<TrendForecast> {
        let corpus = self.corpus(dataset, LoadOptions::all())?;
        engagement::trend_forecast(&corpus.documents, as_of, days.unwrap_or(self.config.forecast_days))
    }
}

/// JSON envelope handed to the calling layer: `{"status": "ok", "data": ..}`
/// or `{"status": "error", "kind": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { data: T },
    Error { kind: ErrorKind, message: String },
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Outcome::Ok { data },
            Err(err) => {
                let kind = err.kind();
                if kind == ErrorKind::ComputationFault {
                    tracing::error!(error = %err, "analytics operation failed");
                }
                Outcome::Error { kind, message: err.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{store::InMemoryStore, DatasetKey};
    use serde_json::json;

    fn service() -> AnalyticsService<InMemoryStore> {
        let mut store = InMemoryStore::new();
        store
            .extend_values(
                DatasetKey::Airline,
                [
                    json!({"tweet_id": 1, "text": "@united flight delayed again", "retweet_count": 2, "name": "ann"}),
                    json!({"tweet_id": 2, "text": "flight delayed again!!", "retweet_count": 8, "name": "bo"}),
                    json!({"tweet_id": 3, "text": "", "retweet_count": 0, "name": "cy"}),
                    json!({"tweet_id": 4, "text": "great crew lovely snacks", "retweet_count": 1, "name": "ann"}),
                ],
            )
            .unwrap();
        AnalyticsService::new(store, AnalyticsConfig::default())
    }

    #[test]
    fn sample_sizes_are_bounded() {
        let svc = service();
        let airline = DatasetSelector::Single(DatasetKey::Airline);
        let err = svc.text_similarity(airline, Some(1_000_000)).unwrap_err();
        assert!(matches!(err, AnalyticsError::ResourceLimit(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(svc.text_similarity(airline, Some(0)).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn similarity_skips_empty_texts() {
        let svc = service();
        let m = svc.text_similarity(DatasetKey::Airline.into(), None).unwrap();
        assert_eq!(m.ids, vec!["1", "2", "4"]);
        assert_eq!(m.matrix.len(), 3);
    }

    #[test]
    fn neighbor_target_must_exist() {
        let svc = service();
        let err = svc.most_similar_posts(DatasetKey::Airline.into(), Some("404"), None, None).unwrap_err();
        assert!(matches!(err, AnalyticsError::PostNotFound(ref id) if id == "404"));
        let report = svc.most_similar_posts(DatasetKey::Airline.into(), None, None, Some(1)).unwrap();
        assert_eq!(report.target_id, "1");
        assert_eq!(report.neighbors.len(), 1);
        assert_eq!(report.neighbors[0].id, "2");
    }

    #[test]
    fn prediction_parameter_checks() {
        let svc = service();
        assert!(matches!(svc.predict_engagement(None, None), Err(AnalyticsError::MissingParameter("dataset"))));
        let err = svc.predict_engagement(Some(DatasetSelector::Combined), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = svc.predict_engagement(Some(DatasetKey::Airline.into()), Some("3")).unwrap_err();
        assert!(matches!(err, AnalyticsError::PostNotFound(_)));
        let ok = svc.predict_engagement(Some(DatasetKey::Airline.into()), None).unwrap();
        assert_eq!(ok.post_id, "1");
        assert!(ok.predicted_engagement_score.is_finite());
    }

    #[test]
    fn outcome_envelope() {
        let ok: Outcome<u8> = Outcome::from(Ok(3));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"status": "ok", "data": 3}));
        let err: Outcome<u8> = Outcome::from(Err(AnalyticsError::NoData("no training data".into())));
        assert!(!err.is_ok());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "kind": "insufficient_data", "message": "no data: no training data"})
        );
    }
}
