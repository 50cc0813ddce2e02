/// This crate is a text analytics engine for social media posts built on TF-IDF vectors.
pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod service;
pub mod similarity;
pub mod utils;
pub mod vectorizer;

/// Analytics Service
/// The top-level struct of this crate. It exposes one method per analytics
/// operation over a `DocumentStore`.
///
/// Every call:
/// - Scans the store for the requested dataset (or the `combined` union)
/// - Normalizes the records into `Document`s
/// - Builds its own `TfIdfModel` when the operation needs vectors
/// - Returns a serializable result or an `AnalyticsError`
///
/// Nothing is cached between calls, so the service can be shared between
/// threads behind an `Arc` without locking.
///
/// `Outcome` wraps a result into the `{status, data | kind, message}` JSON
/// envelope the calling layer sends back.
pub use service::{AnalyticsService, Outcome};

/// Analytics Configuration
/// Sample sizes, cluster and topic counts, seeds, thresholds and resource caps.
///
/// Loadable from a JSON string, a file, or the file named by the
/// `POST_ANALYTICS_CONFIG` environment variable. Missing fields keep their
/// defaults.
pub use config::{AnalyticsConfig, FeatureAlignment, IdfWeighting};

/// Errors
/// `AnalyticsError` carries the failure, `ErrorKind` tells the caller whether it
/// was bad input, missing data, a vector dimension mismatch or a computation fault.
pub use error::{AnalyticsError, ErrorKind};

/// Datasets and Documents
/// - `DatasetKey`: one of the supported post collections
/// - `DatasetSelector`: a single dataset or the `combined` union
/// - `Document`: the uniform projection of a raw record
/// - `Corpus`: the ordered documents of one request
pub use dataset::{Corpus, DatasetKey, DatasetSelector, Document};

/// Document Store
/// The collaborator that holds raw records. `InMemoryStore` keeps them in
/// memory and can load JSON-lines dumps.
pub use dataset::store::{DocumentStore, InMemoryStore};

/// TF-IDF Model
/// Term counts per document plus document frequencies over one corpus
/// snapshot. All vectors of one model share its vocabulary.
///
/// `TfIdfModel<E>` is generic over the IDF weighting:
/// - `LogRatioIdf`: `ln(N / (df + 1))`
/// - `OffsetLogRatioIdf`: `1 + ln(N / (df + 1))`
/// - `IdfWeighting`: either one, chosen at runtime from configuration
pub use vectorizer::TfIdfModel;

/// TF IDF Calculation Engine Trait
/// Implement it to plug another weighting into `TfIdfModel<E>`.
pub use vectorizer::tfidf::{LogRatioIdf, OffsetLogRatioIdf, TfIdfEngine};

/// Token Frequency structure
/// Occurrence counts of each token within one document, in first-seen order,
/// plus the total token count. Used as base data for TF.
pub use vectorizer::token::TokenFrequency;

/// Corpus Statistics
/// Document count and per-term document frequency. Used as base data for IDF.
pub use vectorizer::corpus::CorpusStats;

/// Similarity
/// Cosine similarity, symmetric similarity matrices, nearest neighbours and
/// near-duplicate detection over dense vectors.
pub use similarity::{cosine_similarity, Hits, SimilarityMatrix};

/// Text normalization
pub use utils::normalizer::{normalize, remove_stopwords, tokenize};
