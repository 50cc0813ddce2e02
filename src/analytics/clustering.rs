use linfa::prelude::*;
use linfa_clustering::{KMeans, KMeansInit};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};

/// K-means settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansOptions {
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self { clusters: 5, seed: 42, max_iterations: 300, tolerance: 1e-4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub id: String,
    pub cluster: usize,
}

/// Row-major dense matrix of equally long vectors.
pub fn to_array2(vectors: &[Vec<f64>]) -> Result<Array2<f64>> {
    let rows = vectors.len();
    let cols = vectors.first().map_or(0, Vec::len);
    let mut flat = Vec::with_capacity(rows * cols);
    for v in vectors {
        if v.len() != cols {
            return Err(AnalyticsError::DimensionMismatch { left: cols, right: v.len() });
        }
        flat.extend_from_slice(v);
    }
    Array2::from_shape_vec((rows, cols), flat).map_err(|e| AnalyticsError::Computation(e.to_string()))
}

/// Cluster id per vector, 0-indexed.
///
/// Centroids start from seeded random observations, so the same input and
/// seed always give the same labels. `k` larger than the number of vectors
/// is clamped to it.
pub fn kmeans(vectors: &[Vec<f64>], options: &KMeansOptions) -> Result<Vec<usize>> {
    if options.clusters == 0 {
        return Err(AnalyticsError::invalid("clusters", "must be at least 1"));
    }
    if vectors.is_empty() {
        return Err(AnalyticsError::NoData("no documents to cluster".into()));
    }
    let k = options.clusters.min(vectors.len());
    if k < options.clusters {
        tracing::warn!(requested = options.clusters, used = k, "fewer documents than clusters");
    }

    let dense = to_array2(vectors)?;
    let dataset = DatasetBase::from(dense.clone());
    let rng = StdRng::seed_from_u64(options.seed);
    let model = KMeans::params_with_rng(k, rng)
        .init_method(KMeansInit::Random)
        .max_n_iterations(options.max_iterations)
        .tolerance(options.tolerance)
        .fit(&dataset)
        .map_err(|e| AnalyticsError::Computation(format!("k-means (k={k}) failed: {e}")))?;

    let labels: Array1<usize> = model.predict(&dense);
    tracing::debug!(k, documents = vectors.len(), inertia = model.inertia(), "k-means fitted");
    Ok(labels.to_vec())
}
