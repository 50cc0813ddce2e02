pub mod scoring;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{AnalyticsError, Result},
    utils::math::vector::norm,
};

pub use crate::utils::math::vector::cosine_similarity;
pub use scoring::Hits;

/// Cosine similarity of every pair of `vectors`.
///
/// Only the upper triangle is computed, rows in parallel, and then mirrored.
/// The diagonal is 1, or 0 for a zero vector.
pub fn similarity_matrix(vectors: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = vectors.len();
    if let Some(first) = vectors.first() {
        if let Some(bad) = vectors.iter().find(|v| v.len() != first.len()) {
            return Err(AnalyticsError::DimensionMismatch { left: first.len(), right: bad.len() });
        }
    }

    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .map(|j| cosine_similarity(&vectors[i], &vectors[j]))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<_>>()?;

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = if norm(&vectors[i]) == 0.0 { 0.0 } else { 1.0 };
        for (offset, &sim) in upper[i].iter().enumerate() {
            let j = i + 1 + offset;
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    Ok(matrix)
}

/// Similarity matrix labelled with document ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    pub ids: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// rows keyed by document id, in document order
    pub fn keyed(&self) -> IndexMap<String, Vec<f64>> {
        self.ids.iter().cloned().zip(self.matrix.iter().cloned()).collect()
    }
}

/// The `k` documents most similar to `target`, the target itself excluded.
///
/// Equal scores keep document order.
pub fn nearest_neighbors(vectors: &[Vec<f64>], target: usize, k: usize) -> Result<Hits<usize>> {
    let Some(target_vec) = vectors.get(target) else {
        return Err(AnalyticsError::invalid("target", format!("index {target} out of range")));
    };
    let list = vectors
        .par_iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(i, v)| cosine_similarity(target_vec, v).map(|s| (i, s)))
        .collect::<Result<Vec<_>>>()?;
    let mut hits = Hits::new(list);
    hits.sort_by_score().truncate(k);
    Ok(hits)
}

/// Near-duplicate pairs.
///
/// For every `i < j` with `cos(v_i, v_j) >= threshold`, `j` is recorded under
/// `i`. Only lower indices become keys and nothing is merged transitively, so
/// a document may be listed under several keys. Keys without duplicates are
/// left out.
pub fn find_duplicates(vectors: &[Vec<f64>], threshold: f64) -> Result<Vec<(usize, Vec<usize>)>> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(AnalyticsError::invalid("threshold", format!("{threshold} is not in (0, 1]")));
    }
    let n = vectors.len();
    let groups = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut dups = Vec::new();
            for j in i + 1..n {
                if cosine_similarity(&vectors[i], &vectors[j])? >= threshold {
                    dups.push(j);
                }
            }
            Ok((i, dups))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(groups.into_iter().filter(|(_, dups)| !dups.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{tfidf::OffsetLogRatioIdf, TfIdfModel};

    fn fruit_vectors() -> Vec<Vec<f64>> {
        TfIdfModel::from_texts(OffsetLogRatioIdf, ["apple banana", "apple banana", "orange grape"])
            .vectors()
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let vectors = fruit_vectors();
        let m = similarity_matrix(&vectors).unwrap();
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m[i].len(), 3);
            assert_eq!(m[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(m[0][2], 0.0);
    }

    #[test]
    fn zero_vector_diagonal_is_zero() {
        let m = similarity_matrix(&[vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(m[0][0], 0.0);
        assert_eq!(m[1][1], 1.0);
        assert_eq!(m[0][1], 0.0);
    }

    #[test]
    fn matrix_rejects_ragged_vectors() {
        let err = similarity_matrix(&[vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DimensionMismatch);
        assert!(similarity_matrix(&[]).unwrap().is_empty());
    }

    #[test]
    fn neighbors_exclude_target_and_keep_tie_order() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let hits = nearest_neighbors(&vectors, 0, 3).unwrap();
        let ids: Vec<usize> = hits.list.iter().map(|(i, _)| *i).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(nearest_neighbors(&vectors, 9, 3).is_err());
    }

    #[test]
    fn identical_texts_are_duplicates_disjoint_never() {
        let vectors = fruit_vectors();
        let dups = find_duplicates(&vectors, 0.8).unwrap();
        assert_eq!(dups, vec![(0, vec![1])]);
        for threshold in [1e-9, 0.1, 0.5, 1.0] {
            let dups = find_duplicates(&vectors, threshold).unwrap();
            assert!(dups.iter().all(|(i, js)| !(*i == 0 && js.contains(&2))));
        }
    }

    #[test]
    fn duplicates_are_not_merged() {
        let v = vec![vec![1.0, 0.0]; 3];
        let dups = find_duplicates(&v, 0.8).unwrap();
        assert_eq!(dups, vec![(0, vec![1, 2]), (1, vec![2])]);
    }

    #[test]
    fn bad_threshold() {
        assert!(find_duplicates(&[], 0.0).is_err());
        assert!(find_duplicates(&[], f64::NAN).is_err());
        assert!(find_duplicates(&[], 1.5).is_err());
    }

    #[test]
    fn keyed_rows() {
        let m = SimilarityMatrix { ids: vec!["a".into(), "b".into()], matrix: vec![vec![1.0, 0.5], vec![0.5, 1.0]] };
        let keyed = m.keyed();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(keyed["b"], vec![0.5, 1.0]);
    }
}
