use num::Num;

use crate::error::{AnalyticsError, Result};

#[inline]
fn ensure_same_len<N>(a: &[N], b: &[N]) -> Result<()> {
    if a.len() != b.len() {
        return Err(AnalyticsError::DimensionMismatch { left: a.len(), right: b.len() });
    }
    Ok(())
}

/// dot product
/// d(a, b) = Σ(a_i * b_i)
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> Result<f64>
where
    N: Num + Copy + Into<f64>,
{
    ensure_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| x.into() * y.into()).sum())
}

/// L2 norm
/// ||a|| = sqrt(Σ(a_i^2))
#[inline]
pub fn norm<N>(a: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter().map(|&x| {
        let x: f64 = x.into();
        x * x
    }).sum::<f64>().sqrt()
}

/// cosine similarity
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// Returns 0 when either vector has zero length, so vectors without any
/// weighted term never look alike. Vectors of different length are a
/// [`AnalyticsError::DimensionMismatch`].
#[inline]
pub fn cosine_similarity<N>(a: &[N], b: &[N]) -> Result<f64>
where
    N: Num + Copy + Into<f64>,
{
    let d = dot(a, b)?;
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(d / (norm_a * norm_b))
}

/// Arithmetic mean, 0 for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_self_is_one() {
        let v = [1.0_f64, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_zero_vector_is_zero_not_nan() {
        let z = [0.0_f64; 3];
        let v = [1.0_f64, 0.0, 2.0];
        assert_eq!(cosine_similarity(&z, &z).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&z, &v).unwrap(), 0.0);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = [0.3_f64, 1.2, 0.0, 4.0];
        let b = [1.0_f64, 0.0, 2.5, 0.5];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), cosine_similarity(&b, &a).unwrap());
    }

    #[test]
    fn integer_vectors_work() {
        let a = [1_u32, 0, 1];
        let b = [0_u32, 1, 0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
        assert_eq!(dot(&a, &a).unwrap(), 2.0);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = cosine_similarity(&[1.0_f64], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AnalyticsError::DimensionMismatch { left: 1, right: 2 }));
    }
}
