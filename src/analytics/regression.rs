use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::{
    analytics::clustering::to_array2,
    config::FeatureAlignment,
    error::{AnalyticsError, Result},
    utils::math::vector::dot,
    vectorizer::{tfidf::TfIdfEngine, TfIdfModel},
};

/// Pivots below this magnitude make a system singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Ordinary least squares with intercept.
///
/// The system is solved in whichever of the primal (`p x p`) or dual
/// (`n x n`) form is smaller. A small ridge term keeps rank deficient
/// designs solvable; with more features than rows the dual form yields the
/// minimum norm solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, ridge: f64) -> Result<Self> {
        let (n, p) = x.dim();
        if n == 0 {
            return Err(AnalyticsError::NoData("no training rows".into()));
        }
        if y.len() != n {
            return Err(AnalyticsError::DimensionMismatch { left: n, right: y.len() });
        }
        if !(ridge >= 0.0 && ridge.is_finite()) {
            return Err(AnalyticsError::invalid("ridge", format!("{ridge} is not a finite non-negative value")));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(p));
        let y_mean = y.mean().unwrap_or(0.0);
        let xc = x - &x_mean;
        let yc = y - y_mean;

        let weights = if p == 0 {
            Array1::zeros(0)
        } else if p <= n {
            let mut gram = xc.t().dot(&xc);
            add_ridge(&mut gram, ridge);
            solve(gram, xc.t().dot(&yc))?
        } else {
            let mut gram = xc.dot(&xc.t());
            add_ridge(&mut gram, ridge);
            let alpha = solve(gram, yc)?;
            xc.t().dot(&alpha)
        };

        let intercept = y_mean - weights.dot(&x_mean);
        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(AnalyticsError::Computation("regression produced non-finite coefficients".into()));
        }
        Ok(Self { coefficients: weights.to_vec(), intercept })
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        Ok(self.intercept + dot(&self.coefficients, features)?)
    }
}

/// λ scaled to the mean diagonal so it stays negligible for any feature scale.
fn add_ridge(gram: &mut Array2<f64>, ridge: f64) {
    let size = gram.nrows().max(1) as f64;
    let scale = gram.diag().sum() / size;
    let lambda = ridge * (1.0 + scale);
    gram.diag_mut().mapv_inplace(|v| v + lambda);
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        let pivot = a[[pivot_row, col]];
        if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON {
            return Err(AnalyticsError::Computation(format!("singular system at column {col}")));
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in row + 1..n {
            acc -= a[[row, k]] * x[k];
        }
        x[row] = acc / a[[row, row]];
    }
    Ok(x)
}

/// Fit on the model's document vectors and predict the score of `target_text`.
///
/// The target is scored against the training vocabulary and IDF; it is not
/// added to the model.
pub fn predict_engagement<E>(model: &TfIdfModel<E>, scores: &[f64], target_text: &str, ridge: f64) -> Result<f64>
where
    E: TfIdfEngine,
{
    if model.is_empty() {
        return Err(AnalyticsError::NoData("no training data".into()));
    }
    let x = to_array2(&model.vectors())?;
    let y = Array1::from(scores.to_vec());
    let fitted = LinearModel::fit(&x, &y, ridge)?;
    fitted.predict(&model.vector_for_text(target_text))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Regression coefficients named by term, largest magnitude first.
pub fn feature_importance<E>(
    model: &TfIdfModel<E>,
    scores: &[f64],
    alignment: FeatureAlignment,
    ridge: f64,
) -> Result<Vec<FeatureImportance>>
where
    E: TfIdfEngine,
{
    if model.is_empty() {
        return Err(AnalyticsError::NoData("not enough data for training".into()));
    }
    let (rows, names): (Vec<Vec<f64>>, Vec<String>) = match alignment {
        FeatureAlignment::SharedVocabulary => (
            model.vectors(),
            model.vocabulary().into_iter().map(str::to_string).collect(),
        ),
        FeatureAlignment::RankedTerms => {
            let ranked: Vec<Vec<(String, f64)>> = (0..model.doc_num()).map(|i| model.list_terms(i)).collect();
            let width = ranked.iter().map(Vec::len).max().unwrap_or(0);
            let rows = ranked
                .iter()
                .map(|terms| {
                    let mut row: Vec<f64> = terms.iter().map(|(_, w)| *w).collect();
                    row.resize(width, 0.0);
                    row
                })
                .collect();
            let names = ranked[0].iter().map(|(t, _)| t.clone()).collect();
            (rows, names)
        }
    };

    let x = to_array2(&rows)?;
    let y = Array1::from(scores.to_vec());
    let fitted = LinearModel::fit(&x, &y, ridge)?;

    let mut importance: Vec<FeatureImportance> = names
        .into_iter()
        .enumerate()
        .map(|(i, feature)| FeatureImportance {
            feature,
            importance: fitted.coefficients.get(i).copied().unwrap_or(0.0),
        })
        .collect();
    importance.sort_by(|a, b| b.importance.abs().total_cmp(&a.importance.abs()));
    Ok(importance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::{LogRatioIdf, OffsetLogRatioIdf};
    use ndarray::array;

    #[test]
    fn recovers_exact_linear_relation() {
        // y = 3 + 2 a - b
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [2.0, 1.0], [1.0, 3.0]];
        let y = x.rows().into_iter().map(|r| 3.0 + 2.0 * r[0] - r[1]).collect::<Array1<f64>>();
        let model = LinearModel::fit(&x, &y, 0.0).unwrap();
        assert!((model.intercept - 3.0).abs() < 1e-9);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients[1] + 1.0).abs() < 1e-9);
        assert!((model.predict(&[4.0, 2.0]).unwrap() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn wide_design_interpolates_training_rows() {
        let x = array![[1.0, 0.0, 0.0, 2.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 3.0, 1.0]];
        let y = array![10.0, 2.0, 5.0];
        let model = LinearModel::fit(&x, &y, 1e-10).unwrap();
        for (row, target) in x.rows().into_iter().zip(y.iter()) {
            let pred = model.predict(row.as_slice().unwrap()).unwrap();
            assert!((pred - target).abs() < 1e-4, "{pred} vs {target}");
        }
    }

    #[test]
    fn singular_without_ridge_is_a_computation_fault() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![1.0, 2.0, 3.0];
        let err = LinearModel::fit(&x, &y, 0.0).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ComputationFault);
        assert!(LinearModel::fit(&x, &y, 1e-8).is_ok());
    }

    #[test]
    fn prediction_length_must_match() {
        let model = LinearModel { coefficients: vec![1.0, 2.0], intercept: 0.0 };
        assert_eq!(model.predict(&[1.0]).unwrap_err().kind(), crate::ErrorKind::DimensionMismatch);
    }

    #[test]
    fn predict_engagement_needs_training_data() {
        let empty = TfIdfModel::new(LogRatioIdf);
        let err = predict_engagement(&empty, &[], "hello", 1e-8).unwrap_err();
        assert!(matches!(err, AnalyticsError::NoData(ref m) if m == "no training data"));
    }

    #[test]
    fn predict_engagement_follows_signal_terms() {
        let texts = ["viral cats", "viral dogs", "boring tax", "boring forms", "viral memes", "boring queue"];
        let scores = [100.0, 90.0, 1.0, 2.0, 95.0, 0.0];
        let model = TfIdfModel::from_texts(OffsetLogRatioIdf, texts);
        let hot = predict_engagement(&model, &scores, "viral", 1e-8).unwrap();
        let cold = predict_engagement(&model, &scores, "boring", 1e-8).unwrap();
        assert!(hot > cold, "{hot} <= {cold}");
        assert_eq!(model.doc_num(), 6);
    }

    #[test]
    fn shared_vocabulary_names_every_term() {
        let model = TfIdfModel::from_texts(OffsetLogRatioIdf, ["viral cats", "boring tax", "viral dogs"]);
        let ranked = feature_importance(&model, &[50.0, 1.0, 60.0], FeatureAlignment::SharedVocabulary, 1e-8).unwrap();
        assert_eq!(ranked.len(), model.vocab_size());
        for pair in ranked.windows(2) {
            assert!(pair[0].importance.abs() >= pair[1].importance.abs());
        }
    }

    #[test]
    fn ranked_terms_named_after_first_document() {
        let model = TfIdfModel::from_texts(OffsetLogRatioIdf, ["alpha beta", "gamma delta epsilon", "zeta"]);
        let ranked = feature_importance(&model, &[1.0, 2.0, 3.0], FeatureAlignment::RankedTerms, 1e-8).unwrap();
        let mut names: Vec<_> = ranked.iter().map(|f| f.feature.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
