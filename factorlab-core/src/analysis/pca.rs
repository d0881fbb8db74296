//! Principal-component factor model over a return matrix.
//!
//! Trading days are samples and symbols are features. The fit centers each
//! column, takes the sample covariance and keeps the top `k` eigenpairs.

use super::error::AnalyzerError;
use super::returns::ReturnMatrix;
use nalgebra::DMatrix;
use serde::Serialize;
use std::cmp::Ordering;

/// Loadings of one symbol on every retained component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolExposure {
    pub symbol: String,
    pub loadings: Vec<f64>,
}

/// Fixed-rank linear factor model fitted to daily returns.
#[derive(Debug, Clone)]
pub struct FactorModel {
    pub n_components: usize,
    pub symbols: Vec<String>,
    /// Column means removed before the fit.
    pub means: Vec<f64>,
    /// Retained eigenvalues of the sample covariance, descending.
    pub explained_variance: Vec<f64>,
    /// Share of total variance per component, each in [0, 1], non-increasing.
    pub explained_variance_ratio: Vec<f64>,
    /// `components[c][j]`: loading of component `c` on `symbols[j]`. Rows are unit length.
    pub components: Vec<Vec<f64>>,
}

impl FactorModel {
    pub fn fit(returns: &ReturnMatrix, n_components: usize) -> Result<Self, AnalyzerError> {
        let n = returns.row_count();
        let p = returns.column_count();

        if n < 2 {
            return Err(AnalyzerError::NotEnoughObservations { rows: n });
        }
        let max = p.min(n);
        if n_components == 0 || n_components > max {
            return Err(AnalyzerError::InvalidComponentCount {
                requested: n_components,
                max,
            });
        }

        let means: Vec<f64> = (0..p)
            .map(|j| returns.rows.iter().map(|row| row[j]).sum::<f64>() / n as f64)
            .collect();
        let centered = DMatrix::from_fn(n, p, |i, j| returns.rows[i][j] - means[j]);
        let cov = (centered.transpose() * &centered) / (n as f64 - 1.0);
        let total_variance = cov.trace();

        let eigen = cov.symmetric_eigen();
        if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
            return Err(AnalyzerError::Decomposition(
                "covariance eigenvalues are not finite".into(),
            ));
        }

        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(Ordering::Equal)
        });

        let mut explained_variance = Vec::with_capacity(n_components);
        let mut explained_variance_ratio = Vec::with_capacity(n_components);
        let mut components = Vec::with_capacity(n_components);

        for &idx in order.iter().take(n_components) {
            // Round-off can leave tiny negative eigenvalues on rank-deficient input.
            let lambda = eigen.eigenvalues[idx].max(0.0);
            let ratio = if total_variance > 0.0 {
                (lambda / total_variance).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut loadings: Vec<f64> = eigen.eigenvectors.column(idx).iter().copied().collect();
            orient(&mut loadings);

            explained_variance.push(lambda);
            explained_variance_ratio.push(ratio);
            components.push(loadings);
        }

        tracing::debug!(
            samples = n,
            features = p,
            n_components,
            ratios = ?explained_variance_ratio,
            "fitted factor model"
        );

        Ok(Self {
            n_components,
            symbols: returns.symbols.clone(),
            means,
            explained_variance,
            explained_variance_ratio,
            components,
        })
    }

    /// Running total of the explained-variance ratios, capped at 1.
    pub fn cumulative_variance_ratio(&self) -> Vec<f64> {
        self.explained_variance_ratio
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r;
                Some(f64::min(*acc, 1.0))
            })
            .collect()
    }

    /// The loading matrix transposed: one entry per symbol.
    pub fn exposures(&self) -> Vec<SymbolExposure> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(j, symbol)| SymbolExposure {
                symbol: symbol.clone(),
                loadings: self.components.iter().map(|c| c[j]).collect(),
            })
            .collect()
    }

    /// Project every return row onto the components (`X · Cᵀ`, uncentered).
    pub fn factor_returns(&self, returns: &ReturnMatrix) -> Vec<Vec<f64>> {
        returns
            .rows
            .iter()
            .map(|row| {
                self.components
                    .iter()
                    .map(|c| c.iter().zip(row).map(|(w, r)| w * r).sum())
                    .collect()
            })
            .collect()
    }
}

/// Flip a component so its largest-magnitude loading is positive.
fn orient(loadings: &mut [f64]) {
    let pivot = loadings
        .iter()
        .copied()
        .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
    if pivot < 0.0 {
        loadings.iter_mut().for_each(|v| *v = -*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn matrix(rows: Vec<Vec<f64>>, symbols: &[&str]) -> ReturnMatrix {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        ReturnMatrix {
            dates: (0..rows.len())
                .map(|i| base + chrono::Duration::days(i as i64))
                .collect(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            rows,
            undefined_rows: 1,
        }
    }

    #[test]
    fn perfectly_correlated_columns_have_one_factor() {
        let rows = vec![
            vec![0.01, 0.02],
            vec![-0.02, -0.04],
            vec![0.03, 0.06],
            vec![0.00, 0.00],
        ];
        let model = FactorModel::fit(&matrix(rows, &["A", "B"]), 2).unwrap();

        assert!((model.explained_variance_ratio[0] - 1.0).abs() < 1e-9);
        assert!(model.explained_variance_ratio[1].abs() < 1e-9);

        // First component points along (1, 2) / sqrt(5), oriented positive.
        let norm = 5.0_f64.sqrt();
        assert!((model.components[0][0] - 1.0 / norm).abs() < 1e-9);
        assert!((model.components[0][1] - 2.0 / norm).abs() < 1e-9);
    }

    #[test]
    fn uncorrelated_columns_split_by_variance() {
        // A has variance 4x B's, zero covariance.
        let rows = vec![
            vec![0.02, 0.01],
            vec![-0.02, 0.01],
            vec![0.02, -0.01],
            vec![-0.02, -0.01],
        ];
        let model = FactorModel::fit(&matrix(rows, &["A", "B"]), 2).unwrap();

        assert!((model.explained_variance_ratio[0] - 0.8).abs() < 1e-9);
        assert!((model.explained_variance_ratio[1] - 0.2).abs() < 1e-9);
        assert!((model.components[0][0].abs() - 1.0).abs() < 1e-9);
        assert!(model.components[0][0] > 0.0);

        let exposures = model.exposures();
        assert_eq!(exposures[0].symbol, "A");
        assert_eq!(exposures[0].loadings.len(), 2);
    }

    #[test]
    fn cumulative_is_running_sum() {
        let rows = vec![
            vec![0.02, 0.01, 0.00],
            vec![-0.01, 0.02, 0.01],
            vec![0.03, -0.01, 0.02],
            vec![-0.02, 0.00, -0.01],
            vec![0.01, 0.01, 0.00],
        ];
        let model = FactorModel::fit(&matrix(rows, &["A", "B", "C"]), 3).unwrap();
        let cumulative = model.cumulative_variance_ratio();

        assert_eq!(cumulative.len(), 3);
        assert!((cumulative[1] - model.explained_variance_ratio[0] - model.explained_variance_ratio[1]).abs() < 1e-12);
        assert!((cumulative[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn too_many_components_is_rejected() {
        let rows = vec![vec![0.01, 0.02], vec![0.02, 0.01], vec![0.0, 0.03]];
        let err = FactorModel::fit(&matrix(rows, &["A", "B"]), 3).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InvalidComponentCount { requested: 3, max: 2 }
        ));
    }

    #[test]
    fn single_row_cannot_be_fitted() {
        let err = FactorModel::fit(&matrix(vec![vec![0.01, 0.02]], &["A", "B"]), 1).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotEnoughObservations { rows: 1 }));
    }

    #[test]
    fn constant_returns_have_zero_ratios() {
        let rows = vec![vec![0.01, 0.01], vec![0.01, 0.01], vec![0.01, 0.01]];
        let model = FactorModel::fit(&matrix(rows, &["A", "B"]), 2).unwrap();
        assert_eq!(model.explained_variance_ratio, vec![0.0, 0.0]);
    }

    #[test]
    fn factor_returns_project_rows() {
        let rows = vec![
            vec![0.02, 0.01],
            vec![-0.02, 0.01],
            vec![0.02, -0.01],
            vec![-0.02, -0.01],
        ];
        let returns = matrix(rows, &["A", "B"]);
        let model = FactorModel::fit(&returns, 1).unwrap();
        let projected = model.factor_returns(&returns);

        assert_eq!(projected.len(), 4);
        assert!((projected[0][0] - 0.02).abs() < 1e-9);
        assert!((projected[1][0] + 0.02).abs() < 1e-9);
    }

    #[test]
    fn orient_flips_negative_pivot() {
        let mut v = vec![0.3, -0.9, 0.1];
        orient(&mut v);
        assert_eq!(v, vec![-0.3, 0.9, -0.1]);
    }
}
