//! Chart-ready datasets derived from a fitted factor model.

use super::error::AnalyzerError;
use super::pca::FactorModel;
use serde::Serialize;

/// `PC1`..`PCk` labels.
pub fn component_labels(k: usize) -> Vec<String> {
    (1..=k).map(|i| format!("PC{i}")).collect()
}

/// Explained variance per component (bar chart).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Cumulative explained variance (line chart).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub symbol: String,
    /// Loading on PC1.
    pub x: f64,
    /// Loading on PC2.
    pub y: f64,
}

/// Per-symbol loadings on the first two components (scatter plot).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterData {
    pub points: Vec<ScatterPoint>,
}

/// The three artifacts a dashboard submission produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactorCharts {
    pub explained: BarData,
    pub cumulative: LineData,
    pub exposures: ScatterData,
}

impl FactorCharts {
    /// Three empty results, returned when no ticker was entered.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.explained.values.is_empty()
            && self.cumulative.values.is_empty()
            && self.exposures.points.is_empty()
    }

    pub fn from_model(model: &FactorModel) -> Result<Self, AnalyzerError> {
        if model.n_components < 2 {
            return Err(AnalyzerError::ScatterNeedsTwoComponents {
                requested: model.n_components,
            });
        }
        let labels = component_labels(model.n_components);

        let points = model
            .exposures()
            .into_iter()
            .map(|e| ScatterPoint {
                x: e.loadings[0],
                y: e.loadings[1],
                symbol: e.symbol,
            })
            .collect();

        Ok(Self {
            explained: BarData {
                labels: labels.clone(),
                values: model.explained_variance_ratio.clone(),
            },
            cumulative: LineData {
                labels,
                values: model.cumulative_variance_ratio(),
            },
            exposures: ScatterData { points },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(k: usize) -> FactorModel {
        FactorModel {
            n_components: k,
            symbols: vec!["AAPL".into(), "MSFT".into()],
            means: vec![0.0, 0.0],
            explained_variance: vec![2.0, 1.0][..k].to_vec(),
            explained_variance_ratio: vec![0.6, 0.4][..k].to_vec(),
            components: vec![vec![0.8, 0.6], vec![-0.6, 0.8]][..k].to_vec(),
        }
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(component_labels(3), vec!["PC1", "PC2", "PC3"]);
        assert!(component_labels(0).is_empty());
    }

    #[test]
    fn charts_from_model() {
        let charts = FactorCharts::from_model(&model(2)).unwrap();

        assert_eq!(charts.explained.labels, vec!["PC1", "PC2"]);
        assert_eq!(charts.explained.values, vec![0.6, 0.4]);
        assert_eq!(charts.cumulative.values, vec![0.6, 1.0]);
        assert_eq!(
            charts.exposures.points[1],
            ScatterPoint {
                symbol: "MSFT".into(),
                x: 0.6,
                y: 0.8
            }
        );
        assert!(!charts.is_empty());
    }

    #[test]
    fn one_component_has_no_scatter() {
        assert!(matches!(
            FactorCharts::from_model(&model(1)),
            Err(AnalyzerError::ScatterNeedsTwoComponents { requested: 1 })
        ));
    }

    #[test]
    fn empty_charts_serialize_as_empty_series() {
        let json = serde_json::to_value(FactorCharts::empty()).unwrap();
        assert_eq!(json["explained"]["values"], serde_json::json!([]));
        assert_eq!(json["exposures"]["points"], serde_json::json!([]));
    }
}
