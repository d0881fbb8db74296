//! Return-factor analysis: daily returns, PCA factor model, chart datasets.

pub mod analyzer;
pub mod charts;
pub mod error;
pub mod pca;
pub mod returns;

pub use analyzer::{analyze, update, Analysis, AnalysisRequest};
pub use charts::{component_labels, BarData, FactorCharts, LineData, ScatterData, ScatterPoint};
pub use error::AnalyzerError;
pub use pca::{FactorModel, SymbolExposure};
pub use returns::ReturnMatrix;
