use crate::data::DataError;
use thiserror::Error;

/// Errors from the return-factor analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] DataError),

    #[error("n_components must be between 1 and {max}, got {requested}")]
    InvalidComponentCount { requested: usize, max: usize },

    #[error("the factor exposure scatter needs at least 2 components, got {requested}")]
    ScatterNeedsTwoComponents { requested: usize },

    #[error("need at least 2 complete return rows to fit a factor model, got {rows}")]
    NotEnoughObservations { rows: usize },

    #[error("decomposition failed: {0}")]
    Decomposition(String),
}

impl AnalyzerError {
    /// True when the request itself was bad, as opposed to a provider or
    /// numerical failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidComponentCount { .. }
                | Self::ScatterNeedsTwoComponents { .. }
                | Self::NotEnoughObservations { .. }
                | Self::Fetch(DataError::InvalidRange { .. })
        )
    }
}
