//! Error types for the dashboard pipeline.
//!
//! Fetch and input-shape failures abort a refresh and are shown to the user
//! with remediation hints. Narrative failures never abort anything; the
//! caller swaps in the local fallback summary.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataFetchError {
    #[error("data source unreachable: {0}")]
    Unreachable(String),
    #[error("invalid table schema: {0}")]
    Schema(String),
    #[error("table {0} returned no rows")]
    Empty(String),
    #[error("data fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// A malformed edge row. `row` is zero-based over the data rows (header excluded).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed edge at row {row}: {reason}")]
pub struct InputShapeError {
    pub row: usize,
    pub reason: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NarrativeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("completion API error: {0}")]
    Api(String),
    #[error("malformed completion payload: {0}")]
    Malformed(String),
    #[error("completion call timed out after {0:?}")]
    Timeout(Duration),
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error(transparent)]
    DataFetch(#[from] DataFetchError),
    #[error(transparent)]
    InputShape(#[from] InputShapeError),
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("report generation is not available yet")]
    ReportUnavailable,
}

impl DashboardError {
    /// Short, user-facing suggestions for fixing the failure.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            DashboardError::DataFetch(DataFetchError::Unreachable(_)) => &[
                "Verify the data source path or database exists",
                "Check that the process can read it",
            ],
            DashboardError::DataFetch(DataFetchError::Schema(_)) => &[
                "Verify the table exists",
                "Verify the SOURCE and TARGET columns are present",
            ],
            DashboardError::DataFetch(DataFetchError::Empty(_)) => &[
                "Verify the table exists",
                "Load at least one edge row into the table",
            ],
            DashboardError::DataFetch(DataFetchError::Timeout(_)) => &[
                "Retry the refresh",
                "Raise CAREGRAPH_FETCH_TIMEOUT_SECS for large tables",
            ],
            DashboardError::InputShape(_) => &[
                "Every row needs a non-empty SOURCE and TARGET value",
            ],
            DashboardError::Narrative(_) => &[
                "Check CAREGRAPH_LLM_URL and CAREGRAPH_LLM_API_KEY",
            ],
            DashboardError::Config(_) => &["Check the CAREGRAPH_* environment variables"],
            DashboardError::Export(_) | DashboardError::ReportUnavailable => &[],
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_hints_mention_columns() {
        let err = DashboardError::from(DataFetchError::Schema("missing TARGET".into()));
        assert!(err.hints().iter().any(|h| h.contains("SOURCE and TARGET")));
        assert_eq!(err.to_string(), "invalid table schema: missing TARGET");
    }

    #[test]
    fn test_input_shape_display() {
        let err = InputShapeError {
            row: 4,
            reason: "empty TARGET".into(),
        };
        assert_eq!(err.to_string(), "malformed edge at row 4: empty TARGET");
    }
}
