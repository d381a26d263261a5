// File: crates/trellis-core/src/error.rs
// Summary: Library error types for chart and group-dispatch failures.

use thiserror::Error;

use crate::chart::ChartId;

/// Failure raised by a single chart's render/redraw contract.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("renderer failure: {0}")]
    Renderer(String),
    #[error("data source failure: {0}")]
    Data(String),
}

/// Aggregated failures from one group dispatch pass.
///
/// Every chart in the group is attempted before this is returned; a single
/// chart's failure is never fatal to the batch.
#[derive(Debug, Error)]
#[error("{} chart(s) failed during group dispatch", .failures.len())]
pub struct BatchError {
    pub failures: Vec<(ChartId, ChartError)>,
}
