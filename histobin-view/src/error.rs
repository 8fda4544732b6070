use histobin_bins::error::BinError;
use histobin_common::error::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Bin error: `{0}`")]
    BinError(#[from] BinError),

    #[error("Graph error: `{0}`")]
    GraphError(#[from] GraphError),

    #[error("Invalid histogram state: `{0}`")]
    InvalidState(#[from] serde_json::Error),
}
