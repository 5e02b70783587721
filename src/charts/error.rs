use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to render chart '{path}': {message}")]
    Render { path: PathBuf, message: String },

    #[error("No rows to plot for chart '{0}'")]
    EmptySeries(String),

    #[error("Failed reading chart data: {0}")]
    Data(#[from] PolarsError),
}
