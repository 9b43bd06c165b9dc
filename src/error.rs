use pyo3::exceptions::PyRuntimeError;
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Configuration: {0}")]
    Configuration(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Lookup: {0}")]
    Lookup(String),

    #[error("Data source: {0}")]
    DataSource(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RiskError> for PyErr {
    fn from(err: RiskError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
