// crates/analogyvis-core/src/error.rs
use analogyvis_parser::ParserError;
use thiserror::Error;

/// Fault that aborts reconstruction of a single participant row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructionError {
    #[error("participant {participant_id} (line {line_index}): {message}")]
    Configuration {
        participant_id: String,
        line_index: usize,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Survey export could not be read: {0}")]
    Parser(#[from] ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration file invalid: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
