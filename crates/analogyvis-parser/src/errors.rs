use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("export did not contain a header row")]
    MissingHeader,

    #[error("header row invalid: {message}")]
    InvalidHeader { message: String },

    #[error("metadata row {row_index} missing: export ended after {found} rows")]
    MissingMetadataRow { row_index: usize, found: usize },

    #[error("required column '{column}' not present in header")]
    MissingColumn { column: String },
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}
