pub mod errors;
pub mod export;
pub mod model;
pub mod schema;

pub use errors::ParserError;
pub use export::{read_survey_export, ExportOptions};
pub use model::{
    dedupe_column_names, is_missing, Group, RepetitionSuffix, SurveyExport, SurveyHeader,
    SurveyRow,
};
pub use schema::{classify_column, ClickKind, ColumnRole, SurveySchema, TimerSchema};
