use csv::{ReaderBuilder, StringRecord};

use crate::errors::ParserError;
use crate::model::{SurveyExport, SurveyHeader, SurveyRow};

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Rows directly below the header that describe columns rather than
    /// responses (Qualtrics writes two: question text and import ids).
    pub metadata_rows: usize,
}

/// Reads a survey export. The first record is the header; every record after
/// the metadata block is one response.
pub fn read_survey_export(
    content: &str,
    options: ExportOptions,
) -> Result<SurveyExport, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let header_record = records.next().ok_or(ParserError::MissingHeader)??;
    let header = parse_header(&header_record)?;

    for row_index in 1..=options.metadata_rows {
        match records.next() {
            Some(record) => {
                record?;
            }
            None => {
                return Err(ParserError::MissingMetadataRow {
                    row_index,
                    found: row_index - 1,
                })
            }
        }
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        // quoted fields can span several file lines
        let line_index = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();
        let fields = record.iter().map(str::to_string).collect();
        rows.push(SurveyRow::new(line_index, fields));
    }

    Ok(SurveyExport { header, rows })
}

fn parse_header(record: &StringRecord) -> Result<SurveyHeader, ParserError> {
    if record.is_empty() || record.iter().all(|field| field.trim().is_empty()) {
        return Err(ParserError::InvalidHeader {
            message: "header row has no column names".to_string(),
        });
    }

    let names: Vec<&str> = record
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches(BYTE_ORDER_MARK)
            } else {
                name
            }
        })
        .collect();

    Ok(SurveyHeader::new(&names))
}
