// crates/analogyvis-core/src/columns.rs
use std::io::Write;

use analogyvis_parser::SurveyExport;
use tracing::info;

use crate::error::Result;

/// Plain string table written back out as CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Keeps `columns` in the given order. Requested columns missing from the
/// header are written empty; when none of them exist the table has no rows.
pub fn filter_columns(export: &SurveyExport, columns: &[String]) -> CsvTable {
    let positions: Vec<Option<usize>> = columns
        .iter()
        .map(|name| export.header.position(name))
        .collect();

    let rows: Vec<Vec<String>> = if positions.iter().all(Option::is_none) {
        Vec::new()
    } else {
        export
            .rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|position| {
                        position
                            .and_then(|column| row.raw(column))
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect::<Vec<String>>()
            })
            .collect()
    };

    info!(
        requested = columns.len(),
        found = positions.iter().filter(|position| position.is_some()).count(),
        rows = rows.len(),
        "filtered export columns"
    );

    CsvTable {
        columns: columns.to_vec(),
        rows,
    }
}

impl CsvTable {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use analogyvis_parser::{read_survey_export, ExportOptions};

    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn keeps_requested_columns_in_requested_order() {
        let export = read_survey_export(
            "StartDate,PROLIFIC_PID,ResponseId,ChartType\n2024,P1,R_1,Bar\n",
            ExportOptions::default(),
        )
        .expect("parse export");
        let table = filter_columns(&export, &columns(&["ResponseId", "PROLIFIC_PID", "Missing"]));
        assert_eq!(table.columns, columns(&["ResponseId", "PROLIFIC_PID", "Missing"]));
        assert_eq!(table.rows, vec![columns(&["R_1", "P1", ""])]);

        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, "ResponseId,PROLIFIC_PID,Missing\nR_1,P1,\n");
    }

    #[test]
    fn no_matching_columns_yields_no_rows() {
        let export = read_survey_export("a,b\n1,2\n3,4\n", ExportOptions::default())
            .expect("parse export");
        let table = filter_columns(&export, &columns(&["ResponseId"]));
        assert!(table.rows.is_empty());
        assert_eq!(table.columns, columns(&["ResponseId"]));
    }
}
