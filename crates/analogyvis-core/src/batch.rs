// crates/analogyvis-core/src/batch.rs
use std::io::Write;

use analogyvis_parser::{read_survey_export, SurveyExport, SurveySchema};
use blake3::Hasher;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StudyConfig;
use crate::error::Result;
use crate::reconstructor::{ParticipantOutcome, TimingReconstructor};
use crate::records::TaskRecord;

/// What to do when a row fails with a configuration error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the row and keep going.
    #[default]
    Skip,
    /// Abort the batch with the error.
    Halt,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub line_index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub export_hash: String,
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub participants_complete: usize,
    pub participants_incomplete: usize,
    pub participants_rejected: usize,
    pub records: usize,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug)]
pub struct BatchOutput {
    pub records: Vec<TaskRecord>,
    pub summary: BatchSummary,
}

pub fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}

impl BatchSummary {
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Parses an export and reconstructs every participant in it.
pub fn process_export_str(
    content: &str,
    config: &StudyConfig,
    policy: ErrorPolicy,
) -> Result<BatchOutput> {
    let export = read_survey_export(content, config.export.options())?;
    let mut output = process_export(&export, config, policy)?;
    output.summary.export_hash = compute_hash(content.as_bytes());
    Ok(output)
}

pub fn process_export(
    export: &SurveyExport,
    config: &StudyConfig,
    policy: ErrorPolicy,
) -> Result<BatchOutput> {
    let schema = SurveySchema::from_header(&export.header, &config.vark.column_prefix);
    if schema.timers.is_empty() {
        warn!("export has no timer columns; no participant can qualify");
    }

    let reconstructor = TimingReconstructor::new(config.timing, config.vark.clone());
    let mut records = Vec::new();
    let mut complete = 0;
    let mut incomplete = 0;
    let mut rejected = Vec::new();

    for row in &export.rows {
        match reconstructor.reconstruct(row, &schema) {
            Ok(ParticipantOutcome::Complete(mut participant_records)) => {
                debug!(
                    line = row.line_index,
                    records = participant_records.len(),
                    "participant reconstructed"
                );
                complete += 1;
                records.append(&mut participant_records);
            }
            Ok(ParticipantOutcome::Incomplete(selection)) => {
                let participant = schema
                    .participant_id
                    .and_then(|column| row.raw(column))
                    .unwrap_or_default();
                info!(
                    participant,
                    line = row.line_index,
                    qualifying = selection.qualifying,
                    candidates = ?selection.scanned,
                    "participant does not have two complete sets; skipping"
                );
                incomplete += 1;
            }
            Err(err) => match policy {
                ErrorPolicy::Halt => return Err(err.into()),
                ErrorPolicy::Skip => {
                    warn!(line = row.line_index, "skipping row: {err}");
                    rejected.push(RejectedRow {
                        line_index: row.line_index,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    let summary = BatchSummary {
        export_hash: String::new(),
        generated_at: Utc::now(),
        rows: export.rows.len(),
        participants_complete: complete,
        participants_incomplete: incomplete,
        participants_rejected: rejected.len(),
        records: records.len(),
        rejected,
    };

    info!(
        rows = summary.rows,
        complete = summary.participants_complete,
        incomplete = summary.participants_incomplete,
        rejected = summary.participants_rejected,
        "timing reconstruction finished"
    );

    Ok(BatchOutput { records, summary })
}
