// crates/analogyvis-core/src/reconstructor.rs
use analogyvis_parser::{Group, SurveyRow, SurveySchema};
use serde::Serialize;
use tracing::debug;

use crate::config::{TimingRules, VarkConfig};
use crate::error::ReconstructionError;
use crate::records::{TaskOrder, TaskRecord, Technique};
use crate::timing::{candidates, select, Selection};
use crate::vark::tally_row;

/// What became of one participant row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParticipantOutcome {
    /// Two attempts found; one record per technique.
    Complete(Vec<TaskRecord>),
    /// Fewer than the required number of qualifying attempts.
    Incomplete(Selection),
}

impl ParticipantOutcome {
    pub fn into_records(self) -> Vec<TaskRecord> {
        match self {
            ParticipantOutcome::Complete(records) => records,
            ParticipantOutcome::Incomplete(_) => Vec::new(),
        }
    }
}

/// Reconstructs the timed task attempts of one participant. Holds no state
/// between rows.
#[derive(Debug, Clone, Default)]
pub struct TimingReconstructor {
    pub rules: TimingRules,
    pub vark: VarkConfig,
}

impl TimingReconstructor {
    pub fn new(rules: TimingRules, vark: VarkConfig) -> Self {
        Self { rules, vark }
    }

    pub fn reconstruct(
        &self,
        row: &SurveyRow,
        schema: &SurveySchema,
    ) -> Result<ParticipantOutcome, ReconstructionError> {
        let selection = select(candidates(row, &schema.timers, &self.rules), &self.rules);
        debug!(
            line = row.line_index,
            qualifying = selection.qualifying,
            candidates = ?selection.scanned,
            "scanned timing candidates"
        );
        let Some(attempts) = selection.attempts() else {
            return Ok(ParticipantOutcome::Incomplete(selection));
        };

        let participant_id = text_field(row, schema.participant_id);
        let response_id = text_field(row, schema.response_id);
        let orders = task_orders(row, schema, &participant_id)?;
        let learning_style = tally_row(row, schema, &self.vark).dominant();

        let records = attempts
            .iter()
            .zip(Technique::BY_ATTEMPT)
            .zip(orders)
            .map(|((attempt, technique), order)| TaskRecord {
                participant_id: participant_id.clone(),
                response_id: response_id.clone(),
                order,
                technique,
                elapsed_secs: attempt.elapsed_secs,
                learning_style,
            })
            .collect();

        Ok(ParticipantOutcome::Complete(records))
    }

    /// Convenience wrapper returning zero or two records.
    pub fn records(
        &self,
        row: &SurveyRow,
        schema: &SurveySchema,
    ) -> Result<Vec<TaskRecord>, ReconstructionError> {
        self.reconstruct(row, schema)
            .map(ParticipantOutcome::into_records)
    }
}

/// Order labels of the (analogy, baseline) attempts.
fn task_orders(
    row: &SurveyRow,
    schema: &SurveySchema,
    participant_id: &str,
) -> Result<[TaskOrder; 2], ReconstructionError> {
    let raw = schema
        .group
        .and_then(|column| row.raw(column))
        .unwrap_or_default();
    let group = Group::try_from(raw).map_err(|message| ReconstructionError::Configuration {
        participant_id: participant_id.to_string(),
        line_index: row.line_index,
        message,
    })?;

    Ok(match group {
        Group::One => [TaskOrder::First, TaskOrder::Second],
        Group::Two => [TaskOrder::Second, TaskOrder::First],
    })
}

fn text_field(row: &SurveyRow, column: Option<usize>) -> String {
    column
        .and_then(|column| row.value(column))
        .unwrap_or_default()
        .to_string()
}
