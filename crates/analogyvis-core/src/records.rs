// crates/analogyvis-core/src/records.rs
use std::fmt;
use std::io::Write;

use polars::prelude::*;
use serde::Serialize;

use crate::vark::LearningStyle;

pub const OUTPUT_COLUMNS: [&str; 9] = [
    "PROLIFIC_PID",
    "ResponseId",
    "Order",
    "Technique",
    "Time",
    "PerformanceScore",
    "DescriptionScore",
    "ChartDifficulties",
    "VARK",
];

/// Score columns filled in later by hand; always written empty.
const PLACEHOLDER_COLUMNS: [&str; 3] = ["PerformanceScore", "DescriptionScore", "ChartDifficulties"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOrder {
    First,
    Second,
}

impl TaskOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOrder::First => "first",
            TaskOrder::Second => "second",
        }
    }
}

impl fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    Analogy,
    Baseline,
}

impl Technique {
    /// Technique of each attempt, in the order the attempts were recorded.
    pub const BY_ATTEMPT: [Technique; 2] = [Technique::Analogy, Technique::Baseline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::Analogy => "analogy",
            Technique::Baseline => "baseline",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub participant_id: String,
    pub response_id: String,
    pub order: TaskOrder,
    pub technique: Technique,
    pub elapsed_secs: f64,
    pub learning_style: Option<LearningStyle>,
}

/// Builds the analysis table in `OUTPUT_COLUMNS` order. Placeholder columns and
/// an absent learning style are nulls, which the CSV writer emits as empty
/// fields.
pub fn records_to_dataframe(records: &[TaskRecord]) -> PolarsResult<DataFrame> {
    let len = records.len();
    let mut columns: Vec<Column> = Vec::with_capacity(OUTPUT_COLUMNS.len());

    columns.push(
        Series::new(
            "PROLIFIC_PID".into(),
            records
                .iter()
                .map(|record| record.participant_id.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            "ResponseId".into(),
            records
                .iter()
                .map(|record| record.response_id.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            "Order".into(),
            records
                .iter()
                .map(|record| record.order.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            "Technique".into(),
            records
                .iter()
                .map(|record| record.technique.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            "Time".into(),
            records
                .iter()
                .map(|record| record.elapsed_secs)
                .collect::<Vec<f64>>(),
        )
        .into(),
    );

    for name in PLACEHOLDER_COLUMNS {
        columns.push(Series::new(name.into(), vec![None::<&str>; len]).into());
    }

    columns.push(
        Series::new(
            "VARK".into(),
            records
                .iter()
                .map(|record| record.learning_style.map(|style| style.code()))
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
    );

    DataFrame::new(columns)
}

pub fn write_task_table<W: Write>(df: &mut DataFrame, writer: W) -> PolarsResult<()> {
    CsvWriter::new(writer).include_header(true).finish(df)
}

/// Mean elapsed time and record count per technique, sorted by technique.
pub fn technique_means(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .group_by([col("Technique")])
        .agg([
            col("Time").mean().alias("MeanTime"),
            col("Time").count().alias("Records"),
        ])
        .sort(["Technique"], SortMultipleOptions::default())
        .collect()
}
