use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Markers a tabular reader treats as "no value".
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

/// Disambiguator for repeated passes through the same timer widget. Suffix 0
/// is the unsuffixed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepetitionSuffix(pub u32);

impl RepetitionSuffix {
    pub const FIRST: RepetitionSuffix = RepetitionSuffix(0);

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RepetitionSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for RepetitionSuffix {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(RepetitionSuffix::FIRST);
        }
        trimmed
            .parse::<u32>()
            .map(RepetitionSuffix)
            .map_err(|err| format!("invalid repetition suffix '{trimmed}': {err}"))
    }
}

/// Counterbalancing group assigned by the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    One,
    Two,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::One => "1",
            Group::Two => "2",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Group {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "1" => Ok(Group::One),
            "2" => Ok(Group::Two),
            other => Err(format!("unknown group '{other}'")),
        }
    }
}

/// Column names of an export after repeated names have been disambiguated.
#[derive(Debug, Clone, Default)]
pub struct SurveyHeader {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SurveyHeader {
    pub fn new(raw: &[&str]) -> Self {
        let columns = dedupe_column_names(raw);
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { columns, positions }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

/// Renames the k-th repeat of `X` to `X.k`, skipping names that are already
/// taken, so that every column name is unique.
pub fn dedupe_column_names(raw: &[&str]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for original in raw {
        let mut name = (*original).to_string();
        let mut current = counts.get(&name).copied().unwrap_or(0);
        while current > 0 {
            counts.insert(name.clone(), current + 1);
            name = format!("{name}.{current}");
            current = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), current + 1);
        names.push(name);
    }

    names
}

/// One exported survey response. Immutable once read.
#[derive(Debug, Clone)]
pub struct SurveyRow {
    /// 1-based file line the record starts on.
    pub line_index: usize,
    fields: Vec<String>,
}

impl SurveyRow {
    pub fn new(line_index: usize, fields: Vec<String>) -> Self {
        Self { line_index, fields }
    }

    /// Raw field text, `None` when the row is shorter than the header.
    pub fn raw(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Field text, `None` when absent or holding an NA marker.
    pub fn value(&self, column: usize) -> Option<&str> {
        self.raw(column).filter(|value| !is_missing(value))
    }

    /// Numeric field value. Absent, NA and unparseable fields all yield `None`.
    pub fn number(&self, column: usize) -> Option<f64> {
        self.value(column)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|parsed| !parsed.is_nan())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[derive(Debug, Clone)]
pub struct SurveyExport {
    pub header: SurveyHeader,
    pub rows: Vec<SurveyRow>,
}

impl SurveyExport {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
