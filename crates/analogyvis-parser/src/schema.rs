use std::collections::BTreeMap;

use crate::model::{RepetitionSuffix, SurveyHeader};

pub const PARTICIPANT_ID_COLUMN: &str = "PROLIFIC_PID";
pub const RESPONSE_ID_COLUMN: &str = "ResponseId";
pub const GROUP_COLUMN: &str = "Group";
pub const CHART_TYPE_COLUMN: &str = "ChartType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    First,
    Last,
}

impl ClickKind {
    fn marker(&self) -> &'static str {
        match self {
            ClickKind::First => "first click",
            ClickKind::Last => "last click",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    ParticipantId,
    ResponseId,
    Group,
    ChartType,
    Timer {
        kind: ClickKind,
        question: u32,
        suffix: RepetitionSuffix,
    },
    Vark {
        item: u32,
    },
    Other,
}

/// Classifies a (disambiguated) column name.
pub fn classify_column(name: &str, vark_prefix: &str) -> ColumnRole {
    match name {
        PARTICIPANT_ID_COLUMN => return ColumnRole::ParticipantId,
        RESPONSE_ID_COLUMN => return ColumnRole::ResponseId,
        GROUP_COLUMN => return ColumnRole::Group,
        CHART_TYPE_COLUMN => return ColumnRole::ChartType,
        _ => {}
    }

    if let Some(role) = parse_timer_column(name) {
        return role;
    }

    if let Some(item) = parse_vark_column(name, vark_prefix) {
        return ColumnRole::Vark { item };
    }

    ColumnRole::Other
}

/// Matches `timer <n>[ws/_]*_first click[.<k>]` (and `last click`),
/// case-insensitively, anchored at both ends.
fn parse_timer_column(name: &str) -> Option<ColumnRole> {
    let lower = name.to_ascii_lowercase();
    let rest = lower.strip_prefix("timer ")?;

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let digits = &rest[..digits_len];
    let question = digits.parse::<u32>().ok()?;
    // `Timer 01` is not question 1
    if question.to_string() != digits {
        return None;
    }
    let rest = &rest[digits_len..];

    for kind in [ClickKind::First, ClickKind::Last] {
        let Some(marker_at) = rest.find(kind.marker()) else {
            continue;
        };
        let separator = &rest[..marker_at];
        if !separator.ends_with('_')
            || !separator
                .chars()
                .all(|c| c == '_' || c.is_whitespace())
        {
            continue;
        }

        let tail = &rest[marker_at + kind.marker().len()..];
        let suffix = if tail.is_empty() {
            RepetitionSuffix::FIRST
        } else {
            let digits = tail.strip_prefix('.')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            RepetitionSuffix(digits.parse::<u32>().ok()?)
        };

        return Some(ColumnRole::Timer {
            kind,
            question,
            suffix,
        });
    }

    None
}

fn parse_vark_column(name: &str, prefix: &str) -> Option<u32> {
    let rest = name.strip_prefix(prefix)?.strip_prefix(' ')?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // `VARK 01` is not `VARK 1`
    let item = rest.parse::<u32>().ok()?;
    (item.to_string() == rest).then_some(item)
}

/// Column positions of one click kind: suffix -> question -> column index.
pub type ClickColumns = BTreeMap<RepetitionSuffix, BTreeMap<u32, usize>>;

#[derive(Debug, Clone, Default)]
pub struct TimerSchema {
    first_click: ClickColumns,
    last_click: ClickColumns,
}

impl TimerSchema {
    fn insert(&mut self, kind: ClickKind, suffix: RepetitionSuffix, question: u32, column: usize) {
        let sets = match kind {
            ClickKind::First => &mut self.first_click,
            ClickKind::Last => &mut self.last_click,
        };
        sets.entry(suffix).or_default().insert(question, column);
    }

    /// Suffixes with at least one first-click column, ascending.
    pub fn suffixes(&self) -> impl Iterator<Item = RepetitionSuffix> + '_ {
        self.first_click.keys().copied()
    }

    pub fn first_click(&self, suffix: RepetitionSuffix, question: u32) -> Option<usize> {
        self.first_click.get(&suffix)?.get(&question).copied()
    }

    pub fn last_click(&self, suffix: RepetitionSuffix, question: u32) -> Option<usize> {
        self.last_click.get(&suffix)?.get(&question).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.first_click.is_empty()
    }
}

/// Typed view of an export header, built once and shared by every row.
#[derive(Debug, Clone, Default)]
pub struct SurveySchema {
    pub participant_id: Option<usize>,
    pub response_id: Option<usize>,
    pub group: Option<usize>,
    pub chart_type: Option<usize>,
    pub timers: TimerSchema,
    vark_items: BTreeMap<u32, usize>,
}

impl SurveySchema {
    pub fn from_header(header: &SurveyHeader, vark_prefix: &str) -> Self {
        let mut schema = SurveySchema::default();

        for (idx, name) in header.columns().iter().enumerate() {
            match classify_column(name, vark_prefix) {
                ColumnRole::ParticipantId => schema.participant_id = Some(idx),
                ColumnRole::ResponseId => schema.response_id = Some(idx),
                ColumnRole::Group => schema.group = Some(idx),
                ColumnRole::ChartType => schema.chart_type = Some(idx),
                ColumnRole::Timer {
                    kind,
                    question,
                    suffix,
                } => schema.timers.insert(kind, suffix, question, idx),
                ColumnRole::Vark { item } => {
                    schema.vark_items.insert(item, idx);
                }
                ColumnRole::Other => {}
            }
        }

        schema
    }

    pub fn vark_item(&self, item: u32) -> Option<usize> {
        self.vark_items.get(&item).copied()
    }
}
