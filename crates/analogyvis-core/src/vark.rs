// crates/analogyvis-core/src/vark.rs
use std::fmt;

use analogyvis_parser::{SurveyRow, SurveySchema};
use serde::Serialize;

use crate::config::VarkConfig;

/// VARK learning-style code, declared in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LearningStyle {
    Visual,
    Aural,
    ReadWrite,
    Kinesthetic,
}

impl LearningStyle {
    pub const PRIORITY: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Aural,
        LearningStyle::ReadWrite,
        LearningStyle::Kinesthetic,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "V",
            LearningStyle::Aural => "A",
            LearningStyle::ReadWrite => "R",
            LearningStyle::Kinesthetic => "K",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "V" => Some(LearningStyle::Visual),
            "A" => Some(LearningStyle::Aural),
            "R" => Some(LearningStyle::ReadWrite),
            "K" => Some(LearningStyle::Kinesthetic),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            LearningStyle::Visual => 0,
            LearningStyle::Aural => 1,
            LearningStyle::ReadWrite => 2,
            LearningStyle::Kinesthetic => 3,
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarkTally {
    counts: [u32; 4],
}

impl VarkTally {
    pub fn from_counts(visual: u32, aural: u32, read_write: u32, kinesthetic: u32) -> Self {
        Self {
            counts: [visual, aural, read_write, kinesthetic],
        }
    }

    /// Counts every recognized code in a comma-separated answer.
    pub fn add_answer(&mut self, answer: &str) {
        for code in answer.split(',') {
            if let Some(style) = LearningStyle::from_code(code.trim()) {
                self.counts[style.index()] += 1;
            }
        }
    }

    pub fn count(&self, style: LearningStyle) -> u32 {
        self.counts[style.index()]
    }

    /// Highest-tally style, ties broken by V, A, R, K. `None` when nothing was
    /// counted.
    pub fn dominant(&self) -> Option<LearningStyle> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return None;
        }
        LearningStyle::PRIORITY
            .into_iter()
            .find(|style| self.count(*style) == max)
    }
}

pub fn tally_row(row: &SurveyRow, schema: &SurveySchema, config: &VarkConfig) -> VarkTally {
    let mut tally = VarkTally::default();
    for item in 1..=config.item_count {
        if let Some(answer) = schema.vark_item(item).and_then(|column| row.value(column)) {
            tally.add_answer(answer);
        }
    }
    tally
}
