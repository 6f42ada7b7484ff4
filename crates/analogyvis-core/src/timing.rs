// crates/analogyvis-core/src/timing.rs
use analogyvis_parser::{RepetitionSuffix, SurveyRow, TimerSchema};
use serde::Serialize;

use crate::config::TimingRules;

/// One attempt per technique.
pub const REQUIRED_ATTEMPTS: usize = 2;

/// Elapsed time reconstructed for one repetition suffix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub suffix: RepetitionSuffix,
    pub elapsed_secs: f64,
}

impl Candidate {
    pub fn qualifies(&self, rules: &TimingRules) -> bool {
        self.elapsed_secs > rules.qualifying_threshold_secs
    }
}

/// Sum of `last - first` over questions `1..=question_count`.
///
/// Accumulation stops at the first question whose columns are absent or whose
/// values are missing or non-numeric; the sum of the earlier questions is
/// returned as is.
pub fn elapsed_for_suffix(
    row: &SurveyRow,
    timers: &TimerSchema,
    suffix: RepetitionSuffix,
    question_count: u32,
) -> f64 {
    (1..=question_count)
        .map_while(|question| {
            let first = row.number(timers.first_click(suffix, question)?)?;
            let last = row.number(timers.last_click(suffix, question)?)?;
            Some(last - first)
        })
        .sum()
}

/// One candidate per first-click suffix, ascending. Lazy; calling again
/// restarts the scan.
pub fn candidates<'a>(
    row: &'a SurveyRow,
    timers: &'a TimerSchema,
    rules: &'a TimingRules,
) -> impl Iterator<Item = Candidate> + 'a {
    timers.suffixes().map(move |suffix| Candidate {
        suffix,
        elapsed_secs: elapsed_for_suffix(row, timers, suffix, rules.question_count),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Every candidate scanned before the qualifying count was reached.
    pub scanned: Vec<Candidate>,
    pub qualifying: usize,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.qualifying >= REQUIRED_ATTEMPTS
    }

    /// First `REQUIRED_ATTEMPTS` scanned candidates with a non-zero elapsed
    /// time, in suffix order. `None` unless the selection is complete.
    pub fn attempts(&self) -> Option<Vec<Candidate>> {
        if !self.is_complete() {
            return None;
        }
        let attempts: Vec<Candidate> = self
            .scanned
            .iter()
            .filter(|candidate| candidate.elapsed_secs != 0.0)
            .take(REQUIRED_ATTEMPTS)
            .copied()
            .collect();
        (attempts.len() == REQUIRED_ATTEMPTS).then_some(attempts)
    }
}

/// Scans candidates until `REQUIRED_ATTEMPTS` of them qualify (or the
/// candidates run out).
pub fn select(candidates: impl Iterator<Item = Candidate>, rules: &TimingRules) -> Selection {
    let scanned: Vec<Candidate> = candidates
        .scan(0usize, |qualifying, candidate| {
            if *qualifying >= REQUIRED_ATTEMPTS {
                return None;
            }
            if candidate.qualifies(rules) {
                *qualifying += 1;
            }
            Some(candidate)
        })
        .collect();

    let qualifying = scanned
        .iter()
        .filter(|candidate| candidate.qualifies(rules))
        .count();

    Selection {
        scanned,
        qualifying,
    }
}
