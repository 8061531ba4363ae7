use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PollError;
use crate::parser::SampleType;
use crate::table::PollTable;

/// Number of rows at each end of the table compared by [`polling_history_change`].
pub const HISTORY_WINDOW: usize = 30;

/// Maxima closer than this are reported as a tie.
pub const TIE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leader {
    Harris,
    Trump,
    #[serde(rename = "EVEN")]
    Even,
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Leader::Harris => "Harris",
            Leader::Trump => "Trump",
            Leader::Even => "EVEN",
        })
    }
}

/// The highest single result in the table and who holds it.
///
/// Displays as `Harris 57.0%`, or `EVEN 52.0%` on a tie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollLeader {
    pub candidate: Leader,
    pub share: f64,
}

impl fmt::Display for PollLeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1}%", self.candidate, self.share * 100.0)
    }
}

/// A value per candidate, Harris first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CandidatePair {
    pub harris: f64,
    pub trump: f64,
}

impl From<CandidatePair> for (f64, f64) {
    fn from(pair: CandidatePair) -> Self {
        (pair.harris, pair.trump)
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Formats a fraction as a percentage with two decimals, e.g. `49.34%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Formats a fraction as a signed percentage with two decimals, e.g. `+1.53%`.
pub fn format_signed_percent(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

/// Highest single Harris result against highest single Trump result.
///
/// The two maxima may come from different polls.
pub fn highest_polling_candidate(table: &PollTable) -> Result<PollLeader, PollError> {
    let empty = || PollError::EmptyData {
        query: "highest_polling_candidate",
    };
    let max_h = max(table.harris_results()).ok_or_else(empty)?;
    let max_t = max(table.trump_results()).ok_or_else(empty)?;

    let leader = if (max_h - max_t).abs() < TIE_EPSILON {
        PollLeader {
            candidate: Leader::Even,
            share: max_h,
        }
    } else if max_h > max_t {
        PollLeader {
            candidate: Leader::Harris,
            share: max_h,
        }
    } else {
        PollLeader {
            candidate: Leader::Trump,
            share: max_t,
        }
    };
    Ok(leader)
}

/// Mean results over likely-voter polls only.
///
/// Without any likely-voter rows both averages are `0.0`.
pub fn likely_voter_polling_average(table: &PollTable) -> CandidatePair {
    let (harris, trump): (Vec<f64>, Vec<f64>) = table
        .rows()
        .filter(|row| *row.sample_type == SampleType::LikelyVoter)
        .map(|row| (row.harris_result, row.trump_result))
        .unzip();

    CandidatePair {
        harris: mean(&harris),
        trump: mean(&trump),
    }
}

/// Change in mean result between the oldest and newest `window` polls.
///
/// Rows are assumed newest first: the first `window` rows are the latest
/// polls, the last `window` rows the earliest. A table shorter than `window`
/// compares all rows with themselves. Positive means the candidate gained.
pub fn polling_history_change(
    table: &PollTable,
    window: usize,
) -> Result<CandidatePair, PollError> {
    let window = window.min(table.len());
    if window == 0 {
        return Err(PollError::EmptyData {
            query: "polling_history_change",
        });
    }

    let change = |values: &[f64]| {
        let latest = &values[..window];
        let earliest = &values[values.len() - window..];
        mean(latest) - mean(earliest)
    };

    Ok(CandidatePair {
        harris: change(table.harris_results()),
        trump: change(table.trump_results()),
    })
}

impl PollTable {
    pub fn highest_polling_candidate(&self) -> Result<PollLeader, PollError> {
        highest_polling_candidate(self)
    }

    pub fn likely_voter_polling_average(&self) -> CandidatePair {
        likely_voter_polling_average(self)
    }

    pub fn polling_history_change(&self) -> Result<CandidatePair, PollError> {
        polling_history_change(self, HISTORY_WINDOW)
    }
}

/// All three statistics for one poll file, as written to JSON or CSV.
#[derive(Debug, Clone, Serialize)]
pub struct PollSummary {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub rows: usize,
    pub leader: Leader,
    pub leader_share: f64,
    pub lv_harris: f64,
    pub lv_trump: f64,
    pub window: usize,
    pub harris_change: f64,
    pub trump_change: f64,
}

impl PollSummary {
    pub fn from_table(source: &str, table: &PollTable, window: usize) -> Result<Self, PollError> {
        let leader = highest_polling_candidate(table)?;
        let lv = likely_voter_polling_average(table);
        let change = polling_history_change(table, window)?;

        Ok(PollSummary {
            timestamp: Utc::now(),
            source: source.to_string(),
            rows: table.len(),
            leader: leader.candidate,
            leader_share: leader.share,
            lv_harris: lv.harris,
            lv_trump: lv.trump,
            window,
            harris_change: change.harris,
            trump_change: change.trump,
        })
    }

    pub fn leader(&self) -> PollLeader {
        PollLeader {
            candidate: self.leader,
            share: self.leader_share,
        }
    }

    pub fn likely_voter_average(&self) -> CandidatePair {
        CandidatePair {
            harris: self.lv_harris,
            trump: self.lv_trump,
        }
    }

    pub fn history_change(&self) -> CandidatePair {
        CandidatePair {
            harris: self.harris_change,
            trump: self.trump_change,
        }
    }
}
