//! Columnar in-memory poll table.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::PollError;
use crate::loader;
use crate::parser::{PollRecord, SampleType, parse_line};

/// Poll data held as six parallel columns.
///
/// Row `i` of every column comes from the same input line, in file order.
/// The columns are only reachable through read-only slices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollTable {
    month: Vec<String>,
    date: Vec<u32>,
    sample: Vec<u32>,
    sample_type: Vec<SampleType>,
    harris_result: Vec<f64>,
    trump_result: Vec<f64>,
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollRow<'a> {
    pub month: &'a str,
    pub date: u32,
    pub sample: u32,
    pub sample_type: &'a SampleType,
    pub harris_result: f64,
    pub trump_result: f64,
}

impl PollTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `file` (relative to the configured data directory) and parses it once.
    pub fn from_file(settings: &Settings, file: impl AsRef<Path>) -> Result<Self, PollError> {
        let raw = loader::load(settings.resolve(file))?;
        Self::from_lines(&raw.lines)
    }

    /// Builds a table from raw lines, the first of which is a header.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, PollError> {
        let mut table = Self::new();
        table.parse(lines)?;
        Ok(table)
    }

    /// Parses raw lines into the table, skipping the header and blank lines.
    ///
    /// Either every line parses and the rows are appended, or the first bad
    /// line is returned as an error and the table is left untouched. Calling
    /// this twice appends the rows twice.
    ///
    /// Result columns are stored as fractions. If any result in the input is
    /// above 1 the whole input is read as percentages and divided by 100.
    #[tracing::instrument(skip_all, fields(lines = lines.len()))]
    pub fn parse<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), PollError> {
        let mut staged = PollTable::new();

        // line numbers are 1-based, header is line 1
        for (idx, line) in lines.iter().enumerate().skip(1) {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            staged.push(parse_line(idx + 1, line)?);
        }

        let percent = staged.rescale_percentages();
        debug!(rows = staged.len(), percent, "Parsed poll rows");
        self.append(staged);
        info!(rows = self.len(), "Poll table ready");
        Ok(())
    }

    /// Rescales both result columns to fractions, returning whether they were percentages.
    fn rescale_percentages(&mut self) -> bool {
        let percent = self
            .harris_result
            .iter()
            .chain(&self.trump_result)
            .any(|v| *v > 1.0);
        if percent {
            for v in self.harris_result.iter_mut().chain(&mut self.trump_result) {
                *v /= 100.0;
            }
        }
        percent
    }

    fn push(&mut self, record: PollRecord) {
        self.month.push(record.month);
        self.date.push(record.date);
        self.sample.push(record.sample);
        self.sample_type.push(record.sample_type);
        self.harris_result.push(record.harris_result);
        self.trump_result.push(record.trump_result);
    }

    fn append(&mut self, mut other: PollTable) {
        self.month.append(&mut other.month);
        self.date.append(&mut other.date);
        self.sample.append(&mut other.sample);
        self.sample_type.append(&mut other.sample_type);
        self.harris_result.append(&mut other.harris_result);
        self.trump_result.append(&mut other.trump_result);
    }

    pub fn len(&self) -> usize {
        self.month.len()
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_empty()
    }

    pub fn months(&self) -> &[String] {
        &self.month
    }

    pub fn dates(&self) -> &[u32] {
        &self.date
    }

    pub fn samples(&self) -> &[u32] {
        &self.sample
    }

    pub fn sample_types(&self) -> &[SampleType] {
        &self.sample_type
    }

    pub fn harris_results(&self) -> &[f64] {
        &self.harris_result
    }

    pub fn trump_results(&self) -> &[f64] {
        &self.trump_result
    }

    pub fn row(&self, idx: usize) -> Option<PollRow<'_>> {
        if idx >= self.len() {
            return None;
        }
        Some(PollRow {
            month: &self.month[idx],
            date: self.date[idx],
            sample: self.sample[idx],
            sample_type: &self.sample_type[idx],
            harris_result: self.harris_result[idx],
            trump_result: self.trump_result[idx],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = PollRow<'_>> {
        (0..self.len()).filter_map(|idx| self.row(idx))
    }

    /// Number of rows per sample type, ordered by type.
    pub fn sample_type_counts(&self) -> BTreeMap<&SampleType, usize> {
        let mut counts = BTreeMap::new();
        for kind in &self.sample_type {
            *counts.entry(kind).or_default() += 1;
        }
        counts
    }
}
