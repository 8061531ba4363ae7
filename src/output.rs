//! Output formatting and persistence for poll summaries.
//!
//! Supports the plain-text report, pretty-printing, JSON logging, and CSV append.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::stats::{PollSummary, format_percent, format_signed_percent};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Renders the three statistics in the fixed report layout.
pub fn render_report(summary: &PollSummary) -> String {
    let lv = summary.likely_voter_average();
    let change = summary.history_change();

    format!(
        "Highest Polling Candidate: {}\n\
         Likely Voter Polling Average:\n  \
         Harris: {}\n  \
         Trump: {}\n\
         Polling History Change:\n  \
         Harris: {}\n  \
         Trump: {}\n",
        summary.leader(),
        format_percent(lv.harris),
        format_percent(lv.trump),
        format_signed_percent(change.harris),
        format_signed_percent(change.trump),
    )
}

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &PollSummary) {
    debug!("{:#?}", summary);
}

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &PollSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends a [`PollSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: impl AsRef<Path>, summary: &PollSummary) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("unable to open {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on a fresh file
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Leader;
    use chrono::Utc;
    use std::fs;

    fn summary() -> PollSummary {
        PollSummary {
            timestamp: Utc::now(),
            source: "polling_data.csv".to_string(),
            rows: 124,
            leader: Leader::Harris,
            leader_share: 0.57,
            lv_harris: 0.4934,
            lv_trump: 0.4604,
            window: 30,
            harris_change: 0.0153,
            trump_change: 0.0207,
        }
    }

    #[test]
    fn test_render_report_layout() {
        let report = render_report(&summary());

        assert_eq!(
            report,
            "Highest Polling Candidate: Harris 57.0%\n\
             Likely Voter Polling Average:\n\
             \x20 Harris: 49.34%\n\
             \x20 Trump: 46.04%\n\
             Polling History Change:\n\
             \x20 Harris: +1.53%\n\
             \x20 Trump: +2.07%\n"
        );
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&summary());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&summary()).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        append_record(&path, &summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,source,rows,leader"));
        assert!(content.contains("polling_data.csv,124,Harris,0.57"));
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        append_record(&path, &summary()).unwrap();
        append_record(&path, &summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_append_record_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.csv");

        assert!(append_record(&path, &summary()).is_err());
    }
}
