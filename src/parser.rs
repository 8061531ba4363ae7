//! Line parser for poll CSV rows.
//!
//! A row looks like `October,15,1500 LV,57.0,53.2`: the third column packs the
//! sample size and sample type into one comma field, separated by whitespace.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PollError;

/// Number of comma separated columns in a data row.
pub const FIELD_COUNT: usize = 5;

/// Who a poll sampled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SampleType {
    /// `LV`
    LikelyVoter,
    /// `RV`
    RegisteredVoter,
    /// `A`
    Adults,
    /// `V`
    Voters,
    /// Any other code, kept verbatim.
    Other(String),
}

impl SampleType {
    pub fn as_str(&self) -> &str {
        match self {
            SampleType::LikelyVoter => "LV",
            SampleType::RegisteredVoter => "RV",
            SampleType::Adults => "A",
            SampleType::Voters => "V",
            SampleType::Other(code) => code,
        }
    }
}

impl FromStr for SampleType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LV" => SampleType::LikelyVoter,
            "RV" => SampleType::RegisteredVoter,
            "A" => SampleType::Adults,
            "V" => SampleType::Voters,
            other => SampleType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SampleType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRecord {
    pub month: String,
    pub date: u32,
    pub sample: u32,
    pub sample_type: SampleType,
    pub harris_result: f64,
    pub trump_result: f64,
}

/// Parses a single data row. `line_no` is only used in error messages.
pub fn parse_line(line_no: usize, line: &str) -> Result<PollRecord, PollError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(PollError::parse(
            line_no,
            "row",
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    let month = fields[0];
    if month.is_empty() {
        return Err(PollError::parse(line_no, "month", "empty"));
    }

    let date = parse_integer(line_no, "date", fields[1])?;
    let (sample, sample_type) = split_sample(line_no, fields[2])?;
    let harris_result = parse_share(line_no, "harris_result", fields[3])?;
    let trump_result = parse_share(line_no, "trump_result", fields[4])?;

    Ok(PollRecord {
        month: month.to_string(),
        date,
        sample,
        sample_type,
        harris_result,
        trump_result,
    })
}

/// Splits the packed `"<sample> <type>"` column into its two values.
///
/// Exactly one whitespace character must separate the tokens; a missing type,
/// a missing separator or doubled whitespace are all rejected.
pub fn split_sample(line_no: usize, field: &str) -> Result<(u32, SampleType), PollError> {
    let tokens: Vec<&str> = field.split(char::is_whitespace).collect();
    let (size, code) = match tokens.as_slice() {
        [size, code] if !size.is_empty() && !code.is_empty() => (*size, *code),
        _ => {
            return Err(PollError::parse(
                line_no,
                "sample",
                format!(
                    "expected \"<size> <type>\", got {:?} ({} tokens)",
                    field,
                    tokens.len()
                ),
            ));
        }
    };

    let sample = parse_integer(line_no, "sample", size)?;
    if sample == 0 {
        return Err(PollError::parse(line_no, "sample", "sample size must be positive"));
    }

    let Ok(sample_type) = code.parse::<SampleType>();
    Ok((sample, sample_type))
}

fn parse_integer(line_no: usize, field: &'static str, raw: &str) -> Result<u32, PollError> {
    raw.parse::<u32>().map_err(|e| {
        PollError::parse(line_no, field, format!("expected an integer, got {:?}: {}", raw, e))
    })
}

/// Parses a result column as written in the file.
///
/// The value must lie in `[0, 100]`. Whether a file uses fractions or
/// percentages is settled per file by [`PollTable::parse`](crate::table::PollTable::parse).
pub fn parse_share(line_no: usize, field: &'static str, raw: &str) -> Result<f64, PollError> {
    let value = raw.parse::<f64>().map_err(|e| {
        PollError::parse(line_no, field, format!("expected a number, got {:?}: {}", raw, e))
    })?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(PollError::parse(
            line_no,
            field,
            format!("{} is not a percentage", raw),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_example_row() {
        let record = parse_line(2, "October,15,1500 LV,57.0,53.2").unwrap();

        assert_eq!(record.month, "October");
        assert_eq!(record.date, 15);
        assert_eq!(record.sample, 1500);
        assert_eq!(record.sample_type, SampleType::LikelyVoter);
        assert_eq!(record.harris_result, 57.0);
        assert_eq!(record.trump_result, 53.2);
    }

    #[test]
    fn test_parse_line_trims_fields() {
        let record = parse_line(2, " September , 3 ,  812 RV , 0.48 , 0.47 ").unwrap();

        assert_eq!(record.month, "September");
        assert_eq!(record.date, 3);
        assert_eq!(record.sample, 812);
        assert_eq!(record.sample_type, SampleType::RegisteredVoter);
        assert_eq!(record.harris_result, 0.48);
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        let err = parse_line(4, "October,15,1500 LV,0.5").unwrap_err();
        assert!(matches!(err, PollError::Parse { line: 4, field: "row", .. }));

        let err = parse_line(5, "October,15,1500 LV,0.5,0.4,0.1").unwrap_err();
        assert!(matches!(err, PollError::Parse { line: 5, field: "row", .. }));
    }

    #[test]
    fn test_parse_line_bad_date() {
        let err = parse_line(3, "October,fifteen,1500 LV,0.5,0.4").unwrap_err();
        assert!(matches!(err, PollError::Parse { line: 3, field: "date", .. }));
    }

    #[test]
    fn test_parse_line_empty_month() {
        let err = parse_line(3, " ,15,1500 LV,0.5,0.4").unwrap_err();
        assert!(matches!(err, PollError::Parse { field: "month", .. }));
    }

    #[test]
    fn test_split_sample_rejects_malformed() {
        for bad in ["1500", "1500LV", "1500  LV", "1500 LV extra", " LV", "1500 "] {
            let err = split_sample(9, bad).unwrap_err();
            assert!(
                matches!(err, PollError::Parse { line: 9, field: "sample", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_split_sample_rejects_non_numeric_and_zero() {
        assert!(split_sample(2, "many LV").is_err());
        assert!(split_sample(2, "-5 LV").is_err());
        assert!(split_sample(2, "0 LV").is_err());
    }

    #[test]
    fn test_split_sample_keeps_unknown_codes() {
        let (size, kind) = split_sample(2, "640 LV/RV").unwrap();
        assert_eq!(size, 640);
        assert_eq!(kind, SampleType::Other("LV/RV".to_string()));
        assert_eq!(kind.to_string(), "LV/RV");
    }

    #[test]
    fn test_parse_share_keeps_file_units() {
        assert_eq!(parse_share(2, "harris_result", "0.5").unwrap(), 0.5);
        assert_eq!(parse_share(2, "harris_result", "1").unwrap(), 1.0);
        assert_eq!(parse_share(2, "harris_result", "46.5").unwrap(), 46.5);
        assert_eq!(parse_share(2, "harris_result", "100").unwrap(), 100.0);
    }

    #[test]
    fn test_parse_share_rejects_out_of_range() {
        for bad in ["-0.1", "100.5", "NaN", "inf", "", "abc"] {
            assert!(
                parse_share(2, "trump_result", bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sample_type_round_trip_codes() {
        for code in ["LV", "RV", "A", "V"] {
            let parsed: SampleType = code.parse().unwrap();
            assert_eq!(parsed.as_str(), code);
        }
    }
}
