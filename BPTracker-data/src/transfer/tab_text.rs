use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::models::reading::{CreateReadingRecord, ReadingRecord};

pub const TITLE: &str = "Blood Pressure & Pulse Readings";
pub const HEADER: &str = "Date\tTime\tSystolic\tDiastolic\tPulse";
const RULE_WIDTH: usize = 60;

/// Record layouts found in tab-separated files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `date, time, systolic, diastolic, pulse`
    Current,
    /// `date, time, reading number, systolic, diastolic, pulse`
    Legacy,
}

impl RecordLayout {
    /// Detect the layout from the column count
    pub fn detect(columns: usize) -> Option<Self> {
        match columns {
            5 => Some(RecordLayout::Current),
            6 => Some(RecordLayout::Legacy),
            _ => None,
        }
    }

    fn first_value_column(self) -> usize {
        match self {
            RecordLayout::Current => 2,
            RecordLayout::Legacy => 3,
        }
    }
}

/// Result of importing a tab-separated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabImport {
    /// Readings recognised in the file, in file order
    pub records: Vec<CreateReadingRecord>,
    /// Line numbers (1-based) that looked like records but failed to parse
    pub rejected_lines: Vec<usize>,
}

/// Render the collection in the tab-separated export format
pub fn export(readings: &[ReadingRecord]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut content = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(content, "{}", TITLE);
    let _ = writeln!(content, "{}\n", rule);
    let _ = writeln!(content, "{}", HEADER);
    let _ = writeln!(content, "{}", "-".repeat(RULE_WIDTH));

    for r in readings {
        let _ = writeln!(
            content,
            "{}\t{}\t{}\t{}\t{}",
            r.date, r.time, r.systolic, r.diastolic, r.pulse
        );
    }

    let _ = writeln!(content, "\n{}", rule);
    let _ = writeln!(content, "Total Readings: {}", readings.len());

    if !readings.is_empty() {
        let count = readings.len() as f64;
        let mean = |value: fn(&ReadingRecord) -> u16| {
            readings.iter().map(|r| f64::from(value(r))).sum::<f64>() / count
        };
        let _ = writeln!(content, "Average Systolic: {:.1}", mean(|r| r.systolic));
        let _ = writeln!(content, "Average Diastolic: {:.1}", mean(|r| r.diastolic));
        let _ = writeln!(content, "Average Pulse: {:.1}", mean(|r| r.pulse));
    }

    content
}

/// Parse a tab-separated file in either record layout
///
/// Lines that are not records (title, rules, header, totals, blank lines) are
/// skipped. Lines with a record's shape and a leading date that then fail to
/// parse are reported in [`TabImport::rejected_lines`]; nothing is coerced.
pub fn import(content: &str) -> TabImport {
    let mut result = TabImport::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        let columns: Vec<&str> = line.split('\t').collect();

        let Some(layout) = RecordLayout::detect(columns.len()) else {
            continue;
        };

        let Some(date) = parse_date(columns[0]) else {
            debug!("Skipping non-record line {}", index + 1);
            continue;
        };

        match parse_record(date, &columns, layout) {
            Some(record) => result.records.push(record),
            None => {
                warn!("Rejecting malformed reading on line {}: {:?}", index + 1, line);
                result.rejected_lines.push(index + 1);
            }
        }
    }

    result
}

fn parse_record(date: NaiveDate, columns: &[&str], layout: RecordLayout) -> Option<CreateReadingRecord> {
    let time = parse_time(columns[1])?;
    let first = layout.first_value_column();

    Some(CreateReadingRecord {
        date: date.format("%Y-%m-%d").to_string(),
        time: time.format("%H:%M").to_string(),
        systolic: parse_measurement(columns[first])?,
        diastolic: parse_measurement(columns[first + 1])?,
        pulse: parse_measurement(columns[first + 2])?,
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

fn parse_measurement(text: &str) -> Option<u16> {
    text.trim().parse::<u16>().ok().filter(|value| *value > 0)
}
