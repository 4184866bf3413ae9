//! Output formatting and persistence for query results.
//!
//! Supports console text, pretty JSON, debug logging, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::queries::types::{AssignmentStats, StudentGrade};
use csv::WriterBuilder;

pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const ASSIGNMENT_NOT_FOUND: &str = "Assignment not found";

/// How query results are written to the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Logs a result using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Writes a result as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_grade<W: Write>(out: &mut W, grade: &StudentGrade, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}%", grade.percent)?,
        OutputFormat::Json => write_json(out, grade)?,
    }
    Ok(())
}

pub fn write_stats<W: Write>(out: &mut W, stats: &AssignmentStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Min: {:.0}%", stats.min)?;
            writeln!(out, "Avg: {:.0}%", stats.avg)?;
            writeln!(out, "Max: {:.0}%", stats.max)?;
        }
        OutputFormat::Json => write_json(out, stats)?,
    }
    Ok(())
}

/// One row of the query log.
#[derive(Debug, Serialize)]
pub struct QueryRecord {
    pub timestamp: DateTime<Utc>,
    pub query: &'static str,
    pub subject: String,
    pub subject_id: u32,
    pub count: usize,
    pub percent: Option<i64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl From<&StudentGrade> for QueryRecord {
    fn from(grade: &StudentGrade) -> Self {
        QueryRecord {
            timestamp: Utc::now(),
            query: "grade",
            subject: grade.student.clone(),
            subject_id: grade.student_id,
            count: grade.submissions,
            percent: Some(grade.percent),
            min: None,
            avg: None,
            max: None,
        }
    }
}

impl From<&AssignmentStats> for QueryRecord {
    fn from(stats: &AssignmentStats) -> Self {
        QueryRecord {
            timestamp: Utc::now(),
            query: "stats",
            subject: stats.assignment.clone(),
            subject_id: stats.assignment_id,
            count: stats.count,
            percent: None,
            min: Some(stats.min),
            avg: Some(stats.avg),
            max: Some(stats.max),
        }
    }
}

/// Appends a [`QueryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: impl AsRef<Path>, record: &QueryRecord) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn grade() -> StudentGrade {
        StudentGrade {
            student: "Ada".to_string(),
            student_id: 1,
            submissions: 2,
            total_points: 80.0,
            percent: 8,
        }
    }

    fn stats() -> AssignmentStats {
        AssignmentStats {
            assignment: "Quiz".to_string(),
            assignment_id: 4,
            count: 3,
            min: 70.0,
            avg: 80.0,
            max: 90.0,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&grade());
    }

    #[test]
    fn test_grade_text() {
        let out = render(|w| write_grade(w, &grade(), OutputFormat::Text));
        assert_eq!(out, "8%\n");
    }

    #[test]
    fn test_stats_text() {
        let out = render(|w| write_stats(w, &stats(), OutputFormat::Text));
        assert_eq!(out, "Min: 70%\nAvg: 80%\nMax: 90%\n");
    }

    #[test]
    fn test_stats_json() {
        let out = render(|w| write_stats(w, &stats(), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["assignment"], "Quiz");
        assert_eq!(value["avg"], 80.0);
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.csv");

        append_record(&path, &QueryRecord::from(&grade())).unwrap();
        append_record(&path, &QueryRecord::from(&stats())).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,query,subject,subject_id,count,percent,min,avg,max"
        );
        assert!(lines[1].ends_with(",grade,Ada,1,2,8,,,"));
        assert!(lines[2].ends_with(",stats,Quiz,4,3,,70.0,80.0,90.0"));
    }
}
