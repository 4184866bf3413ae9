//! Flat-file parsers for the roster, the assignment list and the
//! submissions directory.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::model::{Assignment, AssignmentTable, Roster, Submission};

/// Width of the numeric id prefix on every roster line.
pub const ROSTER_ID_WIDTH: usize = 3;

/// Only directory entries ending with this suffix are read as submissions.
pub const SUBMISSION_SUFFIX: &str = ".txt";

const SUBMISSION_FIELDS: usize = 3;

/// Parses a roster file of `<3-digit id><name>` lines.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is shorter than
/// [`ROSTER_ID_WIDTH`] characters, or its prefix is not a number.
pub fn parse_students(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster '{}'", path.display()))?;

    let mut roster = Roster::default();
    for (idx, line) in content.lines().enumerate() {
        let Some((prefix, name)) = split_id_prefix(line) else {
            bail!(
                "{}:{}: roster line is shorter than {} characters",
                path.display(),
                idx + 1,
                ROSTER_ID_WIDTH
            );
        };
        let id: u32 = prefix.trim().parse().with_context(|| {
            format!("{}:{}: invalid student id '{}'", path.display(), idx + 1, prefix)
        })?;
        roster.insert(name.trim().to_string(), id);
    }

    info!(path = %path.display(), students = roster.len(), "Roster parsed");
    Ok(roster)
}

fn split_id_prefix(line: &str) -> Option<(&str, &str)> {
    let end = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(ROSTER_ID_WIDTH)?;
    Some(line.split_at(end))
}

/// Parses an assignment file made of `name / id / max points` line triples.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its line count is not a
/// multiple of three, or an id or point value is not an integer.
pub fn parse_assignments(path: impl AsRef<Path>) -> Result<AssignmentTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read assignments '{}'", path.display()))?;

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() % 3 != 0 {
        bail!(
            "{}: expected groups of 3 lines, found {} lines",
            path.display(),
            lines.len()
        );
    }

    let mut table = AssignmentTable::default();
    for (group, record) in lines.chunks(3).enumerate() {
        let first_line = group * 3 + 1;
        let id: u32 = record[1].trim().parse().with_context(|| {
            format!("{}:{}: invalid assignment id '{}'", path.display(), first_line + 1, record[1])
        })?;
        let max_points: u32 = record[2].trim().parse().with_context(|| {
            format!("{}:{}: invalid point value '{}'", path.display(), first_line + 2, record[2])
        })?;

        table.insert(record[0].trim().to_string(), Assignment { id, max_points });
    }

    info!(path = %path.display(), assignments = table.len(), "Assignments parsed");
    Ok(table)
}

/// Reads every `*.txt` file in `dir` as `studentId|assignmentId|percent` rows.
///
/// Files are visited in file-name order and rows keep their order within a
/// file. Symlinks to files are followed; directories are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed, a file cannot be read,
/// or any line (blank lines included) does not hold exactly three numeric
/// fields.
pub fn parse_submissions(dir: impl AsRef<Path>) -> Result<Vec<Submission>> {
    let dir = dir.as_ref();
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list submissions directory '{}'", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut submissions = Vec::new();
    let mut files = 0usize;

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let matches_suffix = file_name
            .to_str()
            .is_some_and(|name| name.ends_with(SUBMISSION_SUFFIX));

        if !matches_suffix || !fs::metadata(&path)?.is_file() {
            debug!(path = %path.display(), "Skipping non-submission entry");
            continue;
        }

        let before = submissions.len();
        read_submission_file(&path, &mut submissions)?;
        files += 1;
        debug!(path = %path.display(), rows = submissions.len() - before, "Submission file read");
    }

    info!(dir = %dir.display(), files, submissions = submissions.len(), "Submissions parsed");
    Ok(submissions)
}

fn read_submission_file(path: &Path, out: &mut Vec<Submission>) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read submission file '{}'", path.display()))?;

    // The csv reader drops empty lines, so catch them first.
    if let Some(idx) = content.lines().position(|line| line.trim().is_empty()) {
        bail!(
            "{}:{}: expected {} '|'-separated fields, found a blank line",
            path.display(),
            idx + 1,
            SUBMISSION_FIELDS
        );
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    for result in rdr.records() {
        let record =
            result.with_context(|| format!("failed to read submission file '{}'", path.display()))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != SUBMISSION_FIELDS {
            bail!(
                "{}:{}: expected {} '|'-separated fields, found {}",
                path.display(),
                line,
                SUBMISSION_FIELDS,
                record.len()
            );
        }

        let submission: Submission = record
            .deserialize(None)
            .with_context(|| format!("{}:{}: malformed submission row", path.display(), line))?;
        out.push(submission);
    }

    Ok(())
}
