//! Interactive console flow: pick a query, enter a name, see the result.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use tracing::info;

use crate::chart::ChartRenderer;
use crate::model::Gradebook;
use crate::output::{
    ASSIGNMENT_NOT_FOUND, OutputFormat, QueryRecord, STUDENT_NOT_FOUND, write_grade, write_stats,
};
use crate::queries::distribution::render_distribution;
use crate::queries::grade::calculate_grade;
use crate::queries::stats::assignment_stats;

/// A query together with the name it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Grade(String),
    Stats(String),
    Graph(String),
}

/// What a query produced, for callers that want to log it.
#[derive(Debug)]
pub enum Outcome {
    Recorded(QueryRecord),
    Shown,
    NotFound,
}

/// Runs a single query against `book`, writing its result to `out`.
///
/// # Errors
///
/// Hard failures from the query itself, plus write errors.
pub fn run_query<W, R>(
    book: &Gradebook,
    query: &Query,
    out: &mut W,
    renderer: &mut R,
    format: OutputFormat,
) -> Result<Outcome>
where
    W: Write,
    R: ChartRenderer + ?Sized,
{
    let outcome = match query {
        Query::Grade(name) => match calculate_grade(book, name)? {
            Some(grade) => {
                write_grade(out, &grade, format)?;
                Outcome::Recorded(QueryRecord::from(&grade))
            }
            None => {
                writeln!(out, "{STUDENT_NOT_FOUND}")?;
                Outcome::NotFound
            }
        },
        Query::Stats(name) => match assignment_stats(book, name)? {
            Some(stats) => {
                write_stats(out, &stats, format)?;
                Outcome::Recorded(QueryRecord::from(&stats))
            }
            None => {
                writeln!(out, "{ASSIGNMENT_NOT_FOUND}")?;
                Outcome::NotFound
            }
        },
        Query::Graph(name) => match render_distribution(book, name, renderer)? {
            Some(_) => Outcome::Shown,
            None => {
                writeln!(out, "{ASSIGNMENT_NOT_FOUND}")?;
                Outcome::NotFound
            }
        },
    };

    Ok(outcome)
}

/// Prints the three-option menu, reads a selection and a name from `input`,
/// and runs the chosen query. An unrecognised selection prints
/// `Invalid selection` and returns `Ok(None)`.
pub fn prompt_query<I: BufRead, W: Write>(input: &mut I, out: &mut W) -> Result<Option<Query>> {
    writeln!(out, "1. Student grade")?;
    writeln!(out, "2. Assignment statistics")?;
    writeln!(out, "3. Assignment graph")?;
    let selection = prompt(input, out, "\nEnter your selection: ")?;

    let query = match selection.as_str() {
        "1" => Query::Grade(prompt(input, out, "What is the student's name: ")?),
        "2" => Query::Stats(prompt(input, out, "What is the assignment name: ")?),
        "3" => Query::Graph(prompt(input, out, "What is the assignment name: ")?),
        other => {
            info!(selection = other, "Invalid menu selection");
            writeln!(out, "Invalid selection")?;
            return Ok(None);
        }
    };

    info!(?query, "Menu query selected");
    Ok(Some(query))
}

/// Full interactive run: menu, prompt, query.
pub fn run_menu<I, W, R>(
    book: &Gradebook,
    input: &mut I,
    out: &mut W,
    renderer: &mut R,
    format: OutputFormat,
) -> Result<Option<Outcome>>
where
    I: BufRead,
    W: Write,
    R: ChartRenderer + ?Sized,
{
    match prompt_query(input, out)? {
        Some(query) => Ok(Some(run_query(book, &query, out, renderer, format)?)),
        None => Ok(None),
    }
}

/// Writes `message`, then reads one line with its line ending removed.
///
/// # Errors
///
/// Returns an error if input ends before a line is entered.
fn prompt<I: BufRead, W: Write>(input: &mut I, out: &mut W, message: &str) -> Result<String> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input ended while waiting for: {}", message.trim());
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}
