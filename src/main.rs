//! CLI entry point for the gradebook tool.
//!
//! Loads the roster, assignment list and submissions once, then answers a
//! single query given as a subcommand or picked from the interactive menu.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook::chart::TerminalHistogram;
use gradebook::menu::{Outcome, Query, run_menu, run_query};
use gradebook::model::{DataPaths, Gradebook};
use gradebook::output::{OutputFormat, append_record, print_pretty};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Student grades and assignment statistics from flat files", long_about = None)]
struct Cli {
    /// Roster file: one `<3-digit id><name>` per line
    #[arg(long, env = "GRADEBOOK_STUDENTS", default_value = "data/students.txt", global = true)]
    students: PathBuf,

    /// Assignment file: `name`, `id`, `max points` on consecutive lines
    #[arg(long, env = "GRADEBOOK_ASSIGNMENTS", default_value = "data/assignments.txt", global = true)]
    assignments: PathBuf,

    /// Directory of `studentId|assignmentId|percent` .txt files
    #[arg(long, env = "GRADEBOOK_SUBMISSIONS", default_value = "data/submissions", global = true)]
    submissions: PathBuf,

    /// Console format for grade and statistics results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Optional CSV file to append grade and statistics results to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall grade for a student
    Grade {
        #[arg(value_name = "STUDENT")]
        name: String,
    },
    /// Min, average and max score for an assignment
    Stats {
        #[arg(value_name = "ASSIGNMENT")]
        name: String,
    },
    /// Score histogram for an assignment
    Graph {
        #[arg(value_name = "ASSIGNMENT")]
        name: String,
    },
    /// Pick a query from the interactive menu (default)
    Menu,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;
    let cli = Cli::parse();

    let paths = DataPaths {
        students: cli.students,
        assignments: cli.assignments,
        submissions: cli.submissions,
    };
    let book = Gradebook::load(&paths)?;

    let mut out = io::stdout();
    let mut chart = TerminalHistogram::new(io::stdout());

    let outcome = match cli.command {
        Some(Commands::Grade { name }) => Some(run_query(
            &book,
            &Query::Grade(name),
            &mut out,
            &mut chart,
            cli.format,
        )?),
        Some(Commands::Stats { name }) => Some(run_query(
            &book,
            &Query::Stats(name),
            &mut out,
            &mut chart,
            cli.format,
        )?),
        Some(Commands::Graph { name }) => Some(run_query(
            &book,
            &Query::Graph(name),
            &mut out,
            &mut chart,
            cli.format,
        )?),
        Some(Commands::Menu) | None => {
            run_menu(&book, &mut io::stdin().lock(), &mut out, &mut chart, cli.format)?
        }
    };

    if let Some(Outcome::Recorded(record)) = outcome {
        print_pretty(&record);
        if let Some(path) = cli.output {
            append_record(&path, &record)?;
            info!(path = %path.display(), "Query result appended");
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The stderr layer defaults to `warn` so prompts and results on stdout stay
/// readable; the file layer records everything down to `debug`.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gradebook.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gradebook.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
