use gradebook::chart::TerminalHistogram;
use gradebook::menu::run_menu;
use gradebook::model::{DataPaths, Gradebook};
use gradebook::output::OutputFormat;
use gradebook::queries::distribution::render_distribution;
use gradebook::queries::grade::calculate_grade;
use gradebook::queries::stats::assignment_stats;
use std::io::Cursor;
use std::path::PathBuf;

fn fixture_paths() -> DataPaths {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data");
    DataPaths {
        students: data.join("students.txt"),
        assignments: data.join("assignments.txt"),
        submissions: data.join("submissions"),
    }
}

fn load() -> Gradebook {
    Gradebook::load(&fixture_paths()).expect("Failed to load fixture gradebook")
}

#[test]
fn test_fixture_tables_load() {
    let book = load();

    assert_eq!(book.students.len(), 3);
    assert_eq!(book.assignments.len(), 3);
    // README.md in the submissions directory is ignored
    assert_eq!(book.submissions.len(), 8);
    assert_eq!(book.students.get("Grace Hopper"), Some(103));
    assert_eq!(book.max_points(3), Some(500));
}

#[test]
fn test_full_pipeline_grades() {
    let book = load();

    let grade = |name: &str| calculate_grade(&book, name).unwrap().unwrap().percent;
    assert_eq!(grade("Ada Lovelace"), 83);
    assert_eq!(grade("Alan Turing"), 95);
    assert_eq!(grade("Grace Hopper"), 33);
}

#[test]
fn test_full_pipeline_stats() {
    let book = load();

    let stats = assignment_stats(&book, "Project").unwrap().unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.min, 62.25);
    assert_eq!(stats.avg, 77.0);
    assert_eq!(stats.max, 95.0);
}

#[test]
fn test_full_pipeline_distribution() {
    let book = load();
    let mut chart = TerminalHistogram::new(Vec::new());

    let dist = render_distribution(&book, "Quiz 1", &mut chart).unwrap().unwrap();

    assert_eq!(dist.counts, vec![0, 0, 0, 0, 1, 0, 1, 0, 1, 0]);
    let drawn = String::from_utf8(chart.into_inner()).unwrap();
    assert!(drawn.starts_with("Quiz 1 score distribution\n"));
}

#[test]
fn test_menu_session_over_fixtures() {
    let book = load();
    let mut input = Cursor::new(b"2\nQuiz 1\n".to_vec());
    let mut out = Vec::new();
    let mut chart = TerminalHistogram::new(Vec::new());

    run_menu(&book, &mut input, &mut out, &mut chart, OutputFormat::Text).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("What is the assignment name: Min: 70%\nAvg: 80%\nMax: 90%\n"));
}

#[test]
fn test_missing_roster_is_fatal() {
    let mut paths = fixture_paths();
    paths.students = paths.students.with_file_name("absent.txt");

    assert!(Gradebook::load(&paths).is_err());
}
