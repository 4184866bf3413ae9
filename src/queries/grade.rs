use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::model::Gradebook;
use crate::queries::types::StudentGrade;

/// Weighted points are divided by this before display. The course totals
/// 1000 achievable points, so this turns points into a percentage.
pub const GRADE_SCALE_DIVISOR: f64 = 10.0;

/// Sums a student's weighted scores across every submission they own.
///
/// Each submission contributes `percent / 100 * max_points` of its
/// assignment; duplicates for the same assignment are all counted.
///
/// Returns `Ok(None)` if the student is not on the roster.
///
/// # Errors
///
/// Returns an error if one of the student's submissions references an
/// assignment id that is not in the assignment table.
#[tracing::instrument(skip(book))]
pub fn calculate_grade(book: &Gradebook, student_name: &str) -> Result<Option<StudentGrade>> {
    let Some(student_id) = book.students.get(student_name) else {
        debug!("Student not on roster");
        return Ok(None);
    };

    let mut total_points = 0.0;
    let mut submissions = 0usize;

    for submission in book.submissions.iter().filter(|s| s.student_id == student_id) {
        let max_points = book.max_points(submission.assignment_id).ok_or_else(|| {
            anyhow!(
                "submission by student {} references unknown assignment id {}",
                student_id,
                submission.assignment_id
            )
        })?;

        total_points += submission.percent / 100.0 * f64::from(max_points);
        submissions += 1;
    }

    let percent = scaled_percent(total_points);
    info!(student_id, submissions, total_points, percent, "Grade calculated");

    Ok(Some(StudentGrade {
        student: student_name.to_string(),
        student_id,
        submissions,
        total_points,
        percent,
    }))
}

/// Scales weighted points to a whole percentage, rounding half to even.
pub fn scaled_percent(total_points: f64) -> i64 {
    (total_points / GRADE_SCALE_DIVISOR).round_ties_even() as i64
}
