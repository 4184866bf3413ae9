use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::model::Gradebook;
use crate::queries::types::AssignmentStats;
use crate::queries::utility::{floor_mean, max, min};

/// Computes min, floor-average and max of an assignment's percent scores.
///
/// Returns `Ok(None)` if no assignment has that name.
///
/// # Errors
///
/// Returns an error if the assignment exists but has no submissions; there
/// is nothing to take a minimum or an average of.
#[tracing::instrument(skip(book))]
pub fn assignment_stats(book: &Gradebook, assignment_name: &str) -> Result<Option<AssignmentStats>> {
    let Some(assignment) = book.assignments.get(assignment_name) else {
        debug!("Assignment not in table");
        return Ok(None);
    };

    let scores = book.scores_for(assignment.id);
    let no_scores = || {
        anyhow!(
            "assignment '{}' (id {}) has no submissions",
            assignment_name,
            assignment.id
        )
    };

    let stats = AssignmentStats {
        assignment: assignment_name.to_string(),
        assignment_id: assignment.id,
        count: scores.len(),
        min: min(&scores).ok_or_else(no_scores)?,
        avg: floor_mean(&scores).ok_or_else(no_scores)?,
        max: max(&scores).ok_or_else(no_scores)?,
    };

    info!(
        assignment_id = stats.assignment_id,
        count = stats.count,
        min = stats.min,
        avg = stats.avg,
        max = stats.max,
        "Assignment statistics computed"
    );
    Ok(Some(stats))
}
