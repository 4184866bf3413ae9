//! Result types returned by the queries.

use serde::Serialize;

/// Outcome of a grade query for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentGrade {
    pub student: String,
    pub student_id: u32,
    pub submissions: usize,
    /// Sum of `percent / 100 * max_points` over the student's submissions.
    pub total_points: f64,
    /// `total_points` scaled and rounded for display.
    pub percent: i64,
}

/// Min / floor-average / max over one assignment's scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStats {
    pub assignment: String,
    pub assignment_id: u32,
    pub count: usize,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Bucketed scores for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub assignment: String,
    pub assignment_id: u32,
    /// Bin edges; bin `i` spans `edges[i]..edges[i + 1]`.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Scores that fell outside every bin.
    pub excluded: usize,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
