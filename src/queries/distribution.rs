use anyhow::Result;
use tracing::{debug, info};

use crate::chart::ChartRenderer;
use crate::model::Gradebook;
use crate::queries::types::Distribution;

/// Histogram bin edges in percent. Every bin is half-open except the last,
/// which also includes 100.
pub const BIN_EDGES: [f64; 11] = [
    50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0,
];

/// Index of the bin holding `score`, or `None` if it lies outside the edges.
pub fn bin_index(score: f64) -> Option<usize> {
    let first = BIN_EDGES[0];
    let last = BIN_EDGES[BIN_EDGES.len() - 1];
    if !(first..=last).contains(&score) {
        return None;
    }

    let bins = BIN_EDGES.len() - 1;
    let idx = BIN_EDGES.partition_point(|&edge| edge <= score) - 1;
    Some(idx.min(bins - 1))
}

/// Counts scores per bin of [`BIN_EDGES`].
pub fn bucket_scores(assignment: &str, assignment_id: u32, scores: &[f64]) -> Distribution {
    let mut counts = vec![0usize; BIN_EDGES.len() - 1];
    let mut excluded = 0usize;

    for &score in scores {
        match bin_index(score) {
            Some(idx) => counts[idx] += 1,
            None => {
                debug!(score, "Score outside histogram range");
                excluded += 1;
            }
        }
    }

    Distribution {
        assignment: assignment.to_string(),
        assignment_id,
        edges: BIN_EDGES.to_vec(),
        counts,
        excluded,
    }
}

/// Buckets an assignment's scores and hands them to `renderer`, returning
/// once the renderer is done.
///
/// Returns `Ok(None)` if no assignment has that name. An assignment with no
/// submissions renders an empty histogram.
///
/// # Errors
///
/// Propagates renderer failures.
#[tracing::instrument(skip(book, renderer))]
pub fn render_distribution<R: ChartRenderer + ?Sized>(
    book: &Gradebook,
    assignment_name: &str,
    renderer: &mut R,
) -> Result<Option<Distribution>> {
    let Some(assignment) = book.assignments.get(assignment_name) else {
        debug!("Assignment not in table");
        return Ok(None);
    };

    let scores = book.scores_for(assignment.id);
    let distribution = bucket_scores(assignment_name, assignment.id, &scores);
    info!(
        assignment_id = assignment.id,
        binned = distribution.total(),
        excluded = distribution.excluded,
        "Distribution bucketed"
    );

    renderer.render(&distribution)?;
    Ok(Some(distribution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, AssignmentTable, Roster, Submission};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Distribution>,
    }

    impl ChartRenderer for Recorder {
        fn render(&mut self, distribution: &Distribution) -> Result<()> {
            self.seen.push(distribution.clone());
            Ok(())
        }
    }

    fn book(scores: &[f64]) -> Gradebook {
        let mut assignments = AssignmentTable::default();
        assignments.insert("Lab".to_string(), Assignment { id: 3, max_points: 100 });
        assignments.insert("Empty".to_string(), Assignment { id: 4, max_points: 100 });

        let submissions = scores
            .iter()
            .map(|&percent| Submission { student_id: 1, assignment_id: 3, percent })
            .collect();
        Gradebook::new(Roster::default(), assignments, submissions)
    }

    #[test]
    fn test_bin_edges_are_fixed() {
        assert_eq!(
            BIN_EDGES,
            [50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0]
        );
    }

    #[test]
    fn test_bin_index_boundaries() {
        assert_eq!(bin_index(50.0), Some(0));
        assert_eq!(bin_index(54.99), Some(0));
        assert_eq!(bin_index(55.0), Some(1));
        assert_eq!(bin_index(94.9), Some(8));
        assert_eq!(bin_index(95.0), Some(9));
        assert_eq!(bin_index(100.0), Some(9));
    }

    #[test]
    fn test_bin_index_out_of_range() {
        assert_eq!(bin_index(49.9), None);
        assert_eq!(bin_index(100.5), None);
        assert_eq!(bin_index(f64::NAN), None);
    }

    #[test]
    fn test_bucket_scores_counts_and_excludes() {
        let dist = bucket_scores("Lab", 3, &[40.0, 52.0, 95.0, 95.0, 100.0, 77.5]);

        assert_eq!(dist.counts, vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 3]);
        assert_eq!(dist.excluded, 1);
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn test_render_distribution_hands_off_to_renderer() {
        let book = book(&[60.0, 61.0, 99.0]);
        let mut recorder = Recorder::default();

        let dist = render_distribution(&book, "Lab", &mut recorder).unwrap().unwrap();

        assert_eq!(recorder.seen, vec![dist.clone()]);
        assert_eq!(dist.counts[2], 2);
        assert_eq!(dist.counts[9], 1);
    }

    #[test]
    fn test_render_distribution_unknown_assignment() {
        let book = book(&[60.0]);
        let mut recorder = Recorder::default();

        assert_eq!(render_distribution(&book, "Nope", &mut recorder).unwrap(), None);
        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn test_render_distribution_empty_assignment_renders_empty_chart() {
        let book = book(&[60.0]);
        let mut recorder = Recorder::default();

        let dist = render_distribution(&book, "Empty", &mut recorder).unwrap().unwrap();

        assert_eq!(dist.total(), 0);
        assert_eq!(recorder.seen.len(), 1);
    }
}
