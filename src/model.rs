//! In-memory gradebook tables.
//!
//! All tables are built once at startup and never mutated afterwards; query
//! functions borrow a [`Gradebook`] immutably.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use tracing::info;

use crate::parser::{parse_assignments, parse_students, parse_submissions};

/// Student name → student id.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    ids: HashMap<String, u32>,
}

impl Roster {
    /// Inserts a student; a repeated name replaces the earlier id.
    pub fn insert(&mut self, name: String, id: u32) {
        self.ids.insert(name, id);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: u32,
    pub max_points: u32,
}

/// Assignment name → [`Assignment`], remembering the order in which names
/// first appeared.
#[derive(Debug, Default, Clone)]
pub struct AssignmentTable {
    by_name: HashMap<String, Assignment>,
    order: Vec<String>,
}

impl AssignmentTable {
    /// Inserts an assignment. A repeated name overwrites the earlier entry
    /// but keeps its original position.
    pub fn insert(&mut self, name: String, assignment: Assignment) {
        match self.by_name.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(assignment);
            }
            Entry::Vacant(slot) => {
                self.order.push(slot.key().clone());
                slot.insert(assignment);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Assignment> {
        self.by_name.get(name).copied()
    }

    /// Iterates entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Assignment)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.by_name[name]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One recorded score for a (student, assignment) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: u32,
    pub assignment_id: u32,
    pub percent: f64,
}

/// Locations of the three input sources.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub students: PathBuf,
    pub assignments: PathBuf,
    pub submissions: PathBuf,
}

/// The loaded tables plus an assignment-id index over them.
#[derive(Debug, Clone)]
pub struct Gradebook {
    pub students: Roster,
    pub assignments: AssignmentTable,
    pub submissions: Vec<Submission>,
    max_points_by_id: HashMap<u32, u32>,
}

impl Gradebook {
    pub fn new(students: Roster, assignments: AssignmentTable, submissions: Vec<Submission>) -> Self {
        let mut max_points_by_id = HashMap::with_capacity(assignments.len());
        // First entry in table order wins when ids collide.
        for (_, assignment) in assignments.iter() {
            max_points_by_id
                .entry(assignment.id)
                .or_insert(assignment.max_points);
        }

        Self {
            students,
            assignments,
            submissions,
            max_points_by_id,
        }
    }

    /// Parses all three sources.
    ///
    /// # Errors
    ///
    /// Fails on missing files, a missing submissions directory, or any
    /// malformed line.
    #[tracing::instrument(skip_all, fields(students = %paths.students.display()))]
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let students = parse_students(&paths.students)?;
        let assignments = parse_assignments(&paths.assignments)?;
        let submissions = parse_submissions(&paths.submissions)?;

        info!(
            students = students.len(),
            assignments = assignments.len(),
            submissions = submissions.len(),
            "Gradebook loaded"
        );

        Ok(Self::new(students, assignments, submissions))
    }

    pub fn max_points(&self, assignment_id: u32) -> Option<u32> {
        self.max_points_by_id.get(&assignment_id).copied()
    }

    /// Percent scores recorded against `assignment_id`, in load order.
    pub fn scores_for(&self, assignment_id: u32) -> Vec<f64> {
        self.submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .map(|s| s.percent)
            .collect()
    }
}
