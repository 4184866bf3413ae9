//! The three gradebook queries.
//!
//! Each query borrows a loaded [`Gradebook`](crate::model::Gradebook) and
//! returns `Ok(None)` when the requested student or assignment is unknown.
//! Errors are reserved for data that cannot be graded at all.

pub mod distribution;
pub mod grade;
pub mod stats;
pub mod types;
pub mod utility;
