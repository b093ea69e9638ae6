//! Staff-to-project day assignment by lexicographic optimization.
//!
//! Assigns employees to projects day by day over a planning horizon,
//! respecting qualifications, vacations, and one-assignment-per-day
//! capacity. Project demands are expressed as work-days per qualification;
//! a fully staffed project is *realized* and credits its gain, minus a
//! daily penalty when it finishes past its due date.
//!
//! Solving is a three-pass lexicographic MILP: maximize the net result,
//! then minimize how many distinct projects each employee touches, then
//! minimize idle days inside long projects' execution windows. Each pass
//! pins the previous optima as exact constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Employee`, `Project`, `Horizon`,
//!   `ProblemInstance`, `StaffingSchedule`
//! - **`validation`**: Input integrity checks (duplicate IDs, unstaffable
//!   qualifications)
//! - **`milp`**: Per-pass model construction over `good_lp`
//! - **`solver`**: Pass sequencing, extraction, and schedule metrics
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ehrgott (2005), "Multicriteria Optimization" (lexicographic method)

pub mod error;
pub mod milp;
pub mod models;
pub mod solver;
pub mod validation;

pub use error::{ExtractionError, ModelError, SolveError, ValidationError};
pub use models::{DayAssignment, Employee, Horizon, ProblemInstance, Project, StaffingSchedule};
pub use solver::{
    CancelToken, LexicographicSolver, ScheduleMetrics, SolveOutcome, SolveStatus, SolverConfig,
};
