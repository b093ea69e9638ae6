//! Error taxonomy.
//!
//! Validation and modeling errors abort before any solver invocation.
//! Infeasibility, time-limit, and cancellation outcomes are *not* errors —
//! they are statuses on [`SolveOutcome`](crate::solver::SolveOutcome), so a
//! caller can distinguish "no staffing exists" from "ran out of time" from
//! "success". A later pass failing despite pinned optima is always a defect
//! and is reported as [`SolveError::InternalInconsistency`], never as
//! business infeasibility.

use thiserror::Error;

/// Malformed or impossible input, detected at problem construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two employees share the same ID.
    #[error("duplicate employee id '{0}'")]
    DuplicateEmployeeId(String),
    /// Two projects share the same ID.
    #[error("duplicate project id '{0}'")]
    DuplicateProjectId(String),
    /// A required qualification is held by no employee at all, so the
    /// project can never be realized.
    #[error("qualification '{qualification}' required by project '{project}' is held by no employee")]
    UnstaffableQualification {
        /// Project whose requirement cannot be met.
        project: String,
        /// The qualification nobody holds.
        qualification: String,
    },
}

/// Degenerate problem instance — nothing to optimize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The instance has no employees.
    #[error("problem instance has no employees")]
    NoEmployees,
    /// The planning horizon has no working days.
    #[error("planning horizon has no working days")]
    EmptyHorizon,
}

/// Inconsistent solver output detected while decoding a solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// An employee has two assignments on the same day.
    #[error("employee '{employee}' has more than one assignment on day {day}")]
    DoubleBooking { employee: String, day: u32 },
    /// An employee is assigned on one of their vacation days.
    #[error("employee '{employee}' is assigned on vacation day {day}")]
    VacationAssignment { employee: String, day: u32 },
    /// A project is marked realized but a requirement is not exactly met.
    #[error(
        "project '{project}' marked realized but qualification '{qualification}' \
         is staffed {staffed} of {required} days"
    )]
    RealizationMismatch {
        project: String,
        qualification: String,
        staffed: u32,
        required: u32,
    },
}

/// Failure of a solve run, as opposed to a business outcome.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The instance was too degenerate to model.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A pass after the first came back infeasible despite its pinned
    /// optima. Should not occur; guarded against numerical edge cases.
    #[error("pass {pass} failed despite pinned earlier optima: {reason}")]
    InternalInconsistency { pass: u8, reason: String },
    /// The solved variable values did not decode to a coherent schedule.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The MILP backend failed for a non-business reason.
    #[error("solver backend failure: {0}")]
    Backend(String),
}
