//! Staffing domain models.
//!
//! Core data types for representing staffing problems and solutions.
//!
//! | Type | Role |
//! |------|------|
//! | `Employee` | Staff member with qualifications and vacations |
//! | `Project` | Work-day demand per qualification, gain, due date, penalty |
//! | `Horizon` | Ordered working days of the planning period |
//! | `ProblemInstance` | Validated, immutable snapshot with derived indices |
//! | `StaffingSchedule` | (employee, day) → (project, qualification) solution |

mod employee;
mod horizon;
mod problem;
mod project;
mod schedule;

pub use employee::Employee;
pub use horizon::Horizon;
pub use problem::ProblemInstance;
pub use project::Project;
pub use schedule::{DayAssignment, StaffingSchedule};
