//! Staffing schedule (solution) model.
//!
//! A schedule maps each (employee, day) to at most one
//! (project, qualification) pair; anything absent is unassigned. It is the
//! only artifact that outlives a solve — decision variables are discarded
//! once the final pass completes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One employee-day of work on a project's qualification task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    /// Employee performing the work.
    pub employee: String,
    /// Horizon day index (0-based).
    pub day: u32,
    /// Project receiving the work.
    pub project: String,
    /// Qualification the work counts toward.
    pub qualification: String,
}

impl DayAssignment {
    /// Creates a new day assignment.
    pub fn new(
        employee: impl Into<String>,
        day: u32,
        project: impl Into<String>,
        qualification: impl Into<String>,
    ) -> Self {
        Self {
            employee: employee.into(),
            day,
            project: project.into(),
            qualification: qualification.into(),
        }
    }
}

/// A complete day-by-day staffing schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffingSchedule {
    /// All employee-day assignments, in deterministic
    /// (employee, day, project, qualification) order.
    pub assignments: Vec<DayAssignment>,
}

impl StaffingSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: DayAssignment) {
        self.assignments.push(assignment);
    }

    /// Number of employee-day assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule assigns nothing.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The assignment for an (employee, day), or `None` if unassigned.
    pub fn assignment_for(&self, employee: &str, day: u32) -> Option<&DayAssignment> {
        self.assignments
            .iter()
            .find(|a| a.employee == employee && a.day == day)
    }

    /// All assignments for an employee.
    pub fn assignments_for_employee(&self, employee: &str) -> Vec<&DayAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.employee == employee)
            .collect()
    }

    /// All assignments for a project.
    pub fn assignments_for_project(&self, project: &str) -> Vec<&DayAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .collect()
    }

    /// First day index on which a project receives any work.
    pub fn first_day_of(&self, project: &str) -> Option<u32> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .map(|a| a.day)
            .min()
    }

    /// Last day index on which a project receives any work.
    pub fn last_day_of(&self, project: &str) -> Option<u32> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .map(|a| a.day)
            .max()
    }

    /// Completion day count (1-based) of a project: last worked day + 1.
    pub fn completion_day(&self, project: &str) -> Option<u32> {
        self.last_day_of(project).map(|d| d + 1)
    }

    /// The distinct day indices on which a project receives any work.
    pub fn worked_days_of(&self, project: &str) -> BTreeSet<u32> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .map(|a| a.day)
            .collect()
    }

    /// Execution-gap days of a project: days strictly between its first
    /// and last worked day on which it receives no staffing. A project
    /// executed on fully consecutive days scores zero.
    pub fn gap_days(&self, project: &str) -> u32 {
        let worked = self.worked_days_of(project);
        match (worked.first(), worked.last()) {
            (Some(&first), Some(&last)) => (last - first + 1) - worked.len() as u32,
            _ => 0,
        }
    }

    /// Work-days staffed toward a (project, qualification) pair.
    pub fn staffed_days(&self, project: &str, qualification: &str) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.project == project && a.qualification == qualification)
            .count() as u32
    }

    /// The distinct projects an employee has any assignment to.
    pub fn distinct_projects_of(&self, employee: &str) -> BTreeSet<&str> {
        self.assignments
            .iter()
            .filter(|a| a.employee == employee)
            .map(|a| a.project.as_str())
            .collect()
    }
}
