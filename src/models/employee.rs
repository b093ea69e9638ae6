//! Employee (staff member) model.
//!
//! An employee holds a set of qualifications and a set of vacation days.
//! On a vacation day the employee can never be assigned; on a working day
//! the employee can cover at most one (project, qualification) task.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A staff member available for project assignments.
///
/// Qualifications name the skill categories the employee can perform.
/// Vacation days are 0-based indices into the planning horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Skill categories this employee holds.
    pub qualifications: BTreeSet<String>,
    /// Horizon day indices on which this employee cannot work.
    pub vacations: BTreeSet<u32>,
}

impl Employee {
    /// Creates a new employee with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualifications: BTreeSet::new(),
            vacations: BTreeSet::new(),
        }
    }

    /// Sets the employee name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualification.
    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualifications.insert(qualification.into());
        self
    }

    /// Adds several qualifications.
    pub fn with_qualifications<I, S>(mut self, qualifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifications
            .extend(qualifications.into_iter().map(Into::into));
        self
    }

    /// Adds a vacation day (0-based horizon index).
    pub fn with_vacation(mut self, day: u32) -> Self {
        self.vacations.insert(day);
        self
    }

    /// Adds several vacation days.
    pub fn with_vacations<I: IntoIterator<Item = u32>>(mut self, days: I) -> Self {
        self.vacations.extend(days);
        self
    }

    /// Whether this employee holds a given qualification.
    pub fn holds(&self, qualification: &str) -> bool {
        self.qualifications.contains(qualification)
    }

    /// Whether the given day is one of this employee's vacation days.
    pub fn is_on_vacation(&self, day: u32) -> bool {
        self.vacations.contains(&day)
    }
}
