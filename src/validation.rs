//! Input validation for staffing problems.
//!
//! Checks structural integrity of employees and projects before any model
//! is built. Detects:
//! - Duplicate IDs
//! - Qualification requirements held by no employee (such a project can
//!   never be realized, so the instance is rejected up front)
//!
//! Referential validation of raw input files (types, date formats) is the
//! responsibility of the data-loading collaborator; this module enforces
//! only the solvability invariants the optimization core depends on.

use crate::error::ValidationError;
use crate::models::{Employee, Project};
use std::collections::HashSet;

/// Validates employees and projects for a staffing problem.
///
/// Checks, in order:
/// 1. No duplicate employee IDs
/// 2. No duplicate project IDs
/// 3. Every required qualification is held by at least one employee
///
/// Returns the first violation found.
pub fn validate(employees: &[Employee], projects: &[Project]) -> Result<(), ValidationError> {
    let mut employee_ids = HashSet::new();
    for e in employees {
        if !employee_ids.insert(e.id.as_str()) {
            return Err(ValidationError::DuplicateEmployeeId(e.id.clone()));
        }
    }

    let mut project_ids = HashSet::new();
    for p in projects {
        if !project_ids.insert(p.id.as_str()) {
            return Err(ValidationError::DuplicateProjectId(p.id.clone()));
        }
    }

    let held: HashSet<&str> = employees
        .iter()
        .flat_map(|e| e.qualifications.iter().map(String::as_str))
        .collect();

    for p in projects {
        for qualification in p.requirements.keys() {
            if !held.contains(qualification.as_str()) {
                return Err(ValidationError::UnstaffableQualification {
                    project: p.id.clone(),
                    qualification: qualification.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_staff() -> Vec<Employee> {
        vec![
            Employee::new("E1").with_qualifications(["web", "design"]),
            Employee::new("E2").with_qualification("optimization"),
        ]
    }

    #[test]
    fn test_valid_input() {
        let projects = vec![
            Project::new("P1").with_requirement("web", 2),
            Project::new("P2")
                .with_requirement("design", 1)
                .with_requirement("optimization", 3),
        ];
        assert!(validate(&sample_staff(), &projects).is_ok());
    }

    #[test]
    fn test_duplicate_employee_id() {
        let staff = vec![Employee::new("E1"), Employee::new("E1")];
        let err = validate(&staff, &[]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateEmployeeId("E1".into()));
    }

    #[test]
    fn test_duplicate_project_id() {
        let projects = vec![Project::new("P1"), Project::new("P1")];
        let err = validate(&sample_staff(), &projects).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateProjectId("P1".into()));
    }

    #[test]
    fn test_unstaffable_qualification() {
        let projects = vec![Project::new("P1").with_requirement("welding", 1)];
        let err = validate(&sample_staff(), &projects).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnstaffableQualification {
                project: "P1".into(),
                qualification: "welding".into(),
            }
        );
    }

    #[test]
    fn test_no_projects_is_valid() {
        assert!(validate(&sample_staff(), &[]).is_ok());
    }

    #[test]
    fn test_empty_staff_with_no_requirements_is_valid() {
        // Degenerate but structurally sound; rejected later as a ModelError.
        assert!(validate(&[], &[]).is_ok());
    }
}
