//! Validated problem instance.
//!
//! A [`ProblemInstance`] is a read-only snapshot of employees, projects,
//! and the horizon, built once from collaborator-supplied data and never
//! mutated during solving. Construction validates the inputs and derives
//! the indices the formulation builder queries:
//! - the qualification universe (sorted union of held and required skills)
//! - eligible employees per (project, qualification)
//! - working days per employee, net of vacations

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ValidationError;
use crate::validation;

use super::{Employee, Horizon, Project};

/// Immutable, queryable staffing problem.
///
/// Safely shared across any number of concurrent solves; all queries are
/// read-only.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    employees: Vec<Employee>,
    projects: Vec<Project>,
    horizon: Horizon,
    /// Sorted union of all held and required qualification names.
    qualifications: Vec<String>,
    /// Per project: (qualification index, required work-days), sorted.
    requirements: Vec<Vec<(usize, u32)>>,
    /// (project index, qualification index) → eligible employee indices.
    eligible: BTreeMap<(usize, usize), Vec<usize>>,
}

impl ProblemInstance {
    /// Builds a validated instance.
    ///
    /// Fails with [`ValidationError`] on duplicate IDs or when a project
    /// requires a qualification held by no employee (the project would be
    /// permanently unrealizable).
    pub fn new(
        employees: Vec<Employee>,
        projects: Vec<Project>,
        horizon: Horizon,
    ) -> Result<Self, ValidationError> {
        validation::validate(&employees, &projects)?;

        let universe: BTreeSet<&str> = employees
            .iter()
            .flat_map(|e| e.qualifications.iter().map(String::as_str))
            .chain(
                projects
                    .iter()
                    .flat_map(|p| p.requirements.keys().map(String::as_str)),
            )
            .collect();
        let qualifications: Vec<String> = universe.into_iter().map(String::from).collect();

        let index_of = |name: &str| -> usize {
            // Universe was built from these same names, so the lookup
            // cannot miss.
            qualifications
                .binary_search_by(|q| q.as_str().cmp(name))
                .unwrap_or(usize::MAX)
        };

        let mut requirements = Vec::with_capacity(projects.len());
        let mut eligible: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (p, project) in projects.iter().enumerate() {
            let mut reqs: Vec<(usize, u32)> = project
                .requirements
                .iter()
                .map(|(name, &days)| (index_of(name), days))
                .collect();
            reqs.sort_unstable();

            for &(q, _) in &reqs {
                let holders: Vec<usize> = employees
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.holds(&qualifications[q]))
                    .map(|(idx, _)| idx)
                    .collect();
                eligible.insert((p, q), holders);
            }
            requirements.push(reqs);
        }

        Ok(Self {
            employees,
            projects,
            horizon,
            qualifications,
            requirements,
            eligible,
        })
    }

    /// All employees, in input order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// All projects, in input order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The planning horizon.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Sorted qualification universe.
    pub fn qualifications(&self) -> &[String] {
        &self.qualifications
    }

    /// The employee at a given index.
    pub fn employee(&self, index: usize) -> &Employee {
        &self.employees[index]
    }

    /// The project at a given index.
    pub fn project(&self, index: usize) -> &Project {
        &self.projects[index]
    }

    /// Per-project requirements as (qualification index, work-days) pairs.
    pub fn project_requirements(&self, project: usize) -> &[(usize, u32)] {
        &self.requirements[project]
    }

    /// Employee indices eligible for a (project, qualification) pair.
    pub fn eligible_employees(&self, project: usize, qualification: usize) -> &[usize] {
        self.eligible
            .get(&(project, qualification))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Working day indices for an employee, excluding their vacations.
    pub fn working_days(&self, employee: usize) -> Vec<u32> {
        let e = &self.employees[employee];
        self.horizon.days().filter(|d| !e.is_on_vacation(*d)).collect()
    }
}
