//! Schedule quality metrics.
//!
//! Recomputes every reporting figure from the schedule itself rather than
//! from solver internals, so the numbers stay meaningful for schedules
//! loaded from storage or edited by hand.
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | `net_result` | Realized gains minus lateness penalties |
//! | `project_spread` | Total distinct projects touched, summed over employees |
//! | `execution_gap_days` | Idle days inside long projects' execution windows |
//! | `utilization` | Assigned work-days / available (non-vacation) days |

use serde::Serialize;

use crate::models::{ProblemInstance, StaffingSchedule};

/// Aggregate quality figures for one schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleMetrics {
    /// IDs of projects whose requirements are all exactly staffed.
    pub realized_projects: Vec<String>,
    /// IDs of projects left unstaffed or only partially staffed.
    pub unrealized_projects: Vec<String>,
    /// Sum of gains over realized projects.
    pub total_gain: i64,
    /// Sum of lateness penalties over realized projects.
    pub total_penalty: i64,
    /// `total_gain - total_penalty`.
    pub net_result: i64,
    /// Distinct projects per employee, summed over all employees.
    pub project_spread: u32,
    /// Unstaffed days strictly inside long projects' execution windows.
    ///
    /// Counts distinct calendar days without staffing. The optimizer
    /// minimizes a window-overshoot surrogate (`last − first + 1 − total
    /// work-days`) instead; when several employees work the same project
    /// on the same day this figure can exceed that optimized value.
    pub execution_gap_days: u32,
    /// Total employee-day assignments.
    pub assigned_days: u32,
    /// Total non-vacation employee-days in the horizon.
    pub available_days: u32,
    /// `assigned_days / available_days`, or 0 for an empty horizon.
    pub utilization: f64,
}

impl ScheduleMetrics {
    /// Computes all metrics for a schedule against its problem instance.
    ///
    /// A project counts as realized when every qualification requirement
    /// is staffed for exactly the required number of work-days.
    pub fn calculate(
        instance: &ProblemInstance,
        schedule: &StaffingSchedule,
        long_project_threshold: u32,
    ) -> Self {
        let mut realized_projects = Vec::new();
        let mut unrealized_projects = Vec::new();
        let mut total_gain = 0i64;
        let mut total_penalty = 0i64;
        let mut execution_gap_days = 0u32;

        for project in instance.projects() {
            let realized = project
                .requirements
                .iter()
                .all(|(q, &days)| schedule.staffed_days(&project.id, q) == days);
            if realized {
                total_gain += project.gain;
                if let Some(completion) = schedule.completion_day(&project.id) {
                    total_penalty += project.penalty_for(completion);
                }
                realized_projects.push(project.id.clone());
            } else {
                unrealized_projects.push(project.id.clone());
            }
            if project.is_long(long_project_threshold) {
                execution_gap_days += schedule.gap_days(&project.id);
            }
        }

        let project_spread = instance
            .employees()
            .iter()
            .map(|e| schedule.distinct_projects_of(&e.id).len() as u32)
            .sum();

        let assigned_days = schedule.assignment_count() as u32;
        let available_days: u32 = (0..instance.employees().len())
            .map(|e| instance.working_days(e).len() as u32)
            .sum();
        let utilization = if available_days == 0 {
            0.0
        } else {
            f64::from(assigned_days) / f64::from(available_days)
        };

        Self {
            realized_projects,
            unrealized_projects,
            total_gain,
            total_penalty,
            net_result: total_gain - total_penalty,
            project_spread,
            execution_gap_days,
            assigned_days,
            available_days,
            utilization,
        }
    }
}
