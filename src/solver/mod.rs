//! Lexicographic three-pass solver.
//!
//! Optimizes staffing in strict priority order:
//!
//! 1. **Net result** — maximize realized gains minus lateness penalties.
//! 2. **Project spread** — among net-optimal schedules, minimize the total
//!    number of distinct projects each employee touches.
//! 3. **Execution gaps** — among those, minimize idle days inside long
//!    projects' execution windows.
//!
//! Each pass re-solves the full model with every earlier optimum pinned as
//! an exact equality, so a later criterion can never degrade an earlier
//! one. Passes run as blocking solves; the remaining time budget is
//! forwarded to each pass's backend where supported, and deadlines and
//! cancellation are additionally honored cooperatively between passes,
//! returning the best incumbent found so far.
//!
//! ```no_run
//! use staffplan::models::{Employee, Horizon, ProblemInstance, Project};
//! use staffplan::solver::LexicographicSolver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let staff = vec![Employee::new("E1").with_qualification("web")];
//! let projects = vec![Project::new("P1")
//!     .with_gain(10)
//!     .with_due_date(5)
//!     .with_requirement("web", 2)];
//! let instance = ProblemInstance::new(staff, projects, Horizon::new(5))?;
//!
//! let outcome = LexicographicSolver::new().solve(&instance)?;
//! if let Some(schedule) = &outcome.schedule {
//!     println!("{} assignments", schedule.assignment_count());
//! }
//! # Ok(())
//! # }
//! ```

mod extract;
mod metrics;

pub use extract::extract;
pub use metrics::ScheduleMetrics;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use good_lp::ResolutionError;
use tracing::{debug, info, warn};

use crate::error::SolveError;
use crate::milp::{self, Pass, PassSolution, PinnedValues};
use crate::models::{ProblemInstance, StaffingSchedule};

/// Tuning knobs for a solve run.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Projects needing strictly more total work-days than this are
    /// "long" and participate in pass-3 gap minimization.
    pub long_project_threshold: u32,
    /// Wall-clock budget for the whole run. The remaining budget is
    /// forwarded to the backend for each pass where supported (CBC), so
    /// a single pass cannot overrun it; the pure-Rust backend cannot be
    /// interrupted mid-solve, and with it the limit binds between
    /// passes only.
    pub time_limit: Option<Duration>,
    /// Relative MIP gap forwarded to the backend, where supported.
    pub mip_gap: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            long_project_threshold: 3,
            time_limit: None,
            mip_gap: None,
        }
    }
}

impl SolverConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the long-project threshold (total work-days, exclusive).
    pub fn with_long_project_threshold(mut self, threshold: u32) -> Self {
        self.long_project_threshold = threshold;
        self
    }

    /// Sets the soft wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the relative MIP gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }
}

/// Shared flag for cooperatively cancelling a solve from another thread.
///
/// Clones observe the same flag. Checked before each pass; the pass in
/// flight when `cancel` is called still runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// How a solve run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// All three passes completed within the time limit; the schedule is
    /// lexicographically optimal.
    Optimal,
    /// The time limit expired before all passes completed and proved
    /// optimality. The schedule is the best incumbent found; it must be
    /// treated as provisional, never as proven optimal.
    OptimalWithinTimeLimit,
    /// No feasible staffing exists.
    Infeasible,
    /// Cancelled before completion. A schedule is present if at least one
    /// pass finished first.
    Cancelled,
}

/// Result of a solve run.
///
/// `schedule` and `metrics` are present for every status except
/// [`SolveStatus::Infeasible`] and a cancellation before the first pass.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Terminal status of the run.
    pub status: SolveStatus,
    /// The best schedule found, if any.
    pub schedule: Option<StaffingSchedule>,
    /// Quality figures for `schedule`.
    pub metrics: Option<ScheduleMetrics>,
    /// Number of passes that ran to completion (0..=3).
    pub passes_completed: u8,
}

/// Three-pass lexicographic MILP solver.
#[derive(Debug, Clone, Default)]
pub struct LexicographicSolver {
    config: SolverConfig,
}

/// Budget left until the deadline, floored at zero.
fn remaining(deadline: Option<Instant>) -> Option<Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()))
}

impl LexicographicSolver {
    /// Creates a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves an instance to lexicographic optimality.
    pub fn solve(&self, instance: &ProblemInstance) -> Result<SolveOutcome, SolveError> {
        self.solve_with_cancel(instance, &CancelToken::new())
    }

    /// Solves an instance, honoring an external cancellation token.
    pub fn solve_with_cancel(
        &self,
        instance: &ProblemInstance,
        cancel: &CancelToken,
    ) -> Result<SolveOutcome, SolveError> {
        let threshold = self.config.long_project_threshold;
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);

        let finish = |status: SolveStatus,
                      incumbent: &PassSolution,
                      passes_completed: u8|
         -> Result<SolveOutcome, SolveError> {
            let schedule = extract(instance, incumbent)?;
            let metrics = ScheduleMetrics::calculate(instance, &schedule, threshold);
            Ok(SolveOutcome {
                status,
                schedule: Some(schedule),
                metrics: Some(metrics),
                passes_completed,
            })
        };

        if cancel.is_cancelled() {
            return Ok(SolveOutcome {
                status: SolveStatus::Cancelled,
                schedule: None,
                metrics: None,
                passes_completed: 0,
            });
        }

        info!(
            employees = instance.employees().len(),
            projects = instance.projects().len(),
            days = instance.horizon().num_days(),
            "starting lexicographic solve"
        );

        // Pass 1: net result.
        let model = milp::build(instance, Pass::NetResult, &PinnedValues::default(), threshold)?;
        debug!(
            tuples = model.tuple_count(),
            constraints = model.constraint_count(),
            "pass 1 model built"
        );
        let mut incumbent = match model.solve(self.config.mip_gap, remaining(deadline)) {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                info!("no feasible staffing exists");
                return Ok(SolveOutcome {
                    status: SolveStatus::Infeasible,
                    schedule: None,
                    metrics: None,
                    passes_completed: 0,
                });
            }
            Err(e) => return Err(SolveError::Backend(e.to_string())),
        };
        info!(net_result = incumbent.net_result, "pass 1 complete");

        if cancel.is_cancelled() {
            return finish(SolveStatus::Cancelled, &incumbent, 1);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("time limit reached after pass 1, returning net-optimal schedule");
            return finish(SolveStatus::OptimalWithinTimeLimit, &incumbent, 1);
        }

        // Pass 2: project spread, with the net result pinned.
        let pinned = PinnedValues {
            net_result: Some(incumbent.net_result),
            project_spread: None,
        };
        let model = milp::build(instance, Pass::ProjectSpread, &pinned, threshold)?;
        debug!(
            tuples = model.tuple_count(),
            constraints = model.constraint_count(),
            "pass 2 model built"
        );
        incumbent = model
            .solve(self.config.mip_gap, remaining(deadline))
            .map_err(|e| SolveError::InternalInconsistency {
                pass: 2,
                reason: e.to_string(),
            })?;
        info!(
            project_spread = incumbent.project_spread.unwrap_or_default(),
            "pass 2 complete"
        );

        if cancel.is_cancelled() {
            return finish(SolveStatus::Cancelled, &incumbent, 2);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("time limit reached after pass 2, returning spread-optimal schedule");
            return finish(SolveStatus::OptimalWithinTimeLimit, &incumbent, 2);
        }

        // Pass 3: execution gaps, with both earlier optima pinned.
        let project_spread =
            incumbent
                .project_spread
                .ok_or_else(|| SolveError::InternalInconsistency {
                    pass: 3,
                    reason: "pass 2 produced no spread value".into(),
                })?;
        let pinned = PinnedValues {
            net_result: Some(incumbent.net_result),
            project_spread: Some(project_spread),
        };
        let model = milp::build(instance, Pass::ExecutionGaps, &pinned, threshold)?;
        debug!(
            tuples = model.tuple_count(),
            constraints = model.constraint_count(),
            "pass 3 model built"
        );
        incumbent = model
            .solve(self.config.mip_gap, remaining(deadline))
            .map_err(|e| SolveError::InternalInconsistency {
                pass: 3,
                reason: e.to_string(),
            })?;
        info!(
            execution_gaps = incumbent.execution_gaps.unwrap_or_default(),
            "pass 3 complete"
        );

        // A pass that ran into the deadline may have been truncated by the
        // backend, so its result is not proven optimal.
        let status = if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("time limit reached during pass 3, optimality not proven");
            SolveStatus::OptimalWithinTimeLimit
        } else {
            SolveStatus::Optimal
        };
        finish(status, &incumbent, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Horizon, Project};

    fn solve(staff: Vec<Employee>, projects: Vec<Project>, days: u32) -> SolveOutcome {
        let instance = ProblemInstance::new(staff, projects, Horizon::new(days)).unwrap();
        LexicographicSolver::new().solve(&instance).unwrap()
    }

    #[test]
    fn test_simple_project_is_realized() {
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1")
                .with_gain(10)
                .with_due_date(4)
                .with_requirement("web", 2)],
            4,
        );
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.passes_completed, 3);
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.realized_projects, vec!["P1"]);
        assert_eq!(metrics.net_result, 10);
        assert_eq!(outcome.schedule.unwrap().assignment_count(), 2);
    }

    #[test]
    fn test_unprofitable_project_is_forfeited() {
        // Realizing would force 2 late days at penalty 5, outweighing the
        // gain of 2; the optimum forfeits the project entirely.
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1")
                .with_gain(2)
                .with_due_date(1)
                .with_daily_penalty(5)
                .with_requirement("web", 3)],
            5,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.net_result, 0);
        assert_eq!(metrics.unrealized_projects, vec!["P1"]);
        assert!(outcome.schedule.unwrap().is_empty());
    }

    #[test]
    fn test_profitable_lateness_is_accepted() {
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1")
                .with_gain(100)
                .with_due_date(1)
                .with_daily_penalty(1)
                .with_requirement("web", 3)],
            3,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.total_gain, 100);
        assert_eq!(metrics.total_penalty, 2); // completes day 3, due day 1
        assert_eq!(metrics.net_result, 98);
    }

    #[test]
    fn test_capacity_conflict_prefers_higher_gain() {
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web")],
            vec![
                Project::new("P1")
                    .with_gain(5)
                    .with_due_date(1)
                    .with_requirement("web", 1),
                Project::new("P2")
                    .with_gain(9)
                    .with_due_date(1)
                    .with_requirement("web", 1),
            ],
            1,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.realized_projects, vec!["P2"]);
        assert_eq!(metrics.net_result, 9);
        let schedule = outcome.schedule.unwrap();
        assert_eq!(schedule.assignment_for("E1", 0).unwrap().project, "P2");
    }

    #[test]
    fn test_vacations_block_realization() {
        // Only one working day remains, so the 2-day project cannot be
        // realized and its gain is forfeited.
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web").with_vacation(0)],
            vec![Project::new("P1")
                .with_gain(10)
                .with_due_date(2)
                .with_requirement("web", 2)],
            2,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.net_result, 0);
        assert!(outcome.schedule.unwrap().is_empty());
    }

    #[test]
    fn test_spread_pass_dedicates_employees() {
        // Both split plans and dedicated plans reach net 20; pass 2 must
        // pick a dedicated one (each employee on a single project).
        let outcome = solve(
            vec![
                Employee::new("E1").with_qualification("web"),
                Employee::new("E2").with_qualification("web"),
            ],
            vec![
                Project::new("P1")
                    .with_gain(10)
                    .with_due_date(2)
                    .with_requirement("web", 2),
                Project::new("P2")
                    .with_gain(10)
                    .with_due_date(2)
                    .with_requirement("web", 2),
            ],
            2,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.net_result, 20);
        assert_eq!(metrics.project_spread, 2);
        let schedule = outcome.schedule.unwrap();
        assert_eq!(schedule.distinct_projects_of("E1").len(), 1);
        assert_eq!(schedule.distinct_projects_of("E2").len(), 1);
    }

    #[test]
    fn test_gap_pass_compacts_long_projects() {
        // The urgent one-day project claims day 0; the long project's four
        // days must then be scheduled without internal idle days.
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web")],
            vec![
                Project::new("LONG")
                    .with_gain(100)
                    .with_due_date(6)
                    .with_daily_penalty(1)
                    .with_requirement("web", 4),
                Project::new("RUSH")
                    .with_gain(50)
                    .with_due_date(1)
                    .with_daily_penalty(100)
                    .with_requirement("web", 1),
            ],
            6,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.net_result, 150);
        assert_eq!(metrics.execution_gap_days, 0);
        let schedule = outcome.schedule.unwrap();
        assert_eq!(schedule.assignment_for("E1", 0).unwrap().project, "RUSH");
        assert_eq!(schedule.gap_days("LONG"), 0);
    }

    #[test]
    fn test_two_qualification_project_realized_by_one_employee() {
        let outcome = solve(
            vec![Employee::new("E1").with_qualifications(["web", "design"])],
            vec![Project::new("P1")
                .with_gain(20)
                .with_due_date(10)
                .with_requirement("web", 2)
                .with_requirement("design", 2)],
            4,
        );
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.realized_projects, vec!["P1"]);
        assert_eq!(metrics.net_result, 20);
        assert_eq!(metrics.total_penalty, 0);
        assert_eq!(outcome.schedule.unwrap().assignment_count(), 4);
    }

    #[test]
    fn test_later_passes_preserve_net_result() {
        let build = || {
            ProblemInstance::new(
                vec![
                    Employee::new("E1").with_qualification("web"),
                    Employee::new("E2").with_qualification("web"),
                ],
                vec![
                    Project::new("P1")
                        .with_gain(100)
                        .with_due_date(1)
                        .with_daily_penalty(7)
                        .with_requirement("web", 3),
                    Project::new("P2")
                        .with_gain(40)
                        .with_due_date(4)
                        .with_requirement("web", 2),
                ],
                Horizon::new(4),
            )
            .unwrap()
        };
        // Net result after pass 1 only (zero time budget) must survive
        // passes 2 and 3 unchanged.
        let pass1_only =
            LexicographicSolver::with_config(SolverConfig::new().with_time_limit(Duration::ZERO))
                .solve(&build())
                .unwrap();
        let full = LexicographicSolver::new().solve(&build()).unwrap();
        assert_eq!(pass1_only.passes_completed, 1);
        assert_eq!(full.passes_completed, 3);
        assert_eq!(
            pass1_only.metrics.unwrap().net_result,
            full.metrics.unwrap().net_result
        );
    }

    #[test]
    fn test_long_project_compacts_around_vacation() {
        // Days 0..=6 with day 2 off: the only gap-free placement of four
        // work-days is the run 3..=6, and pass 3 must find it.
        let outcome = solve(
            vec![Employee::new("E1").with_qualification("web").with_vacation(2)],
            vec![Project::new("LONG")
                .with_gain(100)
                .with_due_date(7)
                .with_requirement("web", 4)],
            7,
        );
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.realized_projects, vec!["LONG"]);
        assert_eq!(metrics.execution_gap_days, 0);
        let schedule = outcome.schedule.unwrap();
        assert_eq!(
            schedule.worked_days_of("LONG").into_iter().collect::<Vec<_>>(),
            vec![3, 4, 5, 6]
        );
    }

    #[test]
    fn test_repeated_solves_are_deterministic() {
        let build = || {
            ProblemInstance::new(
                vec![
                    Employee::new("E1").with_qualifications(["web", "design"]),
                    Employee::new("E2").with_qualification("web"),
                ],
                vec![
                    Project::new("P1")
                        .with_gain(10)
                        .with_due_date(3)
                        .with_requirement("web", 2),
                    Project::new("P2")
                        .with_gain(8)
                        .with_due_date(3)
                        .with_requirement("design", 1),
                ],
                Horizon::new(3),
            )
            .unwrap()
        };
        let solver = LexicographicSolver::new();
        let a = solver.solve(&build()).unwrap().schedule.unwrap();
        let b = solver.solve(&build()).unwrap().schedule.unwrap();
        assert_eq!(a.assignments, b.assignments);
    }

    #[test]
    fn test_zero_time_limit_returns_pass1_incumbent() {
        let instance = ProblemInstance::new(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1")
                .with_gain(10)
                .with_due_date(4)
                .with_requirement("web", 2)],
            Horizon::new(4),
        )
        .unwrap();
        let solver =
            LexicographicSolver::with_config(SolverConfig::new().with_time_limit(Duration::ZERO));
        let outcome = solver.solve(&instance).unwrap();
        assert_eq!(outcome.status, SolveStatus::OptimalWithinTimeLimit);
        assert_eq!(outcome.passes_completed, 1);
        assert_eq!(outcome.metrics.unwrap().net_result, 10);
        assert!(outcome.schedule.is_some());
    }

    #[test]
    fn test_generous_time_limit_completes_all_passes() {
        let instance = ProblemInstance::new(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1")
                .with_gain(10)
                .with_due_date(4)
                .with_requirement("web", 2)],
            Horizon::new(4),
        )
        .unwrap();
        let solver = LexicographicSolver::with_config(
            SolverConfig::new().with_time_limit(Duration::from_secs(600)),
        );
        let outcome = solver.solve(&instance).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.passes_completed, 3);
    }

    #[test]
    fn test_cancel_before_solve() {
        let instance = ProblemInstance::new(
            vec![Employee::new("E1").with_qualification("web")],
            vec![Project::new("P1").with_gain(10).with_requirement("web", 1)],
            Horizon::new(2),
        )
        .unwrap();
        let token = CancelToken::new();
        token.cancel();
        let outcome = LexicographicSolver::new()
            .solve_with_cancel(&instance, &token)
            .unwrap();
        assert_eq!(outcome.status, SolveStatus::Cancelled);
        assert_eq!(outcome.passes_completed, 0);
        assert!(outcome.schedule.is_none());
    }

    #[test]
    fn test_no_employees_is_a_model_error() {
        let instance = ProblemInstance::new(vec![], vec![], Horizon::new(4)).unwrap();
        let err = LexicographicSolver::new().solve(&instance).unwrap_err();
        assert!(matches!(err, SolveError::Model(_)));
    }
}
