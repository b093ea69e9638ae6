//! MILP formulation of the staffing problem.
//!
//! Builds one constrained optimization model per lexicographic pass,
//! expressed purely as variable domains, linear constraints, and a linear
//! objective over `good_lp`.
//!
//! # Variables
//!
//! - `x[e,d,p,q]` binary — employee `e` works project `p`'s task for
//!   qualification `q` on day `d`. Declared only for eligible tuples:
//!   the employee holds `q`, the project requires `q`, and `d` is not a
//!   vacation day (ineligible combinations are pruned rather than pinned
//!   to zero).
//! - `y[p]` binary — project `p` is realized.
//! - `end[p]`, `late[p]` integer — completion day count and lateness days.
//! - Pass ≥ 2: `z[e,p]` binary — employee `e` touches project `p`.
//! - Pass 3: `first[p]`, `span[p]` integer for long projects — earliest
//!   worked day count and execution-window overshoot.
//!
//! # Constraints
//!
//! - capacity: Σ_{p,q} x[e,d,p,q] ≤ 1 per (employee, day)
//! - demand: Σ x ≤ n[p,q] and n[p,q]·y[p] ≤ Σ x per (project,
//!   qualification) — exact staffing iff realized, partial otherwise
//! - lateness: end − late + H·y ≤ due + H (big-M: unrealized projects
//!   accrue no penalty)
//! - spread: x ≤ z and z ≤ Σ x, both directions, so Σ z counts exactly
//!   the touched (employee, project) pairs
//! - gaps: first ≤ (d+1) + H·(1 − x) and span ≥ end − first + 1 − total

use std::collections::BTreeMap;
use std::time::Duration;

use good_lp::{default_solver, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};

use crate::error::ModelError;
use crate::models::ProblemInstance;

/// Guard band for pinning integral optima across passes; wide enough to
/// absorb float noise, far narrower than the integer grid.
const PIN_EPS: f64 = 1e-6;

/// One of the three lexicographic optimization passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Pass 1: maximize realized gains minus lateness penalties.
    NetResult,
    /// Pass 2: minimize total distinct projects touched per employee.
    ProjectSpread,
    /// Pass 3: minimize execution-gap days of long projects.
    ExecutionGaps,
}

impl Pass {
    /// 1-based pass number, for reporting.
    pub fn number(self) -> u8 {
        match self {
            Pass::NetResult => 1,
            Pass::ProjectSpread => 2,
            Pass::ExecutionGaps => 3,
        }
    }
}

/// Optima of earlier passes, pinned as constraints on later ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinnedValues {
    /// Pass-1 optimum: the net result expression must equal this exactly.
    pub net_result: Option<i64>,
    /// Pass-2 optimum: the spread expression must equal this exactly.
    pub project_spread: Option<i64>,
}

/// An eligible (employee, day, project, qualification) decision tuple.
///
/// Indices refer into the owning [`ProblemInstance`]; `qualification` is
/// an index into its qualification universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignTuple {
    pub employee: usize,
    pub day: u32,
    pub project: usize,
    pub qualification: usize,
}

/// A built, ready-to-solve model for one pass.
pub struct PassModel {
    pass: Pass,
    variables: ProblemVariables,
    constraints: Vec<Constraint>,
    objective: Expression,
    maximize: bool,
    tuples: Vec<AssignTuple>,
    assign: Vec<Variable>,
    realized: Vec<Variable>,
    net_result: Expression,
    project_spread: Option<Expression>,
    execution_gaps: Option<Expression>,
}

/// Variable values and objective readings from one solved pass.
#[derive(Debug, Clone)]
pub struct PassSolution {
    /// The pass this solution belongs to.
    pub pass: Pass,
    /// The tuple universe the model was built over.
    pub tuples: Vec<AssignTuple>,
    /// Indices into `tuples` whose assignment variable is set.
    pub selected: Vec<usize>,
    /// Realized flag per project, in instance order.
    pub realized: Vec<bool>,
    /// Value of the pass-1 objective expression.
    pub net_result: i64,
    /// Value of the pass-2 objective expression, when modeled.
    pub project_spread: Option<i64>,
    /// Value of the pass-3 objective expression, when modeled.
    pub execution_gaps: Option<i64>,
}

/// Builds the MILP model for one pass over a problem instance.
///
/// Tuples are enumerated in ascending (employee, day, project,
/// qualification) index order; together with a deterministic backend this
/// makes repeated solves reproducible.
pub fn build(
    instance: &ProblemInstance,
    pass: Pass,
    pinned: &PinnedValues,
    long_project_threshold: u32,
) -> Result<PassModel, ModelError> {
    if instance.employees().is_empty() {
        return Err(ModelError::NoEmployees);
    }
    if instance.horizon().is_empty() {
        return Err(ModelError::EmptyHorizon);
    }

    let hf = f64::from(instance.horizon().num_days());
    let mut vars = ProblemVariables::new();

    let mut tuples: Vec<AssignTuple> = Vec::new();
    for (e, employee) in instance.employees().iter().enumerate() {
        for d in instance.working_days(e) {
            for p in 0..instance.projects().len() {
                for &(q, _) in instance.project_requirements(p) {
                    if employee.holds(&instance.qualifications()[q]) {
                        tuples.push(AssignTuple {
                            employee: e,
                            day: d,
                            project: p,
                            qualification: q,
                        });
                    }
                }
            }
        }
    }

    let assign: Vec<Variable> = tuples.iter().map(|_| vars.add(variable().binary())).collect();
    let realized: Vec<Variable> = instance
        .projects()
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();
    let completion: Vec<Variable> = instance
        .projects()
        .iter()
        .map(|_| vars.add(variable().integer().min(0.0).max(hf)))
        .collect();
    let lateness: Vec<Variable> = instance
        .projects()
        .iter()
        .map(|_| vars.add(variable().integer().min(0.0).max(hf)))
        .collect();

    let mut by_employee_day: BTreeMap<(usize, u32), Vec<usize>> = BTreeMap::new();
    let mut by_project_qual: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    let mut by_employee_project: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    let mut by_project: Vec<Vec<usize>> = vec![Vec::new(); instance.projects().len()];
    for (i, t) in tuples.iter().enumerate() {
        by_employee_day.entry((t.employee, t.day)).or_default().push(i);
        by_project_qual
            .entry((t.project, t.qualification))
            .or_default()
            .push(i);
        by_employee_project
            .entry((t.employee, t.project))
            .or_default()
            .push(i);
        by_project[t.project].push(i);
    }

    let mut constraints: Vec<Constraint> = Vec::new();

    // Capacity: at most one assignment per employee-day. Vacation days
    // have no tuples at all.
    for idxs in by_employee_day.values() {
        let mut sum = Expression::default();
        for &i in idxs {
            sum.add_mul(1.0, assign[i]);
        }
        constraints.push(sum.leq(1.0));
    }

    // Completion day dominates every worked day: (d+1)·x ≤ end[p].
    for (i, t) in tuples.iter().enumerate() {
        let mut expr = Expression::default();
        expr.add_mul(f64::from(t.day + 1), assign[i]);
        expr.add_mul(-1.0, completion[t.project]);
        constraints.push(expr.leq(0.0));
    }

    // Demand linking: staffing never exceeds the requirement, and equals
    // it whenever the project is realized.
    for (p, project) in instance.projects().iter().enumerate() {
        for &(q, days) in instance.project_requirements(p) {
            let mut sum = Expression::default();
            if let Some(idxs) = by_project_qual.get(&(p, q)) {
                for &i in idxs {
                    sum.add_mul(1.0, assign[i]);
                }
            }
            constraints.push(sum.clone().leq(f64::from(days)));
            constraints.push((f64::from(days) * realized[p] - sum).leq(0.0));
        }

        // Lateness: late ≥ end − due when realized; free to drop to zero
        // otherwise (big-M deactivation over the horizon length).
        let mut expr = Expression::default();
        expr.add_mul(1.0, completion[p]);
        expr.add_mul(-1.0, lateness[p]);
        expr.add_mul(hf, realized[p]);
        constraints.push(expr.leq(f64::from(project.due_date) + hf));
    }

    let mut net_result = Expression::default();
    for (p, project) in instance.projects().iter().enumerate() {
        net_result.add_mul(project.gain as f64, realized[p]);
        net_result.add_mul(-(project.daily_penalty as f64), lateness[p]);
    }

    // Pass ≥ 2: count touched (employee, project) pairs exactly.
    let mut project_spread: Option<Expression> = None;
    if pass != Pass::NetResult {
        let mut spread = Expression::default();
        for idxs in by_employee_project.values() {
            let z = vars.add(variable().binary());
            for &i in idxs {
                let mut link = Expression::default();
                link.add_mul(1.0, assign[i]);
                link.add_mul(-1.0, z);
                constraints.push(link.leq(0.0));
            }
            let mut upper = Expression::default();
            upper.add_mul(1.0, z);
            for &i in idxs {
                upper.add_mul(-1.0, assign[i]);
            }
            constraints.push(upper.leq(0.0));
            spread.add_mul(1.0, z);
        }
        project_spread = Some(spread);
    }

    // Pass 3: execution-window overshoot of long projects.
    let mut execution_gaps: Option<Expression> = None;
    if pass == Pass::ExecutionGaps {
        let mut gaps = Expression::default();
        for (p, project) in instance.projects().iter().enumerate() {
            if !project.is_long(long_project_threshold) {
                continue;
            }
            let first = vars.add(variable().integer().min(1.0).max(hf));
            let span = vars.add(variable().integer().min(0.0).max(hf));
            for &i in &by_project[p] {
                let mut link = Expression::default();
                link.add_mul(1.0, first);
                link.add_mul(hf, assign[i]);
                constraints.push(link.leq(f64::from(tuples[i].day + 1) + hf));
            }
            let mut bound = Expression::default();
            bound.add_mul(1.0, completion[p]);
            bound.add_mul(-1.0, first);
            bound.add_mul(-1.0, span);
            constraints.push(bound.leq(f64::from(project.total_workdays()) - 1.0));
            gaps.add_mul(1.0, span);
        }
        execution_gaps = Some(gaps);
    }

    // Pin earlier optima as exact equalities (two-sided, with a float
    // guard; values are integral). Equality — not a bound — so ties on
    // the earlier criterion are preserved, never broken in its favor.
    if let Some(v1) = pinned.net_result {
        constraints.push(net_result.clone().geq(v1 as f64 - PIN_EPS));
        constraints.push(net_result.clone().leq(v1 as f64 + PIN_EPS));
    }
    if let (Some(v2), Some(spread)) = (pinned.project_spread, &project_spread) {
        constraints.push(spread.clone().geq(v2 as f64 - PIN_EPS));
        constraints.push(spread.clone().leq(v2 as f64 + PIN_EPS));
    }

    let (objective, maximize) = match pass {
        Pass::NetResult => (net_result.clone(), true),
        Pass::ProjectSpread => (project_spread.clone().unwrap_or_default(), false),
        Pass::ExecutionGaps => (execution_gaps.clone().unwrap_or_default(), false),
    };

    Ok(PassModel {
        pass,
        variables: vars,
        constraints,
        objective,
        maximize,
        tuples,
        assign,
        realized,
        net_result,
        project_spread,
        execution_gaps,
    })
}

impl PassModel {
    /// The pass this model was built for.
    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Number of assignment tuples (binary `x` variables).
    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }

    /// Number of linear constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Hands the model to the MILP backend and decodes variable values.
    ///
    /// A single blocking operation; the backend may parallelize its
    /// branch-and-bound search internally. `mip_gap` and `time_budget`
    /// are forwarded only when the backend supports them (CBC: the
    /// `ratio` and `seconds` parameters). A backend that hits its time
    /// budget returns the best incumbent found so far.
    pub fn solve(
        self,
        mip_gap: Option<f64>,
        time_budget: Option<Duration>,
    ) -> Result<PassSolution, ResolutionError> {
        let PassModel {
            pass,
            variables,
            constraints,
            objective,
            maximize,
            tuples,
            assign,
            realized,
            net_result,
            project_spread,
            execution_gaps,
        } = self;

        let mut problem = if maximize {
            variables.maximise(objective).using(default_solver)
        } else {
            variables.minimise(objective).using(default_solver)
        };
        #[cfg(feature = "coin_cbc")]
        {
            if let Some(gap) = mip_gap {
                problem.set_parameter("ratio", &gap.to_string());
            }
            if let Some(budget) = time_budget {
                problem.set_parameter("seconds", &format!("{:.3}", budget.as_secs_f64()));
            }
        }
        #[cfg(not(feature = "coin_cbc"))]
        let _ = (mip_gap, time_budget);

        for c in constraints {
            problem = problem.with(c);
        }

        let solution = problem.solve()?;

        let selected: Vec<usize> = assign
            .iter()
            .enumerate()
            .filter(|(_, v)| solution.value(**v) > 0.5)
            .map(|(i, _)| i)
            .collect();
        let realized: Vec<bool> = realized.iter().map(|v| solution.value(*v) > 0.5).collect();
        let net_result = solution.eval(net_result).round() as i64;
        let project_spread = project_spread.map(|e| solution.eval(e).round() as i64);
        let execution_gaps = execution_gaps.map(|e| solution.eval(e).round() as i64);

        Ok(PassSolution {
            pass,
            tuples,
            selected,
            realized,
            net_result,
            project_spread,
            execution_gaps,
        })
    }
}
