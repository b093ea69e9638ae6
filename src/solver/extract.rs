//! Schedule extraction from solved variable values.
//!
//! Decodes the selected assignment tuples of the final pass into a
//! [`StaffingSchedule`], cross-checking the result against invariants the
//! model is supposed to enforce. The checks guard against backend numerical
//! defects; a violation is an [`ExtractionError`], never silently repaired.

use crate::error::ExtractionError;
use crate::milp::PassSolution;
use crate::models::{DayAssignment, ProblemInstance, StaffingSchedule};
use std::collections::BTreeSet;

/// Decodes a pass solution into a schedule.
///
/// Tuples were enumerated in (employee, day, project, qualification) order
/// when the model was built, so the resulting assignment list is in that
/// order too.
pub fn extract(
    instance: &ProblemInstance,
    solution: &PassSolution,
) -> Result<StaffingSchedule, ExtractionError> {
    let mut schedule = StaffingSchedule::new();
    let mut booked: BTreeSet<(usize, u32)> = BTreeSet::new();

    for &i in &solution.selected {
        let t = solution.tuples[i];
        let employee = instance.employee(t.employee);
        if !booked.insert((t.employee, t.day)) {
            return Err(ExtractionError::DoubleBooking {
                employee: employee.id.clone(),
                day: t.day,
            });
        }
        if employee.is_on_vacation(t.day) {
            return Err(ExtractionError::VacationAssignment {
                employee: employee.id.clone(),
                day: t.day,
            });
        }
        schedule.add_assignment(DayAssignment::new(
            employee.id.clone(),
            t.day,
            instance.project(t.project).id.clone(),
            instance.qualifications()[t.qualification].clone(),
        ));
    }

    for (p, &realized) in solution.realized.iter().enumerate() {
        if !realized {
            continue;
        }
        let project = instance.project(p);
        for &(q, required) in instance.project_requirements(p) {
            let qualification = &instance.qualifications()[q];
            let staffed = schedule.staffed_days(&project.id, qualification);
            if staffed != required {
                return Err(ExtractionError::RealizationMismatch {
                    project: project.id.clone(),
                    qualification: qualification.clone(),
                    staffed,
                    required,
                });
            }
        }
    }

    Ok(schedule)
}
