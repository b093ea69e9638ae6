//! Project (job) model.
//!
//! A project maps each required qualification to a number of work-days.
//! All required work-days must be staffed by employees holding that
//! qualification — not necessarily the same person across days. A fully
//! staffed project is *realized* and credits its gain; a realized project
//! finishing after its due date pays a daily lateness penalty.
//!
//! # Day Convention
//!
//! Horizon days are 0-based indices, but due dates and completion days are
//! 1-based day counts: a project whose last work happens on day index `d`
//! completes on day `d + 1`, and is late by `max(0, d + 1 − due_date)` days.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A project competing for staff over the planning horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Profit credited if the project is realized.
    pub gain: i64,
    /// Due day count (1-based). Completion on or before this day is on time.
    pub due_date: u32,
    /// Penalty paid per day of lateness, realized projects only.
    pub daily_penalty: i64,
    /// Required work-days per qualification.
    pub requirements: BTreeMap<String, u32>,
}

impl Project {
    /// Creates a new project with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            gain: 0,
            due_date: 0,
            daily_penalty: 0,
            requirements: BTreeMap::new(),
        }
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the gain credited when the project is realized.
    pub fn with_gain(mut self, gain: i64) -> Self {
        self.gain = gain;
        self
    }

    /// Sets the due day count (1-based).
    pub fn with_due_date(mut self, due_date: u32) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the per-day lateness penalty.
    pub fn with_daily_penalty(mut self, daily_penalty: i64) -> Self {
        self.daily_penalty = daily_penalty;
        self
    }

    /// Adds a qualification requirement (work-days needed).
    pub fn with_requirement(mut self, qualification: impl Into<String>, days: u32) -> Self {
        self.requirements.insert(qualification.into(), days);
        self
    }

    /// Work-days required for a qualification (0 if not required).
    pub fn requirement(&self, qualification: &str) -> u32 {
        self.requirements.get(qualification).copied().unwrap_or(0)
    }

    /// Whether this project requires a given qualification.
    pub fn requires(&self, qualification: &str) -> bool {
        self.requirements.contains_key(qualification)
    }

    /// Total required work-days across all qualifications.
    pub fn total_workdays(&self) -> u32 {
        self.requirements.values().sum()
    }

    /// Whether this project counts as long-running for the gap criterion.
    pub fn is_long(&self, threshold: u32) -> bool {
        self.total_workdays() > threshold
    }

    /// Days of lateness for a given completion day count (floored at zero).
    pub fn lateness_days(&self, completion_day: u32) -> u32 {
        completion_day.saturating_sub(self.due_date)
    }

    /// Lateness penalty for a given completion day count.
    pub fn penalty_for(&self, completion_day: u32) -> i64 {
        i64::from(self.lateness_days(completion_day)) * self.daily_penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_builder() {
        let p = Project::new("P1")
            .with_name("Website relaunch")
            .with_gain(50)
            .with_due_date(10)
            .with_daily_penalty(3)
            .with_requirement("web", 4)
            .with_requirement("design", 2);

        assert_eq!(p.id, "P1");
        assert_eq!(p.gain, 50);
        assert_eq!(p.requirement("web"), 4);
        assert_eq!(p.requirement("ops"), 0);
        assert!(p.requires("design"));
        assert!(!p.requires("ops"));
        assert_eq!(p.total_workdays(), 6);
    }

    #[test]
    fn test_long_project_threshold() {
        let p = Project::new("P1").with_requirement("web", 3);
        assert!(!p.is_long(3)); // exactly at threshold is not long
        assert!(p.is_long(2));
    }

    #[test]
    fn test_lateness() {
        let p = Project::new("P1").with_due_date(5).with_daily_penalty(4);
        assert_eq!(p.lateness_days(5), 0); // on time
        assert_eq!(p.lateness_days(3), 0); // early
        assert_eq!(p.lateness_days(8), 3);
        assert_eq!(p.penalty_for(8), 12);
        assert_eq!(p.penalty_for(5), 0);
    }
}
