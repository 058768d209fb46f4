//! Job registry and the fluent configuration handle.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::cadence::Cadence;
use crate::error::{Result, SchedulerError};
use crate::job::{Action, Guard, Job, Overlap};

/// Canonical lowercase hyphenated form of a job label.
///
/// Any non-alphanumeric run becomes a single hyphen; leading and trailing
/// hyphens are dropped.
pub fn normalize_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            label.extend(c.to_lowercase());
        } else if !label.ends_with('-') {
            label.push('-');
        }
    }
    label.trim_matches('-').to_string()
}

/// The set of jobs for one tick's lifetime.
///
/// Iteration order is registration order; labels are unique after
/// normalization. The registry is rebuilt from scratch on every invocation
/// of the host program and never persisted.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
    index: HashMap<String, usize>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job under `label`, normalized. Fails with
    /// [`SchedulerError::LabelExists`] on a duplicate; the registry is
    /// unchanged in that case.
    pub fn register(&mut self, label: &str, action: Action) -> Result<&mut Job> {
        let label = normalize_label(label);
        if self.index.contains_key(&label) {
            return Err(SchedulerError::LabelExists(label));
        }
        debug!("registered job '{}' ({})", label, action.kind());
        let slot = self.jobs.len();
        self.index.insert(label.clone(), slot);
        self.jobs.push(Job::new(label, action));
        Ok(&mut self.jobs[slot])
    }

    /// Look up a job by label.
    pub fn get(&self, label: &str) -> Result<&Job> {
        let label = normalize_label(label);
        self.index
            .get(&label)
            .map(|&i| &self.jobs[i])
            .ok_or(SchedulerError::LabelNotFound(label))
    }

    /// All jobs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Fluent handle bound to one registered job.
///
/// Returned by the scheduler's registration operations; every modifier
/// targets exactly the job it was created for, no matter what is registered
/// in between.
#[derive(Debug)]
pub struct JobBuilder<'a> {
    job: &'a mut Job,
}

impl<'a> JobBuilder<'a> {
    pub(crate) fn new(job: &'a mut Job) -> Self {
        Self { job }
    }

    /// Normalized label of the job being configured.
    pub fn label(&self) -> &str {
        &self.job.label
    }

    // --- schedule ----------------------------------------------------------

    /// Set the schedule from a raw five-field cron expression.
    pub fn cron(self, expr: impl Into<String>) -> Self {
        self.schedule(Cadence::raw(expr))
    }

    /// Set any pre-built [`Cadence`].
    pub fn schedule(self, cadence: Cadence) -> Self {
        self.job.schedule = cadence;
        self
    }

    /// Run every `n` minutes (clamped to a minimum of 1).
    pub fn every_n_minutes(self, n: u32) -> Self {
        self.schedule(Cadence::every_n_minutes(n))
    }

    /// Run every hour at the given minute.
    pub fn hourly_at(self, minute: u32) -> Result<Self> {
        Ok(self.schedule(Cadence::hourly_at(minute)?))
    }

    /// Run every `n` hours, on the hour (clamped to a minimum of 1).
    pub fn every_n_hours(self, n: u32) -> Self {
        self.schedule(Cadence::every_n_hours(n))
    }

    /// Run every day at the given `HH:MM` time.
    pub fn daily(self, time: &str) -> Result<Self> {
        Ok(self.schedule(Cadence::daily(time)?))
    }

    /// Run every week on the given weekday (0 = Sunday) at the given time.
    pub fn weekly_on(self, weekday: u32, time: &str) -> Result<Self> {
        Ok(self.schedule(Cadence::weekly_on(weekday, time)?))
    }

    /// Run every month on the given day at the given time.
    pub fn monthly_on(self, day: u32, time: &str) -> Result<Self> {
        Ok(self.schedule(Cadence::monthly_on(day, time)?))
    }

    /// Run every `n` months, on the first at the given time.
    pub fn every_n_months(self, n: u32, time: &str) -> Result<Self> {
        Ok(self.schedule(Cadence::every_n_months(n, time)?))
    }

    /// Run every year in the given month on the given day at the given time.
    pub fn yearly_on(self, month: u32, day: u32, time: &str) -> Result<Self> {
        Ok(self.schedule(Cadence::yearly_on(month, day, time)?))
    }

    // Weekday conveniences, 0 = Sunday.

    /// Run every Sunday at the given time.
    pub fn sundays(self, time: &str) -> Result<Self> {
        self.weekly_on(0, time)
    }

    /// Run every Monday at the given time.
    pub fn mondays(self, time: &str) -> Result<Self> {
        self.weekly_on(1, time)
    }

    /// Run every Tuesday at the given time.
    pub fn tuesdays(self, time: &str) -> Result<Self> {
        self.weekly_on(2, time)
    }

    /// Run every Wednesday at the given time.
    pub fn wednesdays(self, time: &str) -> Result<Self> {
        self.weekly_on(3, time)
    }

    /// Run every Thursday at the given time.
    pub fn thursdays(self, time: &str) -> Result<Self> {
        self.weekly_on(4, time)
    }

    /// Run every Friday at the given time.
    pub fn fridays(self, time: &str) -> Result<Self> {
        self.weekly_on(5, time)
    }

    /// Run every Saturday at the given time.
    pub fn saturdays(self, time: &str) -> Result<Self> {
        self.weekly_on(6, time)
    }

    // Month conveniences.

    /// Run every January on the given day at the given time.
    pub fn january(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(1, day, time)
    }

    /// Run every February on the given day at the given time.
    pub fn february(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(2, day, time)
    }

    /// Run every March on the given day at the given time.
    pub fn march(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(3, day, time)
    }

    /// Run every April on the given day at the given time.
    pub fn april(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(4, day, time)
    }

    /// Run every May on the given day at the given time.
    pub fn may(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(5, day, time)
    }

    /// Run every June on the given day at the given time.
    pub fn june(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(6, day, time)
    }

    /// Run every July on the given day at the given time.
    pub fn july(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(7, day, time)
    }

    /// Run every August on the given day at the given time.
    pub fn august(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(8, day, time)
    }

    /// Run every September on the given day at the given time.
    pub fn september(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(9, day, time)
    }

    /// Run every October on the given day at the given time.
    pub fn october(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(10, day, time)
    }

    /// Run every November on the given day at the given time.
    pub fn november(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(11, day, time)
    }

    /// Run every December on the given day at the given time.
    pub fn december(self, day: u32, time: &str) -> Result<Self> {
        self.yearly_on(12, day, time)
    }

    // --- modifiers ---------------------------------------------------------

    /// Run even when a previous instance still holds the lock marker.
    pub fn always_run(self) -> Self {
        self.job.overlap = Overlap::AlwaysRun;
        self
    }

    /// Append captured output to `path` instead of the engine default.
    pub fn output_to(self, path: impl Into<PathBuf>) -> Self {
        self.job.output = Some(path.into());
        self
    }

    /// Execute only when `guard` yields true at tick time.
    pub fn only_if<F>(self, guard: F, params: Vec<Value>) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.job.guard = Some(Guard::new(guard, params));
        self
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
