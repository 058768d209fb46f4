//! Recurrence expressions.
//!
//! A [`Cadence`] is a normalized five-field cron expression
//! (`minute hour day-of-month month weekday`, weekday 0 = Sunday) plus the
//! builder operations that derive one from a scheduling intent. Matching is
//! delegated to the `cron` crate; [`Cadence::matcher`] owns the translation
//! into that crate's dialect (leading seconds field, weekdays numbered from
//! 1 = Sunday).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use cron::Schedule;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Normalized five-field recurrence expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cadence(String);

impl Cadence {
    /// Accept a caller-supplied five-field expression verbatim.
    ///
    /// No structural validation happens here; a malformed expression
    /// surfaces as [`SchedulerError::Expression`] the first time it is
    /// evaluated.
    pub fn raw(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// Every minute (`* * * * *`). The default schedule for new jobs.
    pub fn every_minute() -> Self {
        Self("* * * * *".to_string())
    }

    /// Every `n` minutes. `n` is clamped to a minimum of 1.
    pub fn every_n_minutes(n: u32) -> Self {
        Self(format!("*/{} * * * *", n.max(1)))
    }

    /// Every hour at the given minute.
    pub fn hourly_at(minute: u32) -> Result<Self> {
        let minute = check_field("minute", minute, 0, 59)?;
        Ok(Self(format!("{minute} * * * *")))
    }

    /// Every `n` hours, on the hour. `n` is clamped to a minimum of 1.
    pub fn every_n_hours(n: u32) -> Self {
        Self(format!("0 */{} * * *", n.max(1)))
    }

    /// Every day at the given `HH:MM` time.
    pub fn daily(time: &str) -> Result<Self> {
        let (hour, minute) = parse_time_of_day(time)?;
        Ok(Self(format!("{minute} {hour} * * *")))
    }

    /// Every week on the given weekday (0 = Sunday) at the given time.
    pub fn weekly_on(weekday: u32, time: &str) -> Result<Self> {
        let weekday = check_field("weekday", weekday, 0, 6)?;
        let (hour, minute) = parse_time_of_day(time)?;
        Ok(Self(format!("{minute} {hour} * * {weekday}")))
    }

    /// Every month on the given day at the given time.
    pub fn monthly_on(day: u32, time: &str) -> Result<Self> {
        let day = check_field("day-of-month", day, 1, 31)?;
        let (hour, minute) = parse_time_of_day(time)?;
        Ok(Self(format!("{minute} {hour} {day} * *")))
    }

    /// Every `n` months, on the first of the month at the given time.
    /// `n` is clamped to a minimum of 1.
    pub fn every_n_months(n: u32, time: &str) -> Result<Self> {
        let (hour, minute) = parse_time_of_day(time)?;
        Ok(Self(format!("{minute} {hour} 1 */{} *", n.max(1))))
    }

    /// Every year in the given month on the given day at the given time.
    pub fn yearly_on(month: u32, day: u32, time: &str) -> Result<Self> {
        let month = check_field("month", month, 1, 12)?;
        let day = check_field("day-of-month", day, 1, 31)?;
        let (hour, minute) = parse_time_of_day(time)?;
        Ok(Self(format!("{minute} {hour} {day} {month} *")))
    }

    /// The normalized five-field expression string.
    pub fn expression(&self) -> &str {
        &self.0
    }

    /// Whether this cadence matches the minute containing `at`.
    pub fn is_due(&self, at: DateTime<Utc>) -> Result<bool> {
        // Match at minute granularity: a tick fired at HH:MM:SS still
        // belongs to the HH:MM window.
        let at = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        Ok(self.matcher()?.includes(at))
    }

    /// The first occurrence strictly after `at`, if any.
    pub fn next_after(&self, at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        Ok(self.matcher()?.after(&at).next())
    }

    /// The last occurrence strictly before `at`, if any.
    pub fn prev_before(&self, at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        Ok(self.matcher()?.after(&at).next_back())
    }

    /// Parse the expression in the `cron` crate's dialect.
    fn matcher(&self) -> Result<Schedule> {
        Schedule::from_str(&self.matcher_expression()).map_err(|e| SchedulerError::Expression {
            expr: self.0.clone(),
            source: e,
        })
    }

    /// Translate the normalized form for the `cron` crate: prepend the
    /// seconds field and renumber a purely numeric weekday (the crate counts
    /// 1-7 from Sunday, the normalized form 0-6).
    fn matcher_expression(&self) -> String {
        let fields: Vec<&str> = self.0.split_whitespace().collect();
        match fields.as_slice() {
            [minute, hour, dom, month, dow] => {
                let dow = match dow.parse::<u32>() {
                    Ok(n) => ((n % 7) + 1).to_string(),
                    Err(_) => (*dow).to_string(),
                };
                format!("0 {minute} {hour} {dom} {month} {dow}")
            }
            _ => format!("0 {}", self.0.trim()),
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::every_minute()
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a numeric field value against its inclusive bounds.
pub(crate) fn check_field(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32> {
    if value < min || value > max {
        return Err(SchedulerError::FieldOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Parse an `HH:MM` time of day into `(hour, minute)`.
pub(crate) fn parse_time_of_day(raw: &str) -> Result<(u32, u32)> {
    let (hour, minute) = raw
        .split_once(':')
        .ok_or_else(|| SchedulerError::MalformedTime(raw.to_string()))?;
    let hour = check_field("hour", parse_component(hour, raw)?, 0, 23)?;
    let minute = check_field("minute", parse_component(minute, raw)?, 0, 59)?;
    Ok((hour, minute))
}

/// Parse one `HH`/`MM` component, tolerating leading zeros (`"09"` is 9,
/// `"00"` is 0).
fn parse_component(component: &str, raw: &str) -> Result<u32> {
    let stripped = component.trim().trim_start_matches('0');
    let digits = if stripped.is_empty() { "0" } else { stripped };
    digits
        .parse()
        .map_err(|_| SchedulerError::MalformedTime(raw.to_string()))
}

#[cfg(test)]
#[path = "cadence_tests.rs"]
mod tests;
