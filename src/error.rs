//! Scheduler errors.

use std::path::PathBuf;

use thiserror::Error;

/// Scheduler error types.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A numeric schedule component is outside its field's range.
    #[error("{field} value {value} out of range ({min}-{max})")]
    FieldOutOfRange {
        /// Name of the offending cron field.
        field: &'static str,
        /// The rejected value.
        value: u32,
        /// Inclusive lower bound of the field.
        min: u32,
        /// Inclusive upper bound of the field.
        max: u32,
    },

    /// A time-of-day string is not in `HH:MM` form.
    #[error("malformed time of day '{0}': expected HH:MM")]
    MalformedTime(String),

    /// A stored cron expression was rejected by the matcher.
    #[error("invalid cron expression '{expr}': {source}")]
    Expression {
        /// The expression as registered.
        expr: String,
        /// The matcher's parse error.
        #[source]
        source: cron::error::Error,
    },

    /// A job with the same normalized label is already registered.
    #[error("job '{0}' is already registered")]
    LabelExists(String),

    /// No job is registered under the given label.
    #[error("no job registered under label '{0}'")]
    LabelNotFound(String),

    /// Lock or output persistence failed.
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SchedulerError>;
