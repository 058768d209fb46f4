//! # tickrun
//!
//! Tick-driven cron job scheduling and execution engine.
//!
//! `tickrun` does not run a daemon loop: an external tick source (an OS
//! minute timer, typically) invokes the host program, the host registers
//! its jobs, and one [`Scheduler::tick`] call determines what is due,
//! executes it, and returns a structured [`TickReport`]. Lock marker files
//! keep overlapping host invocations from running the same job twice.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use tickrun::{Scheduler, SchedulerConfig};
//!
//! # fn main() -> tickrun::Result<()> {
//! let mut scheduler = Scheduler::new(
//!     SchedulerConfig::default().with_lock_dir("/var/run/tickrun"),
//! )?;
//!
//! scheduler
//!     .command("db-backup", "pg_dump app > /backups/app.sql")?
//!     .daily("02:30")?
//!     .output_to("/var/log/db-backup.log");
//!
//! scheduler.command("heartbeat", "curl -fsS https://example.com/ping")?;
//!
//! let report = scheduler.tick(Utc::now())?;
//! println!("{} jobs executed", report.count);
//! # Ok(())
//! # }
//! ```

pub mod cadence;
pub mod config;
pub mod engine;
pub mod error;
mod exec;
pub mod job;
pub mod lock;
pub mod registry;
pub mod report;

pub use cadence::Cadence;
pub use config::SchedulerConfig;
pub use engine::Scheduler;
pub use error::{Result, SchedulerError};
pub use job::{Action, Guard, Job, JobInfo, Overlap};
pub use lock::{LockMode, LockStore};
pub use registry::{JobBuilder, JobRegistry};
pub use report::{JobOutcome, TickReport};
