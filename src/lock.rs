//! Filesystem-backed execution locks.
//!
//! Lock markers prevent two overlapping invocations of the host program
//! from running the same job concurrently. They are plain marker files, one
//! per job label, under a configured directory; the engine acquires a
//! job's marker when it enters the execution snapshot and releases it when
//! the action completes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchedulerError};

/// Process-wide overlap tracking policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Lock markers are written under this directory.
    Enabled {
        /// Directory holding one `<label>.lock` marker per running job.
        dir: PathBuf,
    },
    /// No overlap tracking: every job behaves as if it had the always-run
    /// policy, and acquire/release are no-ops.
    #[default]
    Disabled,
}

impl LockMode {
    /// Enabled mode for the given directory.
    pub fn enabled(dir: impl Into<PathBuf>) -> Self {
        LockMode::Enabled { dir: dir.into() }
    }
}

/// Label-keyed existence markers backed by the filesystem.
#[derive(Debug)]
pub struct LockStore {
    mode: LockMode,
}

impl LockStore {
    /// Create a store. In enabled mode the directory is created and probed
    /// for writability up front, so a misconfigured path fails here rather
    /// than mid-tick.
    pub fn new(mode: LockMode) -> Result<Self> {
        if let LockMode::Enabled { dir } = &mode {
            fs::create_dir_all(dir).map_err(|e| fs_error(dir, e))?;
            let probe = dir.join(".write-probe");
            fs::write(&probe, b"").map_err(|e| fs_error(&probe, e))?;
            fs::remove_file(&probe).map_err(|e| fs_error(&probe, e))?;
        }
        Ok(Self { mode })
    }

    /// Whether overlap tracking is enabled at all.
    pub fn is_enabled(&self) -> bool {
        matches!(self.mode, LockMode::Enabled { .. })
    }

    /// Whether a marker exists for `label`. Always false in disabled mode.
    pub fn exists(&self, label: &str) -> bool {
        self.marker_path(label).is_some_and(|p| p.exists())
    }

    /// Create the marker for `label`. No-op in disabled mode.
    pub fn acquire(&self, label: &str) -> Result<()> {
        let Some(path) = self.marker_path(label) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
        }
        fs::write(&path, b"").map_err(|e| fs_error(&path, e))?;
        debug!("acquired lock for '{}'", label);
        Ok(())
    }

    /// Delete the marker for `label`. No-op in disabled mode; fails if the
    /// marker was already removed externally.
    pub fn release(&self, label: &str) -> Result<()> {
        let Some(path) = self.marker_path(label) else {
            return Ok(());
        };
        fs::remove_file(&path).map_err(|e| fs_error(&path, e))?;
        debug!("released lock for '{}'", label);
        Ok(())
    }

    fn marker_path(&self, label: &str) -> Option<PathBuf> {
        match &self.mode {
            LockMode::Enabled { dir } => Some(dir.join(format!("{label}.lock"))),
            LockMode::Disabled => None,
        }
    }
}

fn fs_error(path: &Path, source: std::io::Error) -> SchedulerError {
    SchedulerError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
