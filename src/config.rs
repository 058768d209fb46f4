//! Scheduler configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::lock::LockMode;

/// Scheduler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Overlap tracking policy. Disabled by default.
    #[serde(default)]
    pub lock_mode: LockMode,

    /// Engine-wide default output sink. Jobs without their own sink append
    /// here; with neither, output is discarded.
    #[serde(default)]
    pub default_output: Option<PathBuf>,
}

impl SchedulerConfig {
    /// Enable lock tracking under `dir`.
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_mode = LockMode::enabled(dir);
        self
    }

    /// Set the engine-wide default output sink.
    pub fn with_default_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_output = Some(path.into());
        self
    }
}
