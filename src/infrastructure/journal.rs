//! Append-only journal of executed commands.
//!
//! The bootstrap runbook records every external command line it issues, so a
//! failed boot can be replayed or audited from the log file alone.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::warn;

use crate::infrastructure::traits::FileSystem;

/// Command journal writing to a log file (best effort).
#[derive(Clone)]
pub struct Journal {
    fs: Arc<dyn FileSystem>,
    path: Option<PathBuf>,
}

impl Journal {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self {
            fs,
            path: Some(path),
        }
    }

    /// Journal that records nothing.
    pub fn disabled(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, path: None }
    }

    /// Record one command line. Journal failures never abort the runbook.
    pub fn record(&self, line: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let stamped = format!("{} {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
        if let Err(e) = self.fs.append(path, &stamped) {
            warn!("journal write failed ({}): {}", path.display(), e);
        }
    }
}
