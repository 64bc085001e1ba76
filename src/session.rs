//! Session planning: where one run's captures go.
//!
//! A session is either the output root itself (flat mode) or a subdirectory
//! named `<tag>_<YYYYMMDD_HHMMSS>` after the run's start time. The directory
//! is fixed when the session is planned and never changes during the run.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::config::Configuration;

/// Format of session subdirectory timestamps
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format of capture file timestamps
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M%S";

/// Prefix of every capture file name
pub const CAPTURE_PREFIX: &str = "screenshot";

/// Output directory for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Directory receiving this run's captures
    pub dir: PathBuf,
    /// Whether `dir` is the output root itself
    pub flat: bool,
}

impl Session {
    /// Plan the session for a run starting now
    pub fn plan(config: &Configuration) -> Self {
        Self::plan_at(config, Local::now())
    }

    /// Plan the session for a run starting at `started`.
    ///
    /// Nothing is created on disk; see [`Session::create`].
    pub fn plan_at(config: &Configuration, started: DateTime<Local>) -> Self {
        if config.flat_output {
            return Self::in_dir(&config.output_root);
        }

        let name = format!(
            "{}_{}",
            sanitize_name(&config.session_tag),
            started.format(SESSION_TIMESTAMP_FORMAT)
        );
        Self {
            dir: config.output_root.join(name),
            flat: false,
        }
    }

    /// Use an existing directory as-is
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            flat: true,
        }
    }

    /// Make sure the session directory exists.
    ///
    /// Reuses a directory that is already there, so two runs starting in the
    /// same second share one session.
    pub fn create(&self) -> std::io::Result<()> {
        if !self.flat {
            fs::create_dir_all(&self.dir)?;
            tracing::info!(dir = %self.dir.display(), "created session directory");
        }
        Ok(())
    }

    /// Path for a capture taken at `taken`
    pub fn capture_path(&self, taken: DateTime<Local>) -> PathBuf {
        self.dir.join(capture_filename(taken))
    }
}

/// File name for a capture taken at `taken`
pub fn capture_filename(taken: DateTime<Local>) -> String {
    format!("{}-{}.jpg", CAPTURE_PREFIX, taken.format(CAPTURE_TIMESTAMP_FORMAT))
}

/// Sanitize a name for use in directory names
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
