//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for scapr, supporting:
//! - Environment variables for the values that are not worth a flag
//! - Sensible defaults matching the documented command-line behavior
//! - The immutable [`Configuration`] value built once per run
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SCAPR_FOLDER` | Output root (same rules as `--folder`) | see [`default_output_root`] |
//! | `SCAPR_SECONDS` | Interval between captures (same rules as `--seconds`) | `3` |
//! | `SCAPR_SESSION_TAG` | Prefix of per-session subdirectories | `scapr` |
//! | `SCAPR_JPEG_QUALITY` | JPEG quality, 1 to 100 | `75` |
//! | `SCAPR_LOG` | Tracing filter (falls back to `RUST_LOG`) | `warn` |
//!
//! # Example
//!
//! ```bash
//! # Group sessions under a different tag and encode at higher quality
//! export SCAPR_SESSION_TAG="timelapse"
//! export SCAPR_JPEG_QUALITY=90
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::region::Region;

// ============================================================================
// Default Values
// ============================================================================

/// Default interval between captures (seconds)
pub const DEFAULT_SECONDS: u64 = 3;

/// Smallest accepted interval (seconds)
pub const MIN_SECONDS: u64 = 1;

/// Largest accepted interval (seconds). An hour is already unlikely to be useful.
pub const MAX_SECONDS: u64 = 60 * 60;

/// Default prefix for session subdirectories
pub const DEFAULT_SESSION_TAG: &str = "scapr";

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the output root
pub const ENV_FOLDER: &str = "SCAPR_FOLDER";

/// Environment variable for the capture interval
pub const ENV_SECONDS: &str = "SCAPR_SECONDS";

/// Environment variable for the session tag
pub const ENV_SESSION_TAG: &str = "SCAPR_SESSION_TAG";

/// Environment variable for JPEG quality
pub const ENV_JPEG_QUALITY: &str = "SCAPR_JPEG_QUALITY";

/// Environment variable for the tracing filter
pub const ENV_LOG: &str = "SCAPR_LOG";

// ============================================================================
// Settings (environment only, cached)
// ============================================================================

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Get the global settings (initialized from environment on first access)
pub fn get() -> &'static Settings {
    SETTINGS.get_or_init(Settings::from_env)
}

/// Settings that only come from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prefix of session subdirectory names
    pub session_tag: String,
    /// JPEG encoder quality (1-100)
    pub jpeg_quality: u8,
}

impl Settings {
    /// Create settings from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            session_tag: env::var(ENV_SESSION_TAG)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TAG.to_string()),
            jpeg_quality: env::var(ENV_JPEG_QUALITY)
                .ok()
                .and_then(|s| parse_jpeg_quality(&s))
                .unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }

    /// Create settings with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            session_tag: DEFAULT_SESSION_TAG.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

// ============================================================================
// Configuration (one per run)
// ============================================================================

/// Fully validated options for one run.
///
/// Built once by [`crate::cli::Args::resolve`]; the capture loop never
/// re-validates any of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Absolute directory receiving captures or session folders
    pub output_root: PathBuf,
    /// Seconds to pause after each capture, within `MIN_SECONDS..=MAX_SECONDS`
    pub interval_seconds: u64,
    /// Number of captures before stopping; `None` runs until interrupted
    pub stop_count: Option<u64>,
    /// Skip the confirmation prompt
    pub auto_start: bool,
    /// Capture only this area instead of the full screen
    pub region: Option<Region>,
    /// Write captures directly into `output_root`
    pub flat_output: bool,
    /// Prefix of the per-session subdirectory
    pub session_tag: String,
    /// JPEG encoder quality
    pub jpeg_quality: u8,
}

impl Configuration {
    /// Configuration writing to `output_root` with every other value at its default
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        let settings = Settings::defaults();
        Self {
            output_root: output_root.into(),
            interval_seconds: DEFAULT_SECONDS,
            stop_count: None,
            auto_start: false,
            region: None,
            flat_output: false,
            session_tag: settings.session_tag,
            jpeg_quality: settings.jpeg_quality,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Normalize a requested interval.
///
/// Anything missing, unparsable or outside `MIN_SECONDS..=MAX_SECONDS` becomes
/// `DEFAULT_SECONDS`. Returns the interval and whether the request was replaced.
pub fn normalize_interval(requested: Option<&str>) -> (u64, bool) {
    let Some(raw) = requested else {
        return (DEFAULT_SECONDS, false);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if (MIN_SECONDS as i64..=MAX_SECONDS as i64).contains(&n) => (n as u64, false),
        _ => (DEFAULT_SECONDS, true),
    }
}

fn parse_jpeg_quality(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|q| (1..=100).contains(q))
}

/// Default output root: `~/Pictures/Screenshots`, else `~/Pictures`, else `fallback`.
pub fn default_output_root(home: Option<&Path>, fallback: &Path) -> PathBuf {
    if let Some(home) = home {
        let pictures = home.join("Pictures");
        let screenshots = pictures.join("Screenshots");
        if screenshots.is_dir() {
            return screenshots;
        }
        if pictures.is_dir() {
            return pictures;
        }
    }
    fallback.to_path_buf()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
