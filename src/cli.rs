//! Command-line options and their resolution into a [`Configuration`].

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{self, Configuration, ENV_FOLDER, ENV_SECONDS};
use crate::error::ConfigError;
use crate::region::Region;

/// Title line printed at the start of every run
pub const APP_TITLE: &str = concat!(
    "scapr - Screen Capture utility - version ",
    env!("CARGO_PKG_VERSION")
);

/// Command-line utility to capture screenshots.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "scapr",
    version,
    about = "Command-line utility to capture screenshots.",
    after_help = "ENVIRONMENT VARIABLES:\n\
        SCAPR_FOLDER         Default for --folder\n\
        SCAPR_SECONDS        Default for --seconds\n\
        SCAPR_SESSION_TAG    Prefix of per-session folders (default: scapr)\n\
        SCAPR_JPEG_QUALITY   JPEG quality, 1-100 (default: 75)\n\
        SCAPR_LOG            Log filter, e.g. 'scapr=debug' (default: warn)"
)]
pub struct Args {
    /// Do not prompt to start capturing screenshots. Begin right away.
    #[arg(long)]
    pub auto: bool,

    /// Number of seconds to pause between screenshots (1-3600, otherwise 3).
    #[arg(long, value_name = "N", env = ENV_SECONDS, allow_negative_numbers = true)]
    pub seconds: Option<String>,

    /// Number of screenshots to take before stopping.
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Name of folder for saving captured screenshots.
    #[arg(long, value_name = "PATH", env = ENV_FOLDER)]
    pub folder: Option<PathBuf>,

    /// Region to capture (instead of full screen). Specify box coordinates,
    /// separated by commas (no spaces between), as 'x1,y1,x2,y2' where x1 and
    /// y1 are the left-top pixel coordinates, and x2 and y2 are the
    /// right-bottom pixel coordinates. Example: '--region 100,100,600,600' to
    /// capture a 500 x 500 image starting at 100 pixels from top and left.
    #[arg(long, value_name = "x1,y1,x2,y2", allow_hyphen_values = true)]
    pub region: Option<String>,

    /// Do not create a sub-folder for this session; save screenshots directly
    /// in the output folder.
    #[arg(long)]
    pub flat: bool,
}

impl Args {
    /// Validate the options and build the run's configuration.
    ///
    /// `--folder` and `--region` are strict; `--seconds` is normalized to the
    /// default instead of rejected.
    pub fn resolve(&self) -> Result<Configuration, ConfigError> {
        let home = dirs::home_dir();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.resolve_with(home.as_deref(), &cwd)
    }

    /// [`Args::resolve`] with explicit home and working directories.
    pub fn resolve_with(&self, home: Option<&Path>, cwd: &Path) -> Result<Configuration, ConfigError> {
        let output_root = match &self.folder {
            Some(folder) => resolve_folder(folder, home, cwd)?,
            None => config::default_output_root(home, cwd),
        };

        let (interval_seconds, replaced) = config::normalize_interval(self.seconds.as_deref());
        if replaced {
            tracing::warn!(
                requested = self.seconds.as_deref().unwrap_or_default(),
                used = interval_seconds,
                "interval out of range, using default"
            );
        }

        let region = self.region.as_deref().map(str::parse::<Region>).transpose()?;

        let settings = config::get();
        Ok(Configuration {
            output_root,
            interval_seconds,
            stop_count: self.count,
            auto_start: self.auto,
            region,
            flat_output: self.flat,
            session_tag: settings.session_tag.clone(),
            jpeg_quality: settings.jpeg_quality,
        })
    }
}

/// Expand, absolutize and check an explicit output folder.
fn resolve_folder(folder: &Path, home: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = config::expand_home(folder, home);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    if !absolute.is_dir() {
        return Err(ConfigError::FolderNotFound(absolute));
    }
    Ok(absolute.canonicalize().unwrap_or(absolute))
}
