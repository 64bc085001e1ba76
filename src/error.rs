//! Error types for scapr.
//!
//! Failures are grouped by the stage that detects them: option resolution
//! ([`ConfigError`]), the capture backend ([`CaptureError`]), and the run as a
//! whole ([`ScaprError`]), which also decides the process exit status.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for capture backends
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Result type for a whole run
pub type ScaprResult<T> = Result<T, ScaprError>;

/// Invalid command-line input, detected before anything is captured.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--folder` does not name an existing directory.
    #[error("Folder not found: '{}'", .0.display())]
    FolderNotFound(PathBuf),

    /// `--region` is malformed or inverted.
    #[error("Invalid region coordinates '{input}'.\n{reason}")]
    InvalidRegion { input: String, reason: String },
}

/// Failure to obtain a frame from the screen.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capture method works in this environment.
    #[error(
        "Screen capture is not available in this environment: {0}\n\
         On Wayland desktops, install an external screenshot helper such as \
         'gnome-screenshot' (GNOME) or 'grim' (wlroots compositors) and run again."
    )]
    Unavailable(String),

    /// The requested region has no area.
    #[error("Region {0} has zero width or height; nothing to capture.")]
    EmptyRegion(String),

    /// The requested region lies entirely off screen.
    #[error("Region {region} is outside the {width}x{height} screen.")]
    OutOfBounds {
        region: String,
        width: u32,
        height: u32,
    },

    /// The external screenshot helper ran but failed.
    #[error("Screenshot helper '{helper}' failed: {message}")]
    Helper { helper: String, message: String },

    /// The helper's output could not be decoded.
    #[error("Failed to decode captured image: {0}")]
    Decode(#[from] image::ImageError),
}

impl CaptureError {
    /// Whether this error means the environment cannot capture at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CaptureError::Unavailable(_))
    }
}

/// Any failure that ends a run with a non-zero status.
#[derive(Debug, Error)]
pub enum ScaprError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Failed to write '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScaprError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
