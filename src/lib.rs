//! scapr - timelapse-style screen capture from the command line.
//!
//! This crate provides:
//! - Option resolution for the `scapr` command line
//! - Session planning (flat output or one timestamped folder per run)
//! - Screen capture through xcap, with an external helper fallback
//! - JPEG output, dropping alpha channels the encoder cannot carry
//! - An interruptible capture loop
//!
//! # Example
//!
//! ```rust,no_run
//! use scapr::capture::{CaptureBackend, SystemBackend, save_jpeg};
//!
//! let mut backend = SystemBackend::detect();
//! let image = backend.capture(None).unwrap();
//! save_jpeg(image, std::path::Path::new("screenshot.jpg"), 75).unwrap();
//! ```

pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod region;
pub mod runner;
pub mod session;

// Re-export the pieces a caller needs to drive a run
pub use app::run_app;
pub use cli::Args;
pub use config::Configuration;
pub use error::{CaptureError, ConfigError, ScaprError};
pub use interrupt::{Interrupt, InterruptHandle, Pause};
pub use region::Region;
pub use runner::{RunOutcome, StopReason};
pub use session::Session;

// Re-export capture backends
pub use capture::{CaptureBackend, HelperBackend, MockScreen, ScreenBackend, SystemBackend};
