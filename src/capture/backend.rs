//! Capture backend abstraction for screen capture.
//!
//! This module provides a unified interface for different capture methods:
//! - `ScreenBackend` reads the display directly through xcap
//! - `HelperBackend` shells out to an external screenshot tool
//! - `SystemBackend` tries the display first and falls back to a helper
//! - `MockScreen` (see `mock`) for testing without a display

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use image::DynamicImage;
use xcap::Monitor;

use crate::error::{CaptureError, CaptureResult};
use crate::region::Region;

/// Trait for capture backends
///
/// Implementations return the captured pixels in whatever format they get
/// them; making the frame JPEG-encodable is up to the caller.
pub trait CaptureBackend {
    /// Capture the full screen, or only `region` when given
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage>;

    /// Get the source type identifier (e.g., "xcap", "grim", "mock")
    fn source_type(&self) -> &str;
}

/// Cut `region` out of a frame whose top-left pixel sits at `origin` in screen coordinates.
///
/// The part of the region that falls outside the frame is dropped.
pub fn crop_to_region(
    frame: DynamicImage,
    origin: (i32, i32),
    region: Option<Region>,
) -> CaptureResult<DynamicImage> {
    let Some(region) = region else {
        return Ok(frame);
    };
    if region.is_empty() {
        return Err(CaptureError::EmptyRegion(region.to_string()));
    }

    let (x1, y1, x2, y2) = region.bounds();
    let (ox, oy) = (i64::from(origin.0), i64::from(origin.1));
    let (fw, fh) = (i64::from(frame.width()), i64::from(frame.height()));

    let left = (i64::from(x1) - ox).clamp(0, fw);
    let top = (i64::from(y1) - oy).clamp(0, fh);
    let right = (i64::from(x2) - ox).clamp(0, fw);
    let bottom = (i64::from(y2) - oy).clamp(0, fh);

    if right <= left || bottom <= top {
        return Err(CaptureError::OutOfBounds {
            region: region.to_string(),
            width: frame.width(),
            height: frame.height(),
        });
    }

    Ok(frame.crop_imm(
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

// ============================================================================
// Direct display capture
// ============================================================================

/// Captures the display through xcap.
///
/// Full-screen captures use the primary monitor. Region captures use the
/// monitor that contains the region's top-left corner.
#[derive(Debug, Default)]
pub struct ScreenBackend;

impl ScreenBackend {
    pub fn new() -> Self {
        Self
    }

    fn pick_monitor(region: Option<Region>) -> CaptureResult<Monitor> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        if let Some(region) = region {
            let contains = |m: &Monitor| -> bool {
                let (Ok(x), Ok(y), Ok(w), Ok(h)) = (m.x(), m.y(), m.width(), m.height()) else {
                    return false;
                };
                let (px, py) = (i64::from(region.left()), i64::from(region.top()));
                px >= i64::from(x)
                    && py >= i64::from(y)
                    && px < i64::from(x) + i64::from(w)
                    && py < i64::from(y) + i64::from(h)
            };
            if let Some(monitor) = monitors.iter().find(|&m| contains(m)) {
                return Ok(monitor.clone());
            }
        }

        let primary = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .cloned();
        primary.ok_or_else(|| CaptureError::Unavailable("no monitors found".to_string()))
    }
}

impl CaptureBackend for ScreenBackend {
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        let start = Instant::now();
        let monitor = Self::pick_monitor(region)?;
        let origin = (monitor.x().unwrap_or(0), monitor.y().unwrap_or(0));

        let frame = monitor
            .capture_image()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        let frame = DynamicImage::ImageRgba8(frame);
        if frame.width() == 0 || frame.height() == 0 {
            return Err(CaptureError::Unavailable(
                "captured an empty frame (missing permission or no display)".to_string(),
            ));
        }

        let image = crop_to_region(frame, origin, region)?;
        tracing::debug!(elapsed = ?start.elapsed(), "xcap capture");
        Ok(image)
    }

    fn source_type(&self) -> &str {
        "xcap"
    }
}

// ============================================================================
// External screenshot helpers
// ============================================================================

/// External screenshot tools that work where direct capture does not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    /// GNOME's screenshot tool (writes a PNG to a file)
    GnomeScreenshot,
    /// wlroots screenshot tool (writes a PNG to stdout)
    Grim,
}

impl Helper {
    /// Helpers in order of preference
    pub const ALL: [Helper; 2] = [Helper::GnomeScreenshot, Helper::Grim];

    pub fn program(&self) -> &'static str {
        match self {
            Helper::GnomeScreenshot => "gnome-screenshot",
            Helper::Grim => "grim",
        }
    }
}

/// Captures by running an external screenshot helper
#[derive(Debug, Clone)]
pub struct HelperBackend {
    helper: Helper,
    program: PathBuf,
}

impl HelperBackend {
    /// Use `helper` installed at `program`
    pub fn new(helper: Helper, program: impl Into<PathBuf>) -> Self {
        Self {
            helper,
            program: program.into(),
        }
    }

    /// First helper found on `PATH`, if any
    pub fn detect() -> Option<Self> {
        Helper::ALL.iter().find_map(|helper| {
            which::which(helper.program())
                .ok()
                .map(|program| Self::new(*helper, program))
        })
    }

    pub fn helper(&self) -> Helper {
        self.helper
    }

    fn failed(&self, message: impl Into<String>) -> CaptureError {
        CaptureError::Helper {
            helper: self.helper.program().to_string(),
            message: message.into(),
        }
    }

    fn run_gnome_screenshot(&self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        let target = tempfile::Builder::new()
            .prefix("scapr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| self.failed(format!("cannot create temporary file: {}", e)))?;

        let output = Command::new(&self.program)
            .arg("-f")
            .arg(target.path())
            .output()
            .map_err(|e| self.failed(e.to_string()))?;
        if !output.status.success() {
            return Err(self.failed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }

        let frame = image::open(target.path())?;
        crop_to_region(frame, (0, 0), region)
    }

    fn run_grim(&self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        let mut command = Command::new(&self.program);
        command.args(["-t", "png"]);
        if let Some(region) = region {
            if region.is_empty() {
                return Err(CaptureError::EmptyRegion(region.to_string()));
            }
            command.args([
                "-g",
                &format!(
                    "{},{} {}x{}",
                    region.left(),
                    region.top(),
                    region.width(),
                    region.height()
                ),
            ]);
        }
        let output = command.arg("-").output().map_err(|e| self.failed(e.to_string()))?;

        if !output.status.success() {
            return Err(self.failed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        if output.stdout.is_empty() {
            return Err(self.failed("returned an empty screenshot"));
        }
        Ok(image::load_from_memory(&output.stdout)?)
    }
}

impl CaptureBackend for HelperBackend {
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        let start = Instant::now();
        let image = match self.helper {
            Helper::GnomeScreenshot => self.run_gnome_screenshot(region)?,
            Helper::Grim => self.run_grim(region)?,
        };
        tracing::debug!(helper = self.helper.program(), elapsed = ?start.elapsed(), "helper capture");
        Ok(image)
    }

    fn source_type(&self) -> &str {
        self.helper.program()
    }
}

// ============================================================================
// Default backend with fallback
// ============================================================================

/// Direct capture, falling back to an external helper when the display
/// cannot be read directly (typically a Wayland session).
///
/// Once the primary backend reports itself unavailable, every later capture
/// goes straight to the helper. Other primary errors, such as a region off
/// screen, are returned as-is.
#[derive(Debug)]
pub struct SystemBackend<P = ScreenBackend, H = HelperBackend> {
    primary: P,
    helper: Option<H>,
    use_helper: bool,
}

impl<P: CaptureBackend, H: CaptureBackend> SystemBackend<P, H> {
    pub fn new(primary: P, helper: Option<H>) -> Self {
        Self {
            primary,
            helper,
            use_helper: false,
        }
    }

    /// Whether captures are currently served by the helper
    pub fn using_helper(&self) -> bool {
        self.use_helper
    }
}

impl SystemBackend {
    /// Backend for this machine, with whatever helper is installed
    pub fn detect() -> Self {
        Self::new(ScreenBackend::new(), HelperBackend::detect())
    }
}

impl<P: CaptureBackend, H: CaptureBackend> CaptureBackend for SystemBackend<P, H> {
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        if self.use_helper {
            if let Some(helper) = self.helper.as_mut() {
                return helper.capture(region);
            }
        }

        match self.primary.capture(region) {
            Err(e) if e.is_unavailable() => {
                let Some(helper) = self.helper.as_mut() else {
                    return Err(e);
                };
                tracing::warn!(
                    reason = %e,
                    helper = helper.source_type(),
                    "direct capture unavailable, using screenshot helper"
                );
                self.use_helper = true;
                helper.capture(region).map_err(|helper_err| {
                    CaptureError::Unavailable(format!(
                        "{}; {}",
                        first_line(&e),
                        first_line(&helper_err)
                    ))
                })
            }
            other => other,
        }
    }

    fn source_type(&self) -> &str {
        match (&self.helper, self.use_helper) {
            (Some(helper), true) => helper.source_type(),
            _ => self.primary.source_type(),
        }
    }
}

fn first_line(err: &CaptureError) -> String {
    match err {
        CaptureError::Unavailable(reason) => reason.clone(),
        other => other.to_string().lines().next().unwrap_or_default().to_string(),
    }
}
