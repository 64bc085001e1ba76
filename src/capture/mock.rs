//! Synthetic screen for tests and benchmarks.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{DynamicImage, Rgba, RgbaImage};

use super::backend::{CaptureBackend, crop_to_region};
use crate::error::{CaptureError, CaptureResult};
use crate::region::Region;

/// A virtual screen that renders a numbered frame on every capture.
///
/// Frames are RGBA, like the PNGs returned by external screenshot helpers,
/// so they exercise the alpha-stripping path before JPEG encoding. A screen
/// built with [`MockScreen::unavailable`] fails every capture the way a
/// display without capture support does.
#[derive(Debug, Clone)]
pub struct MockScreen {
    width: u32,
    height: u32,
    background: [u8; 3],
    captures: u64,
    unavailable: Option<String>,
}

impl MockScreen {
    /// Create a screen with the given dimensions and a dark background
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_color(width, height, [32, 32, 48])
    }

    /// Create a screen filled with a specific color
    pub fn with_color(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            width,
            height,
            background,
            captures: 0,
            unavailable: None,
        }
    }

    /// Create a screen whose every capture fails as unavailable
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::new(1, 1)
        }
    }

    /// Number of frames captured so far
    pub fn captures(&self) -> u64 {
        self.captures
    }

    /// Render the frame shown at capture number `index`
    pub fn render(&self, index: u64) -> RgbaImage {
        let [r, g, b] = self.background;
        let mut frame = RgbaImage::from_pixel(self.width, self.height, Rgba([r, g, b, 255]));
        draw_text(&mut frame, 8, 8, &format!("frame {}", index), [255, 255, 255]);
        frame
    }
}

impl CaptureBackend for MockScreen {
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        if let Some(reason) = &self.unavailable {
            return Err(CaptureError::Unavailable(reason.clone()));
        }
        self.captures += 1;
        let frame = DynamicImage::ImageRgba8(self.render(self.captures));
        crop_to_region(frame, (0, 0), region)
    }

    fn source_type(&self) -> &str {
        "mock"
    }
}

/// Draw text using font8x8 glyphs
///
/// Each character is 8x8 pixels. Text does not wrap.
fn draw_text(frame: &mut RgbaImage, x: u32, y: u32, text: &str, fg: [u8; 3]) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS.get(ch).unwrap_or([0u8; 8]);
        for (row_idx, row) in glyph.iter().enumerate() {
            let py = y + row_idx as u32;
            if py >= frame.height() {
                break;
            }
            for bit in 0..8 {
                let px = cursor_x + bit;
                if px >= frame.width() {
                    break;
                }
                // font8x8 stores LSB as leftmost pixel
                if (row >> bit) & 1 == 1 {
                    frame.put_pixel(px, py, Rgba([fg[0], fg[1], fg[2], 255]));
                }
            }
        }
        cursor_x += 8;
        if cursor_x >= frame.width() {
            break;
        }
    }
}
