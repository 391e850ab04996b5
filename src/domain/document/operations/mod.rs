// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/mod.rs
//
// Per-tool commit operations. Each takes the current surface and returns a
// new one, or `None` when the operation's guard rejects the stroke.

pub mod adjust;
pub mod arrow;
pub mod crop;
pub mod pixelate;
pub mod text;

use image::{Rgba, RgbaImage};

use crate::constant::{MAX_BLOCK_SIZE, MAX_THICKNESS, MIN_BLOCK_SIZE, MIN_THICKNESS};

pub use adjust::{AdjustmentKind, AdjustmentParams};
pub use crop::CropRegion;

/// Style shared by the drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    /// Line thickness in logical pixels.
    pub thickness: u32,
    pub color: Rgba<u8>,
    /// Pixelate block size in device pixels.
    pub block_size: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            thickness: 6,
            color: Rgba([0xe1, 0x1d, 0x48, 0xff]),
            block_size: 16,
        }
    }
}

impl StrokeStyle {
    pub fn set_thickness(&mut self, thickness: u32) {
        self.thickness = thickness.clamp(MIN_THICKNESS, MAX_THICKNESS);
    }

    pub fn set_block_size(&mut self, block_size: u32) {
        self.block_size = block_size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE);
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into an opaque colour.
pub fn parse_hex_color(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 0xff]))
}

/// Source-over blend of `color` at the given coverage.
pub(crate) fn blend_pixel(pixel: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color[3])) / 255.0;
    if alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let dst = f32::from(pixel[c]);
        let src = f32::from(color[c]);
        pixel[c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
    }
    let dst_a = f32::from(pixel[3]) / 255.0;
    pixel[3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round() as u8;
}

/// Paint every pixel whose centre satisfies `inside`, within a device-space
/// bounding box clamped to the buffer.
pub(crate) fn fill_where<F>(pixels: &mut RgbaImage, bounds: kurbo::Rect, color: Rgba<u8>, inside: F)
where
    F: Fn(kurbo::Point) -> bool,
{
    let (width, height) = pixels.dimensions();
    let x0 = bounds.x0.floor().max(0.0) as u32;
    let y0 = bounds.y0.floor().max(0.0) as u32;
    let x1 = (bounds.x1.ceil().max(0.0) as u32).min(width);
    let y1 = (bounds.y1.ceil().max(0.0) as u32).min(height);
    for y in y0..y1 {
        for x in x0..x1 {
            let center = kurbo::Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if inside(center) {
                blend_pixel(pixels.get_pixel_mut(x, y), color, 1.0);
            }
        }
    }
}
