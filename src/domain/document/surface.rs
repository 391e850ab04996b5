// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/surface.rs
//
// Editable raster surface: logical size plus the device pixel buffer.

use std::io::Cursor;

use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, RgbaImage};
use kurbo::{Point, Rect, Size};

use super::DocResult;

/// Device pixel size of a logical extent.
pub fn device_extent(logical: u32, device_scale: f64) -> u32 {
    ((f64::from(logical) * device_scale).round() as u32).max(1)
}

/// Pull values within rounding noise of an integer onto it.
pub(crate) fn snap(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < 1e-6 { nearest } else { value }
}

/// The pixels being edited.
///
/// The buffer is always `logical × device_scale` (rounded) in each
/// dimension. Surfaces are values: every committed operation produces a new
/// one, which makes history snapshots plain clones.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    logical_width: u32,
    logical_height: u32,
    device_scale: f64,
    pixels: RgbaImage,
}

impl Surface {
    /// Wrap an existing device buffer. Returns `None` when the buffer does not
    /// match the logical size at the given scale.
    pub fn new(logical_width: u32, logical_height: u32, device_scale: f64, pixels: RgbaImage) -> Option<Self> {
        if logical_width == 0 || logical_height == 0 || !(device_scale > 0.0) {
            return None;
        }
        let expected = (
            device_extent(logical_width, device_scale),
            device_extent(logical_height, device_scale),
        );
        if pixels.dimensions() != expected {
            return None;
        }
        Some(Self {
            logical_width,
            logical_height,
            device_scale,
            pixels,
        })
    }

    /// Build a surface from a decoded image.
    ///
    /// With a fit box the image is scaled by `min(fit_w / w, fit_h / h)`;
    /// otherwise its pixel size becomes the logical size. The buffer is then
    /// resampled to the device resolution.
    pub fn from_image(image: &DynamicImage, fit: Option<(u32, u32)>, device_scale: f64) -> Self {
        let device_scale = if device_scale > 0.0 && device_scale.is_finite() {
            device_scale
        } else {
            1.0
        };
        let (width, height) = image.dimensions();
        let ratio = match fit {
            Some((fit_w, fit_h)) if width > 0 && height > 0 => {
                (f64::from(fit_w) / f64::from(width)).min(f64::from(fit_h) / f64::from(height))
            }
            _ => 1.0,
        };
        let logical_width = ((f64::from(width) * ratio).round() as u32).max(1);
        let logical_height = ((f64::from(height) * ratio).round() as u32).max(1);
        let device_width = device_extent(logical_width, device_scale);
        let device_height = device_extent(logical_height, device_scale);

        let rgba = image.to_rgba8();
        let pixels = if rgba.dimensions() == (device_width, device_height) {
            rgba
        } else {
            imageops::resize(&rgba, device_width, device_height, FilterType::Triangle)
        };

        Self {
            logical_width,
            logical_height,
            device_scale,
            pixels,
        }
    }

    /// Decode encoded image bytes (any format the `image` crate recognises).
    pub fn decode(bytes: &[u8], fit: Option<(u32, u32)>, device_scale: f64) -> DocResult<Self> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("Failed to read image header")?
            .decode()
            .context("Failed to decode image")?;
        Ok(Self::from_image(&image, fit, device_scale))
    }

    /// Replace the whole surface with a new region of this one (used by crop).
    pub(crate) fn replaced(&self, logical_width: u32, logical_height: u32, pixels: RgbaImage) -> Option<Self> {
        Self::new(logical_width, logical_height, self.device_scale, pixels)
    }

    pub fn logical_width(&self) -> u32 {
        self.logical_width
    }

    pub fn logical_height(&self) -> u32 {
        self.logical_height
    }

    /// Logical size as a geometry value.
    pub fn logical_size(&self) -> Size {
        Size::new(f64::from(self.logical_width), f64::from(self.logical_height))
    }

    pub fn device_scale(&self) -> f64 {
        self.device_scale
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Logical point to device pixel space.
    pub fn to_device(&self, point: Point) -> Point {
        Point::new(point.x * self.device_scale, point.y * self.device_scale)
    }

    /// Device pixel rectangle covered by a logical rectangle, clamped to the
    /// buffer. Returns `(x, y, width, height)`, or `None` if nothing remains.
    pub fn device_rect(&self, logical: Rect) -> Option<(u32, u32, u32, u32)> {
        let (buf_w, buf_h) = self.pixels.dimensions();
        let s = self.device_scale;
        let x0 = snap(logical.x0 * s).floor().clamp(0.0, f64::from(buf_w));
        let y0 = snap(logical.y0 * s).floor().clamp(0.0, f64::from(buf_h));
        let x1 = snap(logical.x1 * s).ceil().clamp(0.0, f64::from(buf_w));
        let y1 = snap(logical.y1 * s).ceil().clamp(0.0, f64::from(buf_h));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
