// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/compositor.rs
//
// Flatten surface, view transform and tonal filters into the export raster.

use std::io::Cursor;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use super::DocResult;
use super::operations::AdjustmentParams;
use super::surface::Surface;
use crate::constant::EXPORT_MIME;
use crate::domain::view::{Rotation, ViewTransform};

/// Encoded export payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Bake the view transform and adjustments into a logical-resolution buffer.
///
/// Output dimensions are the logical size, swapped for quarter and
/// three-quarter turns. Zoom never affects the export.
pub fn bake(surface: &Surface, view: &ViewTransform, adjustments: &AdjustmentParams) -> RgbaImage {
    let (width, height) = (surface.logical_width(), surface.logical_height());
    let mut pixels = if surface.pixels().dimensions() == (width, height) {
        surface.pixels().clone()
    } else {
        imageops::resize(surface.pixels(), width, height, FilterType::Triangle)
    };

    // Mirror is applied in surface space, before rotating.
    if view.is_flipped_horizontal() {
        imageops::flip_horizontal_in_place(&mut pixels);
    }
    if view.is_flipped_vertical() {
        imageops::flip_vertical_in_place(&mut pixels);
    }
    let mut pixels = match view.rotation() {
        Rotation::None => pixels,
        Rotation::Cw90 => imageops::rotate90(&pixels),
        Rotation::Cw180 => imageops::rotate180(&pixels),
        Rotation::Cw270 => imageops::rotate270(&pixels),
    };

    adjustments.apply(&mut pixels);
    pixels
}

/// Composite over black and drop alpha.
fn flatten(pixels: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let p = pixels.get_pixel(x, y);
        let alpha = u16::from(p[3]);
        let over = |c: u8| ((u16::from(c) * alpha + 127) / 255) as u8;
        image::Rgb([over(p[0]), over(p[1]), over(p[2])])
    })
}

/// Bake and encode as JPEG at `quality` (1..=100).
pub fn export(
    surface: &Surface,
    view: &ViewTransform,
    adjustments: &AdjustmentParams,
    quality: u8,
) -> DocResult<EncodedImage> {
    let baked = bake(surface, view, adjustments);
    let (width, height) = baked.dimensions();
    let rgb = DynamicImage::ImageRgb8(flatten(&baked));

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .context("Failed to encode JPEG")?;

    log::info!(
        "Exported {width}x{height} JPEG ({} bytes, rotation {}°)",
        bytes.len(),
        view.rotation().degrees()
    );
    Ok(EncodedImage {
        bytes,
        mime: EXPORT_MIME,
    })
}
