// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/text.rs
//
// Text label stamped at the end of a stroke.

use kurbo::Point;

use super::StrokeStyle;
use crate::constant::THICKNESS_MULTIPLIER;
use crate::domain::document::Surface;
use crate::domain::document::font::GlyphFace;

/// Font size in device pixels for a style on a surface.
pub fn font_size(style: &StrokeStyle, device_scale: f64) -> f64 {
    THICKNESS_MULTIPLIER * f64::from(style.thickness) * device_scale
}

/// Stamp `text` left-aligned with its baseline at `at` (logical point).
///
/// Empty text is a no-op and returns `None`.
#[must_use]
pub fn commit_text(surface: &Surface, at: Point, text: &str, style: &StrokeStyle, face: &GlyphFace) -> Option<Surface> {
    if text.is_empty() {
        return None;
    }
    let mut out = surface.clone();
    let origin = surface.to_device(at);
    let size = font_size(style, surface.device_scale());
    face.draw(out.pixels_mut(), text, origin, size, style.color);
    log::debug!("Text of {} chars stamped at {at:?}", text.chars().count());
    Some(out)
}
