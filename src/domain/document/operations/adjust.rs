// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/adjust.rs
//
// Tonal adjustments. These are view parameters until export bakes them.

use image::RgbaImage;

use crate::constant::{ADJUSTMENT_IDENTITY, ADJUSTMENT_MAX, LUMA_B, LUMA_G, LUMA_R};

/// Which slider an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Brightness,
    Contrast,
    Saturation,
    Exposure,
}

/// Slider values in `0..=200`; 100 leaves the image unchanged.
///
/// Exposure is applied as a second brightness multiplier stacked after the
/// other three filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentParams {
    pub brightness: u8,
    pub contrast: u8,
    pub saturation: u8,
    pub exposure: u8,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            brightness: ADJUSTMENT_IDENTITY,
            contrast: ADJUSTMENT_IDENTITY,
            saturation: ADJUSTMENT_IDENTITY,
            exposure: ADJUSTMENT_IDENTITY,
        }
    }
}

impl AdjustmentParams {
    /// Set one slider, clamped to its range.
    pub fn set(&mut self, kind: AdjustmentKind, value: u8) {
        let value = value.min(ADJUSTMENT_MAX);
        match kind {
            AdjustmentKind::Brightness => self.brightness = value,
            AdjustmentKind::Contrast => self.contrast = value,
            AdjustmentKind::Saturation => self.saturation = value,
            AdjustmentKind::Exposure => self.exposure = value,
        }
    }

    pub fn get(&self, kind: AdjustmentKind) -> u8 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
            AdjustmentKind::Exposure => self.exposure,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Filter one RGB triple (channels in `0.0..=1.0`). Every stage clamps.
    pub fn filter_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let saturation = f32::from(self.saturation) / 100.0;
        let exposure = f32::from(self.exposure) / 100.0;

        let rgb = rgb.map(|c| self.tone(c));
        let rgb = saturate(rgb, saturation);
        rgb.map(|c| (c * exposure).clamp(0.0, 1.0))
    }

    /// Brightness then contrast, both per channel.
    fn tone(&self, c: f32) -> f32 {
        let brightness = f32::from(self.brightness) / 100.0;
        let contrast = f32::from(self.contrast) / 100.0;
        let c = (c * brightness).clamp(0.0, 1.0);
        (c * contrast + 0.5 - 0.5 * contrast).clamp(0.0, 1.0)
    }

    /// Bake the filter chain into a buffer. Alpha is left alone.
    pub fn apply(&self, pixels: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        // Brightness and contrast only see one channel: table them.
        let before: Vec<f32> = (0..=255u8)
            .map(|v| self.tone(f32::from(v) / 255.0))
            .collect();
        let saturation = f32::from(self.saturation) / 100.0;
        let exposure = f32::from(self.exposure) / 100.0;

        for pixel in pixels.pixels_mut() {
            let rgb = [
                before[usize::from(pixel[0])],
                before[usize::from(pixel[1])],
                before[usize::from(pixel[2])],
            ];
            let out = saturate(rgb, saturation).map(|c| (c * exposure).clamp(0.0, 1.0));
            for c in 0..3 {
                pixel[c] = (out[c] * 255.0).round() as u8;
            }
        }
    }
}

/// Saturation matrix (1.0 = unchanged, 0.0 = greyscale).
fn saturate(rgb: [f32; 3], s: f32) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        ((LUMA_R + (1.0 - LUMA_R) * s) * r + (LUMA_G - LUMA_G * s) * g + (LUMA_B - LUMA_B * s) * b)
            .clamp(0.0, 1.0),
        ((LUMA_R - LUMA_R * s) * r + (LUMA_G + (1.0 - LUMA_G) * s) * g + (LUMA_B - LUMA_B * s) * b)
            .clamp(0.0, 1.0),
        ((LUMA_R - LUMA_R * s) * r + (LUMA_G - LUMA_G * s) * g + (LUMA_B + (1.0 - LUMA_B) * s) * b)
            .clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_leaves_pixels_alone() {
        let params = AdjustmentParams::default();
        assert!(close(params.filter_rgb([0.2, 0.5, 0.9]), [0.2, 0.5, 0.9]));
        let mut pixels = RgbaImage::from_pixel(2, 2, Rgba([10, 128, 250, 7]));
        let copy = pixels.clone();
        params.apply(&mut pixels);
        assert_eq!(pixels, copy);
    }

    #[test]
    fn exposure_stacks_on_brightness() {
        let mut params = AdjustmentParams::default();
        params.set(AdjustmentKind::Brightness, 50);
        params.set(AdjustmentKind::Exposure, 50);
        assert!(close(params.filter_rgb([0.8, 0.8, 0.8]), [0.2, 0.2, 0.2]));
    }

    #[test]
    fn zero_saturation_is_greyscale() {
        let mut params = AdjustmentParams::default();
        params.set(AdjustmentKind::Saturation, 0);
        let [r, g, b] = params.filter_rgb([1.0, 0.0, 0.0]);
        assert!((r - g).abs() < 1e-6 && (g - b).abs() < 1e-6);
        assert!((r - LUMA_R).abs() < 1e-6);
    }

    #[test]
    fn zero_contrast_is_mid_grey() {
        let mut params = AdjustmentParams::default();
        params.set(AdjustmentKind::Contrast, 0);
        assert!(close(params.filter_rgb([0.0, 0.3, 1.0]), [0.5, 0.5, 0.5]));
    }

    #[test]
    fn values_clamp_to_two_hundred() {
        let mut params = AdjustmentParams::default();
        params.set(AdjustmentKind::Contrast, 255);
        assert_eq!(params.get(AdjustmentKind::Contrast), 200);
    }

    #[test]
    fn apply_matches_filter_rgb() {
        let mut params = AdjustmentParams::default();
        params.set(AdjustmentKind::Brightness, 130);
        params.set(AdjustmentKind::Contrast, 80);
        params.set(AdjustmentKind::Saturation, 150);
        params.set(AdjustmentKind::Exposure, 90);
        let mut pixels = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        params.apply(&mut pixels);
        let expected = params.filter_rgb([200.0 / 255.0, 100.0 / 255.0, 50.0 / 255.0]);
        let got = pixels.get_pixel(0, 0);
        for c in 0..3 {
            assert_eq!(got[c], (expected[c] * 255.0).round() as u8);
        }
        assert_eq!(got[3], 255);
    }
}
