// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Editor constants that should not be changed by the user.

/// Rotation step in degrees (90 = quarter turn).
pub const ROTATION_STEP: u16 = 90;

/// Hard zoom bounds; configured bounds are clamped into this range.
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 8.0;

/// Minutes per degree (GPS coordinate conversion: DMS to decimal degrees).
pub const MINUTES_PER_DEGREE: f64 = 60.0;

/// Seconds per degree (GPS coordinate conversion: DMS to decimal degrees).
pub const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Identity value shared by all tonal adjustment sliders.
pub const ADJUSTMENT_IDENTITY: u8 = 100;

/// Upper bound of every tonal adjustment slider.
pub const ADJUSTMENT_MAX: u8 = 200;

/// Stroke thickness range in logical pixels.
pub const MIN_THICKNESS: u32 = 2;
pub const MAX_THICKNESS: u32 = 30;

/// Pixelate block size range in device pixels.
pub const MIN_BLOCK_SIZE: u32 = 4;
pub const MAX_BLOCK_SIZE: u32 = 40;

/// A pixelate stroke must be wider than this (logical pixels) to commit.
pub const PIXELATE_MIN_WIDTH: f64 = 1.0;

/// A crop stroke must be wider than this (logical pixels) to commit.
pub const CROP_MIN_WIDTH: f64 = 10.0;

/// Arrowhead back edges are offset this far from the shaft direction.
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Arrowhead length and font size are both this multiple of the thickness.
pub const THICKNESS_MULTIPLIER: f64 = 3.0;

/// Luminance weights used by the saturation filter (Rec. 709).
pub const LUMA_R: f32 = 0.213;
pub const LUMA_G: f32 = 0.715;
pub const LUMA_B: f32 = 0.072;

/// Mime type of every exported image.
pub const EXPORT_MIME: &str = "image/jpeg";

/// Config file name inside the per-user config directory.
pub const CONFIG_DIR: &str = "exhibit";
pub const CONFIG_FILE: &str = "config.toml";
