// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/font.rs
//
// Glyph faces for text stamps: a configured or system outline font, with a
// built-in 5x7 bitmap face as the last resort.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use anyhow::Context;
use font_kit::family_name::FamilyName;
use font_kit::properties::{Properties, Weight};
use font_kit::source::SystemSource;
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect};

use super::DocResult;
use super::operations::{blend_pixel, fill_where};

/// Cap height of the bitmap face relative to the font size.
const BITMAP_CAP_HEIGHT: f64 = 0.72;

/// Face used to rasterize text.
#[derive(Clone, Default)]
pub enum GlyphFace {
    #[default]
    Bitmap,
    Outline(FontArc),
}

impl std::fmt::Debug for GlyphFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitmap => write!(f, "GlyphFace::Bitmap"),
            Self::Outline(_) => write!(f, "GlyphFace::Outline(..)"),
        }
    }
}

impl GlyphFace {
    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path) -> DocResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| anyhow::anyhow!("Invalid font {}: {e}", path.display()))?;
        Ok(Self::Outline(font))
    }

    /// Bold sans-serif face from the system font store.
    pub fn system() -> Option<Self> {
        let mut props = Properties::new();
        props.weight = Weight::BOLD;
        let handle = SystemSource::new()
            .select_best_match(
                &[FamilyName::Title("Arial".to_string()), FamilyName::SansSerif],
                &props,
            )
            .ok()?;
        let data = handle.load().ok()?.copy_font_data()?;
        let font = FontArc::try_from_vec((*data).clone()).ok()?;
        Some(Self::Outline(font))
    }

    /// Load the configured font, else a system face, else the bitmap face.
    pub fn load_or_bitmap(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(face) => return face,
                Err(e) => log::warn!("{e:#}; trying a system font"),
            }
        }
        Self::system().unwrap_or_else(|| {
            log::warn!("No system sans-serif font found; using built-in bitmap face");
            Self::Bitmap
        })
    }

    /// Draw `text` left-aligned with its baseline starting at `origin`
    /// (device pixels). `size` is the font size in device pixels.
    pub fn draw(&self, pixels: &mut RgbaImage, text: &str, origin: Point, size: f64, color: Rgba<u8>) {
        match self {
            Self::Bitmap => draw_bitmap(pixels, text, origin, size, color),
            Self::Outline(font) => draw_outline(font, pixels, text, origin, size, color),
        }
    }
}

fn draw_outline(font: &FontArc, pixels: &mut RgbaImage, text: &str, origin: Point, size: f64, color: Rgba<u8>) {
    let scale = PxScale::from(size as f32);
    let scaled = font.as_scaled(scale);
    let (width, height) = pixels.dimensions();
    let mut caret = origin.x as f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, origin.y as f32));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + i64::from(gx);
            let y = bounds.min.y as i64 + i64::from(gy);
            if x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height) {
                blend_pixel(pixels.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        });
    }
}

fn draw_bitmap(pixels: &mut RgbaImage, text: &str, origin: Point, size: f64, color: Rgba<u8>) {
    let module = (size * BITMAP_CAP_HEIGHT / 7.0).max(1.0);
    let mut left = origin.x;
    let top = origin.y - 7.0 * module;

    for ch in text.chars() {
        let rows = glyph5x7(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (1 << (4 - col)) == 0 {
                    continue;
                }
                let x0 = left + f64::from(col) * module;
                let y0 = top + row as f64 * module;
                let cell = Rect::new(x0, y0, x0 + module, y0 + module);
                fill_where(pixels, cell, color, |p| cell.contains(p));
            }
        }
        left += 6.0 * module;
    }
}

/// 5x7 glyph rows (bit 4 = leftmost). Letters are folded to upper case;
/// anything unknown renders as an empty box.
fn glyph5x7(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0; 7],
        '.' => [0, 0, 0, 0, 0, 0b01100, 0b01100],
        ',' => [0, 0, 0, 0, 0b01100, 0b00100, 0b01000],
        ':' => [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        '_' => [0, 0, 0, 0, 0, 0, 0b11111],
        '+' => [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0],
        '=' => [0, 0, 0b11111, 0, 0b11111, 0, 0],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '%' => [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011],
        '\'' => [0b00100, 0b00100, 0b01000, 0, 0, 0, 0],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}
