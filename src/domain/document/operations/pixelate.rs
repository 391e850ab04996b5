// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/pixelate.rs
//
// Block redaction: area-average the selection down to a coarse grid, then
// paint the grid back with nearest-neighbour sampling.

use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect};

use crate::constant::PIXELATE_MIN_WIDTH;
use crate::domain::document::Surface;

/// Size of the block grid for a device rect: `max(1, extent / block_size)`
/// along each axis.
pub fn grid_size(rect_width: u32, rect_height: u32, block_size: u32) -> (u32, u32) {
    let block = block_size.max(1);
    ((rect_width / block).max(1), (rect_height / block).max(1))
}

/// Redact the rectangle spanned by `start` and `end` (logical points).
///
/// Returns `None` when the selection is not wider than one logical pixel or
/// lies outside the surface.
#[must_use]
pub fn commit_pixelate(surface: &Surface, start: Point, end: Point, block_size: u32) -> Option<Surface> {
    let logical = Rect::from_points(start, end);
    if logical.width() <= PIXELATE_MIN_WIDTH {
        log::debug!("Pixelate rejected: width {:.1} too small", logical.width());
        return None;
    }
    let (x, y, w, h) = surface.device_rect(logical)?;

    let mut out = surface.clone();
    pixelate_region(out.pixels_mut(), x, y, w, h, block_size);
    log::debug!("Pixelated device rect {x},{y} {w}x{h} with block {block_size}");
    Some(out)
}

/// Pixelate a device-pixel region in place.
///
/// Every pixel belongs to exactly one grid cell, so the region ends up with
/// at most `grid_w × grid_h` distinct colours.
pub fn pixelate_region(pixels: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, block_size: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let (grid_w, grid_h) = grid_size(w, h, block_size);
    let cell_of = |offset: u32, extent: u32, cells: u32| -> usize {
        (u64::from(offset) * u64::from(cells) / u64::from(extent)) as usize
    };

    // Downsample: area average per cell.
    let cells = (grid_w * grid_h) as usize;
    let mut sums = vec![[0u64; 4]; cells];
    let mut counts = vec![0u64; cells];
    for dy in 0..h {
        let row = cell_of(dy, h, grid_h) * grid_w as usize;
        for dx in 0..w {
            let cell = row + cell_of(dx, w, grid_w);
            let p = pixels.get_pixel(x + dx, y + dy);
            for c in 0..4 {
                sums[cell][c] += u64::from(p[c]);
            }
            counts[cell] += 1;
        }
    }
    let averages: Vec<Rgba<u8>> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            let n = count.max(1);
            Rgba([
                ((sum[0] + n / 2) / n) as u8,
                ((sum[1] + n / 2) / n) as u8,
                ((sum[2] + n / 2) / n) as u8,
                ((sum[3] + n / 2) / n) as u8,
            ])
        })
        .collect();

    // Upsample: nearest neighbour, no smoothing.
    for dy in 0..h {
        let row = cell_of(dy, h, grid_h) * grid_w as usize;
        for dx in 0..w {
            let cell = row + cell_of(dx, w, grid_w);
            pixels.put_pixel(x + dx, y + dy, averages[cell]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn noise(w: u32, h: u32) -> Surface {
        let pixels = RgbaImage::from_fn(w, h, |x, y| {
            let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503));
            Rgba([(v >> 3) as u8, (v >> 11) as u8, (v >> 19) as u8, 255])
        });
        Surface::new(w, h, 1.0, pixels).unwrap()
    }

    fn distinct_in(surface: &Surface, x: u32, y: u32, w: u32, h: u32) -> usize {
        let mut seen = HashSet::new();
        for py in y..y + h {
            for px in x..x + w {
                seen.insert(surface.pixels().get_pixel(px, py).0);
            }
        }
        seen.len()
    }

    #[test]
    fn grid_never_collapses_below_one_cell() {
        assert_eq!(grid_size(10, 3, 16), (1, 1));
        assert_eq!(grid_size(100, 50, 16), (6, 3));
    }

    #[test]
    fn distinct_colours_are_bounded_by_block_count() {
        let source = noise(200, 150);
        for (w, h, k) in [(100u32, 60u32, 16u32), (37, 91, 4), (50, 50, 40), (33, 17, 10)] {
            let out = commit_pixelate(
                &source,
                Point::new(10.0, 20.0),
                Point::new(10.0 + f64::from(w), 20.0 + f64::from(h)),
                k,
            )
            .unwrap();
            let bound = (w.div_ceil(k) * h.div_ceil(k)) as usize;
            let distinct = distinct_in(&out, 10, 20, w, h);
            assert!(distinct <= bound, "{w}x{h}/{k}: {distinct} > {bound}");
        }
    }

    #[test]
    fn outside_the_rect_is_untouched() {
        let source = noise(64, 64);
        let out = commit_pixelate(&source, Point::new(8.0, 8.0), Point::new(40.0, 40.0), 8).unwrap();
        for (x, y) in [(0, 0), (7, 20), (40, 40), (63, 5)] {
            assert_eq!(out.pixels().get_pixel(x, y), source.pixels().get_pixel(x, y));
        }
    }

    #[test]
    fn uniform_region_keeps_its_colour() {
        let pixels = RgbaImage::from_pixel(32, 32, Rgba([9, 99, 199, 255]));
        let surface = Surface::new(32, 32, 1.0, pixels).unwrap();
        let out = commit_pixelate(&surface, Point::new(0.0, 0.0), Point::new(32.0, 32.0), 4).unwrap();
        assert_eq!(out, surface);
    }

    #[test]
    fn reversed_drag_is_normalized() {
        let source = noise(64, 64);
        let forward = commit_pixelate(&source, Point::new(4.0, 4.0), Point::new(50.0, 30.0), 8);
        let backward = commit_pixelate(&source, Point::new(50.0, 30.0), Point::new(4.0, 4.0), 8);
        assert_eq!(forward, backward);
    }

    #[test]
    fn narrow_selection_is_rejected() {
        let source = noise(64, 64);
        assert!(commit_pixelate(&source, Point::new(10.0, 0.0), Point::new(11.0, 60.0), 8).is_none());
        assert!(commit_pixelate(&source, Point::new(10.0, 0.0), Point::new(10.0, 60.0), 8).is_none());
    }

    #[test]
    fn selection_off_surface_is_rejected() {
        let source = noise(64, 64);
        assert!(commit_pixelate(&source, Point::new(100.0, 0.0), Point::new(200.0, 60.0), 8).is_none());
    }
}
