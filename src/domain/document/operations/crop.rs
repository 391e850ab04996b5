// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/crop.rs
//
// Crop operation domain model.

use image::imageops;
use kurbo::{Point, Rect};

use crate::constant::CROP_MIN_WIDTH;
use crate::domain::document::Surface;
use crate::domain::document::surface::{device_extent, snap};

/// Crop region in logical pixel coordinates.
///
/// Pure domain model - represents a rectangular region to crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Region spanned by a drag, intersected with a `bounds_w × bounds_h`
    /// surface. The drag must be wider than the crop threshold.
    pub fn from_drag(start: Point, end: Point, bounds_w: u32, bounds_h: u32) -> Option<Self> {
        let rect = Rect::from_points(start, end);
        if rect.width() <= CROP_MIN_WIDTH {
            return None;
        }
        let bounds = Rect::new(0.0, 0.0, f64::from(bounds_w), f64::from(bounds_h));
        let clipped = rect.intersect(bounds);
        // Round both edges; the size is their difference.
        let x = snap(clipped.x0).round();
        let y = snap(clipped.y0).round();
        let width = snap(clipped.x1).round().min(f64::from(bounds_w)) - x;
        let height = snap(clipped.y1).round().min(f64::from(bounds_h)) - y;
        let region = Self::new(x as u32, y as u32, width.max(0.0) as u32, height.max(0.0) as u32);
        region.is_valid().then_some(region)
    }

    /// Check if region has valid dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Crop to the rectangle spanned by `start` and `end` (logical points).
///
/// The surface is replaced wholesale: logical size and buffer both become
/// the cropped region. Returns `None` when the drag is too narrow or misses
/// the surface.
#[must_use]
pub fn commit_crop(surface: &Surface, start: Point, end: Point) -> Option<Surface> {
    let Some(region) = CropRegion::from_drag(
        start,
        end,
        surface.logical_width(),
        surface.logical_height(),
    ) else {
        log::debug!("Crop rejected for drag {start:?} -> {end:?}");
        return None;
    };
    crop_to(surface, region)
}

/// Crop to an explicit logical region.
#[must_use]
pub fn crop_to(surface: &Surface, region: CropRegion) -> Option<Surface> {
    if !region.is_valid() {
        return None;
    }
    let scale = surface.device_scale();
    let (buf_w, buf_h) = surface.pixels().dimensions();
    let dev_w = device_extent(region.width, scale).min(buf_w);
    let dev_h = device_extent(region.height, scale).min(buf_h);
    let dev_x = ((f64::from(region.x) * scale).round() as u32).min(buf_w - dev_w);
    let dev_y = ((f64::from(region.y) * scale).round() as u32).min(buf_h - dev_h);

    let pixels = imageops::crop_imm(surface.pixels(), dev_x, dev_y, dev_w, dev_h).to_image();
    let cropped = surface.replaced(region.width, region.height, pixels)?;
    log::info!(
        "Cropped to {}x{} at ({}, {})",
        region.width,
        region.height,
        region.x,
        region.y
    );
    Some(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32, scale: f64) -> Surface {
        let dw = device_extent(w, scale);
        let dh = device_extent(h, scale);
        let pixels = RgbaImage::from_fn(dw, dh, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        Surface::new(w, h, scale, pixels).unwrap()
    }

    #[test]
    fn crop_replaces_dimensions_and_pixels() {
        let source = gradient(200, 100, 1.0);
        let out = commit_crop(&source, Point::new(20.0, 10.0), Point::new(70.0, 40.0)).unwrap();
        assert_eq!((out.logical_width(), out.logical_height()), (50, 30));
        assert_eq!(out.pixels().dimensions(), (50, 30));
        assert_eq!(*out.pixels().get_pixel(0, 0), Rgba([20, 10, 0, 255]));
    }

    #[test]
    fn crop_at_device_resolution() {
        let source = gradient(100, 100, 2.0);
        let out = commit_crop(&source, Point::new(70.0, 60.0), Point::new(10.0, 20.0)).unwrap();
        assert_eq!((out.logical_width(), out.logical_height()), (60, 40));
        assert_eq!(out.pixels().dimensions(), (120, 80));
        assert_eq!(*out.pixels().get_pixel(0, 0), Rgba([20, 40, 0, 255]));
    }

    #[test]
    fn narrow_drag_is_rejected() {
        let source = gradient(100, 100, 1.0);
        assert!(commit_crop(&source, Point::new(10.0, 10.0), Point::new(20.0, 90.0)).is_none());
        assert!(commit_crop(&source, Point::new(10.0, 10.0), Point::new(20.5, 90.0)).is_some());
    }

    #[test]
    fn flat_drag_is_rejected() {
        let source = gradient(100, 100, 1.0);
        assert!(commit_crop(&source, Point::new(10.0, 10.0), Point::new(80.0, 10.2)).is_none());
    }

    #[test]
    fn drag_past_the_edge_is_clipped() {
        let source = gradient(100, 80, 1.0);
        let out = commit_crop(&source, Point::new(60.0, -20.0), Point::new(150.0, 50.0)).unwrap();
        assert_eq!((out.logical_width(), out.logical_height()), (40, 50));
    }

    #[test]
    fn fractional_drag_keeps_both_edges() {
        let region = CropRegion::from_drag(Point::new(10.9, 4.4), Point::new(21.3, 30.6), 100, 100).unwrap();
        assert_eq!(region, CropRegion::new(11, 4, 10, 27));

        let source = gradient(100, 100, 1.0);
        let out = commit_crop(&source, Point::new(10.9, 4.4), Point::new(21.3, 30.6)).unwrap();
        assert_eq!((out.logical_width(), out.logical_height()), (10, 27));
        assert_eq!(*out.pixels().get_pixel(0, 0), Rgba([11, 4, 0, 255]));
        assert_eq!(*out.pixels().get_pixel(9, 26), Rgba([20, 30, 0, 255]));
    }

    #[test]
    fn region_helpers() {
        let region = CropRegion::new(1, 2, 3, 4);
        assert!(region.is_valid());
        assert!(!CropRegion::new(0, 0, 0, 4).is_valid());
    }
}
