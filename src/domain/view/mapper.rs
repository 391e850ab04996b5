// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/view/mapper.rs
//
// Pointer coordinate mapping between viewport space and image-logical space.

use kurbo::{Affine, Point, Size, Vec2};

use super::transform::ViewTransform;

/// Area the surface is displayed in. The surface is centred inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Visual centre of the displayed surface in viewport coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Forward display composition:
/// `translate(center) ∘ scale(s) ∘ rotate(θ) ∘ flip(fx, fy)`, applied to a
/// logical point measured from the surface centre.
pub fn display_affine(view: &ViewTransform, center: Point, logical: Size) -> Affine {
    Affine::translate(center.to_vec2())
        * Affine::scale(view.scale())
        * Affine::rotate(view.rotation().radians())
        * Affine::scale_non_uniform(view.flip_horizontal(), view.flip_vertical())
        * Affine::translate(-Vec2::new(logical.width / 2.0, logical.height / 2.0))
}

/// Where a logical point appears in the viewport.
pub fn apply_display(point: Point, view: &ViewTransform, center: Point, logical: Size) -> Point {
    display_affine(view, center, logical) * point
}

/// Map a viewport pointer position to image-logical coordinates.
///
/// Exact inverse of [`apply_display`]. `logical` must be the surface's
/// current logical size, re-read after every crop.
pub fn map_to_logical(point: Point, view: &ViewTransform, center: Point, logical: Size) -> Point {
    // Relative to the visual centre, zoom removed.
    let d = (point - center) / view.scale();

    // Undo the rotation.
    let (sin, cos) = (-view.rotation().radians()).sin_cos();
    let rotated = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);

    // Mirroring is its own inverse.
    let unflipped = Vec2::new(
        rotated.x * view.flip_horizontal(),
        rotated.y * view.flip_vertical(),
    );

    Point::new(
        unflipped.x + logical.width / 2.0,
        unflipped.y + logical.height / 2.0,
    )
}
