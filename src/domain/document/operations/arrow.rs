// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/arrow.rs
//
// Arrow annotation: a round-capped shaft plus a filled triangular head.

use kurbo::{Line, ParamCurveNearest, Point, Rect, Vec2};

use super::{StrokeStyle, fill_where};
use crate::constant::{ARROW_HEAD_ANGLE, THICKNESS_MULTIPLIER};
use crate::domain::document::Surface;

/// The three corners of the arrowhead (tip first), in the same space as
/// `start` and `end`.
pub fn arrow_head(start: Point, end: Point, head_length: f64) -> [Point; 3] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let back = |offset: f64| {
        Point::new(
            end.x - head_length * (angle + offset).cos(),
            end.y - head_length * (angle + offset).sin(),
        )
    };
    [end, back(-ARROW_HEAD_ANGLE), back(ARROW_HEAD_ANGLE)]
}

/// Draw an arrow from `start` to `end` (logical points). A zero-length
/// stroke still leaves a dot and a small head.
#[must_use]
pub fn commit_arrow(surface: &Surface, start: Point, end: Point, style: &StrokeStyle) -> Surface {
    let mut out = surface.clone();
    let scale = surface.device_scale();
    let a = surface.to_device(start);
    let b = surface.to_device(end);
    let thickness = f64::from(style.thickness) * scale;
    let radius = thickness / 2.0;

    // Shaft: every pixel within half the thickness of the segment.
    let shaft = Line::new(a, b);
    let shaft_bounds = Rect::from_points(a, b).inflate(radius + 1.0, radius + 1.0);
    let radius_sq = radius * radius;
    fill_where(out.pixels_mut(), shaft_bounds, style.color, |p| {
        shaft.nearest(p, 1e-6).distance_sq <= radius_sq
    });

    // Head.
    let head = arrow_head(a, b, THICKNESS_MULTIPLIER * thickness);
    let head_bounds = Rect::from_points(head[0], head[1]).union_pt(head[2]);
    fill_where(out.pixels_mut(), head_bounds, style.color, |p| {
        inside_triangle(p, &head)
    });

    log::debug!("Arrow committed from {start:?} to {end:?}");
    out
}

fn edge(a: Point, b: Point, p: Point) -> f64 {
    let ab: Vec2 = b - a;
    let ap: Vec2 = p - a;
    ab.cross(ap)
}

fn inside_triangle(p: Point, tri: &[Point; 3]) -> bool {
    let w0 = edge(tri[1], tri[2], p);
    let w1 = edge(tri[2], tri[0], p);
    let w2 = edge(tri[0], tri[1], p);
    (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0)
}
