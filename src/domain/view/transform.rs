// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/view/transform.rs
//
// View transform: zoom, quarter-turn rotation and mirroring.

use crate::constant::{MAX_SCALE, MIN_SCALE, ROTATION_STEP};

/// Quarter-turn rotation, clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Rotation in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Cw90 => ROTATION_STEP,
            Self::Cw180 => 2 * ROTATION_STEP,
            Self::Cw270 => 3 * ROTATION_STEP,
        }
    }

    /// Rotation angle in radians.
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// Next quarter turn clockwise: `(rotation + 90) mod 360`.
    pub fn rotate_cw(self) -> Self {
        match self {
            Self::None => Self::Cw90,
            Self::Cw90 => Self::Cw180,
            Self::Cw180 => Self::Cw270,
            Self::Cw270 => Self::None,
        }
    }

    /// True when width and height trade places on screen.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }
}

/// Display transform of the editing surface.
///
/// `scale` is clamped on every mutation and the flips are stored as `1.0` or
/// `-1.0` so they can be used directly as scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    rotation: Rotation,
    flip_horizontal: f64,
    flip_vertical: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(MIN_SCALE, MAX_SCALE)
    }
}

impl ViewTransform {
    /// Identity transform with the given zoom bounds.
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            scale: 1.0_f64.clamp(min_scale, max_scale),
            rotation: Rotation::None,
            flip_horizontal: 1.0,
            flip_vertical: 1.0,
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn flip_horizontal(&self) -> f64 {
        self.flip_horizontal
    }

    pub fn flip_vertical(&self) -> f64 {
        self.flip_vertical
    }

    /// Set the scale, clamped into the zoom bounds. Non-finite input is ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    /// Add `delta` to the scale, clamped into the zoom bounds.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_scale(self.scale + delta);
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.rotate_cw();
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Mirror left/right.
    pub fn toggle_flip_horizontal(&mut self) {
        self.flip_horizontal = -self.flip_horizontal;
    }

    /// Mirror top/bottom.
    pub fn toggle_flip_vertical(&mut self) {
        self.flip_vertical = -self.flip_vertical;
    }

    /// Set both mirror flags directly.
    pub fn set_flips(&mut self, horizontal: bool, vertical: bool) {
        self.flip_horizontal = if horizontal { -1.0 } else { 1.0 };
        self.flip_vertical = if vertical { -1.0 } else { 1.0 };
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal < 0.0
    }

    pub fn is_flipped_vertical(&self) -> bool {
        self.flip_vertical < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles_in_quarter_turns() {
        let mut view = ViewTransform::default();
        let seen: Vec<u16> = (0..5)
            .map(|_| {
                let d = view.rotation().degrees();
                view.rotate_cw();
                d
            })
            .collect();
        assert_eq!(seen, vec![0, 90, 180, 270, 0]);
    }

    #[test]
    fn scale_stays_clamped_for_any_delta_sequence() {
        let mut view = ViewTransform::new(0.5, 8.0);
        let deltas = [-0.1, -0.25, -3.0, 0.1, 20.0, 0.25, -0.1, 7.5, -100.0, f64::NAN, 0.3];
        for delta in deltas {
            view.zoom_by(delta);
            assert!((0.5..=8.0).contains(&view.scale()), "scale {} escaped", view.scale());
        }
        view.set_scale(f64::INFINITY);
        assert!((0.5..=8.0).contains(&view.scale()));
    }

    #[test]
    fn flips_are_self_inverse() {
        let mut view = ViewTransform::default();
        view.toggle_flip_horizontal();
        assert_eq!(view.flip_horizontal(), -1.0);
        assert!(view.is_flipped_horizontal());
        view.toggle_flip_horizontal();
        assert_eq!(view.flip_horizontal(), 1.0);
        view.toggle_flip_vertical();
        assert_eq!(view.flip_vertical(), -1.0);
    }
}
