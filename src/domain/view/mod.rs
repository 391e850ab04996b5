// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/view/mod.rs
//
// View state: display transform and pointer mapping.

pub mod mapper;
pub mod transform;

pub use mapper::{Viewport, apply_display, display_affine, map_to_logical};
pub use transform::{Rotation, ViewTransform};
