// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/mod.rs
//
// Document model: the editable surface, its history, per-tool operations
// and the export compositor.

pub mod compositor;
pub mod font;
pub mod history;
pub mod operations;
pub mod surface;

pub use compositor::EncodedImage;
pub use font::GlyphFace;
pub use history::HistoryStack;
pub use surface::Surface;

/// Result type for document-level operations.
pub type DocResult<T> = anyhow::Result<T>;
