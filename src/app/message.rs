// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Editor messages: pointer events, user actions, and their outcomes.

use kurbo::Point;

use crate::app::tool::ToolId;
use crate::domain::document::operations::AdjustmentKind;
use crate::domain::view::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    // Tools.
    SelectTool(ToolId),

    // Pointer input, in viewport coordinates.
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },

    // View / zoom.
    Wheel(f64),
    ZoomBy(f64),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Resize(Viewport),

    // Transformations.
    RotateCw,
    FlipHorizontal,
    FlipVertical,

    // Adjustments and style.
    SetAdjustment(AdjustmentKind, u8),
    SetThickness(u32),
    SetBlockSize(u32),
    SetColor(String),
    PickPalette(usize),

    // History.
    Undo,
}

/// Text stamp waiting for its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRequest {
    /// Baseline origin in logical coordinates.
    pub at: Point,
}

/// What handling a message did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// A new snapshot was pushed.
    Committed(ToolId),
    /// A guard rejected the stroke; nothing changed.
    Rejected(ToolId),
    /// Text was empty or the request was dropped.
    Discarded,
    /// The message has no effect in the current state.
    Ignored,
    /// Only the view, style, adjustments or stroke changed.
    ViewChanged,
    /// The host must supply text via `Editor::complete_text`.
    TextRequested(TextRequest),
    /// The last snapshot was removed.
    Undone,
}

impl CommitOutcome {
    /// Whether the history grew.
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}
