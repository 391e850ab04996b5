// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/tool.rs
//
// Active tool and in-progress stroke tracking.

use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolId {
    #[default]
    Adjust,
    Transform,
    Arrow,
    Text,
    Pixelate,
    Crop,
}

impl ToolId {
    pub const ALL: [ToolId; 6] = [
        ToolId::Adjust,
        ToolId::Transform,
        ToolId::Arrow,
        ToolId::Text,
        ToolId::Pixelate,
        ToolId::Crop,
    ];

    /// Whether pointer strokes mean anything for this tool.
    pub fn draws(self) -> bool {
        matches!(self, ToolId::Arrow | ToolId::Text | ToolId::Pixelate | ToolId::Crop)
    }

    /// Whether the tool shows a selection rectangle while dragging.
    pub fn selects_rect(self) -> bool {
        matches!(self, ToolId::Pixelate | ToolId::Crop)
    }
}

/// Stroke being drawn, in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stroke {
    pub start: Point,
    pub current: Point,
    pub active: bool,
}

/// A finished stroke, ready to be committed by the tool that drew it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedStroke {
    pub tool: ToolId,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Default)]
pub struct ToolController {
    tool: ToolId,
    stroke: Stroke,
}

impl ToolController {
    pub fn new(tool: ToolId) -> Self {
        Self {
            tool,
            stroke: Stroke::default(),
        }
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    /// Switch tools. Any stroke in progress is dropped uncommitted.
    pub fn select(&mut self, tool: ToolId) {
        if self.stroke.active {
            log::debug!("Discarding {:?} stroke on switch to {tool:?}", self.tool);
        }
        self.tool = tool;
        self.stroke = Stroke::default();
    }

    /// Begin a stroke. Returns `false` when the active tool ignores pointers.
    pub fn pointer_down(&mut self, at: Point) -> bool {
        if !self.tool.draws() {
            return false;
        }
        self.stroke = Stroke {
            start: at,
            current: at,
            active: true,
        };
        true
    }

    pub fn pointer_move(&mut self, at: Point) -> bool {
        if !self.stroke.active {
            return false;
        }
        self.stroke.current = at;
        true
    }

    /// Finish the stroke. `at` becomes its end point.
    pub fn pointer_up(&mut self, at: Point) -> Option<CompletedStroke> {
        if !self.stroke.active {
            return None;
        }
        let completed = CompletedStroke {
            tool: self.tool,
            start: self.stroke.start,
            end: at,
        };
        self.stroke = Stroke::default();
        Some(completed)
    }

    /// Drop the current stroke without committing.
    pub fn cancel(&mut self) {
        self.stroke = Stroke::default();
    }

    /// Normalised selection rectangle while a Pixelate or Crop drag is active.
    pub fn preview_rect(&self) -> Option<Rect> {
        (self.stroke.active && self.tool.selects_rect())
            .then(|| Rect::from_points(self.stroke.start, self.stroke.current))
    }
}
