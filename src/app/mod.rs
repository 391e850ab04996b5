// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Interactive editor: tool state, messages and the update loop.

pub mod editor;
pub mod message;
pub mod prompt;
pub mod tool;

pub use editor::{Editor, EditorHost};
pub use message::{CommitOutcome, EditorMessage, TextRequest};
pub use prompt::{ChannelPrompt, FixedPrompt, PendingText, TextPrompt};
pub use tool::{ToolController, ToolId};
