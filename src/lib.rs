// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Annotation and redaction editor for evidence photos.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;
pub mod error;

pub use app::{CommitOutcome, Editor, EditorHost, EditorMessage, ToolId};
pub use config::AppConfig;
pub use domain::document::{EncodedImage, Surface};
pub use error::EditorError;
