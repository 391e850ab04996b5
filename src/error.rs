// SPDX-License-Identifier: GPL-3.0-or-later
// src/error.rs
//
// Editor-level error type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The source image is still decoding.
    #[error("image is still loading")]
    NotReady,

    /// The source image could not be decoded; the editor stays unusable.
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("failed to encode export: {0}")]
    Encode(String),
}
