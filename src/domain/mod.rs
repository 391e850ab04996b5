// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// UI-free models and algorithms.

pub mod document;
pub mod metadata;
pub mod view;
