// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Landreg.

use thiserror::Error;

/// Top-level error type for all Landreg operations.
///
/// The document classifier never surfaces these to its callers; it folds them
/// into a zero-confidence result. Probe and configuration APIs return them.
#[derive(Debug, Error)]
pub enum LandregError {
    // -- Image probe --
    #[error("image resource does not exist: {0}")]
    ResourceMissing(String),

    #[error("could not decode image dimensions: {0}")]
    DimensionDecode(String),

    // -- Configuration --
    #[error("invalid classifier configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal verification fault: {0}")]
    Internal(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LandregError>;
