// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docscan.

use thiserror::Error;

/// Top-level error type for all docscan operations.
#[derive(Debug, Error)]
pub enum DocscanError {
    // -- Input errors --
    #[error("input image unreadable: {0}")]
    InputUnreadable(String),

    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    // -- Pipeline errors --
    #[error("no document found: none of the {candidates} largest contours simplify to 4 corners")]
    NoDocumentFound { candidates: usize },

    #[error("degenerate document geometry: output would be {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },

    // -- Output errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocscanError>;
