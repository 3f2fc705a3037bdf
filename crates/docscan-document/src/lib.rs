// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Document scanning for docscan.
//
// Provides image helpers (decode, downscale, grayscale, encode) and the scan
// pipeline: Canny edge detection on a downscaled working copy, selection of
// the largest four-cornered contour, and perspective rectification of the
// full-resolution photo.

pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `docscan_document::DocumentScanner` etc.
pub use crate::image::processor::ImageProcessor;
pub use scan::scanner::{DocumentScanner, ScanOutcome, scan};
