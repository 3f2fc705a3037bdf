// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge detection, document contour selection, and
// perspective rectification.

pub mod contour;
pub mod edges;
pub mod rectify;
pub mod scanner;

pub use contour::DocumentContourFinder;
pub use edges::{EdgeDetector, EdgeMap};
pub use rectify::{PerspectiveRectifier, Rectified};
pub use scanner::{DocumentScanner, ScanOutcome, scan};
