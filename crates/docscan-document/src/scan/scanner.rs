// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — runs edge detection, contour selection and perspective
// rectification in sequence on one image.

use docscan_core::error::DocscanError;
use docscan_core::{CornerSet, OutputDimensions, Point, ScaleRatio, ScanConfig};
use image::DynamicImage;
use tracing::{info, instrument};

use super::contour::DocumentContourFinder;
use super::edges::EdgeDetector;
use super::rectify::PerspectiveRectifier;

/// Result of a scan, with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The flattened document.
    pub image: DynamicImage,
    /// Corners as detected on the working copy, in tracing order.
    pub working_quad: [Point; 4],
    /// Labelled corners in original-image space.
    pub corners: CornerSet,
    pub ratio: ScaleRatio,
    pub dimensions: OutputDimensions,
}

/// Flattens photographed documents.
///
/// Holds only validated configuration, so one scanner can be shared between
/// threads and reused for any number of images.
///
/// ```ignore
/// let scanner = DocumentScanner::new(ScanConfig::default())?;
/// let page = scanner.scan(&photo, true)?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    config: ScanConfig,
    detector: EdgeDetector,
    finder: DocumentContourFinder,
    rectifier: PerspectiveRectifier,
}

impl DocumentScanner {
    /// Build a scanner, rejecting invalid configuration.
    pub fn new(config: ScanConfig) -> Result<Self, DocscanError> {
        config.validate()?;
        Ok(Self {
            detector: EdgeDetector::from_config(&config),
            finder: DocumentContourFinder::from_config(&config),
            rectifier: PerspectiveRectifier::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Flatten the document in `image`; `black_and_white` selects a
    /// single-channel result.
    pub fn scan(
        &self,
        image: &DynamicImage,
        black_and_white: bool,
    ) -> Result<DynamicImage, DocscanError> {
        self.scan_detailed(image, black_and_white)
            .map(|outcome| outcome.image)
    }

    /// Like [`scan`](Self::scan), also returning the detected geometry.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), black_and_white))]
    pub fn scan_detailed(
        &self,
        image: &DynamicImage,
        black_and_white: bool,
    ) -> Result<ScanOutcome, DocscanError> {
        info!("Detecting edges");
        let edge_map = self.detector.detect(image)?;

        info!("Finding document contour");
        let working_quad = self.finder.find(&edge_map.edges)?;

        info!("Applying perspective transform");
        let rectified =
            self.rectifier
                .rectify(image, working_quad, edge_map.ratio, black_and_white)?;

        Ok(ScanOutcome {
            image: rectified.image,
            working_quad,
            corners: rectified.corners,
            ratio: edge_map.ratio,
            dimensions: rectified.dimensions,
        })
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        let config = ScanConfig::default();
        Self {
            detector: EdgeDetector::from_config(&config),
            finder: DocumentContourFinder::from_config(&config),
            rectifier: PerspectiveRectifier::from_config(&config),
            config,
        }
    }
}

/// Scan `image` with the default configuration.
pub fn scan(image: &DynamicImage, black_and_white: bool) -> Result<DynamicImage, DocscanError> {
    DocumentScanner::default().scan(image, black_and_white)
}
