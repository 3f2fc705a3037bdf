// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge detection stage — downscale to a working height, grayscale, Gaussian
// blur and Canny, keeping the ratio back to full resolution.

use docscan_core::error::DocscanError;
use docscan_core::{ScaleRatio, ScanConfig};
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, info, instrument};

use crate::image::processor::{ensure_not_empty, luma_working_copy};

/// Binary edge map of the working copy plus the ratio back to the original.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    /// 0 / 255 edge image at working resolution.
    pub edges: GrayImage,
    /// `original_height / working_height`.
    pub ratio: ScaleRatio,
}

/// First pipeline stage.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    working_height: u32,
    sigma: f32,
    low_threshold: f32,
    high_threshold: f32,
}

impl EdgeDetector {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            working_height: config.working_height,
            sigma: config.effective_sigma(),
            low_threshold: config.canny_low,
            high_threshold: config.canny_high,
        }
    }

    /// Produce the edge map for `image`.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Result<EdgeMap, DocscanError> {
        ensure_not_empty(image)?;

        let ratio = ScaleRatio::between(image.height(), self.working_height);
        let gray = luma_working_copy(image, self.working_height);
        debug!(
            working_w = gray.width(),
            working_h = gray.height(),
            ratio = ratio.value(),
            "Working copy prepared"
        );

        let blurred = gaussian_blur_f32(&gray, self.sigma);
        let edges = canny(&blurred, self.low_threshold, self.high_threshold);

        let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
        info!(
            edge_pixels,
            sigma = self.sigma,
            low = self.low_threshold,
            high = self.high_threshold,
            "Edge detection complete"
        );

        Ok(EdgeMap { edges, ratio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn card(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([25, 25, 30]));
        for y in height / 5..height * 4 / 5 {
            for x in width / 5..width * 4 / 5 {
                img.put_pixel(x, y, Rgb([235, 235, 225]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn edge_map_has_working_dimensions() {
        let detector = EdgeDetector::from_config(&ScanConfig::default());
        let map = detector.detect(&card(600, 1000)).unwrap();
        assert_eq!(map.edges.dimensions(), (300, 500));
        assert!((map.ratio.value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn small_input_keeps_resolution_and_unit_ratio() {
        let detector = EdgeDetector::from_config(&ScanConfig::default());
        let map = detector.detect(&card(200, 150)).unwrap();
        assert_eq!(map.edges.dimensions(), (200, 150));
        assert_eq!(map.ratio.value(), 1.0);
    }

    #[test]
    fn edges_are_binary_and_present_for_a_card() {
        let detector = EdgeDetector::from_config(&ScanConfig::default());
        let map = detector.detect(&card(400, 400)).unwrap();
        assert!(map.edges.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(map.edges.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let detector = EdgeDetector::from_config(&ScanConfig::default());
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 300, Luma([255])));
        let map = detector.detect(&blank).unwrap();
        assert!(map.edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn empty_image_rejected_before_processing() {
        let detector = EdgeDetector::from_config(&ScanConfig::default());
        let empty = DynamicImage::ImageRgb8(RgbImage::new(10, 0));
        assert!(matches!(
            detector.detect(&empty),
            Err(DocscanError::InputUnreadable(_))
        ));
    }
}
