// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification stage — map the detected quadrilateral back to full
// resolution, order its corners, size the output rectangle, and warp.

use docscan_core::error::DocscanError;
use docscan_core::{CornerSet, OutputDimensions, Point, Resampling, ScaleRatio, ScanConfig};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

/// Rectified page plus the geometry that produced it.
#[derive(Debug, Clone)]
pub struct Rectified {
    pub image: DynamicImage,
    /// Corners in original-image space.
    pub corners: CornerSet,
    pub dimensions: OutputDimensions,
}

/// Third pipeline stage: perspective correction on the full-resolution image.
#[derive(Debug, Clone)]
pub struct PerspectiveRectifier {
    interpolation: Interpolation,
    fill: [u8; 3],
}

impl PerspectiveRectifier {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            interpolation: to_interpolation(config.interpolation),
            fill: config.fill,
        }
    }

    /// Rectify `original` given four corners detected at working resolution.
    #[instrument(skip_all, fields(ratio = ratio.value(), black_and_white))]
    pub fn rectify(
        &self,
        original: &DynamicImage,
        quad: [Point; 4],
        ratio: ScaleRatio,
        black_and_white: bool,
    ) -> Result<Rectified, DocscanError> {
        let scaled = quad.map(|p| ratio.apply(p));
        let corners = CornerSet::from_unordered(scaled);
        debug!(
            top_left = ?corners.top_left,
            top_right = ?corners.top_right,
            bottom_right = ?corners.bottom_right,
            bottom_left = ?corners.bottom_left,
            "Corners ordered in original space"
        );
        self.warp_corners(original, &corners, black_and_white)
    }

    /// Warp the region bounded by `corners` (original-image space) into an
    /// axis-aligned rectangle.
    #[instrument(skip_all, fields(black_and_white))]
    pub fn warp_corners(
        &self,
        original: &DynamicImage,
        corners: &CornerSet,
        black_and_white: bool,
    ) -> Result<Rectified, DocscanError> {
        let dimensions = OutputDimensions::from_corners(corners);
        let degenerate = DocscanError::DegenerateGeometry {
            width: dimensions.width,
            height: dimensions.height,
        };
        if dimensions.is_degenerate() {
            warn!(
                width = dimensions.width,
                height = dimensions.height,
                "Refusing to warp into an empty rectangle"
            );
            return Err(degenerate);
        }
        if corners.has_shared_corner() {
            warn!("Corner heuristic assigned one point to several labels");
            return Err(degenerate);
        }

        let src = corners.to_array().map(Point::to_f32_pair);
        let dst = dimensions.destination_corners().map(Point::to_f32_pair);
        let projection = Projection::from_control_points(src, dst).ok_or_else(|| {
            warn!("Projective transform is singular");
            degenerate
        })?;

        let warped = self.warp(original, &projection, dimensions);
        let image = if black_and_white {
            DynamicImage::ImageLuma8(warped.to_luma8())
        } else {
            warped
        };

        info!(
            width = dimensions.width,
            height = dimensions.height,
            channels = image.color().channel_count(),
            "Perspective correction applied"
        );
        Ok(Rectified {
            image,
            corners: *corners,
            dimensions,
        })
    }

    /// Inverse-mapped warp of the full image into a `dimensions`-sized canvas.
    /// Alpha is kept only when the source has it.
    fn warp(
        &self,
        original: &DynamicImage,
        projection: &Projection,
        dimensions: OutputDimensions,
    ) -> DynamicImage {
        let [r, g, b] = self.fill;
        if original.color().has_alpha() {
            let source = original.to_rgba8();
            let mut output = RgbaImage::new(dimensions.width, dimensions.height);
            warp_into(
                &source,
                projection,
                self.interpolation,
                Rgba([r, g, b, 255]),
                &mut output,
            );
            DynamicImage::ImageRgba8(output)
        } else {
            let source = original.to_rgb8();
            let mut output = RgbImage::new(dimensions.width, dimensions.height);
            warp_into(
                &source,
                projection,
                self.interpolation,
                Rgb([r, g, b]),
                &mut output,
            );
            DynamicImage::ImageRgb8(output)
        }
    }
}

fn to_interpolation(resampling: Resampling) -> Interpolation {
    match resampling {
        Resampling::Nearest => Interpolation::Nearest,
        Resampling::Bilinear => Interpolation::Bilinear,
        Resampling::Bicubic => Interpolation::Bicubic,
    }
}
