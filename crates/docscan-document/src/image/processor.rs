// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decoding, the detection working copy, grayscale conversion
// and encoding. Operates on in-memory images using the `image` crate.

use docscan_core::error::DocscanError;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use tracing::{debug, info, instrument};

/// Image helper wrapping a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let png = ImageProcessor::open("receipt.jpg")?
///     .grayscale()
///     .to_png_bytes()?;
/// ```
#[derive(Debug)]
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DocscanError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            DocscanError::InputUnreadable(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        ensure_not_empty(&img)?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocscanError> {
        let img = image::load_from_memory(data).map_err(|err| {
            DocscanError::InputUnreadable(format!("failed to decode image: {}", err))
        })?;
        ensure_not_empty(&img)?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert the image to single-channel 8-bit luma.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        debug!("Converting to grayscale");
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, DocscanError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, DocscanError> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        // JPEG has no alpha; grayscale stays single-channel.
        let result = match &self.image {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        result.map_err(|err| DocscanError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), DocscanError> {
        self.image.save(path.as_ref()).map_err(|err| {
            DocscanError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Reject images with no pixels before they reach the pipeline.
pub fn ensure_not_empty(image: &DynamicImage) -> Result<(), DocscanError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DocscanError::InputUnreadable(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Single-channel working copy of `image`, at most `target_height` rows tall.
///
/// Borrows the original so the full-resolution image is never cloned.
pub fn luma_working_copy(image: &DynamicImage, target_height: u32) -> GrayImage {
    let (width, height) = (image.width(), image.height());
    if target_height == 0 || height <= target_height {
        return image.to_luma8();
    }
    let target_width = working_width(width, height, target_height);
    image
        .resize_exact(target_width, target_height, FilterType::Triangle)
        .to_luma8()
}

/// Width of a working copy `target_height` rows tall, truncated, never zero.
pub fn working_width(width: u32, height: u32, target_height: u32) -> u32 {
    let scaled = width as u64 * target_height as u64 / height.max(1) as u64;
    (scaled as u32).max(1)
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, DocscanError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        DocscanError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
