// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocscanError, Result};
use crate::types::Resampling;

/// Algorithm parameters for a scan. `Default` gives the classic values
/// (500 px working height, 5x5 blur, Canny 75/200, 2% tolerance, top 5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Height of the downscaled working copy used for detection.
    pub working_height: u32,
    /// Side of the (square, odd) Gaussian kernel.
    pub blur_kernel_size: u32,
    /// Explicit Gaussian sigma. `None` derives it from the kernel size.
    pub blur_sigma: Option<f32>,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// How many of the largest contours are tried before giving up.
    pub candidate_pool: usize,
    /// Resampling used by the perspective warp.
    pub interpolation: Resampling,
    /// RGB value for output pixels that map outside the source image.
    pub fill: [u8; 3],
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            working_height: 500,
            blur_kernel_size: 5,
            blur_sigma: None,
            canny_low: 75.0,
            canny_high: 200.0,
            approx_epsilon_fraction: 0.02,
            candidate_pool: 5,
            interpolation: Resampling::Bilinear,
            fill: [0, 0, 0],
        }
    }
}

impl ScanConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Gaussian sigma actually used: the explicit value, or the conventional
    /// derivation `0.3 * ((k - 1) * 0.5 - 1) + 0.8` for kernel side `k`.
    pub fn effective_sigma(&self) -> f32 {
        match self.blur_sigma {
            Some(sigma) => sigma,
            None => 0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8,
        }
    }

    /// Reject parameter combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.working_height == 0 {
            return Err(invalid("working_height must be at least 1"));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(invalid(format!(
                "blur_kernel_size must be odd, got {}",
                self.blur_kernel_size
            )));
        }
        if let Some(sigma) = self.blur_sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(invalid(format!("blur_sigma must be positive, got {sigma}")));
            }
        }
        // Kernel size 1 derives sigma 0.5, still positive.
        if !(self.canny_low.is_finite() && self.canny_high.is_finite()) {
            return Err(invalid("canny thresholds must be finite"));
        }
        if self.canny_low < 0.0 || self.canny_low > self.canny_high {
            return Err(invalid(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.approx_epsilon_fraction > 0.0 && self.approx_epsilon_fraction < 1.0) {
            return Err(invalid(format!(
                "approx_epsilon_fraction must lie in (0, 1), got {}",
                self.approx_epsilon_fraction
            )));
        }
        if self.candidate_pool == 0 {
            return Err(invalid("candidate_pool must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> DocscanError {
    DocscanError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.working_height, 500);
        assert_eq!(config.candidate_pool, 5);
    }

    #[test]
    fn derived_sigma_for_5x5_kernel() {
        let sigma = ScanConfig::default().effective_sigma();
        assert!((sigma - 1.1).abs() < 1e-6, "got {sigma}");

        let explicit = ScanConfig {
            blur_sigma: Some(2.5),
            ..Default::default()
        };
        assert_eq!(explicit.effective_sigma(), 2.5);
    }

    #[test]
    fn even_kernel_rejected() {
        let config = ScanConfig {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DocscanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = ScanConfig {
            canny_low: 200.0,
            canny_high: 75.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_pool_and_bad_epsilon_rejected() {
        let pool = ScanConfig {
            candidate_pool: 0,
            ..Default::default()
        };
        assert!(pool.validate().is_err());

        let epsilon = ScanConfig {
            approx_epsilon_fraction: 0.0,
            ..Default::default()
        };
        assert!(epsilon.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ScanConfig::from_json_str(r#"{"working_height": 800, "interpolation": "nearest"}"#)
                .unwrap();
        assert_eq!(config.working_height, 800);
        assert_eq!(config.interpolation, Resampling::Nearest);
        assert_eq!(config.canny_high, 200.0);
    }

    #[test]
    fn invalid_json_values_rejected() {
        let err = ScanConfig::from_json_str(r#"{"candidate_pool": 0}"#).unwrap_err();
        assert!(matches!(err, DocscanError::InvalidConfig(_)));

        let err = ScanConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, DocscanError::Serialization(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"canny_low": 50.0, "canny_high": 150.0}}"#).unwrap();
        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.canny_low, 50.0);
        assert_eq!(config.canny_high, 150.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScanConfig::from_json_file("/nonexistent/docscan.json").unwrap_err();
        assert!(matches!(err, DocscanError::Io(_)));
    }
}
