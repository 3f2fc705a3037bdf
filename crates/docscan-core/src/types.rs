// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometry types for the docscan pipeline.

use serde::{Deserialize, Serialize};

/// A point in image coordinates (x to the right, y downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn to_f32_pair(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// Factor mapping working-image coordinates back to the original image.
///
/// Always `>= 1.0`: the working copy is never larger than the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRatio(f64);

impl ScaleRatio {
    /// Ratio for a working copy of `working_height` rows taken from an
    /// original of `original_height` rows. Clamps to 1.0 when the working copy
    /// would be an upscale.
    pub fn between(original_height: u32, working_height: u32) -> Self {
        if working_height == 0 || working_height >= original_height {
            return Self::identity();
        }
        Self(original_height as f64 / working_height as f64)
    }

    pub const fn identity() -> Self {
        Self(1.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Map a working-space point into original-image space.
    pub fn apply(&self, point: Point) -> Point {
        point.scaled(self.0)
    }
}

/// The four document corners, labelled by position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl CornerSet {
    /// Label four points by the sum/difference heuristic.
    ///
    /// The smallest `x + y` becomes top-left and the largest bottom-right; the
    /// smallest `y - x` becomes top-right and the largest bottom-left. Input
    /// order is irrelevant. Ties resolve to the earliest point. Only reliable
    /// for convex, roughly axis-aligned quadrilaterals: a quad rotated near 45
    /// degrees can give two labels the same point.
    pub fn from_unordered(points: [Point; 4]) -> Self {
        let sum = |p: &Point| p.x + p.y;
        let diff = |p: &Point| p.y - p.x;

        Self {
            top_left: points[argmin(&points, sum)],
            top_right: points[argmin(&points, diff)],
            bottom_right: points[argmax(&points, sum)],
            bottom_left: points[argmax(&points, diff)],
        }
    }

    /// Corners in `[tl, tr, br, bl]` order.
    pub fn to_array(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// `true` when the heuristic assigned the same source point to more than
    /// one label.
    pub fn has_shared_corner(&self) -> bool {
        let corners = self.to_array();
        (0..4).any(|i| ((i + 1)..4).any(|j| corners[i] == corners[j]))
    }
}

/// First index holding the minimum key.
fn argmin(points: &[Point; 4], key: impl Fn(&Point) -> f64) -> usize {
    let mut best = 0;
    for i in 1..points.len() {
        if key(&points[i]) < key(&points[best]) {
            best = i;
        }
    }
    best
}

/// First index holding the maximum key.
fn argmax(points: &[Point; 4], key: impl Fn(&Point) -> f64) -> usize {
    let mut best = 0;
    for i in 1..points.len() {
        if key(&points[i]) > key(&points[best]) {
            best = i;
        }
    }
    best
}

/// Size of the rectified output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDimensions {
    pub width: u32,
    pub height: u32,
}

impl OutputDimensions {
    /// Width is the longer of the top and bottom edges, height the longer of
    /// the left and right edges. Each edge length is truncated before the
    /// comparison.
    pub fn from_corners(corners: &CornerSet) -> Self {
        let top = corners.top_left.distance(&corners.top_right) as u32;
        let bottom = corners.bottom_left.distance(&corners.bottom_right) as u32;
        let left = corners.top_left.distance(&corners.bottom_left) as u32;
        let right = corners.top_right.distance(&corners.bottom_right) as u32;

        Self {
            width: top.max(bottom),
            height: left.max(right),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, or `None` for a degenerate size.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }

    /// Destination rectangle corners in `[tl, tr, br, bl]` order.
    pub fn destination_corners(&self) -> [Point; 4] {
        let right = self.width as f64 - 1.0;
        let bottom = self.height as f64 - 1.0;
        [
            Point::new(0.0, 0.0),
            Point::new(right, 0.0),
            Point::new(right, bottom),
            Point::new(0.0, bottom),
        ]
    }
}

/// Resampling used when warping the document into its output rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resampling {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> [Point; 4] {
        [
            Point::new(50.0, 60.0),
            Point::new(440.0, 55.0),
            Point::new(450.0, 480.0),
            Point::new(40.0, 475.0),
        ]
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let expected = CornerSet::from_unordered(quad());
        let p = quad();
        let permutations = [
            [p[2], p[0], p[3], p[1]],
            [p[3], p[2], p[1], p[0]],
            [p[1], p[3], p[0], p[2]],
        ];
        for perm in permutations {
            assert_eq!(CornerSet::from_unordered(perm), expected);
        }
    }

    #[test]
    fn sum_extremes_are_top_left_and_bottom_right() {
        let corners = CornerSet::from_unordered(quad());
        let sums: Vec<f64> = quad().iter().map(|p| p.x + p.y).collect();
        let min = sums.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = sums.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(corners.top_left.x + corners.top_left.y, min);
        assert_eq!(corners.bottom_right.x + corners.bottom_right.y, max);
        assert_eq!(corners.top_left, Point::new(50.0, 60.0));
        assert_eq!(corners.bottom_right, Point::new(450.0, 480.0));
    }

    #[test]
    fn difference_extremes_are_top_right_and_bottom_left() {
        let corners = CornerSet::from_unordered(quad());
        // Top-right has the smallest y - x (largest x - y).
        assert_eq!(corners.top_right, Point::new(440.0, 55.0));
        assert_eq!(corners.bottom_left, Point::new(40.0, 475.0));
        for p in quad() {
            assert!(corners.top_right.y - corners.top_right.x <= p.y - p.x);
            assert!(corners.bottom_left.y - corners.bottom_left.x >= p.y - p.x);
        }
    }

    #[test]
    fn diamond_shares_corners() {
        let corners = CornerSet::from_unordered([
            Point::new(50.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 50.0),
        ]);
        assert!(corners.has_shared_corner());
        assert!(!CornerSet::from_unordered(quad()).has_shared_corner());
    }

    #[test]
    fn dimensions_take_longer_edges_truncated() {
        let corners = CornerSet {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(100.9, 0.0),
            bottom_right: Point::new(110.2, 40.0),
            bottom_left: Point::new(0.0, 40.0),
        };
        let dims = OutputDimensions::from_corners(&corners);
        // bottom edge 110.2 beats top edge 100.9; right edge ~41.07 beats left 40.
        assert_eq!(dims.width, 110);
        assert_eq!(dims.height, 41);
    }

    #[test]
    fn collapsed_quad_is_degenerate() {
        let p = Point::new(10.0, 10.0);
        let corners = CornerSet {
            top_left: p,
            top_right: p,
            bottom_right: Point::new(10.0, 200.0),
            bottom_left: Point::new(10.0, 200.0),
        };
        let dims = OutputDimensions::from_corners(&corners);
        assert_eq!(dims.width, 0);
        assert!(dims.is_degenerate());
        assert_eq!(dims.aspect_ratio(), None);
    }

    #[test]
    fn destination_matches_corner_order() {
        let dims = OutputDimensions {
            width: 300,
            height: 200,
        };
        let dst = dims.destination_corners();
        assert_eq!(dst[0], Point::new(0.0, 0.0));
        assert_eq!(dst[1], Point::new(299.0, 0.0));
        assert_eq!(dst[2], Point::new(299.0, 199.0));
        assert_eq!(dst[3], Point::new(0.0, 199.0));
    }

    #[test]
    fn scale_ratio_never_upscales() {
        assert_eq!(ScaleRatio::between(1000, 500).value(), 2.0);
        assert_eq!(ScaleRatio::between(300, 500).value(), 1.0);
        assert_eq!(ScaleRatio::between(500, 500).value(), 1.0);
        let p = ScaleRatio::between(1500, 500).apply(Point::new(10.0, 20.0));
        assert_eq!(p, Point::new(30.0, 60.0));
    }

    #[test]
    fn resampling_serializes_snake_case() {
        let json = serde_json::to_string(&Resampling::Bicubic).unwrap();
        assert_eq!(json, "\"bicubic\"");
    }
}
