// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour stage — trace every border in the edge map, keep the largest few by
// area, and accept the first whose polygon approximation has four vertices.

use docscan_core::error::DocscanError;
use docscan_core::{Point, ScanConfig};
use image::GrayImage;
use imageproc::contours::{Contour, find_contours};
use tracing::{debug, info, instrument, warn};

/// Integer pixel coordinate on a traced border.
pub type PixelPoint = imageproc::point::Point<i32>;

/// Second pipeline stage: locate the document quadrilateral.
#[derive(Debug, Clone)]
pub struct DocumentContourFinder {
    candidate_pool: usize,
    epsilon_fraction: f64,
}

/// A traced border after chain compression, with its enclosed area.
#[derive(Debug, Clone)]
struct Candidate {
    points: Vec<PixelPoint>,
    area: f64,
}

impl DocumentContourFinder {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            candidate_pool: config.candidate_pool,
            epsilon_fraction: config.approx_epsilon_fraction,
        }
    }

    /// Four corners of the document in edge-map coordinates, in the order the
    /// border was traced.
    #[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
    pub fn find(&self, edges: &GrayImage) -> Result<[Point; 4], DocscanError> {
        let contours: Vec<Contour<i32>> = find_contours(edges);
        debug!(contour_count = contours.len(), "Borders traced");

        let mut candidates: Vec<Candidate> = contours
            .into_iter()
            .map(|contour| {
                let points = compress_chain(&contour.points);
                let area = polygon_area(&points);
                Candidate { points, area }
            })
            .collect();

        // Stable sort: equal areas keep tracing order.
        candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
        candidates.truncate(self.candidate_pool);

        for (rank, candidate) in candidates.iter().enumerate() {
            let perimeter = arc_length(&candidate.points);
            let approx =
                approximate_closed(&candidate.points, self.epsilon_fraction * perimeter);
            debug!(
                rank,
                area = candidate.area,
                perimeter,
                vertices = approx.len(),
                "Candidate approximated"
            );

            if let [a, b, c, d] = approx[..] {
                let quad = [a, b, c, d].map(|p| Point::new(p.x as f64, p.y as f64));
                info!(rank, area = candidate.area, corners = ?quad, "Document contour found");
                return Ok(quad);
            }
        }

        warn!(
            examined = candidates.len(),
            "No four-vertex contour among the largest candidates"
        );
        Err(DocscanError::NoDocumentFound {
            candidates: candidates.len(),
        })
    }
}

// -- Contour geometry ---------------------------------------------------------

/// Drop the interior points of straight horizontal, vertical and diagonal
/// runs from a closed 8-connected border, keeping only the turning points.
pub fn compress_chain(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<PixelPoint> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            (here.x - prev.x, here.y - prev.y) != (next.x - here.x, next.y - here.y)
        })
        .map(|i| points[i])
        .collect();

    // A closed chain with no turns cannot exist unless the input repeats one point.
    if kept.is_empty() {
        return vec![points[0]];
    }
    kept
}

/// Enclosed area of a closed polygon (shoelace formula).
pub fn polygon_area(points: &[PixelPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

/// Perimeter of a closed polygon.
pub fn arc_length(points: &[PixelPoint]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| pixel_distance(points[i], points[(i + 1) % n]))
        .sum()
}

/// Douglas–Peucker simplification of a closed polygon.
///
/// The curve is split at two mutually distant vertices so the result does not
/// depend on where tracing started; each half is simplified as an open chain
/// and no simplified vertex lies further than `epsilon` from the original.
pub fn approximate_closed(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let first = farthest_from(points, 0);
    let second = farthest_from(points, first);
    if pixel_distance(points[first], points[second]) == 0.0 {
        return vec![points[first]];
    }

    let forward = wrapping_chain(points, first, second);
    let backward = wrapping_chain(points, second, first);

    let mut out = Vec::new();
    simplify_open(&forward, epsilon, &mut out);
    simplify_open(&backward, epsilon, &mut out);
    out
}

/// Points from index `from` to index `to` inclusive, wrapping past the end.
fn wrapping_chain(points: &[PixelPoint], from: usize, to: usize) -> Vec<PixelPoint> {
    let n = points.len();
    let len = (to + n - from) % n + 1;
    (0..len).map(|k| points[(from + k) % n]).collect()
}

/// Recursive open-chain simplification. Pushes every kept vertex except the
/// chain's last point, so consecutive chains can be concatenated.
fn simplify_open(chain: &[PixelPoint], epsilon: f64, out: &mut Vec<PixelPoint>) {
    let last = chain.len() - 1;
    if last < 2 {
        out.push(chain[0]);
        return;
    }

    let (start, end) = (chain[0], chain[last]);
    let mut split = 0;
    let mut max_distance = 0.0;
    for (i, &point) in chain.iter().enumerate().take(last).skip(1) {
        let distance = distance_to_line(point, start, end);
        if distance > max_distance {
            max_distance = distance;
            split = i;
        }
    }

    if max_distance > epsilon {
        simplify_open(&chain[..=split], epsilon, out);
        simplify_open(&chain[split..], epsilon, out);
    } else {
        out.push(start);
    }
}

fn farthest_from(points: &[PixelPoint], index: usize) -> usize {
    let origin = points[index];
    let mut best = index;
    let mut best_distance = 0.0;
    for (i, &point) in points.iter().enumerate() {
        let distance = pixel_distance(origin, point);
        if distance > best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

fn pixel_distance(a: PixelPoint, b: PixelPoint) -> f64 {
    ((a.x - b.x) as f64).hypot((a.y - b.y) as f64)
}

/// Perpendicular distance from `point` to the line through `start` and `end`.
fn distance_to_line(point: PixelPoint, start: PixelPoint, end: PixelPoint) -> f64 {
    let dx = (end.x - start.x) as f64;
    let dy = (end.y - start.y) as f64;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return pixel_distance(point, start);
    }
    let cross = dx * (point.y - start.y) as f64 - dy * (point.x - start.x) as f64;
    cross.abs() / length
}
