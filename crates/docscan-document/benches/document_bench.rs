// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docscan-document crate: the full scan pipeline
// and the edge detection stage on its own, both on a synthetic skewed card.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use docscan_core::ScanConfig;
use docscan_document::DocumentScanner;
use docscan_document::scan::EdgeDetector;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 1200x1600 photo of a light card on a dark table, rotated a few degrees.
fn skewed_card() -> DynamicImage {
    let mut img = RgbImage::from_pixel(1200, 1600, Rgb([35, 40, 45]));
    let card = [
        Point::new(180, 210),
        Point::new(1010, 170),
        Point::new(1060, 1390),
        Point::new(140, 1430),
    ];
    draw_polygon_mut(&mut img, &card, Rgb([235, 232, 225]));
    DynamicImage::ImageRgb8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full pipeline: downscale, Canny, contour search, warp at full resolution.
fn bench_scan(c: &mut Criterion) {
    let photo = skewed_card();
    let scanner = DocumentScanner::default();

    c.bench_function("scan (1200x1600, color)", |b| {
        b.iter(|| {
            let page = scanner.scan(black_box(&photo), false);
            black_box(page.ok());
        });
    });

    c.bench_function("scan (1200x1600, grayscale)", |b| {
        b.iter(|| {
            let page = scanner.scan(black_box(&photo), true);
            black_box(page.ok());
        });
    });
}

/// Edge detection alone, which dominates when no document is found.
fn bench_edges(c: &mut Criterion) {
    let photo = skewed_card();
    let detector = EdgeDetector::from_config(&ScanConfig::default());

    c.bench_function("edge detection (working height 500)", |b| {
        b.iter(|| black_box(detector.detect(black_box(&photo)).ok()));
    });
}

criterion_group!(benches, bench_scan, bench_edges);
criterion_main!(benches);
