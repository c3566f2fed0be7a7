//! Contour extraction from label grids
//!
//! Builds a binary mask for a target pixel label and extracts the external
//! boundaries of its connected regions. Nested holes are not reported.

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};

/// Build a binary mask that is 255 where the grid equals `label`, else 0.
pub fn binary_mask(mask: &GrayImage, label: u8) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y)[0] == label {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Extract external contours for all connected regions of `label`.
///
/// Contour points are compressed so that straight runs keep only their
/// endpoints; contours with fewer than 3 remaining points are discarded as
/// degenerate.
pub fn extract_label_contours(mask: &GrayImage, label: u8) -> Vec<Vec<(u32, u32)>> {
    let binary = binary_mask(mask, label);

    find_contours::<i32>(&binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(|c| {
            let points: Vec<(u32, u32)> = c
                .points
                .iter()
                .map(|p| (p.x as u32, p.y as u32))
                .collect();
            let compressed = compress_collinear(points);
            if compressed.len() >= 3 {
                Some(compressed)
            } else {
                None
            }
        })
        .collect()
}

/// Sorted unique non-zero pixel values present in the grid.
pub fn present_labels(mask: &GrayImage) -> Vec<u8> {
    let mut seen = [false; 256];
    for pixel in mask.pixels() {
        seen[pixel[0] as usize] = true;
    }
    (1..=255u8).filter(|&v| seen[v as usize]).collect()
}

/// Drop points that lie on a straight run between their neighbours, keeping
/// corners only. The polygon is treated as closed.
fn compress_collinear(points: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];

        let ax = cur.0 as i64 - prev.0 as i64;
        let ay = cur.1 as i64 - prev.1 as i64;
        let bx = next.0 as i64 - cur.0 as i64;
        let by = next.1 as i64 - cur.1 as i64;

        if ax * by - ay * bx != 0 {
            kept.push(cur);
        }
    }
    kept
}
