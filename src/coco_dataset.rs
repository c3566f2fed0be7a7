//! COCO dataset conversion pipelines
//!
//! Two converters sharing the same per-image loop: a single-class variant
//! that scans one target pixel label, and a multi-class variant driven by a
//! class map. Both accumulate into a `CocoWriter` and flush one aggregated
//! JSON document at the end of the run.

use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::coco::{bounding_rect, flatten_contour, polygon_area, Category, CocoFile, CocoWriter};
use crate::contours::extract_label_contours;
use crate::io::{load_mask, scan_mask_files};
use crate::types::{ClassMap, ProcessingStats, COCO_MASK_EXTENSIONS};
use crate::utils::{create_progress_bar, ensure_output_directory};

// Contours enclosing less than one pixel of area are treated as noise
const MIN_CONTOUR_AREA: f64 = 1.0;

/// Convert a directory of binary masks to a single-category COCO document.
///
/// Only `target_label` is scanned; every other pixel value, mapped or not,
/// is ignored without a diagnostic. Every decodable mask contributes an
/// `images[]` entry even when it holds no objects.
pub fn process_coco_single_class(
    masks_dir: &Path,
    output_path: &Path,
    target_label: u8,
    category_id: u32,
    category_name: &str,
) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    let categories = vec![Category {
        id: category_id,
        name: category_name.to_string(),
        supercategory: "none".to_string(),
    }];
    let mut writer = CocoWriter::new(categories);

    let stats = accumulate_masks(masks_dir, &mut writer, |mask, writer, image_id| {
        let mut emitted = 0;
        for contour in extract_label_contours(mask, target_label) {
            if append_annotation(writer, image_id, category_id, &contour) {
                emitted += 1;
            }
        }
        emitted
    })?;

    write_coco_file(output_path, writer.into_file())?;
    stats.print_summary();
    Ok(stats)
}

/// Convert a directory of multi-class masks to a COCO document with one
/// category per class-map entry. Only mapped pixel labels are considered.
pub fn process_coco_multi_class(
    masks_dir: &Path,
    output_path: &Path,
    class_map: &ClassMap,
) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    let categories: Vec<Category> = class_map
        .iter()
        .map(|(id, _, name)| Category {
            id: (id + 1) as u32,
            name: name.to_string(),
            supercategory: "none".to_string(),
        })
        .collect();
    let mut writer = CocoWriter::new(categories);

    let stats = accumulate_masks(masks_dir, &mut writer, |mask, writer, image_id| {
        let mut emitted = 0;
        for (id, label, _) in class_map.iter() {
            let category_id = (id + 1) as u32;
            for contour in extract_label_contours(mask, label) {
                if append_annotation(writer, image_id, category_id, &contour) {
                    emitted += 1;
                }
            }
        }
        emitted
    })?;

    write_coco_file(output_path, writer.into_file())?;
    stats.print_summary();
    Ok(stats)
}

/// Shared per-image loop: scan, decode, register the image, then let the
/// converter-specific closure emit annotations for it.
fn accumulate_masks<F>(
    masks_dir: &Path,
    writer: &mut CocoWriter,
    mut emit: F,
) -> Result<ProcessingStats, Box<dyn std::error::Error>>
where
    F: FnMut(&image::GrayImage, &mut CocoWriter, u32) -> usize,
{
    let entries = scan_mask_files(masks_dir, COCO_MASK_EXTENSIONS, true)?;
    info!("Found {} mask files in {}", entries.len(), masks_dir.display());

    let mut stats = ProcessingStats::new();
    stats.total_files = entries.len();

    let pb = create_progress_bar(entries.len() as u64, "COCO");
    for entry in &entries {
        let mask = match load_mask(&entry.path) {
            Some(mask) => mask,
            None => {
                stats.skipped_decode_failures += 1;
                pb.inc(1);
                continue;
            }
        };
        stats.decoded_masks += 1;

        let (width, height) = mask.dimensions();
        let image_id = writer.add_image(entry.file_name.clone(), width, height);
        stats.objects_emitted += emit(&mask, writer, image_id);
        pb.inc(1);
    }
    pb.finish_with_message("COCO conversion complete");

    Ok(stats)
}

/// Reduce one contour to a COCO annotation; tiny areas are dropped as noise.
fn append_annotation(
    writer: &mut CocoWriter,
    image_id: u32,
    category_id: u32,
    contour: &[(u32, u32)],
) -> bool {
    let area = polygon_area(contour);
    if area < MIN_CONTOUR_AREA {
        return false;
    }

    let segmentation = flatten_contour(contour);
    let bbox = bounding_rect(contour);
    writer.add_annotation(image_id, category_id, segmentation, bbox, area);
    true
}

/// Write the aggregated document as pretty-printed JSON (2-space indent);
/// parent directories are created if absent.
fn write_coco_file(path: &Path, file: CocoFile) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_output_directory(parent)?;
        }
    }

    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, &file)?;
    info!(
        "Wrote {} ({} images, {} annotations)",
        path.display(),
        file.images.len(),
        file.annotations.len()
    );
    Ok(())
}
