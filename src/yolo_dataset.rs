//! YOLO dataset conversion pipeline
//!
//! Walks a directory of mask images and writes one YOLO segmentation text
//! file per mask, with an optional parallel directory of bounding-box files.
//! Each object found in a mask produces one segmentation line and one bbox
//! line for its contour.

use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::contours::{extract_label_contours, present_labels};
use crate::conversion::{bbox_record, polygon_record};
use crate::io::{load_mask, scan_mask_files};
use crate::types::{ClassMap, ProcessingStats, YOLO_MASK_EXTENSIONS};
use crate::utils::{create_progress_bar, ensure_output_directory};

/// Convert every mask in `masks_dir` to YOLO segmentation annotations.
///
/// Writes `<stem>.txt` into `seg_dir` for each decodable mask, one line per
/// contour. When `bbox_dir` is given, a parallel `<stem>.txt` with
/// center-form bounding boxes is written there. Masks that contain only
/// background still produce an empty label file. Pixel labels absent from
/// the class map are logged and skipped; decode failures are logged and the
/// file is skipped entirely.
pub fn process_yolo_dataset(
    masks_dir: &Path,
    seg_dir: &Path,
    bbox_dir: Option<&Path>,
    class_map: &ClassMap,
) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    ensure_output_directory(seg_dir)?;
    if let Some(dir) = bbox_dir {
        ensure_output_directory(dir)?;
    }

    let entries = scan_mask_files(masks_dir, YOLO_MASK_EXTENSIONS, false)?;
    info!("Found {} mask files in {}", entries.len(), masks_dir.display());

    let mut stats = ProcessingStats::new();
    stats.total_files = entries.len();

    let pb = create_progress_bar(entries.len() as u64, "YOLO");
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
        let mut seg_lines = String::new();
        let mut bbox_lines = String::new();

        for label in present_labels(&mask) {
            let class_id = match class_map.class_id(label) {
                Some(id) => id,
                None => {
                    warn!(
                        "Skipping unmapped pixel label {} in {}",
                        label, entry.file_name
                    );
                    stats.skipped_unknown_labels += 1;
                    continue;
                }
            };

            for contour in extract_label_contours(&mask, label) {
                seg_lines.push_str(&polygon_record(class_id, &contour, width, height));
                seg_lines.push('\n');
                bbox_lines.push_str(&bbox_record(class_id, &contour, width, height));
                bbox_lines.push('\n');
                stats.objects_emitted += 1;
            }
        }

        write_label_file(seg_dir, &entry.stem, &seg_lines)?;
        if let Some(dir) = bbox_dir {
            write_label_file(dir, &entry.stem, &bbox_lines)?;
        }
        pb.inc(1);
    }
    pb.finish_with_message("YOLO conversion complete");

    stats.print_summary();
    Ok(stats)
}

fn write_label_file(dir: &Path, stem: &str, contents: &str) -> std::io::Result<()> {
    let path = dir.join(stem).with_extension("txt");
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(contents.as_bytes())
}
