use image::GrayImage;
use log::warn;
use std::fs;
use std::path::Path;

use crate::types::MaskEntry;

/// Collect mask files from a directory, filtered by extension and sorted by
/// filename for deterministic iteration order.
///
/// Only the top level of the directory is scanned. When `case_insensitive`
/// is set the extension comparison is done on the lowercased extension.
pub fn scan_mask_files(
    dir: &Path,
    extensions: &[&str],
    case_insensitive: bool,
) -> std::io::Result<Vec<MaskEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path.extension().and_then(|e| e.to_str()).is_some_and(|ext| {
            if case_insensitive {
                let lowered = ext.to_lowercase();
                extensions.contains(&lowered.as_str())
            } else {
                extensions.contains(&ext)
            }
        });
        if !matches {
            continue;
        }

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        entries.push(MaskEntry {
            path,
            file_name,
            stem,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Decode a mask file into a single-channel label grid.
///
/// Decode failures are logged and reported as `None` so the caller can skip
/// the file and keep processing the rest of the directory.
pub fn load_mask(path: &Path) -> Option<GrayImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_luma8()),
        Err(e) => {
            warn!("Failed to decode mask {}: {}", path.display(), e);
            None
        }
    }
}
