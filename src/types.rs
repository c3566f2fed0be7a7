use std::path::PathBuf;

// Mask extensions accepted by the YOLO conversion path (matched case-sensitively)
pub const YOLO_MASK_EXTENSIONS: &[&str] = &["png", "jpg", "tiff"];

// Mask extensions accepted by the COCO conversion paths (matched case-insensitively)
pub const COCO_MASK_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Ordered mapping from mask pixel label to class name.
///
/// The position of an entry is the YOLO class id; the COCO category id is the
/// position plus one (COCO uses 1-based indexing). Validated once at
/// construction: duplicate labels, duplicate names and the reserved
/// background label 0 are rejected.
#[derive(Debug, Clone)]
pub struct ClassMap {
    entries: Vec<(u8, String)>,
}

impl ClassMap {
    pub fn new(entries: Vec<(u8, String)>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("class map must contain at least one entry".to_string());
        }
        for (i, (label, name)) in entries.iter().enumerate() {
            if *label == 0 {
                return Err("pixel label 0 is reserved for background".to_string());
            }
            if name.is_empty() {
                return Err(format!("class name for label {} is empty", label));
            }
            for (other_label, other_name) in &entries[..i] {
                if other_label == label {
                    return Err(format!("duplicate pixel label in class map: {}", label));
                }
                if other_name == name {
                    return Err(format!("duplicate class name in class map: {}", name));
                }
            }
        }
        Ok(Self { entries })
    }

    /// Class id (position index) for a pixel label, if mapped.
    pub fn class_id(&self, label: u8) -> Option<usize> {
        self.entries.iter().position(|(l, _)| *l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u8, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, (label, name))| (id, *label, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Struct to hold per-run processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub decoded_masks: usize,
    pub skipped_decode_failures: usize,
    pub skipped_unknown_labels: usize,
    pub objects_emitted: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Mask files found: {}", self.total_files);
        log::info!("Masks decoded: {}", self.decoded_masks);
        log::info!("Objects emitted: {}", self.objects_emitted);
        if self.skipped_decode_failures > 0 {
            log::warn!("Skipped (decode failure): {}", self.skipped_decode_failures);
        }
        if self.skipped_unknown_labels > 0 {
            log::warn!(
                "Skipped (unmapped pixel label): {}",
                self.skipped_unknown_labels
            );
        }
    }
}

/// A mask file discovered by the scanner.
#[derive(Debug, Clone)]
pub struct MaskEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
}
