//! COCO JSON structural validation
//!
//! Independent consumer of produced COCO documents: checks required
//! top-level keys and computes summary statistics without deserializing
//! into the full schema, so partially valid files still report what they
//! can.

use log::info;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const REQUIRED_KEYS: &[&str] = &["info", "images", "annotations", "categories"];

/// Summary statistics for a structurally valid COCO document.
#[derive(Debug, Clone, PartialEq)]
pub struct CocoSummary {
    pub image_count: usize,
    pub annotation_count: usize,
    pub category_count: usize,
    /// Per-category annotation counts as `(category name, count)` pairs,
    /// in the document's category order.
    pub per_category: Vec<(String, usize)>,
}

impl CocoSummary {
    pub fn print_report(&self) {
        info!("Images: {}", self.image_count);
        info!("Annotations: {}", self.annotation_count);
        info!("Categories: {}", self.category_count);
        for (name, count) in &self.per_category {
            info!("  {}: {} annotations", name, count);
        }
    }
}

/// Validate a COCO JSON file on disk.
///
/// Fails with a descriptive error when the file cannot be opened, the JSON
/// cannot be parsed, or any of the required top-level keys (`info`,
/// `images`, `annotations`, `categories`) is missing.
pub fn validate_coco_file(path: &Path) -> Result<CocoSummary, Box<dyn std::error::Error>> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open COCO file {}: {}", path.display(), e))?;
    let document: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse COCO JSON {}: {}", path.display(), e))?;

    validate_document(&document)
}

/// Validate an already parsed COCO document.
pub fn validate_document(document: &Value) -> Result<CocoSummary, Box<dyn std::error::Error>> {
    let object = document
        .as_object()
        .ok_or("COCO document root is not a JSON object")?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(*key) {
            return Err(format!("COCO document is missing required key: {}", key).into());
        }
    }

    let images = as_array(object.get("images"), "images")?;
    let annotations = as_array(object.get("annotations"), "annotations")?;
    let categories = as_array(object.get("categories"), "categories")?;

    // Full scan of annotations per category; fine for small datasets
    let per_category = categories
        .iter()
        .map(|category| {
            let id = category.get("id").and_then(Value::as_u64);
            let name = category
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string();
            let count = annotations
                .iter()
                .filter(|ann| ann.get("category_id").and_then(Value::as_u64) == id)
                .count();
            (name, count)
        })
        .collect();

    Ok(CocoSummary {
        image_count: images.len(),
        annotation_count: annotations.len(),
        category_count: categories.len(),
        per_category,
    })
}

fn as_array<'a>(
    value: Option<&'a Value>,
    key: &str,
) -> Result<&'a Vec<Value>, Box<dyn std::error::Error>> {
    value
        .and_then(Value::as_array)
        .ok_or_else(|| format!("COCO key {} is not an array", key).into())
}
