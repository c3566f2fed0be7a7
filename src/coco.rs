//! COCO format data structures and geometry utilities
//!
//! This module provides the COCO JSON schema types, the contour geometry
//! used by the COCO converters, and the `CocoWriter` accumulator that owns
//! the global image/annotation id counters for a run.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// COCO dataset information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub year: u32,
    pub version: String,
    pub description: String,
    pub contributor: String,
    pub url: String,
    pub date_created: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            year: chrono::Utc::now().year() as u32,
            version: "1.0".to_string(),
            description: "Exported from segmentation masks".to_string(),
            contributor: "mask2yolo".to_string(),
            url: String::new(),
            date_created: chrono::Utc::now().date_naive().to_string(),
        }
    }
}

/// COCO license information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: u32,
    pub name: String,
    pub url: String,
}

impl Default for License {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Unknown".to_string(),
            url: String::new(),
        }
    }
}

/// COCO category information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

/// COCO image information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: u32,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub license: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_captured: Option<String>,
}

impl Image {
    pub fn new(id: u32, file_name: String, width: u32, height: u32) -> Self {
        Self {
            id,
            file_name,
            width,
            height,
            license: 1,
            date_captured: Some(chrono::Utc::now().date_naive().to_string()),
        }
    }
}

/// COCO annotation information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub image_id: u32,
    pub category_id: u32,
    pub segmentation: Vec<Vec<f64>>,
    pub area: f64,
    pub bbox: [f64; 4], // [x, y, width, height] in absolute pixels
    pub iscrowd: u32,
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoFile {
    pub info: Info,
    pub licenses: Vec<License>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// Accumulator for a single COCO conversion run.
///
/// Owns the monotonically increasing image and annotation id counters so
/// that id assignment is explicit rather than ambient state. Ids start at 1
/// and are never reused within a run.
pub struct CocoWriter {
    categories: Vec<Category>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    next_image_id: u32,
    next_annotation_id: u32,
}

impl CocoWriter {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            images: Vec::new(),
            annotations: Vec::new(),
            next_image_id: 1,
            next_annotation_id: 1,
        }
    }

    /// Append an image entry and return its assigned id.
    pub fn add_image(&mut self, file_name: String, width: u32, height: u32) -> u32 {
        let image_id = self.next_image_id;
        self.next_image_id += 1;
        self.images
            .push(Image::new(image_id, file_name, width, height));
        image_id
    }

    /// Append an annotation for a previously added image.
    pub fn add_annotation(
        &mut self,
        image_id: u32,
        category_id: u32,
        segmentation: Vec<f64>,
        bbox: [f64; 4],
        area: f64,
    ) -> u32 {
        let annotation_id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.annotations.push(Annotation {
            id: annotation_id,
            image_id,
            category_id,
            segmentation: vec![segmentation],
            area,
            bbox,
            iscrowd: 0,
        });
        annotation_id
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Consume the writer and produce the complete document.
    pub fn into_file(self) -> CocoFile {
        CocoFile {
            info: Info::default(),
            licenses: vec![License::default()],
            images: self.images,
            annotations: self.annotations,
            categories: self.categories,
        }
    }
}

/// Flatten a pixel contour into the COCO `[x1, y1, x2, y2, ...]` layout.
pub fn flatten_contour(contour: &[(u32, u32)]) -> Vec<f64> {
    contour
        .iter()
        .flat_map(|&(x, y)| [x as f64, y as f64])
        .collect()
}

/// Pixel bounding rectangle `[x, y, width, height]` of a contour.
///
/// Width and height count pixels, so a contour spanning columns 2..=4 has
/// width 3.
pub fn bounding_rect(contour: &[(u32, u32)]) -> [f64; 4] {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for &(x, y) in contour {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if contour.is_empty() {
        return [0.0, 0.0, 0.0, 0.0];
    }

    [
        min_x as f64,
        min_y as f64,
        (max_x - min_x + 1) as f64,
        (max_y - min_y + 1) as f64,
    ]
}

/// Polygon area via the shoelace formula.
pub fn polygon_area(contour: &[(u32, u32)]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let (x_i, y_i) = (contour[i].0 as f64, contour[i].1 as f64);
        let (x_j, y_j) = (contour[j].0 as f64, contour[j].1 as f64);
        area += x_i * y_j - x_j * y_i;
    }

    area.abs() / 2.0
}
