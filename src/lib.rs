//! Segmentation mask to annotation format converter
//!
//! This library converts pixel-labeled mask images into YOLO normalized
//! polygon/bbox text files and COCO JSON documents, and validates produced
//! COCO files.

pub mod coco;
pub mod coco_dataset;
pub mod config;
pub mod contours;
pub mod conversion;
pub mod io;
pub mod types;
pub mod utils;
pub mod validate;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use coco::{Annotation, Category, CocoFile, CocoWriter, Image, Info, License};
pub use coco_dataset::{process_coco_multi_class, process_coco_single_class};
pub use types::{ClassMap, MaskEntry, ProcessingStats};
pub use validate::{validate_coco_file, CocoSummary};
pub use yolo_dataset::process_yolo_dataset;
