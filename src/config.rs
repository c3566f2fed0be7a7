use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::ClassMap;

/// Command-line interface for converting segmentation masks to YOLO and
/// COCO annotation formats.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert masks to YOLO segmentation text files (one per image)
    YoloSeg {
        /// Directory containing mask images
        #[arg(short = 'd', long = "masks_dir")]
        masks_dir: PathBuf,

        /// Output directory for segmentation label files
        #[arg(short = 'o', long = "output_dir")]
        output_dir: PathBuf,

        /// Optional output directory for bounding-box label files
        #[arg(long = "bbox_dir")]
        bbox_dir: Option<PathBuf>,

        /// Class mapping as label:name pairs, e.g. 255:crack,128:pothole
        #[arg(long = "classes", value_delimiter = ',', value_parser = parse_class_spec, required = true)]
        classes: Vec<(u8, String)>,
    },

    /// Convert binary masks to a single-category COCO JSON document
    CocoSingleClass {
        /// Directory containing mask images
        #[arg(short = 'd', long = "masks_dir")]
        masks_dir: PathBuf,

        /// Path of the COCO JSON file to write
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Pixel value of the foreground label
        #[arg(long = "label", default_value_t = 255)]
        label: u8,

        /// COCO category id
        #[arg(long = "category_id", default_value_t = 1)]
        category_id: u32,

        /// COCO category name
        #[arg(long = "category_name", default_value = "object")]
        category_name: String,
    },

    /// Convert multi-class masks to a COCO JSON document
    CocoMultiClass {
        /// Directory containing mask images
        #[arg(short = 'd', long = "masks_dir")]
        masks_dir: PathBuf,

        /// Path of the COCO JSON file to write
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Class mapping as label:name pairs, e.g. 255:crack,128:pothole
        #[arg(long = "classes", value_delimiter = ',', value_parser = parse_class_spec, required = true)]
        classes: Vec<(u8, String)>,
    },

    /// Check structural completeness of a COCO JSON file
    Validate {
        /// Path of the COCO JSON file to check
        json_file: PathBuf,
    },
}

/// Parse one `label:name` class specification.
pub fn parse_class_spec(s: &str) -> Result<(u8, String), String> {
    let (label, name) = s
        .split_once(':')
        .ok_or_else(|| format!("expected label:name, got '{}'", s))?;
    let label: u8 = label
        .trim()
        .parse()
        .map_err(|_| format!("pixel label must be an integer in 0-255, got '{}'", label))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("class name is empty in '{}'", s));
    }
    Ok((label, name.to_string()))
}

/// Build a validated class map from parsed CLI specs.
pub fn build_class_map(classes: Vec<(u8, String)>) -> Result<ClassMap, String> {
    ClassMap::new(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_and_name() {
        assert_eq!(
            parse_class_spec("255:crack"),
            Ok((255, "crack".to_string()))
        );
        assert_eq!(parse_class_spec(" 7 : pothole "), Ok((7, "pothole".to_string())));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_class_spec("crack").is_err());
        assert!(parse_class_spec("300:crack").is_err());
        assert!(parse_class_spec("255:").is_err());
    }
}
