use clap::Parser;
use log::{error, info};

use mask2yolo::config::{build_class_map, Cli, Command};
use mask2yolo::{
    process_coco_multi_class, process_coco_single_class, process_yolo_dataset, validate_coco_file,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::YoloSeg {
            masks_dir,
            output_dir,
            bbox_dir,
            classes,
        } => {
            let class_map = match build_class_map(classes) {
                Ok(map) => map,
                Err(e) => {
                    error!("Invalid class map: {}", e);
                    std::process::exit(2);
                }
            };
            info!("Starting mask to YOLO conversion...");
            if let Err(e) =
                process_yolo_dataset(&masks_dir, &output_dir, bbox_dir.as_deref(), &class_map)
            {
                error!("YOLO conversion failed: {}", e);
                std::process::exit(1);
            }
            info!("YOLO conversion process completed successfully.");
        }
        Command::CocoSingleClass {
            masks_dir,
            output,
            label,
            category_id,
            category_name,
        } => {
            info!("Starting mask to COCO conversion...");
            if let Err(e) =
                process_coco_single_class(&masks_dir, &output, label, category_id, &category_name)
            {
                error!("COCO conversion failed: {}", e);
                std::process::exit(1);
            }
            info!("COCO conversion process completed successfully.");
        }
        Command::CocoMultiClass {
            masks_dir,
            output,
            classes,
        } => {
            let class_map = match build_class_map(classes) {
                Ok(map) => map,
                Err(e) => {
                    error!("Invalid class map: {}", e);
                    std::process::exit(2);
                }
            };
            info!("Starting multi-class mask to COCO conversion...");
            if let Err(e) = process_coco_multi_class(&masks_dir, &output, &class_map) {
                error!("COCO conversion failed: {}", e);
                std::process::exit(1);
            }
            info!("COCO conversion process completed successfully.");
        }
        Command::Validate { json_file } => match validate_coco_file(&json_file) {
            Ok(summary) => {
                info!("{} is structurally complete.", json_file.display());
                summary.print_report();
            }
            Err(e) => {
                error!("Validation failed: {}", e);
                std::process::exit(1);
            }
        },
    }
}
