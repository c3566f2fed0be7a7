use image::{GrayImage, Luma};
use serde_json::Value;
use std::fs;
use std::path::Path;

use mask2yolo::{
    process_coco_multi_class, process_coco_single_class, process_yolo_dataset, validate_coco_file,
    ClassMap, CocoFile,
};

/// Write a mask with a filled rectangle of `label` pixels on background 0.
fn write_rect_mask(
    path: &Path,
    width: u32,
    height: u32,
    rect: (u32, u32, u32, u32),
    label: u8,
) {
    let (rx, ry, rw, rh) = rect;
    let mask = GrayImage::from_fn(width, height, |x, y| {
        if x >= rx && x < rx + rw && y >= ry && y < ry + rh {
            Luma([label])
        } else {
            Luma([0u8])
        }
    });
    mask.save(path).unwrap();
}

fn single_class_map() -> ClassMap {
    ClassMap::new(vec![(255, "object".to_string())]).unwrap()
}

#[test]
fn yolo_bbox_matches_known_square_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    let bbox_dir = dir.path().join("bboxes");
    fs::create_dir(&masks_dir).unwrap();

    // Centered square: pixels 40..=119 of a 160x160 canvas
    write_rect_mask(&masks_dir.join("square.png"), 160, 160, (40, 40, 80, 80), 255);

    let stats = process_yolo_dataset(&masks_dir, &seg_dir, Some(&bbox_dir), &single_class_map())
        .unwrap();
    assert_eq!(stats.decoded_masks, 1);
    assert_eq!(stats.objects_emitted, 1);

    let bbox = fs::read_to_string(bbox_dir.join("square.txt")).unwrap();
    assert_eq!(bbox, "0 0.5 0.5 0.5 0.5\n");
}

#[test]
fn yolo_normalized_coordinates_stay_in_unit_range() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    fs::create_dir(&masks_dir).unwrap();

    write_rect_mask(&masks_dir.join("edge.png"), 64, 48, (0, 0, 64, 48), 255);
    write_rect_mask(&masks_dir.join("small.png"), 64, 48, (10, 5, 7, 9), 255);

    process_yolo_dataset(&masks_dir, &seg_dir, None, &single_class_map()).unwrap();

    for name in ["edge.txt", "small.txt"] {
        let contents = fs::read_to_string(seg_dir.join(name)).unwrap();
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            assert_eq!(fields.next(), Some("0"));
            for field in fields {
                let value: f64 = field.parse().unwrap();
                assert!((0.0..=1.0).contains(&value), "{} out of range", value);
            }
        }
    }
}

#[test]
fn yolo_background_only_mask_yields_empty_file()  {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    fs::create_dir(&masks_dir).unwrap();

    GrayImage::new(32, 32)
        .save(masks_dir.join("empty.png"))
        .unwrap();

    let stats = process_yolo_dataset(&masks_dir, &seg_dir, None, &single_class_map()).unwrap();
    assert_eq!(stats.objects_emitted, 0);

    let contents = fs::read_to_string(seg_dir.join("empty.txt")).unwrap();
    assert!(contents.is_empty());
}

#[test]
fn yolo_unmapped_label_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    fs::create_dir(&masks_dir).unwrap();

    write_rect_mask(&masks_dir.join("unknown.png"), 32, 32, (4, 4, 10, 10), 7);

    let stats = process_yolo_dataset(&masks_dir, &seg_dir, None, &single_class_map()).unwrap();
    assert_eq!(stats.skipped_unknown_labels, 1);
    assert_eq!(stats.objects_emitted, 0);
    assert!(seg_dir.join("unknown.txt").exists());
}

#[test]
fn yolo_decode_failure_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    fs::create_dir(&masks_dir).unwrap();

    fs::write(masks_dir.join("broken.png"), b"not an image").unwrap();
    write_rect_mask(&masks_dir.join("good.png"), 32, 32, (4, 4, 10, 10), 255);

    let stats = process_yolo_dataset(&masks_dir, &seg_dir, None, &single_class_map()).unwrap();
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.skipped_decode_failures, 1);
    assert_eq!(stats.decoded_masks, 1);
    assert!(!seg_dir.join("broken.txt").exists());
    assert!(seg_dir.join("good.txt").exists());
}

#[test]
fn yolo_emits_one_bbox_per_contour() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let seg_dir = dir.path().join("labels");
    let bbox_dir = dir.path().join("bboxes");
    fs::create_dir(&masks_dir).unwrap();

    // Two disconnected squares of the same class
    let mask = GrayImage::from_fn(100, 100, |x, y| {
        let in_first = (10..30).contains(&x) && (10..30).contains(&y);
        let in_second = (60..90).contains(&x) && (60..90).contains(&y);
        if in_first || in_second {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    mask.save(masks_dir.join("two.png")).unwrap();

    let stats = process_yolo_dataset(&masks_dir, &seg_dir, Some(&bbox_dir), &single_class_map())
        .unwrap();
    assert_eq!(stats.objects_emitted, 2);

    let bbox = fs::read_to_string(bbox_dir.join("two.txt")).unwrap();
    let lines: Vec<&str> = bbox.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_ne!(lines[0], lines[1]);
}

#[test]
fn coco_single_class_document_is_cross_referenced() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let output = dir.path().join("annotations/instances.json");
    fs::create_dir(&masks_dir).unwrap();

    write_rect_mask(&masks_dir.join("a.png"), 80, 80, (10, 10, 20, 20), 255);
    write_rect_mask(&masks_dir.join("b.png"), 80, 80, (30, 30, 25, 25), 255);

    let stats = process_coco_single_class(&masks_dir, &output, 255, 1, "defect").unwrap();
    assert_eq!(stats.decoded_masks, 2);

    let file: CocoFile = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(file.images.len(), 2);
    assert_eq!(file.categories.len(), 1);
    assert_eq!(file.categories[0].name, "defect");

    // Images sorted by filename, ids assigned from 1
    assert_eq!(file.images[0].id, 1);
    assert_eq!(file.images[0].file_name, "a.png");
    assert_eq!(file.images[1].id, 2);
    assert_eq!(file.images[1].file_name, "b.png");

    assert!(!file.annotations.is_empty());
    for (i, ann) in file.annotations.iter().enumerate() {
        assert_eq!(ann.id, (i + 1) as u32);
        assert!(ann.image_id >= 1 && ann.image_id <= file.images.len() as u32);
        assert!(ann.area >= 1.0);
        assert!(ann.bbox[2] >= 0.0 && ann.bbox[3] >= 0.0);
        assert_eq!(ann.iscrowd, 0);
        assert_eq!(ann.segmentation.len(), 1);
        assert!(ann.segmentation[0].len() >= 6);
    }
}

#[test]
fn coco_single_class_ignores_other_labels() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let output = dir.path().join("instances.json");
    fs::create_dir(&masks_dir).unwrap();

    // Only label 128 present; the single-class path scans label 255 only
    write_rect_mask(&masks_dir.join("other.png"), 64, 64, (8, 8, 16, 16), 128);

    process_coco_single_class(&masks_dir, &output, 255, 1, "object").unwrap();

    let file: CocoFile = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(file.images.len(), 1);
    assert!(file.annotations.is_empty());
}

#[test]
fn coco_multi_class_maps_labels_to_categories() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let output = dir.path().join("instances.json");
    fs::create_dir(&masks_dir).unwrap();

    let mask = GrayImage::from_fn(100, 100, |x, y| {
        if (10..40).contains(&x) && (10..40).contains(&y) {
            Luma([255u8])
        } else if (60..90).contains(&x) && (60..90).contains(&y) {
            Luma([128u8])
        } else {
            Luma([0u8])
        }
    });
    mask.save(masks_dir.join("multi.png")).unwrap();

    let class_map = ClassMap::new(vec![
        (255, "crack".to_string()),
        (128, "pothole".to_string()),
    ])
    .unwrap();
    process_coco_multi_class(&masks_dir, &output, &class_map).unwrap();

    let file: CocoFile = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(file.categories.len(), 2);
    assert_eq!(file.categories[0].id, 1);
    assert_eq!(file.categories[0].name, "crack");
    assert_eq!(file.categories[1].id, 2);
    assert_eq!(file.categories[1].name, "pothole");

    let category_ids: Vec<u32> = file.annotations.iter().map(|a| a.category_id).collect();
    assert!(category_ids.contains(&1));
    assert!(category_ids.contains(&2));
}

#[test]
fn coco_conversion_is_idempotent_up_to_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    fs::create_dir(&masks_dir).unwrap();
    write_rect_mask(&masks_dir.join("a.png"), 80, 80, (10, 10, 20, 20), 255);

    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");
    process_coco_single_class(&masks_dir, &first_path, 255, 1, "object").unwrap();
    process_coco_single_class(&masks_dir, &second_path, 255, 1, "object").unwrap();

    let strip_dates = |path: &Path| -> Value {
        let mut doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        doc["info"]["date_created"] = Value::Null;
        for image in doc["images"].as_array_mut().unwrap() {
            image["date_captured"] = Value::Null;
        }
        doc
    };

    assert_eq!(strip_dates(&first_path), strip_dates(&second_path));
}

#[test]
fn coco_output_is_two_space_indented() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let output = dir.path().join("instances.json");
    fs::create_dir(&masks_dir).unwrap();
    write_rect_mask(&masks_dir.join("a.png"), 40, 40, (5, 5, 10, 10), 255);

    process_coco_single_class(&masks_dir, &output, 255, 1, "object").unwrap();

    let contents = fs::read_to_string(&output).unwrap();
    assert!(contents.contains("\n  \"info\""));
}

#[test]
fn coco_extension_filter_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    fs::create_dir(&masks_dir).unwrap();

    let mask = GrayImage::new(16, 16);
    mask.save_with_format(masks_dir.join("upper.PNG"), image::ImageFormat::Png)
        .unwrap();

    let output = dir.path().join("instances.json");
    let coco_stats = process_coco_single_class(&masks_dir, &output, 255, 1, "object").unwrap();
    assert_eq!(coco_stats.total_files, 1);

    // The YOLO path matches extensions case-sensitively and skips the file
    let seg_dir = dir.path().join("labels");
    let yolo_stats =
        process_yolo_dataset(&masks_dir, &seg_dir, None, &single_class_map()).unwrap();
    assert_eq!(yolo_stats.total_files, 0);
}

#[test]
fn validator_accepts_produced_document() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let output = dir.path().join("instances.json");
    fs::create_dir(&masks_dir).unwrap();
    write_rect_mask(&masks_dir.join("a.png"), 80, 80, (10, 10, 20, 20), 255);

    process_coco_single_class(&masks_dir, &output, 255, 1, "object").unwrap();

    let summary = validate_coco_file(&output).unwrap();
    assert_eq!(summary.image_count, 1);
    assert_eq!(summary.annotation_count, 1);
    assert_eq!(summary.category_count, 1);
    assert_eq!(summary.per_category, vec![("object".to_string(), 1)]);
}

#[test]
fn validator_rejects_missing_key_and_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing_key = dir.path().join("missing.json");
    fs::write(
        &missing_key,
        r#"{"info": {}, "images": [], "annotations": []}"#,
    )
    .unwrap();
    let err = validate_coco_file(&missing_key).unwrap_err();
    assert!(err.to_string().contains("categories"));

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{not json").unwrap();
    assert!(validate_coco_file(&malformed).is_err());

    assert!(validate_coco_file(&dir.path().join("absent.json")).is_err());
}

#[test]
fn class_map_rejects_duplicates_and_background() {
    assert!(ClassMap::new(vec![]).is_err());
    assert!(ClassMap::new(vec![(0, "bg".to_string())]).is_err());
    assert!(ClassMap::new(vec![
        (255, "a".to_string()),
        (255, "b".to_string())
    ])
    .is_err());
    assert!(ClassMap::new(vec![
        (255, "a".to_string()),
        (128, "a".to_string())
    ])
    .is_err());

    let map = ClassMap::new(vec![(255, "a".to_string()), (128, "b".to_string())]).unwrap();
    assert_eq!(map.class_id(255), Some(0));
    assert_eq!(map.class_id(128), Some(1));
    assert_eq!(map.class_id(17), None);
}
