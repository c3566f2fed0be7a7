//! YOLO record formatting
//!
//! Turns pixel contours into normalized YOLO segmentation and bounding-box
//! text records. All normalized values are rounded to 6 decimal places and
//! formatted with the default float display, so `0.5` is written as `0.5`
//! rather than `0.500000`.

use crate::coco::bounding_rect;

/// Round a normalized coordinate to 6 decimal places.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// One YOLO segmentation line: `class_id x1 y1 x2 y2 ... xn yn`.
pub fn polygon_record(
    class_id: usize,
    contour: &[(u32, u32)],
    width: u32,
    height: u32,
) -> String {
    let mut record = String::with_capacity(contour.len() * 16);
    record.push_str(&class_id.to_string());
    for &(x, y) in contour {
        let x_norm = round6(x as f64 / width as f64);
        let y_norm = round6(y as f64 / height as f64);
        record.push_str(&format!(" {} {}", x_norm, y_norm));
    }
    record
}

/// One YOLO bounding-box line: `class_id center_x center_y width height`,
/// derived from the contour's pixel bounding rectangle.
pub fn bbox_record(class_id: usize, contour: &[(u32, u32)], width: u32, height: u32) -> String {
    let [x, y, w, h] = bounding_rect(contour);

    let x_center = round6((x + w / 2.0) / width as f64);
    let y_center = round6((y + h / 2.0) / height as f64);
    let w_norm = round6(w / width as f64);
    let h_norm = round6(h / height as f64);

    format!("{} {} {} {} {}", class_id, x_center, y_center, w_norm, h_norm)
}
