//! Debug overlay: outlines source and pasted boxes on a copy of the
//! augmented raster so a run can be inspected visually.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::annotation::LabeledBox;

/// Outline color for boxes coming from the source annotation.
pub const SOURCE_COLOR: Rgb<u8> = Rgb([60, 180, 75]);

/// Outline color for boxes added by the augmentation pass.
pub const PASTED_COLOR: Rgb<u8> = Rgb([230, 25, 75]);

/// Returns a copy of the image with source boxes outlined in green and
/// pasted boxes in red.
pub fn draw_overlay(image: &RgbImage, source: &[LabeledBox], pasted: &[LabeledBox]) -> RgbImage {
    let mut output = image.clone();
    draw_boxes(&mut output, source, SOURCE_COLOR);
    draw_boxes(&mut output, pasted, PASTED_COLOR);
    output
}

fn draw_boxes(image: &mut RgbImage, boxes: &[LabeledBox], color: Rgb<u8>) {
    for labeled in boxes {
        let x = labeled.bbox.min.x as i32;
        let y = labeled.bbox.min.y as i32;
        let width = labeled.bbox.width() as u32;
        let height = labeled.bbox.height() as u32;

        if width == 0 || height == 0 {
            continue;
        }

        // Stack offset rectangles to get a thicker outline
        for offset in 0..3 {
            let rect = Rect::at(x - offset, y - offset)
                .of_size(width + (offset * 2) as u32, height + (offset * 2) as u32);
            draw_hollow_rect_mut(image, rect, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bbox::Bbox;
    use glam::Vec2;

    #[test]
    fn test_overlay_outlines_boxes() {
        let image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let source = vec![LabeledBox {
            class_id: 0,
            bbox: Bbox::new(Vec2::new(20.0, 20.0), Vec2::new(40.0, 40.0)),
        }];
        let pasted = vec![LabeledBox {
            class_id: 0,
            bbox: Bbox::new(Vec2::new(60.0, 60.0), Vec2::new(76.0, 76.0)),
        }];

        let overlay = draw_overlay(&image, &source, &pasted);
        // Corners of the outlines carry the respective colors
        assert_eq!(overlay.get_pixel(20, 20), &SOURCE_COLOR);
        assert_eq!(overlay.get_pixel(60, 60), &PASTED_COLOR);
        // Box interiors are untouched
        assert_eq!(overlay.get_pixel(30, 30), &Rgb([0, 0, 0]));
        assert_eq!(overlay.get_pixel(68, 68), &Rgb([0, 0, 0]));
        // The input image is not mutated
        assert_eq!(image.get_pixel(20, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_zero_extent_boxes_are_ignored() {
        let image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let degenerate = vec![LabeledBox {
            class_id: 0,
            bbox: Bbox::new(Vec2::ZERO, Vec2::ZERO),
        }];
        let overlay = draw_overlay(&image, &degenerate, &[]);
        assert_eq!(overlay, image);
    }
}
