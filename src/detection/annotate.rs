use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::CrackRegion;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw an unfilled red rectangle outline at each region's bounding box on a
/// copy of the original. The caller's buffer is never mutated.
///
/// The stroke is two pixels: the box itself plus a one-pixel inset, so the
/// outline never leaves the region bounds.
pub fn draw_regions(original: &RgbImage, regions: &[CrackRegion]) -> RgbImage {
    let mut canvas = original.clone();
    for region in regions {
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(region.x as i32, region.y as i32).of_size(region.width.max(1), region.height.max(1)),
            OUTLINE_COLOR,
        );
        if region.width > 2 && region.height > 2 {
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(region.x as i32 + 1, region.y as i32 + 1)
                    .of_size(region.width - 2, region.height - 2),
                OUTLINE_COLOR,
            );
        }
    }
    canvas
}
