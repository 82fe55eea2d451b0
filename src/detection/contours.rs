use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use tracing::debug;

use crate::models::CrackRegion;

/// Trace external contours in the binary mask and keep those whose polygon
/// area reaches `min_area`.
///
/// Only outer borders are considered; holes nested inside a region are
/// ignored. The returned order is the border-following discovery order, which
/// is not spatially sorted. Overlapping regions are kept as-is, without
/// merging or deduplication.
pub fn extract_regions(mask: &GrayImage, min_area: f64) -> Vec<CrackRegion> {
    let contours = find_contours::<i32>(mask);
    let total = contours.len();

    let regions: Vec<CrackRegion> = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(region_from_contour)
        .filter(|r| r.area >= min_area)
        .collect();

    debug!(
        contours = total,
        kept = regions.len(),
        min_area,
        "contours filtered"
    );
    regions
}

/// Value-typed descriptor for one traced border: bounding box from the point
/// extrema, area from the shoelace formula. Native contour handles are not
/// retained past this call.
fn region_from_contour(contour: &Contour<i32>) -> Option<CrackRegion> {
    let points = &contour.points;
    let first = points.first()?;

    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in points.iter() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(CrackRegion {
        x: min_x as u32,
        y: min_y as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
        area: polygon_area(contour),
    })
}

/// Shoelace area of the closed boundary polygon.
fn polygon_area(contour: &Contour<i32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }
    let mut doubled = 0i64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    doubled.abs() as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn mask_with_square(size: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
        let mut mask = GrayImage::new(size, size);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let mask = GrayImage::new(50, 50);
        assert!(extract_regions(&mask, 0.0).is_empty());
    }

    #[test]
    fn solid_square_bounding_box_and_area() {
        // The outer border of a solid square of side s traces pixel centers,
        // so the enclosed polygon area is (s - 1)^2.
        let mask = mask_with_square(64, 10, 12, 20);
        let regions = extract_regions(&mask, 0.0);
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!((r.x, r.y, r.width, r.height), (10, 12, 20, 20));
        assert_eq!(r.area, 361.0);
    }

    #[test]
    fn area_is_polygon_area_not_box_area() {
        let mask = mask_with_square(64, 5, 5, 20);
        let regions = extract_regions(&mask, 0.0);
        assert!(regions[0].area < regions[0].bounding_box_area() as f64);
    }

    #[test]
    fn min_area_filter_is_monotonic() {
        let mut mask = mask_with_square(128, 10, 10, 20); // area 361
        for y in 60..70 {
            for x in 60..70 {
                mask.put_pixel(x, y, Luma([255])); // area 81
            }
        }

        let all = extract_regions(&mask, 0.0);
        assert_eq!(all.len(), 2);

        let filtered = extract_regions(&mask, 100.0);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].area >= 100.0);

        let none = extract_regions(&mask, 1000.0);
        assert!(none.is_empty());

        // Raising the floor only removes regions.
        for r in &filtered {
            assert!(all.contains(r));
        }
    }

    #[test]
    fn nested_hole_border_is_ignored() {
        // A ring: outer border kept, the inner hole border dropped.
        let mut mask = mask_with_square(64, 10, 10, 30);
        for y in 18..32 {
            for x in 18..32 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let regions = extract_regions(&mask, 0.0);
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].x, regions[0].y), (10, 10));
    }

    #[test]
    fn tiny_contours_have_zero_area() {
        let mut mask = GrayImage::new(16, 16);
        mask.put_pixel(8, 8, Luma([255]));
        let regions = extract_regions(&mask, 0.0);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 0.0);
        assert_eq!((regions[0].width, regions[0].height), (1, 1));
    }
}
