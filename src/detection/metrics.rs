use crate::error::AnalysisError;
use crate::models::{CrackRegion, Severity};

/// Aggregated coverage statistics for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrackMetrics {
    pub total_area: f64,
    pub crack_percentage: f64,
    pub severity: Severity,
}

/// Pure aggregation of the retained regions against the original image size.
///
/// Zero regions yield zero totals and `Low`; a zero-area image cannot be
/// scored at all.
pub fn compute(regions: &[CrackRegion], width: u32, height: u32) -> Result<CrackMetrics, AnalysisError> {
    let image_area = width as f64 * height as f64;
    if image_area == 0.0 {
        return Err(AnalysisError::Processing(
            "image has zero area, cannot compute crack coverage".to_string(),
        ));
    }

    let total_area: f64 = regions.iter().map(|r| r.area).sum();
    let crack_percentage = total_area / image_area * 100.0;

    Ok(CrackMetrics {
        total_area,
        crack_percentage,
        severity: Severity::from_percentage(crack_percentage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(area: f64) -> CrackRegion {
        CrackRegion {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            area,
        }
    }

    #[test]
    fn no_regions_is_low_and_zero() {
        let m = compute(&[], 100, 100).unwrap();
        assert_eq!(m.total_area, 0.0);
        assert_eq!(m.crack_percentage, 0.0);
        assert_eq!(m.severity, Severity::Low);
    }

    #[test]
    fn totals_sum_region_areas() {
        let m = compute(&[region(300.0), region(200.0)], 1000, 1000).unwrap();
        assert_eq!(m.total_area, 500.0);
        assert!((m.crack_percentage - 0.05).abs() < 1e-9);
        assert_eq!(m.severity, Severity::Low);
    }

    #[test]
    fn six_percent_coverage_is_high() {
        let m = compute(&[region(600.0)], 100, 100).unwrap();
        assert!((m.crack_percentage - 6.0).abs() < 1e-9);
        assert_eq!(m.severity, Severity::High);
    }

    #[test]
    fn two_percent_coverage_is_medium() {
        let m = compute(&[region(200.0)], 100, 100).unwrap();
        assert_eq!(m.severity, Severity::Medium);
    }

    #[test]
    fn zero_area_image_is_an_error() {
        let err = compute(&[], 0, 100).unwrap_err();
        assert!(matches!(err, AnalysisError::Processing(_)));
    }
}
