use serde::{Deserialize, Serialize};

/// A single detected crack candidate: axis-aligned bounding box in image
/// coordinates (origin top-left) plus the traced contour's polygon area.
///
/// The polygon area is usually smaller than `width * height` since cracks are
/// thin, irregular shapes inside their box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: f64,
}

impl CrackRegion {
    pub fn bounding_box_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Center of the bounding box.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Overall damage classification derived from crack coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify coverage percentage. Thresholds are fixed: below 1% is `Low`,
    /// below 5% is `Medium`, 5% and above is `High`.
    pub fn from_percentage(crack_percentage: f64) -> Self {
        if crack_percentage < 1.0 {
            Severity::Low
        } else if crack_percentage < 5.0 {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Complete outcome of one analysis run.
///
/// Invariants: `crack_count == crack_regions.len()`, `total_crack_area` is the
/// sum of the region areas, `cracks_detected` iff any region survived the
/// min-area filter, and `severity` is `Severity::from_percentage` of
/// `crack_percentage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub cracks_detected: bool,
    pub crack_count: usize,
    pub total_crack_area: f64,
    pub crack_percentage: f64,
    pub severity: Severity,
    pub crack_regions: Vec<CrackRegion>,
    pub processed_image_base64: String,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds_at_boundaries() {
        assert_eq!(Severity::from_percentage(0.0), Severity::Low);
        assert_eq!(Severity::from_percentage(0.999), Severity::Low);
        assert_eq!(Severity::from_percentage(1.0), Severity::Medium);
        assert_eq!(Severity::from_percentage(4.999), Severity::Medium);
        assert_eq!(Severity::from_percentage(5.0), Severity::High);
        assert_eq!(Severity::from_percentage(100.0), Severity::High);
    }

    #[test]
    fn severity_serializes_as_label() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }

    #[test]
    fn region_serializes_camel_case() {
        let region = CrackRegion {
            x: 3,
            y: 4,
            width: 10,
            height: 20,
            area: 55.5,
        };
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["x"], 3);
        assert_eq!(json["width"], 10);
        assert_eq!(json["area"], 55.5);
    }

    #[test]
    fn region_geometry_helpers() {
        let region = CrackRegion {
            x: 10,
            y: 20,
            width: 40,
            height: 20,
            area: 300.0,
        };
        assert_eq!(region.bounding_box_area(), 800);
        assert_eq!(region.center(), (30, 30));
        assert!((region.aspect_ratio() - 2.0).abs() < f32::EPSILON);
    }
}
