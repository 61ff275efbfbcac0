//! AQI categorization.
//!
//! Maps a numeric AQI value onto the six CPCB categories, each with a
//! display color, range label, and health advisory. Pure and total: every
//! finite input lands in exactly one tier.

use serde::{Deserialize, Serialize};

/// Neutral gray used when a backend-supplied category label is unrecognized.
pub const FALLBACK_COLOR: &str = "#6b7280";

/// The six AQI tiers, ordered from cleanest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

impl AqiCategory {
    /// All tiers in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Good,
        Self::Satisfactory,
        Self::Moderate,
        Self::Poor,
        Self::VeryPoor,
        Self::Severe,
    ];

    /// Classify a numeric AQI value.
    ///
    /// Thresholds are inclusive on the upper bound; anything above 400 is
    /// Severe. Negative inputs classify as Good, matching the upstream
    /// contract (documented behavior, not a clamp).
    #[must_use]
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            Self::Good
        } else if aqi <= 100.0 {
            Self::Satisfactory
        } else if aqi <= 200.0 {
            Self::Moderate
        } else if aqi <= 300.0 {
            Self::Poor
        } else if aqi <= 400.0 {
            Self::VeryPoor
        } else {
            Self::Severe
        }
    }

    /// Parse a backend category label ("Very Poor" etc.).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Good" => Some(Self::Good),
            "Satisfactory" => Some(Self::Satisfactory),
            "Moderate" => Some(Self::Moderate),
            "Poor" => Some(Self::Poor),
            "Very Poor" => Some(Self::VeryPoor),
            "Severe" => Some(Self::Severe),
            _ => None,
        }
    }

    /// Human-readable label, matching the backend's strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Severe => "Severe",
        }
    }

    /// Display color (hex) for this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#10b981",
            Self::Satisfactory => "#84cc16",
            Self::Moderate => "#eab308",
            Self::Poor => "#f97316",
            Self::VeryPoor => "#ef4444",
            Self::Severe => "#7c2d12",
        }
    }

    /// Nominal AQI range covered by this tier.
    #[must_use]
    pub const fn range_label(self) -> &'static str {
        match self {
            Self::Good => "0-50",
            Self::Satisfactory => "51-100",
            Self::Moderate => "101-200",
            Self::Poor => "201-300",
            Self::VeryPoor => "301-400",
            Self::Severe => "401-500",
        }
    }

    /// Health advisory sentence for this tier.
    #[must_use]
    pub const fn advisory(self) -> &'static str {
        match self {
            Self::Good => "Air quality is satisfactory. Enjoy outdoor activities!",
            Self::Satisfactory => {
                "Air quality is acceptable. Unusually sensitive people should limit outdoor exertion."
            }
            Self::Moderate => {
                "Members of sensitive groups may experience health effects. General public less likely affected."
            }
            Self::Poor => {
                "Everyone may begin to experience health effects. Sensitive groups may experience more serious effects."
            }
            Self::VeryPoor => {
                "Health alert: everyone may experience serious health effects. Avoid outdoor activities."
            }
            Self::Severe => "Health emergency. Everyone is likely to be affected. Stay indoors!",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color for a raw AQI value.
#[must_use]
pub fn color_for_aqi(aqi: f64) -> &'static str {
    AqiCategory::from_aqi(aqi).color()
}

/// Color for a backend-supplied category label.
///
/// Unknown labels fall back to neutral gray rather than failing; the label
/// is presentation input, not something worth rejecting a prediction over.
#[must_use]
pub fn color_for_label(label: &str) -> &'static str {
    AqiCategory::from_label(label).map_or(FALLBACK_COLOR, AqiCategory::color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(AqiCategory::from_aqi(0.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51.0), AqiCategory::Satisfactory);
        assert_eq!(AqiCategory::from_aqi(100.0), AqiCategory::Satisfactory);
        assert_eq!(AqiCategory::from_aqi(101.0), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(200.0), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(201.0), AqiCategory::Poor);
        assert_eq!(AqiCategory::from_aqi(300.0), AqiCategory::Poor);
        assert_eq!(AqiCategory::from_aqi(301.0), AqiCategory::VeryPoor);
        assert_eq!(AqiCategory::from_aqi(400.0), AqiCategory::VeryPoor);
        assert_eq!(AqiCategory::from_aqi(401.0), AqiCategory::Severe);
        assert_eq!(AqiCategory::from_aqi(500.0), AqiCategory::Severe);
        assert_eq!(AqiCategory::from_aqi(10_000.0), AqiCategory::Severe);
    }

    #[test]
    fn test_negative_input_classifies_as_good() {
        // Upstream contract: no lower bound on the first tier.
        assert_eq!(AqiCategory::from_aqi(-5.0), AqiCategory::Good);
    }

    #[test]
    fn test_concrete_scenarios() {
        assert_eq!(AqiCategory::from_aqi(128.0), AqiCategory::Moderate);
        assert_eq!(color_for_aqi(128.0), "#eab308");
        assert_eq!(AqiCategory::from_aqi(45.0), AqiCategory::Good);
        assert_eq!(color_for_aqi(45.0), "#10b981");
    }

    #[test]
    fn test_label_round_trip() {
        for category in AqiCategory::ALL {
            assert_eq!(AqiCategory::from_label(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_gray() {
        assert_eq!(AqiCategory::from_label("Hazardous"), None);
        assert_eq!(color_for_label("Hazardous"), FALLBACK_COLOR);
        assert_eq!(color_for_label(""), FALLBACK_COLOR);
    }

    #[test]
    fn test_every_tier_has_nonempty_metadata() {
        for category in AqiCategory::ALL {
            assert!(!category.color().is_empty());
            assert!(!category.advisory().is_empty());
            assert!(!category.range_label().is_empty());
        }
    }

    #[test]
    fn test_tiers_are_ordered() {
        for pair in AqiCategory::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
