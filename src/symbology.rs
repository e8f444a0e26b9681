//! Mapping from earthquake attributes to marker appearance.
//!
//! Depth picks one of six fill colors, magnitude scales the radius linearly.

use crate::{core::constants::MAGNITUDE_RADIUS_FACTOR, layers::style::Color};
use serde::{Deserialize, Serialize};

/// Depth bucket of an earthquake hypocenter, deepest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthClass {
    /// deeper than 90 km
    Over90,
    From70To90,
    From50To70,
    From30To50,
    From10To30,
    /// 10 km or shallower, including negative depths and NaN
    Under10,
}

impl DepthClass {
    /// Every bucket in legend order
    pub const ALL: [DepthClass; 6] = [
        DepthClass::Over90,
        DepthClass::From70To90,
        DepthClass::From50To70,
        DepthClass::From30To50,
        DepthClass::From10To30,
        DepthClass::Under10,
    ];

    /// Classifies a depth in kilometres.
    ///
    /// Thresholds are exclusive and checked from the deepest bucket down, so
    /// exactly 90 km is `From70To90`.
    pub fn classify(depth_km: f64) -> Self {
        if depth_km > 90.0 {
            DepthClass::Over90
        } else if depth_km > 70.0 {
            DepthClass::From70To90
        } else if depth_km > 50.0 {
            DepthClass::From50To70
        } else if depth_km > 30.0 {
            DepthClass::From30To50
        } else if depth_km > 10.0 {
            DepthClass::From10To30
        } else {
            DepthClass::Under10
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DepthClass::Over90 => Color::rgb(0xFF, 0x00, 0x00),
            DepthClass::From70To90 => Color::rgb(0xFF, 0x7F, 0x00),
            DepthClass::From50To70 => Color::rgb(0xFF, 0xFF, 0x00),
            DepthClass::From30To50 => Color::rgb(0x7F, 0xFF, 0x00),
            DepthClass::From10To30 => Color::rgb(0x00, 0xFF, 0x00),
            DepthClass::Under10 => Color::rgb(0x00, 0xFF, 0xFF),
        }
    }

    /// Range label shown in the legend
    pub fn label(&self) -> &'static str {
        match self {
            DepthClass::Over90 => "> 90",
            DepthClass::From70To90 => "70-90",
            DepthClass::From50To70 => "50-70",
            DepthClass::From30To50 => "30-50",
            DepthClass::From10To30 => "10-30",
            DepthClass::Under10 => "< 10",
        }
    }
}

impl std::fmt::Display for DepthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.label())
    }
}

/// Fill color for a depth in kilometres
pub fn depth_color(depth_km: f64) -> Color {
    DepthClass::classify(depth_km).color()
}

/// Marker radius in pixels for a magnitude.
///
/// Exactly `5 * magnitude` for non-negative magnitudes. Negative and
/// non-finite magnitudes (USGS reports small negative values for some
/// micro-quakes) give a radius of zero.
pub fn magnitude_radius(magnitude: f64) -> f64 {
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return 0.0;
    }
    magnitude * MAGNITUDE_RADIUS_FACTOR
}
