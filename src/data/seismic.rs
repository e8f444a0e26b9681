//! Earthquake records read from a GeoJSON summary feed

use crate::{
    core::geo::LatLng,
    data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    symbology::DepthClass,
};
use serde_json::Value;
use thiserror::Error;

/// Title used when a feature carries none
pub const UNTITLED: &str = "Unnamed earthquake";

/// Why a single feed entry could not become an earthquake record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("feature has no geometry")]
    MissingGeometry,
    #[error("expected a Point geometry, found {0}")]
    NotAPoint(&'static str),
    #[error("expected [longitude, latitude, depth], found {0} coordinates")]
    TooFewCoordinates(usize),
    #[error("coordinate {0} is not finite")]
    NonFiniteCoordinate(usize),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("feature has no magnitude")]
    MissingMagnitude,
    #[error("magnitude is not a finite number: {0}")]
    InvalidMagnitude(String),
}

fn geometry_kind(geometry: &GeoJsonGeometry) -> &'static str {
    match geometry {
        GeoJsonGeometry::Point { .. } => "Point",
        GeoJsonGeometry::LineString { .. } => "LineString",
        GeoJsonGeometry::Polygon { .. } => "Polygon",
        GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
        GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
        GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
        GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
    }
}

/// One earthquake: where, how deep, how strong
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicFeature {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
    pub title: String,
}

impl SeismicFeature {
    /// Reads coordinates `[lng, lat, depth]` and the `mag`/`title` properties
    pub fn from_feature(feature: &GeoJsonFeature) -> Result<Self, FeatureError> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(FeatureError::MissingGeometry)?;
        let coordinates = match geometry {
            GeoJsonGeometry::Point { coordinates } => coordinates,
            other => return Err(FeatureError::NotAPoint(geometry_kind(other))),
        };

        let &[longitude, latitude, depth_km, ..] = coordinates.as_slice() else {
            return Err(FeatureError::TooFewCoordinates(coordinates.len()));
        };
        if let Some(i) = [longitude, latitude, depth_km]
            .iter()
            .position(|c| !c.is_finite())
        {
            return Err(FeatureError::NonFiniteCoordinate(i));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(FeatureError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(FeatureError::LongitudeOutOfRange(longitude));
        }

        let magnitude = match feature.property("mag") {
            None | Some(Value::Null) => return Err(FeatureError::MissingMagnitude),
            Some(value) => value
                .as_f64()
                .filter(|m| m.is_finite())
                .ok_or_else(|| FeatureError::InvalidMagnitude(value.to_string()))?,
        };

        let title = feature
            .property("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        Ok(Self {
            longitude,
            latitude,
            depth_km,
            magnitude,
            title,
        })
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn depth_class(&self) -> DepthClass {
        DepthClass::classify(self.depth_km)
    }

    /// Popup body: the title on the first line, then magnitude and depth
    pub fn popup_text(&self) -> String {
        format!(
            "{}\nMagnitude: {}\nDepth: {} km",
            self.title, self.magnitude, self.depth_km
        )
    }
}

/// A feed entry that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFeature {
    /// Position in the feed's feature list
    pub index: usize,
    pub id: Option<String>,
    pub error: FeatureError,
}

/// Validated contents of one seismic feed download
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeismicFeed {
    pub features: Vec<SeismicFeature>,
    pub rejected: Vec<RejectedFeature>,
}

impl SeismicFeed {
    /// Validates every feature independently; bad entries are set aside
    /// without affecting the rest.
    pub fn from_geojson(document: &GeoJson) -> Self {
        let mut feed = SeismicFeed::default();

        for (index, feature) in document.features().iter().enumerate() {
            match SeismicFeature::from_feature(feature) {
                Ok(record) => feed.features.push(record),
                Err(error) => {
                    let id = feature.id.as_ref().map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });
                    log::warn!(
                        "Skipping seismic feature #{} ({}): {}",
                        index,
                        id.as_deref().unwrap_or("no id"),
                        error
                    );
                    feed.rejected.push(RejectedFeature { index, id, error });
                }
            }
        }

        feed
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn max_magnitude(&self) -> Option<f64> {
        self.features
            .iter()
            .map(|f| f.magnitude)
            .reduce(f64::max)
    }
}
