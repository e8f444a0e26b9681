pub mod geojson;
pub mod seismic;

pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer};
pub use seismic::{FeatureError, RejectedFeature, SeismicFeature, SeismicFeed};
