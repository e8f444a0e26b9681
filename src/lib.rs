//! # quakemap
//!
//! Earthquake and tectonic-plate map built on a Leaflet-style layer model.
//!
//! The crate fetches two GeoJSON feeds (recent earthquakes and plate
//! boundaries), turns them into map layers (depth-colored circle markers and a
//! styled boundary overlay), and exposes base-layer and overlay toggling
//! through a layer control. The model is headless; the `egui` feature adds a
//! widget that draws it.

pub mod context;
pub mod core;
pub mod data;
pub mod feeds;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod symbology;
pub mod tiles;
pub mod traits;
pub mod ui;

#[cfg(feature = "tokio-runtime")]
pub mod background;

pub use crate::core::constants;

// Re-export public API
pub use context::{FeedStatus, QuakeMapContext, QuakeSummary};
pub use core::{
    config::QuakeMapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};
pub use data::{
    geojson::{GeoJson, GeoJsonLayer},
    seismic::{FeatureError, SeismicFeature, SeismicFeed},
};
pub use feeds::{FeedEvent, FeedFetcher, HttpFetcher};
pub use layers::{group::MarkerGroup, marker::CircleMarker, tile::TileLayer};
pub use symbology::{magnitude_radius, DepthClass};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
