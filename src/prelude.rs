//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    config::{BaseLayerConfig, FeedConfig, HttpConfig, QuakeMapConfig, ViewConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    group::MarkerGroup,
    manager::LayerManager,
    marker::CircleMarker,
    style::{CircleStyle, Color, MarkerStyle, PathStyle},
    tile::TileLayer,
};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer},
    seismic::{FeatureError, SeismicFeature, SeismicFeed},
};

pub use crate::feeds::{FeedEvent, FeedFetcher, FeedKind, HttpFetcher};

pub use crate::context::{FeedStatus, QuakeMapContext, QuakeSummary};

pub use crate::symbology::{depth_color, magnitude_radius, DepthClass};

pub use crate::ui::{ControlManager, LayerControl, LayerToggle, Legend, Popup, PopupManager};

pub use crate::{MapError, Result};

/// Fast hash collections used internally
pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
pub type HashSet<T> = fxhash::FxHashSet<T>;
