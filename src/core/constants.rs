//! Core constants derived from Leaflet defaults and the earthquake map's fixed setup.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Web Mercator cannot represent the poles; latitudes are clamped to this.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Initial map center (continental United States).
pub const DEFAULT_CENTER: (f64, f64) = (37.8, -96.0);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 4.0;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Marker radius in pixels per unit of magnitude.
pub const MAGNITUDE_RADIUS_FACTOR: f64 = 5.0;

/// USGS summary feed of every earthquake in the past seven days.
pub const SEISMIC_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate model (Bird, 2003) as GeoJSON.
pub const BOUNDARY_FEED_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_plates.json";

/// Public tile servers reject requests without a descriptive User-Agent.
pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// Request timeout for feed and tile downloads.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Decoded tiles kept around before eviction.
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 512;

pub const EARTHQUAKES_OVERLAY_ID: &str = "earthquakes";
pub const EARTHQUAKES_OVERLAY_NAME: &str = "Earthquakes";
pub const TECTONIC_PLATES_OVERLAY_ID: &str = "tectonic-plates";
pub const TECTONIC_PLATES_OVERLAY_NAME: &str = "Tectonic Plates";

/// Overlay stacking: plate outlines below the clickable markers.
pub const BASE_LAYER_Z_INDEX: i32 = 0;
pub const BOUNDARY_Z_INDEX: i32 = 10;
pub const MARKER_Z_INDEX: i32 = 20;
