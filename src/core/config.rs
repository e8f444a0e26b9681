//! Configuration for the earthquake map
//!
//! Every section has defaults that reproduce the stock setup (USGS weekly
//! feed, PB2002 plate boundaries, three base layers), so a configuration file
//! only needs the values it changes.

use crate::{
    core::{
        constants::{
            BOUNDARY_FEED_URL, DEFAULT_CENTER, DEFAULT_HTTP_TIMEOUT_SECS,
            DEFAULT_TILE_CACHE_CAPACITY, DEFAULT_ZOOM, SEISMIC_FEED_URL, USER_AGENT,
        },
        geo::LatLng,
    },
    layers::style::{MarkerStyle, PathStyle},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Initial view and zoom limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    /// Upper bound on top of each base layer's own max zoom
    pub max_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            min_zoom: 0.0,
            max_zoom: 19.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub seismic_url: String,
    pub boundary_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            seismic_url: SEISMIC_FEED_URL.to_string(),
            boundary_url: BOUNDARY_FEED_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// One selectable background tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayerConfig {
    pub id: String,
    pub name: String,
    /// Template with `{z}`, `{x}`, `{y}` and optionally `{s}`
    pub url_template: String,
    #[serde(default)]
    pub subdomains: Vec<String>,
    pub max_zoom: u8,
    #[serde(default)]
    pub attribution: String,
}

impl BaseLayerConfig {
    pub fn satellite() -> Self {
        Self {
            id: "satellite".to_string(),
            name: "Satellite".to_string(),
            url_template:
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            subdomains: Vec::new(),
            max_zoom: 19,
            attribution: "Tiles \u{a9} Esri".to_string(),
        }
    }

    pub fn grayscale() -> Self {
        Self {
            id: "grayscale".to_string(),
            name: "Grayscale".to_string(),
            url_template: "https://{s}.tiles.wmflabs.org/basemap/gray/{z}/{x}/{y}.png".to_string(),
            subdomains: abc(),
            max_zoom: 18,
            attribution: "Map data \u{a9} OpenStreetMap contributors".to_string(),
        }
    }

    pub fn outdoors() -> Self {
        Self {
            id: "outdoors".to_string(),
            name: "Outdoors".to_string(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: abc(),
            max_zoom: 19,
            attribution: "Map data \u{a9} OpenStreetMap contributors".to_string(),
        }
    }
}

fn abc() -> Vec<String> {
    vec!["a".to_string(), "b".to_string(), "c".to_string()]
}

/// Top-level configuration, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeMapConfig {
    pub view: ViewConfig,
    pub feeds: FeedConfig,
    pub http: HttpConfig,
    pub base_layers: Vec<BaseLayerConfig>,
    /// Id of the base layer shown at startup
    pub default_base_layer: String,
    pub markers: MarkerStyle,
    pub boundaries: PathStyle,
    pub tile_cache_capacity: usize,
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            feeds: FeedConfig::default(),
            http: HttpConfig::default(),
            base_layers: vec![
                BaseLayerConfig::satellite(),
                BaseLayerConfig::grayscale(),
                BaseLayerConfig::outdoors(),
            ],
            default_base_layer: "satellite".to_string(),
            markers: MarkerStyle::default(),
            boundaries: PathStyle::plate_boundaries(),
            tile_cache_capacity: DEFAULT_TILE_CACHE_CAPACITY,
        }
    }
}

impl QuakeMapConfig {
    /// Reads and validates a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)
            .map_err(|e| MapError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn base_layer(&self, id: &str) -> Option<&BaseLayerConfig> {
        self.base_layers.iter().find(|layer| layer.id == id)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MapError::Config(msg));

        if self.base_layers.is_empty() {
            return invalid("at least one base layer is required".to_string());
        }
        for (i, layer) in self.base_layers.iter().enumerate() {
            if self.base_layers[..i].iter().any(|other| other.id == layer.id) {
                return invalid(format!("duplicate base layer id '{}'", layer.id));
            }
            if ["{z}", "{x}", "{y}"]
                .iter()
                .any(|p| !layer.url_template.contains(p))
            {
                return invalid(format!(
                    "base layer '{}' url template must contain {{z}}, {{x}} and {{y}}",
                    layer.id
                ));
            }
            if layer.url_template.contains("{s}") && layer.subdomains.is_empty() {
                return invalid(format!(
                    "base layer '{}' uses {{s}} but lists no subdomains",
                    layer.id
                ));
            }
        }
        if self.base_layer(&self.default_base_layer).is_none() {
            return invalid(format!(
                "default base layer '{}' is not configured",
                self.default_base_layer
            ));
        }

        let view = &self.view;
        if !view.center.is_valid() {
            return invalid(format!(
                "initial center ({}, {}) is not a valid coordinate",
                view.center.lat, view.center.lng
            ));
        }
        if !(view.min_zoom.is_finite() && view.max_zoom.is_finite() && view.zoom.is_finite()) {
            return invalid("zoom levels must be finite".to_string());
        }
        if view.min_zoom < 0.0 || view.min_zoom > view.max_zoom {
            return invalid(format!(
                "zoom limits {}..{} are inverted or negative",
                view.min_zoom, view.max_zoom
            ));
        }

        if self.http.timeout_secs == 0 {
            return invalid("http timeout must be positive".to_string());
        }
        if self.feeds.seismic_url.trim().is_empty() || self.feeds.boundary_url.trim().is_empty() {
            return invalid("feed urls must not be empty".to_string());
        }
        if self.tile_cache_capacity == 0 {
            return invalid("tile cache capacity must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = QuakeMapConfig::default();
        config.validate().unwrap();
        assert_eq!(config.base_layers.len(), 3);
        assert_eq!(config.default_base_layer, "satellite");
        assert_eq!(config.view.center, LatLng::new(37.8, -96.0));
        assert_eq!(config.boundaries.weight, 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = QuakeMapConfig::from_json_str(
            r#"{"view":{"zoom":3},"http":{"timeout_secs":5},"default_base_layer":"outdoors"}"#,
        )
        .unwrap();
        assert_eq!(config.view.zoom, 3.0);
        assert_eq!(config.view.center, LatLng::new(37.8, -96.0));
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.default_base_layer, "outdoors");
        assert_eq!(config.feeds.seismic_url, SEISMIC_FEED_URL);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            r#"{"base_layers":[]}"#,
            r#"{"default_base_layer":"terrain"}"#,
            r#"{"http":{"timeout_secs":0}}"#,
            r#"{"view":{"min_zoom":10,"max_zoom":2}}"#,
            r#"{"base_layers":[{"id":"a","name":"A","url_template":"https://x/{z}/{x}.png","max_zoom":3}],"default_base_layer":"a"}"#,
            r#"{"base_layers":[{"id":"a","name":"A","url_template":"https://{s}.x/{z}/{x}/{y}.png","max_zoom":3}],"default_base_layer":"a"}"#,
        ];
        for json in bad {
            assert!(
                matches!(QuakeMapConfig::from_json_str(json), Err(MapError::Config(_))),
                "accepted {}",
                json
            );
        }
        assert!(matches!(
            QuakeMapConfig::from_json_str("{"),
            Err(MapError::Serialization(_))
        ));

        let rotated = QuakeMapConfig::from_json_str(
            r#"{"base_layers":[{"id":"a","name":"A","url_template":"https://{s}.x/{z}/{x}/{y}.png","subdomains":["a","b"],"max_zoom":3}],"default_base_layer":"a"}"#,
        )
        .unwrap();
        assert_eq!(rotated.base_layers[0].subdomains, vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = QuakeMapConfig::load("/definitely/not/here/quakemap.json");
        assert!(matches!(result, Err(MapError::Io(_))));
    }
}
