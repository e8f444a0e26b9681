//! Application state: the map, its controls and what each feed delivered.

use crate::{
    core::{
        config::QuakeMapConfig,
        constants::EARTHQUAKES_OVERLAY_ID,
        geo::Point,
        map::{Map, MapOptions},
        viewport::Viewport,
    },
    data::{geojson::GeoJson, seismic::SeismicFeed},
    feeds::{
        boundaries::build_boundary_layer, seismic::build_marker_group, FeedEvent, FeedKind,
    },
    layers::{group::MarkerGroup, tile::TileLayer},
    rendering::context::RenderContext,
    ui::{
        controls::{ControlManager, LayerControl, LayerToggle},
        legend::Legend,
        popup::{Popup, PopupManager},
    },
    Result,
};
use std::fmt;

/// Lifecycle of one feed: pending until its single event arrives
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Pending,
    Loaded { items: usize, rejected: usize },
    Failed(String),
}

impl FeedStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, FeedStatus::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FeedStatus::Failed(_))
    }
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedStatus::Pending => write!(f, "loading"),
            FeedStatus::Loaded { items, rejected: 0 } => write!(f, "{} loaded", items),
            FeedStatus::Loaded { items, rejected } => {
                write!(f, "{} loaded, {} skipped", items, rejected)
            }
            FeedStatus::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// What the earthquake feed put on the map
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeSummary {
    pub count: usize,
    pub rejected: usize,
    pub max_magnitude: Option<f64>,
}

impl QuakeSummary {
    pub fn from_feed(feed: &SeismicFeed) -> Self {
        Self {
            count: feed.len(),
            rejected: feed.rejected.len(),
            max_magnitude: feed.max_magnitude(),
        }
    }
}

impl fmt::Display for QuakeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} earthquakes", self.count)?;
        if let Some(max) = self.max_magnitude {
            write!(f, ", largest M {:.1}", max)?;
        }
        if self.rejected > 0 {
            write!(f, " ({} malformed skipped)", self.rejected)?;
        }
        Ok(())
    }
}

/// Owns everything the viewer shows. Feed results are applied explicitly,
/// so there is a single writer and no shared state.
pub struct QuakeMapContext {
    config: QuakeMapConfig,
    map: Map,
    controls: ControlManager,
    popups: PopupManager,
    seismic_status: FeedStatus,
    boundary_status: FeedStatus,
    summary: Option<QuakeSummary>,
    render_context: RenderContext,
}

impl QuakeMapContext {
    /// Map at the configured view with every base layer registered and the
    /// default one active. Overlays and controls arrive with the feeds.
    pub fn new(config: QuakeMapConfig) -> Result<Self> {
        config.validate()?;

        let size = Point::new(800.0, 600.0);
        let viewport = Viewport::new(config.view.center, config.view.zoom, size);
        let options = MapOptions {
            min_zoom: config.view.min_zoom,
            max_zoom: config.view.max_zoom,
            ..MapOptions::default()
        };
        let mut map = Map::with_options(viewport, options);

        for base in &config.base_layers {
            map.add_base_layer(TileLayer::from_config(base))?;
        }
        map.set_base_layer(&config.default_base_layer)?;
        // Re-apply after the base layer's zoom limit is known
        map.viewport.set_zoom(config.view.zoom);

        Ok(Self {
            config,
            map,
            controls: ControlManager::new(),
            popups: PopupManager::new(),
            seismic_status: FeedStatus::Pending,
            boundary_status: FeedStatus::Pending,
            summary: None,
            render_context: RenderContext::new(size.x as u32, size.y as u32),
        })
    }

    pub fn apply(&mut self, event: FeedEvent) -> Result<()> {
        match event {
            FeedEvent::Seismic(result) => self.apply_seismic(result),
            FeedEvent::Boundaries(result) => self.apply_boundaries(result),
        }
    }

    /// Adds the "Earthquakes" overlay and the depth legend, or records the
    /// failure
    pub fn apply_seismic(&mut self, result: Result<SeismicFeed>) -> Result<()> {
        let feed = match result {
            Ok(feed) => feed,
            Err(e) => {
                log::error!("{} unavailable: {}", FeedKind::Seismic, e);
                self.seismic_status = FeedStatus::Failed(e.to_string());
                return Ok(());
            }
        };

        let group = build_marker_group(&feed, &self.config.markers);
        self.map.add_overlay(Box::new(group))?;
        self.controls.attach_legend(Legend::depth());

        let summary = QuakeSummary::from_feed(&feed);
        log::info!("{}", summary);
        self.seismic_status = FeedStatus::Loaded {
            items: summary.count,
            rejected: summary.rejected,
        };
        self.summary = Some(summary);
        Ok(())
    }

    /// Adds the "Tectonic Plates" overlay. The layer control is attached
    /// either way so base layers stay switchable.
    pub fn apply_boundaries(&mut self, result: Result<GeoJson>) -> Result<()> {
        match result {
            Ok(document) => {
                let items = document.item_count();
                let layer = build_boundary_layer(document, &self.config.boundaries);
                self.map.add_overlay(Box::new(layer))?;
                self.boundary_status = FeedStatus::Loaded { items, rejected: 0 };
            }
            Err(e) => {
                log::error!("{} unavailable: {}", FeedKind::Boundaries, e);
                self.boundary_status = FeedStatus::Failed(e.to_string());
            }
        }
        self.controls.attach_layer_control(LayerControl::new());
        Ok(())
    }

    pub fn select_base_layer(&mut self, layer_id: &str) -> Result<()> {
        self.map.set_base_layer(layer_id)
    }

    /// Hiding the earthquakes overlay also closes its popup
    pub fn set_overlay_visible(&mut self, layer_id: &str, visible: bool) -> Result<()> {
        self.map.set_overlay_visible(layer_id, visible)?;
        if !visible && layer_id == EARTHQUAKES_OVERLAY_ID {
            self.popups.close();
        }
        Ok(())
    }

    pub fn handle_toggle(&mut self, toggle: LayerToggle) -> Result<()> {
        match toggle {
            LayerToggle::SelectBase(id) => self.select_base_layer(&id),
            LayerToggle::SetOverlay { id, visible } => self.set_overlay_visible(&id, visible),
        }
    }

    /// Opens the popup of the marker under `point` (container pixels), or
    /// closes the open popup when nothing is hit. Returns whether a marker
    /// was hit.
    pub fn click_at(&mut self, point: Point) -> bool {
        let popup = self.map.marker_at(&point).and_then(|marker| {
            marker.popup_text().map(|text| {
                Popup::from_text(marker.position(), marker.radius() as f32, text)
            })
        });
        match popup {
            Some(popup) => {
                self.popups.open(popup);
                true
            }
            None => {
                self.popups.close();
                false
            }
        }
    }

    /// Builds this frame's draw commands at the map's current size
    pub fn render(&mut self) -> Result<&RenderContext> {
        let size = self.map.viewport.size;
        self.render_context
            .begin_frame(size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        self.map.render(&mut self.render_context)?;
        Ok(&self.render_context)
    }

    pub fn config(&self) -> &QuakeMapConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn controls(&self) -> &ControlManager {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlManager {
        &mut self.controls
    }

    /// Controls and the map they read, borrowed together for drawing
    pub fn controls_and_map(&mut self) -> (&mut ControlManager, &Map) {
        (&mut self.controls, &self.map)
    }

    pub fn popups(&self) -> &PopupManager {
        &self.popups
    }

    pub fn popups_mut(&mut self) -> &mut PopupManager {
        &mut self.popups
    }

    pub fn status(&self, kind: FeedKind) -> &FeedStatus {
        match kind {
            FeedKind::Seismic => &self.seismic_status,
            FeedKind::Boundaries => &self.boundary_status,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.seismic_status.is_pending() || self.boundary_status.is_pending()
    }

    /// Failed feeds with their messages
    pub fn failures(&self) -> Vec<(FeedKind, &str)> {
        [FeedKind::Seismic, FeedKind::Boundaries]
            .into_iter()
            .filter_map(|kind| match self.status(kind) {
                FeedStatus::Failed(message) => Some((kind, message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> Option<&QuakeSummary> {
        self.summary.as_ref()
    }

    /// Earthquakes inside the visible bounds; `None` until the seismic feed
    /// has loaded or while its overlay is hidden
    pub fn markers_in_view(&self) -> Option<usize> {
        let layer = self.map.get_layer(EARTHQUAKES_OVERLAY_ID)?;
        if !layer.is_visible() {
            return None;
        }
        let group = layer.as_any().downcast_ref::<MarkerGroup>()?;
        Some(group.count_within(&self.map.viewport.bounds()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{constants::TECTONIC_PLATES_OVERLAY_ID, geo::LatLng},
        feeds::seismic::parse_seismic,
        MapError,
    };

    fn context() -> QuakeMapContext {
        QuakeMapContext::new(QuakeMapConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_with_satellite_and_nothing_else() {
        let ctx = context();
        assert_eq!(ctx.map().active_base_layer(), Some("satellite"));
        assert!(ctx.map().overlays().is_empty());
        assert!(ctx.controls().legend().is_none());
        assert!(ctx.is_loading());
        assert_eq!(ctx.map().viewport.zoom, 4.0);
    }

    #[test]
    fn test_seismic_failure_is_recorded_not_fatal() {
        let mut ctx = context();
        ctx.apply(FeedEvent::Seismic(Err(MapError::Http {
            url: "https://example.invalid/feed".to_string(),
            status: 500,
        })))
        .unwrap();

        assert!(ctx.status(FeedKind::Seismic).is_failed());
        assert!(ctx.controls().legend().is_none());
        let failures = ctx.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].1.contains("500"));
    }

    #[test]
    fn test_boundary_failure_still_attaches_layer_control() {
        let mut ctx = context();
        ctx.apply(FeedEvent::Boundaries(Err(MapError::ParseError("bad".to_string()))))
            .unwrap();
        assert!(ctx.controls().layer_control().is_some());
        assert!(ctx.map().get_layer(TECTONIC_PLATES_OVERLAY_ID).is_none());
    }

    #[test]
    fn test_click_opens_and_closes_popup() {
        let mut ctx = context();
        let feed = parse_seismic(
            br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"mag":5,"title":"M 5.0 - center"},
                 "geometry":{"type":"Point","coordinates":[-96,37.8,40]}}]}"#,
        )
        .unwrap();
        ctx.apply(FeedEvent::Seismic(Ok(feed))).unwrap();
        assert_eq!(ctx.summary().map(|s| s.count), Some(1));

        assert!(ctx.click_at(Point::new(400.0, 300.0)));
        let popup = ctx.popups().current().unwrap();
        assert_eq!(popup.title, "M 5.0 - center");
        assert_eq!(popup.lines, vec!["Magnitude: 5", "Depth: 40 km"]);

        assert!(!ctx.click_at(Point::new(10.0, 10.0)));
        assert!(!ctx.popups().is_open());
    }

    #[test]
    fn test_hiding_earthquakes_closes_popup() {
        let mut ctx = context();
        let feed = parse_seismic(
            br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"mag":3,"title":"x"},
                 "geometry":{"type":"Point","coordinates":[-96,37.8,5]}}]}"#,
        )
        .unwrap();
        ctx.apply_seismic(Ok(feed)).unwrap();
        ctx.click_at(Point::new(400.0, 300.0));
        assert!(ctx.popups().is_open());

        ctx.handle_toggle(LayerToggle::SetOverlay {
            id: EARTHQUAKES_OVERLAY_ID.to_string(),
            visible: false,
        })
        .unwrap();
        assert!(!ctx.popups().is_open());

        let commands = ctx.render().unwrap();
        assert_eq!(commands.circle_count(), 0);
    }

    #[test]
    fn test_markers_in_view_follows_the_viewport() {
        let mut ctx = context();
        assert_eq!(ctx.markers_in_view(), None);

        let feed = parse_seismic(
            br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"mag":4,"title":"near"},
                 "geometry":{"type":"Point","coordinates":[-96,37.8,10]}},
                {"type":"Feature","properties":{"mag":6,"title":"far"},
                 "geometry":{"type":"Point","coordinates":[140,36,30]}}]}"#,
        )
        .unwrap();
        ctx.apply_seismic(Ok(feed)).unwrap();
        assert_eq!(ctx.summary().map(|s| s.count), Some(2));
        assert_eq!(ctx.markers_in_view(), Some(1));

        ctx.map_mut().viewport.set_center(LatLng::new(36.0, 140.0));
        assert_eq!(ctx.markers_in_view(), Some(1));

        ctx.map_mut().viewport.set_zoom(1.0);
        ctx.map_mut().viewport.set_center(LatLng::new(20.0, 20.0));
        assert_eq!(ctx.markers_in_view(), Some(2));

        ctx.set_overlay_visible(EARTHQUAKES_OVERLAY_ID, false).unwrap();
        assert_eq!(ctx.markers_in_view(), None);
    }

    #[test]
    fn test_summary_text() {
        let summary = QuakeSummary {
            count: 12,
            rejected: 1,
            max_magnitude: Some(6.27),
        };
        assert_eq!(summary.to_string(), "12 earthquakes, largest M 6.3 (1 malformed skipped)");
        assert_eq!(
            FeedStatus::Loaded { items: 3, rejected: 0 }.to_string(),
            "3 loaded"
        );
    }
}
