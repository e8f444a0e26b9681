use async_trait::async_trait;
use quakemap::{
    background::load_all,
    constants::{EARTHQUAKES_OVERLAY_ID, TECTONIC_PLATES_OVERLAY_ID},
    feeds::FeedKind,
    layers::style::Color,
    ui::{LayerControl, LayerToggle},
    FeedEvent, FeedFetcher, FeedStatus, MapError, MarkerGroup, QuakeMapConfig, QuakeMapContext,
    Result,
};
use std::collections::HashMap;

const ONE_QUAKE: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","id":"us1","properties":{"mag":4,"title":"M 4.0 - Oklahoma"},
     "geometry":{"type":"Point","coordinates":[-100,35,12]}}]}"#;

const NO_QUAKES: &str = r#"{"type":"FeatureCollection","features":[]}"#;

const PLATES: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","properties":{"Name":"PA-NA"},
     "geometry":{"type":"LineString","coordinates":[[-125,40],[-120,35],[-115,32]]}}]}"#;

/// Serves canned bodies keyed by URL; anything else is a 404
struct InMemoryFetcher {
    bodies: HashMap<String, String>,
}

impl InMemoryFetcher {
    fn new(config: &QuakeMapConfig, seismic: &str, boundaries: Option<&str>) -> Self {
        let mut bodies = HashMap::new();
        bodies.insert(config.feeds.seismic_url.clone(), seismic.to_string());
        if let Some(body) = boundaries {
            bodies.insert(config.feeds.boundary_url.clone(), body.to_string());
        }
        Self { bodies }
    }
}

#[async_trait]
impl FeedFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .map(|body| body.clone().into_bytes())
            .ok_or_else(|| MapError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

async fn loaded_context(seismic: &str, boundaries: Option<&str>) -> QuakeMapContext {
    let config = QuakeMapConfig::default();
    let fetcher = InMemoryFetcher::new(&config, seismic, boundaries);
    let (quakes, plates) = load_all(&fetcher, &config.feeds).await;

    let mut context = QuakeMapContext::new(config).unwrap();
    context.apply(quakes).unwrap();
    context.apply(plates).unwrap();
    context
}

fn earthquakes(context: &QuakeMapContext) -> &MarkerGroup {
    context
        .map()
        .get_layer(EARTHQUAKES_OVERLAY_ID)
        .and_then(|layer| layer.as_any().downcast_ref::<MarkerGroup>())
        .expect("earthquakes overlay")
}

#[tokio::test]
async fn test_single_quake_becomes_depth_colored_marker() {
    let context = loaded_context(ONE_QUAKE, Some(PLATES)).await;

    let group = earthquakes(&context);
    assert_eq!(group.len(), 1);
    let marker = &group.markers()[0];
    assert_eq!(marker.position().lat, 35.0);
    assert_eq!(marker.position().lng, -100.0);
    assert_eq!(marker.radius(), 20.0);
    assert_eq!(marker.style().fill_color, Color::rgb(0x00, 0xFF, 0x00));
    assert_eq!(
        marker.popup_text(),
        Some("M 4.0 - Oklahoma\nMagnitude: 4\nDepth: 12 km")
    );

    assert!(context.controls().legend().is_some());
    assert!(context.controls().layer_control().is_some());
    assert!(!context.is_loading());
    assert!(context.failures().is_empty());
}

#[tokio::test]
async fn test_empty_feed_adds_empty_overlay() {
    let context = loaded_context(NO_QUAKES, Some(PLATES)).await;

    assert!(earthquakes(&context).is_empty());
    assert_eq!(
        context.status(FeedKind::Seismic),
        &FeedStatus::Loaded {
            items: 0,
            rejected: 0
        }
    );
    assert_eq!(context.summary().map(|s| s.count), Some(0));
}

#[tokio::test]
async fn test_empty_boundaries_still_listed_as_overlay() {
    let context = loaded_context(
        ONE_QUAKE,
        Some(r#"{"type":"GeometryCollection","geometries":[]}"#),
    )
    .await;

    let overlays = LayerControl::overlay_entries(context.map());
    let plates = overlays
        .iter()
        .find(|entry| entry.id == TECTONIC_PLATES_OVERLAY_ID)
        .expect("tectonic plates entry");
    assert_eq!(plates.name, "Tectonic Plates");
    assert!(plates.checked);
}

#[tokio::test]
async fn test_failed_boundary_feed_keeps_base_layers_switchable() {
    let mut context = loaded_context(ONE_QUAKE, None).await;

    assert!(context.status(FeedKind::Boundaries).is_failed());
    assert_eq!(context.failures().len(), 1);
    assert!(context.controls().layer_control().is_some());
    assert!(context.map().get_layer(TECTONIC_PLATES_OVERLAY_ID).is_none());

    context.select_base_layer("grayscale").unwrap();
    assert_eq!(context.map().active_base_layer(), Some("grayscale"));
}

#[tokio::test]
async fn test_base_layers_are_exclusive() {
    let mut context = loaded_context(ONE_QUAKE, Some(PLATES)).await;

    for id in ["outdoors", "grayscale", "satellite"] {
        context
            .handle_toggle(LayerToggle::SelectBase(id.to_string()))
            .unwrap();
        let checked: Vec<_> = LayerControl::base_entries(context.map())
            .into_iter()
            .filter(|entry| entry.checked)
            .map(|entry| entry.id)
            .collect();
        assert_eq!(checked, vec![id.to_string()]);
    }

    assert!(matches!(
        context.select_base_layer("terrain"),
        Err(MapError::Layer(_))
    ));
    assert_eq!(context.map().active_base_layer(), Some("satellite"));
}

#[tokio::test]
async fn test_overlays_toggle_independently() {
    let mut context = loaded_context(ONE_QUAKE, Some(PLATES)).await;

    context
        .set_overlay_visible(TECTONIC_PLATES_OVERLAY_ID, false)
        .unwrap();
    assert!(!context.map().is_overlay_visible(TECTONIC_PLATES_OVERLAY_ID));
    assert!(context.map().is_overlay_visible(EARTHQUAKES_OVERLAY_ID));

    context
        .set_overlay_visible(TECTONIC_PLATES_OVERLAY_ID, true)
        .unwrap();
    assert!(context.map().is_overlay_visible(TECTONIC_PLATES_OVERLAY_ID));
}

#[tokio::test]
async fn test_click_opens_and_hiding_closes_popup() {
    let mut context = loaded_context(ONE_QUAKE, Some(PLATES)).await;

    let marker = earthquakes(&context).markers()[0].position();
    let pixel = context.map().viewport.lat_lng_to_pixel(&marker);
    assert!(context.click_at(pixel));
    let popup = context.popups().current().expect("popup open");
    assert_eq!(popup.title, "M 4.0 - Oklahoma");
    assert_eq!(popup.lines, vec!["Magnitude: 4", "Depth: 12 km"]);

    context
        .set_overlay_visible(EARTHQUAKES_OVERLAY_ID, false)
        .unwrap();
    assert!(!context.popups().is_open());
    assert!(!context.click_at(pixel));
}

#[tokio::test]
async fn test_load_all_reports_each_feed_once() {
    let config = QuakeMapConfig::default();
    let fetcher = InMemoryFetcher::new(&config, "not json", Some(PLATES));

    let (quakes, plates) = load_all(&fetcher, &config.feeds).await;
    assert_eq!(quakes.kind(), FeedKind::Seismic);
    assert!(matches!(quakes, FeedEvent::Seismic(Err(MapError::ParseError(_)))));
    assert_eq!(plates.kind(), FeedKind::Boundaries);
    assert!(plates.is_ok());
}
