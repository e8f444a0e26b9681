use crate::{
    core::constants::{EARTHQUAKES_OVERLAY_ID, EARTHQUAKES_OVERLAY_NAME, MARKER_Z_INDEX},
    data::{
        geojson::GeoJson,
        seismic::{SeismicFeature, SeismicFeed},
    },
    feeds::fetch::FeedFetcher,
    layers::{group::MarkerGroup, marker::CircleMarker, style::MarkerStyle},
    symbology::magnitude_radius,
    MapError, Result,
};

/// Parses a seismic feed body. The document must be a feature collection
/// (or a single feature); individual bad features are rejected, not fatal.
pub fn parse_seismic(body: &[u8]) -> Result<SeismicFeed> {
    let document = GeoJson::from_slice(body)?;
    if let GeoJson::Geometry(_) = document {
        return Err(MapError::ParseError(
            "earthquake feed is a bare geometry, expected a FeatureCollection".to_string(),
        ));
    }
    Ok(SeismicFeed::from_geojson(&document))
}

pub async fn load_seismic(fetcher: &dyn FeedFetcher, url: &str) -> Result<SeismicFeed> {
    let body = fetcher.fetch(url).await?;
    let feed = parse_seismic(&body)?;
    log::info!(
        "Loaded {} earthquakes ({} rejected) from {}",
        feed.len(),
        feed.rejected.len(),
        url
    );
    Ok(feed)
}

/// Circle marker for one earthquake: radius from magnitude, fill from depth
pub fn marker_for(index: usize, feature: &SeismicFeature, style: &MarkerStyle) -> CircleMarker {
    CircleMarker::new(
        format!("quake-{}", index),
        feature.position(),
        magnitude_radius(feature.magnitude),
        style.circle(feature.depth_class().color()),
    )
    .with_popup(feature.popup_text())
}

/// The "Earthquakes" overlay holding one marker per valid feature, in feed
/// order
pub fn build_marker_group(feed: &SeismicFeed, style: &MarkerStyle) -> MarkerGroup {
    let mut group = MarkerGroup::new(
        EARTHQUAKES_OVERLAY_ID.to_string(),
        EARTHQUAKES_OVERLAY_NAME.to_string(),
    )
    .with_z_index(MARKER_Z_INDEX);
    for (index, feature) in feed.features.iter().enumerate() {
        group.add_marker(marker_for(index, feature, style));
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, layers::base::LayerTrait, layers::style::Color};

    const ONE_QUAKE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"mag":4,"title":"M 4.0 - test"},
         "geometry":{"type":"Point","coordinates":[-100,35,12]}}]}"#;

    #[test]
    fn test_one_feature_makes_one_marker() {
        let feed = parse_seismic(ONE_QUAKE.as_bytes()).unwrap();
        let group = build_marker_group(&feed, &MarkerStyle::default());

        assert_eq!(group.id(), EARTHQUAKES_OVERLAY_ID);
        assert_eq!(group.len(), 1);
        let marker = &group.markers()[0];
        assert_eq!(marker.position(), LatLng::new(35.0, -100.0));
        assert_eq!(marker.radius(), 20.0);
        assert_eq!(marker.style().fill_color, Color::rgb(0x00, 0xFF, 0x00));
        assert_eq!(marker.style().color, Color::BLACK);
        assert_eq!(marker.style().fill_opacity, 0.8);
    }

    #[test]
    fn test_bare_geometry_is_not_a_seismic_feed() {
        let result = parse_seismic(br#"{"type":"Point","coordinates":[1,2,3]}"#);
        assert!(matches!(result, Err(MapError::ParseError(_))));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse_seismic(b"<html>rate limited</html>").is_err());
    }
}
