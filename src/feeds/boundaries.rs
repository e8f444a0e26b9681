use crate::{
    core::constants::{TECTONIC_PLATES_OVERLAY_ID, TECTONIC_PLATES_OVERLAY_NAME},
    data::geojson::{GeoJson, GeoJsonLayer},
    feeds::fetch::FeedFetcher,
    layers::style::PathStyle,
    Result,
};

/// Any GeoJSON document is accepted as a boundary set
pub fn parse_boundaries(body: &[u8]) -> Result<GeoJson> {
    GeoJson::from_slice(body)
}

pub async fn load_boundaries(fetcher: &dyn FeedFetcher, url: &str) -> Result<GeoJson> {
    let body = fetcher.fetch(url).await?;
    let document = parse_boundaries(&body)?;
    log::info!(
        "Loaded {} plate boundary items from {}",
        document.item_count(),
        url
    );
    Ok(document)
}

/// The "Tectonic Plates" overlay
pub fn build_boundary_layer(document: GeoJson, style: &PathStyle) -> GeoJsonLayer {
    GeoJsonLayer::new(
        TECTONIC_PLATES_OVERLAY_ID.to_string(),
        TECTONIC_PLATES_OVERLAY_NAME.to_string(),
        document,
        style.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::{LayerTrait, LayerType};

    #[test]
    fn test_boundary_layer_identity_and_style() {
        let document = parse_boundaries(
            br#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"PlateName":"Pacific"},
                "geometry":{"type":"LineString","coordinates":[[-180,0],[-170,10]]}}]}"#,
        )
        .unwrap();
        let layer = build_boundary_layer(document, &PathStyle::plate_boundaries());

        assert_eq!(layer.id(), TECTONIC_PLATES_OVERLAY_ID);
        assert_eq!(layer.name(), "Tectonic Plates");
        assert_eq!(layer.layer_type(), LayerType::Vector);
        assert_eq!(layer.style().color.to_hex(), "#FF7800");
        assert_eq!(layer.shape_count(), 1);
    }
}
