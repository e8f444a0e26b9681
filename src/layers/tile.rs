//! Raster tile base layer

use crate::{
    core::{
        config::BaseLayerConfig,
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{DrawCommand, RenderContext},
    tiles::source::{TileSource, UrlTemplate},
    Result,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub attribution: Option<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: crate::core::constants::TILE_SIZE,
            min_zoom: 0,
            max_zoom: 18,
            attribution: None,
        }
    }
}

/// Background imagery fetched from a slippy-map tile server
pub struct TileLayer {
    properties: LayerProperties,
    source: UrlTemplate,
    options: TileLayerOptions,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: UrlTemplate, options: TileLayerOptions) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Tile)
            .with_z_index(crate::core::constants::BASE_LAYER_Z_INDEX);
        Self {
            properties,
            source,
            options,
        }
    }

    pub fn from_config(config: &BaseLayerConfig) -> Self {
        Self::new(
            config.id.clone(),
            config.name.clone(),
            UrlTemplate::new(config.url_template.clone(), config.subdomains.clone()),
            TileLayerOptions {
                max_zoom: config.max_zoom,
                attribution: Some(config.attribution.clone()).filter(|a| !a.is_empty()),
                ..TileLayerOptions::default()
            },
        )
    }

    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }

    pub fn attribution(&self) -> Option<&str> {
        self.options.attribution.as_deref()
    }

    /// URL of a single tile
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }

    /// Integer tile zoom used for the viewport's fractional zoom
    pub fn tile_zoom(&self, zoom: f64) -> u8 {
        (zoom.round().max(0.0) as u8).clamp(self.options.min_zoom, self.options.max_zoom)
    }

    /// Tiles covering the viewport with their container-space rectangles.
    ///
    /// Columns wrap around the antimeridian; rows outside the world are
    /// skipped.
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<(TileCoord, (Point, Point))> {
        let tile_zoom = self.tile_zoom(viewport.zoom);
        let tiles_per_axis = 2_i64.pow(tile_zoom as u32);
        // On-screen size of one tile when the viewport zoom is fractional
        let tile_px = self.options.tile_size as f64 * 2_f64.powf(viewport.zoom - tile_zoom as f64);
        if !tile_px.is_finite() || tile_px <= 0.0 {
            return Vec::new();
        }

        let origin = viewport.pixel_origin();
        let min_x = (origin.x / tile_px).floor() as i64;
        let min_y = (origin.y / tile_px).floor() as i64;
        let max_x = ((origin.x + viewport.size.x) / tile_px).ceil() as i64 - 1;
        let max_y = ((origin.y + viewport.size.y) / tile_px).ceil() as i64 - 1;

        let mut tiles = Vec::new();
        for y in min_y.max(0)..=max_y.min(tiles_per_axis - 1) {
            for x in min_x..=max_x {
                let wrapped_x = x.rem_euclid(tiles_per_axis) as u32;
                let min = Point::new(x as f64 * tile_px - origin.x, y as f64 * tile_px - origin.y);
                let max = Point::new(min.x + tile_px, min.y + tile_px);
                tiles.push((TileCoord::new(wrapped_x, y as u32, tile_zoom), (min, max)));
            }
        }
        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for (coord, bounds) in self.visible_tiles(viewport) {
            context.push(DrawCommand::Tile {
                coord,
                url: self.source.url(coord),
                bounds,
                opacity: self.properties.opacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn osm() -> TileLayer {
        TileLayer::new(
            "outdoors".to_string(),
            "Outdoors".to_string(),
            UrlTemplate::new(
                "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                vec!["a".into(), "b".into(), "c".into()],
            ),
            TileLayerOptions {
                max_zoom: 19,
                ..TileLayerOptions::default()
            },
        )
    }

    #[test]
    fn test_world_at_zoom_zero_is_one_tile() {
        let layer = osm();
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 256.0));
        let tiles = layer.visible_tiles(&viewport);

        assert_eq!(tiles.len(), 1);
        let (coord, (min, max)) = tiles[0];
        assert_eq!(coord, TileCoord::new(0, 0, 0));
        assert!((min.x).abs() < 1e-9 && (min.y).abs() < 1e-9);
        assert!((max.x - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let layer = osm();
        let viewport = Viewport::new(LatLng::new(37.8, -96.0), 4.0, Point::new(800.0, 600.0));
        let tiles = layer.visible_tiles(&viewport);

        assert!(tiles.iter().all(|(c, _)| c.z == 4 && c.is_valid()));
        let covers_corner = |px: f64, py: f64| {
            tiles
                .iter()
                .any(|(_, (min, max))| min.x <= px && px <= max.x && min.y <= py && py <= max.y)
        };
        assert!(covers_corner(0.0, 0.0));
        assert!(covers_corner(800.0, 600.0));
    }

    #[test]
    fn test_tile_zoom_clamped_to_max_zoom() {
        let mut layer = osm();
        layer.options.max_zoom = 3;
        assert_eq!(layer.tile_zoom(7.6), 3);
        assert_eq!(layer.tile_zoom(2.4), 2);
    }

    #[test]
    fn test_render_emits_tile_commands() {
        let mut layer = osm();
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let mut ctx = RenderContext::new(512, 512);
        layer.render(&mut ctx, &viewport).unwrap();

        assert_eq!(ctx.tile_count(), 4);
        assert!(ctx.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Tile { url, .. } if url == "https://a.tile.openstreetmap.org/1/0/0.png"
        )));
    }
}
