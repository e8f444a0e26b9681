use crate::{
    core::{
        constants::DEFAULT_ZOOM_DELTA,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::{
        base::LayerTrait, group::MarkerGroup, manager::LayerManager, marker::CircleMarker,
        tile::TileLayer,
    },
    rendering::context::RenderContext,
    MapError, Result,
};

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub attribution_control: bool,
    pub zoom_control: bool,
    pub zoom_delta: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            min_zoom: 0.0,
            max_zoom: 19.0,
            attribution_control: true,
            zoom_control: true,
            zoom_delta: DEFAULT_ZOOM_DELTA,
        }
    }
}

/// The map surface: a viewport over a z-ordered layer stack.
///
/// Layers registered as base layers are mutually exclusive; exactly one of
/// them is visible once any exists. Overlays toggle independently.
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    options: MapOptions,
    base_layers: Vec<String>,
    overlays: Vec<String>,
    active_base_layer: Option<String>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let viewport = Viewport::new(center, zoom, size);
        Self::with_options(viewport, MapOptions::default())
    }

    pub fn with_options(viewport: Viewport, options: MapOptions) -> Self {
        let mut map = Self {
            viewport,
            layer_manager: LayerManager::new(),
            options,
            base_layers: Vec::new(),
            overlays: Vec::new(),
            active_base_layer: None,
        };
        map.viewport
            .set_zoom_limits(map.options.min_zoom, map.options.max_zoom);
        map
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() || !zoom.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot set view to ({}, {}) at zoom {}",
                center.lat, center.lng, zoom
            )));
        }
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
        Ok(())
    }

    /// Pans by a container-pixel offset; positive values move the view east/south
    pub fn pan(&mut self, delta: Point) {
        self.viewport.pan(delta);
    }

    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        self.viewport.zoom_to(zoom, focus_point);
    }

    pub fn zoom_in(&mut self, focus_point: Option<Point>) {
        self.zoom_to(self.viewport.zoom + self.options.zoom_delta, focus_point);
    }

    pub fn zoom_out(&mut self, focus_point: Option<Point>) {
        self.zoom_to(self.viewport.zoom - self.options.zoom_delta, focus_point);
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        log::debug!("Adding layer '{}' ({})", layer.id(), layer.layer_type());
        self.layer_manager.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layer_manager.remove_layer(layer_id).is_none() {
            return Err(MapError::Layer(format!("no layer '{}'", layer_id)));
        }
        self.overlays.retain(|id| id != layer_id);
        self.base_layers.retain(|id| id != layer_id);
        if self.active_base_layer.as_deref() == Some(layer_id) {
            self.active_base_layer = None;
            if let Some(next) = self.base_layers.first().cloned() {
                self.set_base_layer(&next)?;
            }
        }
        Ok(())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    /// Layer ids in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    /// Registers a base layer. The first one becomes active, later ones
    /// start hidden.
    pub fn add_base_layer(&mut self, mut layer: TileLayer) -> Result<()> {
        let id = layer.id().to_string();
        let first = self.base_layers.is_empty();
        layer.set_visible(first);
        self.add_layer(Box::new(layer))?;
        self.base_layers.push(id.clone());
        if first {
            self.set_base_layer(&id)?;
        }
        Ok(())
    }

    /// Makes `layer_id` the only visible base layer and clamps zoom to its
    /// maximum
    pub fn set_base_layer(&mut self, layer_id: &str) -> Result<()> {
        if !self.base_layers.iter().any(|id| id == layer_id) {
            return Err(MapError::Layer(format!("'{}' is not a base layer", layer_id)));
        }

        for id in &self.base_layers {
            let visible = id == layer_id;
            self.layer_manager
                .with_layer_mut(id, |layer| layer.set_visible(visible));
        }

        let layer_max = self
            .base_tile_layer(layer_id)
            .map(|l| l.max_zoom() as f64)
            .unwrap_or(self.options.max_zoom);
        self.viewport
            .set_zoom_limits(self.options.min_zoom, layer_max.min(self.options.max_zoom));

        if self.active_base_layer.as_deref() != Some(layer_id) {
            log::info!("Base layer switched to '{}'", layer_id);
        }
        self.active_base_layer = Some(layer_id.to_string());
        Ok(())
    }

    pub fn active_base_layer(&self) -> Option<&str> {
        self.active_base_layer.as_deref()
    }

    /// Base layer ids in registration order
    pub fn base_layers(&self) -> &[String] {
        &self.base_layers
    }

    /// Registers an additive overlay, keeping its current visibility
    pub fn add_overlay(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let id = layer.id().to_string();
        self.add_layer(layer)?;
        self.overlays.push(id);
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, layer_id: &str, visible: bool) -> Result<()> {
        if !self.overlays.iter().any(|id| id == layer_id) {
            return Err(MapError::Layer(format!("'{}' is not an overlay", layer_id)));
        }
        self.layer_manager
            .with_layer_mut(layer_id, |layer| layer.set_visible(visible));
        log::debug!("Overlay '{}' visible: {}", layer_id, visible);
        Ok(())
    }

    pub fn is_overlay_visible(&self, layer_id: &str) -> bool {
        self.overlays.iter().any(|id| id == layer_id)
            && self
                .get_layer(layer_id)
                .map(|layer| layer.is_visible())
                .unwrap_or(false)
    }

    /// Overlay ids in registration order
    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    /// Attribution of the active base layer
    pub fn attribution(&self) -> Option<&str> {
        self.base_tile_layer(self.active_base_layer.as_deref()?)?
            .attribution()
    }

    /// Tile layer currently shown as background
    pub fn active_tile_layer(&self) -> Option<&TileLayer> {
        self.base_tile_layer(self.active_base_layer.as_deref()?)
    }

    /// Topmost marker of any visible marker-group overlay under a
    /// container-space point
    pub fn marker_at(&self, point: &Point) -> Option<&CircleMarker> {
        self.overlays
            .iter()
            .rev()
            .filter_map(|id| self.get_layer(id))
            .filter(|layer| layer.is_visible())
            .filter_map(|layer| layer.as_any().downcast_ref::<MarkerGroup>())
            .find_map(|group| group.marker_at(&self.viewport, point))
    }

    /// Queues draw commands for every visible layer
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        self.layer_manager.render(context, &self.viewport)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    fn base_tile_layer(&self, layer_id: &str) -> Option<&TileLayer> {
        self.get_layer(layer_id)?.as_any().downcast_ref::<TileLayer>()
    }
}
