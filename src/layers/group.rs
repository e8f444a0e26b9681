//! Group of circle markers toggled as one overlay

use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        marker::CircleMarker,
    },
    rendering::context::RenderContext,
    spatial::index::MarkerIndex,
    Result,
};

pub struct MarkerGroup {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
    index: MarkerIndex,
    /// Largest radius plus half stroke, bounds the hit-test search box
    max_extent: f64,
}

impl MarkerGroup {
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Group),
            markers: Vec::new(),
            index: MarkerIndex::new(),
            max_extent: 0.0,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.properties.z_index = z_index;
        self
    }

    pub fn add_marker(&mut self, marker: CircleMarker) {
        let extent = marker.radius() + marker.style().weight as f64 / 2.0;
        self.max_extent = self.max_extent.max(extent);
        self.index.insert(self.markers.len(), marker.position());
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Topmost marker under a container-space point.
    ///
    /// Later markers are drawn over earlier ones, so the highest index wins.
    pub fn marker_at(&self, viewport: &Viewport, point: &Point) -> Option<&CircleMarker> {
        if self.markers.is_empty() {
            return None;
        }
        let reach = self.max_extent;
        let nw = viewport.pixel_to_lat_lng(&Point::new(point.x - reach, point.y - reach));
        let se = viewport.pixel_to_lat_lng(&Point::new(point.x + reach, point.y + reach));
        let search = LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng));

        self.index
            .query(&search)
            .into_iter()
            .rev()
            .map(|i| &self.markers[i])
            .find(|marker| marker.hit_test(viewport, point))
    }

    /// Number of markers whose position lies inside `bounds`
    pub fn count_within(&self, bounds: &LatLngBounds) -> usize {
        self.index.query(bounds).len()
    }
}

impl LayerTrait for MarkerGroup {
    crate::impl_layer_trait!(MarkerGroup, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for marker in &self.markers {
            if marker.is_visible() {
                marker.draw(context, viewport, self.properties.opacity * marker.opacity());
            }
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.markers.iter().map(|m| m.position()))
    }

    // Markers near the view edge reach into it with their pixel radius.
    fn intersects_bounds(&self, _bounds: &LatLngBounds) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::style::CircleStyle;

    fn marker(id: &str, lat: f64, lng: f64, radius: f64) -> CircleMarker {
        CircleMarker::new(id.to_string(), LatLng::new(lat, lng), radius, CircleStyle::default())
            .with_popup(id.to_string())
    }

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(35.0, -100.0), 4.0, Point::new(400.0, 400.0))
    }

    #[test]
    fn test_topmost_marker_wins() {
        let mut group = MarkerGroup::new("g".to_string(), "Group".to_string());
        group.add_marker(marker("under", 35.0, -100.0, 20.0));
        group.add_marker(marker("over", 35.0, -100.0, 10.0));

        let hit = group.marker_at(&viewport(), &Point::new(200.0, 200.0)).unwrap();
        assert_eq!(hit.popup_text(), Some("over"));

        // Outside the small marker but inside the large one
        let hit = group.marker_at(&viewport(), &Point::new(215.0, 200.0)).unwrap();
        assert_eq!(hit.popup_text(), Some("under"));
    }

    #[test]
    fn test_miss_returns_none() {
        let mut group = MarkerGroup::new("g".to_string(), "Group".to_string());
        group.add_marker(marker("only", 35.0, -100.0, 5.0));
        assert!(group.marker_at(&viewport(), &Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_render_culls_offscreen_members() {
        let mut group = MarkerGroup::new("g".to_string(), "Group".to_string());
        group.add_marker(marker("a", 35.0, -100.0, 5.0));
        group.add_marker(marker("b", 35.5, -100.5, 5.0));
        group.add_marker(marker("far", -60.0, 120.0, 5.0));

        let mut ctx = RenderContext::new(400, 400);
        group.render(&mut ctx, &viewport()).unwrap();
        assert_eq!(ctx.circle_count(), 2);
        assert_eq!(group.count_within(&viewport().bounds()), 2);
    }

    #[test]
    fn test_markers_survive_pan_across_antimeridian() {
        let mut group = MarkerGroup::new("g".to_string(), "Group".to_string());
        group.add_marker(marker("fiji", -18.0, 178.0, 10.0));
        let mut vp = Viewport::new(LatLng::new(-18.0, 179.5), 4.0, Point::new(800.0, 600.0));

        vp.pan(Point::new(20.0, 0.0));

        let mut ctx = RenderContext::new(800, 600);
        group.render(&mut ctx, &vp).unwrap();
        assert_eq!(ctx.circle_count(), 1);

        let pixel = vp.lat_lng_to_pixel(&LatLng::new(-18.0, 178.0));
        assert!(pixel.x > 0.0 && pixel.x < 800.0);
        let hit = group.marker_at(&vp, &pixel).unwrap();
        assert_eq!(hit.popup_text(), Some("fiji"));
    }
}
