use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        style::CircleStyle,
    },
    rendering::context::{DrawCommand, RenderContext},
    Result,
};

/// Circle with a fixed on-screen radius, anchored at a geographic position
#[derive(Debug, Clone)]
pub struct CircleMarker {
    properties: LayerProperties,
    position: LatLng,
    /// Radius in pixels, independent of zoom
    radius: f64,
    style: CircleStyle,
    popup_text: Option<String>,
}

impl CircleMarker {
    pub fn new(id: String, position: LatLng, radius: f64, style: CircleStyle) -> Self {
        let properties = LayerProperties::new(id, "Circle marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            radius: radius.max(0.0),
            style,
            popup_text: None,
        }
    }

    pub fn with_popup(mut self, text: String) -> Self {
        self.popup_text = Some(text);
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn style(&self) -> &CircleStyle {
        &self.style
    }

    pub fn popup_text(&self) -> Option<&str> {
        self.popup_text.as_deref()
    }

    /// Whether a container-space point falls on the circle, stroke included
    pub fn hit_test(&self, viewport: &Viewport, point: &Point) -> bool {
        let center = viewport.lat_lng_to_pixel(&self.position);
        center.distance_to(point) <= self.radius + self.style.weight as f64 / 2.0
    }

    /// Queue this marker at the given layer opacity, skipping it when off-screen
    pub(crate) fn draw(&self, context: &mut RenderContext, viewport: &Viewport, opacity: f32) {
        let center = viewport.lat_lng_to_pixel(&self.position);
        let extent = self.radius + self.style.weight as f64;
        if !viewport.contains_pixel_circle(&center, extent) {
            return;
        }
        context.push(DrawCommand::circle(
            center,
            self.radius as f32,
            &self.style,
            opacity,
        ));
    }
}

impl LayerTrait for CircleMarker {
    crate::impl_layer_trait!(CircleMarker, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        self.draw(context, viewport, self.properties.opacity);
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }

    // Radius is in pixels, so geographic bounds alone under-report the extent.
    fn intersects_bounds(&self, _bounds: &LatLngBounds) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(35.0, -100.0), 4.0, Point::new(400.0, 400.0))
    }

    #[test]
    fn test_hit_test_uses_pixel_radius() {
        let marker = CircleMarker::new(
            "m".to_string(),
            LatLng::new(35.0, -100.0),
            20.0,
            CircleStyle::default(),
        );
        let vp = viewport();

        assert!(marker.hit_test(&vp, &Point::new(200.0, 200.0)));
        assert!(marker.hit_test(&vp, &Point::new(215.0, 200.0)));
        assert!(!marker.hit_test(&vp, &Point::new(230.0, 200.0)));
    }

    #[test]
    fn test_negative_radius_clamped() {
        let marker = CircleMarker::new(
            "m".to_string(),
            LatLng::new(0.0, 0.0),
            -4.0,
            CircleStyle::default(),
        );
        assert_eq!(marker.radius(), 0.0);
    }

    #[test]
    fn test_offscreen_marker_not_drawn() {
        let mut marker = CircleMarker::new(
            "m".to_string(),
            LatLng::new(-60.0, 120.0),
            5.0,
            CircleStyle::default(),
        );
        let mut ctx = RenderContext::new(400, 400);
        marker.render(&mut ctx, &viewport()).unwrap();
        assert_eq!(ctx.circle_count(), 0);
    }
}
