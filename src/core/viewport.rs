use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits and re-clamps the current zoom
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Width of the whole world in pixels at the given zoom level
    pub fn world_size(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857) at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * scale;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / scale);
        let lat = n.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// World pixel coordinate of the container's top-left corner
    pub fn pixel_origin(&self) -> Point {
        self.project(&self.center, None)
            .subtract(&self.size.multiply(0.5))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, None).subtract(&self.pixel_origin())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.unproject(&pixel.add(&self.pixel_origin()), None)
    }

    /// Pans the viewport by the given pixel offset.
    ///
    /// A positive delta moves the view east/south, i.e. the content moves
    /// the opposite way on screen. Longitude is left unwrapped so overlays
    /// near the antimeridian stay beside the center; tiles wrap on their own.
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center, None).add(&delta);
        let center = self.unproject(&center_px, None);
        self.set_center(center);
    }

    /// Zooms the viewport to a specific level, keeping `focus_point`
    /// (container pixels) stationary when given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus_screen) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus_screen);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&focus_lat_lng).subtract(&focus_screen);
                self.pan(drift);
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Whether a container-space circle overlaps the visible area
    pub fn contains_pixel_circle(&self, center: &Point, radius: f64) -> bool {
        center.x + radius >= 0.0
            && center.y + radius >= 0.0
            && center.x - radius <= self.size.x
            && center.y - radius <= self.size.y
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(LatLng::clamp_lat(center.lat), center.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(37.8, -96.0), 4.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_center_projects_to_container_center() {
        let vp = viewport();
        let center_px = vp.lat_lng_to_pixel(&vp.center);
        assert!((center_px.x - 400.0).abs() < 1e-6);
        assert!((center_px.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let vp = viewport();
        let original = LatLng::new(35.0, -100.0);
        let back = vp.pixel_to_lat_lng(&vp.lat_lng_to_pixel(&original));
        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn test_world_origin_projection() {
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 256.0));
        let p = vp.project(&LatLng::new(0.0, 0.0), None);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_center_east() {
        let mut vp = viewport();
        let before = vp.center;
        vp.pan(Point::new(100.0, 0.0));
        assert!(vp.center.lng > before.lng);
        assert!((vp.center.lat - before.lat).abs() < 1e-9);
    }

    #[test]
    fn test_pan_across_antimeridian_keeps_markers_near() {
        let mut vp = Viewport::new(LatLng::new(-18.0, 179.5), 4.0, Point::new(800.0, 600.0));
        let fiji = LatLng::new(-18.0, 178.0);
        let before = vp.lat_lng_to_pixel(&fiji);

        vp.pan(Point::new(20.0, 0.0));

        assert!(vp.center.lng > 180.0);
        let after = vp.lat_lng_to_pixel(&fiji);
        assert!((after.x - (before.x - 20.0)).abs() < 1e-6);
        assert!((after.y - before.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamped_to_limits() {
        let mut vp = viewport();
        vp.set_zoom_limits(1.0, 6.0);
        vp.zoom_to(12.0, None);
        assert_eq!(vp.zoom, 6.0);
        vp.zoom_to(-3.0, None);
        assert_eq!(vp.zoom, 1.0);
    }

    #[test]
    fn test_zoom_keeps_focus_point_stationary() {
        let mut vp = viewport();
        let focus = Point::new(200.0, 150.0);
        let focus_lat_lng = vp.pixel_to_lat_lng(&focus);

        vp.zoom_to(6.0, Some(focus));

        let after = vp.lat_lng_to_pixel(&focus_lat_lng);
        assert!((after.x - focus.x).abs() < 1e-6);
        assert!((after.y - focus.y).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = viewport();
        assert!(vp.bounds().contains(&vp.center));
    }
}
