use crate::{
    core::{
        constants::BOUNDARY_Z_INDEX,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        style::PathStyle,
    },
    rendering::context::{DrawCommand, PathRenderStyle, RenderContext},
    MapError, Result,
};
use geo::{Coord, LineString, TriangulateEarcut};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// `[longitude, latitude, (altitude or depth)...]`
pub type Position = Vec<f64>;

/// Screen radius of point geometries in a vector layer
const POINT_RADIUS: f32 = 4.0;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        #[serde(default)]
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, Value>>,
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
    Geometry(GeoJsonGeometry),
}

#[derive(Deserialize)]
struct FeatureCollectionBody {
    #[serde(default)]
    features: Vec<GeoJsonFeature>,
}

impl GeoJson {
    pub fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Dispatches on the `type` member; anything that is not a feature or a
    /// feature collection must be a geometry.
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MapError::ParseError("GeoJSON object has no \"type\" member".into()))?
            .to_string();

        let parsed = match kind.as_str() {
            "FeatureCollection" => serde_json::from_value::<FeatureCollectionBody>(value)
                .map(|body| GeoJson::FeatureCollection {
                    features: body.features,
                }),
            "Feature" => serde_json::from_value(value).map(GeoJson::Feature),
            _ => serde_json::from_value(value).map(GeoJson::Geometry),
        };

        parsed.map_err(|e| MapError::ParseError(format!("Invalid GeoJSON {}: {}", kind, e)))
    }

    /// Features of the document; a bare geometry yields none
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
            GeoJson::Geometry(_) => &[],
        }
    }

    /// Every geometry in the document, feature-less ones included
    pub fn geometries(&self) -> Vec<&GeoJsonGeometry> {
        match self {
            GeoJson::Geometry(geometry) => vec![geometry],
            _ => self
                .features()
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .collect(),
        }
    }

    /// Number of top-level items: features, or the members of a bare
    /// geometry collection
    pub fn item_count(&self) -> usize {
        match self {
            GeoJson::Geometry(GeoJsonGeometry::GeometryCollection { geometries }) => {
                geometries.len()
            }
            GeoJson::Geometry(_) => 1,
            _ => self.features().len(),
        }
    }
}

fn to_lat_lng(position: &[f64]) -> Option<LatLng> {
    match position {
        [lng, lat, ..] => Some(LatLng::new(*lat, *lng)),
        _ => None,
    }
}

fn ring(positions: &[Position]) -> Vec<LatLng> {
    positions.iter().filter_map(|p| to_lat_lng(p)).collect()
}

/// Geometry flattened to drawable parts, each with its bounds
#[derive(Debug, Clone)]
enum Shape {
    Point(LatLng),
    Line(Vec<LatLng>),
    Polygon {
        rings: Vec<Vec<LatLng>>,
        /// Fill triangles indexing the rings in order, exterior first
        triangles: Vec<[usize; 3]>,
    },
}

impl Shape {
    fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            Shape::Point(p) => Some(LatLngBounds::new(*p, *p)),
            Shape::Line(points) => LatLngBounds::from_points(points.iter().copied()),
            Shape::Polygon { rings, .. } => {
                LatLngBounds::from_points(rings.first()?.iter().copied())
            }
        }
    }
}

/// Closes a ring; rings with fewer than three vertices are dropped
fn closed_ring(mut ring: Vec<LatLng>) -> Option<Vec<LatLng>> {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    (ring.len() >= 4).then_some(ring)
}

/// Triangulated in zoom-0 world pixels, which differ from container pixels
/// at any zoom only by scale and offset
fn polygon(rings: Vec<Vec<LatLng>>) -> Option<Shape> {
    let mut rings = rings.into_iter();
    let exterior = closed_ring(rings.next()?)?;
    let holes: Vec<Vec<LatLng>> = rings.filter_map(closed_ring).collect();

    let world = Viewport::new(LatLng::default(), 0.0, Point::default());
    let line_string = |ring: &[LatLng]| -> LineString<f64> {
        ring.iter()
            .map(|p| {
                let px = world.project(p, Some(0.0));
                Coord { x: px.x, y: px.y }
            })
            .collect()
    };
    let triangles = geo::Polygon::new(
        line_string(&exterior),
        holes.iter().map(|hole| line_string(hole)).collect(),
    )
    .earcut_triangles_raw()
    .triangle_indices
    .chunks_exact(3)
    .map(|t| [t[0], t[1], t[2]])
    .collect();

    Some(Shape::Polygon {
        rings: std::iter::once(exterior).chain(holes).collect(),
        triangles,
    })
}

fn flatten(geometry: &GeoJsonGeometry, shapes: &mut Vec<Shape>) {
    match geometry {
        GeoJsonGeometry::Point { coordinates } => {
            shapes.extend(to_lat_lng(coordinates).map(Shape::Point));
        }
        GeoJsonGeometry::MultiPoint { coordinates } => {
            shapes.extend(coordinates.iter().filter_map(|c| to_lat_lng(c)).map(Shape::Point));
        }
        GeoJsonGeometry::LineString { coordinates } => {
            shapes.push(Shape::Line(ring(coordinates)));
        }
        GeoJsonGeometry::MultiLineString { coordinates } => {
            shapes.extend(coordinates.iter().map(|line| Shape::Line(ring(line))));
        }
        GeoJsonGeometry::Polygon { coordinates } => {
            shapes.extend(polygon(coordinates.iter().map(|r| ring(r)).collect()));
        }
        GeoJsonGeometry::MultiPolygon { coordinates } => {
            shapes.extend(
                coordinates
                    .iter()
                    .filter_map(|rings| polygon(rings.iter().map(|r| ring(r)).collect())),
            );
        }
        GeoJsonGeometry::GeometryCollection { geometries } => {
            for geometry in geometries {
                flatten(geometry, shapes);
            }
        }
    }
}

/// Vector overlay drawing every geometry of a GeoJSON document with one
/// path style
pub struct GeoJsonLayer {
    properties: LayerProperties,
    data: GeoJson,
    style: PathStyle,
    shapes: Vec<(Shape, Option<LatLngBounds>)>,
}

impl GeoJsonLayer {
    pub fn new(id: String, name: String, data: GeoJson, style: PathStyle) -> Self {
        let mut flat = Vec::new();
        for geometry in data.geometries() {
            flatten(geometry, &mut flat);
        }
        let shapes = flat
            .into_iter()
            .map(|shape| {
                let bounds = shape.bounds();
                (shape, bounds)
            })
            .collect();

        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector)
                .with_z_index(BOUNDARY_Z_INDEX),
            data,
            style,
            shapes,
        }
    }

    pub fn data(&self) -> &GeoJson {
        &self.data
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Number of drawable parts after flattening multi-geometries
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn render_style(&self, closed: bool) -> PathRenderStyle {
        let opacity = self.properties.opacity;
        PathRenderStyle {
            stroke_color: self.style.color.with_opacity(self.style.opacity * opacity),
            stroke_width: self.style.weight,
            fill_color: (closed && self.style.fill).then(|| {
                self.style
                    .effective_fill_color()
                    .with_opacity(self.style.fill_opacity * opacity)
            }),
        }
    }

    fn project(viewport: &Viewport, points: &[LatLng]) -> Vec<Point> {
        points.iter().map(|p| viewport.lat_lng_to_pixel(p)).collect()
    }
}

impl LayerTrait for GeoJsonLayer {
    crate::impl_layer_trait!(GeoJsonLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let view = viewport.bounds();

        for (shape, bounds) in &self.shapes {
            match bounds {
                Some(b) if b.intersects(&view) => {}
                _ => continue,
            }

            match shape {
                Shape::Point(p) => {
                    let style = self.render_style(false);
                    context.push(DrawCommand::Circle {
                        center: viewport.lat_lng_to_pixel(p),
                        radius: POINT_RADIUS,
                        fill_color: self.style.effective_fill_color(),
                        stroke_color: style.stroke_color,
                        stroke_width: style.stroke_width,
                    });
                }
                Shape::Line(points) if points.len() >= 2 => {
                    context.push(DrawCommand::Line {
                        points: Self::project(viewport, points),
                        style: self.render_style(false),
                    });
                }
                Shape::Polygon { rings, triangles } => {
                    let Some((exterior, holes)) = rings.split_first() else {
                        continue;
                    };
                    if exterior.len() < 3 {
                        continue;
                    }
                    let style = self.render_style(true);
                    let triangles = if style.fill_color.is_some() {
                        triangles.clone()
                    } else {
                        Vec::new()
                    };
                    context.push(DrawCommand::Polygon {
                        exterior: Self::project(viewport, exterior),
                        holes: holes.iter().map(|h| Self::project(viewport, h)).collect(),
                        triangles,
                        style,
                    });
                }
                Shape::Line(_) => {}
            }
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.shapes
            .iter()
            .filter_map(|(_, b)| b.clone())
            .reduce(|acc, b| acc.union(&b))
    }
}
