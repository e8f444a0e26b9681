//! egui widget drawing a [`QuakeMapContext`]

use crate::{
    context::QuakeMapContext,
    core::geo::Point,
    prelude::HashSet,
    rendering::context::{DrawCommand, PathRenderStyle},
    tiles::{cache::TileCache, loader::TileLoader},
    ui::{
        controls::{attribution, zoom_buttons},
        elements::Position,
        CONTROL_MARGIN,
    },
    MapError, Result,
};
use egui::{
    epaint::Mesh,
    pos2, Area, Color32, ColorImage, Context, Frame, Id, Painter, Pos2, Rect, Response, Sense,
    Shape, Stroke, TextureHandle, TextureId, TextureOptions, Ui, Vec2, Widget,
};
use std::time::Duration;

/// Zoom levels per scrolled point
const SCROLL_ZOOM_RATE: f64 = 0.004;

const BACKGROUND: Color32 = Color32::from_rgb(221, 221, 221);
const TILE_PLACEHOLDER: Color32 = Color32::from_rgb(200, 200, 200);

/// Decoded tile textures keyed by URL, fed by a background [`TileLoader`]
pub struct TileTextures {
    cache: TileCache<TextureHandle>,
    loader: TileLoader,
    /// Tiles that downloaded but could not be decoded
    broken: HashSet<String>,
    base_layer: Option<String>,
}

impl TileTextures {
    pub fn new(client: reqwest::Client, runtime: tokio::runtime::Handle, capacity: usize) -> Self {
        Self {
            cache: TileCache::new(capacity),
            loader: TileLoader::new(client, runtime),
            broken: HashSet::default(),
            base_layer: None,
        }
    }

    /// Records the active base layer. Switching layers gives tiles that
    /// failed before another chance. Returns whether the layer changed.
    pub fn set_base_layer(&mut self, layer_id: Option<&str>) -> bool {
        if self.base_layer.as_deref() == layer_id {
            return false;
        }
        self.base_layer = layer_id.map(str::to_string);
        self.loader.forget_failures();
        self.broken.clear();
        true
    }

    /// Uploads every tile that finished downloading since the last frame
    pub fn poll(&mut self, ctx: &Context) {
        for result in self.loader.drain() {
            let Ok(bytes) = result.data else {
                continue;
            };
            match decode_tile(&bytes) {
                Ok(image) => {
                    let texture = ctx.load_texture(result.url.clone(), image, TextureOptions::LINEAR);
                    self.cache.put(result.url, texture);
                }
                Err(e) => {
                    log::warn!("Tile {} could not be decoded: {}", result.url, e);
                    self.broken.insert(result.url);
                }
            }
        }
    }

    /// Texture for `url`, requesting the download when it is not cached
    pub fn texture(&mut self, url: &str) -> Option<TextureId> {
        if let Some(texture) = self.cache.get(url) {
            return Some(texture.id());
        }
        if !self.broken.contains(url) {
            self.loader.request(url);
        }
        None
    }

    pub fn pending(&self) -> usize {
        self.loader.pending()
    }
}

fn decode_tile(bytes: &[u8]) -> Result<ColorImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| MapError::ParseError(format!("tile image: {}", e)))?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Interactive map: drag to pan, scroll to zoom, click a marker for its popup
pub struct MapWidget<'a> {
    context: &'a mut QuakeMapContext,
    tiles: &'a mut TileTextures,
}

impl<'a> MapWidget<'a> {
    pub fn new(context: &'a mut QuakeMapContext, tiles: &'a mut TileTextures) -> Self {
        Self { context, tiles }
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let map = self.context.map_mut();
        let options = map.options().clone();

        if options.dragging && response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                map.pan(Point::new(-delta.x as f64, -delta.y as f64));
            }
        }

        if options.scroll_wheel_zoom && response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let focus = response.hover_pos().map(|pos| to_point(pos - rect.min));
                let zoom = map.viewport.zoom + scroll as f64 * SCROLL_ZOOM_RATE;
                map.zoom_to(zoom, focus);
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.context.click_at(to_point(pos - rect.min));
            }
        }
    }

    fn paint_layers(&mut self, painter: &Painter, origin: Pos2) {
        let frame = match self.context.render() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Render failed: {}", e);
                return;
            }
        };

        for command in frame.commands() {
            match command {
                DrawCommand::Tile {
                    url,
                    bounds: (min, max),
                    opacity,
                    ..
                } => {
                    let tile_rect = Rect::from_min_max(to_pos(origin, min), to_pos(origin, max));
                    match self.tiles.texture(url) {
                        Some(texture) => {
                            painter.image(
                                texture,
                                tile_rect,
                                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                                Color32::WHITE.gamma_multiply(*opacity),
                            );
                        }
                        None => {
                            painter.rect_filled(tile_rect.shrink(0.5), 0.0, TILE_PLACEHOLDER);
                        }
                    }
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill_color,
                    stroke_color,
                    stroke_width,
                } => {
                    painter.circle(
                        to_pos(origin, center),
                        *radius,
                        Color32::from(*fill_color),
                        Stroke::new(*stroke_width, Color32::from(*stroke_color)),
                    );
                }
                DrawCommand::Line { points, style } => {
                    painter.add(Shape::line(
                        points.iter().map(|p| to_pos(origin, p)).collect(),
                        stroke(style),
                    ));
                }
                DrawCommand::Polygon {
                    exterior,
                    holes,
                    triangles,
                    style,
                } => {
                    if let Some(fill) = style.fill_color.filter(|_| !triangles.is_empty()) {
                        let vertices = exterior.iter().chain(holes.iter().flatten());
                        painter.add(fill_mesh(origin, vertices, triangles, fill.into()));
                    }
                    for ring in std::iter::once(exterior).chain(holes.iter()) {
                        painter.add(Shape::closed_line(
                            ring.iter().map(|p| to_pos(origin, p)).collect(),
                            stroke(style),
                        ));
                    }
                }
            }
        }
    }

    fn show_controls(&mut self, ctx: &Context, rect: Rect) {
        let options = self.context.map().options().clone();

        if options.zoom_control {
            let viewport = &self.context.map().viewport;
            let can_zoom_in = viewport.zoom < viewport.max_zoom;
            let can_zoom_out = viewport.zoom > viewport.min_zoom;
            match zoom_buttons(ctx, rect, can_zoom_in, can_zoom_out) {
                Some(step) if step > 0.0 => self.context.map_mut().zoom_in(None),
                Some(_) => self.context.map_mut().zoom_out(None),
                None => {}
            }
        }

        if options.attribution_control {
            if let Some(text) = self.context.map().attribution() {
                attribution(ctx, rect, text);
            }
        }

        let (controls, map) = self.context.controls_and_map();
        if let Some(toggle) = controls.show(ctx, rect, map) {
            if let Err(e) = self.context.handle_toggle(toggle) {
                log::warn!("Layer toggle rejected: {}", e);
            }
        }

        let viewport = self.context.map().viewport.clone();
        self.context.popups_mut().show(ctx, rect, &viewport);
    }

    fn show_status(&self, ctx: &Context, rect: Rect) {
        let failures = self.context.failures();
        if failures.is_empty() && !self.context.is_loading() {
            return;
        }

        let (pos, pivot) = Position::TopCenter.anchor(rect, CONTROL_MARGIN);
        Area::new(Id::new("quakemap-status"))
            .fixed_pos(pos)
            .pivot(pivot)
            .interactable(false)
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    for (kind, message) in &failures {
                        ui.colored_label(
                            Color32::from_rgb(200, 30, 30),
                            format!("Could not load the {}: {}", kind, message),
                        );
                    }
                    if self.context.is_loading() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading data\u{2026}");
                        });
                    }
                });
            });
    }
}

impl Widget for MapWidget<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let ctx = ui.ctx().clone();

        self.context
            .map_mut()
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));
        self.handle_input(ui, rect, &response);
        self.tiles.set_base_layer(self.context.map().active_base_layer());
        self.tiles.poll(&ctx);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);
        self.paint_layers(&painter, rect.min);

        self.show_controls(&ctx, rect);
        self.show_status(&ctx, rect);

        if self.context.is_loading() || self.tiles.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        response
    }
}

fn to_point(offset: Vec2) -> Point {
    Point::new(offset.x as f64, offset.y as f64)
}

fn to_pos(origin: Pos2, point: &Point) -> Pos2 {
    pos2(origin.x + point.x as f32, origin.y + point.y as f32)
}

/// egui only fills convex paths, so concave or holed polygons are painted
/// as a mesh over the exterior vertices followed by the hole vertices
fn fill_mesh<'a>(
    origin: Pos2,
    vertices: impl Iterator<Item = &'a Point>,
    triangles: &[[usize; 3]],
    color: Color32,
) -> Shape {
    let mut mesh = Mesh::default();
    for point in vertices {
        mesh.colored_vertex(to_pos(origin, point), color);
    }
    for &[a, b, c] in triangles {
        mesh.add_triangle(a as u32, b as u32, c as u32);
    }
    Shape::mesh(mesh)
}

fn stroke(style: &PathRenderStyle) -> Stroke {
    Stroke::new(style.stroke_width, Color32::from(style.stroke_color))
}
