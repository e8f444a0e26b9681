use crate::{
    core::geo::{Point, TileCoord},
    layers::style::{CircleStyle, Color},
};

/// Stroke and optional fill of a vector path in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct PathRenderStyle {
    pub stroke_color: Color,
    pub stroke_width: f32,
    /// `None` for unfilled paths
    pub fill_color: Option<Color>,
}

/// Commands that can be issued to the render context.
///
/// Coordinates are container pixels; colors already carry the layer and
/// style opacity in their alpha channel.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Tile {
        coord: TileCoord,
        url: String,
        /// min, max screen coordinates
        bounds: (Point, Point),
        opacity: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        fill_color: Color,
        stroke_color: Color,
        stroke_width: f32,
    },
    Line {
        points: Vec<Point>,
        style: PathRenderStyle,
    },
    Polygon {
        exterior: Vec<Point>,
        holes: Vec<Vec<Point>>,
        /// Fill triangles indexing `exterior` followed by `holes`, empty when unfilled
        triangles: Vec<[usize; 3]>,
        style: PathRenderStyle,
    },
}

impl DrawCommand {
    /// Circle command for a marker style scaled by the layer opacity
    pub fn circle(center: Point, radius: f32, style: &CircleStyle, layer_opacity: f32) -> Self {
        DrawCommand::Circle {
            center,
            radius,
            fill_color: style.fill_color.with_opacity(style.fill_opacity * layer_opacity),
            stroke_color: style.color.with_opacity(style.opacity * layer_opacity),
            stroke_width: style.weight,
        }
    }
}

/// Frame-local drawing queue filled by layers and consumed by a painter
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Begin a frame, dropping the previous frame's commands
    pub fn begin_frame(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.drawing_queue.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.drawing_queue.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn tile_count(&self) -> usize {
        self.drawing_queue
            .iter()
            .filter(|c| matches!(c, DrawCommand::Tile { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.drawing_queue
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    /// Number of line and polygon commands
    pub fn path_count(&self) -> usize {
        self.drawing_queue
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. } | DrawCommand::Polygon { .. }))
            .count()
    }
}
