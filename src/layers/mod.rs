pub mod base;
pub mod group;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod style;
pub mod tile;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use group::MarkerGroup;
pub use manager::LayerManager;
pub use marker::CircleMarker;
pub use style::{CircleStyle, Color, MarkerStyle, PathStyle};
pub use tile::{TileLayer, TileLayerOptions};
