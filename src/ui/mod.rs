//! Map controls and popups.
//!
//! The state of every control is plain data; drawing with egui is behind the
//! `egui` feature.

pub mod controls;
pub mod elements;
pub mod legend;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

/// Gap between a control and the map edge, in pixels
pub const CONTROL_MARGIN: f32 = 10.0;

pub use controls::{ControlManager, LayerControl, LayerControlEntry, LayerToggle};
pub use elements::Position;
pub use legend::{Legend, LegendEntry};
pub use popup::{Popup, PopupManager};

#[cfg(feature = "egui")]
pub use widget::{MapWidget, TileTextures};
