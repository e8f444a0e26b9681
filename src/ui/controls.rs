use crate::{
    core::map::Map,
    ui::{elements::Position, legend::Legend},
};

/// One row of the layer control
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControlEntry {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

/// A change requested through the layer control
#[derive(Debug, Clone, PartialEq)]
pub enum LayerToggle {
    SelectBase(String),
    SetOverlay { id: String, visible: bool },
}

/// Radio list of base layers above a checkbox list of overlays.
///
/// Rows are read from the map every frame, so overlays added after the
/// control show up without re-attaching it.
#[derive(Debug, Clone)]
pub struct LayerControl {
    position: Position,
    expanded: bool,
}

impl LayerControl {
    pub fn new() -> Self {
        Self {
            position: Position::TopRight,
            expanded: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn base_entries(map: &Map) -> Vec<LayerControlEntry> {
        Self::entries(map, map.base_layers())
    }

    pub fn overlay_entries(map: &Map) -> Vec<LayerControlEntry> {
        Self::entries(map, map.overlays())
    }

    fn entries(map: &Map, ids: &[String]) -> Vec<LayerControlEntry> {
        ids.iter()
            .filter_map(|id| map.get_layer(id))
            .map(|layer| LayerControlEntry {
                id: layer.id().to_string(),
                name: layer.name().to_string(),
                checked: layer.is_visible(),
            })
            .collect()
    }
}

impl Default for LayerControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Controls attached to the map as their data arrives
#[derive(Debug, Default)]
pub struct ControlManager {
    legend: Option<Legend>,
    layer_control: Option<LayerControl>,
}

impl ControlManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    pub fn attach_layer_control(&mut self, control: LayerControl) {
        self.layer_control = Some(control);
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn layer_control(&self) -> Option<&LayerControl> {
        self.layer_control.as_ref()
    }
}

#[cfg(feature = "egui")]
mod draw {
    use super::*;
    use crate::ui::CONTROL_MARGIN;
    use egui::{Area, Context, Frame, Id, Rect};

    impl LayerControl {
        pub fn show(&mut self, ctx: &Context, container: Rect, map: &Map) -> Option<LayerToggle> {
            let (pos, pivot) = self.position.anchor(container, CONTROL_MARGIN);
            let mut toggle = None;

            Area::new(Id::new("quakemap-layer-control"))
                .fixed_pos(pos)
                .pivot(pivot)
                .show(ctx, |ui| {
                    Frame::popup(ui.style()).show(ui, |ui| {
                        if !self.expanded {
                            if ui.button("Layers").clicked() {
                                self.expanded = true;
                            }
                            return;
                        }
                        ui.horizontal(|ui| {
                            ui.strong("Layers");
                            if ui.small_button("\u{2212}").clicked() {
                                self.expanded = false;
                            }
                        });

                        for entry in Self::base_entries(map) {
                            if ui.radio(entry.checked, &entry.name).clicked() && !entry.checked {
                                toggle = Some(LayerToggle::SelectBase(entry.id));
                            }
                        }

                        let overlays = Self::overlay_entries(map);
                        if !overlays.is_empty() {
                            ui.separator();
                        }
                        for entry in overlays {
                            let mut checked = entry.checked;
                            if ui.checkbox(&mut checked, &entry.name).changed() {
                                toggle = Some(LayerToggle::SetOverlay {
                                    id: entry.id,
                                    visible: checked,
                                });
                            }
                        }
                    });
                });

            toggle
        }
    }

    impl ControlManager {
        /// Draws every attached control; returns a layer change to apply
        pub fn show(&mut self, ctx: &Context, container: Rect, map: &Map) -> Option<LayerToggle> {
            if let Some(legend) = &self.legend {
                legend.show(ctx, container);
            }
            self.layer_control
                .as_mut()
                .and_then(|control| control.show(ctx, container, map))
        }
    }

    /// `+`/`-` buttons; returns the zoom step requested, if any
    pub fn zoom_buttons(ctx: &Context, container: Rect, can_zoom_in: bool, can_zoom_out: bool) -> Option<f64> {
        let (pos, pivot) = Position::TopLeft.anchor(container, CONTROL_MARGIN);
        let mut step = None;
        Area::new(Id::new("quakemap-zoom"))
            .fixed_pos(pos)
            .pivot(pivot)
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.add_enabled(can_zoom_in, egui::Button::new("+")).clicked() {
                        step = Some(1.0);
                    }
                    if ui.add_enabled(can_zoom_out, egui::Button::new("\u{2212}")).clicked() {
                        step = Some(-1.0);
                    }
                });
            });
        step
    }

    /// Attribution text of the active base layer
    pub fn attribution(ctx: &Context, container: Rect, text: &str) {
        let (pos, pivot) = Position::BottomLeft.anchor(container, 2.0);
        Area::new(Id::new("quakemap-attribution"))
            .fixed_pos(pos)
            .pivot(pivot)
            .interactable(false)
            .show(ctx, |ui| {
                Frame::none()
                    .fill(egui::Color32::from_white_alpha(200))
                    .inner_margin(egui::Margin::symmetric(4.0, 1.0))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(text)
                                .small()
                                .color(egui::Color32::from_gray(40)),
                        );
                    });
            });
    }
}

#[cfg(feature = "egui")]
pub use draw::{attribution, zoom_buttons};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::BaseLayerConfig, geo::LatLng, geo::Point},
        layers::{group::MarkerGroup, tile::TileLayer},
    };

    #[test]
    fn test_entries_follow_map_state() {
        let mut map = Map::new(LatLng::new(0.0, 0.0), 2.0, Point::new(400.0, 400.0));
        map.add_base_layer(TileLayer::from_config(&BaseLayerConfig::satellite()))
            .unwrap();
        map.add_base_layer(TileLayer::from_config(&BaseLayerConfig::outdoors()))
            .unwrap();

        let bases = LayerControl::base_entries(&map);
        assert_eq!(bases.len(), 2);
        assert!(bases[0].checked && !bases[1].checked);
        assert_eq!(bases[1].name, "Outdoors");
        assert!(LayerControl::overlay_entries(&map).is_empty());

        map.add_overlay(Box::new(MarkerGroup::new(
            "earthquakes".to_string(),
            "Earthquakes".to_string(),
        )))
        .unwrap();
        let overlays = LayerControl::overlay_entries(&map);
        assert_eq!(
            overlays,
            vec![LayerControlEntry {
                id: "earthquakes".to_string(),
                name: "Earthquakes".to_string(),
                checked: true,
            }]
        );
    }

    #[test]
    fn test_controls_start_detached() {
        let mut controls = ControlManager::new();
        assert!(controls.legend().is_none() && controls.layer_control().is_none());
        controls.attach_legend(Legend::depth());
        controls.attach_layer_control(LayerControl::new());
        assert!(controls.legend().is_some());
        assert_eq!(
            controls.layer_control().map(|c| c.position()),
            Some(Position::TopRight)
        );
    }
}
