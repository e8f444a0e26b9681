//! Depth color key

use crate::{layers::style::Color, symbology::DepthClass, ui::elements::Position};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub label: &'static str,
}

/// Static key of the six depth buckets, deepest first
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    title: String,
    entries: Vec<LegendEntry>,
    position: Position,
}

impl Legend {
    pub fn depth() -> Self {
        Self {
            title: "Depth (km)".to_string(),
            entries: DepthClass::ALL
                .iter()
                .map(|class| LegendEntry {
                    color: class.color(),
                    label: class.label(),
                })
                .collect(),
            position: Position::BottomRight,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[cfg(feature = "egui")]
impl Legend {
    pub fn show(&self, ctx: &egui::Context, container: egui::Rect) {
        use egui::{Area, Color32, Frame, Id, Sense, Vec2};

        let (pos, pivot) = self.position.anchor(container, crate::ui::CONTROL_MARGIN);
        Area::new(Id::new("quakemap-legend"))
            .fixed_pos(pos)
            .pivot(pivot)
            .interactable(false)
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong(&self.title);
                    for entry in &self.entries {
                        ui.horizontal(|ui| {
                            let (swatch, _) = ui.allocate_exact_size(Vec2::splat(14.0), Sense::hover());
                            ui.painter()
                                .rect_filled(swatch, 2.0, Color32::from(entry.color));
                            ui.label(entry.label);
                        });
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_legend_lists_six_buckets_in_order() {
        let legend = Legend::depth();
        assert_eq!(legend.title(), "Depth (km)");
        assert_eq!(legend.position(), Position::BottomRight);

        let labels: Vec<&str> = legend.entries().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["> 90", "70-90", "50-70", "30-50", "10-30", "< 10"]);
        assert_eq!(legend.entries()[0].color.to_hex(), "#FF0000");
        assert_eq!(legend.entries()[5].color.to_hex(), "#00FFFF");
    }
}
