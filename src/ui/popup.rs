use crate::core::geo::LatLng;

/// Information box bound to a marker
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: LatLng,
    /// Pixels between the anchor and the popup's tip, usually the marker radius
    pub offset: f32,
    pub title: String,
    pub lines: Vec<String>,
}

impl Popup {
    /// Builds a popup from text whose first line is the title
    pub fn from_text(anchor: LatLng, offset: f32, text: &str) -> Self {
        let mut lines = text.lines().map(str::to_string);
        let title = lines.next().unwrap_or_default();
        Self {
            anchor,
            offset,
            title,
            lines: lines.collect(),
        }
    }
}

/// Keeps at most one popup open
#[derive(Debug, Default)]
pub struct PopupManager {
    open: Option<Popup>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `popup`, closing any other
    pub fn open(&mut self, popup: Popup) {
        self.open = Some(popup);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<&Popup> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

#[cfg(feature = "egui")]
impl PopupManager {
    /// Draws the open popup above its anchor; the close button closes it
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        container: egui::Rect,
        viewport: &crate::core::viewport::Viewport,
    ) {
        use egui::{Align2, Area, Frame, Id, Pos2, RichText};

        let Some(popup) = &self.open else {
            return;
        };
        let anchor = viewport.lat_lng_to_pixel(&popup.anchor);
        let tip = Pos2::new(
            container.min.x + anchor.x as f32,
            container.min.y + anchor.y as f32 - popup.offset,
        );
        if !container.contains(tip) {
            return;
        }

        let mut close = false;
        Area::new(Id::new("quakemap-popup"))
            .fixed_pos(tip)
            .pivot(Align2::CENTER_BOTTOM)
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(280.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&popup.title).strong().size(15.0));
                        if ui.small_button("\u{d7}").clicked() {
                            close = true;
                        }
                    });
                    ui.separator();
                    for line in &popup.lines {
                        ui.label(line);
                    }
                });
            });

        if close {
            self.close();
        }
    }
}
