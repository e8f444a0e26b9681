/// Corner or edge of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
}

#[cfg(feature = "egui")]
impl Position {
    /// Anchor point inside `container` and the pivot to place a control at
    /// it, `margin` pixels from the edges
    pub fn anchor(&self, container: egui::Rect, margin: f32) -> (egui::Pos2, egui::Align2) {
        use egui::{Align2, Pos2};

        match self {
            Position::TopLeft => (
                Pos2::new(container.min.x + margin, container.min.y + margin),
                Align2::LEFT_TOP,
            ),
            Position::TopRight => (
                Pos2::new(container.max.x - margin, container.min.y + margin),
                Align2::RIGHT_TOP,
            ),
            Position::TopCenter => (
                Pos2::new(container.center().x, container.min.y + margin),
                Align2::CENTER_TOP,
            ),
            Position::BottomLeft => (
                Pos2::new(container.min.x + margin, container.max.y - margin),
                Align2::LEFT_BOTTOM,
            ),
            Position::BottomRight => (
                Pos2::new(container.max.x - margin, container.max.y - margin),
                Align2::RIGHT_BOTTOM,
            ),
        }
    }
}

#[cfg(all(test, feature = "egui"))]
mod tests {
    use super::*;
    use egui::{pos2, Align2, Rect};

    #[test]
    fn test_anchor_respects_margin() {
        let container = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
        assert_eq!(
            Position::BottomRight.anchor(container, 10.0),
            (pos2(790.0, 590.0), Align2::RIGHT_BOTTOM)
        );
        assert_eq!(
            Position::TopLeft.anchor(container, 10.0),
            (pos2(10.0, 10.0), Align2::LEFT_TOP)
        );
    }
}
