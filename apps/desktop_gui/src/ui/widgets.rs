use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchHighlight {
    None,
    Correct,
    Wrong,
}

/// Filled circle. Clickable when `interactive`; grows a little on hover and when highlighted.
pub fn color_swatch(
    ui: &mut egui::Ui,
    fill: egui::Color32,
    outline: egui::Color32,
    diameter: f32,
    highlight: SwatchHighlight,
    interactive: bool,
) -> egui::Response {
    let sense = if interactive {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let (rect, mut response) = ui.allocate_exact_size(egui::vec2(diameter, diameter), sense);
    if interactive {
        response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
    }

    let base_radius = diameter * 0.45;
    let radius = match highlight {
        SwatchHighlight::Correct => diameter * 0.5,
        _ if interactive && response.hovered() => base_radius * 1.05,
        _ => base_radius,
    };
    let stroke = match highlight {
        SwatchHighlight::None => egui::Stroke::new(2.0, outline),
        SwatchHighlight::Correct => egui::Stroke::new(4.0, super::theme::CORRECT_GREEN),
        SwatchHighlight::Wrong => egui::Stroke::new(4.0, super::theme::WRONG_RED),
    };

    if ui.is_rect_visible(rect) {
        ui.painter().circle(rect.center(), radius, fill, stroke);
    }
    response
}

/// Left padding that centers `count` items of `item_width` separated by `spacing`.
pub fn centered_row_offset(available: f32, count: usize, item_width: f32, spacing: f32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let row = count as f32 * item_width + (count - 1) as f32 * spacing;
    ((available - row) / 2.0).max(0.0)
}
