//! Paints a slider's element tree and feeds egui pointer input into its controller

use egui::{Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use roi_widgets::dom;
use roi_widgets::SliderController;

use crate::theme;

const TRACK_HEIGHT: f32 = 6.0;
const HANDLE_RADIUS: f32 = 9.0;

/// Show one labelled slider with its display text and numeric input
pub fn show(ui: &mut Ui, label: &str, slider: &mut SliderController) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let display = slider
                .elements()
                .display
                .as_ref()
                .map(dom::Element::text)
                .unwrap_or_default();
            ui.strong(display);
        });
    });

    draw_track(ui, slider);

    let mut value = slider.state().value;
    let (lower, upper) = slider.config().scale.bounds();
    let input = ui.add(
        egui::DragValue::new(&mut value)
            .clamp_range(lower..=upper)
            .speed((upper - lower) / 1_000.0),
    );
    if input.changed() {
        slider.input_changed(value);
    }
}

fn draw_track(ui: &mut Ui, slider: &mut SliderController) {
    let width = ui.available_width().min(480.0);
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(width, HANDLE_RADIUS * 2.0 + 4.0), Sense::click_and_drag());

    // Keep the controller's geometry in sync with where the track is painted
    let track = Rect::from_center_size(rect.center(), Vec2::new(rect.width(), TRACK_HEIGHT));
    slider.elements().track.set_rect(dom::Rect::new(
        track.left() as f64,
        track.top() as f64,
        track.width() as f64,
        track.height() as f64,
    ));

    handle_pointer(ui, &response, slider);

    let painter = ui.painter_at(rect.expand(HANDLE_RADIUS));
    painter.rect_filled(
        track,
        Rounding::same(TRACK_HEIGHT / 2.0),
        ui.style().visuals.extreme_bg_color,
    );

    let elements = slider.elements();
    if let Some(width_percent) = elements.fill.as_ref().and_then(|fill| fill.style().width_percent) {
        let mut fill = track;
        fill.set_width(track.width() * (width_percent / 100.0) as f32);
        painter.rect_filled(fill, Rounding::same(TRACK_HEIGHT / 2.0), theme::accent_color());
    }

    let left_percent = elements.handle.style().left_percent.unwrap_or(0.0);
    let handle_x = track.left() + track.width() * (left_percent / 100.0) as f32;
    let center = Pos2::new(handle_x, track.center().y);
    painter.circle_filled(center, HANDLE_RADIUS, ui.style().visuals.panel_fill);
    painter.circle_stroke(center, HANDLE_RADIUS, Stroke::new(2.0, theme::accent_color()));

    if response.hovered() || slider.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
}

/// Press on the track starts a drag, movement while pressed drags, and a
/// pointer release anywhere ends it.
fn handle_pointer(ui: &Ui, response: &egui::Response, slider: &mut SliderController) {
    if response.is_pointer_button_down_on() {
        if let Some(pos) = response.interact_pointer_pos() {
            let x = pos.x as f64;
            if slider.is_dragging() {
                slider.drag_to(x);
            } else {
                slider.press(x);
            }
        }
    }

    if slider.is_dragging() && !ui.input(|i| i.pointer.any_down()) {
        slider.release();
    }
}
