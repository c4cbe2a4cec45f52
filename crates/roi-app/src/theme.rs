use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Calculator Light".to_string(),
            dark_mode: false,
        }
    }
}

/// Apply the calculator theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    let (panel_bg, track_bg, text_color) = if theme.dark_mode {
        (
            Color32::from_rgb(31, 31, 31),
            Color32::from_rgb(55, 55, 55),
            Color32::from_rgb(220, 220, 220),
        )
    } else {
        (
            Color32::from_rgb(250, 250, 252),
            Color32::from_rgb(225, 228, 235),
            Color32::from_rgb(30, 32, 40),
        )
    };

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = track_bg;

    for widgets in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
    ] {
        widgets.fg_stroke = Stroke::new(1.0, text_color);
        widgets.rounding = Rounding::same(6.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.rounding = Rounding::same(6.0);

    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Slider fill and handle color
pub fn accent_color() -> Color32 {
    Color32::from_rgb(72, 110, 240)
}

/// Color of the savings figures
pub fn savings_color() -> Color32 {
    Color32::from_rgb(40, 160, 90)
}

/// Color of negative savings
pub fn loss_color() -> Color32 {
    Color32::from_rgb(220, 70, 70)
}
