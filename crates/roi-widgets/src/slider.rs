//! Slider controller
//!
//! Owns one slider instance: turns press/drag/release gestures into a
//! normalized position, maps it through the configured scale, writes the
//! handle, fill, display text and backing input, then announces the new
//! value on the slider's own event bus and on the page's value bus.

use std::sync::Arc;

use roi_core::events::events::{SliderChanged, SliderReleased};
use roi_core::{format_compact, EventBus, PageState, SliderConfig, ValueBus};
use tracing::{debug, info, warn};

use crate::dom::{parts, Element, SLIDER_PART_ATTR};
use crate::WidgetError;

/// Pointer interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Current position and value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SliderState {
    /// Normalized position in `[0, 1]`
    pub position: f64,
    pub value: f64,
}

/// The role-tagged elements of one slider
#[derive(Debug, Clone)]
pub struct SliderElements {
    pub wrapper: Element,
    pub track: Element,
    pub handle: Element,
    pub fill: Option<Element>,
    pub display: Option<Element>,
    pub input: Option<Element>,
}

impl SliderElements {
    /// Find the slider parts below `wrapper`. Track and handle are required.
    pub fn locate(wrapper: &Element, widget: &str) -> Result<Self, WidgetError> {
        let part = |name: &str| wrapper.query(SLIDER_PART_ATTR, name);
        let required = |name: &'static str| {
            part(name).ok_or_else(|| WidgetError::MissingElement {
                widget: widget.to_string(),
                role: name,
            })
        };

        Ok(Self {
            wrapper: wrapper.clone(),
            track: required(parts::TRACK)?,
            handle: required(parts::HANDLE)?,
            fill: part(parts::FILL),
            display: part(parts::DISPLAY),
            input: part(parts::INPUT),
        })
    }
}

/// One interactive slider
pub struct SliderController {
    config: SliderConfig,
    elements: SliderElements,
    state: SliderState,
    drag: DragState,
    bus: Arc<ValueBus>,
    events: EventBus,
}

impl SliderController {
    /// Configure a slider from its wrapper's attributes and render its initial state.
    ///
    /// Attribute problems are logged and replaced by defaults. Missing track
    /// or handle elements abort the setup.
    pub fn setup(wrapper: &Element, page: &PageState) -> Result<Self, WidgetError> {
        let configured = SliderConfig::from_attributes_lenient(wrapper);
        for issue in &configured.issues {
            warn!(slider = %configured.config.id, "Slider configuration: {}", issue);
        }

        let elements = SliderElements::locate(wrapper, &configured.config.id)?;
        let controller = Self::new(configured.config, elements, page.bus.clone());
        info!(
            slider = %controller.id(),
            value = controller.state.value,
            "Slider initialized"
        );
        Ok(controller)
    }

    /// Create a controller from an already validated configuration.
    ///
    /// The initial position comes from the start value (0 without one) and
    /// is rendered and published before any interaction.
    pub fn new(config: SliderConfig, elements: SliderElements, bus: Arc<ValueBus>) -> Self {
        let mut controller = Self {
            config,
            elements,
            state: SliderState::default(),
            drag: DragState::Idle,
            bus,
            events: EventBus::new(),
        };

        match controller.config.start_value {
            Some(value) => controller.set_value(value),
            None => controller.set_position(0.0),
        }
        controller
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn state(&self) -> SliderState {
        self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn elements(&self) -> &SliderElements {
        &self.elements
    }

    /// Events dispatched on this slider's element
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Press on the track or handle at client coordinate `x`
    pub fn press(&mut self, x: f64) {
        self.drag = DragState::Dragging;
        let position = self.position_from_pointer(x);
        self.set_position(position);
    }

    /// Pointer moved to `x`. Ignored unless a press is in progress.
    pub fn drag_to(&mut self, x: f64) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let position = self.position_from_pointer(x);
        self.set_position(position);
        true
    }

    /// Pointer released anywhere on the page
    pub fn release(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.drag = DragState::Idle;
        debug!(slider = %self.id(), value = self.state.value, "Slider released");
        self.events.publish(SliderReleased {
            id: self.config.id.clone(),
            value: self.state.value,
        });
    }

    /// The backing numeric input was edited
    pub fn input_changed(&mut self, value: f64) {
        self.set_value(value);
    }

    /// Move to a normalized position
    pub fn set_position(&mut self, position: f64) {
        self.update(position, None);
    }

    /// Move to the position of `value`, keeping the value itself
    pub fn set_value(&mut self, value: f64) {
        let position = self.config.scale.position_at(value);
        self.update(position, Some(value));
    }

    /// Normalized position of client coordinate `x` on the track
    pub fn position_from_pointer(&self, x: f64) -> f64 {
        let rect = self.elements.track.rect();
        if rect.width <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        ((x - rect.left) / rect.width).clamp(0.0, 1.0)
    }

    /// Display text for a value, e.g. `1.500€`
    pub fn display_text(&self, value: f64) -> String {
        format!("{}{}", format_compact(value), self.config.currency)
    }

    fn update(&mut self, position: f64, value: Option<f64>) {
        let scale = &self.config.scale;
        let mut position = if position.is_nan() { 0.0 } else { position.clamp(0.0, 1.0) };

        let value = match value {
            Some(value) if !self.config.snap && value.is_finite() => {
                let (lower, upper) = scale.bounds();
                value.clamp(lower, upper)
            }
            _ => {
                if self.config.snap {
                    position = scale.snap(position);
                }
                scale.value_at(position)
            }
        };
        self.state = SliderState { position, value };

        let percent = position * 100.0;
        self.elements.handle.set_left_percent(percent);
        if let Some(fill) = &self.elements.fill {
            fill.set_width_percent(percent);
        }
        if let Some(display) = &self.elements.display {
            display.set_text(self.display_text(value));
        }
        if let Some(input) = &self.elements.input {
            input.set_value(value);
        }

        self.events.publish(SliderChanged {
            id: self.config.id.clone(),
            value,
            position,
            scale: self.config.scale.clone(),
            currency: self.config.currency.clone(),
        });
        self.bus.publish(self.config.id.clone(), value);
    }
}

impl std::fmt::Debug for SliderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("drag", &self.drag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Rect;
    use parking_lot::Mutex;
    use roi_core::config::attr;
    use roi_core::PublishedValue;

    fn slider_markup(attrs: &[(&str, &str)]) -> Element {
        let wrapper = Element::new("div").with_attr(SLIDER_PART_ATTR, parts::WRAPPER);
        for (name, value) in attrs {
            wrapper.set_attribute(*name, *value);
        }
        let track = Element::new("div").with_attr(SLIDER_PART_ATTR, parts::TRACK);
        track.set_rect(Rect::new(100.0, 0.0, 400.0, 8.0));
        track.append(Element::new("div").with_attr(SLIDER_PART_ATTR, parts::FILL));
        track.append(Element::new("div").with_attr(SLIDER_PART_ATTR, parts::HANDLE));
        wrapper
            .with_child(track)
            .with_child(Element::new("span").with_attr(SLIDER_PART_ATTR, parts::DISPLAY))
            .with_child(Element::new("input").with_attr(SLIDER_PART_ATTR, parts::INPUT))
    }

    fn markers_slider(page: &PageState) -> SliderController {
        let wrapper = slider_markup(&[
            (attr::ROLE, "sku-count"),
            (attr::SCALE, "[10, 100, 1000, 10000, 100000]"),
            (attr::CURRENCY, ""),
            (attr::START, "1000"),
        ]);
        SliderController::setup(&wrapper, page).unwrap()
    }

    #[test]
    fn test_initial_render_and_publish() {
        let page = PageState::new();
        let slider = markers_slider(&page);

        assert_eq!(slider.state(), SliderState { position: 0.5, value: 1000.0 });
        assert_eq!(slider.elements().handle.style().left_percent, Some(50.0));
        assert_eq!(slider.elements().fill.as_ref().unwrap().style().width_percent, Some(50.0));
        assert_eq!(slider.elements().display.as_ref().unwrap().text(), "1.000");
        assert_eq!(slider.elements().input.as_ref().unwrap().value(), Some(1000.0));
        assert_eq!(page.published("sku-count"), Some(1000.0));
    }

    #[test]
    fn test_drag_state_machine() {
        let page = PageState::new();
        let mut slider = markers_slider(&page);

        assert!(!slider.drag_to(500.0));
        assert_eq!(slider.state().position, 0.5);

        slider.press(200.0);
        assert!(slider.is_dragging());
        assert_eq!(slider.state().position, 0.25);
        assert_eq!(slider.state().value, 100.0);

        // Movement past the track end clamps to the last marker
        assert!(slider.drag_to(900.0));
        assert_eq!(slider.state().value, 100_000.0);
        assert_eq!(slider.elements().display.as_ref().unwrap().text(), "100K");

        slider.release();
        assert_eq!(slider.drag_state(), DragState::Idle);
        assert!(!slider.drag_to(100.0));
        assert_eq!(page.published("sku-count"), Some(100_000.0));
    }

    #[test]
    fn test_every_move_is_published() {
        let page = PageState::new();
        let mut slider = markers_slider(&page);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        page.bus.subscribe(move |published: &PublishedValue| sink.lock().push(published.value));

        slider.press(100.0);
        slider.drag_to(300.0);
        slider.drag_to(300.0);
        slider.release();

        assert_eq!(*seen.lock(), vec![10.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_element_events() {
        let page = PageState::new();
        let mut slider = markers_slider(&page);

        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        slider
            .events()
            .on(move |event: &SliderChanged| sink.lock().push((event.position, event.value)));
        let releases = Arc::new(Mutex::new(0));
        let counter = releases.clone();
        slider.events().on(move |_: &SliderReleased| *counter.lock() += 1);

        slider.press(500.0);
        slider.release();
        slider.release();

        assert_eq!(*changes.lock(), vec![(1.0, 100_000.0)]);
        assert_eq!(*releases.lock(), 1);
    }

    #[test]
    fn test_snap_moves_in_marker_steps() {
        let page = PageState::new();
        let wrapper = slider_markup(&[
            (attr::ROLE, "transactions"),
            (attr::SCALE, "[500, 1000, 2000, 5000, 15000]"),
            (attr::SNAP, "true"),
        ]);
        let mut slider = SliderController::setup(&wrapper, &page).unwrap();
        assert_eq!(slider.state().value, 500.0);

        slider.press(100.0 + 400.0 * 0.3);
        assert_eq!(slider.state().position, 0.25);
        assert_eq!(slider.state().value, 1000.0);

        slider.input_changed(4_000.0);
        assert_eq!(slider.state().value, 5000.0);
    }

    #[test]
    fn test_input_value_is_source_of_truth() {
        let page = PageState::new();
        let wrapper = slider_markup(&[(attr::ROLE, "item-value"), (attr::SCALE, "[1, 10000]")]);
        let mut slider = SliderController::setup(&wrapper, &page).unwrap();

        slider.input_changed(250.0);
        assert_eq!(slider.state().value, 250.0);
        assert!((slider.state().position - (250f64.log10() / 4.0)).abs() < 1e-12);
        assert_eq!(slider.elements().display.as_ref().unwrap().text(), "250€");

        slider.input_changed(1e9);
        assert_eq!(slider.state().value, 10_000.0);
        assert_eq!(slider.state().position, 1.0);
    }

    #[test]
    fn test_malformed_attributes_fall_back() {
        let page = PageState::new();
        let wrapper = slider_markup(&[(attr::SCALE, "not json"), (attr::START, "abc")]);
        let slider = SliderController::setup(&wrapper, &page).unwrap();

        assert_eq!(slider.id(), roi_core::UNIDENTIFIED_SLIDER_ID);
        assert_eq!(slider.state().value, 1.0);
        assert_eq!(page.published(roi_core::UNIDENTIFIED_SLIDER_ID), Some(1.0));
    }

    #[test]
    fn test_missing_handle_aborts_setup() {
        let page = PageState::new();
        let wrapper = Element::new("div")
            .with_attr(attr::ROLE, "salary")
            .with_child(Element::new("div").with_attr(SLIDER_PART_ATTR, parts::TRACK));

        let error = SliderController::setup(&wrapper, &page).unwrap_err();
        assert_eq!(
            error,
            WidgetError::MissingElement {
                widget: "salary".to_string(),
                role: parts::HANDLE
            }
        );
        assert_eq!(page.published("salary"), None);
    }

    #[test]
    fn test_zero_width_track() {
        let page = PageState::new();
        let wrapper = slider_markup(&[(attr::SCALE, "[0, 10]"), (attr::KIND, "linear")]);
        let mut slider = SliderController::setup(&wrapper, &page).unwrap();
        slider.elements().track.set_rect(Rect::default());

        slider.press(250.0);
        assert_eq!(slider.state().position, 0.0);
    }
}
