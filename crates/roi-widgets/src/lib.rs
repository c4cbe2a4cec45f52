//! Slider and ROI calculator widgets
//!
//! This crate provides the in-memory element tree the widgets render into,
//! the slider controller state machine, the ROI calculator and the page
//! assembly that wires them to a shared [`roi_core::PageState`].

pub mod calculator;
pub mod dom;
pub mod page;
pub mod slider;
pub mod timer;

use thiserror::Error;

// Re-export commonly used types
pub use calculator::{ActionButtonConfig, CalculatorConfig, OutputRole, RoiCalculator};
pub use dom::{Document, Element, MutationObserver, Rect};
pub use page::{Page, PageConfig, PageSlider, SliderMarkup};
pub use slider::{DragState, SliderController, SliderElements, SliderState};
pub use timer::{FallbackTimer, DEFAULT_POLL_INTERVAL};

/// Widget setup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("{widget}: missing required element {role}")]
    MissingElement { widget: String, role: &'static str },
}
