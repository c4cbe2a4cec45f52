//! Core functionality for the slider and ROI calculator widgets
//!
//! This crate provides the scale model, display text formatting, typed
//! widget configuration, the value bus that connects sliders to
//! calculators, and the ROI formulas.

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod roi;
pub mod scale;
pub mod state;

// Re-export commonly used types
pub use bus::{PublishedValue, SubscriptionId, ValueBus, ValueSubscriber};
pub use config::{AttributeSource, Configured, SliderConfig, UNIDENTIFIED_SLIDER_ID};
pub use error::ConfigError;
pub use events::EventBus;
pub use format::{format_compact, format_currency, parse_display, CurrencyFormat};
pub use roi::{
    CalculatorInputs, InputField, Plan, PlanBasis, PlanTable, RoiResults, SalaryPeriod,
    SavingsModel, StandardSavingsModel,
};
pub use scale::{Scale, ScaleKind};
pub use state::PageState;
