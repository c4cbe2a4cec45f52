//! Typed slider configuration read from markup attributes

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scale::Scale;

/// Attribute names recognized on a slider wrapper
pub mod attr {
    /// Role of the widget, used as its Value Bus id
    pub const ROLE: &str = "data-roi";
    /// JSON array: `[min, max]` or an explicit marker list
    pub const SCALE: &str = "data-log-slider-scale";
    /// `linear`, `log` or `markers`
    pub const KIND: &str = "data-log-slider-kind";
    /// Suffix appended to the display text
    pub const CURRENCY: &str = "data-log-slider-currency";
    /// Initial value, plain numeric text
    pub const START: &str = "data-log-slider-start";
    /// `true` to move in marker steps
    pub const SNAP: &str = "data-log-slider-snap";
}

/// Id published by sliders without a role. Not reliable for routing.
pub const UNIDENTIFIED_SLIDER_ID: &str = "unidentified";

/// Suffix used when a slider declares none
pub const DEFAULT_CURRENCY: &str = "€";

/// Anything that can answer attribute lookups
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Configuration of one slider instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Value Bus id
    pub id: String,

    /// Position to value mapping
    pub scale: Scale,

    /// Suffix appended to the display text
    pub currency: String,

    /// Initial value; the slider starts at position 0 without one
    pub start_value: Option<f64>,

    /// Round gesture positions to the nearest marker
    pub snap: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            id: UNIDENTIFIED_SLIDER_ID.to_string(),
            scale: Scale::default_markers(),
            currency: DEFAULT_CURRENCY.to_string(),
            start_value: None,
            snap: false,
        }
    }
}

/// A configuration built leniently, with every problem that was replaced by a default
#[derive(Debug, Clone, PartialEq)]
pub struct Configured {
    pub config: SliderConfig,
    pub issues: Vec<ConfigError>,
}

impl SliderConfig {
    /// Read the configuration, failing on the first invalid attribute.
    pub fn from_attributes(attrs: &impl AttributeSource) -> Result<Self, ConfigError> {
        let Configured { config, issues } = Self::from_attributes_lenient(attrs);
        match issues.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(config),
        }
    }

    /// Read the configuration, replacing each invalid attribute with its default.
    pub fn from_attributes_lenient(attrs: &impl AttributeSource) -> Configured {
        let mut config = SliderConfig::default();
        let mut issues = Vec::new();

        if let Some(role) = non_empty(attrs.attribute(attr::ROLE)) {
            config.id = role;
        }

        if let Some(raw) = non_empty(attrs.attribute(attr::SCALE)) {
            let kind = non_empty(attrs.attribute(attr::KIND));
            match parse_scale(&raw, kind.as_deref()) {
                Ok(scale) => config.scale = scale,
                Err(error) => issues.push(error),
            }
        }

        if let Some(currency) = attrs.attribute(attr::CURRENCY) {
            config.currency = currency;
        }

        if let Some(raw) = non_empty(attrs.attribute(attr::START)) {
            match parse_start_value(&raw) {
                Ok(value) => config.start_value = Some(value),
                Err(error) => issues.push(error),
            }
        }

        if let Some(raw) = attrs.attribute(attr::SNAP) {
            match parse_flag(&raw) {
                Some(snap) => config.snap = snap,
                None => issues.push(ConfigError::InvalidSnapFlag(raw)),
            }
        }

        Configured { config, issues }
    }

    /// Whether the slider carries a routable id
    pub fn is_identified(&self) -> bool {
        self.id != UNIDENTIFIED_SLIDER_ID
    }

    /// Position matching the start value, or 0
    pub fn start_position(&self) -> f64 {
        self.start_value
            .map(|value| self.scale.position_at(value))
            .unwrap_or(0.0)
    }
}

/// Parse a scale attribute.
///
/// Without an explicit kind, two entries describe a log scale and more
/// entries a marker list.
pub fn parse_scale(raw: &str, kind: Option<&str>) -> Result<Scale, ConfigError> {
    let values: Vec<f64> =
        serde_json::from_str(raw).map_err(|error| ConfigError::InvalidScaleJson {
            raw: raw.to_string(),
            message: error.to_string(),
        })?;

    match kind.map(str::trim) {
        Some("linear") => {
            let (min, max) = bound_pair("linear", &values)?;
            Scale::linear(min, max)
        }
        Some("log") => {
            let (min, max) = bound_pair("log", &values)?;
            Scale::log(min, max)
        }
        Some("markers") => Scale::markers(values),
        Some(other) => Err(ConfigError::UnknownScaleKind(other.to_string())),
        None if values.len() == 2 => Scale::log(values[0], values[1]),
        None => Scale::markers(values),
    }
}

fn bound_pair(kind: &'static str, values: &[f64]) -> Result<(f64, f64), ConfigError> {
    match values {
        [min, max] => Ok((*min, *max)),
        _ => Err(ConfigError::WrongBoundCount {
            kind,
            count: values.len(),
        }),
    }
}

fn parse_start_value(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConfigError::InvalidStartValue(raw.to_string()))
}

/// A bare attribute counts as `true`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
