//! Slider scale model
//!
//! A [`Scale`] maps a normalized slider position in `[0, 1]` to a displayed
//! value and back. Three kinds are supported:
//!
//! - **Linear**: evenly distributed values between two bounds.
//! - **Log**: equal distances represent equal ratios between two bounds.
//! - **Markers**: explicit anchor values at evenly spaced positions, with
//!   logarithmic interpolation between neighbouring markers.
//!
//! Positions and values outside the range clamp to the boundaries; a scale
//! never extrapolates.
//!
//! ```rust
//! use roi_core::Scale;
//!
//! let scale = Scale::markers(vec![1.0, 10.0, 100.0, 1000.0]).unwrap();
//! assert_eq!(scale.value_at(0.0), 1.0);
//! assert_eq!(scale.value_at(1.0), 1000.0);
//! assert!((scale.value_at(0.5) - 31.622_776).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lower bound substituted for non-positive log scale minimums.
pub const LOG_FLOOR: f64 = 0.1;

/// Fractional indices closer than this to an integer land on the marker.
const INDEX_EPSILON: f64 = 1e-9;

/// The shape of a validated scale
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleKind {
    /// `min + position * (max - min)`
    Linear { min: f64, max: f64 },
    /// Logarithmic interpolation between two bounds
    Log { min: f64, max: f64 },
    /// Piecewise interpolation between explicit, strictly increasing markers
    Markers(Vec<f64>),
}

/// A validated slider scale.
///
/// Construct through [`Scale::linear`], [`Scale::log`] or [`Scale::markers`];
/// an invalid scale cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleRepr", into = "ScaleRepr")]
pub struct Scale {
    kind: ScaleKind,
}

impl Scale {
    /// Create a linear scale. Requires finite `min < max`.
    pub fn linear(min: f64, max: f64) -> Result<Self, ConfigError> {
        check_bounds(min, max)?;
        Ok(Self { kind: ScaleKind::Linear { min, max } })
    }

    /// Create a logarithmic scale.
    ///
    /// A `min <= 0` is replaced by [`LOG_FLOOR`] when mapping, so the
    /// effective minimum must still be below `max`.
    pub fn log(min: f64, max: f64) -> Result<Self, ConfigError> {
        check_bounds(min, max)?;
        check_bounds(log_floor(min), max)?;
        Ok(Self { kind: ScaleKind::Log { min, max } })
    }

    /// Create a marker scale from at least two strictly increasing values.
    pub fn markers(values: Vec<f64>) -> Result<Self, ConfigError> {
        if values.len() < 2 {
            return Err(ConfigError::TooFewMarkers { count: values.len() });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteBound);
        }
        for (index, pair) in values.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::MarkersNotIncreasing {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }
        Ok(Self { kind: ScaleKind::Markers(values) })
    }

    /// The scale used when a slider carries no usable scale attribute.
    pub fn default_markers() -> Self {
        Self {
            kind: ScaleKind::Markers(vec![1.0, 10.0, 100.0, 1_000.0, 10_000.0]),
        }
    }

    pub fn kind(&self) -> &ScaleKind {
        &self.kind
    }

    /// Effective `(lower, upper)` values reachable on this scale
    pub fn bounds(&self) -> (f64, f64) {
        match &self.kind {
            ScaleKind::Linear { min, max } => (*min, *max),
            ScaleKind::Log { min, max } => (log_floor(*min), *max),
            ScaleKind::Markers(markers) => (markers[0], markers[markers.len() - 1]),
        }
    }

    /// Number of markers, or `None` for continuous scales
    pub fn marker_count(&self) -> Option<usize> {
        match &self.kind {
            ScaleKind::Markers(markers) => Some(markers.len()),
            _ => None,
        }
    }

    /// Map a position to a value. The position is clamped to `[0, 1]`.
    pub fn value_at(&self, position: f64) -> f64 {
        let position = clamp_unit(position);
        let (lower, upper) = self.bounds();
        if position <= 0.0 {
            return lower;
        }
        if position >= 1.0 {
            return upper;
        }

        let value = match &self.kind {
            ScaleKind::Linear { min, max } => min + position * (max - min),
            ScaleKind::Log { .. } => log_lerp(lower, upper, position),
            ScaleKind::Markers(markers) => {
                let index = position * (markers.len() - 1) as f64;
                let nearest = index.round();
                if (index - nearest).abs() < INDEX_EPSILON {
                    return markers[nearest as usize];
                }

                let lo = index.floor() as usize;
                let frac = index - lo as f64;
                interpolate(markers[lo], markers[lo + 1], frac)
                    .clamp(markers[lo], markers[lo + 1])
            }
        };
        value.clamp(lower, upper)
    }

    /// Map a value back to a position. The value is clamped to [`bounds`](Self::bounds).
    pub fn position_at(&self, value: f64) -> f64 {
        let (lower, upper) = self.bounds();
        if value.is_nan() || value <= lower {
            return 0.0;
        }
        if value >= upper {
            return 1.0;
        }

        match &self.kind {
            ScaleKind::Linear { min, max } => (value - min) / (max - min),
            ScaleKind::Log { .. } => inverse_log_lerp(lower, upper, value),
            ScaleKind::Markers(markers) => {
                let segments = (markers.len() - 1) as f64;
                // Half-open segments, so a value on a marker yields frac 0
                let Some(i) = markers.windows(2).position(|pair| value < pair[1]) else {
                    return 1.0;
                };

                let frac = inverse_interpolate(markers[i], markers[i + 1], value);
                (i as f64 + frac) / segments
            }
        }
    }

    /// Nearest marker index for a position. Continuous scales return `None`.
    pub fn snap_index(&self, position: f64) -> Option<usize> {
        let count = self.marker_count()?;
        let index = (clamp_unit(position) * (count - 1) as f64).round() as usize;
        Some(index.min(count - 1))
    }

    /// Position of a marker index, clamped to the last marker.
    pub fn index_position(&self, index: usize) -> Option<f64> {
        let count = self.marker_count()?;
        Some(index.min(count - 1) as f64 / (count - 1) as f64)
    }

    /// Round a position to the nearest marker. Continuous scales pass through.
    pub fn snap(&self, position: f64) -> f64 {
        self.snap_index(position)
            .and_then(|index| self.index_position(index))
            .unwrap_or_else(|| clamp_unit(position))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::default_markers()
    }
}

fn check_bounds(min: f64, max: f64) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::NonFiniteBound);
    }
    if min >= max {
        return Err(ConfigError::InvalidBounds { min, max });
    }
    Ok(())
}

fn clamp_unit(position: f64) -> f64 {
    if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, 1.0)
    }
}

fn log_floor(min: f64) -> f64 {
    if min <= 0.0 {
        LOG_FLOOR
    } else {
        min
    }
}

fn log_lerp(lo: f64, hi: f64, t: f64) -> f64 {
    let ln_lo = lo.ln();
    (ln_lo + t * (hi.ln() - ln_lo)).exp()
}

fn inverse_log_lerp(lo: f64, hi: f64, value: f64) -> f64 {
    let ln_lo = lo.ln();
    (value.ln() - ln_lo) / (hi.ln() - ln_lo)
}

/// Logarithmic between two markers, linear when the lower marker is not positive.
fn interpolate(lo: f64, hi: f64, t: f64) -> f64 {
    if lo <= 0.0 {
        lo + t * (hi - lo)
    } else {
        log_lerp(lo, hi, t)
    }
}

fn inverse_interpolate(lo: f64, hi: f64, value: f64) -> f64 {
    if lo <= 0.0 {
        (value - lo) / (hi - lo)
    } else {
        inverse_log_lerp(lo, hi, value)
    }
}

/// Serialized form: `{"kind": "linear", "min": 0, "max": 10}`,
/// `{"kind": "log", ...}` or `{"kind": "markers", "values": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ScaleRepr {
    Linear { min: f64, max: f64 },
    Log { min: f64, max: f64 },
    Markers { values: Vec<f64> },
}

impl TryFrom<ScaleRepr> for Scale {
    type Error = ConfigError;

    fn try_from(repr: ScaleRepr) -> Result<Self, Self::Error> {
        match repr {
            ScaleRepr::Linear { min, max } => Scale::linear(min, max),
            ScaleRepr::Log { min, max } => Scale::log(min, max),
            ScaleRepr::Markers { values } => Scale::markers(values),
        }
    }
}

impl From<Scale> for ScaleRepr {
    fn from(scale: Scale) -> Self {
        match scale.kind {
            ScaleKind::Linear { min, max } => ScaleRepr::Linear { min, max },
            ScaleKind::Log { min, max } => ScaleRepr::Log { min, max },
            ScaleKind::Markers(values) => ScaleRepr::Markers { values },
        }
    }
}
