use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Horizontal coordinate of the time-scale chart variant.
///
/// The numeric variants (price and yield-curve charts) use plain `f64`.
pub type TimeCoordinate = DateTime<Utc>;

/// Built-in series kinds the engine knows how to draw.
///
/// Custom kinds do not appear here; they go through the custom-series
/// pane-view contract instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Area,
    Bar,
    Baseline,
    Candlestick,
    Histogram,
    Line,
}

impl SeriesKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::Bar => "Bar",
            Self::Baseline => "Baseline",
            Self::Candlestick => "Candlestick",
            Self::Histogram => "Histogram",
            Self::Line => "Line",
        }
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of one sample.
///
/// `Whitespace` reserves the slot on the horizontal axis without plotting
/// anything, matching the engine's whitespace-data convention. `Custom`
/// carries the per-point values a custom pane view interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataValue {
    Whitespace,
    Single(f64),
    Ohlc {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
    Custom(Vec<f64>),
}

/// One sample of a series data sequence.
///
/// Sequences are replaced wholesale on every update and are never validated
/// or sorted here; ascending-x ordering is the engine's externally-imposed
/// precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint<X> {
    pub x: X,
    pub value: DataValue,
}

impl<X> DataPoint<X> {
    #[must_use]
    pub fn new(x: X, value: f64) -> Self {
        Self {
            x,
            value: DataValue::Single(value),
        }
    }

    #[must_use]
    pub fn ohlc(x: X, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            x,
            value: DataValue::Ohlc {
                open,
                high,
                low,
                close,
            },
        }
    }

    #[must_use]
    pub fn whitespace(x: X) -> Self {
        Self {
            x,
            value: DataValue::Whitespace,
        }
    }

    #[must_use]
    pub fn custom(x: X, values: Vec<f64>) -> Self {
        Self {
            x,
            value: DataValue::Custom(values),
        }
    }

    /// Builds a sample from an exact decimal price.
    pub fn from_decimal(x: X, value: Decimal) -> ChartResult<Self> {
        Ok(Self {
            x,
            value: DataValue::Single(decimal_to_f64(value, "value")?),
        })
    }

    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self.value, DataValue::Whitespace)
    }
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}
