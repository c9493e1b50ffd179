//! Series markers derived from data.
//!
//! Time-scale charts accept an optional derivation function that maps the
//! current data sequence to a marker set; the series component re-derives
//! and re-applies the set whenever the data changes. The numeric chart
//! variants do not consult marker derivations.

use serde::{Deserialize, Serialize};

use crate::core::DataPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
    InBar,
    AtPrice(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMarker<X> {
    pub id: String,
    pub x: X,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub color: Option<String>,
    pub text: Option<String>,
    pub priority: i32,
}

impl<X> SeriesMarker<X> {
    #[must_use]
    pub fn new(id: impl Into<String>, x: X, position: MarkerPosition) -> Self {
        Self {
            id: id.into(),
            x,
            position,
            shape: MarkerShape::default(),
            color: None,
            text: None,
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Maps the series' current data sequence to the marker set to apply.
pub type MarkerDerivation<X> = Box<dyn Fn(&[DataPoint<X>]) -> Vec<SeriesMarker<X>>>;

#[cfg(test)]
mod tests {
    use super::{MarkerPosition, MarkerShape, SeriesMarker};

    #[test]
    fn builders_fill_optional_fields() {
        let marker = SeriesMarker::new("m1", 3.0, MarkerPosition::AboveBar)
            .with_shape(MarkerShape::ArrowDown)
            .with_text("sell")
            .with_priority(5);
        assert_eq!(marker.id, "m1");
        assert_eq!(marker.shape, MarkerShape::ArrowDown);
        assert_eq!(marker.text.as_deref(), Some("sell"));
        assert_eq!(marker.priority, 5);
        assert!(marker.color.is_none());
    }
}
