//! Pass-through contracts for caller-supplied decoration objects.
//!
//! Primitives and custom-series pane views are defined by the external
//! engine; this crate never constructs or draws them. The component layer's
//! only responsibility is keeping the attached set equal to the declared
//! set, so the traits here carry exactly the hooks the engine contract
//! requires and nothing more.

use std::any::Any;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, PaneIndex, SeriesOptions};
use crate::engine::{PaneApi, SeriesApi};

/// Z-plane a primitive view draws on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveZOrder {
    Bottom,
    #[default]
    Normal,
    Top,
}

/// One renderable view contributed by a primitive or custom series.
///
/// The engine drives these during its own render passes; `target` is the
/// engine's concrete draw surface, passed opaquely so implementations can
/// downcast to whatever backend they were written for.
pub trait PrimitivePaneView {
    fn z_order(&self) -> PrimitiveZOrder {
        PrimitiveZOrder::Normal
    }

    fn draw(&self, target: &mut dyn Any);
}

/// Parameters handed to a series primitive when the engine attaches it.
pub struct SeriesAttachedParameter<X: Clone + 'static> {
    pub series: Rc<dyn SeriesApi<X = X>>,
    pub pane_index: PaneIndex,
    /// Asks the engine to re-render the views of this primitive.
    pub request_update: Rc<dyn Fn()>,
}

impl<X: Clone + 'static> Clone for SeriesAttachedParameter<X> {
    fn clone(&self) -> Self {
        Self {
            series: Rc::clone(&self.series),
            pane_index: self.pane_index,
            request_update: Rc::clone(&self.request_update),
        }
    }
}

/// Parameters handed to a pane primitive when the engine attaches it.
pub struct PaneAttachedParameter<X: Clone + 'static> {
    pub pane: Rc<dyn PaneApi<X = X>>,
    pub pane_index: PaneIndex,
    pub request_update: Rc<dyn Fn()>,
}

impl<X: Clone + 'static> Clone for PaneAttachedParameter<X> {
    fn clone(&self) -> Self {
        Self {
            pane: Rc::clone(&self.pane),
            pane_index: self.pane_index,
            request_update: Rc::clone(&self.request_update),
        }
    }
}

/// A decoration attachable to a series resource.
pub trait SeriesPrimitive {
    type X: Clone + 'static;

    /// Recomputes every view after the primitive's source data changed.
    fn update_all_views(&self) {}

    fn pane_views(&self) -> Vec<Rc<dyn PrimitivePaneView>> {
        Vec::new()
    }

    /// Called by the engine after attachment.
    fn attached(&self, param: SeriesAttachedParameter<Self::X>) {
        let _ = param;
    }

    /// Called by the engine after detachment.
    fn detached(&self) {}
}

/// A decoration attachable to a pane resource.
pub trait PanePrimitive {
    type X: Clone + 'static;

    fn update_all_views(&self) {}

    fn pane_views(&self) -> Vec<Rc<dyn PrimitivePaneView>> {
        Vec::new()
    }

    fn attached(&self, param: PaneAttachedParameter<Self::X>) {
        let _ = param;
    }

    fn detached(&self) {}
}

/// The custom-series contract: one view object drives rendering, pricing
/// and whitespace detection for a caller-defined series kind.
pub trait CustomSeriesPaneView {
    type X: Clone + 'static;

    /// Recalculates renderer state from the latest data and options.
    fn update(&self, data: &[DataPoint<Self::X>], options: &SeriesOptions);

    /// The view the engine renders for this series.
    fn renderer(&self) -> Rc<dyn PrimitivePaneView>;

    /// Prices the engine should use for autoscaling and the crosshair;
    /// the last entry is the "current" price of the point.
    fn price_values(&self, point: &DataPoint<Self::X>) -> Vec<f64>;

    fn is_whitespace(&self, point: &DataPoint<Self::X>) -> bool {
        point.is_whitespace()
    }

    fn default_options(&self) -> SeriesOptions {
        SeriesOptions::default()
    }

    /// Called by the engine when the series is removed.
    fn destroy(&self) {}
}
