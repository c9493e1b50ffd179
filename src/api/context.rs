//! Context handles components publish for their descendants.
//!
//! A chart root provides a [`ChartContext`] once its chart resource exists;
//! panes provide the resolved pane index. Lookups follow the nearest
//! enclosing provider. Absence is a configuration error for the chart
//! handle (a series with no addressable chart is meaningless) but a silent
//! default for the pane index.

use std::rc::Rc;

use crate::core::variant::ChartVariant;
use crate::core::{PaneIndex, PaneIndexAllocator};
use crate::engine::ChartApi;
use crate::error::{ChartError, ChartResult};
use crate::reactive::Scope;

/// Per-chart-instance handle shared with every descendant component.
///
/// Keyed by variant, not by coordinate type: a `PriceChart` descendant can
/// never observe a `YieldCurveChart` context even though both use `f64`
/// coordinates.
pub struct ChartContext<V: ChartVariant> {
    chart: Rc<dyn ChartApi<X = V::X>>,
    pane_indexes: Rc<PaneIndexAllocator>,
}

impl<V: ChartVariant> Clone for ChartContext<V> {
    fn clone(&self) -> Self {
        Self {
            chart: Rc::clone(&self.chart),
            pane_indexes: Rc::clone(&self.pane_indexes),
        }
    }
}

impl<V: ChartVariant> std::fmt::Debug for ChartContext<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartContext")
            .field("variant", &V::NAME)
            .finish_non_exhaustive()
    }
}

impl<V: ChartVariant> ChartContext<V> {
    pub(crate) fn new(chart: Rc<dyn ChartApi<X = V::X>>) -> Self {
        Self {
            chart,
            pane_indexes: Rc::new(PaneIndexAllocator::new()),
        }
    }

    /// The live chart resource.
    #[must_use]
    pub fn chart(&self) -> &Rc<dyn ChartApi<X = V::X>> {
        &self.chart
    }

    /// Consumes and returns the next auto-assigned pane index.
    #[must_use]
    pub fn allocate_pane_index(&self) -> PaneIndex {
        self.pane_indexes.allocate()
    }
}

/// Looks up the enclosing chart of variant `V`.
///
/// Fails with a variant-named configuration error when no matching chart
/// root encloses `cx`.
pub fn use_chart<V: ChartVariant>(cx: &Scope) -> ChartResult<ChartContext<V>> {
    cx.use_context::<ChartContext<V>>()
        .ok_or(ChartError::MissingChartContext { chart: V::NAME })
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaneIndexContext(pub(crate) PaneIndex);

/// The pane index series in this scope attach to.
///
/// Outside any pane this is not an error; it yields the default pane `0`.
#[must_use]
pub fn use_pane_index(cx: &Scope) -> PaneIndex {
    cx.use_context::<PaneIndexContext>()
        .map(|context| context.0)
        .unwrap_or_default()
}

/// [`use_chart`] fixed to the time-scale variant.
pub fn use_time_chart(cx: &Scope) -> ChartResult<ChartContext<crate::core::TimeVariant>> {
    use_chart(cx)
}

/// [`use_chart`] fixed to the numeric-price variant.
pub fn use_price_chart(cx: &Scope) -> ChartResult<ChartContext<crate::core::PriceVariant>> {
    use_chart(cx)
}

/// [`use_chart`] fixed to the yield-curve variant.
pub fn use_yield_curve_chart(
    cx: &Scope,
) -> ChartResult<ChartContext<crate::core::YieldCurveVariant>> {
    use_chart(cx)
}
