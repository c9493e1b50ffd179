//! Capability contract required from the external charting engine.
//!
//! Everything a component does to the engine goes through the traits in
//! this module; nothing else is assumed about the engine's internals. The
//! contract is structurally identical for all three chart variants — only
//! the creation entry point is variant-keyed, because an engine may build
//! different chart types for the same coordinate representation (price and
//! yield-curve charts both use `f64`).
//!
//! Engine failures are not caught or translated anywhere in this crate:
//! implementations surface their own failure semantics (typically a panic),
//! and the components perform no retries and no recovery.

mod null;

use std::rc::Rc;

use crate::core::variant::{ChartVariant, Coordinate};
use crate::core::{ChartOptions, ContainerElement, DataPoint, PaneIndex, SeriesKind, SeriesOptions};
use crate::extensions::markers::SeriesMarker;
use crate::extensions::primitives::{CustomSeriesPaneView, PanePrimitive, SeriesPrimitive};

pub use null::{EngineEvent, NullChart, NullChartEngine, NullPane, NullSeries};

/// Handle to one chart resource.
pub trait ChartApi {
    type X: Coordinate;

    /// Applies a partial option set on top of the current one.
    fn apply_options(&self, options: &ChartOptions);

    /// Explicitly resizes the chart. Only called when auto-sizing is off.
    fn resize(&self, width: u32, height: u32, force_repaint: bool);

    /// Destroys the chart resource. Must be the last call on this handle.
    fn remove(&self);

    /// Creates a series of a built-in kind on the pane at `pane`, creating
    /// the pane resource implicitly if this is the first series targeting
    /// that index.
    fn add_series(
        &self,
        kind: SeriesKind,
        options: &SeriesOptions,
        pane: PaneIndex,
    ) -> Rc<dyn SeriesApi<X = Self::X>>;

    /// Creates a series driven by a caller-supplied pane view.
    fn add_custom_series(
        &self,
        pane_view: Rc<dyn CustomSeriesPaneView<X = Self::X>>,
        options: &SeriesOptions,
        pane: PaneIndex,
    ) -> Rc<dyn SeriesApi<X = Self::X>>;

    fn remove_series(&self, series: &Rc<dyn SeriesApi<X = Self::X>>);

    /// Removes the pane resource at `pane`. Removing an index no pane
    /// resource was ever created for is an engine-defined no-op.
    fn remove_pane(&self, pane: PaneIndex);

    /// Looks up the pane resource at `pane`, if it exists yet.
    fn pane(&self, pane: PaneIndex) -> Option<Rc<dyn PaneApi<X = Self::X>>>;

    /// Marker extension hook used by time-scale charts; engines without
    /// marker support can leave the default no-op.
    fn set_series_markers(
        &self,
        series: &Rc<dyn SeriesApi<X = Self::X>>,
        markers: &[SeriesMarker<Self::X>],
    ) {
        let _ = (series, markers);
    }
}

/// Handle to one series resource.
pub trait SeriesApi {
    type X: Coordinate;

    /// Replaces the full data sequence. Never merged, never validated.
    fn set_data(&self, data: &[DataPoint<Self::X>]);

    /// Applies a partial option set on top of the current one.
    fn apply_options(&self, options: &SeriesOptions);

    /// Attaches a decoration. Not guaranteed idempotent: attaching a handle
    /// that is already attached is an engine-defined failure.
    fn attach_primitive(&self, primitive: Rc<dyn SeriesPrimitive<X = Self::X>>);

    /// Detaches a decoration. Detaching a handle that is not attached is a
    /// no-op.
    fn detach_primitive(&self, primitive: &Rc<dyn SeriesPrimitive<X = Self::X>>);
}

/// Handle to one pane resource.
pub trait PaneApi {
    type X: Coordinate;

    fn attach_primitive(&self, primitive: Rc<dyn PanePrimitive<X = Self::X>>);

    fn detach_primitive(&self, primitive: &Rc<dyn PanePrimitive<X = Self::X>>);
}

/// Variant-keyed creation entry point, the analog of the engine's
/// `createChart`/`createOptionsChart`/`createYieldCurveChart` functions.
pub trait CreateChart<V: ChartVariant> {
    fn create_chart(
        &self,
        container: &ContainerElement,
        options: &ChartOptions,
    ) -> Rc<dyn ChartApi<X = V::X>>;
}
