use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::variant::ChartVariant;
use crate::core::{
    DataPoint, PaneIndex, PriceVariant, SeriesKind, SeriesOptions, TimeVariant, YieldCurveVariant,
};
use crate::engine::{ChartApi, SeriesApi};
use crate::error::ChartResult;
use crate::extensions::markers::{MarkerDerivation, SeriesMarker};
use crate::extensions::primitives::{CustomSeriesPaneView, SeriesPrimitive};
use crate::reactive::{Reactive, Scope, on_effect_cleanup};

use super::context::{use_chart, use_pane_index};
use super::primitive_sync::{attach_series_primitives, detach_series_primitives};

type X<V> = <V as ChartVariant>::X;
type SeriesHandle<V> = Rc<dyn SeriesApi<X = X<V>>>;
type SeriesData<V> = Vec<DataPoint<X<V>>>;
type SeriesPrimitives<V> = Vec<Rc<dyn SeriesPrimitive<X = X<V>>>>;
type LifecycleCallback<V> = Box<dyn Fn(&SeriesHandle<V>, PaneIndex)>;
type SetDataCallback<V> = Box<dyn Fn(&SeriesHandle<V>, &[DataPoint<X<V>>])>;
type SetMarkersCallback<V> = Box<dyn Fn(&[SeriesMarker<X<V>>])>;
type PrimitivesCallback<V> = Rc<dyn Fn(&[Rc<dyn SeriesPrimitive<X = X<V>>>])>;

/// Inputs shared by built-in and custom series components.
struct SeriesBindings<V: ChartVariant> {
    data: Reactive<SeriesData<V>>,
    options: Reactive<SeriesOptions>,
    primitives: Reactive<SeriesPrimitives<V>>,
    markers: Option<MarkerDerivation<X<V>>>,
    on_remove_series: Option<LifecycleCallback<V>>,
    on_set_data: Option<SetDataCallback<V>>,
    on_set_markers: Option<SetMarkersCallback<V>>,
    on_attach_primitives: Option<PrimitivesCallback<V>>,
    on_detach_primitives: Option<PrimitivesCallback<V>>,
}

impl<V: ChartVariant> Default for SeriesBindings<V> {
    fn default() -> Self {
        Self {
            data: Reactive::Const(Vec::new()),
            options: Reactive::default(),
            primitives: Reactive::Const(Vec::new()),
            markers: None,
            on_remove_series: None,
            on_set_data: None,
            on_set_markers: None,
            on_attach_primitives: None,
            on_detach_primitives: None,
        }
    }
}

/// Registers teardown and the reactive bindings for one created series.
///
/// Shared by every series component: data is replaced wholesale, options
/// are re-applied in full, and the primitive list is synchronized by full
/// detach-then-attach replacement. Teardown removes the series from the
/// chart; its primitive detach runs first because effect cleanup precedes
/// scope cleanup.
fn bind_series_lifecycle<V: ChartVariant>(
    cx: &Scope,
    chart: Rc<dyn ChartApi<X = X<V>>>,
    series: SeriesHandle<V>,
    pane_index: PaneIndex,
    bindings: SeriesBindings<V>,
) {
    {
        let chart = Rc::clone(&chart);
        let series = Rc::clone(&series);
        let on_remove = bindings.on_remove_series;
        cx.on_cleanup(move || {
            debug!(chart = V::NAME, pane = pane_index.raw(), "series removed");
            chart.remove_series(&series);
            if let Some(callback) = on_remove.as_ref() {
                callback(&series, pane_index);
            }
        });
    }

    {
        let chart = Rc::clone(&chart);
        let series = Rc::clone(&series);
        let data = bindings.data;
        let markers = bindings.markers;
        let on_set_data = bindings.on_set_data;
        let on_set_markers = bindings.on_set_markers;
        cx.create_effect(move || {
            let points = data.get();
            series.set_data(&points);
            trace!(chart = V::NAME, count = points.len(), "series data set");
            if let Some(callback) = on_set_data.as_ref() {
                callback(&series, &points);
            }
            if let Some(derive) = markers.as_ref() {
                let derived = derive(&points);
                chart.set_series_markers(&series, &derived);
                if let Some(callback) = on_set_markers.as_ref() {
                    callback(&derived);
                }
            }
        });
    }

    {
        let series = Rc::clone(&series);
        let options = bindings.options;
        cx.create_effect(move || {
            series.apply_options(&options.get());
        });
    }

    {
        let primitives = bindings.primitives;
        let on_attach = bindings.on_attach_primitives;
        let on_detach = bindings.on_detach_primitives;
        cx.create_effect(move || {
            let declared = primitives.get();
            attach_series_primitives(&declared, &series);
            trace!(
                chart = V::NAME,
                count = declared.len(),
                "series primitives synced"
            );
            if !declared.is_empty() {
                if let Some(callback) = on_attach.as_ref() {
                    callback(&declared);
                }
            }

            let series = Rc::clone(&series);
            let on_detach = on_detach.clone();
            on_effect_cleanup(move || {
                detach_series_primitives(&declared, &series);
                if !declared.is_empty() {
                    if let Some(callback) = on_detach.as_ref() {
                        callback(&declared);
                    }
                }
            });
        });
    }
}

/// Declares one data series of a built-in kind within the current pane.
///
/// The pane index is read from context exactly once at mount; a series
/// never re-parents. Mounting outside a matching chart root is a
/// configuration error naming the expected chart component.
pub struct Series<V: ChartVariant> {
    kind: SeriesKind,
    bindings: SeriesBindings<V>,
    on_create_series: Option<LifecycleCallback<V>>,
    _variant: PhantomData<V>,
}

/// Series of a [`TimeChart`](super::TimeChart).
pub type TimeChartSeries = Series<TimeVariant>;
/// Series of a [`PriceChart`](super::PriceChart).
pub type PriceChartSeries = Series<PriceVariant>;
/// Series of a [`YieldCurveChart`](super::YieldCurveChart).
pub type YieldCurveChartSeries = Series<YieldCurveVariant>;

impl<V: ChartVariant> Series<V> {
    #[must_use]
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            bindings: SeriesBindings::default(),
            on_create_series: None,
            _variant: PhantomData,
        }
    }

    /// Data sequence, replaced wholesale on every change. The sequence is
    /// handed to the engine untouched: ordering along the horizontal axis
    /// is the caller's responsibility.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Reactive<SeriesData<V>>>) -> Self {
        self.bindings.data = data.into();
        self
    }

    /// Kind-specific option set, re-applied in full whenever it changes.
    #[must_use]
    pub fn with_options(mut self, options: impl Into<Reactive<SeriesOptions>>) -> Self {
        self.bindings.options = options.into();
        self
    }

    /// Decorations kept attached to the series resource.
    #[must_use]
    pub fn with_primitives(
        mut self,
        primitives: impl Into<Reactive<SeriesPrimitives<V>>>,
    ) -> Self {
        self.bindings.primitives = primitives.into();
        self
    }

    /// Called once with the created series resource and its pane index.
    #[must_use]
    pub fn on_create_series(
        mut self,
        f: impl Fn(&SeriesHandle<V>, PaneIndex) + 'static,
    ) -> Self {
        self.on_create_series = Some(Box::new(f));
        self
    }

    /// Called after the series resource is removed on unmount.
    #[must_use]
    pub fn on_remove_series(
        mut self,
        f: impl Fn(&SeriesHandle<V>, PaneIndex) + 'static,
    ) -> Self {
        self.bindings.on_remove_series = Some(Box::new(f));
        self
    }

    /// Called after every data replacement with the sequence just set.
    #[must_use]
    pub fn on_set_data(
        mut self,
        f: impl Fn(&SeriesHandle<V>, &[DataPoint<X<V>>]) + 'static,
    ) -> Self {
        self.bindings.on_set_data = Some(Box::new(f));
        self
    }

    /// Called with each non-empty primitive list after it is attached.
    #[must_use]
    pub fn on_attach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn SeriesPrimitive<X = X<V>>>]) + 'static,
    ) -> Self {
        self.bindings.on_attach_primitives = Some(Rc::new(f));
        self
    }

    /// Called with each non-empty primitive list after it is detached.
    #[must_use]
    pub fn on_detach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn SeriesPrimitive<X = X<V>>>]) + 'static,
    ) -> Self {
        self.bindings.on_detach_primitives = Some(Rc::new(f));
        self
    }

    /// Mounts the series into `cx`, creating the underlying resource
    /// against the pane index currently in context.
    pub fn mount(self, cx: &Scope) -> ChartResult<()> {
        let context = use_chart::<V>(cx)?;
        let cx = cx.child();
        // Captured once; the series does not follow later index changes.
        let pane_index = use_pane_index(&cx);
        let chart = Rc::clone(context.chart());

        let series = chart.add_series(
            self.kind,
            &self.bindings.options.get_untracked(),
            pane_index,
        );
        debug!(
            chart = V::NAME,
            kind = %self.kind,
            pane = pane_index.raw(),
            "series created"
        );
        if let Some(callback) = self.on_create_series.as_ref() {
            callback(&series, pane_index);
        }

        bind_series_lifecycle(&cx, chart, series, pane_index, self.bindings);
        Ok(())
    }
}

impl Series<TimeVariant> {
    /// Derives a marker set from the data sequence.
    ///
    /// Time charts only: the derived set is re-applied after every data
    /// replacement.
    #[must_use]
    pub fn with_markers(
        mut self,
        derive: impl Fn(&[DataPoint<X<TimeVariant>>]) -> Vec<SeriesMarker<X<TimeVariant>>> + 'static,
    ) -> Self {
        self.bindings.markers = Some(Box::new(derive));
        self
    }

    /// Called after every marker application with the derived set.
    #[must_use]
    pub fn on_set_markers(
        mut self,
        f: impl Fn(&[SeriesMarker<X<TimeVariant>>]) + 'static,
    ) -> Self {
        self.bindings.on_set_markers = Some(Box::new(f));
        self
    }
}

/// Declares one data series driven by a caller-supplied pane view.
///
/// Identical lifecycle to [`Series`], except the engine is handed the
/// custom-series view instead of a built-in kind descriptor.
pub struct CustomSeries<V: ChartVariant> {
    pane_view: Rc<dyn CustomSeriesPaneView<X = X<V>>>,
    bindings: SeriesBindings<V>,
    on_create_series: Option<LifecycleCallback<V>>,
    _variant: PhantomData<V>,
}

/// Custom series of a [`TimeChart`](super::TimeChart).
pub type TimeChartCustomSeries = CustomSeries<TimeVariant>;
/// Custom series of a [`PriceChart`](super::PriceChart).
pub type PriceChartCustomSeries = CustomSeries<PriceVariant>;
/// Custom series of a [`YieldCurveChart`](super::YieldCurveChart).
pub type YieldCurveChartCustomSeries = CustomSeries<YieldCurveVariant>;

impl<V: ChartVariant> CustomSeries<V> {
    /// `pane_view` defines rendering, pricing and whitespace detection for
    /// the custom kind.
    #[must_use]
    pub fn new(pane_view: Rc<dyn CustomSeriesPaneView<X = X<V>>>) -> Self {
        Self {
            pane_view,
            bindings: SeriesBindings::default(),
            on_create_series: None,
            _variant: PhantomData,
        }
    }

    /// Data sequence, replaced wholesale on every change.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Reactive<SeriesData<V>>>) -> Self {
        self.bindings.data = data.into();
        self
    }

    /// Option set layered over the view's default options.
    #[must_use]
    pub fn with_options(mut self, options: impl Into<Reactive<SeriesOptions>>) -> Self {
        self.bindings.options = options.into();
        self
    }

    /// Decorations kept attached to the series resource.
    #[must_use]
    pub fn with_primitives(
        mut self,
        primitives: impl Into<Reactive<SeriesPrimitives<V>>>,
    ) -> Self {
        self.bindings.primitives = primitives.into();
        self
    }

    /// Called once with the created series resource and its pane index.
    #[must_use]
    pub fn on_create_series(
        mut self,
        f: impl Fn(&SeriesHandle<V>, PaneIndex) + 'static,
    ) -> Self {
        self.on_create_series = Some(Box::new(f));
        self
    }

    /// Called after the series resource is removed on unmount.
    #[must_use]
    pub fn on_remove_series(
        mut self,
        f: impl Fn(&SeriesHandle<V>, PaneIndex) + 'static,
    ) -> Self {
        self.bindings.on_remove_series = Some(Box::new(f));
        self
    }

    /// Called after every data replacement with the sequence just set.
    #[must_use]
    pub fn on_set_data(
        mut self,
        f: impl Fn(&SeriesHandle<V>, &[DataPoint<X<V>>]) + 'static,
    ) -> Self {
        self.bindings.on_set_data = Some(Box::new(f));
        self
    }

    /// Called with each non-empty primitive list after it is attached.
    #[must_use]
    pub fn on_attach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn SeriesPrimitive<X = X<V>>>]) + 'static,
    ) -> Self {
        self.bindings.on_attach_primitives = Some(Rc::new(f));
        self
    }

    /// Called with each non-empty primitive list after it is detached.
    #[must_use]
    pub fn on_detach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn SeriesPrimitive<X = X<V>>>]) + 'static,
    ) -> Self {
        self.bindings.on_detach_primitives = Some(Rc::new(f));
        self
    }

    /// Mounts the custom series into `cx`, creating the underlying
    /// resource against the pane index currently in context.
    pub fn mount(self, cx: &Scope) -> ChartResult<()> {
        let context = use_chart::<V>(cx)?;
        let cx = cx.child();
        // Captured once; the series does not follow later index changes.
        let pane_index = use_pane_index(&cx);
        let chart = Rc::clone(context.chart());

        let series = chart.add_custom_series(
            Rc::clone(&self.pane_view),
            &self.bindings.options.get_untracked(),
            pane_index,
        );
        debug!(chart = V::NAME, pane = pane_index.raw(), "custom series created");
        if let Some(callback) = self.on_create_series.as_ref() {
            callback(&series, pane_index);
        }

        bind_series_lifecycle(&cx, chart, series, pane_index, self.bindings);
        Ok(())
    }
}

impl CustomSeries<TimeVariant> {
    /// Derives a marker set from the data sequence (time charts only).
    #[must_use]
    pub fn with_markers(
        mut self,
        derive: impl Fn(&[DataPoint<X<TimeVariant>>]) -> Vec<SeriesMarker<X<TimeVariant>>> + 'static,
    ) -> Self {
        self.bindings.markers = Some(Box::new(derive));
        self
    }

    /// Called after every marker application with the derived set.
    #[must_use]
    pub fn on_set_markers(
        mut self,
        f: impl Fn(&[SeriesMarker<X<TimeVariant>>]) + 'static,
    ) -> Self {
        self.bindings.on_set_markers = Some(Box::new(f));
        self
    }
}
