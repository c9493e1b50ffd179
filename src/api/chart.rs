use std::marker::PhantomData;
use std::rc::Rc;

use tracing::debug;

use crate::core::variant::ChartVariant;
use crate::core::{
    ChartOptions, ContainerElement, ContainerOptions, PriceVariant, TimeVariant, YieldCurveVariant,
};
use crate::engine::{ChartApi, CreateChart};
use crate::error::ChartResult;
use crate::reactive::{Reactive, Scope};

use super::context::ChartContext;

/// Root component owning one chart resource for its mounted lifetime.
///
/// Mounting creates the chart against a container element this component
/// owns, fires `on_create_chart` synchronously, keeps the engine's option
/// set and (when auto-sizing is off) its explicit size synchronized with
/// the declared inputs, and exposes the chart to the child tree through the
/// variant's context. Disposing the scope removes the chart after all
/// descendant teardown.
///
/// # Example
///
/// ```
/// use reactive_charts::{NullChartEngine, PriceChart, PriceChartSeries, Scope, SeriesKind};
/// use reactive_charts::DataPoint;
///
/// let cx = Scope::root();
/// let engine = NullChartEngine::<f64>::new();
/// PriceChart::new()
///     .mount(&cx, &engine, |cx| {
///         PriceChartSeries::new(SeriesKind::Line)
///             .with_data(vec![DataPoint::new(0.0, 100.0)])
///             .mount(cx)
///     })
///     .expect("mount");
/// cx.dispose();
/// ```
pub struct Chart<V: ChartVariant> {
    options: Reactive<ChartOptions>,
    auto_size: Reactive<bool>,
    width: Reactive<u32>,
    height: Reactive<u32>,
    force_repaint_on_resize: Reactive<bool>,
    container: ContainerOptions,
    on_create_chart: Option<Box<dyn Fn(&Rc<dyn ChartApi<X = V::X>>)>>,
    on_resize: Option<Box<dyn Fn(u32, u32)>>,
    _variant: PhantomData<V>,
}

/// Time-scale chart root.
pub type TimeChart = Chart<TimeVariant>;
/// Numeric-price chart root.
pub type PriceChart = Chart<PriceVariant>;
/// Yield-curve chart root.
pub type YieldCurveChart = Chart<YieldCurveVariant>;

impl<V: ChartVariant> Default for Chart<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ChartVariant> Chart<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Reactive::default(),
            auto_size: Reactive::Const(true),
            width: Reactive::Const(0),
            height: Reactive::Const(0),
            force_repaint_on_resize: Reactive::Const(false),
            container: ContainerOptions::default(),
            on_create_chart: None,
            on_resize: None,
            _variant: PhantomData,
        }
    }

    /// Chart option set, re-applied in full whenever it changes.
    #[must_use]
    pub fn with_options(mut self, options: impl Into<Reactive<ChartOptions>>) -> Self {
        self.options = options.into();
        self
    }

    /// Sizing mode. While `true` (the default) the engine sizes the chart
    /// from its container and the explicit size inputs are ignored.
    #[must_use]
    pub fn with_auto_size(mut self, auto_size: impl Into<Reactive<bool>>) -> Self {
        self.auto_size = auto_size.into();
        self
    }

    /// Explicit width, used only when auto-sizing is off.
    #[must_use]
    pub fn with_width(mut self, width: impl Into<Reactive<u32>>) -> Self {
        self.width = width.into();
        self
    }

    /// Explicit height, used only when auto-sizing is off.
    #[must_use]
    pub fn with_height(mut self, height: impl Into<Reactive<u32>>) -> Self {
        self.height = height.into();
        self
    }

    #[must_use]
    pub fn with_force_repaint_on_resize(mut self, force: impl Into<Reactive<bool>>) -> Self {
        self.force_repaint_on_resize = force.into();
        self
    }

    /// Presentation attributes of the owned container element.
    #[must_use]
    pub fn with_container(mut self, container: ContainerOptions) -> Self {
        self.container = container;
        self
    }

    /// Called once, synchronously after the chart resource is created.
    #[must_use]
    pub fn on_create_chart(mut self, f: impl Fn(&Rc<dyn ChartApi<X = V::X>>) + 'static) -> Self {
        self.on_create_chart = Some(Box::new(f));
        self
    }

    /// Called after every explicit resize. Never called while auto-sizing.
    #[must_use]
    pub fn on_resize(mut self, f: impl Fn(u32, u32) + 'static) -> Self {
        self.on_resize = Some(Box::new(f));
        self
    }

    /// Mounts the chart into `cx` and runs `children` beneath it.
    ///
    /// Returns the container element the chart is bound to. Errors from
    /// `children` (a mis-nested series, for example) propagate out; already
    /// created resources are released when the scope is disposed.
    pub fn mount<E, F>(
        self,
        cx: &Scope,
        engine: &E,
        children: F,
    ) -> ChartResult<Rc<ContainerElement>>
    where
        E: CreateChart<V> + ?Sized,
        F: FnOnce(&Scope) -> ChartResult<()>,
    {
        let Self {
            options,
            auto_size,
            width,
            height,
            force_repaint_on_resize,
            container,
            on_create_chart,
            on_resize,
            _variant,
        } = self;

        let cx = cx.child();
        let container = Rc::new(ContainerElement::new(container));

        let mut initial = options.get_untracked();
        initial.auto_size = auto_size.get_untracked();
        let chart = engine.create_chart(&container, &initial);
        debug!(chart = V::NAME, "chart created");

        if let Some(callback) = on_create_chart.as_ref() {
            callback(&chart);
        }

        // Teardown is registered before any reactive binding, and the scope
        // runs it after all descendant cleanup.
        {
            let chart = Rc::clone(&chart);
            cx.on_cleanup(move || {
                debug!(chart = V::NAME, "chart removed");
                chart.remove();
            });
        }

        // Manual sizing. `auto_size` gates the reads: while it is on, the
        // size inputs are never even subscribed, so changing them cannot
        // re-run this effect.
        {
            let chart = Rc::clone(&chart);
            let auto_size = auto_size.clone();
            let width = width.clone();
            let height = height.clone();
            cx.create_effect(move || {
                if auto_size.get() {
                    return;
                }
                let (width, height) = (width.get(), height.get());
                chart.resize(width, height, force_repaint_on_resize.get());
                if let Some(callback) = on_resize.as_ref() {
                    callback(width, height);
                }
            });
        }

        // Full option re-apply; the sizing mode is mirrored into every set
        // pushed to the engine.
        {
            let chart = Rc::clone(&chart);
            cx.create_effect(move || {
                let mut merged = options.get();
                merged.auto_size = auto_size.get();
                chart.apply_options(&merged);
            });
        }

        // Children only ever observe a fully created chart.
        cx.provide_context(ChartContext::<V>::new(Rc::clone(&chart)));
        children(&cx)?;

        Ok(container)
    }
}
