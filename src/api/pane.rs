use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::variant::ChartVariant;
use crate::core::{PaneIndex, PriceVariant, TimeVariant, YieldCurveVariant};
use crate::error::ChartResult;
use crate::reactive::{Reactive, Scope, on_effect_cleanup};

use super::context::{PaneIndexContext, use_chart};
use super::primitive_sync::{attach_pane_primitives, detach_pane_primitives};

type PanePrimitives<V> = Vec<Rc<dyn crate::extensions::PanePrimitive<X = <V as ChartVariant>::X>>>;
type PrimitivesCallback<V> = Rc<dyn Fn(&[Rc<dyn crate::extensions::PanePrimitive<X = <V as ChartVariant>::X>>])>;

/// Declares one vertical sub-region of the enclosing chart.
///
/// The index is resolved exactly once per mount — an explicit index wins,
/// otherwise the chart's counter assigns the next free one — and is
/// published to children so their series attach to the right pane. The
/// underlying pane resource is not created here; it comes into existence
/// with the first series targeting the index, and is removed on unmount.
///
/// Pane index `0` is the default pane and needs no `Pane` component.
pub struct Pane<V: ChartVariant> {
    index: Option<PaneIndex>,
    primitives: Reactive<PanePrimitives<V>>,
    on_attach_primitives: Option<PrimitivesCallback<V>>,
    on_detach_primitives: Option<PrimitivesCallback<V>>,
    _variant: PhantomData<V>,
}

/// Pane of a [`TimeChart`](super::TimeChart).
pub type TimeChartPane = Pane<TimeVariant>;
/// Pane of a [`PriceChart`](super::PriceChart).
pub type PriceChartPane = Pane<PriceVariant>;
/// Pane of a [`YieldCurveChart`](super::YieldCurveChart).
pub type YieldCurveChartPane = Pane<YieldCurveVariant>;

impl<V: ChartVariant> Default for Pane<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ChartVariant> Pane<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: None,
            primitives: Reactive::Const(Vec::new()),
            on_attach_primitives: None,
            on_detach_primitives: None,
            _variant: PhantomData,
        }
    }

    /// Pins the pane to an explicit index instead of auto-allocating one.
    ///
    /// Explicit indices are taken as-is: they are not checked against the
    /// reserved default pane `0`, other panes, or the auto-assignment
    /// counter, and they never perturb that counter.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<PaneIndex>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Decorations kept attached to the pane resource.
    #[must_use]
    pub fn with_primitives(mut self, primitives: impl Into<Reactive<PanePrimitives<V>>>) -> Self {
        self.primitives = primitives.into();
        self
    }

    /// Called with each non-empty primitive list after it is attached.
    #[must_use]
    pub fn on_attach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn crate::extensions::PanePrimitive<X = V::X>>]) + 'static,
    ) -> Self {
        self.on_attach_primitives = Some(Rc::new(f));
        self
    }

    /// Called with each non-empty primitive list after it is detached.
    #[must_use]
    pub fn on_detach_primitives(
        mut self,
        f: impl Fn(&[Rc<dyn crate::extensions::PanePrimitive<X = V::X>>]) + 'static,
    ) -> Self {
        self.on_detach_primitives = Some(Rc::new(f));
        self
    }

    /// Mounts the pane into `cx` and runs `children` with the resolved
    /// index in context. Returns the resolved index.
    pub fn mount<F>(self, cx: &Scope, children: F) -> ChartResult<PaneIndex>
    where
        F: FnOnce(&Scope) -> ChartResult<()>,
    {
        let context = use_chart::<V>(cx)?;
        let cx = cx.child();

        // Resolved once per mount; re-renders never re-allocate.
        let index = self
            .index
            .unwrap_or_else(|| context.allocate_pane_index());
        debug!(chart = V::NAME, index = index.raw(), "pane index resolved");
        cx.provide_context(PaneIndexContext(index));

        {
            let chart = Rc::clone(context.chart());
            cx.on_cleanup(move || {
                debug!(chart = V::NAME, index = index.raw(), "pane removed");
                chart.remove_pane(index);
            });
        }

        // Primitive sync. Each run detaches the previous set before the new
        // one is attached; the pane resource may not exist yet, in which
        // case both halves are deferred no-ops.
        {
            let chart = Rc::clone(context.chart());
            let primitives = self.primitives;
            let on_attach = self.on_attach_primitives;
            let on_detach = self.on_detach_primitives;
            cx.create_effect(move || {
                let declared = primitives.get();
                attach_pane_primitives(&declared, chart.pane(index).as_ref());
                trace!(
                    chart = V::NAME,
                    index = index.raw(),
                    count = declared.len(),
                    "pane primitives synced"
                );
                if !declared.is_empty() {
                    if let Some(callback) = on_attach.as_ref() {
                        callback(&declared);
                    }
                }

                let chart = Rc::clone(&chart);
                let on_detach = on_detach.clone();
                on_effect_cleanup(move || {
                    detach_pane_primitives(&declared, chart.pane(index).as_ref());
                    if !declared.is_empty() {
                        if let Some(callback) = on_detach.as_ref() {
                            callback(&declared);
                        }
                    }
                });
            });
        }

        children(&cx)?;
        Ok(index)
    }
}
