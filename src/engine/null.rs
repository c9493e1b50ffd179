//! In-memory engine used by tests and headless consumers.
//!
//! Like a null renderer, it draws nothing — but it still validates the call
//! protocol so tests catch lifecycle misuse before a real engine is
//! involved: using a chart after `remove()`, removing a foreign series, or
//! attaching a primitive twice all panic, while the tolerated no-ops
//! (detaching an unattached primitive, removing a never-created pane) stay
//! silent. Every effective call is recorded in an event journal.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::core::variant::{ChartVariant, Coordinate};
use crate::core::{ChartOptions, ContainerElement, DataPoint, PaneIndex, SeriesKind, SeriesOptions};
use crate::extensions::markers::SeriesMarker;
use crate::extensions::primitives::{
    CustomSeriesPaneView, PaneAttachedParameter, PanePrimitive, SeriesAttachedParameter,
    SeriesPrimitive,
};

use super::{ChartApi, CreateChart, PaneApi, SeriesApi};

type Journal = Rc<RefCell<Vec<EngineEvent>>>;

/// Identity comparison by allocation address, ignoring vtable metadata.
fn same_object<T: ?Sized, U: ?Sized>(a: &Rc<T>, b: &Rc<U>) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

/// One engine-observable state change.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ChartCreated,
    ChartOptionsApplied,
    ChartResized {
        width: u32,
        height: u32,
        force_repaint: bool,
    },
    ChartRemoved,
    PaneCreated {
        index: PaneIndex,
    },
    PaneRemoved {
        index: PaneIndex,
    },
    PanePrimitiveAttached {
        index: PaneIndex,
    },
    PanePrimitiveDetached {
        index: PaneIndex,
    },
    SeriesAdded {
        id: u64,
        kind: Option<SeriesKind>,
        pane: PaneIndex,
    },
    SeriesRemoved {
        id: u64,
    },
    SeriesDataSet {
        id: u64,
        len: usize,
    },
    SeriesOptionsApplied {
        id: u64,
    },
    SeriesMarkersSet {
        id: u64,
        len: usize,
    },
    SeriesPrimitiveAttached {
        id: u64,
    },
    SeriesPrimitiveDetached {
        id: u64,
    },
}

/// Factory producing [`NullChart`]s; implements [`CreateChart`] for every
/// variant whose coordinate type matches `X`, and keeps handles to the
/// charts it created so tests can inspect them.
pub struct NullChartEngine<X: Coordinate> {
    charts: RefCell<Vec<Rc<NullChart<X>>>>,
}

impl<X: Coordinate> NullChartEngine<X> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charts: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn charts(&self) -> Vec<Rc<NullChart<X>>> {
        self.charts.borrow().clone()
    }

    #[must_use]
    pub fn last_chart(&self) -> Option<Rc<NullChart<X>>> {
        self.charts.borrow().last().cloned()
    }
}

impl<X: Coordinate> Default for NullChartEngine<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ChartVariant> CreateChart<V> for NullChartEngine<V::X> {
    fn create_chart(
        &self,
        container: &ContainerElement,
        options: &ChartOptions,
    ) -> Rc<dyn ChartApi<X = V::X>> {
        let chart = NullChart::new(container.clone(), options.clone());
        self.charts.borrow_mut().push(Rc::clone(&chart));
        chart
    }
}

/// Recording chart resource.
pub struct NullChart<X: Coordinate> {
    container: ContainerElement,
    options: RefCell<ChartOptions>,
    resize_calls: RefCell<Vec<(u32, u32, bool)>>,
    removed: Cell<bool>,
    panes: RefCell<IndexMap<u32, Rc<NullPane<X>>>>,
    series: RefCell<Vec<Rc<NullSeries<X>>>>,
    next_series_id: Cell<u64>,
    journal: Journal,
}

impl<X: Coordinate> NullChart<X> {
    pub(crate) fn new(container: ContainerElement, options: ChartOptions) -> Rc<Self> {
        let journal: Journal = Rc::new(RefCell::new(vec![EngineEvent::ChartCreated]));
        let chart = Rc::new(Self {
            container,
            options: RefCell::new(options),
            resize_calls: RefCell::new(Vec::new()),
            removed: Cell::new(false),
            panes: RefCell::new(IndexMap::new()),
            series: RefCell::new(Vec::new()),
            next_series_id: Cell::new(0),
            journal: Rc::clone(&journal),
        });
        // The default pane always exists; it is never created or removed
        // explicitly and gets no journal entry.
        chart.panes.borrow_mut().insert(
            PaneIndex::DEFAULT.raw(),
            NullPane::new(PaneIndex::DEFAULT, Rc::clone(&journal)),
        );
        chart
    }

    fn assert_live(&self) {
        assert!(!self.removed.get(), "chart used after remove()");
    }

    fn ensure_pane(&self, index: PaneIndex) -> Rc<NullPane<X>> {
        let mut panes = self.panes.borrow_mut();
        if let Some(pane) = panes.get(&index.raw()) {
            return Rc::clone(pane);
        }
        let pane = NullPane::new(index, Rc::clone(&self.journal));
        panes.insert(index.raw(), Rc::clone(&pane));
        self.journal
            .borrow_mut()
            .push(EngineEvent::PaneCreated { index });
        pane
    }

    fn record(&self, event: EngineEvent) {
        self.journal.borrow_mut().push(event);
    }

    fn find_series(&self, series: &Rc<dyn SeriesApi<X = X>>) -> Option<Rc<NullSeries<X>>> {
        self.series
            .borrow()
            .iter()
            .find(|candidate| same_object(candidate, series))
            .cloned()
    }

    #[must_use]
    pub fn container(&self) -> &ContainerElement {
        &self.container
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        self.options.borrow().clone()
    }

    #[must_use]
    pub fn resize_calls(&self) -> Vec<(u32, u32, bool)> {
        self.resize_calls.borrow().clone()
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    /// Every effective engine call so far, in order.
    #[must_use]
    pub fn journal(&self) -> Vec<EngineEvent> {
        self.journal.borrow().clone()
    }

    #[must_use]
    pub fn series_handles(&self) -> Vec<Rc<NullSeries<X>>> {
        self.series.borrow().clone()
    }

    /// Pane record at `index`, if one has come into existence.
    #[must_use]
    pub fn pane_record(&self, index: PaneIndex) -> Option<Rc<NullPane<X>>> {
        self.panes.borrow().get(&index.raw()).cloned()
    }
}

impl<X: Coordinate> ChartApi for NullChart<X> {
    type X = X;

    fn apply_options(&self, options: &ChartOptions) {
        self.assert_live();
        self.options.borrow_mut().merge(options);
        self.record(EngineEvent::ChartOptionsApplied);
    }

    fn resize(&self, width: u32, height: u32, force_repaint: bool) {
        self.assert_live();
        self.resize_calls
            .borrow_mut()
            .push((width, height, force_repaint));
        self.record(EngineEvent::ChartResized {
            width,
            height,
            force_repaint,
        });
    }

    fn remove(&self) {
        self.assert_live();
        self.removed.set(true);
        self.record(EngineEvent::ChartRemoved);
    }

    fn add_series(
        &self,
        kind: SeriesKind,
        options: &SeriesOptions,
        pane: PaneIndex,
    ) -> Rc<dyn SeriesApi<X = X>> {
        self.assert_live();
        let _ = self.ensure_pane(pane);
        let id = self.next_series_id.get();
        self.next_series_id.set(id + 1);
        let series = NullSeries::new(
            id,
            Some(kind),
            None,
            options.clone(),
            pane,
            Rc::clone(&self.journal),
        );
        self.series.borrow_mut().push(Rc::clone(&series));
        self.record(EngineEvent::SeriesAdded {
            id,
            kind: Some(kind),
            pane,
        });
        series
    }

    fn add_custom_series(
        &self,
        pane_view: Rc<dyn CustomSeriesPaneView<X = X>>,
        options: &SeriesOptions,
        pane: PaneIndex,
    ) -> Rc<dyn SeriesApi<X = X>> {
        self.assert_live();
        let _ = self.ensure_pane(pane);
        let id = self.next_series_id.get();
        self.next_series_id.set(id + 1);
        let mut merged = pane_view.default_options();
        merged.merge(options);
        let series = NullSeries::new(
            id,
            None,
            Some(pane_view),
            merged,
            pane,
            Rc::clone(&self.journal),
        );
        self.series.borrow_mut().push(Rc::clone(&series));
        self.record(EngineEvent::SeriesAdded {
            id,
            kind: None,
            pane,
        });
        series
    }

    fn remove_series(&self, series: &Rc<dyn SeriesApi<X = X>>) {
        self.assert_live();
        let Some(owned) = self.find_series(series) else {
            panic!("removed a series this chart does not own");
        };
        self.series
            .borrow_mut()
            .retain(|candidate| !same_object(candidate, series));
        owned.destroy();
        self.record(EngineEvent::SeriesRemoved { id: owned.id() });
    }

    fn remove_pane(&self, pane: PaneIndex) {
        self.assert_live();
        let Some(removed) = self.panes.borrow_mut().shift_remove(&pane.raw()) else {
            // Tolerated: panes only come into existence once a series
            // targets their index.
            return;
        };
        removed.detach_all();
        self.record(EngineEvent::PaneRemoved { index: pane });
    }

    fn pane(&self, pane: PaneIndex) -> Option<Rc<dyn PaneApi<X = X>>> {
        self.panes
            .borrow()
            .get(&pane.raw())
            .map(|pane| Rc::clone(pane) as Rc<dyn PaneApi<X = X>>)
    }

    fn set_series_markers(
        &self,
        series: &Rc<dyn SeriesApi<X = X>>,
        markers: &[SeriesMarker<X>],
    ) {
        self.assert_live();
        let Some(owned) = self.find_series(series) else {
            panic!("set markers on a series this chart does not own");
        };
        owned.markers.replace(markers.to_vec());
        self.record(EngineEvent::SeriesMarkersSet {
            id: owned.id(),
            len: markers.len(),
        });
    }
}

/// Recording series resource.
pub struct NullSeries<X: Coordinate> {
    id: u64,
    kind: Option<SeriesKind>,
    custom_view: Option<Rc<dyn CustomSeriesPaneView<X = X>>>,
    pane_index: PaneIndex,
    data: RefCell<Vec<DataPoint<X>>>,
    options: RefCell<SeriesOptions>,
    markers: RefCell<Vec<SeriesMarker<X>>>,
    primitives: RefCell<SmallVec<[Rc<dyn SeriesPrimitive<X = X>>; 2]>>,
    journal: Journal,
    self_weak: RefCell<Weak<NullSeries<X>>>,
}

impl<X: Coordinate> NullSeries<X> {
    fn new(
        id: u64,
        kind: Option<SeriesKind>,
        custom_view: Option<Rc<dyn CustomSeriesPaneView<X = X>>>,
        options: SeriesOptions,
        pane_index: PaneIndex,
        journal: Journal,
    ) -> Rc<Self> {
        let series = Rc::new(Self {
            id,
            kind,
            custom_view,
            pane_index,
            data: RefCell::new(Vec::new()),
            options: RefCell::new(options),
            markers: RefCell::new(Vec::new()),
            primitives: RefCell::new(SmallVec::new()),
            journal,
            self_weak: RefCell::new(Weak::new()),
        });
        *series.self_weak.borrow_mut() = Rc::downgrade(&series);
        series
    }

    fn as_api(&self) -> Rc<dyn SeriesApi<X = X>> {
        let strong = self
            .self_weak
            .borrow()
            .upgrade()
            .expect("series handle alive while in use");
        strong
    }

    fn destroy(&self) {
        let leftovers = std::mem::take(&mut *self.primitives.borrow_mut());
        for primitive in leftovers {
            self.journal
                .borrow_mut()
                .push(EngineEvent::SeriesPrimitiveDetached { id: self.id });
            primitive.detached();
        }
        if let Some(view) = &self.custom_view {
            view.destroy();
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Built-in kind, or `None` for a custom series.
    #[must_use]
    pub fn kind(&self) -> Option<SeriesKind> {
        self.kind
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.custom_view.is_some()
    }

    #[must_use]
    pub fn pane_index(&self) -> PaneIndex {
        self.pane_index
    }

    #[must_use]
    pub fn data(&self) -> Vec<DataPoint<X>> {
        self.data.borrow().clone()
    }

    #[must_use]
    pub fn options(&self) -> SeriesOptions {
        self.options.borrow().clone()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<SeriesMarker<X>> {
        self.markers.borrow().clone()
    }

    #[must_use]
    pub fn attached_primitive_count(&self) -> usize {
        self.primitives.borrow().len()
    }
}

impl<X: Coordinate> SeriesApi for NullSeries<X> {
    type X = X;

    fn set_data(&self, data: &[DataPoint<X>]) {
        self.data.replace(data.to_vec());
        if let Some(view) = &self.custom_view {
            view.update(data, &self.options.borrow());
        }
        self.journal.borrow_mut().push(EngineEvent::SeriesDataSet {
            id: self.id,
            len: data.len(),
        });
    }

    fn apply_options(&self, options: &SeriesOptions) {
        self.options.borrow_mut().merge(options);
        self.journal
            .borrow_mut()
            .push(EngineEvent::SeriesOptionsApplied { id: self.id });
    }

    fn attach_primitive(&self, primitive: Rc<dyn SeriesPrimitive<X = X>>) {
        {
            let mut primitives = self.primitives.borrow_mut();
            assert!(
                !primitives.iter().any(|p| same_object(p, &primitive)),
                "primitive attached twice to series {}",
                self.id
            );
            primitives.push(Rc::clone(&primitive));
        }
        self.journal
            .borrow_mut()
            .push(EngineEvent::SeriesPrimitiveAttached { id: self.id });
        primitive.attached(SeriesAttachedParameter {
            series: self.as_api(),
            pane_index: self.pane_index,
            request_update: Rc::new(|| {}),
        });
    }

    fn detach_primitive(&self, primitive: &Rc<dyn SeriesPrimitive<X = X>>) {
        let found = {
            let mut primitives = self.primitives.borrow_mut();
            let position = primitives.iter().position(|p| same_object(p, primitive));
            match position {
                Some(position) => {
                    primitives.remove(position);
                    true
                }
                None => false,
            }
        };
        if found {
            self.journal
                .borrow_mut()
                .push(EngineEvent::SeriesPrimitiveDetached { id: self.id });
            primitive.detached();
        }
    }
}

/// Recording pane resource.
pub struct NullPane<X: Coordinate> {
    index: PaneIndex,
    primitives: RefCell<SmallVec<[Rc<dyn PanePrimitive<X = X>>; 2]>>,
    journal: Journal,
    self_weak: RefCell<Weak<NullPane<X>>>,
}

impl<X: Coordinate> NullPane<X> {
    fn new(index: PaneIndex, journal: Journal) -> Rc<Self> {
        let pane = Rc::new(Self {
            index,
            primitives: RefCell::new(SmallVec::new()),
            journal,
            self_weak: RefCell::new(Weak::new()),
        });
        *pane.self_weak.borrow_mut() = Rc::downgrade(&pane);
        pane
    }

    fn as_api(&self) -> Rc<dyn PaneApi<X = X>> {
        let strong = self
            .self_weak
            .borrow()
            .upgrade()
            .expect("pane handle alive while in use");
        strong
    }

    fn detach_all(&self) {
        let leftovers = std::mem::take(&mut *self.primitives.borrow_mut());
        for primitive in leftovers {
            self.journal
                .borrow_mut()
                .push(EngineEvent::PanePrimitiveDetached { index: self.index });
            primitive.detached();
        }
    }

    #[must_use]
    pub fn index(&self) -> PaneIndex {
        self.index
    }

    #[must_use]
    pub fn attached_primitive_count(&self) -> usize {
        self.primitives.borrow().len()
    }
}

impl<X: Coordinate> PaneApi for NullPane<X> {
    type X = X;

    fn attach_primitive(&self, primitive: Rc<dyn PanePrimitive<X = X>>) {
        {
            let mut primitives = self.primitives.borrow_mut();
            assert!(
                !primitives.iter().any(|p| same_object(p, &primitive)),
                "primitive attached twice to pane {}",
                self.index
            );
            primitives.push(Rc::clone(&primitive));
        }
        self.journal
            .borrow_mut()
            .push(EngineEvent::PanePrimitiveAttached { index: self.index });
        primitive.attached(PaneAttachedParameter {
            pane: self.as_api(),
            pane_index: self.index,
            request_update: Rc::new(|| {}),
        });
    }

    fn detach_primitive(&self, primitive: &Rc<dyn PanePrimitive<X = X>>) {
        let found = {
            let mut primitives = self.primitives.borrow_mut();
            let position = primitives.iter().position(|p| same_object(p, primitive));
            match position {
                Some(position) => {
                    primitives.remove(position);
                    true
                }
                None => false,
            }
        };
        if found {
            self.journal
                .borrow_mut()
                .push(EngineEvent::PanePrimitiveDetached { index: self.index });
            primitive.detached();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::core::{
        ChartOptions, ContainerElement, ContainerOptions, PaneIndex, SeriesKind, SeriesOptions,
    };
    use crate::extensions::primitives::SeriesPrimitive;

    use super::super::{ChartApi, SeriesApi};
    use super::{EngineEvent, NullChart};

    struct Dot;

    impl SeriesPrimitive for Dot {
        type X = f64;
    }

    fn chart() -> Rc<NullChart<f64>> {
        NullChart::new(
            ContainerElement::new(ContainerOptions::default()),
            ChartOptions::default(),
        )
    }

    #[test]
    fn default_pane_exists_without_a_journal_entry() {
        let chart = chart();
        assert!(chart.pane(PaneIndex::DEFAULT).is_some());
        assert_eq!(chart.journal(), vec![EngineEvent::ChartCreated]);
    }

    #[test]
    fn pane_comes_into_existence_with_the_first_series_targeting_it() {
        let chart = chart();
        let index = PaneIndex::new(1);
        assert!(chart.pane(index).is_none());

        let _series = chart.add_series(SeriesKind::Line, &SeriesOptions::default(), index);
        assert!(chart.pane(index).is_some());
        assert!(chart.journal().contains(&EngineEvent::PaneCreated { index }));
    }

    #[test]
    fn removing_a_never_created_pane_is_a_no_op() {
        let chart = chart();
        chart.remove_pane(PaneIndex::new(7));
        assert_eq!(chart.journal(), vec![EngineEvent::ChartCreated]);
    }

    #[test]
    fn detaching_an_unattached_primitive_is_a_no_op() {
        let chart = chart();
        let series = chart.add_series(
            SeriesKind::Line,
            &SeriesOptions::default(),
            PaneIndex::DEFAULT,
        );
        let primitive: Rc<dyn SeriesPrimitive<X = f64>> = Rc::new(Dot);
        series.detach_primitive(&primitive);
        assert!(
            !chart
                .journal()
                .iter()
                .any(|event| matches!(event, EngineEvent::SeriesPrimitiveDetached { .. }))
        );
    }

    #[test]
    #[should_panic(expected = "attached twice")]
    fn duplicate_attach_is_rejected() {
        let chart = chart();
        let series = chart.add_series(
            SeriesKind::Line,
            &SeriesOptions::default(),
            PaneIndex::DEFAULT,
        );
        let primitive: Rc<dyn SeriesPrimitive<X = f64>> = Rc::new(Dot);
        series.attach_primitive(Rc::clone(&primitive));
        series.attach_primitive(primitive);
    }

    #[test]
    #[should_panic(expected = "after remove()")]
    fn chart_use_after_remove_is_rejected() {
        let chart = chart();
        chart.remove();
        chart.remove_pane(PaneIndex::new(1));
    }

    #[test]
    fn apply_options_merges_partials() {
        let chart = chart();
        let mut partial = ChartOptions::default();
        partial.time_scale.visible = Some(false);
        chart.apply_options(&partial);

        let mut other = ChartOptions::default();
        other.layout.text_color = Some("#333333".to_owned());
        chart.apply_options(&other);

        let merged = chart.options();
        assert_eq!(merged.time_scale.visible, Some(false));
        assert_eq!(merged.layout.text_color.as_deref(), Some("#333333"));
    }
}
