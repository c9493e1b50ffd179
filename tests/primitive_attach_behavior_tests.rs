use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reactive_charts::engine::EngineEvent;
use reactive_charts::extensions::{PanePrimitive, SeriesPrimitive};
use reactive_charts::{
    DataPoint, NullChartEngine, PriceChart, PriceChartPane, PriceChartSeries, Scope, SeriesKind,
    Signal,
};

#[derive(Default)]
struct Counting {
    attached: Cell<u32>,
    detached: Cell<u32>,
}

impl SeriesPrimitive for Counting {
    type X = f64;

    fn attached(&self, _param: reactive_charts::extensions::SeriesAttachedParameter<f64>) {
        self.attached.set(self.attached.get() + 1);
    }

    fn detached(&self) {
        self.detached.set(self.detached.get() + 1);
    }
}

impl PanePrimitive for Counting {
    type X = f64;

    fn attached(&self, _param: reactive_charts::extensions::PaneAttachedParameter<f64>) {
        self.attached.set(self.attached.get() + 1);
    }

    fn detached(&self) {
        self.detached.set(self.detached.get() + 1);
    }
}

#[test]
fn series_primitive_lists_are_replaced_as_full_sets() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let a = Rc::new(Counting::default());
    let b = Rc::new(Counting::default());
    let first: Vec<Rc<dyn SeriesPrimitive<X = f64>>> = vec![Rc::clone(&a) as _];
    let both: Vec<Rc<dyn SeriesPrimitive<X = f64>>> =
        vec![Rc::clone(&a) as _, Rc::clone(&b) as _];

    let primitives = Signal::new(first);
    let attach_lens = Rc::new(RefCell::new(Vec::new()));
    let detach_lens = Rc::new(RefCell::new(Vec::new()));

    {
        let primitives = primitives.clone();
        let attach_lens = Rc::clone(&attach_lens);
        let detach_lens = Rc::clone(&detach_lens);
        PriceChart::new()
            .mount(&cx, &engine, move |cx| {
                PriceChartSeries::new(SeriesKind::Line)
                    .with_data(vec![DataPoint::new(0.0, 1.0)])
                    .with_primitives(&primitives)
                    .on_attach_primitives(move |list| attach_lens.borrow_mut().push(list.len()))
                    .on_detach_primitives(move |list| detach_lens.borrow_mut().push(list.len()))
                    .mount(cx)
            })
            .expect("mount");
    }

    let chart = engine.last_chart().expect("chart created");
    let series = chart.series_handles().remove(0);
    assert_eq!(series.attached_primitive_count(), 1);
    assert_eq!(*attach_lens.borrow(), vec![1]);
    assert!(detach_lens.borrow().is_empty());

    primitives.set(both);

    // Previous full set detached, new full set attached; `a` was never
    // attached twice at once.
    assert_eq!(series.attached_primitive_count(), 2);
    assert_eq!(*attach_lens.borrow(), vec![1, 2]);
    assert_eq!(*detach_lens.borrow(), vec![1]);
    assert_eq!(a.attached.get(), 2);
    assert_eq!(a.detached.get(), 1);
    assert_eq!(b.attached.get(), 1);
    assert_eq!(b.detached.get(), 0);

    cx.dispose();
    assert_eq!(a.detached.get(), 2);
    assert_eq!(b.detached.get(), 1);
    assert_eq!(*detach_lens.borrow(), vec![1, 2]);
}

#[test]
fn pane_primitive_attach_defers_until_the_pane_resource_exists() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let decoration = Rc::new(Counting::default());
    let primitives = Signal::new(vec![Rc::clone(&decoration) as Rc<dyn PanePrimitive<X = f64>>]);

    {
        let primitives = primitives.clone();
        PriceChart::new()
            .mount(&cx, &engine, move |cx| {
                PriceChartPane::new()
                    .with_primitives(&primitives)
                    .mount(cx, |cx| {
                        // The pane resource only comes into existence with
                        // this series, after the pane's first sync pass.
                        PriceChartSeries::new(SeriesKind::Histogram)
                            .with_data(vec![DataPoint::new(0.0, 1.0)])
                            .mount(cx)
                    })?;
                Ok(())
            })
            .expect("mount");
    }

    // First sync pass ran before the pane existed: deferred, no-op.
    assert_eq!(decoration.attached.get(), 0);

    // Re-declaring the list now reaches the live pane resource.
    primitives.set(vec![Rc::clone(&decoration) as _]);
    assert_eq!(decoration.attached.get(), 1);

    let chart = engine.last_chart().expect("chart created");
    let pane = chart
        .pane_record(reactive_charts::PaneIndex::new(1))
        .expect("pane created by the series");
    assert_eq!(pane.attached_primitive_count(), 1);

    cx.dispose();
    assert_eq!(decoration.detached.get(), 1);

    // Detach happened before the pane resource was removed.
    let journal = chart.journal();
    let detach_at = journal
        .iter()
        .position(|event| matches!(event, EngineEvent::PanePrimitiveDetached { .. }))
        .expect("detach recorded");
    let removed_at = journal
        .iter()
        .position(|event| matches!(event, EngineEvent::PaneRemoved { .. }))
        .expect("pane removal recorded");
    assert!(detach_at < removed_at);
}

#[test]
fn pane_primitives_attach_immediately_on_an_existing_pane() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let decoration = Rc::new(Counting::default());

    PriceChart::new()
        .mount(&cx, &engine, |cx| {
            // A series on the default pane means pane 0 exists up front.
            PriceChartSeries::new(SeriesKind::Line)
                .with_data(vec![DataPoint::new(0.0, 1.0)])
                .mount(cx)?;
            PriceChartPane::new()
                .with_index(0_u32)
                .with_primitives(vec![Rc::clone(&decoration) as Rc<dyn PanePrimitive<X = f64>>])
                .mount(cx, |_| Ok(()))?;
            Ok(())
        })
        .expect("mount");

    assert_eq!(decoration.attached.get(), 1);
    let chart = engine.last_chart().expect("chart created");
    let pane = chart
        .pane_record(reactive_charts::PaneIndex::DEFAULT)
        .expect("default pane always exists");
    assert_eq!(pane.attached_primitive_count(), 1);
}
