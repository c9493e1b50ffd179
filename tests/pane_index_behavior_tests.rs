use std::cell::RefCell;
use std::rc::Rc;

use reactive_charts::{
    DataPoint, NullChartEngine, PriceChart, PriceChartPane, PriceChartSeries, Scope, SeriesKind,
};

#[test]
fn sibling_panes_resolve_increasing_indices_in_mount_order() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let resolved = Rc::new(RefCell::new(Vec::new()));

    PriceChart::new()
        .mount(&cx, &engine, |cx| {
            for _ in 0..4 {
                let index = PriceChartPane::new().mount(cx, |_| Ok(()))?;
                resolved.borrow_mut().push(index.raw());
            }
            Ok(())
        })
        .expect("mount");

    assert_eq!(*resolved.borrow(), vec![1, 2, 3, 4]);
}

#[test]
fn explicit_index_wins_and_does_not_perturb_the_counter() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let resolved = Rc::new(RefCell::new(Vec::new()));

    PriceChart::new()
        .mount(&cx, &engine, |cx| {
            let push = |index: reactive_charts::PaneIndex| {
                resolved.borrow_mut().push(index.raw());
            };
            push(PriceChartPane::new().mount(cx, |_| Ok(()))?);
            push(PriceChartPane::new().with_index(5_u32).mount(cx, |_| Ok(()))?);
            push(PriceChartPane::new().mount(cx, |_| Ok(()))?);
            Ok(())
        })
        .expect("mount");

    assert_eq!(*resolved.borrow(), vec![1, 5, 2]);
}

#[test]
fn indices_are_not_reused_after_a_pane_unmounts() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let resolved = Rc::new(RefCell::new(Vec::new()));

    PriceChart::new()
        .mount(&cx, &engine, |cx| {
            // Mount the first pane into a disposable subtree, tear it down,
            // then mount another pane: the freed index must not come back.
            let removable = cx.child();
            let first = PriceChartPane::new().mount(&removable, |_| Ok(()))?;
            resolved.borrow_mut().push(first.raw());
            removable.dispose();

            let second = PriceChartPane::new().mount(cx, |_| Ok(()))?;
            resolved.borrow_mut().push(second.raw());
            Ok(())
        })
        .expect("mount");

    assert_eq!(*resolved.borrow(), vec![1, 2]);
}

#[test]
fn each_chart_instance_has_its_own_counter() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let resolved = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..2 {
        PriceChart::new()
            .mount(&cx, &engine, |cx| {
                let index = PriceChartPane::new().mount(cx, |_| Ok(()))?;
                resolved.borrow_mut().push(index.raw());
                Ok(())
            })
            .expect("mount");
    }

    assert_eq!(*resolved.borrow(), vec![1, 1]);
}

#[test]
fn series_inside_a_pane_targets_the_resolved_index() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();

    PriceChart::new()
        .mount(&cx, &engine, |cx| {
            PriceChartSeries::new(SeriesKind::Line)
                .with_data(vec![DataPoint::new(0.0, 1.0)])
                .mount(cx)?;
            PriceChartPane::new().mount(cx, |cx| {
                PriceChartSeries::new(SeriesKind::Histogram)
                    .with_data(vec![DataPoint::new(0.0, 2.0)])
                    .mount(cx)
            })?;
            Ok(())
        })
        .expect("mount");

    let chart = engine.last_chart().expect("chart created");
    let series = chart.series_handles();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].pane_index().raw(), 0);
    assert_eq!(series[0].kind(), Some(SeriesKind::Line));
    assert_eq!(series[1].pane_index().raw(), 1);
    assert_eq!(series[1].kind(), Some(SeriesKind::Histogram));
}
