use reactive_charts::engine::EngineEvent;
use reactive_charts::{
    ChartOptions, ContainerOptions, NullChartEngine, PriceChart, Scope, Signal,
};

#[test]
fn option_changes_are_reapplied_in_full() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let options = Signal::new(ChartOptions::default());

    PriceChart::new()
        .with_options(&options)
        .mount(&cx, &engine, |_| Ok(()))
        .expect("mount");

    let chart = engine.last_chart().expect("chart created");
    let applied_after_mount = chart
        .journal()
        .iter()
        .filter(|event| matches!(event, EngineEvent::ChartOptionsApplied))
        .count();
    assert_eq!(applied_after_mount, 1);

    options.update(|options| {
        options.layout.background_color = Some("#101010".to_owned());
        options.time_scale.seconds_visible = Some(true);
    });

    let applied = chart
        .journal()
        .iter()
        .filter(|event| matches!(event, EngineEvent::ChartOptionsApplied))
        .count();
    assert_eq!(applied, 2);

    let merged = chart.options();
    assert_eq!(merged.layout.background_color.as_deref(), Some("#101010"));
    assert_eq!(merged.time_scale.seconds_visible, Some(true));
}

#[test]
fn sizing_mode_is_mirrored_into_pushed_options() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();

    PriceChart::new()
        .with_auto_size(false)
        .mount(&cx, &engine, |_| Ok(()))
        .expect("mount");

    let chart = engine.last_chart().expect("chart created");
    assert!(!chart.options().auto_size);
}

#[test]
fn sizing_mode_overrides_a_conflicting_options_input() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let mut conflicting = ChartOptions::default();
    conflicting.auto_size = false;

    PriceChart::new()
        .with_options(conflicting)
        .mount(&cx, &engine, |_| Ok(()))
        .expect("mount");

    // The component's sizing input (default: auto) wins over the flag
    // embedded in the options value.
    let chart = engine.last_chart().expect("chart created");
    assert!(chart.options().auto_size);
}

#[test]
fn container_attributes_reach_the_engine() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();

    let container = PriceChart::new()
        .with_container(ContainerOptions {
            id: Some("main-chart".to_owned()),
            class: Some("chart".to_owned()),
            style: Some("height: 300px".to_owned()),
        })
        .mount(&cx, &engine, |_| Ok(()))
        .expect("mount");

    assert_eq!(container.id(), Some("main-chart"));
    let chart = engine.last_chart().expect("chart created");
    assert_eq!(chart.container().id(), Some("main-chart"));
    assert_eq!(chart.container().class(), Some("chart"));
}

#[test]
fn on_create_chart_fires_once_at_mount() {
    let cx = Scope::root();
    let engine = NullChartEngine::<f64>::new();
    let created = std::rc::Rc::new(std::cell::Cell::new(0));

    {
        let created = std::rc::Rc::clone(&created);
        PriceChart::new()
            .on_create_chart(move |_| created.set(created.get() + 1))
            .mount(&cx, &engine, |_| Ok(()))
            .expect("mount");
    }

    assert_eq!(created.get(), 1);
}
