//! reactive-charts: declarative components over imperative charting engines.
//!
//! This crate does not chart anything itself. It keeps an external engine's
//! stateful object graph (chart → panes → series → primitives) synchronized
//! with a declarative, reactively-changing description of it: resources are
//! created on mount, updated by effects, and torn down innermost-first on
//! unmount, while nested panes resolve their numeric indices through a
//! per-chart allocation counter.

pub mod api;
pub mod core;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod reactive;
pub mod telemetry;

pub use api::{
    Chart, ChartContext, CustomSeries, Pane, PriceChart, PriceChartCustomSeries, PriceChartPane,
    PriceChartSeries, Series, TimeChart, TimeChartCustomSeries, TimeChartPane, TimeChartSeries,
    YieldCurveChart, YieldCurveChartCustomSeries, YieldCurveChartPane, YieldCurveChartSeries,
    use_chart, use_pane_index, use_price_chart, use_time_chart, use_yield_curve_chart,
};
pub use crate::core::{
    ChartOptions, ChartVariant, ContainerOptions, DataPoint, DataValue, PaneIndex, PriceVariant,
    SeriesKind, SeriesOptions, TimeCoordinate, TimeVariant, YieldCurveVariant,
};
pub use engine::{ChartApi, CreateChart, NullChartEngine, PaneApi, SeriesApi};
pub use error::{ChartError, ChartResult};
pub use reactive::{Reactive, Scope, Signal, batch};
