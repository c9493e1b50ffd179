//! Declarative components over the engine capability contract.
//!
//! One generic lifecycle implementation serves all three chart variants;
//! the variant type only decides the coordinate representation, the engine
//! entry point and the context identity used for misuse diagnostics.

mod chart;
mod context;
mod pane;
mod primitive_sync;
mod series;

pub use chart::{Chart, PriceChart, TimeChart, YieldCurveChart};
pub use context::{
    ChartContext, use_chart, use_pane_index, use_price_chart, use_time_chart,
    use_yield_curve_chart,
};
pub use pane::{Pane, PriceChartPane, TimeChartPane, YieldCurveChartPane};
pub use series::{
    CustomSeries, PriceChartCustomSeries, PriceChartSeries, Series, TimeChartCustomSeries,
    TimeChartSeries, YieldCurveChartCustomSeries, YieldCurveChartSeries,
};
