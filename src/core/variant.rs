use crate::core::data::TimeCoordinate;

/// Bound every horizontal coordinate type must satisfy.
pub trait Coordinate: Clone + PartialEq + std::fmt::Debug + 'static {}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> Coordinate for T {}

/// One of the three chart flavors.
///
/// The flavors share a single lifecycle implementation; everything that
/// differs between them is captured here: the horizontal coordinate type
/// and the component name used by context-misuse diagnostics. The engine's
/// variant-specific creation entry point is keyed by this trait as well
/// (see `CreateChart`). Marker derivations are a time-variant-only input,
/// exposed directly on the time chart's series builders.
pub trait ChartVariant: 'static {
    type X: Coordinate;

    /// Component name reported by configuration errors.
    const NAME: &'static str;
}

/// Time-scale charts: the horizontal axis is wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct TimeVariant;

impl ChartVariant for TimeVariant {
    type X = TimeCoordinate;
    const NAME: &'static str = "TimeChart";
}

/// Numeric-scale charts: the horizontal axis is a price or any plain number.
#[derive(Debug, Clone, Copy)]
pub struct PriceVariant;

impl ChartVariant for PriceVariant {
    type X = f64;
    const NAME: &'static str = "PriceChart";
}

/// Yield-curve charts: the horizontal axis is a duration in months.
#[derive(Debug, Clone, Copy)]
pub struct YieldCurveVariant;

impl ChartVariant for YieldCurveVariant {
    type X = f64;
    const NAME: &'static str = "YieldCurveChart";
}
