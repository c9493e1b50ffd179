pub mod container;
pub mod data;
pub mod options;
pub mod pane;
pub mod variant;

pub use container::{ContainerElement, ContainerOptions};
pub use data::{DataPoint, DataValue, SeriesKind, TimeCoordinate};
pub use options::{
    ChartOptions, LayoutOptions, LineStyle, PriceFormat, PriceFormatOptions, PriceScaleOptions,
    ScaleMargins, SeriesOptions, TimeScaleOptions,
};
pub use pane::{PaneIndex, PaneIndexAllocator};
pub use variant::{ChartVariant, Coordinate, PriceVariant, TimeVariant, YieldCurveVariant};
