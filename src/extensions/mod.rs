pub mod markers;
pub mod primitives;

pub use markers::{MarkerDerivation, MarkerPosition, MarkerShape, SeriesMarker};
pub use primitives::{
    CustomSeriesPaneView, PaneAttachedParameter, PanePrimitive, PrimitivePaneView,
    PrimitiveZOrder, SeriesAttachedParameter, SeriesPrimitive,
};
