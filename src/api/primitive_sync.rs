//! Idempotent attach/detach helpers for primitive lists.
//!
//! The attach helpers detach the incoming set before attaching it, so the
//! engine never observes a duplicate attachment of the same handle even
//! when the declared list overlaps what is already attached. The pane
//! helpers accept an absent target: a pane resource only comes into
//! existence once a series targets its index, and declaring primitives
//! before that point must defer rather than fail.

use std::rc::Rc;

use crate::core::variant::Coordinate;
use crate::engine::{PaneApi, SeriesApi};
use crate::extensions::primitives::{PanePrimitive, SeriesPrimitive};

pub(crate) fn detach_pane_primitives<X: Coordinate>(
    primitives: &[Rc<dyn PanePrimitive<X = X>>],
    pane: Option<&Rc<dyn PaneApi<X = X>>>,
) {
    let Some(pane) = pane else {
        return;
    };
    for primitive in primitives {
        pane.detach_primitive(primitive);
    }
}

pub(crate) fn attach_pane_primitives<X: Coordinate>(
    primitives: &[Rc<dyn PanePrimitive<X = X>>],
    pane: Option<&Rc<dyn PaneApi<X = X>>>,
) {
    let Some(pane) = pane else {
        return;
    };
    // Detach the primitives from the pane before attaching them again.
    detach_pane_primitives(primitives, Some(pane));
    for primitive in primitives {
        pane.attach_primitive(Rc::clone(primitive));
    }
}

pub(crate) fn detach_series_primitives<X: Coordinate>(
    primitives: &[Rc<dyn SeriesPrimitive<X = X>>],
    series: &Rc<dyn SeriesApi<X = X>>,
) {
    for primitive in primitives {
        series.detach_primitive(primitive);
    }
}

pub(crate) fn attach_series_primitives<X: Coordinate>(
    primitives: &[Rc<dyn SeriesPrimitive<X = X>>],
    series: &Rc<dyn SeriesApi<X = X>>,
) {
    // Detach the primitives from the series before attaching them again.
    detach_series_primitives(primitives, series);
    for primitive in primitives {
        series.attach_primitive(Rc::clone(primitive));
    }
}
