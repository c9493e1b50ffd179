use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// Address of one vertical sub-region of a chart.
///
/// Index `0` is the default pane: it always exists and is never created or
/// removed explicitly. Indices `>= 1` identify additional panes, declared
/// either explicitly or through auto-allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneIndex(u32);

impl PaneIndex {
    /// The implicit default pane.
    pub const DEFAULT: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl Default for PaneIndex {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PaneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for PaneIndex {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Per-chart monotonic pane-index counter.
///
/// Starts at `1` (`0` is the implicit default pane) and only ever moves
/// forward: indices consumed by [`allocate`](Self::allocate) are never
/// handed out again for the lifetime of the chart, even after the pane
/// using them is removed. Explicitly chosen indices bypass the counter
/// entirely and do not perturb it.
#[derive(Debug)]
pub struct PaneIndexAllocator {
    next: Cell<u32>,
}

impl Default for PaneIndexAllocator {
    fn default() -> Self {
        Self { next: Cell::new(1) }
    }
}

impl PaneIndexAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes and returns the next free index.
    ///
    /// A single read-modify-write with no interleaving: the runtime is
    /// single-threaded and cooperative, so two panes can never observe the
    /// same pre-increment value.
    pub fn allocate(&self) -> PaneIndex {
        let index = self.next.get();
        self.next.set(index.saturating_add(1));
        PaneIndex::new(index)
    }

    /// Returns the index the next [`allocate`](Self::allocate) would yield.
    #[must_use]
    pub fn peek_next(&self) -> PaneIndex {
        PaneIndex::new(self.next.get())
    }
}
