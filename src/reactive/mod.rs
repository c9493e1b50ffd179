//! Single-threaded cooperative reactive runtime.
//!
//! Chart components describe the engine's object graph declaratively; this
//! module supplies the scheduling substrate that keeps the two in sync:
//!
//! - [`Signal<T>`]: a reactive slot. Reads inside a running effect register
//!   the effect as a dependent; writes synchronously re-run dependents.
//! - [`Scope`]: an ownership node holding child scopes, effects, cleanups and
//!   provided context values. Disposing a scope tears its subtree down
//!   innermost-first, which is what makes series resources go away before
//!   their pane and the pane before its chart.
//! - [`batch`]: defers and deduplicates dependent re-runs so a multi-input
//!   update (for example width and height of a fixed-size chart) is observed
//!   as a single effect run.
//! - [`Reactive<T>`]: a component input that is either a constant or a
//!   signal handle.
//!
//! Everything is `Rc`/`RefCell` based and deliberately not `Send`: all
//! engine calls are synchronous and ordering-sensitive, so a single
//! cooperative thread is the model, not a limitation.

mod effect;
mod scope;
mod signal;

pub use effect::{batch, on_effect_cleanup};
pub use scope::Scope;
pub use signal::{Reactive, Signal};
