use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::effect::{EffectInner, current_observer, schedule};

struct Dependent {
    effect: Weak<EffectInner>,
    epoch: u64,
}

struct SignalInner<T> {
    value: RefCell<T>,
    dependents: RefCell<Vec<Dependent>>,
}

/// A readable/writable reactive slot.
///
/// Handles are cheaply cloneable and share one value. Reading inside a
/// running effect subscribes that effect; writing re-runs subscribers
/// synchronously (or once per [`batch`](super::batch) flush).
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                dependents: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Reads the value through a borrow, subscribing the running effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.borrow())
    }

    /// Reads the value without subscribing anything.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    fn track(&self) {
        let Some(observer) = current_observer() else {
            return;
        };
        let epoch = observer.epoch();
        let mut dependents = self.inner.dependents.borrow_mut();
        match dependents
            .iter_mut()
            .find(|dependent| dependent.effect.as_ptr() == Rc::as_ptr(&observer))
        {
            Some(existing) => existing.epoch = epoch,
            None => dependents.push(Dependent {
                effect: Rc::downgrade(&observer),
                epoch,
            }),
        }
    }

    fn notify(&self) {
        // Collect before running: an executing effect may read this signal
        // again and re-borrow the dependents list.
        let runnable: Vec<Rc<EffectInner>> = {
            let mut dependents = self.inner.dependents.borrow_mut();
            let mut runnable = Vec::with_capacity(dependents.len());
            dependents.retain(|dependent| {
                let Some(effect) = dependent.effect.upgrade() else {
                    return false;
                };
                if effect.is_disposed() {
                    return false;
                }
                // A subscription from an older run means the effect stopped
                // reading this signal.
                if effect.epoch() != dependent.epoch {
                    return false;
                }
                runnable.push(effect);
                true
            });
            runnable
        };
        for effect in runnable {
            schedule(effect);
        }
    }
}

impl<T: Clone + 'static> Signal<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    #[must_use]
    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&self.inner.value.borrow()).finish()
    }
}

/// A component input: either a fixed value or a live [`Signal`].
///
/// Component effects read inputs through [`Reactive::get`], so an input that
/// happens to be a signal keeps the corresponding engine state synchronized
/// for the component's whole lifetime, while a constant costs nothing.
#[derive(Debug, Clone)]
pub enum Reactive<T> {
    Const(T),
    Dynamic(Signal<T>),
}

impl<T: Clone + 'static> Reactive<T> {
    #[must_use]
    pub fn get(&self) -> T {
        match self {
            Self::Const(value) => value.clone(),
            Self::Dynamic(signal) => signal.get(),
        }
    }

    #[must_use]
    pub fn get_untracked(&self) -> T {
        match self {
            Self::Const(value) => value.clone(),
            Self::Dynamic(signal) => signal.get_untracked(),
        }
    }
}

impl<T: Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::Const(T::default())
    }
}

impl<T> From<T> for Reactive<T> {
    fn from(value: T) -> Self {
        Self::Const(value)
    }
}

impl<T> From<Signal<T>> for Reactive<T> {
    fn from(signal: Signal<T>) -> Self {
        Self::Dynamic(signal)
    }
}

impl<T> From<&Signal<T>> for Reactive<T> {
    fn from(signal: &Signal<T>) -> Self {
        Self::Dynamic(signal.clone())
    }
}
