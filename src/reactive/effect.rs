use std::cell::{Cell, RefCell};
use std::rc::Rc;

thread_local! {
    static OBSERVER_STACK: RefCell<Vec<Rc<EffectInner>>> = const { RefCell::new(Vec::new()) };
    static BATCH_QUEUE: RefCell<Option<Vec<Rc<EffectInner>>>> = const { RefCell::new(None) };
}

/// One tracked computation. Owned by the [`Scope`](super::Scope) that
/// created it; signals hold only weak references.
pub(crate) struct EffectInner {
    func: RefCell<Option<Box<dyn FnMut()>>>,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
    epoch: Cell<u64>,
    running: Cell<bool>,
    disposed: Cell<bool>,
}

impl EffectInner {
    pub(crate) fn new(func: Box<dyn FnMut()>) -> Rc<Self> {
        Rc::new(Self {
            func: RefCell::new(Some(func)),
            cleanups: RefCell::new(Vec::new()),
            epoch: Cell::new(0),
            running: Cell::new(false),
            disposed: Cell::new(false),
        })
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn add_cleanup(&self, cleanup: Box<dyn FnOnce()>) {
        self.cleanups.borrow_mut().push(cleanup);
    }

    fn run_cleanups(&self) {
        let pending = std::mem::take(&mut *self.cleanups.borrow_mut());
        for cleanup in pending.into_iter().rev() {
            cleanup();
        }
    }

    /// Runs the effect body, re-registering its dependencies.
    ///
    /// Cleanups registered during the previous run execute first. The
    /// `running` guard drops re-entrant triggers (an effect writing a signal
    /// it also reads must not recurse).
    pub(crate) fn execute(self: &Rc<Self>) {
        if self.disposed.get() || self.running.get() {
            return;
        }
        self.run_cleanups();
        self.epoch.set(self.epoch.get().wrapping_add(1));
        self.running.set(true);

        let func = self.func.borrow_mut().take();
        if let Some(mut func) = func {
            OBSERVER_STACK.with(|stack| stack.borrow_mut().push(Rc::clone(self)));
            func();
            OBSERVER_STACK.with(|stack| {
                stack.borrow_mut().pop();
            });
            if !self.disposed.get() {
                *self.func.borrow_mut() = Some(func);
            }
        }

        self.running.set(false);
    }

    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.run_cleanups();
        self.func.borrow_mut().take();
    }
}

pub(crate) fn current_observer() -> Option<Rc<EffectInner>> {
    OBSERVER_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Either runs the effect now or, inside [`batch`], enqueues it once.
pub(crate) fn schedule(effect: Rc<EffectInner>) {
    let queued = BATCH_QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        match queue.as_mut() {
            Some(pending) => {
                if !pending.iter().any(|queued| Rc::ptr_eq(queued, &effect)) {
                    pending.push(Rc::clone(&effect));
                }
                true
            }
            None => false,
        }
    });
    if !queued {
        effect.execute();
    }
}

/// Registers a cleanup on the currently-running effect.
///
/// The cleanup runs before the effect's next re-run and when the effect is
/// disposed, which is the hook the primitive-sync effects use to detach the
/// previously attached set before attaching the new one.
pub fn on_effect_cleanup(cleanup: impl FnOnce() + 'static) {
    match current_observer() {
        Some(effect) => effect.add_cleanup(Box::new(cleanup)),
        None => {
            tracing::warn!("on_effect_cleanup called outside a running effect; cleanup dropped");
        }
    }
}

/// Defers dependent re-runs triggered inside `f` until `f` returns.
///
/// Each affected effect runs at most once per flush, in first-trigger order.
/// Nested batches flush at the outermost boundary.
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    let owns_queue = BATCH_QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        if queue.is_none() {
            *queue = Some(Vec::new());
            true
        } else {
            false
        }
    });

    let result = f();

    if owns_queue {
        loop {
            let pending = BATCH_QUEUE.with(|queue| {
                queue
                    .borrow_mut()
                    .as_mut()
                    .map(std::mem::take)
                    .unwrap_or_default()
            });
            if pending.is_empty() {
                break;
            }
            for effect in pending {
                effect.execute();
            }
        }
        BATCH_QUEUE.with(|queue| {
            *queue.borrow_mut() = None;
        });
    }

    result
}
