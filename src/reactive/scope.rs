use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::effect::EffectInner;

struct ScopeInner {
    parent: Option<Weak<ScopeInner>>,
    children: RefCell<Vec<Rc<ScopeInner>>>,
    effects: RefCell<Vec<Rc<EffectInner>>>,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
    contexts: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    disposed: Cell<bool>,
}

impl ScopeInner {
    fn new(parent: Option<Weak<ScopeInner>>) -> Rc<Self> {
        Rc::new(Self {
            parent,
            children: RefCell::new(Vec::new()),
            effects: RefCell::new(Vec::new()),
            cleanups: RefCell::new(Vec::new()),
            contexts: RefCell::new(HashMap::new()),
            disposed: Cell::new(false),
        })
    }

    // Innermost first: children, then effects, then own cleanups, each
    // group in reverse creation order. Component teardown ordering (series
    // before pane before chart) rests on exactly this.
    fn dispose(inner: &Rc<Self>) {
        if inner.disposed.replace(true) {
            return;
        }
        let children = std::mem::take(&mut *inner.children.borrow_mut());
        for child in children.iter().rev() {
            Self::dispose(child);
        }
        let effects = std::mem::take(&mut *inner.effects.borrow_mut());
        for effect in effects.iter().rev() {
            effect.dispose();
        }
        let cleanups = std::mem::take(&mut *inner.cleanups.borrow_mut());
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }
        inner.contexts.borrow_mut().clear();
    }
}

/// An ownership node of the component tree.
///
/// Components mount into a parent scope by creating a [`Scope::child`],
/// registering cleanups and effects on it, and providing context values for
/// their descendants. Disposing any scope tears down its whole subtree.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Scope {
    /// Creates a detached root scope. Disposing it unmounts everything
    /// mounted beneath it.
    #[must_use]
    pub fn root() -> Self {
        Self {
            inner: ScopeInner::new(None),
        }
    }

    /// Creates a child scope owned by `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        let inner = ScopeInner::new(Some(Rc::downgrade(&self.inner)));
        self.inner.children.borrow_mut().push(Rc::clone(&inner));
        Self { inner }
    }

    /// Registers a teardown callback.
    ///
    /// Cleanups run in reverse registration order when the scope is
    /// disposed. Registering on an already-disposed scope runs the callback
    /// immediately so no resource outlives its owner.
    pub fn on_cleanup(&self, cleanup: impl FnOnce() + 'static) {
        if self.inner.disposed.get() {
            cleanup();
            return;
        }
        self.inner.cleanups.borrow_mut().push(Box::new(cleanup));
    }

    /// Creates an effect owned by this scope and runs it once synchronously.
    pub fn create_effect(&self, f: impl FnMut() + 'static) {
        let effect = EffectInner::new(Box::new(f));
        self.inner.effects.borrow_mut().push(Rc::clone(&effect));
        effect.execute();
    }

    /// Makes `value` available to this scope and its descendants.
    ///
    /// Context values are keyed by type; providing the same type again in a
    /// nested scope shadows the outer value (nearest provider wins).
    pub fn provide_context<T: 'static>(&self, value: T) {
        self.inner
            .contexts
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::new(value));
    }

    /// Looks up the nearest provided value of type `T`, walking towards the
    /// root. Returns `None` when no enclosing scope provides one.
    #[must_use]
    pub fn use_context<T: Clone + 'static>(&self) -> Option<T> {
        let mut current = Some(Rc::clone(&self.inner));
        while let Some(scope) = current {
            let found = scope
                .contexts
                .borrow()
                .get(&TypeId::of::<T>())
                .and_then(|value| value.downcast_ref::<T>().cloned());
            if found.is_some() {
                return found;
            }
            current = scope.parent.as_ref().and_then(Weak::upgrade);
        }
        None
    }

    /// Disposes this scope and everything mounted beneath it.
    pub fn dispose(&self) {
        ScopeInner::dispose(&self.inner);
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("disposed", &self.inner.disposed.get())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::super::{Signal, on_effect_cleanup};
    use super::Scope;

    #[test]
    fn child_cleanups_run_before_parent_cleanups() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let root = Scope::root();

        {
            let order = Rc::clone(&order);
            root.on_cleanup(move || order.borrow_mut().push("parent"));
        }
        let child = root.child();
        {
            let order = Rc::clone(&order);
            child.on_cleanup(move || order.borrow_mut().push("child"));
        }
        let grandchild = child.child();
        {
            let order = Rc::clone(&order);
            grandchild.on_cleanup(move || order.borrow_mut().push("grandchild"));
        }

        root.dispose();
        assert_eq!(*order.borrow(), vec!["grandchild", "child", "parent"]);
    }

    #[test]
    fn cleanups_within_a_scope_run_in_reverse_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let root = Scope::root();
        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            root.on_cleanup(move || order.borrow_mut().push(label));
        }
        root.dispose();
        assert_eq!(*order.borrow(), vec!["third", "second", "first"]);
    }

    #[test]
    fn effect_cleanups_run_before_scope_cleanups() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let root = Scope::root();

        {
            let order = Rc::clone(&order);
            root.on_cleanup(move || order.borrow_mut().push("scope"));
        }
        {
            let order = Rc::clone(&order);
            root.create_effect(move || {
                let order = Rc::clone(&order);
                on_effect_cleanup(move || order.borrow_mut().push("effect"));
            });
        }

        root.dispose();
        assert_eq!(*order.borrow(), vec!["effect", "scope"]);
    }

    #[test]
    fn effect_cleanup_runs_before_each_rerun() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let value = Signal::new(1);
        let root = Scope::root();

        {
            let order = Rc::clone(&order);
            let value = value.clone();
            root.create_effect(move || {
                let current = value.get();
                order.borrow_mut().push(format!("run {current}"));
                let order = Rc::clone(&order);
                on_effect_cleanup(move || order.borrow_mut().push(format!("cleanup {current}")));
            });
        }

        value.set(2);
        root.dispose();
        assert_eq!(
            *order.borrow(),
            vec!["run 1", "cleanup 1", "run 2", "cleanup 2"]
        );
    }

    #[test]
    fn nearest_context_provider_wins() {
        let root = Scope::root();
        root.provide_context(1_u32);
        let child = root.child();
        child.provide_context(2_u32);
        let grandchild = child.child();

        assert_eq!(grandchild.use_context::<u32>(), Some(2));
        assert_eq!(root.use_context::<u32>(), Some(1));
        assert_eq!(root.use_context::<String>(), None);
    }

    #[test]
    fn cleanup_on_disposed_scope_runs_immediately() {
        let ran = Rc::new(RefCell::new(false));
        let root = Scope::root();
        root.dispose();
        {
            let ran = Rc::clone(&ran);
            root.on_cleanup(move || *ran.borrow_mut() = true);
        }
        assert!(*ran.borrow());
    }
}
