//! Observable values.
//!
//! A [`Binding`] is a shared cell that notifies subscribers when its value
//! changes. Clones share the same value. Setting an equal value is silent.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Box<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

pub struct Binding<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.inner.borrow().value).finish()
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Binding<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register `f` to run after every change. Subscribers receive the new
    /// value and must not read or set the binding they observe.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().subscribers.push(Box::new(f));
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }
}

impl<T: Clone> Binding<T> {
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }
}

impl<T: PartialEq> Binding<T> {
    /// Store `value` and notify subscribers. Returns `false` when the value
    /// was already equal (no notification).
    pub fn set(&self, value: T) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.value == value {
            return false;
        }
        inner.value = value;
        let inner = &*inner;
        for sub in &inner.subscribers {
            sub(&inner.value);
        }
        true
    }
}
