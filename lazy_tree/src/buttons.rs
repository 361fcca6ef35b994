use crate::cell::ReactiveCell;
use std::fmt;

/// Per-entry container the host attaches action elements to.
///
/// It is handed to the host with every sub-records request. Hosts should
/// attach to it and read it, not keep it: the entry clears it on collapse.
pub struct ButtonsContainer<E> {
    items: ReactiveCell<Vec<E>>,
}

impl<E> Clone for ButtonsContainer<E> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<E: Clone + 'static> ButtonsContainer<E> {
    pub fn new() -> Self {
        Self {
            items: ReactiveCell::new(Vec::new()),
        }
    }

    pub fn attach(&self, element: E) {
        self.items.update(|items| items.push(element));
    }

    /// Replace everything currently attached.
    pub fn replace(&self, elements: Vec<E>) {
        self.items.set(elements);
    }

    pub fn clear(&self) {
        self.items.set(Vec::new());
    }

    pub fn items(&self) -> Vec<E> {
        self.items.get_cloned()
    }

    pub fn len(&self) -> usize {
        self.items.get_cloned().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn react(&self, callback: impl Fn(&Vec<E>) + 'static) {
        self.items.react(callback);
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.items.ptr_eq(&other.items)
    }
}

impl<E: Clone + 'static> Default for ButtonsContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for ButtonsContainer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ButtonsContainer").field(&self.items).finish()
    }
}
