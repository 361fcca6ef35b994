//! Single-slot reactive value containers.
//!
//! [`ReactiveCell`] is the smallest reactive primitive of the tree: it holds
//! one value and calls its subscribers whenever the value is replaced.
//! Unlike a signal it never skips intermediate values, and a new subscriber
//! is always called once right away so every consumer gets an initial pass
//! before any data arrives.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct CellInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
}

/// Shared handle to a single reactive value.
///
/// Clones share the same slot. Subscriptions live as long as the cell.
///
/// # Examples
///
/// ```rust
/// use lazy_tree::ReactiveCell;
///
/// let count = ReactiveCell::new(0);
/// count.react(|value| println!("count is {value}"));
/// count.set(5);
/// ```
pub struct ReactiveCell<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ReactiveCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Replace the value and notify every subscriber with it.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate the value in place, then notify.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Subscribe and immediately call `callback` with the current value.
    pub fn react(&self, callback: impl Fn(&T) + 'static) {
        let callback: Subscriber<T> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::clone(&callback));
        let current = self.get_cloned();
        callback(&current);
    }

    pub fn get_cloned(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// True when both handles point at the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Subscribers may call `set` again; neither borrow is held while they run.
    fn notify(&self) {
        let value = self.get_cloned();
        let subscribers = self.inner.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// The cell an entry keeps its child records in.
///
/// `None` means the records were never delivered. Hosts answer a
/// sub-records request by calling [`ChildrenCell::set`]; once a list is
/// stored the cell never goes back to `None`.
pub struct ChildrenCell<R> {
    cell: ReactiveCell<Option<Vec<R>>>,
}

impl<R> Clone for ChildrenCell<R> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<R: Clone + 'static> ChildrenCell<R> {
    pub fn new() -> Self {
        Self {
            cell: ReactiveCell::new(None),
        }
    }

    /// Store the child records, in display order.
    pub fn set(&self, records: Vec<R>) {
        self.cell.set(Some(records));
    }

    pub fn records(&self) -> Option<Vec<R>> {
        self.cell.get_cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.inner.value.borrow().is_some()
    }

    pub fn react(&self, callback: impl Fn(&Option<Vec<R>>) + 'static) {
        self.cell.react(callback);
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<R: Clone + 'static> Default for ChildrenCell<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: fmt::Debug> fmt::Debug for ChildrenCell<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChildrenCell").field(&self.cell).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn react_fires_immediately_with_initial_value() {
        let cell = ReactiveCell::new(7);
        let seen = Rc::new(RefCell::new(Vec::new()));

        cell.react({
            let seen = Rc::clone(&seen);
            move |value| seen.borrow_mut().push(*value)
        });

        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn set_notifies_every_subscriber_in_order() {
        let cell = ReactiveCell::new(String::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            cell.react(move |value: &String| log.borrow_mut().push(format!("{name}:{value}")));
        }
        log.borrow_mut().clear();

        cell.set("a".to_string());

        assert_eq!(*log.borrow(), vec!["first:a", "second:a"]);
        assert_eq!(cell.subscriber_count(), 2);
    }

    #[test]
    fn repeated_equal_values_still_notify() {
        let cell = ReactiveCell::new(1);
        let hits = Rc::new(RefCell::new(0));
        cell.react({
            let hits = Rc::clone(&hits);
            move |_| *hits.borrow_mut() += 1
        });

        cell.set(1);
        cell.set(1);

        assert_eq!(*hits.borrow(), 3);
    }

    #[test]
    fn subscriber_may_set_the_cell_again() {
        let cell = ReactiveCell::new(0);
        cell.react({
            let cell = cell.clone();
            move |value| {
                if *value == 1 {
                    cell.set(2);
                }
            }
        });

        cell.set(1);

        assert_eq!(cell.get_cloned(), 2);
    }

    #[test]
    fn update_mutates_in_place() {
        let cell = ReactiveCell::new(vec![1, 2]);
        cell.update(|items| items.push(3));
        assert_eq!(cell.get_cloned(), vec![1, 2, 3]);
    }

    #[test]
    fn children_cell_starts_unloaded() {
        let children = ChildrenCell::<&str>::new();
        assert!(!children.is_loaded());
        assert_eq!(children.records(), None);

        children.set(vec!["a", "b"]);

        assert!(children.is_loaded());
        assert_eq!(children.records(), Some(vec!["a", "b"]));
        assert!(children.ptr_eq(&children.clone()));
    }
}
