//! Core cells mirrored into zoon `Mutable`s.
//!
//! Each entry is subscribed to once; the mirror is stored on the entry and
//! shared by every element rendered for it, however often they are rebuilt.

use lazy_tree::{ChildrenContainer, ExpandState, TreeEntry, TreeRoot, TreeStrategy};
use std::rc::Rc;
use zoon::Mutable;

pub(crate) struct EntryMirror<R, E> {
    pub state: Mutable<ExpandState>,
    pub element: Mutable<Option<E>>,
    pub children: Mutable<Option<ChildrenContainer<R, E>>>,
    pub buttons: Mutable<Vec<E>>,
    pub toggle_visible: Mutable<bool>,
    pub toggle_replacement: Mutable<Option<E>>,
}

impl<R, E> EntryMirror<R, E>
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    pub fn of(entry: &TreeEntry<R, E>) -> Rc<Self> {
        entry.attachment(Self::subscribe)
    }

    fn subscribe(entry: &TreeEntry<R, E>) -> Self {
        let mirror = Self {
            state: Mutable::new(entry.state()),
            element: Mutable::new(entry.element()),
            children: Mutable::new(entry.children()),
            buttons: Mutable::new(entry.buttons().items()),
            toggle_visible: Mutable::new(entry.expand_toggle().is_visible()),
            toggle_replacement: Mutable::new(entry.expand_toggle().replacement()),
        };

        entry.react_state({
            let state = mirror.state.clone();
            move |value| state.set_neq(*value)
        });
        entry.react_element({
            let element = mirror.element.clone();
            move |value| element.set(value.clone())
        });
        entry.react_children({
            let children = mirror.children.clone();
            move |value| children.set(value.clone())
        });
        entry.buttons().react({
            let buttons = mirror.buttons.clone();
            move |items| buttons.set(items.clone())
        });
        entry.expand_toggle().react_visible({
            let visible = mirror.toggle_visible.clone();
            move |value| visible.set_neq(*value)
        });
        entry.expand_toggle().react_replacement({
            let replacement = mirror.toggle_replacement.clone();
            move |value| replacement.set(value.clone())
        });

        mirror
    }
}

/// The controller's `mounted` flag, kept on the root entry.
pub(crate) struct MountedMirror(pub Mutable<bool>);

impl MountedMirror {
    pub fn of<S: TreeStrategy>(tree: &TreeRoot<S>) -> Rc<Self> {
        tree.root().attachment(|_| {
            let mounted = Mutable::new(tree.is_mounted());
            tree.react_mounted({
                let mounted = mounted.clone();
                move |value| mounted.set_neq(*value)
            });
            MountedMirror(mounted)
        })
    }
}
