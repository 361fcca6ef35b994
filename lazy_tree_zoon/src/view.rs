//! zoon elements for a [`TreeRoot`].
//!
//! Every core cell an element depends on is mirrored into a [`Mutable`], so
//! rows, toggles, buttons and children containers re-render on their own
//! signals. Rebuilt elements reuse the entry's mirror. Clicks go straight
//! back to the entry.

use crate::mirror::{EntryMirror, MountedMirror};
use crate::styles::{self, TreeStylesheet};
use crate::tokens::*;
use lazy_tree::{ChildrenContainer, ExpandState, TreeEntry, TreeRoot, TreeStrategy};
use std::cell::RefCell;
use std::rc::Rc;
use zoon::*;

/// Host elements the tree can place into rows and buttons containers.
pub trait RenderElement: Clone + 'static {
    fn render(self) -> impl Element;
}

impl RenderElement for String {
    fn render(self) -> impl Element {
        Text::new(self)
    }
}

/// Render `tree`. Nothing but the stylesheet shows up until the first reset
/// mounts the root.
pub fn tree_view<S>(tree: &TreeRoot<S>) -> impl Element
where
    S: TreeStrategy,
    S::Element: RenderElement,
{
    let mounted = MountedMirror::of(tree).0.clone();
    let root = tree.root().clone();
    let stylesheet = Rc::new(RefCell::new(None));

    Column::new()
        .s(Width::fill())
        .s(Font::new().size(FONT_SIZE_ROW))
        .update_raw_el(|raw_el| raw_el.class(styles::TREE_CLASS).attr("role", "tree"))
        .item_signal(
            mounted
                .signal()
                .map(move |mounted| mounted.then(|| children_view(&root).unify())),
        )
        .after_insert({
            let stylesheet = Rc::clone(&stylesheet);
            move |_| {
                stylesheet.borrow_mut().replace(TreeStylesheet::acquire());
            }
        })
        .after_remove(move |_| {
            stylesheet.borrow_mut().take();
        })
}

fn entry_view<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    Column::new()
        .update_raw_el(|raw_el| raw_el.attr("role", "treeitem"))
        .item(entry.has_record_slot().then(|| record_row(entry)))
        .item(children_view(entry))
}

fn record_row<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    let element = EntryMirror::of(entry).element.clone();

    Row::new()
        .s(Gap::new().x(SPACING_4))
        .s(Align::new().center_y())
        .s(Padding::new().y(SPACING_2).right(SPACING_8))
        .update_raw_el(|raw_el| raw_el.class(styles::ROW_CLASS))
        .item(expand_toggle_view(entry))
        .item_signal(
            element
                .signal_cloned()
                .map(|element| element.map(|element| element.render().unify())),
        )
        .item(buttons_view(entry))
}

fn expand_toggle_view<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    let mirror = EntryMirror::of(entry);
    let visible = mirror.toggle_visible.clone();
    let replacement = mirror.toggle_replacement.clone();

    let entry = entry.clone();
    El::new()
        .s(Width::exact(TOGGLE_SIZE))
        .s(Height::exact(TOGGLE_SIZE))
        .child_signal(
            map_ref! {
                let visible = visible.signal(),
                let replacement = replacement.signal_cloned() =>
                (*visible, replacement.clone())
            }
            .map(move |(visible, replacement)| {
                if !visible {
                    return None;
                }
                let element = match replacement {
                    Some(element) => El::new()
                        .update_raw_el(|raw_el| raw_el.class(styles::TOGGLE_CLASS))
                        .on_click({
                            let entry = entry.clone();
                            move || entry.toggle()
                        })
                        .child(element.render())
                        .unify(),
                    None => default_toggle(&entry).unify(),
                };
                Some(element)
            }),
        )
}

fn default_toggle<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    let state = EntryMirror::of(entry).state.clone();

    let entry = entry.clone();
    Button::new()
        .s(Width::exact(TOGGLE_SIZE))
        .s(Height::exact(TOGGLE_SIZE))
        .s(Padding::all(0))
        .s(Font::new().size(FONT_SIZE_TOGGLE))
        .update_raw_el(|raw_el| raw_el.class(styles::TOGGLE_CLASS))
        .label_signal(state.signal().map(|state| {
            Text::new(match state {
                ExpandState::Collapsed => "▶",
                ExpandState::Expanding => "…",
                ExpandState::Populated => "▼",
            })
        }))
        .on_press_event(move |event| {
            event.pass_to_parent(false);
            entry.toggle();
        })
}

fn buttons_view<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    let buttons = EntryMirror::of(entry).buttons.clone();

    El::new()
        .update_raw_el(|raw_el| raw_el.class(styles::BUTTONS_CLASS))
        .child_signal(buttons.signal_cloned().map(|items| {
            (!items.is_empty()).then(|| {
                Row::new()
                    .s(Gap::new().x(SPACING_4))
                    .items(items.into_iter().map(|item| item.render().unify()))
            })
        }))
}

fn children_view<R, E>(entry: &TreeEntry<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    let children = EntryMirror::of(entry).children.clone();
    let indent = if entry.has_indent() {
        entry.config().indent_px
    } else {
        0
    };

    El::new()
        .s(Padding::new().left(indent))
        .update_raw_el(|raw_el| raw_el.class(styles::CHILDREN_CLASS).attr("role", "group"))
        .child_signal(
            children
                .signal_cloned()
                .map(|children| children.map(|container| container_view(&container).unify())),
        )
}

fn container_view<R, E>(container: &ChildrenContainer<R, E>) -> impl Element
where
    R: Clone + 'static,
    E: RenderElement,
{
    Column::new()
        .update_raw_el(|raw_el| raw_el.attr("data-generation", &container.generation().to_string()))
        .items(
            container
                .entries()
                .iter()
                .map(|child| entry_view(child).unify())
                .collect::<Vec<_>>(),
        )
}
