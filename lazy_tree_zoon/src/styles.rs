//! The tree stylesheet as a scoped resource.
//!
//! The first mounted tree injects one `<style>` element into the document
//! head; it is removed again when the last [`TreeStylesheet`] drops.

use std::cell::RefCell;
use wasm_bindgen::JsValue;

pub const TREE_CLASS: &str = "lazy-tree";
pub const ROW_CLASS: &str = "lazy-tree-row";
pub const TOGGLE_CLASS: &str = "lazy-tree-toggle";
pub const CHILDREN_CLASS: &str = "lazy-tree-children";
pub const BUTTONS_CLASS: &str = "lazy-tree-buttons";

const STYLESHEET: &str = r#"
.lazy-tree { user-select: none; min-width: fit-content; }
.lazy-tree-row { border-radius: 4px; white-space: nowrap; }
.lazy-tree-row:hover { background-color: rgba(127, 127, 127, 0.12); }
.lazy-tree-toggle { cursor: pointer; opacity: 0.7; }
.lazy-tree-toggle:hover { opacity: 1; }
.lazy-tree-buttons:empty { display: none; }
"#;

thread_local! {
    static SHEET: RefCell<Shared<web_sys::Element>> = const { RefCell::new(Shared::new()) };
}

/// Keeps the tree stylesheet in the document while alive.
#[derive(Debug)]
pub struct TreeStylesheet {
    counted: bool,
}

impl TreeStylesheet {
    pub fn acquire() -> Self {
        let counted = SHEET.with(|sheet| match sheet.borrow_mut().acquire(inject) {
            Ok(()) => true,
            Err(error) => {
                log::error!("tree stylesheet injection failed: {error:?}");
                false
            }
        });
        Self { counted }
    }
}

impl Drop for TreeStylesheet {
    fn drop(&mut self) {
        if !self.counted {
            return;
        }
        if let Some(style) = SHEET.with(|sheet| sheet.borrow_mut().release()) {
            style.remove();
        }
    }
}

fn inject() -> Result<web_sys::Element, JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;
    let style = document.create_element("style")?;
    style.set_attribute("data-lazy-tree", "")?;
    style.set_text_content(Some(STYLESHEET));
    head.append_child(&style)?;
    Ok(style)
}

/// A lazily created value shared by a counted set of holders.
#[derive(Debug)]
struct Shared<T> {
    value: Option<T>,
    holders: usize,
}

impl<T> Shared<T> {
    const fn new() -> Self {
        Self {
            value: None,
            holders: 0,
        }
    }

    /// Count one more holder, creating the value for the first one.
    fn acquire<E>(&mut self, create: impl FnOnce() -> Result<T, E>) -> Result<(), E> {
        if self.value.is_none() {
            self.value = Some(create()?);
        }
        self.holders += 1;
        Ok(())
    }

    /// Drop one holder; hands the value back when it was the last one.
    fn release(&mut self) -> Option<T> {
        self.holders = self.holders.saturating_sub(1);
        if self.holders == 0 {
            self.value.take()
        } else {
            None
        }
    }
}
