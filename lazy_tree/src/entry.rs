//! Tree entries: one node of the lazy tree.
//!
//! An entry starts collapsed. Expanding it asks the host (through the bus)
//! to deliver the child records into the entry's [`ChildrenCell`]. Each list
//! landing in that cell starts a population round: a fresh child entry per
//! record, a render request for each, and a new [`ChildrenContainer`] that
//! replaces the previous one wholesale. Nothing is diffed or reused.
//!
//! ```text
//!  Collapsed ──expand──► Expanding ──cell set, round done──► Populated
//!      ▲                     │                                  │
//!      └──────collapse───────┴────────────collapse──────────────┘
//! ```

use crate::bus::{
    EventBus, ExpandToggleRequest, RecordElementRequest, SubRecordsRequest, TreeEvent, TreeRequest,
};
use crate::buttons::ButtonsContainer;
use crate::cell::{ChildrenCell, ReactiveCell};
use crate::config::TreeConfig;
use crate::error::TreeError;
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandState {
    #[default]
    Collapsed,
    /// Sub-records requested, waiting for the children cell.
    Expanding,
    Populated,
}

/// The expand control of one entry.
///
/// Hosts customise it while answering an expand-toggle override: hide it
/// for leaf records, or swap in their own element.
pub struct ExpandToggle<E> {
    visible: ReactiveCell<bool>,
    replacement: ReactiveCell<Option<E>>,
}

impl<E: Clone + 'static> ExpandToggle<E> {
    fn new(visible: bool) -> Self {
        Self {
            visible: ReactiveCell::new(visible),
            replacement: ReactiveCell::new(None),
        }
    }

    pub fn show(&self) {
        self.visible.set(true);
    }

    pub fn hide(&self) {
        self.visible.set(false);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get_cloned()
    }

    pub fn replace_with(&self, element: E) {
        self.replacement.set(Some(element));
    }

    pub fn restore_default(&self) {
        self.replacement.set(None);
    }

    pub fn replacement(&self) -> Option<E> {
        self.replacement.get_cloned()
    }

    pub fn react_visible(&self, callback: impl Fn(&bool) + 'static) {
        self.visible.react(callback);
    }

    pub fn react_replacement(&self, callback: impl Fn(&Option<E>) + 'static) {
        self.replacement.react(callback);
    }
}

/// One population round's worth of child entries.
///
/// Every round produces a new container with a new generation number.
pub struct ChildrenContainer<R, E> {
    generation: u64,
    entries: Rc<[TreeEntry<R, E>]>,
}

impl<R, E> Clone for ChildrenContainer<R, E> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<R: Clone + 'static, E: Clone + 'static> ChildrenContainer<R, E> {
    fn new(entries: Vec<TreeEntry<R, E>>) -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            entries: entries.into(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[TreeEntry<R, E>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> Vec<R> {
        self.entries
            .iter()
            .filter_map(|entry| entry.record().cloned())
            .collect()
    }
}

impl<R, E> fmt::Debug for ChildrenContainer<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildrenContainer")
            .field("generation", &self.generation)
            .field("len", &self.entries.len())
            .finish()
    }
}

struct EntryInner<R, E> {
    id: EntryId,
    record: Option<R>,
    index: usize,
    depth: usize,
    bus: EventBus<R, E>,
    children_cell: ChildrenCell<R>,
    children: ReactiveCell<Option<ChildrenContainer<R, E>>>,
    buttons: ButtonsContainer<E>,
    expand_toggle: ExpandToggle<E>,
    state: ReactiveCell<ExpandState>,
    element: ReactiveCell<Option<E>>,
    record_slot: Cell<bool>,
    indent: Cell<bool>,
    round: Cell<u64>,
    spawner: Rc<dyn LocalSpawn>,
    config: Rc<TreeConfig>,
    attachments: RefCell<Vec<Rc<dyn Any>>>,
}

/// Shared handle to one node of the tree. Clones refer to the same node.
pub struct TreeEntry<R, E> {
    inner: Rc<EntryInner<R, E>>,
}

impl<R, E> Clone for TreeEntry<R, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R, E> fmt::Debug for TreeEntry<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeEntry")
            .field("id", &self.inner.id)
            .field("index", &self.inner.index)
            .field("depth", &self.inner.depth)
            .field("root", &self.inner.record.is_none())
            .finish()
    }
}

impl<R, E> TreeEntry<R, E>
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) fn new_root(spawner: Rc<dyn LocalSpawn>, config: Rc<TreeConfig>) -> Self {
        Self::build(None, 0, 0, spawner, config)
    }

    fn new_child(&self, record: R, index: usize) -> Self {
        Self::build(
            Some(record),
            index,
            self.inner.depth + 1,
            Rc::clone(&self.inner.spawner),
            Rc::clone(&self.inner.config),
        )
    }

    fn build(
        record: Option<R>,
        index: usize,
        depth: usize,
        spawner: Rc<dyn LocalSpawn>,
        config: Rc<TreeConfig>,
    ) -> Self {
        let entry = Self {
            inner: Rc::new(EntryInner {
                id: EntryId(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed)),
                record,
                index,
                depth,
                bus: EventBus::new(),
                children_cell: ChildrenCell::new(),
                children: ReactiveCell::new(None),
                buttons: ButtonsContainer::new(),
                expand_toggle: ExpandToggle::new(config.show_expand_toggle),
                state: ReactiveCell::new(ExpandState::Collapsed),
                element: ReactiveCell::new(None),
                record_slot: Cell::new(true),
                indent: Cell::new(true),
                round: Cell::new(0),
                spawner,
                config,
                attachments: RefCell::new(Vec::new()),
            }),
        };

        let weak = Rc::downgrade(&entry.inner);
        entry.inner.children_cell.react(move |records| {
            let (Some(records), Some(inner)) = (records, weak.upgrade()) else {
                return;
            };
            TreeEntry { inner }.schedule_population(records.clone());
        });

        entry
    }

    pub fn id(&self) -> EntryId {
        self.inner.id
    }

    /// The record this entry displays; `None` for the root.
    pub fn record(&self) -> Option<&R> {
        self.inner.record.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.inner.record.is_none()
    }

    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn bus(&self) -> &EventBus<R, E> {
        &self.inner.bus
    }

    pub fn children_cell(&self) -> &ChildrenCell<R> {
        &self.inner.children_cell
    }

    pub fn buttons(&self) -> &ButtonsContainer<E> {
        &self.inner.buttons
    }

    pub fn expand_toggle(&self) -> &ExpandToggle<E> {
        &self.inner.expand_toggle
    }

    pub fn config(&self) -> &TreeConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ExpandState {
        self.inner.state.get_cloned()
    }

    pub fn is_expanded(&self) -> bool {
        self.state() != ExpandState::Collapsed
    }

    pub fn react_state(&self, callback: impl Fn(&ExpandState) + 'static) {
        self.inner.state.react(callback);
    }

    /// The currently rendered children, if any.
    pub fn children(&self) -> Option<ChildrenContainer<R, E>> {
        self.inner.children.get_cloned()
    }

    pub fn react_children(&self, callback: impl Fn(&Option<ChildrenContainer<R, E>>) + 'static) {
        self.inner.children.react(callback);
    }

    /// The element the host produced for this entry's record.
    pub fn element(&self) -> Option<E> {
        self.inner.element.get_cloned()
    }

    pub fn react_element(&self, callback: impl Fn(&Option<E>) + 'static) {
        self.inner.element.react(callback);
    }

    pub fn has_record_slot(&self) -> bool {
        self.inner.record_slot.get()
    }

    pub fn has_indent(&self) -> bool {
        self.inner.indent.get()
    }

    pub fn detach_record_slot(&self) {
        self.inner.record_slot.set(false);
    }

    pub fn detach_indent(&self) {
        self.inner.indent.set(false);
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The entry's value of type `T`, created by `init` on first use.
    ///
    /// Every later call gets the same value back, so views can subscribe to
    /// the entry's cells once and share what they mirror.
    pub fn attachment<T: 'static>(&self, init: impl FnOnce(&Self) -> T) -> Rc<T> {
        let existing = self
            .inner
            .attachments
            .borrow()
            .iter()
            .find_map(|attachment| Rc::clone(attachment).downcast::<T>().ok());
        if let Some(existing) = existing {
            return existing;
        }
        let created = Rc::new(init(self));
        self.inner.attachments.borrow_mut().push(Rc::clone(&created) as Rc<dyn Any>);
        created
    }

    /// Expand toggle handler: collapse when expanded, otherwise start an
    /// expand in the background.
    pub fn toggle(&self) {
        if self.is_expanded() {
            self.collapse();
        } else {
            let entry = self.clone();
            self.spawn("expand", async move { entry.expand().await });
        }
    }

    /// Ask the host for this entry's sub-records.
    pub async fn expand(&self) {
        self.request_sub_records(TreeEvent::Expand).await;
    }

    /// Tear down the rendered children and buttons.
    ///
    /// The children cell keeps its last list; the next expand asks the host
    /// again anyway.
    pub fn collapse(&self) {
        self.invalidate_rounds();
        self.inner.state.set(ExpandState::Collapsed);
        self.inner.children.set(None);
        self.inner.buttons.clear();
    }

    /// Ask the host for fresh sub-records without collapsing first.
    pub async fn reload_sub_records(&self) {
        self.request_sub_records(TreeEvent::Reload).await;
    }

    pub fn schedule_reload(&self) {
        let entry = self.clone();
        self.spawn("reload", async move { entry.reload_sub_records().await });
    }

    pub(crate) async fn request_sub_records(&self, event: TreeEvent) {
        let round = self.inner.round.get();
        self.inner.state.set(ExpandState::Expanding);
        let request = TreeRequest::SubRecords(SubRecordsRequest {
            event,
            record: self.inner.record.clone(),
            children: self.inner.children_cell.clone(),
            buttons: self.inner.buttons.clone(),
        });
        if let Err(error) = self.inner.bus.trigger(request).await {
            log::warn!("{} sub-records request failed: {error}", self.id());
        }

        // Nothing was delivered: a reload keeps showing the old children.
        let undelivered = self.inner.round.get() == round;
        if undelivered && self.state() == ExpandState::Expanding && self.children().is_some() {
            log::debug!("{} kept its children, no new records arrived", self.id());
            self.inner.state.set(ExpandState::Populated);
        }
    }

    pub(crate) fn spawn(&self, task: &'static str, future: impl Future<Output = ()> + 'static) {
        if let Err(source) = self.inner.spawner.spawn_local(future) {
            log::error!("{}: {}", self.id(), TreeError::Spawn { task, source });
        }
    }

    fn invalidate_rounds(&self) {
        self.inner.round.set(self.inner.round.get() + 1);
    }

    fn is_current(&self, round: u64) -> bool {
        !self.inner.config.discards_stale_populations() || self.inner.round.get() == round
    }

    fn is_stale(&self, round: u64) -> bool {
        let stale = !self.is_current(round);
        if stale {
            log::debug!("{} dropped stale population round {round}", self.id());
        }
        stale
    }

    fn schedule_population(&self, records: Vec<R>) {
        if self.state() == ExpandState::Collapsed && self.inner.config.discards_stale_populations() {
            log::debug!("{} is collapsed, keeping {} records unrendered", self.id(), records.len());
            return;
        }
        self.invalidate_rounds();
        let round = self.inner.round.get();
        let entry = self.clone();
        self.spawn("population", async move { entry.populate(round, records).await });
    }

    async fn populate(&self, round: u64, records: Vec<R>) {
        if self.is_stale(round) {
            return;
        }
        let mut entries = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let child = self.new_child(record.clone(), index);

            let request = TreeRequest::RecordElement(RecordElementRequest {
                event: TreeEvent::Populate,
                record: record.clone(),
                entry: child.clone(),
                parent: self.clone(),
            });
            let rendered = self.inner.bus.trigger(request).await;
            if self.is_stale(round) {
                return;
            }
            let element = match rendered {
                Ok(Some(element)) => element,
                Ok(None) => {
                    log::trace!("{} skipped record {index}: no element", self.id());
                    continue;
                }
                Err(error) => {
                    log::warn!("{} skipped record {index}: {error}", self.id());
                    continue;
                }
            };
            child.inner.element.set(Some(element));

            let request = TreeRequest::ExpandToggle(ExpandToggleRequest {
                event: TreeEvent::Populate,
                entry: child.clone(),
                record,
            });
            if let Err(error) = self.inner.bus.trigger(request).await {
                log::warn!("{} expand toggle override failed: {error}", child.id());
            }
            if self.is_stale(round) {
                return;
            }

            child.inner.bus.relay_into(&self.inner.bus);
            entries.push(child);
        }

        if self.is_stale(round) {
            return;
        }
        log::debug!("{} populated {} children (round {round})", self.id(), entries.len());
        self.inner.children.set(Some(ChildrenContainer::new(entries)));
        self.inner.state.set(ExpandState::Populated);
    }
}
