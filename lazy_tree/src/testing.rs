//! Scripted host and executor harness shared by the unit tests.

use crate::bus::{ExpandToggleRequest, RecordElementRequest, SubRecordsRequest};
use crate::cell::ChildrenCell;
use crate::config::TreeConfig;
use crate::entry::{ChildrenContainer, TreeEntry};
use crate::root::TreeRoot;
use crate::strategy::TreeStrategy;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

type Record = &'static str;
type Key = Option<Record>;
pub(crate) type Entry = TreeEntry<Record, String>;

/// A host whose answers are set up per record before the tree runs.
///
/// `None` keys address the root.
#[derive(Default)]
pub(crate) struct ScriptedHost {
    children: RefCell<HashMap<Key, Vec<Record>>>,
    hidden: HashSet<Record>,
    failing_render: HashSet<Record>,
    failing_update: HashSet<Key>,
    deferred: HashSet<Key>,
    leaves: HashSet<Record>,
    custom_toggles: HashSet<Record>,
    buttons: HashMap<Key, Record>,
    gated: RefCell<HashSet<Record>>,
    gates: RefCell<Vec<(Record, oneshot::Sender<()>)>>,
    pending: RefCell<Vec<(Key, ChildrenCell<Record>)>>,
    update_requests: RefCell<HashMap<Key, usize>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(self, key: Key, records: &[Record]) -> Self {
        self.set_children(key, records);
        self
    }

    pub fn hide(mut self, record: Record) -> Self {
        self.hidden.insert(record);
        self
    }

    pub fn fail_render(mut self, record: Record) -> Self {
        self.failing_render.insert(record);
        self
    }

    pub fn fail_update(mut self, key: Key) -> Self {
        self.failing_update.insert(key);
        self
    }

    pub fn with_button(mut self, key: Key, label: Record) -> Self {
        self.buttons.insert(key, label);
        self
    }

    /// Keep the children cells of `key` until [`ScriptedHost::resolve`].
    pub fn defer(mut self, key: Key) -> Self {
        self.deferred.insert(key);
        self
    }

    pub fn leaf(mut self, record: Record) -> Self {
        self.leaves.insert(record);
        self
    }

    pub fn custom_toggle(mut self, record: Record) -> Self {
        self.custom_toggles.insert(record);
        self
    }

    /// Block rendering of `record` until [`ScriptedHost::open_render`].
    pub fn gate_render(self, record: Record) -> Self {
        self.gated.borrow_mut().insert(record);
        self
    }

    pub fn set_children(&self, key: Key, records: &[Record]) {
        self.children.borrow_mut().insert(key, records.to_vec());
    }

    /// Answer the oldest deferred request for `key`.
    pub fn resolve(&self, key: Key, records: &[Record]) {
        let cell = {
            let mut pending = self.pending.borrow_mut();
            let position = pending
                .iter()
                .position(|(pending_key, _)| *pending_key == key)
                .expect("no deferred request for key");
            pending.remove(position).1
        };
        cell.set(records.to_vec());
    }

    pub fn update_requests(&self, key: Key) -> usize {
        self.update_requests.borrow().get(&key).copied().unwrap_or(0)
    }

    pub fn open_render(&self, record: Record) {
        self.gated.borrow_mut().remove(record);
        let opened: Vec<_> = {
            let mut gates = self.gates.borrow_mut();
            let (opened, waiting): (Vec<_>, Vec<_>) =
                gates.drain(..).partition(|(gated, _)| *gated == record);
            *gates = waiting;
            opened
        };
        for (_, sender) in opened {
            let _ = sender.send(());
        }
    }
}

impl TreeStrategy for ScriptedHost {
    type Record = Record;
    type Element = String;

    async fn record_element(
        &self,
        request: RecordElementRequest<Record, String>,
    ) -> anyhow::Result<Option<String>> {
        let record = request.record;
        if self.gated.borrow().contains(record) {
            let (sender, receiver) = oneshot::channel();
            self.gates.borrow_mut().push((record, sender));
            let _ = receiver.await;
        }
        if self.failing_render.contains(record) {
            anyhow::bail!("cannot render {record}");
        }
        if self.hidden.contains(record) {
            return Ok(None);
        }
        Ok(Some(record.to_string()))
    }

    async fn sub_records_state_update(
        &self,
        request: SubRecordsRequest<Record, String>,
    ) -> anyhow::Result<()> {
        let key = request.record;
        *self.update_requests.borrow_mut().entry(key).or_default() += 1;
        if let Some(label) = self.buttons.get(&key) {
            request.buttons.attach(label.to_string());
        }
        if self.failing_update.contains(&key) {
            anyhow::bail!("no records for {key:?}");
        }
        if self.deferred.contains(&key) {
            self.pending.borrow_mut().push((key, request.children));
            return Ok(());
        }
        let records = self.children.borrow().get(&key).cloned().unwrap_or_default();
        request.children.set(records);
        Ok(())
    }

    async fn expand_toggle_override(
        &self,
        request: ExpandToggleRequest<Record, String>,
    ) -> anyhow::Result<()> {
        let toggle = request.entry.expand_toggle();
        if self.leaves.contains(request.record) {
            toggle.hide();
        }
        if self.custom_toggles.contains(request.record) {
            toggle.replace_with(format!("toggle:{}", request.record));
        }
        Ok(())
    }
}

/// A tree driven by a single-threaded pool the test steps by hand.
pub(crate) struct Harness {
    pub pool: LocalPool,
    pub tree: TreeRoot<ScriptedHost>,
}

impl Harness {
    pub fn new(host: ScriptedHost) -> Self {
        Self::with_config(host, TreeConfig::default())
    }

    pub fn with_config(host: ScriptedHost, config: TreeConfig) -> Self {
        let pool = LocalPool::new();
        let tree = TreeRoot::builder(host)
            .config(config)
            .spawner(pool.spawner())
            .build()
            .expect("tree builds");
        Self { pool, tree }
    }

    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn reset(&mut self) {
        self.tree.schedule_reset();
        self.settle();
    }

    pub fn toggle(&mut self, entry: &Entry) {
        entry.toggle();
        self.settle();
    }

    /// Follow rendered children by record, starting at the root.
    pub fn entry(&self, path: &[&str]) -> Entry {
        let mut current = self.tree.root().clone();
        for record in path {
            let children = current.children().expect("entry has rendered children");
            current = children
                .entries()
                .iter()
                .find(|entry| entry.record().is_some_and(|r| r == record))
                .cloned()
                .expect("record is rendered");
        }
        current
    }

    /// Rendered elements, two spaces of indent per level below the top.
    pub fn rows(&self) -> Vec<String> {
        let mut rows = Vec::new();
        collect_rows(self.tree.root(), &mut rows);
        rows
    }

    /// Count the containers published on `entry` from now on.
    pub fn count_containers(&self, entry: &Entry) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        entry.react_children({
            let count = Rc::clone(&count);
            move |children: &Option<ChildrenContainer<Record, String>>| {
                if children.is_some() {
                    count.set(count.get() + 1);
                }
            }
        });
        count
    }
}

fn collect_rows(entry: &Entry, rows: &mut Vec<String>) {
    let Some(children) = entry.children() else {
        return;
    };
    for child in children.entries() {
        let label = child.element().unwrap_or_default();
        rows.push(format!("{}{label}", "  ".repeat(child.depth() - 1)));
        collect_rows(child, rows);
    }
}
