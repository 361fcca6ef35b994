//! The tree root controller.
//!
//! [`TreeRoot`] owns the invisible root entry and is the only place the
//! host strategy is attached. Requests from any depth arrive here through
//! the per-level relays and are answered by the strategy.

use crate::bus::{EventBus, TreeEvent};
use crate::cell::ReactiveCell;
use crate::config::{StalePopulationPolicy, TreeConfig};
use crate::entry::TreeEntry;
use crate::error::{TreeError, TreeResult};
use crate::strategy::{self, TreeStrategy};
use futures::task::LocalSpawn;
use std::rc::Rc;

type Entry<S> = TreeEntry<<S as TreeStrategy>::Record, <S as TreeStrategy>::Element>;
type Bus<S> = EventBus<<S as TreeStrategy>::Record, <S as TreeStrategy>::Element>;

pub struct TreeRoot<S: TreeStrategy> {
    root: Entry<S>,
    bus: Bus<S>,
    strategy: Rc<S>,
    mounted: ReactiveCell<bool>,
}

impl<S: TreeStrategy> TreeRoot<S> {
    pub fn builder(strategy: S) -> TreeRootBuilder<S> {
        TreeRootBuilder::new(strategy)
    }

    fn new(strategy: S, spawner: Rc<dyn LocalSpawn>, config: TreeConfig) -> Self {
        let root = TreeEntry::new_root(spawner, Rc::new(config));
        // The root is a pure container: no record row, no indent.
        root.detach_record_slot();
        root.detach_indent();

        let bus = EventBus::new();
        root.bus().relay_into(&bus);
        let strategy = Rc::new(strategy);
        strategy::attach(Rc::clone(&strategy), &bus);

        Self {
            root,
            bus,
            strategy,
            mounted: ReactiveCell::new(false),
        }
    }

    /// Ask the host for the top-level records, then mount the tree.
    pub async fn reset(&self) {
        reset_root(&self.root, &self.mounted).await;
    }

    /// [`TreeRoot::reset`] for synchronous handlers.
    pub fn schedule_reset(&self) {
        let root = self.root.clone();
        let mounted = self.mounted.clone();
        self.root.spawn("reset", async move { reset_root(&root, &mounted).await });
    }

    pub fn root(&self) -> &Entry<S> {
        &self.root
    }

    /// The outermost bus. Extra listeners attached here observe every
    /// request of the tree after the strategy answered it.
    pub fn bus(&self) -> &Bus<S> {
        &self.bus
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &TreeConfig {
        self.root.config()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get_cloned()
    }

    pub fn react_mounted(&self, callback: impl Fn(&bool) + 'static) {
        self.mounted.react(callback);
    }
}

async fn reset_root<R, E>(root: &TreeEntry<R, E>, mounted: &ReactiveCell<bool>)
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    root.request_sub_records(TreeEvent::Reset).await;
    mounted.set(true);
}

/// Fluent configuration for [`TreeRoot`].
pub struct TreeRootBuilder<S> {
    strategy: S,
    config: TreeConfig,
    spawner: Option<Rc<dyn LocalSpawn>>,
}

impl<S: TreeStrategy> TreeRootBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            config: TreeConfig::default(),
            spawner: None,
        }
    }

    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn indent_px(mut self, indent_px: u32) -> Self {
        self.config.indent_px = indent_px;
        self
    }

    pub fn show_expand_toggle(mut self, show: bool) -> Self {
        self.config.show_expand_toggle = show;
        self
    }

    pub fn stale_populations(mut self, policy: StalePopulationPolicy) -> Self {
        self.config.stale_populations = policy;
        self
    }

    /// The executor that runs expands, reloads and population rounds.
    pub fn spawner(mut self, spawner: impl LocalSpawn + 'static) -> Self {
        self.spawner = Some(Rc::new(spawner));
        self
    }

    pub fn build(self) -> TreeResult<TreeRoot<S>> {
        let spawner = self.spawner.ok_or(TreeError::MissingPart("spawner"))?;
        Ok(TreeRoot::new(self.strategy, spawner, self.config))
    }
}
