//! Per-entry request bus.
//!
//! Every [`TreeEntry`] owns one [`EventBus`]. Requests a node raises are
//! triggered on its own bus; the parent wired a relay onto that bus when it
//! created the node, so the request is re-triggered unchanged one level up,
//! and so on until the controller's bus hands it to the host strategy.
//!
//! ```text
//!  entry (depth 3) ──relay──► entry (depth 2) ──relay──► ... ──► root entry
//!                                                                   │ relay
//!                                                                   ▼
//!                                                  TreeRoot bus ──► TreeStrategy
//! ```

use crate::buttons::ButtonsContainer;
use crate::cell::ChildrenCell;
use crate::entry::TreeEntry;
use crate::error::{TreeError, TreeResult};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// The three request kinds a tree raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    RecordElementRequested,
    SubRecordsStateUpdateRequested,
    ExpandToggleOverride,
}

impl Topic {
    pub const ALL: [Topic; 3] = [
        Topic::RecordElementRequested,
        Topic::SubRecordsStateUpdateRequested,
        Topic::ExpandToggleOverride,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Topic::RecordElementRequested => "RECORD_ELEMENT_REQUESTED",
            Topic::SubRecordsStateUpdateRequested => "SUB_RECORDS_STATE_UPDATE_REQUESTED",
            Topic::ExpandToggleOverride => "EXPAND_TOGGLE_OVERRIDE",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What caused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// The controller was reset.
    Reset,
    /// The user switched an expand toggle on.
    Expand,
    /// Sub-records were reloaded programmatically.
    Reload,
    /// An entry is populating its children.
    Populate,
}

/// Ask the host for the element displaying `record`.
///
/// `entry` is the freshly created child, `parent` the entry populating it.
#[derive(Clone, Debug)]
pub struct RecordElementRequest<R, E> {
    pub event: TreeEvent,
    pub record: R,
    pub entry: TreeEntry<R, E>,
    pub parent: TreeEntry<R, E>,
}

/// Ask the host to (re)load the children of `record` into `children`.
///
/// `record` is `None` for the root.
#[derive(Clone, Debug)]
pub struct SubRecordsRequest<R, E> {
    pub event: TreeEvent,
    pub record: Option<R>,
    pub children: ChildrenCell<R>,
    pub buttons: ButtonsContainer<E>,
}

/// Let the host adjust the expand toggle of a freshly rendered entry.
#[derive(Clone, Debug)]
pub struct ExpandToggleRequest<R, E> {
    pub event: TreeEvent,
    pub entry: TreeEntry<R, E>,
    pub record: R,
}

#[derive(Clone, Debug)]
pub enum TreeRequest<R, E> {
    RecordElement(RecordElementRequest<R, E>),
    SubRecords(SubRecordsRequest<R, E>),
    ExpandToggle(ExpandToggleRequest<R, E>),
}

impl<R, E> TreeRequest<R, E> {
    pub fn topic(&self) -> Topic {
        match self {
            TreeRequest::RecordElement(_) => Topic::RecordElementRequested,
            TreeRequest::SubRecords(_) => Topic::SubRecordsStateUpdateRequested,
            TreeRequest::ExpandToggle(_) => Topic::ExpandToggleOverride,
        }
    }

    pub fn event(&self) -> TreeEvent {
        match self {
            TreeRequest::RecordElement(request) => request.event,
            TreeRequest::SubRecords(request) => request.event,
            TreeRequest::ExpandToggle(request) => request.event,
        }
    }
}

type Listener<R, E> = Rc<dyn Fn(TreeRequest<R, E>) -> LocalBoxFuture<'static, TreeResult<Option<E>>>>;

/// Topic-keyed publish/subscribe with awaited, possibly answering, listeners.
///
/// Cloning is cheap; clones share the listener table.
pub struct EventBus<R, E> {
    listeners: Rc<RefCell<HashMap<Topic, Vec<Listener<R, E>>>>>,
}

impl<R, E> Clone for EventBus<R, E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<R, E> EventBus<R, E>
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Register `handler` for `topic`. Handlers run in registration order.
    pub fn listen_to<F, Fut>(&self, topic: Topic, handler: F)
    where
        F: Fn(TreeRequest<R, E>) -> Fut + 'static,
        Fut: Future<Output = TreeResult<Option<E>>> + 'static,
    {
        let listener: Listener<R, E> = Rc::new(move |request| handler(request).boxed_local());
        self.listeners
            .borrow_mut()
            .entry(topic)
            .or_default()
            .push(listener);
    }

    /// Run every listener of the request's topic, one after another.
    ///
    /// The first `Some` answer wins. A failing listener does not stop the
    /// ones registered after it; the first failure is returned once all of
    /// them ran.
    pub async fn trigger(&self, request: TreeRequest<R, E>) -> TreeResult<Option<E>> {
        let topic = request.topic();
        let listeners = self
            .listeners
            .borrow()
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        let mut answer = None;
        let mut failure = None;
        for listener in listeners {
            match listener(request.clone()).await {
                Ok(value) => {
                    if answer.is_none() {
                        answer = value;
                    }
                }
                Err(error) if failure.is_none() => failure = Some(error),
                Err(error) => log::warn!("additional {topic} listener failure: {error}"),
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(answer),
        }
    }

    /// Re-trigger every request of this bus on `parent`, unchanged.
    ///
    /// Failures coming back from `parent` are logged and swallowed here, so
    /// they never reach the code that triggered on this bus.
    pub fn relay_into(&self, parent: &EventBus<R, E>) {
        for topic in Topic::ALL {
            let parent = parent.clone();
            self.listen_to(topic, move |request| {
                let parent = parent.clone();
                async move {
                    match parent.trigger(request).await {
                        Ok(answer) => Ok(answer),
                        Err(error) => {
                            log::warn!("relay dropped failed request: {error}");
                            Ok(None)
                        }
                    }
                }
            });
        }
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.borrow().get(&topic).map_or(0, Vec::len)
    }
}

impl<R, E> Default for EventBus<R, E>
where
    R: Clone + 'static,
    E: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> fmt::Debug for EventBus<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut map = f.debug_map();
        for topic in Topic::ALL {
            map.entry(&topic.name(), &listeners.get(&topic).map_or(0, Vec::len));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Bus = EventBus<&'static str, String>;

    fn sub_records(event: TreeEvent) -> TreeRequest<&'static str, String> {
        TreeRequest::SubRecords(SubRecordsRequest {
            event,
            record: Some("scope"),
            children: ChildrenCell::new(),
            buttons: ButtonsContainer::new(),
        })
    }

    fn answering(bus: &Bus, topic: Topic, answer: Option<&'static str>) {
        bus.listen_to(topic, move |_| async move { Ok(answer.map(str::to_string)) });
    }

    fn failing(bus: &Bus, topic: Topic) {
        bus.listen_to(topic, move |_| async move {
            Err(TreeError::listener(topic, anyhow::anyhow!("boom")))
        });
    }

    #[tokio::test]
    async fn trigger_without_listeners_answers_nothing() {
        let bus = Bus::new();
        let answer = bus.trigger(sub_records(TreeEvent::Expand)).await.unwrap();
        assert_eq!(answer, None);
    }

    #[tokio::test]
    async fn listeners_run_in_registration_order_and_first_answer_wins() {
        let bus = Bus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            bus.listen_to(Topic::SubRecordsStateUpdateRequested, move |_| {
                order.borrow_mut().push(name);
                async move { Ok(if name == "a" { None } else { Some(name.to_string()) }) }
            });
        }

        let answer = bus.trigger(sub_records(TreeEvent::Expand)).await.unwrap();

        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(answer.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn only_listeners_of_the_request_topic_run() {
        let bus = Bus::new();
        answering(&bus, Topic::ExpandToggleOverride, Some("wrong"));

        let answer = bus.trigger(sub_records(TreeEvent::Expand)).await.unwrap();

        assert_eq!(answer, None);
        assert_eq!(bus.listener_count(Topic::ExpandToggleOverride), 1);
        assert_eq!(bus.listener_count(Topic::SubRecordsStateUpdateRequested), 0);
    }

    #[tokio::test]
    async fn failure_is_reported_after_later_listeners_ran() {
        let bus = Bus::new();
        let reached = Rc::new(RefCell::new(false));
        failing(&bus, Topic::SubRecordsStateUpdateRequested);
        bus.listen_to(Topic::SubRecordsStateUpdateRequested, {
            let reached = Rc::clone(&reached);
            move |_| {
                *reached.borrow_mut() = true;
                async { Ok(None) }
            }
        });

        let result = bus.trigger(sub_records(TreeEvent::Expand)).await;

        assert!(*reached.borrow());
        assert!(matches!(
            result,
            Err(TreeError::Listener { topic: Topic::SubRecordsStateUpdateRequested, .. })
        ));
    }

    #[tokio::test]
    async fn relay_forwards_identical_requests() {
        let child = Bus::new();
        let parent = Bus::new();
        child.relay_into(&parent);

        let seen = Rc::new(RefCell::new(Vec::new()));
        parent.listen_to(Topic::SubRecordsStateUpdateRequested, {
            let seen = Rc::clone(&seen);
            move |request| {
                seen.borrow_mut().push(request);
                async { Ok(Some("answered".to_string())) }
            }
        });

        let request = sub_records(TreeEvent::Reload);
        let TreeRequest::SubRecords(original) = request.clone() else {
            unreachable!()
        };
        let answer = child.trigger(request).await.unwrap();

        assert_eq!(answer.as_deref(), Some("answered"));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let TreeRequest::SubRecords(relayed) = &seen[0] else {
            panic!("relayed request changed topic");
        };
        assert_eq!(relayed.event, TreeEvent::Reload);
        assert_eq!(relayed.record, Some("scope"));
        assert!(relayed.children.ptr_eq(&original.children));
        assert!(relayed.buttons.ptr_eq(&original.buttons));
    }

    #[tokio::test]
    async fn relay_swallows_parent_failures() {
        let child = Bus::new();
        let parent = Bus::new();
        child.relay_into(&parent);
        failing(&parent, Topic::SubRecordsStateUpdateRequested);

        let answer = child.trigger(sub_records(TreeEvent::Expand)).await;

        assert!(matches!(answer, Ok(None)));
    }

    #[test]
    fn relay_wires_one_listener_per_topic() {
        let child = Bus::new();
        child.relay_into(&Bus::new());
        for topic in Topic::ALL {
            assert_eq!(child.listener_count(topic), 1);
        }
    }

    #[test]
    fn topics_display_wire_names() {
        assert_eq!(Topic::RecordElementRequested.to_string(), "RECORD_ELEMENT_REQUESTED");
        assert_eq!(Topic::ExpandToggleOverride.name(), "EXPAND_TOGGLE_OVERRIDE");
    }
}
