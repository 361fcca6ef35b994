use crate::bus::{
    EventBus, ExpandToggleRequest, RecordElementRequest, SubRecordsRequest, Topic, TreeRequest,
};
use crate::error::TreeError;
use std::rc::Rc;

/// Host-side answers to the tree's requests.
///
/// The tree never looks inside `Record` or `Element`; it only passes them
/// between these methods and its entries. Errors are logged by the tree and
/// treated as "no answer".
#[allow(async_fn_in_trait)]
pub trait TreeStrategy: 'static {
    type Record: Clone + 'static;
    type Element: Clone + 'static;

    /// Produce the element displaying `request.record`, or `None` to leave
    /// the record out of the tree.
    async fn record_element(
        &self,
        request: RecordElementRequest<Self::Record, Self::Element>,
    ) -> anyhow::Result<Option<Self::Element>>;

    /// Deliver the children of `request.record` through
    /// `request.children.set(..)`, now or later.
    async fn sub_records_state_update(
        &self,
        request: SubRecordsRequest<Self::Record, Self::Element>,
    ) -> anyhow::Result<()>;

    /// Adjust the expand toggle of a freshly rendered entry.
    async fn expand_toggle_override(
        &self,
        request: ExpandToggleRequest<Self::Record, Self::Element>,
    ) -> anyhow::Result<()> {
        let _ = request;
        Ok(())
    }
}

/// Attach one listener per topic to `bus`, each forwarding to `strategy`.
pub(crate) fn attach<S: TreeStrategy>(strategy: Rc<S>, bus: &EventBus<S::Record, S::Element>) {
    bus.listen_to(Topic::RecordElementRequested, {
        let strategy = Rc::clone(&strategy);
        move |request| {
            let strategy = Rc::clone(&strategy);
            async move {
                let TreeRequest::RecordElement(request) = request else {
                    return Ok(None);
                };
                strategy
                    .record_element(request)
                    .await
                    .map_err(|cause| TreeError::listener(Topic::RecordElementRequested, cause))
            }
        }
    });

    bus.listen_to(Topic::SubRecordsStateUpdateRequested, {
        let strategy = Rc::clone(&strategy);
        move |request| {
            let strategy = Rc::clone(&strategy);
            async move {
                let TreeRequest::SubRecords(request) = request else {
                    return Ok(None);
                };
                strategy
                    .sub_records_state_update(request)
                    .await
                    .map(|()| None)
                    .map_err(|cause| {
                        TreeError::listener(Topic::SubRecordsStateUpdateRequested, cause)
                    })
            }
        }
    });

    bus.listen_to(Topic::ExpandToggleOverride, move |request| {
        let strategy = Rc::clone(&strategy);
        async move {
            let TreeRequest::ExpandToggle(request) = request else {
                return Ok(None);
            };
            strategy
                .expand_toggle_override(request)
                .await
                .map(|()| None)
                .map_err(|cause| TreeError::listener(Topic::ExpandToggleOverride, cause))
        }
    });
}
