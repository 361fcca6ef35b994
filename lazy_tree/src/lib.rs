//! Lazy, recursive tree view core.
//!
//! Entries fetch their child records only when expanded, and every request
//! an entry raises travels up the chain of per-entry buses to a single
//! [`TreeStrategy`] owned by the [`TreeRoot`]. The crate knows nothing about
//! the DOM: records and elements are opaque type parameters, and async work
//! runs on whatever [`futures::task::LocalSpawn`] the host hands in.
//!
//! # Examples
//!
//! ```no_run
//! use futures::executor::LocalPool;
//! use lazy_tree::{RecordElementRequest, SubRecordsRequest, TreeRoot, TreeStrategy};
//!
//! struct Numbers;
//!
//! impl TreeStrategy for Numbers {
//!     type Record = u32;
//!     type Element = String;
//!
//!     async fn record_element(
//!         &self,
//!         request: RecordElementRequest<u32, String>,
//!     ) -> anyhow::Result<Option<String>> {
//!         Ok(Some(request.record.to_string()))
//!     }
//!
//!     async fn sub_records_state_update(
//!         &self,
//!         request: SubRecordsRequest<u32, String>,
//!     ) -> anyhow::Result<()> {
//!         let base = request.record.unwrap_or(0) * 10;
//!         request.children.set((1..=3).map(|n| base + n).collect());
//!         Ok(())
//!     }
//! }
//!
//! let mut pool = LocalPool::new();
//! let tree = TreeRoot::builder(Numbers).spawner(pool.spawner()).build()?;
//! tree.schedule_reset();
//! pool.run_until_stalled();
//! assert!(tree.is_mounted());
//! # Ok::<(), lazy_tree::TreeError>(())
//! ```

pub mod bus;
pub mod buttons;
pub mod cell;
pub mod config;
pub mod entry;
pub mod error;
pub mod root;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use bus::{
    EventBus, ExpandToggleRequest, RecordElementRequest, SubRecordsRequest, Topic, TreeEvent,
    TreeRequest,
};
pub use buttons::ButtonsContainer;
pub use cell::{ChildrenCell, ReactiveCell};
pub use config::{StalePopulationPolicy, TreeConfig};
pub use entry::{ChildrenContainer, EntryId, ExpandState, ExpandToggle, TreeEntry};
pub use error::{TreeError, TreeResult};
pub use root::{TreeRoot, TreeRootBuilder};
pub use strategy::TreeStrategy;
