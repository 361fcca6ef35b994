//! MoonZoon rendering for [`lazy_tree`].
//!
//! ```ignore
//! let tree = TreeRoot::builder(MyStrategy::new())
//!     .spawner(TaskSpawner)
//!     .build()?;
//! tree.schedule_reset();
//! let element = tree_view(&tree);
//! ```

mod mirror;
mod spawner;
pub mod styles;
pub mod tokens;
mod view;

pub use spawner::TaskSpawner;
pub use styles::TreeStylesheet;
pub use view::{RenderElement, tree_view};
