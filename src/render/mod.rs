//! Traversal engines and diagram descriptions.
//!
//! - `tree`: cycle-safe indented text tree
//! - `focus`: bounded neighborhood expansion around a seed
//! - `view`: node/edge views with DOT, JSON and text output

pub mod focus;
pub mod tree;
pub mod view;

pub use focus::{expand_focus, FocusEdge, FocusRelation, FocusedSubgraph, RelationIndex, ResolvedCatalog};
pub use tree::{TextTree, TreeDirection, TreeLine};
pub use view::{class_view, focus_view, full_view, reachable_view, GraphView, ViewEdge, ViewNode};
