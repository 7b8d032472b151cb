//! Class hierarchies rooted at a synthetic Root.
//!
//! # The Structure
//!
//! Categories form a directed graph with edges pointing parent -> child.
//! A single synthetic Root sits above every top-level category:
//!
//! ```text
//!              Root
//!            /      \
//!       vehicle    animal
//!        /   \       |
//!      car   bike   cat
//! ```
//!
//! The graph may be a DAG: a node with several parents inherits all of them.
//! The Root carries no label and never appears in a label matrix.
//!
//! # Module Overview
//!
//! - [`Node`]: node identifier with an explicit [`Node::Root`] tag
//! - [`Hierarchy`]: the graph itself, keyed by any hashable label type
//! - [`AncestorSets`]: per-column ancestor lists for integer-keyed
//!   hierarchies, used by [`crate::fill`]
//!
//! ```text
//! Node      │ Ancestor set
//! ──────────┼──────────────────
//! car       │ {car, vehicle}
//! vehicle   │ {vehicle}
//! cat       │ {cat, animal}
//! ```

mod ancestors;
mod graph;
mod node;

pub use ancestors::AncestorSets;
pub use graph::Hierarchy;
pub use node::{Node, ROOT};
