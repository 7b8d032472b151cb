//! # hierscore
//!
//! Hierarchical precision, recall and F-beta for multi-label classification
//! over a class hierarchy.
//!
//! Flat metrics treat labels as independent. Here every assigned label is
//! first propagated to all of its ancestors, so predicting `vehicle` for a
//! `car` still earns partial credit.
//!
//! Pipeline:
//!
//! ```text
//! labels + Hierarchy<L> ──LabelSpace──▶ (LabelMatrix, LabelMatrix, Hierarchy<usize>)
//!                                          │ fill_ancestors (each matrix)
//!                                          ▼
//!                                   OverlapCounts ──▶ hP / hR / hFβ
//! ```
//!
//! **Default build** is single-threaded with no optional dependencies. The
//! `parallel` feature builds ancestor sets with rayon; `serde` derives
//! (de)serialization for [`ScoreConfig`].

/// Error types used across `hierscore`.
pub mod error;
pub mod fill;
pub mod hierarchy;
pub mod labels;
pub mod metrics;


pub use error::{Error, Result};
pub use fill::{fill_ancestors, fill_ancestors_in_place, fill_ancestors_with, LabelMatrix};
pub use hierarchy::{AncestorSets, Hierarchy, Node, ROOT};
pub use labels::{multi_labeled, LabelSpace, MultiLabeled};
pub use metrics::{
    h_f1_score, h_fbeta_score, h_precision_score, h_recall_score, h_scores, HierarchicalScores,
    OverlapCounts, ScoreConfig, ZeroDivision,
};
