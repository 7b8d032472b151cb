//! Label-space adapter: arbitrary category labels to integer columns.
//!
//! The metrics work on binary matrices whose columns are the integer ids of
//! a [`Hierarchy<usize>`]. [`LabelSpace`] is the explicit, immutable mapping
//! that gets you there from a hierarchy keyed by any label type:
//!
//! - classes are the hierarchy's non-root labels, sorted ascending and
//!   numbered `0..n_classes`;
//! - [`LabelSpace::transform`] binarizes per-sample label collections;
//! - [`LabelSpace::relabel`] rewrites the hierarchy onto the same ids.
//!
//! [`multi_labeled`] wraps the three steps for a single evaluation.
//!
//! ```rust
//! use hierscore::labels::multi_labeled;
//! use hierscore::metrics::h_fbeta_score;
//! use hierscore::{Hierarchy, ROOT};
//!
//! let graph = Hierarchy::from_sentinel_edges(
//!     vec![(ROOT, "animal"), ("animal", "cat"), (ROOT, "plant")],
//!     &ROOT,
//! )
//! .unwrap();
//!
//! let y_true = vec![vec!["cat"]];
//! let y_pred = vec![vec!["animal"]];
//! let f1 = multi_labeled(&y_true, &y_pred, &graph, |t, p, g| h_fbeta_score(t, p, g, 1.0))
//!     .unwrap();
//! assert!((f1 - 2.0 / 3.0).abs() < 1e-12);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use ndarray::{ArrayBase, Data, Ix2};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fill::LabelMatrix;
use crate::hierarchy::Hierarchy;
use crate::metrics::{h_scores, HierarchicalScores, ScoreConfig};

/// Immutable label <-> column mapping.
#[derive(Debug, Clone)]
pub struct LabelSpace<L> {
    classes: Vec<L>,
    ids: HashMap<L, usize>,
}

impl<L> LabelSpace<L>
where
    L: Clone + Eq + Hash + Ord + Debug,
{
    /// Fit the mapping on every non-root label of `hierarchy`.
    pub fn fit(hierarchy: &Hierarchy<L>) -> Self {
        Self::from_classes(hierarchy.labels().cloned())
    }

    /// Build from an explicit set of classes. Duplicates are dropped.
    pub fn from_classes<I>(classes: I) -> Self
    where
        I: IntoIterator<Item = L>,
    {
        let mut classes: Vec<L> = classes.into_iter().collect();
        classes.sort();
        classes.dedup();
        let ids = classes
            .iter()
            .enumerate()
            .map(|(id, label)| (label.clone(), id))
            .collect();
        debug!(n_classes = classes.len(), "fitted label space");
        Self { classes, ids }
    }

    /// Number of classes (matrix columns).
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Classes in column order.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Column of `label`.
    pub fn id_of(&self, label: &L) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Label at column `id`.
    pub fn label_of(&self, id: usize) -> Option<&L> {
        self.classes.get(id)
    }

    /// Binarize per-sample label collections into `[n_samples, n_classes]`.
    ///
    /// A label outside the space is dropped from its sample and reported
    /// with `warn!`. Use [`LabelSpace::transform_strict`] to reject it.
    pub fn transform<S>(&self, samples: &[S]) -> LabelMatrix
    where
        S: AsRef<[L]>,
    {
        let mut y = LabelMatrix::zeros((samples.len(), self.n_classes()));
        let mut ignored = 0usize;
        for (row, sample) in samples.iter().enumerate() {
            for label in sample.as_ref() {
                match self.id_of(label) {
                    Some(column) => y[(row, column)] = 1,
                    None => {
                        warn!(?label, sample = row, "unknown label ignored");
                        ignored += 1;
                    }
                }
            }
        }
        debug!(n_samples = samples.len(), ignored, "binarized label sets");
        y
    }

    /// Like [`LabelSpace::transform`], but fails with
    /// [`Error::UnknownLabel`] on the first label outside the space.
    pub fn transform_strict<S>(&self, samples: &[S]) -> Result<LabelMatrix>
    where
        S: AsRef<[L]>,
    {
        let mut y = LabelMatrix::zeros((samples.len(), self.n_classes()));
        for (row, sample) in samples.iter().enumerate() {
            for label in sample.as_ref() {
                let column = self
                    .id_of(label)
                    .ok_or_else(|| Error::UnknownLabel(format!("{label:?}")))?;
                y[(row, column)] = 1;
            }
        }
        Ok(y)
    }

    /// Turn a binary matrix back into per-sample label lists, in column order.
    pub fn inverse_transform<S>(&self, y: &ArrayBase<S, Ix2>) -> Result<Vec<Vec<L>>>
    where
        S: Data<Elem = u8>,
    {
        if y.ncols() != self.n_classes() {
            return Err(Error::DimensionMismatch {
                expected: self.n_classes(),
                found: y.ncols(),
            });
        }
        Ok(y.rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(&self.classes)
                    .filter(|(&v, _)| v != 0)
                    .map(|(_, label)| label.clone())
                    .collect()
            })
            .collect())
    }

    /// Rewrite `hierarchy` onto this space's integer ids.
    ///
    /// Every label of `hierarchy` must be in the space.
    pub fn relabel(&self, hierarchy: &Hierarchy<L>) -> Result<Hierarchy<usize>> {
        hierarchy.try_map_labels(|label| {
            self.id_of(label)
                .ok_or_else(|| Error::UnknownNode(format!("{label:?}")))
        })
    }
}

/// Binarized ground truth, predictions and hierarchy for one evaluation.
#[derive(Debug, Clone)]
pub struct MultiLabeled<L> {
    /// Mapping used for all three artifacts.
    pub space: LabelSpace<L>,
    /// Ground truth, `[n_samples, n_classes]`.
    pub y_true: LabelMatrix,
    /// Predictions, `[n_samples, n_classes]`.
    pub y_pred: LabelMatrix,
    /// Hierarchy relabeled to column ids.
    pub hierarchy: Hierarchy<usize>,
}

impl<L> MultiLabeled<L>
where
    L: Clone + Eq + Hash + Ord + Debug,
{
    /// Fit a label space on `hierarchy` and transform everything with it.
    ///
    /// Labels missing from `hierarchy` are ignored, see [`LabelSpace::transform`].
    pub fn new<S1, S2>(y_true: &[S1], y_pred: &[S2], hierarchy: &Hierarchy<L>) -> Result<Self>
    where
        S1: AsRef<[L]>,
        S2: AsRef<[L]>,
    {
        if y_true.len() != y_pred.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} samples", y_true.len()),
                actual: format!("{} samples", y_pred.len()),
            });
        }
        let space = LabelSpace::fit(hierarchy);
        let y_true = space.transform(y_true);
        let y_pred = space.transform(y_pred);
        let hierarchy = space.relabel(hierarchy)?;
        Ok(Self {
            space,
            y_true,
            y_pred,
            hierarchy,
        })
    }

    /// Hierarchical scores of the transformed matrices.
    pub fn scores(&self, config: &ScoreConfig) -> Result<HierarchicalScores> {
        h_scores(&self.y_true, &self.y_pred, &self.hierarchy, config)
    }
}

/// Run `f` on binarized `y_true`, `y_pred` and the relabeled hierarchy.
///
/// The transformed artifacts only live for the duration of `f`.
pub fn multi_labeled<L, S1, S2, R, F>(
    y_true: &[S1],
    y_pred: &[S2],
    hierarchy: &Hierarchy<L>,
    f: F,
) -> Result<R>
where
    L: Clone + Eq + Hash + Ord + Debug,
    S1: AsRef<[L]>,
    S2: AsRef<[L]>,
    F: FnOnce(&LabelMatrix, &LabelMatrix, &Hierarchy<usize>) -> Result<R>,
{
    let labeled = MultiLabeled::new(y_true, y_pred, hierarchy)?;
    f(&labeled.y_true, &labeled.y_pred, &labeled.hierarchy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hierarchy::{AncestorSets, Node, ROOT};
    use crate::metrics::h_precision_score;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn taxonomy() -> Hierarchy<&'static str> {
        Hierarchy::from_sentinel_edges(
            vec![
                (ROOT, "vehicle"),
                ("vehicle", "car"),
                ("vehicle", "bike"),
                (ROOT, "animal"),
            ],
            &ROOT,
        )
        .unwrap()
    }

    #[test]
    fn classes_are_sorted_and_exclude_root() {
        let space = LabelSpace::fit(&taxonomy());
        assert_eq!(space.classes(), &["animal", "bike", "car", "vehicle"]);
        assert_eq!(space.id_of(&"car"), Some(2));
        assert_eq!(space.id_of(&ROOT), None);
        assert_eq!(space.label_of(3), Some(&"vehicle"));
    }

    #[test]
    fn transform_and_back() {
        let space = LabelSpace::fit(&taxonomy());
        let y = space.transform(&[vec!["car", "animal"], vec![], vec!["bike"]]);
        assert_eq!(y, array![[1u8, 0, 1, 0], [0, 0, 0, 0], [0, 1, 0, 0]]);

        let back = space.inverse_transform(&y).unwrap();
        assert_eq!(back, vec![vec!["animal", "car"], vec![], vec!["bike"]]);
    }

    #[test]
    fn unknown_labels_are_dropped() {
        let space = LabelSpace::fit(&taxonomy());
        let y = space.transform(&[vec!["car", "boat"], vec!["boat"]]);
        assert_eq!(y, array![[0u8, 0, 1, 0], [0, 0, 0, 0]]);
    }

    #[test]
    fn strict_transform_rejects_unknown_labels() {
        let space = LabelSpace::fit(&taxonomy());
        assert!(matches!(
            space.transform_strict(&[vec!["car", "boat"]]),
            Err(Error::UnknownLabel(_))
        ));
        assert_eq!(
            space.transform_strict(&[vec!["car"]]).unwrap(),
            array![[0u8, 0, 1, 0]]
        );
    }

    #[test]
    fn inverse_transform_checks_columns() {
        let space = LabelSpace::fit(&taxonomy());
        assert!(matches!(
            space.inverse_transform(&array![[1u8, 0]]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn unknown_prediction_does_not_abort_scoring() -> Result<()> {
        let graph = Hierarchy::from_sentinel_edges(
            vec![(ROOT, "a"), ("a", "b"), (ROOT, "c")],
            &ROOT,
        )?;
        let hp = multi_labeled(&[vec!["b"]], &[vec!["a", "zzz"]], &graph, |t, p, g| {
            assert_eq!(p, &array![[1u8, 0, 0]]);
            h_precision_score(t, p, g)
        })?;
        assert_abs_diff_eq!(hp, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn relabeled_columns_match_classes() {
        let graph = taxonomy();
        let space = LabelSpace::fit(&graph);
        let relabeled = space.relabel(&graph).unwrap();
        assert_eq!(space.n_classes(), relabeled.n_labels());
        assert!(relabeled.labels().all(|&id| id < space.n_classes()));
        let sets = AncestorSets::new(&relabeled).unwrap();
        assert_eq!(sets.len(), space.n_classes());
    }

    #[test]
    fn relabel_keeps_structure() {
        let graph = taxonomy();
        let space = LabelSpace::fit(&graph);
        let relabeled = space.relabel(&graph).unwrap();
        assert_eq!(relabeled.n_labels(), 4);
        assert_eq!(relabeled.edge_count(), graph.edge_count());

        let car = space.id_of(&"car").unwrap();
        let vehicle = space.id_of(&"vehicle").unwrap();
        assert_eq!(relabeled.parents(&car).unwrap(), vec![&Node::Label(vehicle)]);
        assert_eq!(relabeled.parents(&vehicle).unwrap(), vec![&Node::Root]);
    }

    #[test]
    fn relabel_rejects_foreign_hierarchy() {
        let space = LabelSpace::from_classes(["car"]);
        assert!(matches!(
            space.relabel(&taxonomy()),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn scoped_evaluation() -> Result<()> {
        let graph = taxonomy();
        let y_true = vec![vec!["car"], vec!["animal"]];
        let y_pred = vec![vec!["bike"], vec!["animal"]];

        // filled truth: {car, vehicle}, {animal}; filled pred: {bike, vehicle}, {animal}
        let hp = multi_labeled(&y_true, &y_pred, &graph, |t, p, g| h_precision_score(t, p, g))?;
        assert_abs_diff_eq!(hp, 2.0 / 3.0, epsilon = 1e-12);

        let labeled = MultiLabeled::new(&y_true, &y_pred, &graph)?;
        let scores = labeled.scores(&ScoreConfig::new())?;
        assert_abs_diff_eq!(scores.recall, 2.0 / 3.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn sample_counts_must_match() {
        let graph = taxonomy();
        let err = MultiLabeled::new(&[vec!["car"]], &[vec!["car"], vec!["bike"]], &graph);
        assert!(matches!(err, Err(Error::ShapeMismatch { .. })));
    }
}
