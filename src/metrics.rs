//! Hierarchical classification metrics.
//!
//! Both label matrices are ancestor-filled against the class hierarchy
//! before they are compared, so a prediction that lands near the true label
//! still earns credit for the categories they share.
//!
//! # Metrics Overview
//!
//! | Metric | Range | Best | Definition |
//! |--------|-------|------|------------|
//! | [`h_precision_score`] | [0, 1] | 1 | overlap / filled predicted positives |
//! | [`h_recall_score`] | [0, 1] | 1 | overlap / filled true positives |
//! | [`h_fbeta_score`] | [0, 1] | 1 | weighted harmonic mean of the two |
//!
//! ```text
//! hP  = |T ∩ P| / |P|
//! hR  = |T ∩ P| / |T|
//! hFβ = (1 + β²) · hP · hR / (β² · hP + hR)
//! ```
//!
//! where `T` and `P` are the sets of positive (sample, class) cells after
//! filling. β > 1 weighs recall more, β < 1 precision.
//!
//! # Zero Denominators
//!
//! A matrix with no positives at all leaves a ratio undefined. By default
//! this is an [`Error::UndefinedMetric`]; pass [`ZeroDivision::Value`] in a
//! [`ScoreConfig`] to substitute a fixed value instead.
//!
//! # Example
//!
//! ```rust
//! use hierscore::metrics::{h_precision_score, h_recall_score};
//! use hierscore::{Hierarchy, Node};
//! use ndarray::array;
//!
//! // Root -> 0 -> 1
//! let mut h = Hierarchy::new();
//! h.add_top_level(0);
//! h.add_edge(Node::Label(0), 1);
//!
//! let y_true = array![[0u8, 1]];
//! let y_pred = array![[1u8, 0]];
//! assert_eq!(h_precision_score(&y_true, &y_pred, &h).unwrap(), 1.0);
//! assert_eq!(h_recall_score(&y_true, &y_pred, &h).unwrap(), 0.5);
//! ```
//!
//! # References
//!
//! - Kiritchenko et al. (2006). "Learning and evaluation in the presence of
//!   class hierarchies: application to text categorization."
//! - Kiritchenko et al. (2008). "Functional annotation of genes using
//!   hierarchical text categorization."

use core::fmt;

use ndarray::{ArrayBase, Data, Ix2, Zip};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fill::fill_ancestors_with;
use crate::hierarchy::{AncestorSets, Hierarchy};

/// What to return when a metric's denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroDivision {
    /// Report [`Error::UndefinedMetric`].
    #[default]
    Error,
    /// Use this value instead.
    Value(f64),
}

impl ZeroDivision {
    fn resolve(self, metric: &'static str, reason: &'static str) -> Result<f64> {
        match self {
            ZeroDivision::Error => Err(Error::UndefinedMetric { metric, reason }),
            ZeroDivision::Value(v) => Ok(v),
        }
    }
}

/// Configuration for [`h_scores`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreConfig {
    /// Recall weight in F-beta. Must be finite and positive.
    pub beta: f64,
    /// Zero-denominator policy.
    pub zero_division: ZeroDivision,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            beta: 1.0,
            zero_division: ZeroDivision::Error,
        }
    }
}

impl ScoreConfig {
    /// Create a configuration with F1 and error-on-zero defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set beta.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the zero-denominator policy.
    pub fn with_zero_division(mut self, zero_division: ZeroDivision) -> Self {
        self.zero_division = zero_division;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        check_beta(self.beta)
    }
}

fn check_beta(beta: f64) -> Result<()> {
    if !beta.is_finite() || beta <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "beta",
            message: "must be finite and greater than zero",
        });
    }
    Ok(())
}

/// Cell counts every hierarchical metric is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapCounts {
    /// Cells positive in both filled matrices.
    pub true_positives: usize,
    /// Positive cells in the filled prediction matrix.
    pub predicted: usize,
    /// Positive cells in the filled ground-truth matrix.
    pub actual: usize,
}

impl OverlapCounts {
    /// Fill both matrices against `hierarchy` and count their overlap.
    ///
    /// The ancestor sets are computed once and shared by both fills.
    pub fn compute<S1, S2>(
        y_true: &ArrayBase<S1, Ix2>,
        y_pred: &ArrayBase<S2, Ix2>,
        hierarchy: &Hierarchy<usize>,
    ) -> Result<Self>
    where
        S1: Data<Elem = u8>,
        S2: Data<Elem = u8>,
    {
        check_shapes(y_true, y_pred)?;
        let sets = AncestorSets::new(hierarchy)?;
        let true_filled = fill_ancestors_with(y_true, &sets)?;
        let pred_filled = fill_ancestors_with(y_pred, &sets)?;
        Self::from_filled(&true_filled, &pred_filled)
    }

    /// Count overlap between two already-filled matrices.
    pub fn from_filled<S1, S2>(
        true_filled: &ArrayBase<S1, Ix2>,
        pred_filled: &ArrayBase<S2, Ix2>,
    ) -> Result<Self>
    where
        S1: Data<Elem = u8>,
        S2: Data<Elem = u8>,
    {
        check_shapes(true_filled, pred_filled)?;

        let mut counts = Self::default();
        Zip::from(true_filled)
            .and(pred_filled)
            .for_each(|&t, &p| {
                let (t, p) = (t != 0, p != 0);
                counts.true_positives += usize::from(t && p);
                counts.predicted += usize::from(p);
                counts.actual += usize::from(t);
            });

        debug!(
            true_positives = counts.true_positives,
            predicted = counts.predicted,
            actual = counts.actual,
            "counted hierarchical overlap"
        );
        Ok(counts)
    }

    /// Hierarchical precision, `true_positives / predicted`.
    pub fn precision(&self, zero_division: ZeroDivision) -> Result<f64> {
        if self.predicted == 0 {
            return zero_division.resolve("precision", "no predicted labels after filling");
        }
        Ok(self.true_positives as f64 / self.predicted as f64)
    }

    /// Hierarchical recall, `true_positives / actual`.
    pub fn recall(&self, zero_division: ZeroDivision) -> Result<f64> {
        if self.actual == 0 {
            return zero_division.resolve("recall", "no true labels after filling");
        }
        Ok(self.true_positives as f64 / self.actual as f64)
    }

    /// Hierarchical F-beta.
    pub fn fbeta(&self, beta: f64, zero_division: ZeroDivision) -> Result<f64> {
        check_beta(beta)?;
        let precision = self.precision(zero_division)?;
        let recall = self.recall(zero_division)?;
        combine(precision, recall, beta, zero_division)
    }
}

fn combine(precision: f64, recall: f64, beta: f64, zero_division: ZeroDivision) -> Result<f64> {
    let beta2 = beta * beta;
    let denom = beta2 * precision + recall;
    if denom == 0.0 {
        return zero_division.resolve("f-beta", "precision and recall are both zero");
    }
    Ok((1.0 + beta2) * precision * recall / denom)
}

fn check_shapes<S1, S2>(a: &ArrayBase<S1, Ix2>, b: &ArrayBase<S2, Ix2>) -> Result<()>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    if a.dim() != b.dim() {
        return Err(Error::ShapeMismatch {
            expected: format!("{:?}", a.dim()),
            actual: format!("{:?}", b.dim()),
        });
    }
    Ok(())
}

/// Hierarchical precision ("hP").
///
/// Fraction of the filled predicted cells that are also positive in the
/// filled ground truth.
///
/// # Arguments
///
/// * `y_true` - Ground truth, `[n_samples, n_classes]`, columns are node ids
/// * `y_pred` - Predictions, same shape
/// * `hierarchy` - Class hierarchy with ids `0..n_classes`
///
/// # Returns
///
/// hP in [0, 1], or [`Error::UndefinedMetric`] if nothing was predicted.
pub fn h_precision_score<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
    hierarchy: &Hierarchy<usize>,
) -> Result<f64>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    OverlapCounts::compute(y_true, y_pred, hierarchy)?.precision(ZeroDivision::Error)
}

/// Hierarchical recall ("hR").
///
/// Fraction of the filled ground-truth cells recovered by the filled
/// predictions. [`Error::UndefinedMetric`] if the ground truth is empty.
pub fn h_recall_score<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
    hierarchy: &Hierarchy<usize>,
) -> Result<f64>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    OverlapCounts::compute(y_true, y_pred, hierarchy)?.recall(ZeroDivision::Error)
}

/// Hierarchical F-beta ("hFβ").
///
/// ```text
/// hFβ = (1 + β²) · hP · hR / (β² · hP + hR)
/// ```
///
/// Each matrix is filled once and both hP and hR come from the same counts.
/// Undefined when hP or hR is, or when both are zero.
pub fn h_fbeta_score<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
    hierarchy: &Hierarchy<usize>,
    beta: f64,
) -> Result<f64>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    check_beta(beta)?;
    OverlapCounts::compute(y_true, y_pred, hierarchy)?.fbeta(beta, ZeroDivision::Error)
}

/// Hierarchical F1, [`h_fbeta_score`] with β = 1.
pub fn h_f1_score<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
    hierarchy: &Hierarchy<usize>,
) -> Result<f64>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    h_fbeta_score(y_true, y_pred, hierarchy, 1.0)
}

/// All three hierarchical scores from one pair of fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HierarchicalScores {
    /// hP.
    pub precision: f64,
    /// hR.
    pub recall: f64,
    /// hFβ at [`beta`](Self::beta).
    pub fbeta: f64,
    /// Beta used for `fbeta`.
    pub beta: f64,
    /// Underlying cell counts.
    pub counts: OverlapCounts,
}

/// Compute hP, hR and hFβ together under `config`.
pub fn h_scores<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
    hierarchy: &Hierarchy<usize>,
    config: &ScoreConfig,
) -> Result<HierarchicalScores>
where
    S1: Data<Elem = u8>,
    S2: Data<Elem = u8>,
{
    config.validate()?;
    let counts = OverlapCounts::compute(y_true, y_pred, hierarchy)?;
    let precision = counts.precision(config.zero_division)?;
    let recall = counts.recall(config.zero_division)?;
    let fbeta = combine(precision, recall, config.beta, config.zero_division)?;
    Ok(HierarchicalScores {
        precision,
        recall,
        fbeta,
        beta: config.beta,
        counts,
    })
}

impl fmt::Display for HierarchicalScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hierarchical scores:")?;
        writeln!(f, "  hP:  {:.4}", self.precision)?;
        writeln!(f, "  hR:  {:.4}", self.recall)?;
        writeln!(f, "  hF{}: {:.4}", self.beta, self.fbeta)?;
        write!(
            f,
            "  overlap {} / predicted {} / actual {}",
            self.counts.true_positives, self.counts.predicted, self.counts.actual
        )
    }
}
