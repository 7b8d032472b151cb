//! Ancestor filling for binary label matrices.
//!
//! Each row of a label matrix is a sample; each column an integer node id of
//! a [`Hierarchy<usize>`]. Filling marks, for every positive entry, all of
//! that node's ancestors as positive too:
//!
//! ```text
//!          Root              columns:  A  B  C
//!         /    \             before:   0  1  0
//!        A      C            after:    1  1  0
//!        |
//!        B
//! ```
//!
//! The Root has no column. Any nonzero entry counts as positive, and every
//! entry the fill touches is written as `1`.
//!
//! # Example
//!
//! ```rust
//! use hierscore::{fill_ancestors, Hierarchy, Node};
//! use ndarray::array;
//!
//! let mut h = Hierarchy::new();
//! h.add_top_level(0);
//! h.add_edge(Node::Label(0), 1);
//! h.add_top_level(2);
//!
//! let y = array![[0u8, 1, 0], [0, 0, 1]];
//! let filled = fill_ancestors(&y, &h).unwrap();
//! assert_eq!(filled, array![[1u8, 1, 0], [0, 0, 1]]);
//! ```

use ndarray::{Array2, ArrayBase, Data, DataMut, Ix2};
use tracing::debug;

use crate::error::{Error, Result};
use crate::hierarchy::{AncestorSets, Hierarchy};

/// Binary sample x class matrix.
pub type LabelMatrix = Array2<u8>;

/// Return a filled copy of `y`, leaving `y` untouched.
///
/// Fails with [`Error::NodeOutOfRange`] if the hierarchy's ids are not
/// `0..n_labels`, or [`Error::DimensionMismatch`] if `y` does not have one
/// column per label.
pub fn fill_ancestors<S>(y: &ArrayBase<S, Ix2>, hierarchy: &Hierarchy<usize>) -> Result<LabelMatrix>
where
    S: Data<Elem = u8>,
{
    let sets = AncestorSets::new(hierarchy)?;
    fill_ancestors_with(y, &sets)
}

/// Fill `y` in place.
///
/// The caller keeps ownership; the matrix is only borrowed mutably for the
/// duration of the call. On error `y` is unchanged.
pub fn fill_ancestors_in_place<S>(
    y: &mut ArrayBase<S, Ix2>,
    hierarchy: &Hierarchy<usize>,
) -> Result<()>
where
    S: DataMut<Elem = u8>,
{
    let sets = AncestorSets::new(hierarchy)?;
    let _ = fill_rows(y, &sets)?;
    Ok(())
}

/// Return a filled copy of `y` using precomputed ancestor sets.
pub fn fill_ancestors_with<S>(y: &ArrayBase<S, Ix2>, sets: &AncestorSets) -> Result<LabelMatrix>
where
    S: Data<Elem = u8>,
{
    check_columns(y.ncols(), sets)?;
    let mut out = y.to_owned();
    let _ = fill_rows(&mut out, sets)?;
    Ok(out)
}

fn check_columns(found: usize, sets: &AncestorSets) -> Result<()> {
    if found != sets.len() {
        return Err(Error::DimensionMismatch {
            expected: sets.len(),
            found,
        });
    }
    Ok(())
}

/// Mark ancestors row by row. Returns how many zero entries became positive.
fn fill_rows<S>(y: &mut ArrayBase<S, Ix2>, sets: &AncestorSets) -> Result<usize>
where
    S: DataMut<Elem = u8>,
{
    check_columns(y.ncols(), sets)?;

    let mut added = 0usize;
    let mut marked = Vec::new();
    for mut row in y.rows_mut() {
        marked.clear();
        marked.extend(
            row.iter()
                .enumerate()
                .filter(|(_, &v)| v != 0)
                .map(|(c, _)| c),
        );
        for &column in &marked {
            for &ancestor in sets.get(column).unwrap_or(&[]) {
                if row[ancestor] == 0 {
                    added += 1;
                }
                row[ancestor] = 1;
            }
        }
    }

    debug!(
        rows = y.nrows(),
        columns = y.ncols(),
        added,
        "filled ancestors"
    );
    Ok(added)
}
