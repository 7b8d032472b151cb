use thiserror::Error;

/// Result alias for `hierscore`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by hierarchy, fill and metric primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Label matrix column count disagrees with the hierarchy's label count.
    #[error("dimension mismatch: expected {expected} columns, found {found}")]
    DimensionMismatch {
        /// Number of non-root nodes in the hierarchy.
        expected: usize,
        /// Number of columns in the matrix.
        found: usize,
    },

    /// Two matrices that must align do not share a shape.
    #[error("shape mismatch: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// An integer node id cannot be used as a column index.
    #[error("node {node} is out of range for a matrix with {n_columns} columns")]
    NodeOutOfRange {
        /// Offending node id.
        node: usize,
        /// Number of columns available.
        n_columns: usize,
    },

    /// The Root sentinel was not present in the supplied graph.
    #[error("hierarchy has no root sentinel node")]
    MissingRoot,

    /// A sample references a label outside the fitted label space.
    #[error("unknown label: {0}")]
    UnknownLabel(String),

    /// A requested node is not part of the hierarchy.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A metric's denominator is zero.
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        /// Metric name.
        metric: &'static str,
        /// Why the denominator vanished.
        reason: &'static str,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}
