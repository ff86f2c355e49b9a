//! Errors raised while assembling block matrices and computing increments.
use ndarray_linalg::error::LinalgError;
use std::fmt;

/// Axis of a block whose size disagrees with the rest of its block-row or block-column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAxis {
    /// Number of rows of a block, shared along a block-row
    Height,
    /// Number of columns of a block, shared along a block-column
    Width,
}

impl fmt::Display for BlockAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockAxis::Height => write!(f, "rows"),
            BlockAxis::Width => write!(f, "columns"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid number of columns at block-row {row}: expected {expected}, got {actual}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "unable to build block matrix: the number of {axis} at block-index ({row},{col}) \
         (shape {shape:?}) does not match that of the previous block (expected {expected})"
    )]
    BlockShapeMismatch {
        row: usize,
        col: usize,
        shape: (usize, usize),
        axis: BlockAxis,
        expected: usize,
    },

    #[error("block-index ({row},{col}) is outside of a {rows}x{cols} block grid")]
    BlockIndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("shape mismatch: first dim of f {f_shape:?} must match that of df/dx {dfdx_shape:?}")]
    DimensionMismatch {
        f_shape: (usize,),
        dfdx_shape: (usize, usize),
    },

    #[error("expected a square matrix, got shape {shape:?}")]
    NotSquare { shape: (usize, usize) },

    #[error("df/dx is singular, the regularized step size is undefined")]
    SingularJacobian,

    #[error("step size {step} is not finite")]
    NonFiniteStep { step: f64 },

    #[error("matrix exponential of a matrix with non-finite entries")]
    NonFiniteMatrix,

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

pub type Result<T> = std::result::Result<T, Error>;
