//! Traits representing the dense linear-algebra primitives the linearization step relies on

use ndarray::{Array2, ArrayBase, Data, Ix2};

use crate::error::Result;

/// Dense matrix exponential
///
/// This trait indicates that implementor evaluates `exp(a)` for square real matrices. The
/// local linearization step only ever calls it with the augmented operator, which is
/// generally not diagonalizable, so implementations must not rely on an eigendecomposition
/// of their input.
///
/// Implementations are expected to fail with `Error::NotSquare` for non-square input, and
/// may fail with `Error::Linalg` when the underlying factorizations break down.
pub trait MatrixExponential {
    fn expm<S: Data<Elem = f64>>(&self, a: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>;
}
