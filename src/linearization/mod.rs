//! Local linearization increments and the matrix exponential they are evaluated with.

pub mod local_linearization;
pub mod pade;
pub mod traits;

pub use local_linearization::{
    augmented_operator, compute_dx, effective_step, LocalLinearization, StepSize,
};
pub use pade::{expm, log_abs_det, PadeExponential};
pub use traits::MatrixExponential;
