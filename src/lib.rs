#![crate_name = "loclin"]
//! The `loclin` crate computes state increments of nonlinear dynamics by local linearization
//! (Ozaki, 1985), as used inside iterative filtering and state-estimation routines. Given the
//! flow `f` and its Jacobian `dfdx` at the current state, the increment over a step is read
//! off the matrix exponential of an augmented operator, so the Jacobian never has to be
//! inverted.
//!
//! ## Contents
//! - `linearization` - the increment itself (`compute_dx`), step-size regularization, and
//!   the matrix exponential used to evaluate it
//! - `assembly` - dense block-matrix assembly and Kronecker products, used to build the
//!   augmented operator and available on their own
//! - `types` - block grids consumed by the assembly routines
//!
//! Computing `f` and `dfdx`, and deciding when to take a step, is left to the caller.
pub mod assembly;
pub mod error;
pub mod linearization;
pub mod types;

pub use error::{Error, Result};
pub use linearization::compute_dx;
