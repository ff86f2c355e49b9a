//! Local linearization of nonlinear dynamics (Ozaki, 1985).
//!
//! Around the current state the dynamics `dx/dt = f(x)` are replaced by the affine system
//! `dx/dt = f + dfdx * x`. Adding a dummy coordinate that stays equal to one turns it into
//! the homogeneous system with generator
//!
//! ```text
//! J = t * | 0     0    |
//!         | f     dfdx |
//! ```
//!
//! whose flow over the step is `exp(J)`. The first column of `exp(J)` below the dummy row is
//! the increment of the affine system started at zero, `dfdx^-1 (exp(dfdx t) - I) f` when
//! `dfdx` is invertible. Evaluating it through the exponential avoids inverting `dfdx`, so
//! the increment stays well defined for singular and badly conditioned Jacobians.
use log::debug;
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};

use super::pade::{ensure_square, log_abs_det, PadeExponential};
use super::traits::MatrixExponential;
use crate::assembly::assemble;
use crate::error::{Error, Result};
use crate::types::Block;

/// Step size of a local linearization increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepSize {
    /// The step size itself
    Fixed(f64),
    /// Regularization exponent `t`; the step size becomes `exp(t - log|det dfdx| / n)` and
    /// so shrinks as the Jacobian grows
    Regularized(f64),
}

impl StepSize {
    pub fn from_parts(t: f64, isreg: bool) -> Self {
        if isreg {
            StepSize::Regularized(t)
        } else {
            StepSize::Fixed(t)
        }
    }

    /// Step size used for the Jacobian `dfdx`
    ///
    /// `dfdx` has to be square. Regularizing with a singular Jacobian fails with
    /// `Error::SingularJacobian`, and a step size that is not finite, for instance one that
    /// overflows for a nearly singular Jacobian, fails with `Error::NonFiniteStep`. An empty
    /// Jacobian has determinant one and leaves the exponent unscaled.
    pub fn effective<S: Data<Elem = f64>>(&self, dfdx: &ArrayBase<S, Ix2>) -> Result<f64> {
        let n = ensure_square(dfdx)?;
        let step = match *self {
            StepSize::Fixed(t) => t,
            StepSize::Regularized(t) if n == 0 => t.exp(),
            StepSize::Regularized(t) => {
                let log_det = match log_abs_det(dfdx) {
                    Ok(log_det) if log_det.is_finite() => log_det,
                    Ok(_) | Err(Error::Linalg(_)) => return Err(Error::SingularJacobian),
                    Err(err) => return Err(err),
                };
                (t - log_det / n as f64).exp()
            }
        };
        if !step.is_finite() {
            return Err(Error::NonFiniteStep { step });
        }
        Ok(step)
    }
}

/// Local linearization step
///
/// Holds the step size and the matrix exponential used to evaluate increments. Type parameter
/// `E` selects the exponential; by default it is the scaling and squaring Padé method.
///
/// ```
/// use ndarray::{arr1, arr2};
/// use loclin::linearization::{LocalLinearization, StepSize};
///
/// let step = LocalLinearization::new(StepSize::Fixed(0.1));
/// let dx = step.increment(&arr1(&[1.0, 0.0]), &arr2(&[[0.0, 0.0], [0.0, 0.0]])).unwrap();
/// assert!((dx[0] - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LocalLinearization<E = PadeExponential> {
    step: StepSize,
    exponential: E,
}

impl LocalLinearization<PadeExponential> {
    pub fn new(step: StepSize) -> Self {
        LocalLinearization {
            step,
            exponential: PadeExponential,
        }
    }
}

impl<E: MatrixExponential> LocalLinearization<E> {
    pub fn with_exponential(step: StepSize, exponential: E) -> Self {
        LocalLinearization { step, exponential }
    }

    pub fn step(&self) -> StepSize {
        self.step
    }

    /// Increment of the state over one step of the dynamics linearized around the current state
    ///
    /// `f` is the flow at the current state and `dfdx` its Jacobian. The length of `f` has to
    /// match the number of rows of `dfdx`, and `dfdx` has to be square. Without any state the
    /// increment is empty.
    pub fn increment<S1, S2>(
        &self,
        f: &ArrayBase<S1, Ix1>,
        dfdx: &ArrayBase<S2, Ix2>,
    ) -> Result<Array1<f64>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let n = check_dimensions(f, dfdx)?;
        if n == 0 {
            return Ok(Array1::zeros(0));
        }

        let t = self.step.effective(dfdx)?;
        debug!("local linearization of {} states with step size {:e}", n, t);
        let operator = build_operator(f, dfdx, t)?;
        let transition = self.exponential.expm(&operator)?;
        Ok(transition.slice(s![1.., 0]).to_owned())
    }
}

/// Increment of the state under the locally linearized dynamics
///
/// With `isreg` unset `t` is the step size, otherwise it is a regularization exponent, see
/// `StepSize::Regularized`.
pub fn compute_dx<S1, S2>(
    f: &ArrayBase<S1, Ix1>,
    dfdx: &ArrayBase<S2, Ix2>,
    t: f64,
    isreg: bool,
) -> Result<Array1<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    LocalLinearization::new(StepSize::from_parts(t, isreg)).increment(f, dfdx)
}

/// Step size `compute_dx` uses for the same arguments
pub fn effective_step<S: Data<Elem = f64>>(
    dfdx: &ArrayBase<S, Ix2>,
    t: f64,
    isreg: bool,
) -> Result<f64> {
    StepSize::from_parts(t, isreg).effective(dfdx)
}

/// Augmented generator of the linearized dynamics over a step of size `t`
pub fn augmented_operator<S1, S2>(
    f: &ArrayBase<S1, Ix1>,
    dfdx: &ArrayBase<S2, Ix2>,
    t: f64,
) -> Result<Array2<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    check_dimensions(f, dfdx)?;
    build_operator(f, dfdx, t)
}

fn build_operator<S1, S2>(
    f: &ArrayBase<S1, Ix1>,
    dfdx: &ArrayBase<S2, Ix2>,
    t: f64,
) -> Result<Array2<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let flow = f.view().insert_axis(Axis(1)).mapv(|x| x * t);
    let jacobian = dfdx.mapv(|x| x * t);
    assemble(&[
        vec![Block::from(Array2::zeros((1, 1))), Block::Zero],
        vec![Block::from(flow), Block::from(jacobian)],
    ])
}

fn check_dimensions<S1, S2>(f: &ArrayBase<S1, Ix1>, dfdx: &ArrayBase<S2, Ix2>) -> Result<usize>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let dfdx_shape = dfdx.dim();
    if f.len() != dfdx_shape.0 {
        return Err(Error::DimensionMismatch {
            f_shape: (f.len(),),
            dfdx_shape,
        });
    }
    if dfdx_shape.0 != dfdx_shape.1 {
        return Err(Error::NotSquare { shape: dfdx_shape });
    }
    Ok(f.len())
}
