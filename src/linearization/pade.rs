//! Matrix exponential by scaling and squaring with diagonal Padé approximants, following
//! Higham, "The scaling and squaring method for the matrix exponential revisited" (2005).
use log::trace;
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2, ShapeBuilder};
use ndarray_linalg::{Determinant, Factorize, Solve};

use super::traits::MatrixExponential;
use crate::error::{Error, Result};

/// Largest 1-norms for which the Padé approximants of degree 3, 5, 7 and 9 reach double
/// precision without scaling
const LOW_DEGREE_THETAS: [(usize, f64); 4] = [
    (3, 1.495585217958292e-2),
    (5, 2.539398330063230e-1),
    (7, 9.504178996162932e-1),
    (9, 2.097847961257068e0),
];

const THETA_13: f64 = 5.371920351148152e0;

const PADE_3: [f64; 4] = [120.0, 60.0, 12.0, 1.0];
const PADE_5: [f64; 6] = [30240.0, 15120.0, 3360.0, 420.0, 30.0, 1.0];
const PADE_7: [f64; 8] = [
    17297280.0, 8648640.0, 1995840.0, 277200.0, 25200.0, 1512.0, 56.0, 1.0,
];
const PADE_9: [f64; 10] = [
    17643225600.0,
    8821612800.0,
    2075673600.0,
    302702400.0,
    30270240.0,
    2162160.0,
    110880.0,
    3960.0,
    90.0,
    1.0,
];
const PADE_13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

/// Scaling and squaring matrix exponential with Padé approximants of degree up to 13
///
/// The degree is chosen from the 1-norm of the input; inputs too large for the degree 13
/// approximant are scaled down by a power of two first and the approximant is squared back
/// up afterwards. The rational approximant is evaluated with a single LU factorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct PadeExponential;

impl MatrixExponential for PadeExponential {
    fn expm<S: Data<Elem = f64>>(&self, a: &ArrayBase<S, Ix2>) -> Result<Array2<f64>> {
        expm(a)
    }
}

/// Exponential of a square matrix, see `PadeExponential`
///
/// Inputs with infinite or NaN entries are rejected with `Error::NonFiniteMatrix`.
pub fn expm<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> Result<Array2<f64>> {
    let n = ensure_square(a)?;
    if n == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    if !a.iter().all(|x| x.is_finite()) {
        return Err(Error::NonFiniteMatrix);
    }

    let norm = one_norm(a);
    let identity = Array2::<f64>::eye(n);
    let a2 = a.dot(a);
    for &(degree, theta) in LOW_DEGREE_THETAS.iter() {
        if norm <= theta {
            trace!("matrix exponential: 1-norm {:e}, Padé degree {}", norm, degree);
            let coefficients: &[f64] = match degree {
                3 => &PADE_3,
                5 => &PADE_5,
                7 => &PADE_7,
                _ => &PADE_9,
            };
            let (u, v) = pade_low_degree(a, &a2, &identity, coefficients);
            return solve_pade(&u, &v);
        }
    }

    let squarings = (norm / THETA_13).log2().ceil().max(0.0) as i32;
    trace!(
        "matrix exponential: 1-norm {:e}, Padé degree 13 with {} squarings",
        norm,
        squarings
    );
    let scale = 2f64.powi(-squarings);
    let a = a.mapv(|x| x * scale);
    let a2 = a2 * (scale * scale);
    let (u, v) = pade_13(&a, &a2, &identity);
    let mut output = solve_pade(&u, &v)?;
    for _ in 0..squarings {
        output = output.dot(&output);
    }
    Ok(output)
}

/// Logarithm of the absolute value of the determinant of a square matrix
///
/// A singular matrix yields negative infinity.
pub fn log_abs_det<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> Result<f64> {
    ensure_square(a)?;
    let (_, ln_abs) = a.sln_det()?;
    Ok(ln_abs)
}

/// Maximum absolute column sum
pub fn one_norm<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> f64 {
    a.axis_iter(Axis(1))
        .map(|column| column.iter().map(|x| x.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

pub(crate) fn ensure_square<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> Result<usize> {
    let shape = a.dim();
    if shape.0 != shape.1 {
        return Err(Error::NotSquare { shape });
    }
    Ok(shape.0)
}

/// Odd and even parts (U, V) of the Padé approximant of degree `coefficients.len() - 1`
fn pade_low_degree<S: Data<Elem = f64>>(
    a: &ArrayBase<S, Ix2>,
    a2: &Array2<f64>,
    identity: &Array2<f64>,
    coefficients: &[f64],
) -> (Array2<f64>, Array2<f64>) {
    let mut odd = Array2::zeros(a2.raw_dim());
    let mut even = Array2::zeros(a2.raw_dim());
    let mut power = identity.to_owned();
    for pair in coefficients.chunks(2) {
        even.scaled_add(pair[0], &power);
        odd.scaled_add(pair[1], &power);
        power = power.dot(a2);
    }
    (a.dot(&odd), even)
}

fn pade_13(
    a: &Array2<f64>,
    a2: &Array2<f64>,
    identity: &Array2<f64>,
) -> (Array2<f64>, Array2<f64>) {
    let b = &PADE_13;
    let a4 = a2.dot(a2);
    let a6 = a4.dot(a2);

    let u_high = &a6 * b[13] + &a4 * b[11] + a2 * b[9];
    let u = a.dot(&(a6.dot(&u_high) + &a6 * b[7] + &a4 * b[5] + a2 * b[3] + identity * b[1]));

    let v_high = &a6 * b[12] + &a4 * b[10] + a2 * b[8];
    let v = a6.dot(&v_high) + &a6 * b[6] + &a4 * b[4] + a2 * b[2] + identity * b[0];
    (u, v)
}

/// Solves (V - U) R = (V + U) for R
fn solve_pade(u: &Array2<f64>, v: &Array2<f64>) -> Result<Array2<f64>> {
    let numerator = v + u;
    let denominator = v - u;
    let lu = denominator.factorize()?;
    // column-major so that every column is a contiguous right-hand side
    let mut output = Array2::zeros(numerator.dim().f());
    output.assign(&numerator);
    for mut column in output.axis_iter_mut(Axis(1)) {
        lu.solve_inplace(&mut column)?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Array2};

    fn assert_matrices_close(actual: &Array2<f64>, expected: &Array2<f64>, epsilon: f64) {
        assert_eq!(actual.dim(), expected.dim());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
        }
    }

    fn rotation(theta: f64) -> Array2<f64> {
        arr2(&[[theta.cos(), -theta.sin()], [theta.sin(), theta.cos()]])
    }

    #[test]
    fn exponential_of_zero_is_identity() -> Result<()> {
        let output = expm(&Array2::<f64>::zeros((3, 3)))?;
        assert_matrices_close(&output, &Array2::eye(3), 1e-15);
        Ok(())
    }

    #[test]
    fn exponential_of_diagonal_is_elementwise() -> Result<()> {
        for &scale in &[1e-3, 0.1, 0.5, 1.5, 3.0, 40.0] {
            let diagonal = [scale, -2.0 * scale, 0.5 * scale];
            let a = Array2::from_diag(&ndarray::arr1(&diagonal));
            let output = expm(&a)?;
            let expected = Array2::from_diag(&ndarray::arr1(&diagonal).mapv(f64::exp));
            let tolerance = 1e-13 * expected.iter().cloned().fold(1.0, f64::max);
            assert_matrices_close(&output, &expected, tolerance);
        }
        Ok(())
    }

    #[test]
    fn exponential_of_rotation_generator_is_rotation() -> Result<()> {
        for &theta in &[0.005, 0.1, 0.8, 1.9, 10.0] {
            let generator = arr2(&[[0.0, -theta], [theta, 0.0]]);
            assert_matrices_close(&expm(&generator)?, &rotation(theta), 1e-12);
        }
        Ok(())
    }

    #[test]
    fn exponential_of_nilpotent_matrix_truncates() -> Result<()> {
        let a = arr2(&[[0.0, 50.0, 0.0], [0.0, 0.0, 2.0], [0.0, 0.0, 0.0]]);
        let expected = arr2(&[[1.0, 50.0, 50.0], [0.0, 1.0, 2.0], [0.0, 0.0, 1.0]]);
        assert_matrices_close(&expm(&a)?, &expected, 1e-10);
        Ok(())
    }

    #[test]
    fn exponential_of_empty_matrix_is_empty() -> Result<()> {
        assert_eq!(expm(&Array2::<f64>::zeros((0, 0)))?.dim(), (0, 0));
        Ok(())
    }

    #[test]
    fn non_square_input_is_rejected() {
        match expm(&Array2::<f64>::zeros((2, 3))) {
            Err(Error::NotSquare { shape: (2, 3) }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let a = arr2(&[[0.0, f64::INFINITY], [1.0, 0.0]]);
        match expm(&a) {
            Err(Error::NonFiniteMatrix) => {}
            other => panic!("unexpected result {:?}", other),
        }
        let a = arr2(&[[f64::NAN, 0.0], [0.0, 1.0]]);
        match expm(&a) {
            Err(Error::NonFiniteMatrix) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn exponential_of_dense_matrix_commutes_with_inverse() -> Result<()> {
        // exp(A) exp(-A) = I checks every column of the Padé solve
        let a = arr2(&[[0.3, -1.1, 0.4], [2.0, 0.1, -0.7], [0.5, 0.9, -0.2]]);
        let product = expm(&a)?.dot(&expm(&(-&a))?);
        assert_matrices_close(&product, &Array2::eye(3), 1e-12);
        Ok(())
    }

    #[test]
    fn log_abs_det_ignores_sign() -> Result<()> {
        let a = arr2(&[[0.0, 2.0], [3.0, 0.0]]);
        assert_abs_diff_eq!(log_abs_det(&a)?, 6f64.ln(), epsilon = 1e-14);
        Ok(())
    }

    #[test]
    fn log_abs_det_of_singular_matrix_is_not_finite() {
        let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        match log_abs_det(&a) {
            Ok(value) => assert!(!value.is_finite()),
            Err(Error::Linalg(_)) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn one_norm_is_largest_column_sum() {
        let a = arr2(&[[1.0, -7.0], [-2.0, 3.0]]);
        assert_eq!(one_norm(&a), 10.0);
    }
}
