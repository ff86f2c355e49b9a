use cauchy::Scalar;
use ndarray::{azip, s, Array2, ArrayBase, Data, Ix2};

/// Kronecker product of two matrices
///
/// For `a` of shape (m, n) and `b` of shape (p, q) the result has shape (m*p, n*q), and its
/// (i, j)-th block of shape (p, q) is `a[[i, j]] * b`.
pub fn kron<A, S1, S2>(a: &ArrayBase<S1, Ix2>, b: &ArrayBase<S2, Ix2>) -> Array2<A>
where
    A: Scalar,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
{
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    let mut output = Array2::zeros((m * p, n * q));
    for ((i, j), &scale) in a.indexed_iter() {
        let mut block = output.slice_mut(s![i * p..(i + 1) * p, j * q..(j + 1) * q]);
        azip!((out in &mut block, &elem in b) *out = scale * elem);
    }
    output
}

/// Kronecker product of an identity-like selector with a matrix
///
/// Computes `kron(eye(n, m), a)`, where `eye(n, m)` is the n-by-m matrix with ones on its
/// main diagonal and `m` defaults to `n`. The selector is never built: the result is
/// allocated zeroed and `a` is written into the first `min(n, m)` diagonal blocks, so no
/// multiplications take place.
pub fn kron_eye<A, S>(a: &ArrayBase<S, Ix2>, n: usize, m: Option<usize>) -> Array2<A>
where
    A: Scalar,
    S: Data<Elem = A>,
{
    let m = m.unwrap_or(n);
    let (rows, cols) = a.dim();
    let mut output = Array2::zeros((rows * n, cols * m));
    for k in 0..n.min(m) {
        output
            .slice_mut(s![k * rows..(k + 1) * rows, k * cols..(k + 1) * cols])
            .assign(a);
    }
    output
}
